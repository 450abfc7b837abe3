//! Presentation pacing seam for the turn pipeline.
//!
//! Delays are a presentation concern, never a correctness concern: the
//! pipeline awaits the pacer between transitions so a driver can animate
//! them, and a headless driver runs with the no-op pacer.

use async_trait::async_trait;

/// Scoped delays the pipeline awaits between phase transitions.
#[async_trait(?Send)]
pub trait TurnPacer {
    /// Wait while the die is "spinning".
    async fn roll_delay(&self);
    /// Wait between single-tile token steps.
    async fn step_delay(&self);
    /// Wait between landing and revealing the challenge.
    async fn reveal_delay(&self);
}

/// No-op pacer for headless drivers and tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct InstantPacer;

#[async_trait(?Send)]
impl TurnPacer for InstantPacer {
    async fn roll_delay(&self) {}
    async fn step_delay(&self) {}
    async fn reveal_delay(&self) {}
}
