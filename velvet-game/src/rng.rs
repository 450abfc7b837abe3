//! Deterministic bundle of RNG streams segregated by game domain.
//!
//! Each stream is seeded independently from the user-visible seed through a
//! domain-separated HMAC, so drawing from one stream never perturbs the
//! others. Same seed, same draw order, same game.

use std::cell::{RefCell, RefMut};

use hmac::{Hmac, Mac};
use rand::rngs::SmallRng;
use rand::{RngCore, SeedableRng};
use sha2::Sha256;

/// Deterministic bundle of RNG streams for one game session.
#[derive(Debug, Clone)]
pub struct RngBundle {
    opening: RefCell<CountingRng<SmallRng>>,
    dice: RefCell<CountingRng<SmallRng>>,
    challenge: RefCell<CountingRng<SmallRng>>,
}

impl RngBundle {
    /// Construct the bundle from a user-visible seed.
    #[must_use]
    pub fn from_user_seed(seed: u64) -> Self {
        Self {
            opening: RefCell::new(CountingRng::new(derive_stream_seed(seed, b"opening"))),
            dice: RefCell::new(CountingRng::new(derive_stream_seed(seed, b"dice"))),
            challenge: RefCell::new(CountingRng::new(derive_stream_seed(seed, b"challenge"))),
        }
    }

    /// Replace every stream in place with a freshly seeded one.
    ///
    /// Interior mutability lets providers holding a shared handle pick up
    /// the new streams on restart without being rebuilt.
    pub fn reseed(&self, seed: u64) {
        *self.opening.borrow_mut() = CountingRng::new(derive_stream_seed(seed, b"opening"));
        *self.dice.borrow_mut() = CountingRng::new(derive_stream_seed(seed, b"dice"));
        *self.challenge.borrow_mut() = CountingRng::new(derive_stream_seed(seed, b"challenge"));
    }

    /// Stream deciding the opening player.
    #[must_use]
    pub fn opening(&self) -> RefMut<'_, CountingRng<SmallRng>> {
        self.opening.borrow_mut()
    }

    /// Stream feeding die rolls.
    #[must_use]
    pub fn dice(&self) -> RefMut<'_, CountingRng<SmallRng>> {
        self.dice.borrow_mut()
    }

    /// Stream feeding local challenge picks.
    #[must_use]
    pub fn challenge(&self) -> RefMut<'_, CountingRng<SmallRng>> {
        self.challenge.borrow_mut()
    }
}

/// Counting wrapper for RNG streams providing instrumentation.
#[derive(Debug, Clone)]
pub struct CountingRng<R> {
    rng: R,
    draws: u64,
}

impl CountingRng<SmallRng> {
    fn new(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
            draws: 0,
        }
    }
}

impl<R> CountingRng<R> {
    /// Number of draws taken from this stream so far.
    #[must_use]
    pub const fn draws(&self) -> u64 {
        self.draws
    }
}

impl<R: RngCore> RngCore for CountingRng<R> {
    fn next_u32(&mut self) -> u32 {
        self.draws += 1;
        self.rng.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.draws += 1;
        self.rng.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.draws += 1;
        self.rng.fill_bytes(dest);
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.draws += 1;
        self.rng.try_fill_bytes(dest)
    }
}

fn derive_stream_seed(user_seed: u64, domain_tag: &[u8]) -> u64 {
    let mut mac =
        Hmac::<Sha256>::new_from_slice(&user_seed.to_le_bytes()).expect("64-bit seed is valid key");
    mac.update(domain_tag);
    let digest = mac.finalize().into_bytes();
    let seed_bytes: [u8; 8] = digest[..8].try_into().expect("digest slice length");
    u64::from_le_bytes(seed_bytes)
}
