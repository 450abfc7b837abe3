//! Pluggable challenge text providers.
//!
//! Both variants satisfy one contract: given the landing, return a valid
//! [`ChallengeResult`]. A provider absorbs every internal failure and
//! substitutes the fixed fallback pair; callers never observe an error.

use std::rc::Rc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::board::TileCategory;
use crate::challenge::{ChallengeRequest, ChallengeResult, pick_challenge};
use crate::constants::REMOTE_TIMEOUT_SECS;
use crate::data::{ChallengeCategory, ChallengeData};
use crate::rng::RngBundle;
use crate::state::Player;

/// Source of challenge text, selected at session construction.
#[async_trait(?Send)]
pub trait ChallengeProvider {
    /// Produce the challenge for one landing. Must not fail.
    async fn provide(
        &self,
        player: Player,
        position: usize,
        category: TileCategory,
    ) -> ChallengeResult;
}

/// Local-pool provider drawing from the static corpus.
pub struct LocalChallenges {
    data: ChallengeData,
    rng: Rc<RngBundle>,
}

impl LocalChallenges {
    #[must_use]
    pub fn new(data: ChallengeData, rng: Rc<RngBundle>) -> Self {
        Self { data, rng }
    }
}

#[async_trait(?Send)]
impl ChallengeProvider for LocalChallenges {
    async fn provide(
        &self,
        player: Player,
        position: usize,
        category: TileCategory,
    ) -> ChallengeResult {
        let request = ChallengeRequest {
            player,
            position,
            category: ChallengeCategory::from(category),
            data: &self.data,
        };
        let mut rng = self.rng.challenge();
        pick_challenge(&request, &mut *rng)
    }
}

/// Wire request sent to the remote text generator.
#[derive(Debug, Serialize)]
struct RemoteRequest {
    player: Player,
    position: usize,
    category: TileCategory,
}

/// Expected wire response. Missing or empty fields count as malformed.
#[derive(Debug, Deserialize)]
struct RemoteResponse {
    #[serde(default)]
    challenge: Option<String>,
    #[serde(default)]
    instruction: Option<String>,
}

fn parse_remote_response(payload: RemoteResponse) -> Option<ChallengeResult> {
    let title = payload.challenge.filter(|s| !s.trim().is_empty())?;
    let body = payload.instruction.filter(|s| !s.trim().is_empty())?;
    Some(ChallengeResult { title, body })
}

/// Remote text-generation provider.
///
/// Every failure mode (client construction, transport, timeout, HTTP
/// status, malformed payload) degrades to the fallback pair.
pub struct RemoteChallenges {
    client: Option<reqwest::Client>,
    endpoint: String,
}

impl RemoteChallenges {
    #[must_use]
    pub fn new(endpoint: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REMOTE_TIMEOUT_SECS))
            .build()
            .ok();
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    async fn fetch(&self, request: &RemoteRequest) -> Option<ChallengeResult> {
        let client = self.client.as_ref()?;
        let response = client
            .post(&self.endpoint)
            .json(request)
            .send()
            .await
            .ok()?
            .error_for_status()
            .ok()?;
        let payload: RemoteResponse = response.json().await.ok()?;
        parse_remote_response(payload)
    }
}

#[async_trait(?Send)]
impl ChallengeProvider for RemoteChallenges {
    async fn provide(
        &self,
        player: Player,
        position: usize,
        category: TileCategory,
    ) -> ChallengeResult {
        let request = RemoteRequest {
            player,
            position,
            category,
        };
        self.fetch(&request)
            .await
            .unwrap_or_else(ChallengeResult::fallback)
    }
}
