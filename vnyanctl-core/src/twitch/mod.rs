//! Twitch Helix client for the manageable custom channel rewards listing

use crate::gate::ChannelRewardsApi;
use crate::models::RewardDefinition;
use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

/// Production Helix base URL
pub const HELIX_API_BASE: &str = "https://api.twitch.tv/helix";

/// Errors from the Helix rewards endpoint
#[derive(Debug, thiserror::Error)]
pub enum HelixError {
    #[error("Helix request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Helix API error {status}: {body}")]
    Api {
        status: reqwest::StatusCode,
        body: String,
    },
}

#[derive(Deserialize)]
struct RewardsEnvelope {
    #[serde(default)]
    data: Vec<RewardDefinition>,
}

/// Client for listing the channel's manageable custom rewards
pub struct HelixRewardsClient {
    base_url: String,
    client_id: String,
    token: String,
    broadcaster_id: String,
    client: Client,
}

impl HelixRewardsClient {
    pub fn new(
        client_id: impl Into<String>,
        token: impl Into<String>,
        broadcaster_id: impl Into<String>,
    ) -> Self {
        Self::with_base_url(HELIX_API_BASE, client_id, token, broadcaster_id)
    }

    /// Base URL override for tests
    pub fn with_base_url(
        base_url: impl Into<String>,
        client_id: impl Into<String>,
        token: impl Into<String>,
        broadcaster_id: impl Into<String>,
    ) -> Self {
        let base = base_url.into();
        Self {
            base_url: base.trim_end_matches('/').to_string(),
            client_id: client_id.into(),
            token: token.into(),
            broadcaster_id: broadcaster_id.into(),
            client: Client::new(),
        }
    }

    async fn fetch_rewards(&self) -> Result<Vec<RewardDefinition>, HelixError> {
        let url = format!("{}/channel_points/custom_rewards", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[
                ("broadcaster_id", self.broadcaster_id.as_str()),
                ("only_manageable_rewards", "true"),
            ])
            .bearer_auth(&self.token)
            .header("Client-Id", &self.client_id)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(HelixError::Api { status, body });
        }

        let envelope = response.json::<RewardsEnvelope>().await?;
        Ok(envelope.data)
    }
}

#[async_trait]
impl ChannelRewardsApi for HelixRewardsClient {
    async fn manageable_rewards(&self) -> Result<Vec<RewardDefinition>> {
        let rewards = self.fetch_rewards().await?;
        Ok(rewards)
    }
}
