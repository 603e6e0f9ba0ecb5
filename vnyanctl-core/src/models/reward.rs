//! Twitch channel-point reward data structures
//!
//! Foreign data from the Twitch boundary; deserialized leniently and never
//! persisted by this component.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A channel-point reward redemption event (push variant)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RewardEvent {
    /// Stable ID of the redeemed reward
    pub reward_id: String,
    /// ID of this specific redemption, if the notifier supplies one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redemption_id: Option<String>,
    /// Display name of the redeeming viewer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    /// Redemption timestamp
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redeemed_at: Option<DateTime<Utc>>,
}

/// A manageable custom reward definition (poll variant listing)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RewardDefinition {
    /// Stable reward ID
    pub id: String,
    /// Reward title as configured on the channel
    #[serde(default)]
    pub title: String,
    /// Point cost
    #[serde(default)]
    pub cost: u64,
}
