//! Configuration data structures

use crate::models::PayloadFormat;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Logging level configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub enum LogLevel {
    #[serde(rename = "error")]
    Error,
    #[serde(rename = "warn")]
    Warn,
    #[serde(rename = "info")]
    #[default]
    Info,
    #[serde(rename = "debug")]
    Debug,
    #[serde(rename = "trace")]
    Trace,
}

/// Main configuration structure
///
/// Immutable for the lifetime of one run; loaded from file or built from
/// CLI flags before anything connects.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Configuration {
    /// VNyan command to send (e.g. "MMD_Stay"); may be empty
    #[serde(default)]
    pub message: String,
    /// Port of the local VNyan WebSocket endpoint
    pub ws_port: u16,
    /// Twitch channel reward ID that triggers the send; empty = send at startup
    #[serde(default)]
    pub reward_id: String,
    /// Outbound payload shape
    #[serde(default)]
    pub payload: PayloadFormat,
    /// Logging verbosity level
    #[serde(default)]
    pub log_level: LogLevel,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            message: String::new(),
            ws_port: 8000,
            reward_id: String::new(),
            payload: PayloadFormat::default(),
            log_level: LogLevel::Info,
        }
    }
}

impl Configuration {
    /// Load configuration from file
    pub fn load_from_file(path: &PathBuf) -> Result<Self, Box<dyn std::error::Error>> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Configuration = toml::from_str(&content)?;
            Ok(config)
        } else {
            // Return default configuration if file doesn't exist
            Ok(Configuration::default())
        }
    }

    /// Save configuration to file
    pub fn save_to_file(&self, path: &PathBuf) -> Result<(), Box<dyn std::error::Error>> {
        let content = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the XDG config directory path
    pub fn default_config_path() -> Result<PathBuf, Box<dyn std::error::Error>> {
        let config_dir = dirs::config_dir().ok_or("Could not determine config directory")?;
        Ok(config_dir.join("vnyanctl").join("config.toml"))
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        // The connection URI is only well-formed for a positive port
        if self.ws_port == 0 {
            errors.push("ws_port must be a positive integer".to_string());
        }

        // An empty message is permitted (empty sends are allowed), but a
        // reward_id made of whitespace would never match a real redemption
        if !self.reward_id.is_empty() && self.reward_id.trim().is_empty() {
            errors.push("reward_id must not be blank".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Whether a reward gate is configured (empty reward_id = send at startup)
    pub fn has_reward_gate(&self) -> bool {
        !self.reward_id.is_empty()
    }
}
