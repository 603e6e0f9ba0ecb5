//! Script manifest consumed by the host runtime

use serde::{Deserialize, Serialize};

/// Major version of the host runtime this tool is compatible with
pub const HOST_MAJOR_VERSION: &str = "5";

/// Declared manifest, queried by the host runtime before the first trigger
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScriptManifest {
    pub name: String,
    pub description: String,
    pub author: String,
    pub version: String,
    pub host_major_version: String,
}

impl ScriptManifest {
    /// Manifest for the current build
    pub fn current() -> Self {
        Self {
            name: "VNyan WebSocket Control".to_string(),
            description:
                "Send commands to VNyan through WebSocket upon Twitch Channel Reward redemption"
                    .to_string(),
            author: "NekoSuneVR".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            host_major_version: HOST_MAJOR_VERSION.to_string(),
        }
    }
}
