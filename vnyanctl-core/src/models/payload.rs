//! Outbound payload shapes

use serde::{Deserialize, Serialize};

/// Shape of the frame sent to VNyan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum PayloadFormat {
    /// JSON object `{"command": "...", "data": {}}`; connection stays open
    #[default]
    #[serde(rename = "structured")]
    Structured,
    /// Bare command string; connection is closed right after the send
    #[serde(rename = "raw")]
    Raw,
}

/// Structured VNyan command frame
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandFrame {
    pub command: String,
    pub data: serde_json::Map<String, serde_json::Value>,
}

impl CommandFrame {
    /// Build a frame carrying the configured command and no extra data
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            data: serde_json::Map::new(),
        }
    }
}

/// Render the wire text for a message under the given payload format
pub fn render_payload(format: PayloadFormat, message: &str) -> anyhow::Result<String> {
    match format {
        PayloadFormat::Structured => {
            let frame = CommandFrame::new(message);
            Ok(serde_json::to_string(&frame)?)
        }
        PayloadFormat::Raw => Ok(message.to_string()),
    }
}
