//! JSONL redemption source
//!
//! Reads reward events as JSON lines from stdin or a file, the form the
//! host runtime delivers them in. Malformed lines are logged and skipped,
//! never fatal.

use crate::gate::RedemptionSource;
use crate::models::RewardEvent;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::Path;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines};

/// Redemption source over any buffered async reader
pub struct JsonlRedemptionSource<R> {
    lines: Lines<R>,
}

impl JsonlRedemptionSource<BufReader<tokio::io::Stdin>> {
    /// Read events from stdin
    pub fn stdin() -> Self {
        Self {
            lines: BufReader::new(tokio::io::stdin()).lines(),
        }
    }
}

impl JsonlRedemptionSource<BufReader<tokio::fs::File>> {
    /// Read events from a file
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = tokio::fs::File::open(path)
            .await
            .with_context(|| format!("Failed to open event file: {:?}", path))?;
        Ok(Self {
            lines: BufReader::new(file).lines(),
        })
    }
}

impl<R: AsyncBufRead + Unpin> JsonlRedemptionSource<R> {
    /// Wrap an arbitrary reader (used by tests)
    pub fn from_reader(reader: R) -> Self {
        Self {
            lines: reader.lines(),
        }
    }
}

#[async_trait]
impl<R: AsyncBufRead + Unpin + Send> RedemptionSource for JsonlRedemptionSource<R> {
    async fn next_event(&mut self) -> Result<Option<RewardEvent>> {
        while let Some(line) = self.lines.next_line().await? {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            match serde_json::from_str::<RewardEvent>(trimmed) {
                Ok(event) => return Ok(Some(event)),
                Err(e) => {
                    // Malformed line: warn and keep reading
                    tracing::warn!(error = %e, line = %trimmed, "Skipping malformed event line");
                }
            }
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source_from(input: &str) -> JsonlRedemptionSource<BufReader<std::io::Cursor<Vec<u8>>>> {
        JsonlRedemptionSource::from_reader(BufReader::new(std::io::Cursor::new(
            input.as_bytes().to_vec(),
        )))
    }

    #[tokio::test]
    async fn test_reads_events_in_order() {
        let mut source = source_from(
            "{\"reward_id\":\"a\"}\n{\"reward_id\":\"b\",\"user_name\":\"viewer\"}\n",
        );

        let first = source.next_event().await.unwrap().unwrap();
        assert_eq!(first.reward_id, "a");
        let second = source.next_event().await.unwrap().unwrap();
        assert_eq!(second.reward_id, "b");
        assert!(source.next_event().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_skips_malformed_and_blank_lines() {
        let mut source = source_from("not json\n\n{\"nope\":1}\n{\"reward_id\":\"ok\"}\n");

        let event = source.next_event().await.unwrap().unwrap();
        assert_eq!(event.reward_id, "ok");
        assert!(source.next_event().await.unwrap().is_none());
    }
}
