//! Command dispatcher: the connect-and-send state machine
//!
//! One outbound send per qualifying trigger event. The dispatcher owns a
//! single connection slot; a new connection is only opened when the slot is
//! empty or its socket is no longer open. There is no retry, no backoff and
//! no automatic reconnect: every attempt ends in `Closed` or `Error`, and
//! only a fresh trigger starts a new one.

use crate::models::{render_payload, Configuration, PayloadFormat};
use crate::transport::{ws_url, VNyanSocket};
use anyhow::Result;

/// Connection lifecycle states, logged on every transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Idle,
    Connecting,
    Open,
    Sent,
    Closed,
    Error,
}

impl std::fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ConnectionState::Idle => "idle",
            ConnectionState::Connecting => "connecting",
            ConnectionState::Open => "open",
            ConnectionState::Sent => "sent",
            ConnectionState::Closed => "closed",
            ConnectionState::Error => "error",
        };
        write!(f, "{}", name)
    }
}

/// What a dispatch attempt amounted to
///
/// Dispatch never fails observably to its trigger source; transport errors
/// are logged and folded into `Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Frame sent, connection left open in the slot
    Sent,
    /// Frame sent, connection closed right after (raw fire-and-forget)
    SentAndClosed,
    /// An open connection already existed; nothing was opened or sent
    Skipped,
    /// Connect or send failed; details are in the log only
    Failed,
}

/// Command dispatcher holding the single connection slot
pub struct Dispatcher {
    url: String,
    port: u16,
    message: String,
    format: PayloadFormat,
    connection: Option<VNyanSocket>,
    state: ConnectionState,
}

impl Dispatcher {
    /// Build a dispatcher from a validated configuration
    pub fn new(config: &Configuration) -> Self {
        Self::with_target(config.ws_port, config.message.clone(), config.payload)
    }

    /// Build a dispatcher for an explicit port, message and payload format
    pub fn with_target(port: u16, message: String, format: PayloadFormat) -> Self {
        Self {
            url: ws_url(port),
            port,
            message,
            format,
            connection: None,
            state: ConnectionState::Idle,
        }
    }

    /// Endpoint URL this dispatcher connects to
    pub fn url(&self) -> &str {
        &self.url
    }

    fn transition(&mut self, next: ConnectionState) {
        tracing::debug!(from = %self.state, to = %next, "Connection state transition");
        self.state = next;
    }

    /// Perform one dispatch attempt
    ///
    /// Errors are logged and reported as `DispatchOutcome::Failed`; the
    /// caller (the trigger source) is never handed an `Err`.
    pub async fn dispatch(&mut self) -> DispatchOutcome {
        match self.try_dispatch().await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::error!(error = %e, url = %self.url, "VNyan dispatch failed");
                self.connection = None;
                self.transition(ConnectionState::Error);
                DispatchOutcome::Failed
            }
        }
    }

    async fn try_dispatch(&mut self) -> Result<DispatchOutcome> {
        // Idempotent guard: never open a second connection while one is open
        if let Some(conn) = &self.connection {
            if conn.is_open() {
                tracing::debug!(url = %self.url, "Connection already open, skipping dispatch");
                return Ok(DispatchOutcome::Skipped);
            }
        }

        self.transition(ConnectionState::Connecting);
        let mut socket = VNyanSocket::connect(&self.url).await?;
        self.transition(ConnectionState::Open);
        tracing::info!(port = self.port, "Connected to VNyan");

        // Send immediately on open
        let frame = render_payload(self.format, &self.message)?;
        socket.send_text(frame.clone()).await?;
        self.transition(ConnectionState::Sent);
        tracing::info!(frame = %frame, "Sent message to VNyan");

        match self.format {
            PayloadFormat::Raw => {
                // Fire-and-forget: close right after the send
                socket.close().await?;
                self.transition(ConnectionState::Closed);
                tracing::info!(port = self.port, "Disconnected from VNyan");
                Ok(DispatchOutcome::SentAndClosed)
            }
            PayloadFormat::Structured => {
                self.connection = Some(socket);
                Ok(DispatchOutcome::Sent)
            }
        }
    }

    /// Close the held connection, if any
    pub async fn shutdown(&mut self) {
        if let Some(mut conn) = self.connection.take() {
            if let Err(e) = conn.close().await {
                tracing::error!(error = %e, "Error closing VNyan connection");
            }
            self.transition(ConnectionState::Closed);
            tracing::info!(port = self.port, "Disconnected from VNyan");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dispatcher_target_url() {
        let config = Configuration {
            ws_port: 8000,
            ..Configuration::default()
        };
        let dispatcher = Dispatcher::new(&config);
        assert_eq!(dispatcher.url(), "ws://localhost:8000/vnyan");
    }

    #[test]
    fn test_state_display() {
        assert_eq!(ConnectionState::Connecting.to_string(), "connecting");
        assert_eq!(ConnectionState::Error.to_string(), "error");
    }
}
