//! WebSocket transport to the local VNyan endpoint
//!
//! One outbound frame per triggered event; no response is read or awaited.
//! No timeout or cancellation exists here: a hung connection attempt is
//! never aborted, matching the dispatcher's no-retry contract.

use anyhow::{Context, Result};
use futures_util::SinkExt;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::protocol::Message as WsMessage;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

/// Build the VNyan endpoint URI for a local port
pub fn ws_url(port: u16) -> String {
    format!("ws://localhost:{}/vnyan", port)
}

/// A single client connection to VNyan
///
/// Owned by the dispatcher's one connection slot; dropped when closed.
pub struct VNyanSocket {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
    open: bool,
}

impl VNyanSocket {
    /// Connect to the given ws:// URL
    pub async fn connect(url: &str) -> Result<Self> {
        // Validate the URI shape before handing it to the connector
        url::Url::parse(url).with_context(|| format!("Invalid WebSocket URL: {}", url))?;

        let (stream, _response) = connect_async(url)
            .await
            .with_context(|| format!("Failed to connect to {}", url))?;

        Ok(Self { stream, open: true })
    }

    /// Send one text frame
    pub async fn send_text(&mut self, text: String) -> Result<()> {
        if let Err(e) = self.stream.send(WsMessage::Text(text)).await {
            self.open = false;
            return Err(e).context("Failed to send frame");
        }
        Ok(())
    }

    /// Whether the connection is still usable for sending
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Close the connection with a normal close handshake
    pub async fn close(&mut self) -> Result<()> {
        self.open = false;
        self.stream
            .close(None)
            .await
            .context("Failed to close connection")?;
        Ok(())
    }
}
