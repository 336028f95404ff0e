use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use axum::extract::ws::Message;

use p5bridge_core::error::{BridgeError, Result};
use p5bridge_core::protocol::Event;

/// Prepared message cached for broadcasting (serialize once, send N times).
#[derive(Debug, Clone)]
pub struct PreparedMsg {
    name: Arc<str>,
    text: Arc<str>,
}

impl PreparedMsg {
    pub fn prepare(event: &Event) -> Result<Self> {
        let text = serde_json::to_string(event)
            .map_err(|e| BridgeError::Internal(format!("json encode failed: {e}")))?;
        Ok(Self {
            name: Arc::from(event.name.as_str()),
            text: Arc::from(text),
        })
    }

    /// Event name, for logging.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn as_text(&self) -> &str {
        &self.text
    }

    /// Convert to axum::ws::Message for transport.
    pub fn to_ws_message(&self) -> Message {
        Message::Text(self.text.to_string())
    }
}

/// Outcome of a successful broadcast.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmitReport {
    /// Sessions registered when the emit started.
    pub recipients: usize,
    /// Sessions whose outbound queue accepted the message.
    pub delivered: usize,
}

/// Typed view of the transport's own connection table. Diagnostic output only.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransportDiagnostics {
    pub open_connections: Vec<String>,
}

/// Wall-clock milliseconds since the Unix epoch, for event timestamps.
pub fn wall_clock_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}
