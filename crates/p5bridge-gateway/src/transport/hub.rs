//! WebSocket connection hub: the delivery side of the transport.
//!
//! Holds one outbound queue per open socket. The table says which sockets are
//! physically open; it never decides who is live (that is the registry's job).

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use axum::extract::ws::Message;
use dashmap::DashMap;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

use p5bridge_core::error::{BridgeError, Result};

use crate::realtime::{PreparedMsg, Transport, TransportDiagnostics};

/// Outbound queue depth per connection.
pub const OUTBOUND_QUEUE: usize = 256;

#[derive(Default)]
pub struct WsHub {
    conns: DashMap<String, mpsc::Sender<Message>>,
    seq: AtomicU64,
}

impl WsHub {
    pub fn new() -> Self {
        Self {
            conns: DashMap::new(),
            seq: AtomicU64::new(1),
        }
    }

    /// Fresh session id; never reused within this process.
    pub fn next_session_id(&self) -> String {
        let n = self.seq.fetch_add(1, Ordering::Relaxed);
        format!("sess-{n}")
    }

    pub fn attach(&self, session_id: &str, tx: mpsc::Sender<Message>) {
        self.conns.insert(session_id.to_owned(), tx);
    }

    pub fn detach(&self, session_id: &str) {
        self.conns.remove(session_id);
    }

    pub fn open_connections(&self) -> usize {
        self.conns.len()
    }
}

#[async_trait]
impl Transport for WsHub {
    /// Lossy: a full queue drops the message instead of waiting on a stalled editor.
    async fn deliver(&self, session_id: &str, msg: &PreparedMsg) -> Result<()> {
        let conn = self.conns.get(session_id).ok_or_else(|| {
            BridgeError::TransportFailure(format!("no open connection for {session_id}"))
        })?;
        conn.value()
            .try_send(msg.to_ws_message())
            .map_err(|e| match e {
                TrySendError::Full(_) => {
                    BridgeError::TransportFailure(format!("outbound queue full for {session_id}"))
                }
                TrySendError::Closed(_) => {
                    BridgeError::TransportFailure(format!("connection {session_id} closed"))
                }
            })
    }

    fn diagnostics(&self) -> TransportDiagnostics {
        let mut open_connections: Vec<String> =
            self.conns.iter().map(|e| e.key().clone()).collect();
        open_connections.sort();
        TransportDiagnostics { open_connections }
    }
}
