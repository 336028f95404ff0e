use std::sync::Arc;

use async_trait::async_trait;
use futures_util::stream::FuturesUnordered;
use futures_util::StreamExt;

use p5bridge_core::error::{BridgeError, Result};
use p5bridge_core::protocol::Event;

use crate::realtime::core::SessionRegistry;
use crate::realtime::types::{EmitReport, PreparedMsg, TransportDiagnostics};

/// Delivery substrate for outbound events.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Hand `msg` to one session's connection. Best-effort.
    async fn deliver(&self, session_id: &str, msg: &PreparedMsg) -> Result<()>;

    /// Snapshot of the transport's connection table. Never fed back into the registry.
    fn diagnostics(&self) -> TransportDiagnostics;
}

/// Broadcast relay: emit to every registered session, or to one.
pub struct BroadcastRelay {
    registry: Arc<SessionRegistry>,
    transport: Arc<dyn Transport>,
}

impl BroadcastRelay {
    pub fn new(registry: Arc<SessionRegistry>, transport: Arc<dyn Transport>) -> Self {
        Self { registry, transport }
    }

    pub fn registry(&self) -> &SessionRegistry {
        &self.registry
    }

    pub fn transport_diagnostics(&self) -> TransportDiagnostics {
        self.transport.diagnostics()
    }

    /// Emit to every registered session.
    ///
    /// Fails with `NoSubscribers` without touching the transport when the
    /// registry is empty. Per-session delivery failures are logged and dropped.
    pub async fn emit(&self, event: Event) -> Result<EmitReport> {
        // one snapshot decides both "anyone there?" and who receives
        let targets = self.registry.snapshot();
        if targets.is_empty() {
            tracing::info!(event = %event.name, "emit skipped: no subscribers");
            return Err(BridgeError::NoSubscribers);
        }
        let recipients = targets.len();
        let prepared = PreparedMsg::prepare(&event)?;

        let mut futs = FuturesUnordered::new();
        for id in targets {
            let prepared = &prepared;
            let transport = &self.transport;
            futs.push(async move {
                let res = transport.deliver(&id, prepared).await;
                (id, res)
            });
        }

        let mut delivered = 0;
        while let Some((id, res)) = futs.next().await {
            match res {
                Ok(()) => delivered += 1,
                Err(e) => {
                    tracing::warn!(session_id = %id, event = %prepared.name(), error = %e, "delivery dropped");
                }
            }
        }

        tracing::info!(event = %prepared.name(), recipients, delivered, "event emitted");
        Ok(EmitReport {
            recipients,
            delivered,
        })
    }

    /// Emit to one registered session.
    pub async fn emit_to(&self, session_id: &str, event: Event) -> Result<()> {
        if !self.registry.contains(session_id) {
            tracing::debug!(session_id = %session_id, event = %event.name, "emit_to unknown session");
            return Err(BridgeError::UnknownSession(session_id.to_owned()));
        }
        let prepared = PreparedMsg::prepare(&event)?;
        self.transport.deliver(session_id, &prepared).await?;
        tracing::debug!(session_id = %session_id, event = %prepared.name(), "event sent to session");
        Ok(())
    }
}
