//! Shared application state for the bridge.
//!
//! Wires registry, hub, relay, heartbeat monitor, listener, and the command
//! gateway. Startup errors are returned, not panicked.

use std::sync::Arc;

use p5bridge_core::error::Result;

use crate::config::BridgeConfig;
use crate::gateway::CommandGateway;
use crate::realtime::{BroadcastRelay, HeartbeatMonitor, SessionRegistry, Transport};
use crate::transport::{TransportListener, WsHub};

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
    registry: Arc<SessionRegistry>,
    hub: Arc<WsHub>,
    monitor: Arc<HeartbeatMonitor>,
    listener: Arc<TransportListener>,
    gateway: Arc<CommandGateway>,
}

struct AppStateInner {
    cfg: BridgeConfig,
}

impl AppState {
    /// Build application state.
    /// Returns Result so main can handle errors gracefully (no panic).
    pub fn new(cfg: BridgeConfig) -> Result<Self> {
        let host = cfg.bridge.host_addr()?;

        let registry = Arc::new(SessionRegistry::new());
        let hub = Arc::new(WsHub::new());
        let transport: Arc<dyn Transport> = hub.clone();
        let relay = Arc::new(BroadcastRelay::new(Arc::clone(&registry), transport));
        let monitor = Arc::new(HeartbeatMonitor::new(
            Arc::clone(&registry),
            cfg.heartbeat.timeout(),
            cfg.heartbeat.sweep_interval(),
        ));
        let listener = Arc::new(TransportListener::new(host));
        let gateway = Arc::new(CommandGateway::new(
            relay,
            Arc::clone(&monitor),
            Arc::clone(&listener),
        ));

        Ok(Self {
            inner: Arc::new(AppStateInner { cfg }),
            registry,
            hub,
            monitor,
            listener,
            gateway,
        })
    }

    pub fn cfg(&self) -> &BridgeConfig {
        &self.inner.cfg
    }

    pub fn registry(&self) -> &SessionRegistry {
        &self.registry
    }

    pub fn hub(&self) -> &WsHub {
        &self.hub
    }

    pub fn monitor(&self) -> Arc<HeartbeatMonitor> {
        Arc::clone(&self.monitor)
    }

    pub fn listener(&self) -> Arc<TransportListener> {
        Arc::clone(&self.listener)
    }

    pub fn gateway(&self) -> Arc<CommandGateway> {
        Arc::clone(&self.gateway)
    }
}
