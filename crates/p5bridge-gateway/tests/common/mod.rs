//! Shared fixtures for gateway integration tests.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]
#![allow(dead_code)]

use std::collections::HashSet;
use std::net::{IpAddr, Ipv4Addr};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::Duration;

use p5bridge_core::error::{BridgeError, Result};
use p5bridge_gateway::gateway::CommandGateway;
use p5bridge_gateway::realtime::{
    BroadcastRelay, HeartbeatMonitor, PreparedMsg, SessionRegistry, Transport,
    TransportDiagnostics,
};
use p5bridge_gateway::transport::TransportListener;

pub const LOCALHOST: IpAddr = IpAddr::V4(Ipv4Addr::LOCALHOST);

/// Records every delivery; can be told to fail or panic for chosen sessions.
#[derive(Default)]
pub struct RecordingTransport {
    sent: Mutex<Vec<(String, Value)>>,
    failing: Mutex<HashSet<String>>,
    panicking: Mutex<HashSet<String>>,
    extra_open: Mutex<Vec<String>>,
}

impl RecordingTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn fail_for(&self, id: &str) {
        self.failing.lock().unwrap().insert(id.to_owned());
    }

    pub fn panic_for(&self, id: &str) {
        self.panicking.lock().unwrap().insert(id.to_owned());
    }

    /// Pretend the transport has an open socket the registry does not know.
    pub fn add_open(&self, id: &str) {
        self.extra_open.lock().unwrap().push(id.to_owned());
    }

    pub fn sent(&self) -> Vec<(String, Value)> {
        self.sent.lock().unwrap().clone()
    }

    /// Event names delivered to `id`, in order.
    pub fn events_for(&self, id: &str) -> Vec<String> {
        self.sent()
            .into_iter()
            .filter(|(sid, _)| sid == id)
            .map(|(_, v)| v["event"].as_str().unwrap().to_owned())
            .collect()
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn deliver(&self, session_id: &str, msg: &PreparedMsg) -> Result<()> {
        if self.panicking.lock().unwrap().contains(session_id) {
            panic!("transport blew up for {session_id}");
        }
        if self.failing.lock().unwrap().contains(session_id) {
            return Err(BridgeError::TransportFailure(format!("{session_id} reset")));
        }
        let v: Value = serde_json::from_str(msg.as_text()).unwrap();
        self.sent.lock().unwrap().push((session_id.to_owned(), v));
        Ok(())
    }

    fn diagnostics(&self) -> TransportDiagnostics {
        let mut open: Vec<String> = self
            .sent()
            .into_iter()
            .map(|(id, _)| id)
            .collect();
        open.extend(self.extra_open.lock().unwrap().iter().cloned());
        open.sort();
        open.dedup();
        TransportDiagnostics {
            open_connections: open,
        }
    }
}

pub struct Bridge {
    pub registry: Arc<SessionRegistry>,
    pub transport: Arc<RecordingTransport>,
    pub relay: Arc<BroadcastRelay>,
    pub monitor: Arc<HeartbeatMonitor>,
    pub listener: Arc<TransportListener>,
    pub gateway: CommandGateway,
}

/// Core components wired to a recording transport; listener left idle.
pub fn bridge(timeout: Duration) -> Bridge {
    let registry = Arc::new(SessionRegistry::new());
    let transport = RecordingTransport::new();
    let relay = Arc::new(BroadcastRelay::new(
        Arc::clone(&registry),
        transport.clone() as Arc<dyn Transport>,
    ));
    let monitor = Arc::new(HeartbeatMonitor::new(
        Arc::clone(&registry),
        timeout,
        Duration::from_millis(20),
    ));
    let listener = Arc::new(TransportListener::new(LOCALHOST));
    let gateway = CommandGateway::new(Arc::clone(&relay), Arc::clone(&monitor), Arc::clone(&listener));
    Bridge {
        registry,
        transport,
        relay,
        monitor,
        listener,
        gateway,
    }
}

/// A port nothing is listening on right now.
pub fn free_port() -> u16 {
    let l = std::net::TcpListener::bind((LOCALHOST, 0)).unwrap();
    l.local_addr().unwrap().port()
}

/// Minimal HTTP/1.1 GET; returns the raw response.
pub async fn http_get(port: u16, path: &str) -> String {
    let mut stream = TcpStream::connect((LOCALHOST, port)).await.unwrap();
    let req = format!("GET {path} HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n");
    stream.write_all(req.as_bytes()).await.unwrap();
    let mut body = String::new();
    stream.read_to_string(&mut body).await.unwrap();
    body
}
