//! Realtime runtime (egress engine) for the bridge.
//!
//! Session liveness plus serialize-once fan-out to editor sessions.

pub mod core;
pub mod types;

pub use core::{BroadcastRelay, HeartbeatMonitor, Session, SessionRegistry, Transport};
pub use types::{wall_clock_ms, EmitReport, PreparedMsg, TransportDiagnostics};
