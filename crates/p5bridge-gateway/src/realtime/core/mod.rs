//! Realtime core components.
//!
//! Session registry, heartbeat monitor, and the broadcast relay with its
//! transport seam.

mod heartbeat;
mod relay;
mod session_registry;

pub use heartbeat::HeartbeatMonitor;
pub use relay::{BroadcastRelay, Transport};
pub use session_registry::{Session, SessionRegistry};
