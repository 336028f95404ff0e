//! Transport layer (WebSocket).
//!
//! The listener owns the bound port; the hub owns per-connection outbound
//! queues; `ws` runs one loop per editor session; `codec` decodes frames once.

pub mod codec;
pub mod hub;
pub mod listener;
pub mod ws;

pub use hub::WsHub;
pub use listener::{ListenerPhase, TransportListener};
