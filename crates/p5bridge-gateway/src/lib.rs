//! p5bridge gateway library entry.
//!
//! Wires the session registry, heartbeat monitor, broadcast relay, transport
//! listener, and command gateway into one bridge. Consumed by the binary
//! (`main.rs`) and by integration tests.

pub mod app_state;
pub mod config;
pub mod controller;
pub mod gateway;
pub mod ops;
pub mod realtime;
pub mod router;
pub mod transport;
