//! Protocol modules for the subscriber channel.
//!
//! - `event`: outbound events (bridge -> editor), `{"event": name, "data": payload}`.
//! - `inbound`: inbound envelopes (editor -> bridge) with lazily parsed `data`.
//!
//! Parsers are panic-free: malformed input is reported as `BridgeError`.

pub mod event;
pub mod inbound;

pub use event::{names, Event};
pub use inbound::{ClientEnvelope, ProjectState};
