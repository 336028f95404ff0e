//! p5bridge core: transport-agnostic event contracts and the error taxonomy.
//!
//! This crate defines the wire-level shapes exchanged with editor sessions and
//! the error surface shared by the gateway. It carries no transport or runtime
//! dependencies so the contracts can be reused by test tooling.
//!
//! # Guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! Malformed inbound frames surface as `BridgeError` instead.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod protocol;

pub use error::{BridgeError, ErrorKind, Result};
