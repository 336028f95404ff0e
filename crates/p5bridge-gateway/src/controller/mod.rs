//! Controller surface: JSON-RPC 2.0 over stdio, one tool per gateway command.
//!
//! stdout carries protocol frames only; logs go to stderr.

pub mod protocol;
pub mod server;

pub use server::{ControllerError, ControllerServer};
