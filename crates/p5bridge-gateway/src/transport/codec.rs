//! Decode-once codec for the subscriber channel.
//!
//! - Text frames => ClientEnvelope (lazy `RawValue` for data)
//! - Ping/Pong/Close are surfaced for lifecycle management
//! - Binary frames are not part of the protocol and are reported by size only

use axum::extract::ws::Message;
use p5bridge_core::{error::Result, protocol::ClientEnvelope};

#[derive(Debug)]
pub enum Inbound {
    Event(ClientEnvelope),
    Binary { bytes_len: usize },
    Ping(Vec<u8>),
    Pong,
    Close,
}

pub fn decode(msg: Message) -> Result<Inbound> {
    match msg {
        Message::Text(s) => Ok(Inbound::Event(ClientEnvelope::parse(&s)?)),
        Message::Binary(b) => Ok(Inbound::Binary { bytes_len: b.len() }),
        Message::Ping(v) => Ok(Inbound::Ping(v)),
        Message::Pong(_) => Ok(Inbound::Pong),
        Message::Close(_) => Ok(Inbound::Close),
    }
}
