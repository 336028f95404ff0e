//! Outbound events (bridge -> editor sessions).
//!
//! Each event is one WebSocket text frame: `{"event": "<name>", "data": <payload>}`.
//! `data` is omitted when the event carries no payload.

use serde::Serialize;
use serde_json::{json, Value};

/// Event names understood by the editor.
pub mod names {
    pub const CODE_UPDATE: &str = "codeUpdate";
    pub const START_EXECUTION: &str = "startExecution";
    pub const STOP_EXECUTION: &str = "stopExecution";
    pub const CLEAR_CONSOLE: &str = "clearConsole";
    pub const TOGGLE_SIDEBAR: &str = "toggleSidebar";
    pub const UPDATE_PROJECT_NAME: &str = "updateProjectName";
    pub const ADD_CONSOLE_MESSAGE: &str = "addConsoleMessage";
    pub const PING: &str = "ping";
    pub const GET_PROJECT_STATE: &str = "getProjectState";
    pub const WELCOME: &str = "welcome";
    pub const PONG: &str = "pong";
}

/// One outbound event. Fire-and-forget: no acknowledgment is modeled.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Event {
    #[serde(rename = "event")]
    pub name: String,
    #[serde(rename = "data", skip_serializing_if = "Option::is_none")]
    pub payload: Option<Value>,
}

impl Event {
    pub fn new(name: impl Into<String>, payload: Option<Value>) -> Self {
        Self {
            name: name.into(),
            payload,
        }
    }

    /// Event without payload.
    pub fn bare(name: impl Into<String>) -> Self {
        Self::new(name, None)
    }

    pub fn code_update(code: &str) -> Self {
        Self::new(names::CODE_UPDATE, Some(json!({ "code": code })))
    }

    pub fn start_execution() -> Self {
        Self::bare(names::START_EXECUTION)
    }

    pub fn stop_execution() -> Self {
        Self::bare(names::STOP_EXECUTION)
    }

    pub fn clear_console() -> Self {
        Self::bare(names::CLEAR_CONSOLE)
    }

    pub fn toggle_sidebar() -> Self {
        Self::bare(names::TOGGLE_SIDEBAR)
    }

    /// The project name travels as a bare JSON string, not an object.
    pub fn update_project_name(name: &str) -> Self {
        Self::new(names::UPDATE_PROJECT_NAME, Some(Value::String(name.to_owned())))
    }

    /// `kind` is the console level shown by the editor (`info`, `warn`, `error`).
    pub fn add_console_message(kind: &str, message: &str, timestamp_ms: u64) -> Self {
        Self::new(
            names::ADD_CONSOLE_MESSAGE,
            Some(json!({
                "type": kind,
                "message": message,
                "timestamp": timestamp_ms,
            })),
        )
    }

    pub fn ping(message: &str, timestamp_ms: u64) -> Self {
        Self::new(
            names::PING,
            Some(json!({
                "message": message,
                "timestamp": timestamp_ms,
            })),
        )
    }

    pub fn get_project_state() -> Self {
        Self::bare(names::GET_PROJECT_STATE)
    }

    pub fn welcome(session_id: &str, server_time_ms: u64) -> Self {
        Self::new(
            names::WELCOME,
            Some(json!({
                "message": "Connected to p5.js bridge relay",
                "server_time": server_time_ms,
                "session_id": session_id,
            })),
        )
    }

    pub fn pong(server_time_ms: u64) -> Self {
        Self::new(
            names::PONG,
            Some(json!({
                "server_time": server_time_ms,
                "message": "pong from bridge relay",
            })),
        )
    }
}
