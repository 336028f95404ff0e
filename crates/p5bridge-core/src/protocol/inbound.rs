//! Inbound envelope (editor -> bridge).
//!
//! `data` is kept as `RawValue` so the session loop only parses the payloads
//! it actually inspects.

use serde::Deserialize;
use serde_json::value::RawValue;

use crate::error::{BridgeError, Result};

/// Text frame sent by an editor session.
#[derive(Debug, Deserialize)]
pub struct ClientEnvelope {
    /// Event name (e.g. `ping`, `projectState`).
    pub event: String,
    /// Optional payload, stored as raw JSON (lazy parsing).
    #[serde(default)]
    pub data: Option<Box<RawValue>>,
}

impl ClientEnvelope {
    pub fn parse(text: &str) -> Result<Self> {
        serde_json::from_str(text)
            .map_err(|e| BridgeError::InvalidArgument(format!("invalid envelope json: {e}")))
    }

    /// Parse `data` as `T`. A missing payload is an error.
    pub fn data_as<'a, T: Deserialize<'a>>(&'a self) -> Result<T> {
        let raw = self.data.as_ref().ok_or_else(|| {
            BridgeError::InvalidArgument(format!("{} requires data", self.event))
        })?;
        serde_json::from_str(raw.get())
            .map_err(|e| BridgeError::InvalidArgument(format!("{} invalid data: {e}", self.event)))
    }
}

/// Project snapshot reported by the editor in reply to `getProjectState`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectState {
    #[serde(default)]
    pub project_name: Option<String>,
    #[serde(default)]
    pub files: Vec<serde_json::Value>,
}

impl ProjectState {
    pub fn display_name(&self) -> &str {
        self.project_name.as_deref().unwrap_or("Unknown")
    }
}
