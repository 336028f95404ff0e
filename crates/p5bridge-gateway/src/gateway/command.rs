//! Controller-facing command set: parsing, validation, and the tool catalog.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use p5bridge_core::error::{BridgeError, Result};

use crate::gateway::samples::SampleKey;

/// One validated command invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    SendCode { code: String },
    StartExecution,
    StopExecution,
    ClearConsole,
    ToggleSidebar,
    UpdateProjectName { name: String },
    SendSample { sample: SampleKey },
    GetStatus,
    GetDebugInfo,
    PingSubscribers,
    SendDebugMessage,
    TestConnection,
    RefreshConnections,
    CheckHealth,
    SyncConnections,
}

#[derive(Debug, Deserialize)]
struct CodeArgs {
    code: String,
}

#[derive(Debug, Deserialize)]
struct NameArgs {
    name: String,
}

#[derive(Debug, Deserialize)]
struct SampleArgs {
    sample_name: String,
}

fn args<'a, T: Deserialize<'a>>(tool: &str, value: &'a Value) -> Result<T> {
    T::deserialize(value)
        .map_err(|e| BridgeError::InvalidArgument(format!("{tool}: {e}")))
}

impl Command {
    /// Parse a tool invocation. `arguments` may be `null` for tools without arguments.
    pub fn parse(tool: &str, arguments: &Value) -> Result<Self> {
        let cmd = match tool {
            "send_code" => {
                let a: CodeArgs = args(tool, arguments)?;
                if a.code.trim().is_empty() {
                    return Err(BridgeError::InvalidArgument("send_code: code must not be empty".into()));
                }
                Command::SendCode { code: a.code }
            }
            "start_execution" => Command::StartExecution,
            "stop_execution" => Command::StopExecution,
            "clear_console" => Command::ClearConsole,
            "toggle_sidebar" => Command::ToggleSidebar,
            "update_project_name" => {
                let a: NameArgs = args(tool, arguments)?;
                let name = a.name.trim();
                if name.is_empty() {
                    return Err(BridgeError::InvalidArgument(
                        "update_project_name: name must not be empty".into(),
                    ));
                }
                Command::UpdateProjectName { name: name.to_owned() }
            }
            "send_sample" => {
                let a: SampleArgs = args(tool, arguments)?;
                let sample = SampleKey::parse(a.sample_name.trim()).ok_or_else(|| {
                    BridgeError::InvalidArgument(format!(
                        "unknown sample '{}'. Available samples: {}",
                        a.sample_name,
                        SampleKey::available()
                    ))
                })?;
                Command::SendSample { sample }
            }
            "get_status" => Command::GetStatus,
            "get_debug_info" => Command::GetDebugInfo,
            "ping_subscribers" => Command::PingSubscribers,
            "send_debug_message" => Command::SendDebugMessage,
            "test_connection" => Command::TestConnection,
            "refresh_connections" => Command::RefreshConnections,
            "check_health" => Command::CheckHealth,
            "sync_connections" => Command::SyncConnections,
            other => {
                return Err(BridgeError::InvalidArgument(format!("unknown tool: {other}")));
            }
        };
        Ok(cmd)
    }

    /// Verb phrase used in failure messages ("Failed to <action>").
    pub fn action(&self) -> &'static str {
        match self {
            Command::SendCode { .. } => "send code",
            Command::StartExecution => "start execution",
            Command::StopExecution => "stop execution",
            Command::ClearConsole => "clear console",
            Command::ToggleSidebar => "toggle sidebar",
            Command::UpdateProjectName { .. } => "update project name",
            Command::SendSample { .. } => "send sample",
            Command::GetStatus => "get status",
            Command::GetDebugInfo => "collect debug info",
            Command::PingSubscribers => "ping editor sessions",
            Command::SendDebugMessage => "send debug message",
            Command::TestConnection => "test connection",
            Command::RefreshConnections => "refresh connections",
            Command::CheckHealth => "check health",
            Command::SyncConnections => "sync connections",
        }
    }

    /// Every tool the controller may call.
    pub fn catalog() -> Vec<ToolDescriptor> {
        let none = || json!({ "type": "object", "properties": {} });
        vec![
            ToolDescriptor::new(
                "send_code",
                "Send p5.js code to the web editor",
                json!({
                    "type": "object",
                    "properties": { "code": { "type": "string", "description": "p5.js sketch source" } },
                    "required": ["code"]
                }),
            ),
            ToolDescriptor::new("start_execution", "Start running the sketch in the editor", none()),
            ToolDescriptor::new("stop_execution", "Stop the running sketch", none()),
            ToolDescriptor::new("clear_console", "Clear the editor console", none()),
            ToolDescriptor::new("toggle_sidebar", "Toggle the editor sidebar", none()),
            ToolDescriptor::new(
                "update_project_name",
                "Rename the project in the editor",
                json!({
                    "type": "object",
                    "properties": { "name": { "type": "string" } },
                    "required": ["name"]
                }),
            ),
            ToolDescriptor::new(
                "send_sample",
                "Send a predefined sample sketch to the editor",
                json!({
                    "type": "object",
                    "properties": {
                        "sample_name": {
                            "type": "string",
                            "enum": SampleKey::ALL.map(SampleKey::as_str)
                        }
                    },
                    "required": ["sample_name"]
                }),
            ),
            ToolDescriptor::new("get_status", "Report bridge status and connected editor count", none()),
            ToolDescriptor::new("get_debug_info", "Detailed bridge and session diagnostics", none()),
            ToolDescriptor::new("ping_subscribers", "Send a test ping to every editor session", none()),
            ToolDescriptor::new("send_debug_message", "Write a debug line to the editor console", none()),
            ToolDescriptor::new("test_connection", "Send a test sketch plus a console message", none()),
            ToolDescriptor::new("refresh_connections", "Ask editors for project state and recount sessions", none()),
            ToolDescriptor::new("check_health", "Check listener and registry health", none()),
            ToolDescriptor::new("sync_connections", "Ping each editor session individually", none()),
        ]
    }
}

/// Tool entry for `tools/list`.
#[derive(Debug, Clone, Serialize)]
pub struct ToolDescriptor {
    pub name: &'static str,
    pub description: &'static str,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

impl ToolDescriptor {
    fn new(name: &'static str, description: &'static str, input_schema: Value) -> Self {
        Self {
            name,
            description,
            input_schema,
        }
    }
}
