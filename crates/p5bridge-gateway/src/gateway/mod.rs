//! Command gateway: the boundary consumed by the controller.
//!
//! Each invocation is parsed into a [`Command`], delegated to the broadcast
//! relay, and turned into a plain string. Nothing escapes this boundary: errors
//! become messages and panics inside a command are caught.

pub mod command;
pub mod samples;

use std::fmt::Write;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures_util::FutureExt;
use serde_json::Value;

use p5bridge_core::error::{BridgeError, Result};
use p5bridge_core::protocol::Event;

use crate::realtime::{wall_clock_ms, BroadcastRelay, EmitReport, HeartbeatMonitor};
use crate::transport::{ListenerPhase, TransportListener};

pub use command::{Command, ToolDescriptor};
pub use samples::SampleKey;

/// Controller-facing outcome of one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandReply {
    pub text: String,
    pub is_error: bool,
}

impl CommandReply {
    fn ok(text: String) -> Self {
        Self { text, is_error: false }
    }

    fn failed(text: String) -> Self {
        Self { text, is_error: true }
    }
}

pub struct CommandGateway {
    relay: Arc<BroadcastRelay>,
    monitor: Arc<HeartbeatMonitor>,
    listener: Arc<TransportListener>,
}

impl CommandGateway {
    pub fn new(
        relay: Arc<BroadcastRelay>,
        monitor: Arc<HeartbeatMonitor>,
        listener: Arc<TransportListener>,
    ) -> Self {
        Self {
            relay,
            monitor,
            listener,
        }
    }

    /// Run one tool invocation. Always yields a message.
    pub async fn invoke(&self, tool: &str, arguments: &Value) -> String {
        self.invoke_reply(tool, arguments).await.text
    }

    /// Like [`invoke`](Self::invoke), also saying whether the command failed.
    pub async fn invoke_reply(&self, tool: &str, arguments: &Value) -> CommandReply {
        tracing::info!(tool = %tool, "command invoked");

        let command = match Command::parse(tool, arguments) {
            Ok(c) => c,
            Err(e) => {
                tracing::info!(tool = %tool, error = %e, "command rejected");
                return CommandReply::failed(describe_failure("run command", &e));
            }
        };
        let action = command.action();

        match AssertUnwindSafe(self.execute(command)).catch_unwind().await {
            Ok(Ok(msg)) => {
                tracing::debug!(tool = %tool, result = %msg, "command done");
                CommandReply::ok(msg)
            }
            Ok(Err(e)) => {
                if e.is_recoverable() {
                    tracing::info!(tool = %tool, error = %e, "command not delivered");
                } else {
                    tracing::error!(tool = %tool, error = %e, "command failed");
                }
                CommandReply::failed(describe_failure(action, &e))
            }
            Err(_) => {
                tracing::error!(tool = %tool, "command panicked");
                CommandReply::failed(format!(
                    "Failed to {action}: unexpected internal error in the bridge"
                ))
            }
        }
    }

    /// Execute a parsed command.
    pub async fn execute(&self, command: Command) -> Result<String> {
        match command {
            Command::SendCode { code } => self.send_code(&code).await,
            Command::StartExecution => {
                let r = self.relay.emit(Event::start_execution()).await?;
                Ok(format!("Code execution started{}", recipients(r)))
            }
            Command::StopExecution => {
                let r = self.relay.emit(Event::stop_execution()).await?;
                Ok(format!("Code execution stopped{}", recipients(r)))
            }
            Command::ClearConsole => {
                let r = self.relay.emit(Event::clear_console()).await?;
                Ok(format!("Console cleared{}", recipients(r)))
            }
            Command::ToggleSidebar => {
                let r = self.relay.emit(Event::toggle_sidebar()).await?;
                Ok(format!("Sidebar toggled{}", recipients(r)))
            }
            Command::UpdateProjectName { name } => {
                let r = self.relay.emit(Event::update_project_name(&name)).await?;
                Ok(format!("Project name updated to '{name}'{}", recipients(r)))
            }
            Command::SendSample { sample } => {
                let sent = self.send_code(sample.code()).await?;
                Ok(format!("Sent '{}' sample. {sent}", sample.as_str()))
            }
            Command::GetStatus => Ok(self.status()),
            Command::GetDebugInfo => Ok(self.debug_info()),
            Command::PingSubscribers => {
                let r = self
                    .relay
                    .emit(Event::ping("bridge test ping", wall_clock_ms()))
                    .await?;
                Ok(format!(
                    "Ping sent to {} editor session(s). Check the editor console for the ping message.",
                    r.recipients
                ))
            }
            Command::SendDebugMessage => {
                let now = wall_clock_ms();
                let msg = format!("Debug message from bridge at {now}");
                let r = self
                    .relay
                    .emit(Event::add_console_message("info", &msg, now))
                    .await?;
                Ok(format!("Debug message sent to editor console{}", recipients(r)))
            }
            Command::TestConnection => {
                let r = self
                    .relay
                    .emit(Event::code_update(samples::CONNECTION_TEST))
                    .await?;
                self.relay
                    .emit(Event::add_console_message(
                        "info",
                        "Bridge connection test: code sent successfully",
                        wall_clock_ms(),
                    ))
                    .await?;
                Ok(format!(
                    "Connection test sent to {} editor session(s). Check the editor for the test sketch and console message.",
                    r.recipients
                ))
            }
            Command::RefreshConnections => self.refresh().await,
            Command::CheckHealth => Ok(self.health()),
            Command::SyncConnections => Ok(self.sync().await),
        }
    }

    async fn send_code(&self, code: &str) -> Result<String> {
        let r = self.relay.emit(Event::code_update(code)).await?;
        Ok(format!(
            "Sent code to {} editor session(s) ({} characters)",
            r.recipients,
            code.chars().count()
        ))
    }

    fn listener_line(&self) -> String {
        match (self.listener.phase(), self.listener.bound_port()) {
            (ListenerPhase::Running, Some(port)) => format!("running on {}:{port}", self.listener.host()),
            (phase, _) => phase.as_str().to_owned(),
        }
    }

    fn status(&self) -> String {
        self.monitor.sweep();
        let count = self.relay.registry().count();
        let listener = self.listener_line();
        if count > 0 {
            format!("Bridge {listener} with {count} connected editor session(s). Ready to send commands.")
        } else {
            format!(
                "Bridge {listener} but no editor sessions are connected. Open the editor with the bridge enabled."
            )
        }
    }

    fn debug_info(&self) -> String {
        self.monitor.sweep();
        let ids = self.relay.registry().snapshot();
        let diag = self.relay.transport_diagnostics();

        let mut out = String::from("Debug info:\n");
        let _ = writeln!(out, "  Listener: {}", self.listener_line());
        let _ = writeln!(
            out,
            "  Heartbeat timeout: {}s (sweep every {}ms)",
            self.monitor.timeout().as_secs(),
            self.monitor.interval().as_millis()
        );
        let _ = writeln!(out, "  Live sessions: {}", ids.len());
        if ids.is_empty() {
            let _ = writeln!(out, "  Session ids: none");
        } else {
            let list: Vec<&str> = ids.iter().map(String::as_str).collect();
            let _ = writeln!(out, "  Session ids: {}", list.join(", "));
        }
        let _ = write!(
            out,
            "  Open sockets (transport, diagnostic only): {}",
            diag.open_connections.len()
        );
        let stale: Vec<&str> = diag
            .open_connections
            .iter()
            .filter(|id| !ids.contains(*id))
            .map(String::as_str)
            .collect();
        if !stale.is_empty() {
            let _ = write!(out, "\n  Open but not live: {}", stale.join(", "));
        }
        out
    }

    fn health(&self) -> String {
        self.monitor.sweep();
        let phase = self.listener.phase();
        let mark = |ok: bool| if ok { "ok" } else { "FAIL" };
        let mut out = String::from("Server health:\n");
        let _ = writeln!(out, "  Listener: {} ({})", mark(phase == ListenerPhase::Running), self.listener_line());
        match self.listener.bound_port() {
            Some(port) => {
                let _ = writeln!(out, "  Port: {port}");
            }
            None => {
                let _ = writeln!(out, "  Port: not bound");
            }
        }
        let _ = write!(out, "  Live sessions: {}", self.relay.registry().count());
        out
    }

    async fn refresh(&self) -> Result<String> {
        self.monitor.sweep();
        let before = self.relay.registry().count();
        if before > 0 {
            match self.relay.emit(Event::get_project_state()).await {
                Ok(_) | Err(BridgeError::NoSubscribers) => {}
                Err(e) => return Err(e),
            }
        }
        self.monitor.sweep();
        let after = self.relay.registry().count();
        Ok(format!(
            "Connection refresh complete. Sessions before: {before}, after: {after}"
        ))
    }

    async fn sync(&self) -> String {
        self.monitor.sweep();
        let ids = self.relay.registry().snapshot();
        let mut reached = 0usize;
        for id in &ids {
            match self
                .relay
                .emit_to(id, Event::ping("bridge sync ping", wall_clock_ms()))
                .await
            {
                Ok(()) => reached += 1,
                Err(e) => tracing::warn!(session_id = %id, error = %e, "sync ping failed"),
            }
        }

        let mut out = String::from("Connection sync:\n");
        let _ = writeln!(out, "  Live sessions: {}", ids.len());
        let _ = write!(out, "  Pinged: {reached}");
        if !ids.is_empty() {
            let list: Vec<&str> = ids.iter().map(String::as_str).collect();
            let _ = write!(out, "\n  Session ids: {}", list.join(", "));
        }
        out
    }
}

fn recipients(r: EmitReport) -> String {
    format!(" ({} editor session(s))", r.recipients)
}

/// Controller-facing failure text. Distinguishes "nobody is listening" from
/// "the bridge is broken" and never includes internal detail beyond the error.
pub fn describe_failure(action: &str, e: &BridgeError) -> String {
    match e {
        BridgeError::NoSubscribers => format!(
            "No editor sessions connected [{}]: could not {action}. Make sure the editor is open with the bridge enabled.",
            e.kind().as_str()
        ),
        BridgeError::UnknownSession(id) => format!(
            "Editor session {id} is no longer connected [{}]",
            e.kind().as_str()
        ),
        BridgeError::InvalidArgument(msg) => {
            format!("Invalid arguments [{}]: {msg}", e.kind().as_str())
        }
        _ => format!("Failed to {action} [{}]: {e}", e.kind().as_str()),
    }
}
