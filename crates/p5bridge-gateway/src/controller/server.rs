use std::sync::Arc;

use serde_json::{json, Value};
use thiserror::Error;
use tokio::io::{self, AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};

use crate::controller::protocol::{
    JsonRpcRequest, JsonRpcResponse, ERROR_INVALID_PARAMS, ERROR_INVALID_REQUEST,
    ERROR_METHOD_NOT_FOUND, ERROR_PARSE, JSONRPC_VERSION,
};
use crate::gateway::{Command, CommandGateway};

pub const PROTOCOL_VERSION: &str = "2024-11-05";

#[derive(Debug, Error)]
pub enum ControllerError {
    #[error("controller channel io: {0}")]
    Io(#[from] std::io::Error),
    #[error("response encode failed: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Newline-delimited JSON-RPC server exposing the command gateway as tools.
pub struct ControllerServer {
    gateway: Arc<CommandGateway>,
}

impl ControllerServer {
    pub fn new(gateway: Arc<CommandGateway>) -> Self {
        Self { gateway }
    }

    /// Serve the controller on stdin/stdout until stdin closes.
    pub async fn run_stdio(&self) -> Result<(), ControllerError> {
        self.serve(io::stdin(), io::stdout()).await
    }

    /// Serve one controller connection until the reader hits EOF.
    pub async fn serve<R, W>(&self, reader: R, mut writer: W) -> Result<(), ControllerError>
    where
        R: AsyncRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut reader = BufReader::new(reader);
        let mut line = String::new();

        loop {
            line.clear();
            if reader.read_line(&mut line).await? == 0 {
                tracing::info!("controller channel closed");
                break;
            }
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            if let Some(response) = self.handle_line(trimmed).await {
                let mut text = serde_json::to_string(&response)?;
                text.push('\n');
                writer.write_all(text.as_bytes()).await?;
                writer.flush().await?;
            }
        }
        Ok(())
    }

    async fn handle_line(&self, line: &str) -> Option<JsonRpcResponse> {
        let value: Value = match serde_json::from_str(line) {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!(error = %e, "failed to parse controller frame");
                return Some(JsonRpcResponse::error(None, ERROR_PARSE, "invalid json"));
            }
        };
        let request: JsonRpcRequest = match serde_json::from_value(value) {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(error = %e, "invalid JSON-RPC request");
                return Some(JsonRpcResponse::error(None, ERROR_INVALID_REQUEST, "invalid request"));
            }
        };
        if request.jsonrpc != JSONRPC_VERSION {
            return Some(JsonRpcResponse::error(
                request.id,
                ERROR_INVALID_REQUEST,
                "jsonrpc version must be 2.0",
            ));
        }
        self.handle_request(request).await
    }

    async fn handle_request(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        if request.is_notification() {
            tracing::debug!(method = %request.method, "controller notification");
            return None;
        }
        let id = request.id.unwrap_or(Value::Null);
        let params = request.params.unwrap_or_else(|| json!({}));

        let response = match request.method.as_str() {
            "initialize" => JsonRpcResponse::result(
                id,
                json!({
                    "protocolVersion": PROTOCOL_VERSION,
                    "capabilities": { "tools": {} },
                    "serverInfo": {
                        "name": "p5bridge",
                        "version": env!("CARGO_PKG_VERSION"),
                    }
                }),
            ),
            "ping" => JsonRpcResponse::result(id, json!({})),
            "tools/list" => JsonRpcResponse::result(id, json!({ "tools": Command::catalog() })),
            "tools/call" => {
                let Some(name) = params.get("name").and_then(Value::as_str) else {
                    return Some(JsonRpcResponse::error(
                        Some(id),
                        ERROR_INVALID_PARAMS,
                        "tool name missing",
                    ));
                };
                let arguments = params.get("arguments").cloned().unwrap_or(Value::Null);
                let reply = self.gateway.invoke_reply(name, &arguments).await;
                JsonRpcResponse::result(
                    id,
                    json!({
                        "content": [{ "type": "text", "text": reply.text }],
                        "isError": reply.is_error,
                    }),
                )
            }
            other => JsonRpcResponse::error(
                Some(id),
                ERROR_METHOD_NOT_FOUND,
                format!("method '{other}' not found"),
            ),
        };
        Some(response)
    }
}
