//! MCP gateway over newline-delimited JSON-RPC on stdin/stdout

pub mod methods;
pub mod protocol;

use crate::tools::{ToolContext, ToolRegistry};
use protocol::{
    error_codes, methods as rpc_methods, JsonRpcError, JsonRpcId, JsonRpcRequest,
    JsonRpcResponse, JSONRPC_VERSION,
};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

pub const DEFAULT_INSTRUCTIONS: &str = "AI需求分析和设计助手";

/// Serves the tool registry to a single MCP host
pub struct McpServer {
    registry: Arc<ToolRegistry>,
    context: ToolContext,
    server_name: String,
    instructions: String,
}

impl McpServer {
    pub fn new(registry: Arc<ToolRegistry>, context: ToolContext, server_name: impl Into<String>) -> Self {
        Self {
            registry,
            context,
            server_name: server_name.into(),
            instructions: DEFAULT_INSTRUCTIONS.to_string(),
        }
    }

    /// Serve the process's stdin/stdout until the host closes stdin
    pub async fn run_stdio(&self) -> std::io::Result<()> {
        let stdin = tokio::io::BufReader::new(tokio::io::stdin());
        let stdout = tokio::io::stdout();
        self.serve(stdin, stdout).await
    }

    /// Answer one request per input line, one response line per request.
    ///
    /// Requests are handled in order; a tool call finishes before the next
    /// line is read.
    pub async fn serve<R, W>(&self, reader: R, mut writer: W) -> std::io::Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        log::info!("[GATEWAY] Ready, waiting for requests on stdin");
        let mut lines = reader.lines();

        while let Some(line) = lines.next_line().await? {
            if line.trim().is_empty() {
                continue;
            }
            log::debug!("[GATEWAY] <- {}", line);

            let Some(response) = self.handle_line(&line).await else {
                continue;
            };

            let frame = match serde_json::to_string(&response) {
                Ok(f) => f,
                Err(e) => {
                    log::error!("[GATEWAY] Failed to serialize response: {}", e);
                    continue;
                }
            };
            log::debug!("[GATEWAY] -> {}", frame);
            writer.write_all(frame.as_bytes()).await?;
            writer.write_all(b"\n").await?;
            writer.flush().await?;
        }

        log::info!("[GATEWAY] Input closed, shutting down");
        Ok(())
    }

    /// Handle one raw frame. Notifications produce no response.
    pub async fn handle_line(&self, line: &str) -> Option<JsonRpcResponse> {
        let frame: Value = match serde_json::from_str(line) {
            Ok(v) => v,
            Err(e) => {
                log::warn!("[GATEWAY] Failed to parse frame: {}", e);
                return Some(JsonRpcResponse::error(
                    None,
                    error_codes::PARSE_ERROR,
                    format!("Parse error: {}", e),
                ));
            }
        };

        let request: JsonRpcRequest = match serde_json::from_value(frame.clone()) {
            Ok(r) => r,
            Err(e) => {
                log::warn!("[GATEWAY] Invalid request: {}", e);
                return Some(JsonRpcResponse::error(
                    JsonRpcId::from_frame(&frame),
                    error_codes::INVALID_REQUEST,
                    format!("Invalid request: {}", e),
                ));
            }
        };

        if request.jsonrpc != JSONRPC_VERSION {
            if request.is_notification() {
                return None;
            }
            return Some(JsonRpcResponse::error(
                request.id,
                error_codes::INVALID_REQUEST,
                "Invalid JSON-RPC version",
            ));
        }

        if request.is_notification() {
            log::debug!("[GATEWAY] Notification {}", request.method);
            return None;
        }

        if request.id == Some(JsonRpcId::Null) {
            log::warn!("[GATEWAY] Rejecting '{}' with a null id", request.method);
            return Some(JsonRpcResponse::error(
                request.id,
                error_codes::INVALID_REQUEST,
                "Request id must be a string or a number",
            ));
        }

        Some(self.dispatch(request).await)
    }

    async fn dispatch(&self, request: JsonRpcRequest) -> JsonRpcResponse {
        let id = request.id;
        let params = request.params;

        let result = match request.method.as_str() {
            rpc_methods::INITIALIZE => parse_params(params).map(|p| {
                methods::handle_initialize(p, &self.server_name, &self.instructions)
            }),
            rpc_methods::PING => Ok(json!({})),
            rpc_methods::TOOLS_LIST => Ok(methods::handle_tools_list(&self.registry)),
            rpc_methods::TOOLS_CALL => match parse_params(params) {
                Ok(p) => methods::handle_tools_call(p, &self.registry, &self.context).await,
                Err(e) => Err(e),
            },
            other => {
                log::warn!("[GATEWAY] Unknown method '{}'", other);
                Err(JsonRpcError::new(
                    error_codes::METHOD_NOT_FOUND,
                    format!("Method not found: {}", other),
                ))
            }
        };

        match result {
            Ok(value) => JsonRpcResponse::success(id, value),
            Err(error) => JsonRpcResponse::from_error(id, error),
        }
    }
}

/// Decode method params, treating absent params as an empty object
fn parse_params<T: DeserializeOwned>(params: Option<Value>) -> Result<T, JsonRpcError> {
    let params = match params {
        Some(Value::Null) | None => json!({}),
        Some(p) => p,
    };
    serde_json::from_value(params).map_err(|e| {
        JsonRpcError::new(error_codes::INVALID_PARAMS, format!("Invalid params: {}", e))
    })
}
