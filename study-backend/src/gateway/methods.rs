//! Handlers for the MCP methods the gateway answers

use crate::gateway::protocol::{error_codes, JsonRpcError, SUPPORTED_PROTOCOL_VERSIONS};
use crate::tools::{ToolContext, ToolError, ToolRegistry, ToolSafetyLevel};
use serde::Deserialize;
use serde_json::{json, Map, Value};

#[derive(Debug, Default, Deserialize)]
pub struct InitializeParams {
    #[serde(default, rename = "protocolVersion")]
    pub protocol_version: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ToolCallParams {
    pub name: String,
    #[serde(default)]
    pub arguments: Option<Value>,
}

/// Handle `initialize`
///
/// Echoes the client's protocol version when supported, otherwise offers the
/// newest one this server knows.
pub fn handle_initialize(params: InitializeParams, server_name: &str, instructions: &str) -> Value {
    let protocol_version = params
        .protocol_version
        .filter(|v| SUPPORTED_PROTOCOL_VERSIONS.contains(&v.as_str()))
        .unwrap_or_else(|| SUPPORTED_PROTOCOL_VERSIONS[0].to_string());

    log::info!("[GATEWAY] Session initialized (protocol {})", protocol_version);

    json!({
        "protocolVersion": protocol_version,
        "capabilities": {
            "tools": { "listChanged": false }
        },
        "serverInfo": {
            "name": server_name,
            "version": env!("CARGO_PKG_VERSION"),
        },
        "instructions": instructions,
    })
}

/// Handle `tools/list`
pub fn handle_tools_list(registry: &ToolRegistry) -> Value {
    let tools: Vec<Value> = registry
        .list()
        .iter()
        .map(|tool| {
            let mut entry = match serde_json::to_value(tool.definition()) {
                Ok(Value::Object(map)) => map,
                _ => Map::new(),
            };
            entry.insert(
                "annotations".to_string(),
                json!({ "readOnlyHint": tool.safety_level() == ToolSafetyLevel::ReadOnly }),
            );
            Value::Object(entry)
        })
        .collect();

    json!({ "tools": tools })
}

/// Handle `tools/call`
///
/// Tool failures come back as `isError` content; only an unknown tool name
/// becomes a protocol error.
pub async fn handle_tools_call(
    params: ToolCallParams,
    registry: &ToolRegistry,
    context: &ToolContext,
) -> Result<Value, JsonRpcError> {
    log::info!("[GATEWAY] tools/call {}", params.name);

    let arguments = params.arguments.unwrap_or_else(|| json!({}));
    let result = registry
        .execute(&params.name, arguments, context)
        .await
        .map_err(|e| match e {
            ToolError::UnknownTool(ref name) => {
                JsonRpcError::new(error_codes::INVALID_PARAMS, e.to_string())
                    .with_data(json!({ "tool": name }))
            }
        })?;

    let mut response = json!({
        "content": [{ "type": "text", "text": result.content }],
        "isError": !result.success,
    });
    if let Some(metadata) = result.metadata {
        response["_meta"] = metadata;
    }
    Ok(response)
}
