use crate::requirements::RequirementStore;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// JSON schema of a single tool parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertySchema {
    #[serde(rename = "type")]
    pub schema_type: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
}

impl PropertySchema {
    pub fn string(description: impl Into<String>) -> Self {
        PropertySchema {
            schema_type: "string".to_string(),
            description: description.into(),
            default: None,
        }
    }

    pub fn with_default(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }
}

/// JSON schema of a tool's arguments object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolInputSchema {
    #[serde(rename = "type")]
    pub schema_type: String,
    pub properties: HashMap<String, PropertySchema>,
    pub required: Vec<String>,
}

impl Default for ToolInputSchema {
    fn default() -> Self {
        ToolInputSchema {
            schema_type: "object".to_string(),
            properties: HashMap::new(),
            required: vec![],
        }
    }
}

/// Tool definition as advertised to the host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: ToolInputSchema,
}

/// Whether a tool changes stored state
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum ToolSafetyLevel {
    /// Appends to the requirement document or writes files
    #[default]
    Standard,
    /// Only reads the requirement document
    ReadOnly,
}

/// Outcome of a tool execution.
///
/// Failures are still text for the calling agent; only an unknown tool name
/// is a hard error (see [`ToolError`]).
#[derive(Debug, Clone, PartialEq)]
pub struct ToolResult {
    pub success: bool,
    pub content: String,
    pub metadata: Option<Value>,
}

impl ToolResult {
    pub fn success(content: impl Into<String>) -> Self {
        ToolResult {
            success: true,
            content: content.into(),
            metadata: None,
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        ToolResult {
            success: false,
            content: content.into(),
            metadata: None,
        }
    }

    pub fn with_metadata(mut self, metadata: Value) -> Self {
        self.metadata = Some(metadata);
        self
    }
}

/// Shared state handed to every tool execution
#[derive(Clone, Default)]
pub struct ToolContext {
    pub requirement_store: Option<Arc<RequirementStore>>,
}

impl ToolContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_requirement_store(mut self, store: Arc<RequirementStore>) -> Self {
        self.requirement_store = Some(store);
        self
    }
}

/// Dispatch failures that are not a tool's own result
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ToolError {
    #[error("Unknown tool: {0}")]
    UnknownTool(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_definition_serializes_as_mcp_tool() {
        let mut properties = HashMap::new();
        properties.insert(
            "design_focus".to_string(),
            PropertySchema::string("设计重点").with_default(json!("full_architecture")),
        );
        let def = ToolDefinition {
            name: "architecture_designer".to_string(),
            description: "desc".to_string(),
            input_schema: ToolInputSchema {
                properties,
                ..Default::default()
            },
        };

        let value = serde_json::to_value(&def).unwrap();
        assert_eq!(value["inputSchema"]["type"], "object");
        assert_eq!(
            value["inputSchema"]["properties"]["design_focus"]["default"],
            "full_architecture"
        );
        assert_eq!(value["inputSchema"]["properties"]["design_focus"]["type"], "string");
        assert!(value["inputSchema"]["required"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_property_without_default_omits_key() {
        let value = serde_json::to_value(PropertySchema::string("用户输入")).unwrap();
        assert!(value.get("default").is_none());
    }

    #[test]
    fn test_tool_result_constructors() {
        let ok = ToolResult::success("done").with_metadata(json!({"k": 1}));
        assert!(ok.success);
        assert_eq!(ok.metadata.unwrap()["k"], 1);

        let err = ToolResult::error("failed");
        assert!(!err.success);
        assert!(err.metadata.is_none());
    }
}
