use crate::tools::types::{ToolContext, ToolDefinition, ToolError, ToolResult, ToolSafetyLevel};
use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// Trait that all tools must implement
#[async_trait]
pub trait Tool: Send + Sync {
    /// Returns the tool definition advertised to the host
    fn definition(&self) -> ToolDefinition;

    /// Executes the tool with the given parameters
    async fn execute(&self, params: Value, context: &ToolContext) -> ToolResult;

    /// Returns the tool's name
    fn name(&self) -> String {
        self.definition().name.clone()
    }

    /// Tools that only read stored state override this with ReadOnly
    fn safety_level(&self) -> ToolSafetyLevel {
        ToolSafetyLevel::Standard
    }
}

/// Registry that holds all available tools.
pub struct ToolRegistry {
    tools: RwLock<HashMap<String, Arc<dyn Tool>>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        ToolRegistry {
            tools: RwLock::new(HashMap::new()),
        }
    }

    /// Register a tool, replacing any tool with the same name
    pub fn register(&self, tool: Arc<dyn Tool>) {
        let name = tool.definition().name.clone();
        if self.tools.write().insert(name.clone(), tool).is_some() {
            log::warn!("[REGISTRY] Replaced existing tool '{}'", name);
        }
    }

    /// Get a tool by name
    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.read().get(name).cloned()
    }

    /// All registered tools, sorted by name
    pub fn list(&self) -> Vec<Arc<dyn Tool>> {
        let mut tools: Vec<Arc<dyn Tool>> = self.tools.read().values().cloned().collect();
        tools.sort_by_key(|tool| tool.name());
        tools
    }

    /// Tool definitions, sorted by name
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.list().iter().map(|tool| tool.definition()).collect()
    }

    /// Execute a tool by name.
    ///
    /// An unregistered name is the only hard error; everything a tool
    /// reports, including its own failures, comes back as a [`ToolResult`].
    pub async fn execute(
        &self,
        name: &str,
        params: Value,
        context: &ToolContext,
    ) -> Result<ToolResult, ToolError> {
        let tool = match self.get(name) {
            Some(t) => t,
            None => {
                log::warn!("[REGISTRY] Call to unknown tool '{}'", name);
                return Err(ToolError::UnknownTool(name.to_string()));
            }
        };

        log::debug!("[REGISTRY] Executing '{}'", name);
        let result = tool.execute(params, context).await;
        if !result.success {
            log::warn!("[REGISTRY] Tool '{}' reported failure", name);
        }
        Ok(result)
    }

    /// Check if a tool exists
    pub fn has_tool(&self, name: &str) -> bool {
        self.tools.read().contains_key(name)
    }

    /// Get count of registered tools
    pub fn len(&self) -> usize {
        self.tools.read().len()
    }

    /// Check if registry is empty
    pub fn is_empty(&self) -> bool {
        self.tools.read().is_empty()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}
