pub mod builtin;
pub mod registry;
pub mod types;

pub use registry::ToolRegistry;
pub use types::{ToolContext, ToolError, ToolSafetyLevel};

use std::sync::Arc;

/// Create a registry with the five requirement-assistant tools
pub fn create_default_registry() -> ToolRegistry {
    let registry = ToolRegistry::new();

    registry.register(Arc::new(builtin::RequirementClarifierTool::new()));
    registry.register(Arc::new(builtin::RequirementManagerTool::new()));
    registry.register(Arc::new(builtin::ArchitectureDesignerTool::new()));
    registry.register(Arc::new(builtin::ExportFinalDocumentTool::new()));
    registry.register(Arc::new(builtin::ViewRequirementsStatusTool::new()));

    registry
}
