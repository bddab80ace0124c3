mod architecture_designer;
mod export_final_document;
mod requirement_clarifier;
mod requirement_manager;
mod view_requirements_status;

pub use architecture_designer::ArchitectureDesignerTool;
pub use export_final_document::ExportFinalDocumentTool;
pub use requirement_clarifier::RequirementClarifierTool;
pub use requirement_manager::RequirementManagerTool;
pub use view_requirements_status::ViewRequirementsStatusTool;

use crate::requirements::{RequirementStore, StoreError};
use crate::tools::types::{ToolContext, ToolResult};
use requirements_types::{RequirementCategory, RequirementDocument};
use std::sync::Arc;

/// The store every builtin tool works against
fn require_store(context: &ToolContext) -> Result<Arc<RequirementStore>, ToolResult> {
    context.requirement_store.clone().ok_or_else(|| {
        ToolResult::error("Requirement store not available. The store must be initialized.")
    })
}

/// Note appended to a tool's output when the change was not written to disk
fn persist_warning(error: &Option<StoreError>) -> String {
    match error {
        Some(e) => format!(
            "\n> ⚠️ 保存到磁盘失败：{}\n> 本次更新仅保存在内存中，重启后会丢失。\n",
            e
        ),
        None => String::new(),
    }
}

/// One `- 类别：n 条` line per requirement bucket
fn category_counts(doc: &RequirementDocument) -> String {
    RequirementCategory::all()
        .map(|category| {
            format!(
                "- {}：{} 条\n",
                category.label(),
                doc.entries(category).len()
            )
        })
        .collect()
}
