//! Status report over the current requirement document

use super::{category_counts, require_store};
use crate::tools::registry::Tool;
use crate::tools::types::{
    ToolContext, ToolDefinition, ToolInputSchema, ToolResult, ToolSafetyLevel,
};
use async_trait::async_trait;
use requirements_types::{RequirementCategory, RequirementDocument};
use serde_json::{json, Value};
use std::fmt::Write;

/// Characters shown per entry before the preview is cut
pub const PREVIEW_CHARS: usize = 100;

/// Below this many requirements the report asks for more clarification
const MIN_REQUIREMENTS_FOR_DESIGN: usize = 3;

pub struct ViewRequirementsStatusTool {
    definition: ToolDefinition,
}

impl ViewRequirementsStatusTool {
    pub fn new() -> Self {
        ViewRequirementsStatusTool {
            definition: ToolDefinition {
                name: "view_requirements_status".to_string(),
                description: "查看需求状态 - 显示当前需求文档的完整状态和内容".to_string(),
                input_schema: ToolInputSchema::default(),
            },
        }
    }
}

impl Default for ViewRequirementsStatusTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for ViewRequirementsStatusTool {
    fn definition(&self) -> ToolDefinition {
        self.definition.clone()
    }

    async fn execute(&self, _params: Value, context: &ToolContext) -> ToolResult {
        let store = match require_store(context) {
            Ok(s) => s,
            Err(result) => return result,
        };

        let doc = store.snapshot();
        let mut output = render_status(&doc);

        output.push_str("\n## 💾 存储位置\n");
        let _ = writeln!(output, "- 存储目录：`{}`", store.storage_dir().display());
        let _ = writeln!(output, "- 需求文档：`{}`", store.requirements_file().display());
        let _ = writeln!(output, "- 历史记录：`{}`", store.history_file().display());

        ToolResult::success(output).with_metadata(json!({
            "total_requirements": doc.requirement_count(),
            "clarifications": doc.clarification_history.len(),
            "architecture_designs": doc.architecture_designs.len(),
            "last_updated": doc.last_updated,
            "history_entries": store.history().ok().map(|h| h.len()),
        }))
    }

    fn safety_level(&self) -> ToolSafetyLevel {
        ToolSafetyLevel::ReadOnly
    }
}

/// First `max` characters of `text`, with `...` appended when anything was cut
pub fn truncate_preview(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut preview: String = text.chars().take(max).collect();
    preview.push_str("...");
    preview
}

fn render_status(doc: &RequirementDocument) -> String {
    let total = doc.requirement_count();
    let mut output = String::from("# 📋 当前需求文档状态\n\n");

    output.push_str("## 📊 总体统计\n");
    let _ = writeln!(
        output,
        "- **最后更新**：{}",
        doc.last_updated.as_deref().unwrap_or("尚未更新")
    );
    output.push_str(&category_counts(doc));
    let _ = writeln!(output, "- **需求总数**：{} 条", total);
    let _ = writeln!(output, "- **澄清记录**：{} 条", doc.clarification_history.len());
    let _ = writeln!(output, "- **架构设计**：{} 个", doc.architecture_designs.len());

    output.push_str("\n## 📝 需求详情\n");
    for category in RequirementCategory::all() {
        let _ = writeln!(output, "\n### {}", category.label());
        let entries = doc.entries(category);
        if entries.is_empty() {
            output.push_str("（暂无）\n");
            continue;
        }
        for (i, entry) in entries.iter().enumerate() {
            let _ = writeln!(
                output,
                "{}. {}",
                i + 1,
                truncate_preview(&entry.content, PREVIEW_CHARS)
            );
        }
    }

    if !doc.architecture_designs.is_empty() {
        output.push_str("\n## 🏗️ 架构设计\n");
        for (i, design) in doc.architecture_designs.iter().enumerate() {
            let _ = writeln!(
                output,
                "{}. {}（{}）",
                i + 1,
                design.design_focus,
                design.timestamp
            );
        }
    }

    if !doc.clarification_history.is_empty() {
        output.push_str("\n## 💬 澄清记录\n");
        for (i, entry) in doc.clarification_history.iter().enumerate() {
            let _ = writeln!(
                output,
                "{}. {}",
                i + 1,
                truncate_preview(&entry.user_input, PREVIEW_CHARS)
            );
        }
    }

    output.push_str("\n## 🎯 下一步建议\n");
    output.push_str(&next_steps(total, doc.architecture_designs.len()));
    output
}

fn next_steps(total_requirements: usize, designs: usize) -> String {
    let needs_clarification = total_requirements < MIN_REQUIREMENTS_FOR_DESIGN;
    let needs_design = designs == 0;

    let mut steps = String::new();
    if needs_clarification {
        steps.push_str("- 需求信息还不够完整，建议继续使用 requirement_clarifier 澄清更多需求\n");
    }
    if needs_design {
        steps.push_str("- 尚未生成架构设计，可以使用 architecture_designer 生成技术架构方案\n");
    }
    if !needs_clarification && !needs_design {
        steps.push_str("- 需求和架构已基本完整，可以使用 export_final_document 导出最终文档\n");
    }
    steps
}
