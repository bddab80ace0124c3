//! Writes the final JSON and Markdown copies of the requirement document

use super::{category_counts, require_store};
use crate::tools::registry::Tool;
use crate::tools::types::{ToolContext, ToolDefinition, ToolInputSchema, ToolResult};
use async_trait::async_trait;
use serde_json::{json, Value};

pub struct ExportFinalDocumentTool {
    definition: ToolDefinition,
}

impl ExportFinalDocumentTool {
    pub fn new() -> Self {
        ExportFinalDocumentTool {
            definition: ToolDefinition {
                name: "export_final_document".to_string(),
                description: "导出最终文档 - 将完整的需求和架构设计导出为 JSON 和 Markdown 文件"
                    .to_string(),
                input_schema: ToolInputSchema::default(),
            },
        }
    }
}

impl Default for ExportFinalDocumentTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for ExportFinalDocumentTool {
    fn definition(&self) -> ToolDefinition {
        self.definition.clone()
    }

    async fn execute(&self, _params: Value, context: &ToolContext) -> ToolResult {
        let store = match require_store(context) {
            Ok(s) => s,
            Err(result) => return result,
        };

        let paths = match store.export_final() {
            Ok(p) => p,
            Err(e) => {
                let failed = e
                    .path()
                    .map(|p| p.display().to_string())
                    .unwrap_or_default();
                return ToolResult::error(format!(
                    "# ❌ 文档导出失败\n\n- 失败文件：`{}`\n- 原因：{}\n\n需求数据仍保存在 `{}`，可以稍后重试导出。",
                    failed,
                    e,
                    store.requirements_file().display()
                ));
            }
        };

        let doc = &paths.document;
        let output = format!(
            "# 📄 最终文档已导出\n\n\
             ## 📊 文档统计\n\
             {}\
             - **需求总数**：{} 条\n\
             - **澄清记录**：{} 条\n\
             - **架构设计**：{} 个\n\n\
             ## 📁 导出文件\n\
             - JSON：`{}`\n\
             - Markdown：`{}`\n\n\
             **生成时间**：{}\n",
            category_counts(doc),
            doc.requirement_count(),
            doc.clarification_history.len(),
            doc.architecture_designs.len(),
            paths.json_path.display(),
            paths.markdown_path.display(),
            paths.generated_at,
        );

        ToolResult::success(output).with_metadata(json!({
            "json_path": paths.json_path.to_string_lossy(),
            "markdown_path": paths.markdown_path.to_string_lossy(),
            "generated_at": paths.generated_at,
            "total_requirements": doc.requirement_count(),
        }))
    }
}
