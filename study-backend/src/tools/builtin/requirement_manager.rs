//! Saves a clarified requirement under its category

use super::{category_counts, persist_warning, require_store};
use crate::tools::registry::Tool;
use crate::tools::types::{
    PropertySchema, ToolContext, ToolDefinition, ToolInputSchema, ToolResult,
};
use async_trait::async_trait;
use requirements_types::RequirementCategory;
use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::HashMap;

pub struct RequirementManagerTool {
    definition: ToolDefinition,
}

impl RequirementManagerTool {
    pub fn new() -> Self {
        let mut properties = HashMap::new();

        properties.insert(
            "clarified_info".to_string(),
            PropertySchema::string("澄清信息：已经和用户确认的需求内容"),
        );
        properties.insert(
            "category".to_string(),
            PropertySchema::string(
                "信息类别：项目概述、功能需求、技术需求、设计需求、部署需求、AI约束（其他类别归入功能需求）",
            ),
        );

        RequirementManagerTool {
            definition: ToolDefinition {
                name: "requirement_manager".to_string(),
                description: "需求文档管理器 - 实时更新和维护结构化的需求文档".to_string(),
                input_schema: ToolInputSchema {
                    schema_type: "object".to_string(),
                    properties,
                    required: vec!["clarified_info".to_string(), "category".to_string()],
                },
            },
        }
    }
}

impl Default for RequirementManagerTool {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Deserialize)]
struct ManagerParams {
    clarified_info: String,
    category: String,
}

#[async_trait]
impl Tool for RequirementManagerTool {
    fn definition(&self) -> ToolDefinition {
        self.definition.clone()
    }

    async fn execute(&self, params: Value, context: &ToolContext) -> ToolResult {
        let params: ManagerParams = match serde_json::from_value(params) {
            Ok(p) => p,
            Err(e) => return ToolResult::error(format!("Invalid parameters: {}", e)),
        };

        let store = match require_store(context) {
            Ok(s) => s,
            Err(result) => return result,
        };

        let bucket = RequirementCategory::from_label(&params.category);
        let recorded = store.append_requirement(&params.category, &params.clarified_info);
        let doc = &recorded.document;
        let total = doc.requirement_count();

        let output = format!(
            "# ✅ 需求文档已更新\n\n\
             ## 📝 更新信息\n\
             - **类别**：{} → {}（`{}`）\n\
             - **内容**：{}\n\
             - **时间**：{}\n\n\
             ## 📊 当前需求统计\n\
             {}\
             - **需求总数**：{} 条\n\n\
             ## 💾 存储位置\n\
             - 需求文档：`{}`\n\
             - 历史记录：`{}`\n\n\
             ## 🎯 下一步建议\n\
             继续使用 requirement_clarifier 完善其他需求信息，或在需求完整后使用 architecture_designer 生成架构设计。\n{}",
            params.category,
            bucket.label(),
            bucket,
            params.clarified_info,
            recorded.entry.timestamp,
            category_counts(doc),
            total,
            store.requirements_file().display(),
            store.history_file().display(),
            persist_warning(&recorded.persist_error),
        );

        ToolResult::success(output).with_metadata(json!({
            "category": params.category,
            "bucket": bucket.as_str(),
            "total_requirements": total,
            "persisted": recorded.is_persisted(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::requirements::RequirementStore;
    use std::sync::Arc;
    use tempfile::tempdir;

    fn context_with_store() -> (tempfile::TempDir, Arc<RequirementStore>, ToolContext) {
        let dir = tempdir().unwrap();
        let store = Arc::new(RequirementStore::open(dir.path()).unwrap());
        let context = ToolContext::new().with_requirement_store(store.clone());
        (dir, store, context)
    }

    #[test]
    fn test_manager_definition() {
        let def = RequirementManagerTool::new().definition();
        assert_eq!(def.name, "requirement_manager");
        assert!(def.input_schema.required.contains(&"clarified_info".to_string()));
        assert!(def.input_schema.required.contains(&"category".to_string()));
    }

    #[tokio::test]
    async fn test_manager_records_in_mapped_bucket() {
        let (_dir, store, context) = context_with_store();

        let result = RequirementManagerTool::new()
            .execute(
                json!({"clarified_info": "项目类型：Web应用，目标：创建AI聊天机器人网站", "category": "项目概述"}),
                &context,
            )
            .await;

        assert!(result.success);
        assert!(result.content.contains("项目概述：1 条"));
        assert!(result.content.contains("**需求总数**：1 条"));
        assert!(result.content.contains("requirements.json"));
        assert_eq!(result.metadata.unwrap()["bucket"], "project_overview");
        assert_eq!(store.snapshot().project_overview.len(), 1);
    }

    #[tokio::test]
    async fn test_manager_unknown_category_falls_back() {
        let (_dir, store, context) = context_with_store();

        let result = RequirementManagerTool::new()
            .execute(
                json!({"clarified_info": "Y", "category": "unrecognized-category-xyz"}),
                &context,
            )
            .await;

        assert!(result.success);
        assert!(result.content.contains("`functional_requirements`"));
        assert_eq!(store.snapshot().functional_requirements.len(), 1);
    }

    #[tokio::test]
    async fn test_manager_repeated_calls_append() {
        let (_dir, store, context) = context_with_store();
        let tool = RequirementManagerTool::new();
        let params = json!({"clarified_info": "同样的内容", "category": "技术需求"});

        tool.execute(params.clone(), &context).await;
        let result = tool.execute(params, &context).await;

        assert!(result.content.contains("**需求总数**：2 条"));
        assert_eq!(store.snapshot().technical_requirements.len(), 2);
    }

    #[tokio::test]
    async fn test_manager_write_failure_keeps_append() {
        let (_dir, store, context) = context_with_store();
        // A directory where the snapshot file should be makes the write fail
        std::fs::create_dir(store.requirements_file()).unwrap();

        let result = RequirementManagerTool::new()
            .execute(json!({"clarified_info": "离线可用", "category": "技术需求"}), &context)
            .await;

        assert!(result.success);
        assert!(result.content.contains("保存到磁盘失败"));
        assert!(result.content.contains("**需求总数**：1 条"));
        assert_eq!(result.metadata.unwrap()["persisted"], false);
        assert_eq!(store.snapshot().technical_requirements.len(), 1);
    }

    #[tokio::test]
    async fn test_manager_missing_category() {
        let (_dir, store, context) = context_with_store();

        let result = RequirementManagerTool::new()
            .execute(json!({"clarified_info": "no category"}), &context)
            .await;

        assert!(!result.success);
        assert_eq!(store.snapshot().requirement_count(), 0);
    }
}
