//! Requirement clarifier tool
//!
//! Records what the user said, then hands the calling agent a fixed analysis
//! checklist to work through. No analysis happens here: the agent does it and
//! saves the outcome with `requirement_manager`.

use super::{persist_warning, require_store};
use crate::tools::registry::Tool;
use crate::tools::types::{
    PropertySchema, ToolContext, ToolDefinition, ToolInputSchema, ToolResult,
};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::HashMap;

pub struct RequirementClarifierTool {
    definition: ToolDefinition,
}

impl RequirementClarifierTool {
    pub fn new() -> Self {
        let mut properties = HashMap::new();

        properties.insert(
            "user_input".to_string(),
            PropertySchema::string("用户输入：用户对项目或需求的原始描述"),
        );
        properties.insert(
            "context".to_string(),
            PropertySchema::string("上下文：已知的项目背景或之前的对话要点")
                .with_default(json!("")),
        );

        RequirementClarifierTool {
            definition: ToolDefinition {
                name: "requirement_clarifier".to_string(),
                description: "需求澄清助手 - 分析用户需求完整性，主动发现不明确的地方".to_string(),
                input_schema: ToolInputSchema {
                    schema_type: "object".to_string(),
                    properties,
                    required: vec!["user_input".to_string()],
                },
            },
        }
    }
}

impl Default for RequirementClarifierTool {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Deserialize)]
struct ClarifierParams {
    user_input: String,
    #[serde(default)]
    context: Option<String>,
}

#[async_trait]
impl Tool for RequirementClarifierTool {
    fn definition(&self) -> ToolDefinition {
        self.definition.clone()
    }

    async fn execute(&self, params: Value, context: &ToolContext) -> ToolResult {
        let params: ClarifierParams = match serde_json::from_value(params) {
            Ok(p) => p,
            Err(e) => return ToolResult::error(format!("Invalid parameters: {}", e)),
        };

        let store = match require_store(context) {
            Ok(s) => s,
            Err(result) => return result,
        };

        let context_text = params.context.unwrap_or_default();
        let recorded = store.append_clarification(&params.user_input, &context_text);
        let mut output = render_analysis_prompt(&params.user_input, &context_text);
        output.push_str(&persist_warning(&recorded.persist_error));

        ToolResult::success(output).with_metadata(json!({
            "timestamp": recorded.entry.timestamp,
            "persisted": recorded.is_persisted(),
            "clarification_count": recorded.document.clarification_history.len(),
        }))
    }
}

/// The analysis task handed back to the calling agent
pub fn render_analysis_prompt(user_input: &str, context: &str) -> String {
    format!(
        r#"# 🔍 AI需求分析任务 - 必须完成

## 📝 用户输入
{user_input}

## 📋 当前上下文
{context}

## 🎯 你的分析任务（AI助手必须执行）

### 1. 项目类型识别
根据用户描述，判断项目类型：
- **Web应用**：网站、Web系统、在线平台
- **移动应用**：手机APP、移动端应用
- **桌面应用**：PC软件、桌面工具
- **小程序**：微信小程序、支付宝小程序
- **通用项目**：其他类型或混合项目

### 2. 需求完整性深度分析
检查以下关键维度是否明确：

**🎯 项目目标维度**
- 解决什么具体问题？
- 目标用户群体是谁？
- 预期达到什么效果？

**⚙️ 功能需求维度**
- 核心功能有哪些？（最重要的3-5个）
- 次要功能有哪些？
- 功能的优先级如何？

**🔧 技术需求维度**
- 有技术栈偏好吗？
- 性能要求如何？
- 兼容性要求？

**🎨 用户体验维度**
- 界面风格偏好？
- 交互方式要求？

**📊 规模和性能维度**
- 预期用户规模？
- 并发量要求？

**🚀 部署和维护维度**
- 部署环境偏好？
- 维护方式？

### 3. 智能澄清策略
生成2-3个最重要的澄清问题：
- 优先澄清对项目影响最大的方面
- 提供具体选项帮助用户理解
- 使用友好语言，避免过于技术化

## 📤 输出格式要求

**🔍 需求分析结果：**
- **项目类型**：[明确识别的类型]
- **已明确信息**：[用户已经清楚表达的需求点]
- **需要澄清**：[不明确、有歧义或缺失的关键信息]

**❓ 关键澄清问题：**
1. [最重要的澄清问题，包含选项]
2. [第二重要的问题，提供示例]
3. [第三个问题，如果需要的话]

**💡 专业建议：**
[基于分析给出的建议和提示]

**🎯 下一步指导：**
[告诉用户接下来应该如何回答或思考]

---
*重要提醒：每次澄清后，请使用 requirement_manager 工具保存明确的需求信息！*
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::requirements::RequirementStore;
    use std::sync::Arc;
    use tempfile::tempdir;

    #[test]
    fn test_clarifier_definition() {
        let tool = RequirementClarifierTool::new();
        let def = tool.definition();

        assert_eq!(def.name, "requirement_clarifier");
        assert_eq!(def.input_schema.required, vec!["user_input".to_string()]);
        assert_eq!(def.input_schema.properties["context"].default, Some(json!("")));
    }

    #[test]
    fn test_prompt_embeds_input_and_context() {
        let prompt = render_analysis_prompt("我想做一个AI聊天机器人网站", "Web应用开发");
        assert!(prompt.contains("## 📝 用户输入\n我想做一个AI聊天机器人网站\n"));
        assert!(prompt.contains("## 📋 当前上下文\nWeb应用开发\n"));
        assert!(prompt.contains("requirement_manager"));
    }

    #[test]
    fn test_prompt_keeps_braces_in_input() {
        let prompt = render_analysis_prompt("{\"json\": true}", "");
        assert!(prompt.contains("{\"json\": true}"));
    }

    #[tokio::test]
    async fn test_clarifier_records_and_returns_template() {
        let dir = tempdir().unwrap();
        let store = Arc::new(RequirementStore::open(dir.path()).unwrap());
        let context = ToolContext::new().with_requirement_store(store.clone());

        let result = RequirementClarifierTool::new()
            .execute(json!({"user_input": "做一个记账小程序"}), &context)
            .await;

        assert!(result.success);
        assert!(result.content.contains("做一个记账小程序"));
        assert!(!result.content.contains("⚠️"));
        assert_eq!(result.metadata.unwrap()["clarification_count"], 1);

        let doc = store.snapshot();
        assert_eq!(doc.clarification_history.len(), 1);
        assert_eq!(doc.clarification_history[0].context, "");
        assert_eq!(doc.requirement_count(), 0);
    }

    #[tokio::test]
    async fn test_clarifier_null_context_is_empty() {
        let dir = tempdir().unwrap();
        let store = Arc::new(RequirementStore::open(dir.path()).unwrap());
        let context = ToolContext::new().with_requirement_store(store.clone());

        let result = RequirementClarifierTool::new()
            .execute(json!({"user_input": "做一个博客", "context": null}), &context)
            .await;

        assert!(result.success);
        let doc = store.snapshot();
        assert_eq!(doc.clarification_history.len(), 1);
        assert_eq!(doc.clarification_history[0].context, "");
    }

    #[tokio::test]
    async fn test_clarifier_requires_user_input() {
        let dir = tempdir().unwrap();
        let store = Arc::new(RequirementStore::open(dir.path()).unwrap());
        let context = ToolContext::new().with_requirement_store(store.clone());

        let result = RequirementClarifierTool::new()
            .execute(json!({"context": "only context"}), &context)
            .await;

        assert!(!result.success);
        assert!(result.content.contains("Invalid parameters"));
        assert!(store.snapshot().clarification_history.is_empty());
    }

    #[tokio::test]
    async fn test_clarifier_without_store() {
        let result = RequirementClarifierTool::new()
            .execute(json!({"user_input": "x"}), &ToolContext::default())
            .await;
        assert!(!result.success);
    }
}
