//! Shared types for the requirement document store and the tools that read it.
//!
//! Field names here are the on-disk JSON keys of `requirements.json`,
//! `history.json` and the `final_document_*.json` exports.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use strum::{AsRefStr, EnumIter, IntoEnumIterator};

// =====================================================
// Categories
// =====================================================

/// The six canonical requirement buckets of a [`RequirementDocument`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, AsRefStr, EnumIter)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RequirementCategory {
    ProjectOverview,
    FunctionalRequirements,
    TechnicalRequirements,
    DesignRequirements,
    DeploymentRequirements,
    AiConstraints,
}

impl RequirementCategory {
    /// Map a caller-supplied category label to its bucket.
    ///
    /// Unknown labels land in `functional_requirements`.
    pub fn from_label(label: &str) -> Self {
        match label.trim() {
            "项目概述" | "project_overview" => Self::ProjectOverview,
            "功能需求" | "functional_requirements" => Self::FunctionalRequirements,
            "技术需求" | "technical_requirements" => Self::TechnicalRequirements,
            "设计需求" | "design_requirements" => Self::DesignRequirements,
            "部署需求" | "deployment_requirements" => Self::DeploymentRequirements,
            "AI约束" | "ai_constraints" => Self::AiConstraints,
            _ => Self::FunctionalRequirements,
        }
    }

    /// Key of this bucket in the document JSON
    pub fn as_str(&self) -> &str {
        self.as_ref()
    }

    /// Human-readable label, also accepted by [`RequirementCategory::from_label`]
    pub fn label(&self) -> &'static str {
        match self {
            Self::ProjectOverview => "项目概述",
            Self::FunctionalRequirements => "功能需求",
            Self::TechnicalRequirements => "技术需求",
            Self::DesignRequirements => "设计需求",
            Self::DeploymentRequirements => "部署需求",
            Self::AiConstraints => "AI约束",
        }
    }

    pub fn all() -> impl Iterator<Item = Self> {
        Self::iter()
    }
}

impl std::fmt::Display for RequirementCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// =====================================================
// Document Entries
// =====================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequirementEntry {
    pub timestamp: String,
    /// The label exactly as the caller supplied it, not the bucket name
    pub category: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClarificationEntry {
    pub timestamp: String,
    pub user_input: String,
    #[serde(default)]
    pub context: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArchitectureEntry {
    pub timestamp: String,
    pub design_focus: String,
    pub content: String,
}

// =====================================================
// Requirement Document
// =====================================================

/// The whole requirement document as persisted in `requirements.json`.
///
/// Every key is optional on load. Keys this version does not know about are
/// kept in `extra` and written back unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RequirementDocument {
    pub project_overview: Vec<RequirementEntry>,
    pub functional_requirements: Vec<RequirementEntry>,
    pub technical_requirements: Vec<RequirementEntry>,
    pub design_requirements: Vec<RequirementEntry>,
    pub deployment_requirements: Vec<RequirementEntry>,
    pub ai_constraints: Vec<RequirementEntry>,
    pub clarification_history: Vec<ClarificationEntry>,
    pub architecture_designs: Vec<ArchitectureEntry>,
    pub last_updated: Option<String>,
    pub project_id: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RequirementDocument {
    pub fn entries(&self, category: RequirementCategory) -> &[RequirementEntry] {
        match category {
            RequirementCategory::ProjectOverview => &self.project_overview,
            RequirementCategory::FunctionalRequirements => &self.functional_requirements,
            RequirementCategory::TechnicalRequirements => &self.technical_requirements,
            RequirementCategory::DesignRequirements => &self.design_requirements,
            RequirementCategory::DeploymentRequirements => &self.deployment_requirements,
            RequirementCategory::AiConstraints => &self.ai_constraints,
        }
    }

    pub fn entries_mut(&mut self, category: RequirementCategory) -> &mut Vec<RequirementEntry> {
        match category {
            RequirementCategory::ProjectOverview => &mut self.project_overview,
            RequirementCategory::FunctionalRequirements => &mut self.functional_requirements,
            RequirementCategory::TechnicalRequirements => &mut self.technical_requirements,
            RequirementCategory::DesignRequirements => &mut self.design_requirements,
            RequirementCategory::DeploymentRequirements => &mut self.deployment_requirements,
            RequirementCategory::AiConstraints => &mut self.ai_constraints,
        }
    }

    /// Number of entries across the six requirement buckets
    pub fn requirement_count(&self) -> usize {
        RequirementCategory::all()
            .map(|category| self.entries(category).len())
            .sum()
    }

    /// Requirements plus clarifications plus architecture designs
    pub fn total_entries(&self) -> usize {
        self.requirement_count() + self.clarification_history.len() + self.architecture_designs.len()
    }
}

// =====================================================
// History Log
// =====================================================

/// One record of `history.json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub timestamp: String,
    #[serde(rename = "type")]
    pub entry_type: String,
    pub content: String,
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

// =====================================================
// Export
// =====================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectSummary {
    pub generated_at: String,
    pub project_id: Option<String>,
    pub last_updated: Option<String>,
}

/// Body of a `final_document_<stamp>.json` export
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportDocument {
    pub project_summary: ProjectSummary,
    pub requirements: RequirementDocument,
    pub export_format: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_category_lookup() {
        assert_eq!(RequirementCategory::from_label("项目概述"), RequirementCategory::ProjectOverview);
        assert_eq!(RequirementCategory::from_label(" 技术需求 "), RequirementCategory::TechnicalRequirements);
        assert_eq!(RequirementCategory::from_label("AI约束"), RequirementCategory::AiConstraints);
        assert_eq!(RequirementCategory::from_label("deployment_requirements"), RequirementCategory::DeploymentRequirements);
        assert_eq!(
            RequirementCategory::from_label("unrecognized-category-xyz"),
            RequirementCategory::FunctionalRequirements
        );
        assert_eq!(RequirementCategory::from_label(""), RequirementCategory::FunctionalRequirements);
    }

    #[test]
    fn test_category_keys_match_document_fields() {
        let doc = serde_json::to_value(RequirementDocument::default()).unwrap();
        for category in RequirementCategory::all() {
            assert!(doc.get(category.as_str()).is_some(), "missing key {}", category);
            assert_eq!(RequirementCategory::from_label(category.label()), category);
        }
        assert_eq!(RequirementCategory::all().count(), 6);
    }

    #[test]
    fn test_partial_document_merges_over_defaults() {
        let doc: RequirementDocument = serde_json::from_value(json!({
            "project_overview": [
                {"timestamp": "2025-01-01T10:00:00.000000", "category": "项目概述", "content": "聊天机器人"}
            ],
            "last_updated": "2025-01-01T10:00:00.000000",
            "future_field": {"nested": true}
        }))
        .unwrap();

        assert_eq!(doc.project_overview.len(), 1);
        assert!(doc.functional_requirements.is_empty());
        assert!(doc.architecture_designs.is_empty());
        assert_eq!(doc.project_id, None);
        assert_eq!(doc.extra["future_field"], json!({"nested": true}));

        let written = serde_json::to_value(&doc).unwrap();
        assert_eq!(written["future_field"], json!({"nested": true}));
        assert!(written["project_id"].is_null());
    }

    #[test]
    fn test_counts() {
        let mut doc = RequirementDocument::default();
        let entry = RequirementEntry {
            timestamp: "t".to_string(),
            category: "x".to_string(),
            content: "c".to_string(),
        };
        doc.entries_mut(RequirementCategory::AiConstraints).push(entry.clone());
        doc.entries_mut(RequirementCategory::ProjectOverview).push(entry);
        doc.clarification_history.push(ClarificationEntry {
            timestamp: "t".to_string(),
            user_input: "u".to_string(),
            context: String::new(),
        });

        assert_eq!(doc.requirement_count(), 2);
        assert_eq!(doc.total_entries(), 3);
    }

    #[test]
    fn test_history_entry_type_key() {
        let entry = HistoryEntry {
            timestamp: "t".to_string(),
            entry_type: "clarification".to_string(),
            content: "c".to_string(),
            metadata: Map::new(),
        };
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["type"], "clarification");
    }
}
