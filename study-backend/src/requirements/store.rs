//! Write-through JSON storage for the requirement document
//!
//! Owns `requirements.json` (full snapshot, rewritten on every change) and
//! `history.json` (append-only log of every change). Exports are written as
//! timestamped copies next to them and never touch the live document.

use super::error::StoreError;
use super::{file_ops, markdown};
use chrono::{Local, NaiveDateTime};
use parking_lot::Mutex;
use requirements_types::{
    ArchitectureEntry, ClarificationEntry, ExportDocument, HistoryEntry, ProjectSummary,
    RequirementCategory, RequirementDocument, RequirementEntry,
};
use serde_json::{json, Map, Value};
use std::path::{Path, PathBuf};

/// Local time with microseconds, the format entries have always been stored in
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";
const EXPORT_STAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

pub const HISTORY_CLARIFICATION: &str = "clarification";
pub const HISTORY_REQUIREMENT_UPDATE: &str = "requirement_update";
pub const HISTORY_ARCHITECTURE_DESIGN: &str = "architecture_design";

/// An appended entry, plus the write error if it could not be persisted.
///
/// The in-memory append is kept either way. `document` is the document as it
/// stood right after this append, taken under the same lock.
#[derive(Debug)]
pub struct Recorded<T> {
    pub entry: T,
    pub document: RequirementDocument,
    pub persist_error: Option<StoreError>,
}

impl<T> Recorded<T> {
    pub fn is_persisted(&self) -> bool {
        self.persist_error.is_none()
    }
}

/// Files written by a successful export
#[derive(Debug, Clone)]
pub struct ExportPaths {
    pub json_path: PathBuf,
    pub markdown_path: PathBuf,
    pub generated_at: String,
    /// The document that was written to both files
    pub document: RequirementDocument,
}

/// Requirement document store backed by two JSON files in `storage_dir`.
///
/// Every mutation holds the document lock from the in-memory append through
/// the snapshot write and the history read-modify-write, so concurrent tool
/// calls within one process cannot drop each other's history entries.
pub struct RequirementStore {
    storage_dir: PathBuf,
    requirements_file: PathBuf,
    history_file: PathBuf,
    document: Mutex<RequirementDocument>,
}

impl RequirementStore {
    /// Create the storage directory if needed and load the saved snapshot
    pub fn open(storage_dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let storage_dir = storage_dir.into();
        std::fs::create_dir_all(&storage_dir).map_err(|source| StoreError::Persist {
            path: storage_dir.clone(),
            source,
        })?;

        let requirements_file = storage_dir.join(file_ops::REQUIREMENTS_FILE);
        let history_file = storage_dir.join(file_ops::HISTORY_FILE);
        let document = Self::load(&requirements_file);

        Ok(Self {
            storage_dir,
            requirements_file,
            history_file,
            document: Mutex::new(document),
        })
    }

    /// Load the snapshot, falling back to an empty document on any failure
    fn load(path: &Path) -> RequirementDocument {
        match read_document(path) {
            Ok(Some(doc)) => {
                log::info!(
                    "[STORE] Loaded {} requirement(s), {} clarification(s), {} design(s) from {}",
                    doc.requirement_count(),
                    doc.clarification_history.len(),
                    doc.architecture_designs.len(),
                    path.display()
                );
                doc
            }
            Ok(None) => {
                log::info!("[STORE] No snapshot at {}, starting empty", path.display());
                RequirementDocument::default()
            }
            Err(e) => {
                log::warn!("[STORE] {}; starting with an empty document", e);
                RequirementDocument::default()
            }
        }
    }

    pub fn storage_dir(&self) -> &Path {
        &self.storage_dir
    }

    pub fn requirements_file(&self) -> &Path {
        &self.requirements_file
    }

    pub fn history_file(&self) -> &Path {
        &self.history_file
    }

    /// Append a requirement under the bucket its label maps to
    pub fn append_requirement(&self, category: &str, content: &str) -> Recorded<RequirementEntry> {
        let bucket = RequirementCategory::from_label(category);
        let mut doc = self.document.lock();

        let timestamp = next_timestamp(doc.last_updated.as_deref());
        let entry = RequirementEntry {
            timestamp: timestamp.clone(),
            category: category.to_string(),
            content: content.to_string(),
        };
        doc.entries_mut(bucket).push(entry.clone());
        doc.last_updated = Some(timestamp);

        log::info!(
            "[STORE] Recorded requirement in {} (label '{}', {} chars)",
            bucket,
            category,
            content.chars().count()
        );

        let mut metadata = Map::new();
        metadata.insert("category".to_string(), json!(category));
        metadata.insert("bucket".to_string(), json!(bucket.as_str()));

        let persist_error = self.commit(&doc, HISTORY_REQUIREMENT_UPDATE, content, metadata);
        Recorded {
            entry,
            document: doc.clone(),
            persist_error,
        }
    }

    pub fn append_clarification(&self, user_input: &str, context: &str) -> Recorded<ClarificationEntry> {
        let mut doc = self.document.lock();

        let timestamp = next_timestamp(doc.last_updated.as_deref());
        let entry = ClarificationEntry {
            timestamp: timestamp.clone(),
            user_input: user_input.to_string(),
            context: context.to_string(),
        };
        doc.clarification_history.push(entry.clone());
        doc.last_updated = Some(timestamp);

        log::info!(
            "[STORE] Recorded clarification #{}",
            doc.clarification_history.len()
        );

        let mut metadata = Map::new();
        metadata.insert("context".to_string(), json!(context));

        let persist_error = self.commit(&doc, HISTORY_CLARIFICATION, user_input, metadata);
        Recorded {
            entry,
            document: doc.clone(),
            persist_error,
        }
    }

    pub fn append_architecture_design(
        &self,
        design_focus: &str,
        rendered_text: &str,
    ) -> Recorded<ArchitectureEntry> {
        let mut doc = self.document.lock();

        let timestamp = next_timestamp(doc.last_updated.as_deref());
        let entry = ArchitectureEntry {
            timestamp: timestamp.clone(),
            design_focus: design_focus.to_string(),
            content: rendered_text.to_string(),
        };
        doc.architecture_designs.push(entry.clone());
        doc.last_updated = Some(timestamp);

        log::info!("[STORE] Recorded architecture design (focus '{}')", design_focus);

        let mut metadata = Map::new();
        metadata.insert("design_focus".to_string(), json!(design_focus));

        let persist_error =
            self.commit(&doc, HISTORY_ARCHITECTURE_DESIGN, rendered_text, metadata);
        Recorded {
            entry,
            document: doc.clone(),
            persist_error,
        }
    }

    /// Copy of the current document
    pub fn snapshot(&self) -> RequirementDocument {
        self.document.lock().clone()
    }

    /// Parsed contents of the history log
    pub fn history(&self) -> Result<Vec<HistoryEntry>, StoreError> {
        let _guard = self.document.lock();
        self.read_history_values()?
            .into_iter()
            .map(|value| {
                serde_json::from_value(value).map_err(|e| StoreError::History {
                    path: self.history_file.clone(),
                    reason: e.to_string(),
                })
            })
            .collect()
    }

    /// Write `final_document_<stamp>.json` and `final_document_<stamp>.md`.
    ///
    /// Both files are attempted independently; a failure of one does not
    /// remove the other. The error names the first file that failed.
    pub fn export_final(&self) -> Result<ExportPaths, StoreError> {
        let doc = self.snapshot();
        let now = Local::now().naive_local();
        let generated_at = format_timestamp(now);
        let stamp = now.format(EXPORT_STAMP_FORMAT).to_string();

        let json_path = self.storage_dir.join(file_ops::export_file_name(&stamp, "json"));
        let markdown_path = self.storage_dir.join(file_ops::export_file_name(&stamp, "md"));

        let export = ExportDocument {
            project_summary: ProjectSummary {
                generated_at: generated_at.clone(),
                project_id: doc.project_id.clone(),
                last_updated: doc.last_updated.clone(),
            },
            requirements: doc,
            export_format: "markdown".to_string(),
        };
        let json_body = serde_json::to_string_pretty(&export)?;
        let markdown_body = markdown::render_report(&export.requirements, &generated_at);

        let json_result = file_ops::write_text(&json_path, &json_body);
        let markdown_result = file_ops::write_text(&markdown_path, &markdown_body);

        match (json_result, markdown_result) {
            (Ok(()), Ok(())) => {
                log::info!(
                    "[STORE] Exported {} and {}",
                    json_path.display(),
                    markdown_path.display()
                );
                Ok(ExportPaths {
                    json_path,
                    markdown_path,
                    generated_at,
                    document: export.requirements,
                })
            }
            (Err(source), markdown_result) => {
                if let Err(e) = markdown_result {
                    log::error!("[STORE] Failed to write {}: {}", markdown_path.display(), e);
                }
                Err(StoreError::Export {
                    path: json_path,
                    source,
                })
            }
            (Ok(()), Err(source)) => Err(StoreError::Export {
                path: markdown_path,
                source,
            }),
        }
    }

    /// Persist the snapshot and log the change. Both are attempted; the
    /// first failure is returned.
    fn commit(
        &self,
        doc: &RequirementDocument,
        entry_type: &str,
        content: &str,
        metadata: Map<String, Value>,
    ) -> Option<StoreError> {
        let results = [
            self.persist(doc),
            self.append_history(entry_type, content, metadata),
        ];

        let mut first_error = None;
        for result in results {
            if let Err(e) = result {
                log::error!("[STORE] {}", e);
                if first_error.is_none() {
                    first_error = Some(e);
                }
            }
        }
        first_error
    }

    fn persist(&self, doc: &RequirementDocument) -> Result<(), StoreError> {
        let body = serde_json::to_string_pretty(doc)?;
        file_ops::write_text(&self.requirements_file, &body).map_err(|source| {
            StoreError::Persist {
                path: self.requirements_file.clone(),
                source,
            }
        })
    }

    /// Read the whole log, append one entry, rewrite the file.
    ///
    /// Callers hold the document lock.
    fn append_history(
        &self,
        entry_type: &str,
        content: &str,
        metadata: Map<String, Value>,
    ) -> Result<(), StoreError> {
        let mut history = self.read_history_values()?;

        let entry = HistoryEntry {
            timestamp: format_timestamp(Local::now().naive_local()),
            entry_type: entry_type.to_string(),
            content: content.to_string(),
            metadata,
        };
        history.push(serde_json::to_value(&entry)?);

        let body = serde_json::to_string_pretty(&history)?;
        file_ops::write_text(&self.history_file, &body).map_err(|source| StoreError::Persist {
            path: self.history_file.clone(),
            source,
        })
    }

    /// Raw history records. Entries are kept as JSON values so records this
    /// version cannot parse survive the rewrite.
    fn read_history_values(&self) -> Result<Vec<Value>, StoreError> {
        let history_error = |reason: String| StoreError::History {
            path: self.history_file.clone(),
            reason,
        };

        match file_ops::read_text(&self.history_file).map_err(|e| history_error(e.to_string()))? {
            None => Ok(Vec::new()),
            Some(text) if text.trim().is_empty() => Ok(Vec::new()),
            Some(text) => serde_json::from_str(&text).map_err(|e| history_error(e.to_string())),
        }
    }
}

fn read_document(path: &Path) -> Result<Option<RequirementDocument>, StoreError> {
    let load_error = |reason: String| StoreError::Load {
        path: path.to_path_buf(),
        reason,
    };

    match file_ops::read_text(path).map_err(|e| load_error(e.to_string()))? {
        None => Ok(None),
        Some(text) => serde_json::from_str(&text)
            .map(Some)
            .map_err(|e| load_error(e.to_string())),
    }
}

fn format_timestamp(time: NaiveDateTime) -> String {
    time.format(TIMESTAMP_FORMAT).to_string()
}

/// Current local time, never earlier than `previous`
fn next_timestamp(previous: Option<&str>) -> String {
    let now = Local::now().naive_local();
    let stamp = match previous.and_then(|p| p.parse::<NaiveDateTime>().ok()) {
        Some(prev) if prev > now => prev,
        _ => now,
    };
    format_timestamp(stamp)
}
