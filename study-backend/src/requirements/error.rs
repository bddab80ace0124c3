use std::io;
use std::path::PathBuf;

/// Failures of the requirement store.
///
/// None of these abort the process: load failures fall back to an empty
/// document, persist failures are reported next to the already-applied
/// in-memory change, export failures are returned to the caller as text.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to load {}: {reason}", path.display())]
    Load { path: PathBuf, reason: String },

    #[error("failed to write {}: {source}", path.display())]
    Persist {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("history log {} is unreadable, not overwriting it: {reason}", path.display())]
    History { path: PathBuf, reason: String },

    #[error("failed to export {}: {source}", path.display())]
    Export {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to serialize: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl StoreError {
    /// The file the failure relates to, if any
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            StoreError::Load { path, .. }
            | StoreError::Persist { path, .. }
            | StoreError::History { path, .. }
            | StoreError::Export { path, .. } => Some(path),
            StoreError::Serialize(_) => None,
        }
    }
}
