//! File operations for the requirement store
//!
//! Whole-file reads and writes of the JSON and Markdown documents.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

pub const REQUIREMENTS_FILE: &str = "requirements.json";
pub const HISTORY_FILE: &str = "history.json";
pub const EXPORT_PREFIX: &str = "final_document_";

/// Write a text file in full (creates parent directories as needed)
pub fn write_text(path: &Path, content: &str) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = fs::File::create(path)?;
    file.write_all(content.as_bytes())?;
    file.flush()?;
    Ok(())
}

/// Read a text file, returning `None` if it does not exist
pub fn read_text(path: &Path) -> io::Result<Option<String>> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e),
    }
}

/// File name of an export artifact, e.g. `final_document_20250101_120000.md`
pub fn export_file_name(stamp: &str, extension: &str) -> String {
    format!("{}{}.{}", EXPORT_PREFIX, stamp, extension)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_write_and_read_text() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested/dir/doc.json");

        write_text(&path, "{\"k\": \"需求\"}").unwrap();
        let content = read_text(&path).unwrap().unwrap();
        assert_eq!(content, "{\"k\": \"需求\"}");
    }

    #[test]
    fn test_read_missing_file() {
        let dir = tempdir().unwrap();
        assert!(read_text(&dir.path().join("missing.json")).unwrap().is_none());
    }

    #[test]
    fn test_write_replaces_content() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("doc.json");

        write_text(&path, "a much longer first version").unwrap();
        write_text(&path, "short").unwrap();
        assert_eq!(read_text(&path).unwrap().unwrap(), "short");
    }

    #[test]
    fn test_export_file_name() {
        assert_eq!(
            export_file_name("20250101_120000", "md"),
            "final_document_20250101_120000.md"
        );
    }
}
