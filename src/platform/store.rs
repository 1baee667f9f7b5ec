// LogLens - platform/store.rs
//
// File-backed ledger slot: one JSON file holding the whole ledger array.
//
// - Writes are atomic (write temp, rename to final) so a crash during save
//   never corrupts the previous good ledger.
// - Load errors are logged and discarded: a missing or corrupt file is an
//   empty ledger.
// - The parent directory is created on first save.

use crate::core::history::{decode_slot, encode_slot, LedgerStore};
use crate::core::model::HistoryEntry;
use crate::util::error::LedgerError;
use std::path::{Path, PathBuf};

/// `LedgerStore` persisted to a single JSON file.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl LedgerStore for FileStore {
    fn load(&self) -> Vec<HistoryEntry> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) => decode_slot(Some(&content)),
            Err(e) => {
                // "Not found" is the normal first run.
                if e.kind() != std::io::ErrorKind::NotFound {
                    tracing::warn!(
                        path = %self.path.display(),
                        error = %e,
                        "Cannot read history file; treating as empty"
                    );
                }
                Vec::new()
            }
        }
    }

    fn save(&mut self, entries: &[HistoryEntry]) -> Result<(), LedgerError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|source| LedgerError::Io {
                    path: parent.to_path_buf(),
                    operation: "create directory",
                    source,
                })?;
            }
        }

        let json = encode_slot(entries)?;

        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json.as_bytes()).map_err(|source| LedgerError::Io {
            path: tmp.clone(),
            operation: "write temp file",
            source,
        })?;

        if let Err(source) = std::fs::rename(&tmp, &self.path) {
            // Clean up the temp file on failure; ignore any secondary error.
            let _ = std::fs::remove_file(&tmp);
            return Err(LedgerError::Io {
                path: self.path.clone(),
                operation: "rename",
                source,
            });
        }

        tracing::debug!(path = %self.path.display(), entries = entries.len(), "History saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::history::HistoryLedger;
    use crate::core::model::FileDescriptor;
    use tempfile::TempDir;

    fn file(name: &str) -> FileDescriptor {
        FileDescriptor {
            name: name.to_string(),
            size: 99,
            download_ref: name.to_string(),
        }
    }

    #[test]
    fn test_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path().join("none.json"));
        assert!(store.load().is_empty());
    }

    #[test]
    fn test_malformed_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("history.json");
        std::fs::write(&path, b"not valid json {{{{").unwrap();
        assert!(FileStore::new(&path).load().is_empty());
    }

    #[test]
    fn test_ledger_survives_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("history.json");

        let created = {
            let mut ledger = HistoryLedger::new(FileStore::new(&path));
            ledger.create(&file("a.log")).unwrap();
            ledger.create(&file("b.log")).unwrap()
        };

        let reopened = HistoryLedger::new(FileStore::new(&path));
        let list = reopened.list();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0], created);
    }

    /// A leftover temp file from an earlier crash must not break the next save.
    #[test]
    fn test_save_overwrites_stale_temp_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("history.json");
        std::fs::write(path.with_extension("json.tmp"), b"garbage").unwrap();

        let mut ledger = HistoryLedger::new(FileStore::new(&path));
        ledger.create(&file("a.log")).unwrap();

        assert_eq!(FileStore::new(&path).load().len(), 1);
        assert!(!path.with_extension("json.tmp").exists());
    }
}
