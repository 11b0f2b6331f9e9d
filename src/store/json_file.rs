//! A store persisted as one JSON object file.
//!
//! The file maps page keys to block arrays. It is read once when the store is
//! opened and rewritten after every change.

use super::{MemoStore, PageBlocks};
use crate::core::errors::{OCRError, ProcessingStage};
use crate::domain::Block;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::RwLock;

/// Outcome of merging another store file into this one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    /// Keys that were not present before.
    pub added: usize,
    /// Entries after the import.
    pub total: usize,
}

/// A [`MemoStore`] backed by a JSON file.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    entries: RwLock<HashMap<String, PageBlocks>>,
}

fn parse_entries(contents: &str) -> Result<HashMap<String, PageBlocks>, OCRError> {
    let value: serde_json::Value = serde_json::from_str(contents)?;
    if !value.is_object() {
        return Err(OCRError::invalid_input(
            "store file must contain a JSON object of page keys",
        ));
    }
    let raw: HashMap<String, Vec<Block>> = serde_json::from_value(value)?;
    Ok(raw
        .into_iter()
        .map(|(key, blocks)| (key, PageBlocks::from(blocks)))
        .collect())
}

fn write_entries(path: &Path, entries: &HashMap<String, PageBlocks>) -> Result<(), OCRError> {
    let ordered: BTreeMap<&str, &[Block]> = entries
        .iter()
        .map(|(key, blocks)| (key.as_str(), &**blocks))
        .collect();
    let json = serde_json::to_string_pretty(&ordered)?;

    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, json)?;
    std::fs::rename(&tmp, path)?;
    Ok(())
}

impl JsonFileStore {
    /// Opens the store at `path`, loading existing entries.
    ///
    /// A missing file gives an empty store. A file that is not a valid store is
    /// logged and ignored; it is overwritten on the next change.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, OCRError> {
        let path = path.into();
        let entries = if path.exists() {
            let contents = std::fs::read_to_string(&path)?;
            match parse_entries(&contents) {
                Ok(entries) => {
                    tracing::info!(path = %path.display(), items = entries.len(), "loaded store");
                    entries
                }
                Err(err) => {
                    tracing::warn!(
                        path = %path.display(),
                        error = %err,
                        "could not decode store file, starting empty"
                    );
                    HashMap::new()
                }
            }
        } else {
            tracing::info!(path = %path.display(), "no store file, starting empty");
            HashMap::new()
        };
        Ok(Self {
            path,
            entries: RwLock::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Adds entries from another store file, keeping existing keys untouched.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be read or is not a JSON object of block arrays.
    pub fn import(&self, source: impl AsRef<Path>) -> Result<ImportSummary, OCRError> {
        let contents = std::fs::read_to_string(source.as_ref())?;
        let imported = parse_entries(&contents)?;

        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        let mut added = 0;
        for (key, blocks) in imported {
            if !entries.contains_key(&key) {
                entries.insert(key, blocks);
                added += 1;
            }
        }
        if added > 0 {
            self.persist(&entries)?;
        }
        let summary = ImportSummary {
            added,
            total: entries.len(),
        };
        tracing::info!(added = summary.added, total = summary.total, "imported store entries");
        Ok(summary)
    }

    /// Writes every entry to `target`. Returns the number of entries written.
    pub fn export(&self, target: impl AsRef<Path>) -> Result<usize, OCRError> {
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        write_entries(target.as_ref(), &entries)?;
        Ok(entries.len())
    }

    fn persist(&self, entries: &HashMap<String, PageBlocks>) -> Result<(), OCRError> {
        write_entries(&self.path, entries).map_err(|e| {
            OCRError::processing_error(
                ProcessingStage::Storage,
                format!("saving {}", self.path.display()),
                e,
            )
        })
    }
}

impl MemoStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<PageBlocks> {
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        entries.get(key).cloned()
    }

    fn put(&self, key: &str, blocks: PageBlocks) -> Result<(), OCRError> {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        entries.insert(key.to_string(), blocks);
        self.persist(&entries)
    }

    fn clear(&self) -> Result<usize, OCRError> {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        let removed = entries.len();
        entries.clear();
        self.persist(&entries)?;
        tracing::info!(removed, "purged store");
        Ok(removed)
    }

    fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(|e| e.into_inner()).len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{LineRecord, NormalizedBox};

    fn blocks(text: &str) -> PageBlocks {
        let line = LineRecord::new(text, NormalizedBox::new(0.1, 0.1, 0.3, 0.02), 0.95);
        vec![Block::passthrough(&line)].into()
    }

    #[test]
    fn test_put_persists_and_reloads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ocr-cache.json");

        let store = JsonFileStore::open(&path).unwrap();
        assert!(store.is_empty());
        store.put("https://host/page/0", blocks("first")).unwrap();
        drop(store);

        let reopened = JsonFileStore::open(&path).unwrap();
        assert_eq!(reopened.len(), 1);
        let page = reopened.get("https://host/page/0").unwrap();
        assert_eq!(page[0].text, "first");
    }

    #[test]
    fn test_undecodable_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ocr-cache.json");
        std::fs::write(&path, "{ not json").unwrap();

        let store = JsonFileStore::open(&path).unwrap();
        assert!(store.is_empty());
        store.put("k", blocks("x")).unwrap();
        assert_eq!(JsonFileStore::open(&path).unwrap().len(), 1);
    }

    #[test]
    fn test_import_adds_only_new_keys() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::open(dir.path().join("cache.json")).unwrap();
        store.put("a", blocks("original")).unwrap();

        let other = JsonFileStore::open(dir.path().join("other.json")).unwrap();
        other.put("a", blocks("replacement")).unwrap();
        other.put("b", blocks("new")).unwrap();

        let summary = store.import(other.path()).unwrap();
        assert_eq!(summary, ImportSummary { added: 1, total: 2 });
        assert_eq!(store.get("a").unwrap()[0].text, "original");
        assert_eq!(store.get("b").unwrap()[0].text, "new");
    }

    #[test]
    fn test_import_rejects_non_object() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::open(dir.path().join("cache.json")).unwrap();
        let bad = dir.path().join("bad.json");
        std::fs::write(&bad, "[1, 2, 3]").unwrap();
        assert!(matches!(
            store.import(&bad),
            Err(OCRError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_export_and_clear() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::open(dir.path().join("cache.json")).unwrap();
        store.put("a", blocks("one")).unwrap();
        store.put("b", blocks("two")).unwrap();

        let exported = dir.path().join("export.json");
        assert_eq!(store.export(&exported).unwrap(), 2);
        assert_eq!(JsonFileStore::open(&exported).unwrap().len(), 2);

        assert_eq!(store.clear().unwrap(), 2);
        assert!(JsonFileStore::open(store.path()).unwrap().is_empty());
    }
}
