//! A process-local store.

use super::{MemoStore, PageBlocks};
use crate::core::errors::OCRError;
use std::collections::HashMap;
use std::sync::RwLock;

/// Keeps pages in memory for the lifetime of the store.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    entries: RwLock<HashMap<String, PageBlocks>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl MemoStore for InMemoryStore {
    fn get(&self, key: &str) -> Option<PageBlocks> {
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        entries.get(key).cloned()
    }

    fn put(&self, key: &str, blocks: PageBlocks) -> Result<(), OCRError> {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        entries.insert(key.to_string(), blocks);
        Ok(())
    }

    fn clear(&self) -> Result<usize, OCRError> {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        let removed = entries.len();
        entries.clear();
        Ok(removed)
    }

    fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(|e| e.into_inner()).len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Block, LineRecord, NormalizedBox};

    #[test]
    fn test_put_get_clear() {
        let store = InMemoryStore::new();
        assert!(store.is_empty());
        assert!(store.get("page-1").is_none());

        let line = LineRecord::new("hi", NormalizedBox::new(0.1, 0.1, 0.2, 0.02), 0.9);
        let blocks: PageBlocks = vec![Block::passthrough(&line)].into();
        store.put("page-1", blocks.clone()).unwrap();
        assert_eq!(store.get("page-1").as_deref(), Some(&*blocks));
        assert_eq!(store.len(), 1);

        assert_eq!(store.clear().unwrap(), 1);
        assert!(store.get("page-1").is_none());
    }
}
