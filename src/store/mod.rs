//! Memoization stores for recognized pages.
//!
//! A store maps a page key (typically its source URL) to the blocks computed for it.
//! Each operation is atomic on its own; the recognition service adds single-flight
//! on top, so the store never sees concurrent writers for the same key.

pub mod json_file;
pub mod memory;

pub use json_file::{ImportSummary, JsonFileStore};
pub use memory::InMemoryStore;

use crate::core::errors::OCRError;
use crate::domain::Block;
use std::sync::Arc;

/// Blocks of one page as held by a store.
pub type PageBlocks = Arc<[Block]>;

/// A key to page-blocks mapping.
pub trait MemoStore: Send + Sync {
    /// Returns the blocks stored under `key`.
    fn get(&self, key: &str) -> Option<PageBlocks>;

    /// Stores `blocks` under `key`, replacing any previous entry.
    fn put(&self, key: &str, blocks: PageBlocks) -> Result<(), OCRError>;

    /// Removes every entry and returns how many there were.
    fn clear(&self) -> Result<usize, OCRError>;

    /// Number of stored pages.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
