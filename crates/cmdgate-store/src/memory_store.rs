//! Persistent key/value memory document
//!
//! A flat JSON object of string keys to string values. Updates read the whole
//! document, merge one key and rewrite it; the last writer of a key wins.

#![allow(clippy::result_large_err)]

use crate::document::{read_or_default, write_pretty};
use crate::errors::Result;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

pub type MemoryMap = BTreeMap<String, String>;

#[derive(Debug)]
pub struct MemoryStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl MemoryStore {
    /// Bind to a memory document; nothing is written until the first update
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whole document, empty when missing or unreadable
    pub fn snapshot(&self) -> MemoryMap {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        read_or_default(&self.path)
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.snapshot().remove(key)
    }

    /// Set one key, keeping every other key as it was
    pub fn update(&self, key: &str, value: &str) -> Result<()> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut memory: MemoryMap = read_or_default(&self.path);
        memory.insert(key.to_string(), value.to_string());
        write_pretty(&self.path, &memory)?;
        tracing::debug!(key = key, keys = memory.len(), "memory updated");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_missing_document_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = MemoryStore::new(dir.path().join("memory.json"));

        assert!(store.snapshot().is_empty());
        assert!(!store.path().exists());
    }

    #[test]
    fn test_last_writer_wins_per_key() {
        let dir = TempDir::new().unwrap();
        let store = MemoryStore::new(dir.path().join("memory.json"));

        store.update("other", "x").unwrap();
        store.update("k", "v1").unwrap();
        store.update("k", "v2").unwrap();

        assert_eq!(store.get("k").as_deref(), Some("v2"));
        assert_eq!(store.get("other").as_deref(), Some("x"));
        assert_eq!(store.snapshot().len(), 2);
    }

    #[test]
    fn test_corrupt_document_is_replaced_on_update() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("memory.json");
        fs::write(&path, "[1, 2, 3]").unwrap();
        let store = MemoryStore::new(&path);

        assert!(store.snapshot().is_empty());
        store.update("mode", "fast").unwrap();

        assert_eq!(store.get("mode").as_deref(), Some("fast"));
    }
}
