//! Persistent command queue
//!
//! The queue is one JSON array document. Every operation holds the store's
//! mutex and an exclusive advisory lock on a sibling `<name>.lock` file for
//! its whole read-modify-write, so an append racing a drain either lands in
//! the drained snapshot or in the document left behind, never in neither.
//! The file lock extends that to other handles and other processes opening
//! the same document.

#![allow(clippy::result_large_err)]

use crate::document::{read_or_default, write_pretty};
use crate::errors::{io_error, lock_error, Result};
use cmdgate_core::{log_op_end, log_op_error, log_op_start};
use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Instant;

/// Queue document shared by the ingress gateway and the dispatcher
#[derive(Debug)]
pub struct QueueStore {
    path: PathBuf,
    lock_path: PathBuf,
    lock: Mutex<()>,
}

/// Held for the duration of one queue operation
struct QueueGuard<'a> {
    _thread: MutexGuard<'a, ()>,
    file: File,
}

impl Drop for QueueGuard<'_> {
    fn drop(&mut self) {
        let _ = fs2::FileExt::unlock(&self.file);
    }
}

fn lock_path_for(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".lock");
    path.with_file_name(name)
}

impl QueueStore {
    /// Open the queue at `path`, creating an empty document if absent
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| io_error("queue_open", e))?;
            }
        }

        let store = Self {
            lock_path: lock_path_for(&path),
            path,
            lock: Mutex::new(()),
        };
        {
            let _guard = store.guard("queue_open")?;
            if !store.path.exists() {
                write_pretty(&store.path, &Vec::<String>::new())?;
            }
        }
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Sibling file carrying the cross-process lock
    pub fn lock_path(&self) -> &Path {
        &self.lock_path
    }

    fn guard(&self, operation: &str) -> Result<QueueGuard<'_>> {
        let thread = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .truncate(false)
            .open(&self.lock_path)
            .map_err(|e| lock_error(operation, &self.lock_path, e))?;
        fs2::FileExt::lock_exclusive(&file)
            .map_err(|e| lock_error(operation, &self.lock_path, e))?;
        Ok(QueueGuard {
            _thread: thread,
            file,
        })
    }

    fn read(&self) -> Vec<String> {
        read_or_default(&self.path)
    }

    /// Append a command at the tail
    pub fn append(&self, command: &str) -> Result<()> {
        let start = Instant::now();
        log_op_start!("queue_append", command = command);

        let result = self.guard("queue_append").and_then(|_guard| {
            let mut commands = self.read();
            commands.push(command.to_string());
            write_pretty(&self.path, &commands)?;
            Ok(commands.len())
        });

        match result {
            Ok(queue_len) => {
                log_op_end!(
                    "queue_append",
                    duration_ms = start.elapsed().as_millis() as u64,
                    queue_len = queue_len
                );
                Ok(())
            }
            Err(err) => {
                log_op_error!(
                    "queue_append",
                    err.clone(),
                    duration_ms = start.elapsed().as_millis() as u64
                );
                Err(err)
            }
        }
    }

    /// Take every queued command and reset the document to empty
    ///
    /// An empty queue is left untouched and not logged. If the lock cannot
    /// be taken nothing is drained.
    ///
    /// If the reset fails the snapshot is still returned, so the commands
    /// may be delivered again on the next drain.
    pub fn snapshot_and_clear(&self) -> Vec<String> {
        let start = Instant::now();
        let _guard = match self.guard("queue_drain") {
            Ok(guard) => guard,
            Err(err) => {
                log_op_start!("queue_drain");
                log_op_error!(
                    "queue_drain",
                    err,
                    duration_ms = start.elapsed().as_millis() as u64
                );
                return Vec::new();
            }
        };
        let commands = self.read();
        if commands.is_empty() {
            return commands;
        }
        log_op_start!("queue_drain");

        if let Err(err) = write_pretty(&self.path, &Vec::<String>::new()) {
            log_op_error!(
                "queue_drain",
                err,
                duration_ms = start.elapsed().as_millis() as u64,
                queue_len = commands.len()
            );
            return commands;
        }

        log_op_end!(
            "queue_drain",
            duration_ms = start.elapsed().as_millis() as u64,
            queue_len = commands.len()
        );
        commands
    }

    /// Put drained but unprocessed commands back at the head, in order
    pub fn requeue_front(&self, commands: &[String]) -> Result<()> {
        if commands.is_empty() {
            return Ok(());
        }
        let start = Instant::now();
        log_op_start!("queue_requeue", queue_len = commands.len());

        let result = self.guard("queue_requeue").and_then(|_guard| {
            let mut restored = commands.to_vec();
            restored.extend(self.read());
            write_pretty(&self.path, &restored)?;
            Ok(restored.len())
        });

        match result {
            Ok(queue_len) => {
                log_op_end!(
                    "queue_requeue",
                    duration_ms = start.elapsed().as_millis() as u64,
                    queue_len = queue_len
                );
                Ok(())
            }
            Err(err) => {
                log_op_error!(
                    "queue_requeue",
                    err.clone(),
                    duration_ms = start.elapsed().as_millis() as u64
                );
                Err(err)
            }
        }
    }

    /// Current contents without mutation
    pub fn peek(&self) -> Vec<String> {
        let _guard = match self.guard("queue_peek") {
            Ok(guard) => Some(guard),
            Err(err) => {
                tracing::warn!(
                    err.code = err.code(),
                    error = %err,
                    "queue lock unavailable, reading unlocked"
                );
                None
            }
        };
        self.read()
    }

    /// Administrative reset to empty
    pub fn clear(&self) -> Result<()> {
        let start = Instant::now();
        log_op_start!("queue_clear");

        let result = self
            .guard("queue_clear")
            .and_then(|_guard| write_pretty(&self.path, &Vec::<String>::new()));

        match result {
            Ok(()) => {
                log_op_end!("queue_clear", duration_ms = start.elapsed().as_millis() as u64);
                Ok(())
            }
            Err(err) => {
                log_op_error!(
                    "queue_clear",
                    err.clone(),
                    duration_ms = start.elapsed().as_millis() as u64
                );
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn open_in(dir: &TempDir) -> QueueStore {
        QueueStore::open(dir.path().join("commands.json")).unwrap()
    }

    #[test]
    fn test_open_creates_empty_document() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("commands.json");

        let store = QueueStore::open(&path).unwrap();

        assert!(path.exists());
        assert!(store.peek().is_empty());
    }

    #[test]
    fn test_open_keeps_existing_commands() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("commands.json");
        fs::write(&path, r#"["PRINT: kept"]"#).unwrap();

        let store = QueueStore::open(&path).unwrap();

        assert_eq!(store.peek(), vec!["PRINT: kept".to_string()]);
    }

    #[test]
    fn test_append_preserves_order() {
        let dir = TempDir::new().unwrap();
        let store = open_in(&dir);

        store.append("PRINT: A").unwrap();
        store.append("PRINT: B").unwrap();
        store.append("PRINT: C").unwrap();

        assert_eq!(store.peek(), vec!["PRINT: A", "PRINT: B", "PRINT: C"]);
    }

    #[test]
    fn test_snapshot_and_clear_empties_queue() {
        let dir = TempDir::new().unwrap();
        let store = open_in(&dir);
        store.append("PRINT: A").unwrap();
        store.append("PRINT: B").unwrap();

        let snapshot = store.snapshot_and_clear();

        assert_eq!(snapshot, vec!["PRINT: A", "PRINT: B"]);
        assert!(store.peek().is_empty());
        assert!(store.snapshot_and_clear().is_empty());
    }

    #[test]
    fn test_peek_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let store = open_in(&dir);
        store.append("PRINT: A").unwrap();

        assert_eq!(store.peek(), store.peek());
        assert_eq!(store.peek().len(), 1);
    }

    #[test]
    fn test_corrupt_document_degrades_to_empty() {
        let dir = TempDir::new().unwrap();
        let store = open_in(&dir);
        fs::write(store.path(), "not json at all").unwrap();

        assert!(store.peek().is_empty());

        store.append("PRINT: fresh").unwrap();
        assert_eq!(store.peek(), vec!["PRINT: fresh"]);
    }

    #[test]
    fn test_non_list_document_degrades_to_empty() {
        let dir = TempDir::new().unwrap();
        let store = open_in(&dir);
        fs::write(store.path(), r#"{"commands": ["PRINT: A"]}"#).unwrap();

        assert!(store.snapshot_and_clear().is_empty());
    }

    #[test]
    fn test_requeue_front_restores_order_ahead_of_new_arrivals() {
        let dir = TempDir::new().unwrap();
        let store = open_in(&dir);
        store.append("PRINT: A").unwrap();
        store.append("PRINT: B").unwrap();

        let snapshot = store.snapshot_and_clear();
        store.append("PRINT: C").unwrap();
        store.requeue_front(&snapshot).unwrap();

        assert_eq!(store.peek(), vec!["PRINT: A", "PRINT: B", "PRINT: C"]);
    }

    #[test]
    fn test_requeue_front_empty_is_noop() {
        let dir = TempDir::new().unwrap();
        let store = open_in(&dir);
        store.append("PRINT: A").unwrap();

        store.requeue_front(&[]).unwrap();

        assert_eq!(store.peek(), vec!["PRINT: A"]);
    }

    #[test]
    fn test_lock_file_sits_beside_document() {
        let dir = TempDir::new().unwrap();
        let store = open_in(&dir);

        assert_eq!(store.lock_path(), dir.path().join("commands.json.lock"));
        assert!(store.lock_path().exists());
    }

    #[test]
    fn test_unlockable_queue_reports_concurrency_error() {
        let dir = TempDir::new().unwrap();
        let store = open_in(&dir);
        fs::remove_file(store.lock_path()).unwrap();
        fs::create_dir(store.lock_path()).unwrap();

        let err = store.append("PRINT: A").unwrap_err();

        assert_eq!(err.kind(), cmdgate_core::ExErrorKind::Concurrency);
        assert!(store.snapshot_and_clear().is_empty());
    }

    #[test]
    fn test_clear() {
        let dir = TempDir::new().unwrap();
        let store = open_in(&dir);
        store.append("PRINT: A").unwrap();

        store.clear().unwrap();

        assert!(store.peek().is_empty());
    }
}
