//! Atomic write and bounded read primitives
//!
//! Documents are replaced with a temp→fsync→rename sequence so a crash leaves
//! either the old complete file or the new complete file, never a partial one.

#![allow(clippy::result_large_err)]

use crate::errors::{document_too_large, io_error, Result};
use std::fs::{self, File, OpenOptions};
use std::io::{Read, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// Upper bound for any single document read
pub const DEFAULT_MAX_DOCUMENT_SIZE: u64 = 16 * 1024 * 1024;

/// Atomically write bytes to a file
///
/// Creates the parent directory if needed, writes a uniquely named sibling
/// temp file, syncs it, then renames it over the target. Concurrent writers
/// never share a temp file; a failed write leaves no temp file behind.
pub fn atomic_write(target_path: &Path, content: &[u8]) -> Result<()> {
    let parent = match target_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent).map_err(|e| io_error("create_document_dir", e))?;

    let mut temp = NamedTempFile::new_in(parent).map_err(|e| io_error("write_document_temp", e))?;
    temp.write_all(content)
        .map_err(|e| io_error("write_document_temp", e))?;
    temp.as_file()
        .sync_all()
        .map_err(|e| io_error("sync_document_temp", e))?;

    temp.persist(target_path)
        .map_err(|e| io_error("rename_document_temp", e.error))?;

    Ok(())
}

/// Read a whole file, refusing anything larger than `max_size`
///
/// The size is checked on the open handle before any allocation.
pub fn bounded_read(path: &Path, max_size: u64) -> Result<Vec<u8>> {
    let file = File::open(path).map_err(|e| io_error("read_document", e))?;
    let size = file
        .metadata()
        .map_err(|e| io_error("read_document", e))?
        .len();
    if size > max_size {
        return Err(document_too_large("read_document", size, max_size));
    }

    let mut buf = Vec::with_capacity(size as usize);
    file.take(max_size + 1)
        .read_to_end(&mut buf)
        .map_err(|e| io_error("read_document", e))?;
    if buf.len() as u64 > max_size {
        return Err(document_too_large("read_document", buf.len() as u64, max_size));
    }
    Ok(buf)
}

/// Append one line to a file, creating it (and its parent) if absent
pub fn append_line(path: &Path, line: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| io_error("create_log_dir", e))?;
        }
    }

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| io_error("open_log", e))?;

    let mut record = String::with_capacity(line.len() + 1);
    record.push_str(line);
    record.push('\n');
    file.write_all(record.as_bytes())
        .map_err(|e| io_error("append_log", e))?;
    file.flush().map_err(|e| io_error("append_log", e))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cmdgate_core::ExErrorKind;
    use tempfile::TempDir;

    #[test]
    fn test_atomic_write() {
        let temp_dir = TempDir::new().unwrap();
        let target = temp_dir.path().join("commands.json");

        atomic_write(&target, b"[]").unwrap();

        let content = fs::read(&target).unwrap();
        assert_eq!(content, b"[]");
    }

    #[test]
    fn test_atomic_write_creates_parent() {
        let temp_dir = TempDir::new().unwrap();
        let target = temp_dir.path().join("subdir").join("memory.json");

        atomic_write(&target, b"{}").unwrap();

        let content = fs::read(&target).unwrap();
        assert_eq!(content, b"{}");
    }

    #[test]
    fn test_atomic_write_replaces_existing() {
        let temp_dir = TempDir::new().unwrap();
        let target = temp_dir.path().join("commands.json");

        atomic_write(&target, b"[\"A\"]").unwrap();
        atomic_write(&target, b"[]").unwrap();

        assert_eq!(fs::read(&target).unwrap(), b"[]");
    }

    #[test]
    fn test_no_temp_files_after_write() {
        let temp_dir = TempDir::new().unwrap();
        let target = temp_dir.path().join("commands.json");

        atomic_write(&target, b"clean").unwrap();
        atomic_write(&target, b"cleaner").unwrap();

        let names: Vec<_> = fs::read_dir(temp_dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .map(|e| e.file_name())
            .collect();

        assert_eq!(names, vec![std::ffi::OsString::from("commands.json")]);
    }

    #[test]
    fn test_concurrent_writers_never_collide() {
        let temp_dir = TempDir::new().unwrap();
        let target = temp_dir.path().join("commands.json");

        let writers: Vec<_> = (0..8)
            .map(|w| {
                let target = target.clone();
                std::thread::spawn(move || {
                    for i in 0..25 {
                        atomic_write(&target, format!("[\"w{w}-{i}\"]").as_bytes()).unwrap();
                    }
                })
            })
            .collect();
        for writer in writers {
            writer.join().unwrap();
        }

        let content = fs::read_to_string(&target).unwrap();
        assert!(content.starts_with("[\"w") && content.ends_with("\"]"));
    }

    #[test]
    fn test_bounded_read_rejects_oversized() {
        let temp_dir = TempDir::new().unwrap();
        let target = temp_dir.path().join("big.json");
        fs::write(&target, vec![b'x'; 64]).unwrap();

        let err = bounded_read(&target, 16).unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::Persistence);

        assert_eq!(bounded_read(&target, 64).unwrap().len(), 64);
    }

    #[test]
    fn test_bounded_read_missing_is_io_error() {
        let temp_dir = TempDir::new().unwrap();
        let err = bounded_read(&temp_dir.path().join("absent"), 16).unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::Io);
    }

    #[test]
    fn test_append_line_accumulates() {
        let temp_dir = TempDir::new().unwrap();
        let target = temp_dir.path().join("logs").join("log.jsonl");

        append_line(&target, "one").unwrap();
        append_line(&target, "two").unwrap();

        assert_eq!(fs::read_to_string(&target).unwrap(), "one\ntwo\n");
    }
}
