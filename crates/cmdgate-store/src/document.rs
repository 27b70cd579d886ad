//! JSON document persistence with one degrade-to-default read policy
//!
//! Every persisted document (queue, memory) is read whole and written whole.
//! A missing, unreadable or malformed document reads as the type's default
//! value; the failure is reported through tracing and never propagated.

#![allow(clippy::result_large_err)]

use crate::atomic::{atomic_write, bounded_read, DEFAULT_MAX_DOCUMENT_SIZE};
use crate::errors::{serialization_error, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;

/// Read a document, falling back to `T::default()` on any failure
pub fn read_or_default<T>(path: &Path) -> T
where
    T: DeserializeOwned + Default,
{
    if !path.exists() {
        return T::default();
    }

    let bytes = match bounded_read(path, DEFAULT_MAX_DOCUMENT_SIZE) {
        Ok(bytes) => bytes,
        Err(err) => {
            tracing::warn!(
                path = %path.display(),
                err.code = err.code(),
                error = %err,
                "document unreadable, treating as empty"
            );
            return T::default();
        }
    };

    match serde_json::from_slice(&bytes) {
        Ok(value) => value,
        Err(err) => {
            tracing::warn!(
                path = %path.display(),
                error = %err,
                "document malformed, treating as empty"
            );
            T::default()
        }
    }
}

/// Serialize a document as pretty JSON and replace it atomically
pub fn write_pretty<T>(path: &Path, value: &T) -> Result<()>
where
    T: Serialize + ?Sized,
{
    let mut json =
        serde_json::to_vec_pretty(value).map_err(|e| serialization_error("write_document", e))?;
    json.push(b'\n');
    atomic_write(path, &json)
}
