//! Error handling for cmdgate-store
//!
//! Wraps the core ExError with store-specific constructors

use cmdgate_core::errors::{ExError, ExErrorKind};

/// Result type alias using ExError
pub type Result<T> = std::result::Result<T, ExError>;

/// Create an IO error for the given operation
pub fn io_error(operation: &str, err: std::io::Error) -> ExError {
    ExError::new(ExErrorKind::Io)
        .with_op(operation.to_string())
        .with_message(err.to_string())
}

/// Create a serialization error for the given operation
pub fn serialization_error(operation: &str, err: serde_json::Error) -> ExError {
    ExError::new(ExErrorKind::Serialization)
        .with_op(operation.to_string())
        .with_message(err.to_string())
}

/// Create an error for a document that exceeds the read cap
pub fn document_too_large(operation: &str, size: u64, max: u64) -> ExError {
    ExError::new(ExErrorKind::Persistence)
        .with_op(operation.to_string())
        .with_message(format!(
            "document too large: {} bytes exceeds maximum of {} bytes",
            size, max
        ))
}

/// Create an error for a log line that does not decode
pub fn corrupt_record(operation: &str, line_no: usize, err: serde_json::Error) -> ExError {
    ExError::new(ExErrorKind::Serialization)
        .with_op(operation.to_string())
        .with_message(format!("line {}: {}", line_no, err))
}

/// Create an error for a cross-process lock that could not be taken
pub fn lock_error(operation: &str, path: &std::path::Path, err: std::io::Error) -> ExError {
    ExError::new(ExErrorKind::Concurrency)
        .with_op(operation.to_string())
        .with_message(format!("could not lock {}: {}", path.display(), err))
}
