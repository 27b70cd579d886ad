//! cmdgate Store - file-backed persistence for the command gateway
//!
//! Provides:
//! - The command queue document behind a single exclusion boundary
//! - The key/value memory document
//! - Append-only execution and ingress logs (JSON Lines)
//! - Atomic temp→rename writes and one degrade-to-empty read policy

pub mod atomic;
pub mod document;
pub mod errors;
pub mod execution_log;
pub mod ingress_log;
pub mod memory_store;
pub mod queue_store;

// Re-export key types
pub use errors::Result;
pub use execution_log::{ExecutionLog, ExecutionRecord};
pub use ingress_log::{IngressLog, IngressRecord};
pub use memory_store::{MemoryMap, MemoryStore};
pub use queue_store::QueueStore;
