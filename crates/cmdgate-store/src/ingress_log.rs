//! Append-only ingress log
//!
//! Records every submission attempt, accepted or not, as one JSON line.

#![allow(clippy::result_large_err)]

use crate::atomic::append_line;
use crate::errors::{corrupt_record, io_error, serialization_error, Result};
use chrono::{DateTime, Utc};
use cmdgate_core_types::schema::{STATUS_FAILED, STATUS_SUCCESS};
use cmdgate_core_types::RequestId;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngressRecord {
    pub timestamp: DateTime<Utc>,
    pub request_id: RequestId,
    pub status: String,
    pub source: String,
    pub command: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl IngressRecord {
    pub fn accepted(request_id: RequestId, source: &str, command: &str) -> Self {
        Self {
            timestamp: Utc::now(),
            request_id,
            status: STATUS_SUCCESS.to_string(),
            source: source.to_string(),
            command: command.to_string(),
            error: None,
        }
    }

    pub fn rejected(request_id: RequestId, source: &str, command: &str, error: &str) -> Self {
        Self {
            timestamp: Utc::now(),
            request_id,
            status: STATUS_FAILED.to_string(),
            source: source.to_string(),
            command: command.to_string(),
            error: Some(error.to_string()),
        }
    }
}

#[derive(Debug)]
pub struct IngressLog {
    path: PathBuf,
    lock: Mutex<()>,
}

impl IngressLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn append(&self, record: &IngressRecord) -> Result<()> {
        let line =
            serde_json::to_string(record).map_err(|e| serialization_error("append_ingress", e))?;
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        append_line(&self.path, &line)
    }

    pub fn read_all(&self) -> Result<Vec<IngressRecord>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let content =
            fs::read_to_string(&self.path).map_err(|e| io_error("read_ingress_log", e))?;
        content
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(idx, line)| {
                serde_json::from_str(line).map_err(|e| corrupt_record("read_ingress_log", idx + 1, e))
            })
            .collect()
    }
}
