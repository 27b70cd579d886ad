//! Append-only execution log
//!
//! One JSON line per attempted instruction:
//! `{"timestamp","status","command","result"}`.

#![allow(clippy::result_large_err)]

use crate::atomic::append_line;
use crate::errors::{corrupt_record, io_error, serialization_error, Result};
use chrono::{DateTime, Utc};
use cmdgate_core::ExecutionOutcome;
use cmdgate_core_types::schema::{STATUS_FAILED, STATUS_SUCCESS};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

/// One persisted line of the execution log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionRecord {
    pub timestamp: DateTime<Utc>,
    pub status: String,
    pub command: String,
    pub result: String,
}

impl ExecutionRecord {
    pub fn is_success(&self) -> bool {
        self.status == STATUS_SUCCESS
    }
}

impl From<&ExecutionOutcome> for ExecutionRecord {
    fn from(outcome: &ExecutionOutcome) -> Self {
        Self {
            timestamp: outcome.timestamp,
            status: outcome.status_marker().to_string(),
            command: outcome.command.clone(),
            result: outcome.result_message.clone(),
        }
    }
}

#[derive(Debug)]
pub struct ExecutionLog {
    path: PathBuf,
    lock: Mutex<()>,
}

impl ExecutionLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one outcome
    pub fn append(&self, outcome: &ExecutionOutcome) -> Result<()> {
        self.append_record(&ExecutionRecord::from(outcome))
    }

    /// Append a process-level record (`SYSTEM`, `SYSTEM_ERROR`)
    pub fn append_system(&self, command: &str, success: bool, result: &str) -> Result<()> {
        self.append_record(&ExecutionRecord {
            timestamp: Utc::now(),
            status: if success { STATUS_SUCCESS } else { STATUS_FAILED }.to_string(),
            command: command.to_string(),
            result: result.to_string(),
        })
    }

    fn append_record(&self, record: &ExecutionRecord) -> Result<()> {
        let line =
            serde_json::to_string(record).map_err(|e| serialization_error("append_execution", e))?;
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        append_line(&self.path, &line)
    }

    /// Every record in append order; an absent log has none
    pub fn read_all(&self) -> Result<Vec<ExecutionRecord>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let content =
            fs::read_to_string(&self.path).map_err(|e| io_error("read_execution_log", e))?;
        content
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(idx, line)| {
                serde_json::from_str(line)
                    .map_err(|e| corrupt_record("read_execution_log", idx + 1, e))
            })
            .collect()
    }

    /// The last `n` records in append order
    pub fn tail(&self, n: usize) -> Result<Vec<ExecutionRecord>> {
        let mut records = self.read_all()?;
        let skip = records.len().saturating_sub(n);
        Ok(records.split_off(skip))
    }
}
