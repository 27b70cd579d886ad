//! Ingress: validate, enqueue and audit submitted commands

#![allow(clippy::result_large_err)]

use chrono::{DateTime, Utc};
use cmdgate_core::errors::GatewayError;
use cmdgate_core::{log_op_end, log_op_error, log_op_start};
use cmdgate_core_types::RequestId;
use cmdgate_store::{IngressLog, IngressRecord, QueueStore};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;

/// Command recorded in the ingress log for an administrative clear
pub const CLEAR_QUEUE_COMMAND: &str = "CLEAR_QUEUE";

/// Source recorded when the caller does not name one
pub const DEFAULT_SOURCE: &str = "api";

/// Point-in-time view of the queue
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayStatus {
    pub queue_size: usize,
    pub commands: Vec<String>,
    pub timestamp: DateTime<Utc>,
}

/// An accepted submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub request_id: RequestId,
    pub command: String,
}

#[derive(Debug, Clone)]
pub struct IngressGateway {
    queue: Arc<QueueStore>,
    ingress_log: Arc<IngressLog>,
}

impl IngressGateway {
    pub fn new(queue: Arc<QueueStore>, ingress_log: Arc<IngressLog>) -> Self {
        Self { queue, ingress_log }
    }

    /// Trim and enqueue a command
    ///
    /// Every attempt is written to the ingress log, including rejected ones.
    ///
    /// # Errors
    ///
    /// `GatewayError::EmptyCommand` for blank input, `GatewayError::Store`
    /// when the queue document cannot be written.
    pub fn submit(&self, command: &str, source: Option<&str>) -> Result<Submission, GatewayError> {
        let start = Instant::now();
        let request_id = RequestId::new();
        let source = source
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_SOURCE);
        let command = command.trim();

        log_op_start!(
            "gateway_submit",
            request_id = %request_id,
            source = source
        );

        let result = if command.is_empty() {
            Err(GatewayError::EmptyCommand)
        } else {
            self.queue.append(command).map_err(GatewayError::from)
        };

        match result {
            Ok(()) => {
                self.audit(IngressRecord::accepted(request_id.clone(), source, command));
                log_op_end!(
                    "gateway_submit",
                    duration_ms = start.elapsed().as_millis() as u64,
                    request_id = %request_id,
                    command = command
                );
                Ok(Submission {
                    request_id,
                    command: command.to_string(),
                })
            }
            Err(err) => {
                self.audit(IngressRecord::rejected(
                    request_id.clone(),
                    source,
                    command,
                    &err.to_string(),
                ));
                log_op_error!(
                    "gateway_submit",
                    err.clone(),
                    duration_ms = start.elapsed().as_millis() as u64,
                    request_id = %request_id
                );
                Err(err)
            }
        }
    }

    /// Queue contents without consuming them
    pub fn status(&self) -> GatewayStatus {
        let commands = self.queue.peek();
        GatewayStatus {
            queue_size: commands.len(),
            commands,
            timestamp: Utc::now(),
        }
    }

    /// Drop everything queued
    ///
    /// # Errors
    ///
    /// `GatewayError::Store` when the queue document cannot be written.
    pub fn clear(&self) -> Result<(), GatewayError> {
        let request_id = RequestId::new();
        match self.queue.clear() {
            Ok(()) => {
                self.audit(IngressRecord::accepted(
                    request_id,
                    DEFAULT_SOURCE,
                    CLEAR_QUEUE_COMMAND,
                ));
                Ok(())
            }
            Err(err) => {
                let err = GatewayError::from(err);
                self.audit(IngressRecord::rejected(
                    request_id,
                    DEFAULT_SOURCE,
                    CLEAR_QUEUE_COMMAND,
                    &err.to_string(),
                ));
                Err(err)
            }
        }
    }

    fn audit(&self, record: IngressRecord) {
        if let Err(err) = self.ingress_log.append(&record) {
            tracing::warn!(
                request_id = %record.request_id,
                error = %err,
                "could not write ingress log"
            );
        }
    }
}
