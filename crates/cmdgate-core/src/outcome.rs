//! Execution outcome model
//!
//! Each instruction moves `Pending → Executing → {Succeeded, Failed}` exactly
//! once per drain; the terminal state is captured as an [`ExecutionOutcome`]
//! and appended to the execution log.

use chrono::{DateTime, Utc};
use cmdgate_core_types::schema::{STATUS_FAILED, STATUS_SUCCESS};
use serde::{Deserialize, Serialize};

/// Lifecycle of one instruction within a drain cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstructionState {
    Pending,
    Executing,
    Succeeded,
    Failed,
}

impl InstructionState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, InstructionState::Succeeded | InstructionState::Failed)
    }
}

/// Recorded result of one attempted instruction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionOutcome {
    pub timestamp: DateTime<Utc>,
    pub command: String,
    pub success: bool,
    pub result_message: String,
}

impl ExecutionOutcome {
    pub fn succeeded(command: impl Into<String>, result_message: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            command: command.into(),
            success: true,
            result_message: result_message.into(),
        }
    }

    pub fn failed(command: impl Into<String>, result_message: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            command: command.into(),
            success: false,
            result_message: result_message.into(),
        }
    }

    /// Terminal state this outcome represents
    pub fn state(&self) -> InstructionState {
        if self.success {
            InstructionState::Succeeded
        } else {
            InstructionState::Failed
        }
    }

    /// `SUCCESS` / `FAILED` marker written to the log
    pub fn status_marker(&self) -> &'static str {
        if self.success {
            STATUS_SUCCESS
        } else {
            STATUS_FAILED
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_markers() {
        let ok = ExecutionOutcome::succeeded("PRINT: A", "Message printed: A");
        let bad = ExecutionOutcome::failed("FOO", "Unknown command: FOO");

        assert_eq!(ok.status_marker(), "SUCCESS");
        assert_eq!(bad.status_marker(), "FAILED");
        assert_eq!(ok.state(), InstructionState::Succeeded);
        assert_eq!(bad.state(), InstructionState::Failed);
    }

    #[test]
    fn test_only_outcome_states_are_terminal() {
        assert!(!InstructionState::Pending.is_terminal());
        assert!(!InstructionState::Executing.is_terminal());
        assert!(InstructionState::Succeeded.is_terminal());
        assert!(InstructionState::Failed.is_terminal());
    }
}
