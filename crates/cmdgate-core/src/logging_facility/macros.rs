//! Canonical logging macros
//!
//! Every operation boundary is logged as a `start` event followed by exactly
//! one `end` or `end_error` event carrying the same `op` name.

/// Log the start of an operation
///
/// # Example
///
/// ```
/// # use cmdgate_core::log_op_start;
/// log_op_start!("queue_append");
/// log_op_start!("queue_append", source = "api");
/// ```
#[macro_export]
macro_rules! log_op_start {
    ($op:expr) => {
        $crate::__tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::core_types::schema::EVENT_START,
        );
    };
    ($op:expr, $($field:tt)*) => {
        $crate::__tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::core_types::schema::EVENT_START,
            $($field)*
        );
    };
}

/// Log the successful end of an operation
///
/// # Example
///
/// ```
/// # use cmdgate_core::log_op_end;
/// log_op_end!("queue_append", duration_ms = 3);
/// log_op_end!("queue_drain", duration_ms = 3, queue_len = 2);
/// ```
#[macro_export]
macro_rules! log_op_end {
    ($op:expr, duration_ms = $duration:expr) => {
        $crate::__tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::core_types::schema::EVENT_END,
            duration_ms = $duration,
        );
    };
    ($op:expr, duration_ms = $duration:expr, $($field:tt)*) => {
        $crate::__tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::core_types::schema::EVENT_END,
            duration_ms = $duration,
            $($field)*
        );
    };
}

/// Log an operation error
///
/// Anything convertible into `ExError` is accepted; the stable code and kind
/// are attached as `err.code` / `err.kind`.
///
/// # Example
///
/// ```
/// # use cmdgate_core::{log_op_error, errors::ParseError};
/// let err = ParseError::UnknownKind("FOO".to_string());
/// log_op_error!("parse", err, duration_ms = 0);
/// ```
#[macro_export]
macro_rules! log_op_error {
    ($op:expr, $err:expr, duration_ms = $duration:expr) => {{
        let ex_err: $crate::errors::ExError = $err.into();
        $crate::__tracing::error!(
            component = module_path!(),
            op = $op,
            event = $crate::core_types::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err.kind = ?ex_err.kind(),
            err.code = ex_err.code(),
            err.message = ex_err.message(),
        );
    }};
    ($op:expr, $err:expr, duration_ms = $duration:expr, $($field:tt)*) => {{
        let ex_err: $crate::errors::ExError = $err.into();
        $crate::__tracing::error!(
            component = module_path!(),
            op = $op,
            event = $crate::core_types::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err.kind = ?ex_err.kind(),
            err.code = ex_err.code(),
            err.message = ex_err.message(),
            $($field)*
        );
    }};
}

/// Emit an execution outcome live
///
/// Successes are logged at `info`, failures at `warn`, both with the
/// `SUCCESS`/`FAILED` marker used in the execution log.
///
/// # Example
///
/// ```
/// # use cmdgate_core::{log_outcome, ExecutionOutcome};
/// let outcome = ExecutionOutcome::succeeded("PRINT: A", "Message printed: A");
/// log_outcome!(&outcome);
/// ```
#[macro_export]
macro_rules! log_outcome {
    ($outcome:expr) => {{
        let outcome: &$crate::outcome::ExecutionOutcome = $outcome;
        if outcome.success {
            $crate::__tracing::info!(
                component = module_path!(),
                op = "execute_instruction",
                status = outcome.status_marker(),
                command = %outcome.command,
                result = %outcome.result_message,
            );
        } else {
            $crate::__tracing::warn!(
                component = module_path!(),
                op = "execute_instruction",
                status = outcome.status_marker(),
                command = %outcome.command,
                result = %outcome.result_message,
            );
        }
    }};
}
