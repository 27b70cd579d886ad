//! Canonical schema constants for structured logging and events
//!
//! These constants keep field names identical across the dispatcher, the
//! ingress gateway and the HTTP layer.

// Canonical field keys for structured logging
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";
pub const FIELD_REQUEST_ID: &str = "request_id";
pub const FIELD_CYCLE_ID: &str = "cycle_id";

// Command identifiers
pub const FIELD_COMMAND: &str = "command";
pub const FIELD_KIND: &str = "kind";
pub const FIELD_SOURCE: &str = "source";

// Collection sizes
pub const FIELD_QUEUE_LEN: &str = "queue_len";
pub const FIELD_EXECUTION_COUNT: &str = "execution_count";

// Error fields
pub const FIELD_ERR_KIND: &str = "err.kind";
pub const FIELD_ERR_CODE: &str = "err.code";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";

// Execution log markers
pub const STATUS_SUCCESS: &str = "SUCCESS";
pub const STATUS_FAILED: &str = "FAILED";
