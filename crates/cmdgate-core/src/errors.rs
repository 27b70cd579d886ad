use cmdgate_core_types::RequestId;
use thiserror::Error;

/// Result type alias using the canonical ExError
pub type Result<T> = std::result::Result<T, ExError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code that is safe to expose through the
/// HTTP envelope and to assert on in tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Ingress/Validation
    InvalidInput,
    EmptyCommand,
    UnknownKind,

    // Dispatch
    NoHandler,
    HandlerFailed,
    PolicyDenied,

    // Integration/IO
    Io,
    Serialization,
    Persistence,
    Concurrency,

    // Internal
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::EmptyCommand => "ERR_EMPTY_COMMAND",
            ExErrorKind::UnknownKind => "ERR_UNKNOWN_KIND",
            ExErrorKind::NoHandler => "ERR_NO_HANDLER",
            ExErrorKind::HandlerFailed => "ERR_HANDLER_FAILED",
            ExErrorKind::PolicyDenied => "ERR_POLICY_DENIED",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::Persistence => "ERR_PERSISTENCE",
            ExErrorKind::Concurrency => "ERR_CONCURRENCY",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }
}

/// Canonical structured error type
///
/// Carries a classification for programmatic handling plus optional context
/// (operation, offending command, request id) for debugging.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    command: Option<String>,
    request_id: Option<RequestId>,
    message: String,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            command: None,
            request_id: None,
            message: String::new(),
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add the raw command that triggered the error
    pub fn with_command(mut self, command: impl Into<String>) -> Self {
        self.command = Some(command.into());
        self
    }

    /// Add request ID context
    pub fn with_request_id(mut self, request_id: RequestId) -> Self {
        self.request_id = Some(request_id);
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    pub fn command(&self) -> Option<&str> {
        self.command.as_deref()
    }

    pub fn request_id(&self) -> Option<&RequestId> {
        self.request_id.as_ref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(command) = &self.command {
            write!(f, " (command: {})", command)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {}

// ========== End Error Facility ==========

/// Failure to turn a raw command string into an instruction
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The kind is not part of the supported instruction set
    #[error("Unknown command: {0}")]
    UnknownKind(String),
}

/// Failure reported by an effect handler
///
/// The message is surfaced verbatim as the result text of a failed outcome.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct HandlerError {
    message: String,
}

impl HandlerError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<String> for HandlerError {
    fn from(message: String) -> Self {
        Self::new(message)
    }
}

impl From<&str> for HandlerError {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

/// Failure to route a normalized instruction to a handler
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// The instruction kind is valid but nothing is registered for it
    #[error("No handler registered for {kind}")]
    NoHandler { kind: String },

    /// The handler ran and reported a failure
    #[error("{0}")]
    Handler(#[from] HandlerError),
}

/// Rejection at the ingress boundary
#[derive(Error, Debug, Clone)]
pub enum GatewayError {
    /// The submitted command was empty or whitespace-only
    #[error("Command is required")]
    EmptyCommand,

    /// The queue document could not be updated
    #[error("Failed to update command queue: {0}")]
    Store(ExError),
}

impl From<ExError> for GatewayError {
    fn from(err: ExError) -> Self {
        GatewayError::Store(err)
    }
}

impl From<ParseError> for ExError {
    fn from(err: ParseError) -> Self {
        match err {
            ParseError::UnknownKind(kind) => ExError::new(ExErrorKind::UnknownKind)
                .with_op("parse")
                .with_message(format!("Unknown command: {}", kind)),
        }
    }
}

impl From<HandlerError> for ExError {
    fn from(err: HandlerError) -> Self {
        ExError::new(ExErrorKind::HandlerFailed).with_message(err.message)
    }
}

impl From<RegistryError> for ExError {
    fn from(err: RegistryError) -> Self {
        match err {
            RegistryError::NoHandler { kind } => ExError::new(ExErrorKind::NoHandler)
                .with_op("lookup_handler")
                .with_message(format!("No handler registered for {}", kind)),
            RegistryError::Handler(inner) => inner.into(),
        }
    }
}

impl From<GatewayError> for ExError {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::EmptyCommand => ExError::new(ExErrorKind::EmptyCommand)
                .with_op("gateway_submit")
                .with_message("Command is required"),
            GatewayError::Store(inner) => inner,
        }
    }
}

/// Conversion from serde_json::Error to ExError
impl From<serde_json::Error> for ExError {
    fn from(err: serde_json::Error) -> Self {
        ExError::new(ExErrorKind::Serialization).with_message(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dispatch_error_kind_codes() {
        let cases = [
            (ExErrorKind::UnknownKind, "ERR_UNKNOWN_KIND"),
            (ExErrorKind::NoHandler, "ERR_NO_HANDLER"),
            (ExErrorKind::HandlerFailed, "ERR_HANDLER_FAILED"),
            (ExErrorKind::PolicyDenied, "ERR_POLICY_DENIED"),
            (ExErrorKind::EmptyCommand, "ERR_EMPTY_COMMAND"),
        ];
        for (kind, expected_code) in cases {
            assert_eq!(kind.code(), expected_code, "Wrong code for {:?}", kind);
        }
    }

    #[test]
    fn test_display_includes_code_op_and_command() {
        let err = ExError::new(ExErrorKind::Io)
            .with_op("queue_append")
            .with_command("PRINT: hi")
            .with_message("disk full");

        assert_eq!(
            err.to_string(),
            "[ERR_IO] in operation 'queue_append': disk full (command: PRINT: hi)"
        );
    }

    #[test]
    fn test_handler_error_display_is_bare_message() {
        let err = HandlerError::new("TTS not available: espeak missing");
        assert_eq!(err.to_string(), "TTS not available: espeak missing");
    }

    #[test]
    fn test_gateway_store_error_keeps_inner_kind() {
        let inner = ExError::new(ExErrorKind::Persistence).with_message("rename failed");
        let ex: ExError = GatewayError::Store(inner).into();
        assert_eq!(ex.kind(), ExErrorKind::Persistence);
    }
}
