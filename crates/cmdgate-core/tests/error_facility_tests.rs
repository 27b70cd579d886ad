use cmdgate_core::errors::{
    ExError, ExErrorKind, GatewayError, HandlerError, ParseError, RegistryError,
};

#[test]
fn test_unknown_kind_maps_to_stable_code() {
    let ex_err: ExError = ParseError::UnknownKind("FOO".to_string()).into();

    assert_eq!(ex_err.kind(), ExErrorKind::UnknownKind);
    assert_eq!(ex_err.code(), "ERR_UNKNOWN_KIND");
    assert_eq!(ex_err.op(), Some("parse"));
    assert!(ex_err.message().contains("FOO"));
}

#[test]
fn test_no_handler_distinct_from_handler_failure() {
    let missing: ExError = RegistryError::NoHandler {
        kind: "LOAD_SCRIPT".to_string(),
    }
    .into();
    let failed: ExError = RegistryError::Handler(HandlerError::new("disk full")).into();

    assert_eq!(missing.kind(), ExErrorKind::NoHandler);
    assert_eq!(failed.kind(), ExErrorKind::HandlerFailed);
    assert_eq!(failed.message(), "disk full");
}

#[test]
fn test_empty_command_rejection() {
    let err = GatewayError::EmptyCommand;
    assert_eq!(err.to_string(), "Command is required");

    let ex_err: ExError = err.into();
    assert_eq!(ex_err.code(), "ERR_EMPTY_COMMAND");
}

#[test]
fn test_error_kind_code_mapping() {
    let kinds = vec![
        (ExErrorKind::InvalidInput, "ERR_INVALID_INPUT"),
        (ExErrorKind::Io, "ERR_IO"),
        (ExErrorKind::Serialization, "ERR_SERIALIZATION"),
        (ExErrorKind::Persistence, "ERR_PERSISTENCE"),
        (ExErrorKind::Concurrency, "ERR_CONCURRENCY"),
        (ExErrorKind::Internal, "ERR_INTERNAL"),
    ];

    for (kind, expected_code) in kinds {
        assert_eq!(kind.code(), expected_code);
    }
}

#[test]
fn test_serde_error_becomes_serialization_kind() {
    let parse_err = serde_json::from_str::<Vec<String>>("{not json").unwrap_err();
    let ex_err: ExError = parse_err.into();
    assert_eq!(ex_err.kind(), ExErrorKind::Serialization);
}
