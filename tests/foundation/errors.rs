//! Integration tests for Error types
//!
//! Tests error construction, display, context, and error kinds.

use smallcache_foundation::{Error, ErrorContext, ErrorKind, SchemaViolation, StateViolation};

// =============================================================================
// Error Construction
// =============================================================================

#[test]
fn error_empty_schema() {
    let err = Error::empty_schema();
    assert_eq!(err.kind, ErrorKind::Schema(SchemaViolation::Empty));
    assert!(err.is_schema());
    assert!(!err.is_state());
}

#[test]
fn error_too_many_attributes() {
    let err = Error::too_many_attributes(120, 96);
    assert!(matches!(
        err.kind,
        ErrorKind::Schema(SchemaViolation::TooManyAttributes { count: 120, max: 96 })
    ));
}

#[test]
fn error_state_violations() {
    assert_eq!(
        Error::transaction_already_open().kind,
        ErrorKind::State(StateViolation::AlreadyOpen)
    );
    assert_eq!(
        Error::transaction_not_open().kind,
        ErrorKind::State(StateViolation::NotOpen)
    );
}

#[test]
fn error_parse_fields() {
    let err = Error::parse("trailing characters", 2, 7);
    match err.kind {
        ErrorKind::Parse {
            message,
            line,
            column,
        } => {
            assert_eq!(message, "trailing characters");
            assert_eq!((line, column), (2, 7));
        }
        other => panic!("unexpected kind {other:?}"),
    }
}

// =============================================================================
// Error Display
// =============================================================================

#[test]
fn error_display_state() {
    let err = Error::transaction_not_open();
    assert_eq!(format!("{err}"), "state error: transaction not opened");
}

#[test]
fn error_display_with_operation_only() {
    let err = Error::transaction_already_open()
        .with_context(ErrorContext::new().with_operation("begin_transaction"));
    let msg = format!("{err}");
    assert!(msg.starts_with("state error: transaction already open"));
    assert!(msg.ends_with("(in begin_transaction)"));
}

#[test]
fn error_display_schema() {
    let msg = format!("{}", Error::too_many_attributes(97, 96));
    assert!(msg.contains("schema error"));
    assert!(msg.contains("97"));
}

#[test]
fn errors_are_std_errors() {
    fn assert_error<E: std::error::Error + Send + Sync + 'static>(_: &E) {}
    assert_error(&Error::empty_schema());
}
