//! Tests for error construction, serialisation, and notification mapping.

use super::*;
use rstest::{fixture, rstest};
use serde_json::json;

#[fixture]
fn base_error() -> Error {
    Error::invalid_request("title must not be blank")
}

#[rstest]
fn invalid_request_constructor_sets_code(base_error: Error) {
    assert_eq!(base_error.code(), ErrorCode::InvalidRequest);
}

#[rstest]
fn try_new_rejects_empty_messages() {
    let result = Error::try_new(ErrorCode::InvalidRequest, "   ");
    assert!(matches!(result, Err(ErrorValidationError::EmptyMessage)));
}

#[rstest]
fn new_substitutes_fallback_for_blank_message() {
    let error = Error::new(ErrorCode::ServiceUnavailable, "");
    assert_eq!(error.message(), "the service is temporarily unavailable");
}

#[rstest]
fn serialises_code_in_snake_case(base_error: Error) {
    let value = serde_json::to_value(base_error.with_details(json!({"field": "title"})))
        .expect("serialise error");
    assert_eq!(value["code"], "invalid_request");
    assert_eq!(value["details"]["field"], "title");
}

#[rstest]
fn deserialising_blank_message_fails() {
    let result: Result<Error, _> =
        serde_json::from_value(json!({"code": "not_found", "message": " "}));
    assert!(result.is_err());
}

#[rstest]
#[case::validation(Error::invalid_request("title must not be blank"), Severity::Warning, "title must not be blank")]
#[case::unavailable(Error::service_unavailable("connection refused: 10.0.0.1"), Severity::Error, "the service is temporarily unavailable")]
#[case::internal(Error::internal("decode failed at line 3"), Severity::Error, "something went wrong")]
#[case::unauthorized(Error::unauthorized("jwt expired"), Severity::Error, "please sign in to continue")]
fn notification_hides_internal_detail(
    #[case] error: Error,
    #[case] severity: Severity,
    #[case] message: &str,
) {
    let notification = error.notification();
    assert_eq!(notification.severity, severity);
    assert_eq!(notification.message, message);
}
