//! Tests for HTTP error mapping.

use super::*;
use crate::domain::UserId;
use actix_web::ResponseError;
use actix_web::body::to_bytes;
use actix_web::http::StatusCode;
use rstest::{fixture, rstest};
use serde_json::json;

const TRACE_ID: &str = "00000000-0000-0000-0000-000000000000";

#[fixture]
fn expected_trace_id() -> String {
    TRACE_ID.to_owned()
}

#[fixture]
fn internal_error_case(expected_trace_id: String) -> Error {
    Error::internal("boom")
        .with_trace_id(expected_trace_id)
        .with_details(json!({"secret": "x"}))
}

#[fixture]
fn invalid_request_case(expected_trace_id: String) -> Error {
    Error::invalid_request("bad")
        .with_trace_id(expected_trace_id)
        .with_details(json!({"field": "firstName"}))
}

#[rstest]
#[case(Error::invalid_request("bad"), StatusCode::BAD_REQUEST)]
#[case(Error::not_found("missing"), StatusCode::NOT_FOUND)]
#[case(Error::conflict("taken"), StatusCode::CONFLICT)]
#[case(Error::service_unavailable("down"), StatusCode::SERVICE_UNAVAILABLE)]
#[case(Error::internal("boom"), StatusCode::INTERNAL_SERVER_ERROR)]
fn status_code_matches_error_code(#[case] err: Error, #[case] status: StatusCode) {
    assert_eq!(ResponseError::status_code(&err), status);
}

async fn assert_error_response(
    error: Error,
    expected_status: StatusCode,
    expected_trace_id: Option<&str>,
) -> Error {
    let response = ResponseError::error_response(&error);
    assert_eq!(response.status(), expected_status);

    let header = response.headers().get(TRACE_ID_HEADER);
    match expected_trace_id {
        Some(expected) => {
            let trace_id = header
                .expect("trace-id header is set by error_response")
                .to_str()
                .expect("trace-id is valid UTF-8");
            assert_eq!(trace_id, expected);
        }
        None => assert!(header.is_none(), "trace-id header should not be present"),
    }

    let bytes = to_bytes(response.into_body())
        .await
        .expect("reading response body succeeds");

    serde_json::from_slice(&bytes).expect("Error JSON deserialisation succeeds")
}

#[rstest]
#[actix_web::test]
async fn error_responses_include_trace_id_and_payloads(
    #[from(internal_error_case)] internal_error: Error,
    #[from(invalid_request_case)] invalid_request: Error,
    expected_trace_id: String,
) {
    let redacted = assert_error_response(
        internal_error,
        StatusCode::INTERNAL_SERVER_ERROR,
        Some(expected_trace_id.as_str()),
    )
    .await;
    assert_eq!(redacted.code(), ErrorCode::InternalError);
    assert_eq!(redacted.message(), "Internal server error");
    assert!(redacted.details().is_none());

    let payload = assert_error_response(
        invalid_request,
        StatusCode::BAD_REQUEST,
        Some(expected_trace_id.as_str()),
    )
    .await;
    assert_eq!(payload.code(), ErrorCode::InvalidRequest);
    assert_eq!(payload.message(), "bad");
    assert_eq!(payload.details(), Some(&json!({"field": "firstName"})));
}

#[rstest]
#[actix_web::test]
async fn error_without_trace_id_omits_trace_header() {
    let error = Error::not_found("gone");

    let payload = assert_error_response(error, StatusCode::NOT_FOUND, None).await;
    assert_eq!(payload.message(), "gone");
    assert_eq!(payload.trace_id(), None);
}

#[test]
fn from_actix_error_is_redacted_internal_error() {
    let err: Error = actix_web::error::ErrorBadRequest("boom").into();

    assert_eq!(err.code(), ErrorCode::InternalError);
    assert_eq!(err.message(), "Internal server error");
    assert_eq!(err.details(), None);
}

#[test]
fn duplicate_email_becomes_conflict_with_field_details() {
    let err: Error = UserCreationError::ConstraintViolation {
        email: "taken@example.com".to_owned(),
    }
    .into();

    assert_eq!(err.code(), ErrorCode::Conflict);
    assert_eq!(
        err.details(),
        Some(&json!({"field": "email", "value": "taken@example.com", "code": "duplicate_email"}))
    );
}

#[rstest]
#[case(UserStoreError::connection("refused"), ErrorCode::ServiceUnavailable)]
#[case(UserStoreError::query("syntax"), ErrorCode::InternalError)]
#[case(UserStoreError::transaction("aborted"), ErrorCode::InternalError)]
fn storage_failures_map_by_kind(#[case] source: UserStoreError, #[case] expected: ErrorCode) {
    let creation: Error = UserCreationError::Storage {
        source: source.clone(),
    }
    .into();
    let lookup: Error = UserLookupError::Storage { source }.into();

    assert_eq!(creation.code(), expected);
    assert_eq!(lookup.code(), expected);
}

#[rstest]
#[case(UserCreationError::NotificationTimeout { user_id: UserId::random(), waited_ms: 1000 })]
#[case(UserCreationError::NotificationClosed { user_id: UserId::random() })]
fn notification_failures_are_internal(#[case] failure: UserCreationError) {
    let err: Error = failure.into();
    assert_eq!(err.code(), ErrorCode::InternalError);
}

#[test]
fn unknown_user_is_not_found() {
    let id = UserId::new("unknown-id").expect("id");
    let err: Error = UserLookupError::NotFound { id }.into();

    assert_eq!(err.code(), ErrorCode::NotFound);
    assert_eq!(err.message(), "user unknown-id not found");
    assert_eq!(err.details(), Some(&json!({"id": "unknown-id"})));
}
