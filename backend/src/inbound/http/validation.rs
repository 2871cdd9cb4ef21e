//! Shared validation helpers for inbound HTTP adapters.
//!
//! Every rejection carries the JSON error envelope with a `details` object
//! naming the offending field and a machine-readable code.

use actix_web::{HttpRequest, error::JsonPayloadError, error::QueryPayloadError, web};
use serde_json::json;
use tracing::debug;

use crate::domain::{Error, UserValidationError};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MissingField,
    EmptyValue,
    TooLong,
    InvalidEmail,
    MalformedBody,
    MalformedQuery,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::MissingField => "missing_field",
            ErrorCode::EmptyValue => "empty_value",
            ErrorCode::TooLong => "too_long",
            ErrorCode::InvalidEmail => "invalid_email",
            ErrorCode::MalformedBody => "malformed_body",
            ErrorCode::MalformedQuery => "malformed_query",
        }
    }
}

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(&self) -> &str {
        self.0
    }
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    let field = field.as_str();
    Error::invalid_request(format!("missing required field: {field}")).with_details(json!({
        "field": field,
        "code": ErrorCode::MissingField.as_str(),
    }))
}

/// Return the value of a required field, rejecting absent values.
pub(crate) fn require_field(value: Option<String>, field: FieldName) -> Result<String, Error> {
    value.ok_or_else(|| missing_field_error(field))
}

/// Translate a domain field validation failure into a 400 envelope.
pub(crate) fn field_validation_error(field: FieldName, err: &UserValidationError) -> Error {
    let code = match err {
        UserValidationError::EmptyId
        | UserValidationError::EmptyFirstName
        | UserValidationError::EmptyLastName
        | UserValidationError::EmptyEmail => ErrorCode::EmptyValue,
        UserValidationError::NameTooLong { .. } | UserValidationError::EmailTooLong { .. } => {
            ErrorCode::TooLong
        }
        UserValidationError::InvalidEmail => ErrorCode::InvalidEmail,
    };
    let mut details = json!({
        "field": field.as_str(),
        "code": code.as_str(),
    });
    if let UserValidationError::NameTooLong { max } | UserValidationError::EmailTooLong { max } =
        err
    {
        details["max"] = json!(max);
    }
    Error::invalid_request(err.to_string()).with_details(details)
}

fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    debug!(error = %err, "rejecting request body");
    let message = match &err {
        JsonPayloadError::ContentType => "request body must be JSON".to_owned(),
        other => format!("malformed JSON body: {other}"),
    };
    Error::invalid_request(message)
        .with_details(json!({ "code": ErrorCode::MalformedBody.as_str() }))
        .into()
}

fn query_error_handler(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    debug!(error = %err, "rejecting query string");
    Error::invalid_request(format!("malformed query string: {err}"))
        .with_details(json!({ "code": ErrorCode::MalformedQuery.as_str() }))
        .into()
}

/// JSON extractor configuration returning the API error envelope.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(json_error_handler)
}

/// Query extractor configuration returning the API error envelope.
pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(query_error_handler)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(UserValidationError::EmptyFirstName, "empty_value")]
    #[case(UserValidationError::InvalidEmail, "invalid_email")]
    #[case(UserValidationError::NameTooLong { max: 100 }, "too_long")]
    fn validation_failures_carry_field_and_code(
        #[case] err: UserValidationError,
        #[case] code: &str,
    ) {
        let error = field_validation_error(FieldName::new("firstName"), &err);
        let details = error.details().expect("details present");
        assert_eq!(details["field"], "firstName");
        assert_eq!(details["code"], code);
        assert_eq!(error.message(), err.to_string());
    }

    #[test]
    fn too_long_reports_limit() {
        let error = field_validation_error(
            FieldName::new("email"),
            &UserValidationError::EmailTooLong { max: 254 },
        );
        assert_eq!(error.details().expect("details")["max"], 254);
    }

    #[test]
    fn require_field_rejects_absent_values() {
        let error = require_field(None, FieldName::new("lastName")).expect_err("missing");
        assert_eq!(error.message(), "missing required field: lastName");
        assert_eq!(
            error.details(),
            Some(&json!({"field": "lastName", "code": "missing_field"}))
        );
        assert_eq!(
            require_field(Some("Doe".to_owned()), FieldName::new("lastName")).expect("present"),
            "Doe"
        );
    }
}
