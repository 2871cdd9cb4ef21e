//! HTTP adapter mapping for domain errors.
//!
//! Purpose: keep the domain error type HTTP-agnostic while allowing Actix
//! handlers to turn domain failures into consistent JSON responses and status
//! codes. Port-level failures from the creation and lookup use-cases are
//! translated here and nowhere else.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde_json::json;
use tracing::error;

use crate::domain::ports::{UserCreationError, UserLookupError, UserStoreError};
use crate::domain::{Error, ErrorCode, TRACE_ID_HEADER};

/// Convenient result alias for HTTP handlers.
pub type ApiResult<T> = Result<T, Error>;

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::Conflict => StatusCode::CONFLICT,
        ErrorCode::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn redact_if_internal(error: &Error) -> Error {
    if matches!(error.code(), ErrorCode::InternalError) {
        let mut redacted = Error::internal("Internal server error");
        if let Some(id) = error.trace_id() {
            redacted = redacted.with_trace_id(id.to_owned());
        }
        redacted
    } else {
        error.clone()
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        let mut builder = HttpResponse::build(self.status_code());
        if let Some(id) = self.trace_id() {
            builder.insert_header((TRACE_ID_HEADER, id.to_owned()));
        }

        builder.json(redact_if_internal(self))
    }
}

impl From<actix_web::Error> for Error {
    fn from(err: actix_web::Error) -> Self {
        // Do not leak implementation details to clients.
        error!(error = %err, "actix error promoted to domain error");
        Error::internal("Internal server error")
    }
}

fn storage_error(source: &UserStoreError) -> Error {
    match source {
        UserStoreError::Connection { .. } => {
            error!(error = %source, "user store unavailable");
            Error::service_unavailable("user store is unavailable")
        }
        other => {
            error!(error = %other, "user store failure");
            Error::internal(other.to_string())
        }
    }
}

impl From<UserCreationError> for Error {
    fn from(err: UserCreationError) -> Self {
        match err {
            UserCreationError::ConstraintViolation { email } => {
                Error::conflict("a user with this email already exists")
                    .with_details(json!({ "field": "email", "value": email, "code": "duplicate_email" }))
            }
            UserCreationError::Storage { source } => storage_error(&source),
            other @ (UserCreationError::NotificationTimeout { .. }
            | UserCreationError::NotificationClosed { .. }) => {
                error!(error = %other, "user creation notification failed");
                Error::internal(other.to_string())
            }
        }
    }
}

impl From<UserLookupError> for Error {
    fn from(err: UserLookupError) -> Self {
        match err {
            UserLookupError::NotFound { id } => {
                Error::not_found(format!("user {id} not found"))
                    .with_details(json!({ "id": id.as_ref() }))
            }
            UserLookupError::Storage { source } => storage_error(&source),
        }
    }
}

#[cfg(test)]
mod tests;
