//! Translate pool and Diesel failures into `UserStoreError`.
//!
//! Driver messages are logged at debug level and replaced with fixed text so
//! SQL fragments never travel up to callers.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use crate::domain::ports::UserStoreError;

use super::pool::PoolError;

const PRIMARY_KEY_CONSTRAINT: &str = "users_pkey";

pub(super) fn map_pool_error(error: PoolError) -> UserStoreError {
    let message = match error {
        PoolError::Checkout { message } | PoolError::Build { message } => message,
    };
    UserStoreError::connection(message)
}

fn log_diesel_error(error: &DieselError) {
    match error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(error = %error, "diesel operation failed"),
    }
}

/// Map statement failures that carry no constraint meaning.
pub(super) fn map_diesel_error(error: DieselError) -> UserStoreError {
    log_diesel_error(&error);
    match error {
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            UserStoreError::connection("database connection closed")
        }
        DieselError::QueryBuilderError(_) => UserStoreError::query("database query error"),
        _ => UserStoreError::query("database error"),
    }
}

/// Map an insert failure, recognising the unique-email constraint.
pub(super) fn map_insert_error(error: DieselError, email: &str) -> UserStoreError {
    if let DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) = &error {
        if info.constraint_name() != Some(PRIMARY_KEY_CONSTRAINT) {
            debug!(
                constraint = info.constraint_name(),
                "insert rejected by unique constraint"
            );
            return UserStoreError::duplicate_email(email);
        }
    }
    map_diesel_error(error)
}

/// Map transaction-control failures.
pub(super) fn map_transaction_error(error: DieselError) -> UserStoreError {
    log_diesel_error(&error);
    match error {
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            UserStoreError::connection("database connection closed")
        }
        _ => UserStoreError::transaction("transaction control failed"),
    }
}
