//! Driving ports for creating and looking up users.
//!
//! Inbound adapters depend on these traits rather than on the service so
//! handlers can be exercised with mocks.

use async_trait::async_trait;

use crate::domain::{EmailAddress, PersonName, User, UserId};

use super::UserStoreError;

/// Validated input for [`CreateUserCommand::create_user`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateUserRequest {
    pub first_name: PersonName,
    pub last_name: PersonName,
    pub email: EmailAddress,
}

/// Outcomes of a failed creation.
///
/// The notification variants mean the user row *was* committed but the
/// creation event could not be handed to the channel.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserCreationError {
    #[error("a user with email {email} already exists")]
    ConstraintViolation { email: String },
    #[error("user storage failed: {source}")]
    Storage {
        #[source]
        source: UserStoreError,
    },
    #[error("user {user_id} was stored but its creation event timed out after {waited_ms} ms")]
    NotificationTimeout { user_id: UserId, waited_ms: u64 },
    #[error("user {user_id} was stored but the event channel is closed")]
    NotificationClosed { user_id: UserId },
}

/// Outcomes of a failed lookup.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserLookupError {
    #[error("user {id} was not found")]
    NotFound { id: UserId },
    #[error("user storage failed: {source}")]
    Storage {
        #[source]
        source: UserStoreError,
    },
}

/// Create a user and announce it.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CreateUserCommand: Send + Sync {
    async fn create_user(&self, request: CreateUserRequest) -> Result<User, UserCreationError>;
}

/// Read a single user by identifier.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserLookupQuery: Send + Sync {
    async fn fetch_user(&self, id: &UserId) -> Result<User, UserLookupError>;
}
