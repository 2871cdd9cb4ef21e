//! User creation workflow.
//!
//! `create_user` runs the whole sequence inside one transactional scope:
//! begin, generate the identifier, insert-returning, then commit or roll
//! back. Only after a successful commit is the `UserCreatedEvent` published.
//!
//! A publish failure is reported to the caller even though the row is already
//! committed. Callers must not assume a failed `create_user` left nothing
//! behind; the notification variants of [`UserCreationError`] say so
//! explicitly.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::domain::ports::{
    CreateUserCommand, CreateUserRequest, EventPublishError, UserCreatedEventPublisher,
    UserCreationError, UserLookupError, UserLookupQuery, UserStore, UserStoreError,
    UserStoreScope,
};
use crate::domain::{NewUser, User, UserCreatedEvent, UserId};

/// Orchestrates user creation and lookup over a store and an event publisher.
pub struct UserCreationService<S: ?Sized, E: ?Sized> {
    store: Arc<S>,
    events: Arc<E>,
}

impl<S: ?Sized, E: ?Sized> Clone for UserCreationService<S, E> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            events: Arc::clone(&self.events),
        }
    }
}

impl<S: ?Sized, E: ?Sized> UserCreationService<S, E> {
    pub fn new(store: Arc<S>, events: Arc<E>) -> Self {
        Self { store, events }
    }
}

fn classify_store_error(error: UserStoreError) -> UserCreationError {
    match error {
        UserStoreError::DuplicateEmail { email } => UserCreationError::ConstraintViolation { email },
        other => UserCreationError::Storage { source: other },
    }
}

fn classify_publish_error(error: EventPublishError, user_id: UserId) -> UserCreationError {
    match error {
        EventPublishError::Timeout { waited_ms } => UserCreationError::NotificationTimeout {
            user_id,
            waited_ms,
        },
        EventPublishError::Closed => UserCreationError::NotificationClosed { user_id },
    }
}

async fn discard(scope: Box<dyn UserStoreScope>) {
    if let Err(error) = scope.rollback().await {
        warn!(%error, "rollback after failed insert also failed");
    }
}

impl<S, E> UserCreationService<S, E>
where
    S: UserStore + ?Sized,
    E: UserCreatedEventPublisher + ?Sized,
{
    async fn insert_and_commit(&self, new_user: NewUser) -> Result<User, UserCreationError> {
        let mut scope = self
            .store
            .begin()
            .await
            .map_err(|source| UserCreationError::Storage { source })?;

        let user = match scope.insert_returning(&new_user).await {
            Ok(user) => user,
            Err(error) => {
                debug!(user_id = %new_user.id, %error, "insert failed; rolling back");
                discard(scope).await;
                return Err(classify_store_error(error));
            }
        };

        scope
            .commit()
            .await
            .map_err(|source| UserCreationError::Storage { source })?;
        Ok(user)
    }
}

#[async_trait]
impl<S, E> CreateUserCommand for UserCreationService<S, E>
where
    S: UserStore + ?Sized,
    E: UserCreatedEventPublisher + ?Sized,
{
    async fn create_user(&self, request: CreateUserRequest) -> Result<User, UserCreationError> {
        let CreateUserRequest {
            first_name,
            last_name,
            email,
        } = request;
        let new_user = NewUser {
            id: UserId::random(),
            first_name,
            last_name,
            email,
        };

        let user = self.insert_and_commit(new_user).await?;
        info!(user_id = %user.id(), "user created");

        let user_id = user.id().clone();
        self.events
            .publish(UserCreatedEvent::new(user.clone()))
            .await
            .map_err(|error| {
                warn!(%user_id, %error, "user committed but creation event was not published");
                classify_publish_error(error, user_id)
            })?;

        Ok(user)
    }
}

#[async_trait]
impl<S, E> UserLookupQuery for UserCreationService<S, E>
where
    S: UserStore + ?Sized,
    E: UserCreatedEventPublisher + ?Sized,
{
    async fn fetch_user(&self, id: &UserId) -> Result<User, UserLookupError> {
        let mut conn = self
            .store
            .connect()
            .await
            .map_err(|source| UserLookupError::Storage { source })?;
        conn.fetch_by_id(id).await.map_err(|error| match error {
            UserStoreError::NotFound { .. } => UserLookupError::NotFound { id: id.clone() },
            other => UserLookupError::Storage { source: other },
        })
    }
}

#[cfg(test)]
#[path = "user_creation_tests.rs"]
mod tests;
