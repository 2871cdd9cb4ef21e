//! Driven port for user persistence.
//!
//! The gateway is split in two. [`UserQueries`] is the narrow executor
//! capability (fetch by id, insert returning the row) shared by a direct
//! connection and a transactional scope. [`UserStore`] hands those executors
//! out and is the only place a transaction is opened.
//!
//! A [`UserStoreScope`] dropped without `commit` or `rollback` must leave no
//! trace in the store.

use async_trait::async_trait;

use crate::domain::{NewUser, User, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by user store adapters.
    pub enum UserStoreError {
        /// No row matched the requested identifier.
        NotFound { id: String } => "user {id} was not found",
        /// The email is already registered to another user.
        DuplicateEmail { email: String } => "email {email} is already registered",
        /// A connection could not be obtained.
        Connection { message: String } => "user store connection failed: {message}",
        /// A statement failed during execution.
        Query { message: String } => "user store query failed: {message}",
        /// Beginning, committing, or rolling back a transaction failed.
        Transaction { message: String } => "user store transaction failed: {message}",
    }
}

/// Statements the creation workflow runs against the store.
///
/// Implementations never open or close transactions themselves.
#[async_trait]
pub trait UserQueries: Send {
    /// Fetch exactly one user or fail with [`UserStoreError::NotFound`].
    ///
    /// The identifier's shape is not checked up front; a store that rejects
    /// it reports a query error.
    async fn fetch_by_id(&mut self, id: &UserId) -> Result<User, UserStoreError>;

    /// Insert a row and return it as persisted, including `created_at`.
    ///
    /// A unique-email conflict surfaces as [`UserStoreError::DuplicateEmail`].
    async fn insert_returning(&mut self, new_user: &NewUser) -> Result<User, UserStoreError>;
}

/// A transactional scope owned by exactly one caller.
#[async_trait]
pub trait UserStoreScope: UserQueries {
    /// Make every write in the scope visible.
    async fn commit(self: Box<Self>) -> Result<(), UserStoreError>;

    /// Discard every write in the scope.
    async fn rollback(self: Box<Self>) -> Result<(), UserStoreError>;
}

/// Hands out executors over the user table.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Open a transactional scope.
    async fn begin(&self) -> Result<Box<dyn UserStoreScope>, UserStoreError>;

    /// Borrow a direct (autocommit) executor.
    async fn connect(&self) -> Result<Box<dyn UserQueries>, UserStoreError>;
}
