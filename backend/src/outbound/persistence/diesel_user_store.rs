//! PostgreSQL-backed `UserStore`.
//!
//! Both executors share the same two statement functions; the scope only adds
//! manual transaction control over its owned connection.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::{AnsiTransactionManager, AsyncPgConnection, RunQueryDsl, TransactionManager};
use tracing::{debug, error};

use crate::domain::ports::{UserQueries, UserStore, UserStoreError, UserStoreScope};
use crate::domain::{NewUser, User, UserId};

use super::diesel_error_mapping::{
    map_diesel_error, map_insert_error, map_pool_error, map_transaction_error,
};
use super::models::{NewUserRow, UserRow};
use super::pool::{DbPool, OwnedConnection};
use super::schema::users;

/// Diesel-backed user store.
#[derive(Clone)]
pub struct DieselUserStore {
    pool: DbPool,
}

impl DieselUserStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn row_to_user(row: UserRow) -> Result<User, UserStoreError> {
    User::try_from(row).map_err(|err| {
        error!(error = %err, "stored user row failed validation");
        UserStoreError::query("stored user row is invalid")
    })
}

async fn fetch_by_id(conn: &mut AsyncPgConnection, id: &UserId) -> Result<User, UserStoreError> {
    let row = users::table
        .filter(users::id.eq(id.as_ref()))
        .select(UserRow::as_select())
        .first(conn)
        .await
        .optional()
        .map_err(map_diesel_error)?;

    match row {
        Some(row) => row_to_user(row),
        None => Err(UserStoreError::not_found(id.as_ref())),
    }
}

async fn insert_returning(
    conn: &mut AsyncPgConnection,
    new_user: &NewUser,
) -> Result<User, UserStoreError> {
    let row = diesel::insert_into(users::table)
        .values(NewUserRow::from(new_user))
        .returning(UserRow::as_returning())
        .get_result(conn)
        .await
        .map_err(|err| map_insert_error(err, new_user.email.as_ref()))?;
    row_to_user(row)
}

/// Autocommit executor over one pooled connection.
struct DieselUserQueries {
    conn: OwnedConnection,
}

#[async_trait]
impl UserQueries for DieselUserQueries {
    async fn fetch_by_id(&mut self, id: &UserId) -> Result<User, UserStoreError> {
        fetch_by_id(&mut *self.conn, id).await
    }

    async fn insert_returning(&mut self, new_user: &NewUser) -> Result<User, UserStoreError> {
        insert_returning(&mut *self.conn, new_user).await
    }
}

/// Open transaction on one pooled connection.
struct DieselUserScope {
    conn: OwnedConnection,
}

#[async_trait]
impl UserQueries for DieselUserScope {
    async fn fetch_by_id(&mut self, id: &UserId) -> Result<User, UserStoreError> {
        fetch_by_id(&mut *self.conn, id).await
    }

    async fn insert_returning(&mut self, new_user: &NewUser) -> Result<User, UserStoreError> {
        insert_returning(&mut *self.conn, new_user).await
    }
}

#[async_trait]
impl UserStoreScope for DieselUserScope {
    async fn commit(self: Box<Self>) -> Result<(), UserStoreError> {
        let mut scope = *self;
        AnsiTransactionManager::commit_transaction(&mut *scope.conn)
            .await
            .map_err(map_transaction_error)
    }

    async fn rollback(self: Box<Self>) -> Result<(), UserStoreError> {
        let mut scope = *self;
        AnsiTransactionManager::rollback_transaction(&mut *scope.conn)
            .await
            .map_err(map_transaction_error)
    }
}

#[async_trait]
impl UserStore for DieselUserStore {
    async fn begin(&self) -> Result<Box<dyn UserStoreScope>, UserStoreError> {
        let mut conn = self.pool.checkout().await.map_err(map_pool_error)?;
        AnsiTransactionManager::begin_transaction(&mut *conn)
            .await
            .map_err(map_transaction_error)?;
        debug!("user store transaction opened");
        Ok(Box::new(DieselUserScope { conn }))
    }

    async fn connect(&self) -> Result<Box<dyn UserQueries>, UserStoreError> {
        let conn = self.pool.checkout().await.map_err(map_pool_error)?;
        Ok(Box::new(DieselUserQueries { conn }))
    }
}
