//! Process-local `UserStore` used when no database is configured and in tests.
//!
//! Behaves like a table with a unique index on `email`: an insert reserves
//! the email immediately, so a second scope inserting the same address fails
//! even before the first commits. Staged rows become visible to other
//! executors only on commit. Rollback, or dropping an unfinished scope,
//! releases the reservations.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockable::{Clock, DefaultClock};
use tracing::debug;

use crate::domain::ports::{UserQueries, UserStore, UserStoreError, UserStoreScope};
use crate::domain::{EmailAddress, NewUser, User, UserId};

#[derive(Debug, Default)]
struct StoreState {
    committed: HashMap<UserId, User>,
    emails: HashSet<EmailAddress>,
    last_created_at: Option<DateTime<Utc>>,
}

impl StoreState {
    fn reserve(&mut self, new_user: &NewUser) -> Result<(), UserStoreError> {
        if self.committed.contains_key(&new_user.id) {
            return Err(UserStoreError::query("duplicate user id"));
        }
        if !self.emails.insert(new_user.email.clone()) {
            return Err(UserStoreError::duplicate_email(new_user.email.as_ref()));
        }
        Ok(())
    }

    /// `created_at` never moves backwards, even if the wall clock does.
    fn next_created_at(&mut self, now: DateTime<Utc>) -> DateTime<Utc> {
        let stamp = match self.last_created_at {
            Some(last) if last > now => last,
            _ => now,
        };
        self.last_created_at = Some(stamp);
        stamp
    }
}

#[derive(Clone)]
struct Shared {
    state: Arc<Mutex<StoreState>>,
    clock: Arc<dyn Clock>,
}

impl Shared {
    fn lock(&self) -> Result<MutexGuard<'_, StoreState>, UserStoreError> {
        self.state
            .lock()
            .map_err(|_| UserStoreError::connection("in-memory user store lock poisoned"))
    }

    fn stage(&self, state: &mut StoreState, new_user: &NewUser) -> Result<User, UserStoreError> {
        state.reserve(new_user)?;
        let created_at = state.next_created_at(self.clock.utc());
        Ok(User::from_persisted(new_user.clone(), created_at))
    }
}

/// In-memory user store.
#[derive(Clone)]
pub struct InMemoryUserStore {
    shared: Shared,
}

impl Default for InMemoryUserStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryUserStore {
    /// Store stamped by the system clock.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(DefaultClock))
    }

    /// Store stamped by `clock`.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            shared: Shared {
                state: Arc::new(Mutex::new(StoreState::default())),
                clock,
            },
        }
    }
}

/// Autocommit executor: every insert is committed immediately.
struct InMemoryQueries {
    shared: Shared,
}

#[async_trait]
impl UserQueries for InMemoryQueries {
    async fn fetch_by_id(&mut self, id: &UserId) -> Result<User, UserStoreError> {
        let state = self.shared.lock()?;
        state
            .committed
            .get(id)
            .cloned()
            .ok_or_else(|| UserStoreError::not_found(id.as_ref()))
    }

    async fn insert_returning(&mut self, new_user: &NewUser) -> Result<User, UserStoreError> {
        let mut state = self.shared.lock()?;
        let user = self.shared.stage(&mut state, new_user)?;
        state.committed.insert(user.id().clone(), user.clone());
        Ok(user)
    }
}

struct InMemoryScope {
    shared: Shared,
    staged: Vec<User>,
    finished: bool,
}

impl InMemoryScope {
    fn release_reservations(&mut self) {
        self.finished = true;
        if self.staged.is_empty() {
            return;
        }
        let mut state = self
            .shared
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        for user in self.staged.drain(..) {
            state.emails.remove(user.email());
        }
    }
}

#[async_trait]
impl UserQueries for InMemoryScope {
    async fn fetch_by_id(&mut self, id: &UserId) -> Result<User, UserStoreError> {
        if let Some(user) = self.staged.iter().find(|user| user.id() == id) {
            return Ok(user.clone());
        }
        let state = self.shared.lock()?;
        state
            .committed
            .get(id)
            .cloned()
            .ok_or_else(|| UserStoreError::not_found(id.as_ref()))
    }

    async fn insert_returning(&mut self, new_user: &NewUser) -> Result<User, UserStoreError> {
        let user = {
            let mut state = self.shared.lock()?;
            self.shared.stage(&mut state, new_user)?
        };
        self.staged.push(user.clone());
        Ok(user)
    }
}

#[async_trait]
impl UserStoreScope for InMemoryScope {
    async fn commit(self: Box<Self>) -> Result<(), UserStoreError> {
        let mut scope = *self;
        let count = scope.staged.len();
        {
            // On failure the staged rows stay put so `Drop` can release them.
            let mut state = scope.shared.lock()?;
            for user in scope.staged.drain(..) {
                state.committed.insert(user.id().clone(), user);
            }
        }
        scope.finished = true;
        debug!(rows = count, "in-memory transaction committed");
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<(), UserStoreError> {
        let mut scope = *self;
        let count = scope.staged.len();
        scope.release_reservations();
        debug!(rows = count, "in-memory transaction rolled back");
        Ok(())
    }
}

impl Drop for InMemoryScope {
    fn drop(&mut self) {
        if !self.finished {
            self.release_reservations();
        }
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn begin(&self) -> Result<Box<dyn UserStoreScope>, UserStoreError> {
        Ok(Box::new(InMemoryScope {
            shared: self.shared.clone(),
            staged: Vec::new(),
            finished: false,
        }))
    }

    async fn connect(&self) -> Result<Box<dyn UserQueries>, UserStoreError> {
        Ok(Box::new(InMemoryQueries {
            shared: self.shared.clone(),
        }))
    }
}
