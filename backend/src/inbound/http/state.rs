//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{CreateUserCommand, UserLookupQuery};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub create_user: Arc<dyn CreateUserCommand>,
    pub lookup: Arc<dyn UserLookupQuery>,
}

impl HttpState {
    /// Construct state from independent port implementations.
    pub fn new(create_user: Arc<dyn CreateUserCommand>, lookup: Arc<dyn UserLookupQuery>) -> Self {
        Self {
            create_user,
            lookup,
        }
    }

    /// Construct state from one service that implements both ports.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use simplecrm::domain::UserCreationService;
    /// use simplecrm::inbound::http::state::HttpState;
    /// use simplecrm::outbound::events::UserCreatedEventChannel;
    /// use simplecrm::outbound::memory::InMemoryUserStore;
    ///
    /// let service = UserCreationService::new(
    ///     Arc::new(InMemoryUserStore::new()),
    ///     Arc::new(UserCreatedEventChannel::default()),
    /// );
    /// let state = HttpState::from_service(Arc::new(service));
    /// let _lookup = state.lookup.clone();
    /// ```
    pub fn from_service<T>(service: Arc<T>) -> Self
    where
        T: CreateUserCommand + UserLookupQuery + 'static,
    {
        let create_user: Arc<dyn CreateUserCommand> = service.clone();
        let lookup: Arc<dyn UserLookupQuery> = service;
        Self::new(create_user, lookup)
    }
}
