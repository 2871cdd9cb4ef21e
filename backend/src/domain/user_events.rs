//! Events emitted by the user-creation workflow.

use crate::domain::{TraceId, User};

/// Emitted exactly once per committed user creation.
///
/// Immutable once built; the event channel owns it until a consumer takes it
/// or the publish attempt times out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserCreatedEvent {
    trace_id: Option<TraceId>,
    user: User,
}

impl UserCreatedEvent {
    /// Wrap a persisted user, capturing the trace identifier in scope.
    #[must_use]
    pub fn new(user: User) -> Self {
        Self {
            trace_id: TraceId::current(),
            user,
        }
    }

    /// Correlation identifier of the request that created the user.
    pub fn trace_id(&self) -> Option<TraceId> {
        self.trace_id
    }

    pub fn user(&self) -> &User {
        &self.user
    }

    pub fn into_user(self) -> User {
        self.user
    }
}
