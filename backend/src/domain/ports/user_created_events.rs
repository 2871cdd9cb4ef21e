//! Ports on either side of the user-created event channel.
//!
//! The creation workflow publishes through [`UserCreatedEventPublisher`]; the
//! background consumer hands each event to a [`UserCreatedHandler`].

use async_trait::async_trait;

use crate::domain::UserCreatedEvent;

use super::define_port_error;

define_port_error! {
    /// Errors raised when publishing a creation event.
    pub enum EventPublishError {
        /// The channel stayed full for the whole publish timeout.
        Timeout { waited_ms: u64 } => "event channel stayed full for {waited_ms} ms",
        /// The consuming side has gone away.
        Closed => "event channel is closed",
    }
}

define_port_error! {
    /// Failures reported by downstream event handlers.
    pub enum UserCreatedHandlerError {
        /// The side effect could not be completed.
        Failed { message: String } => "user-created handler failed: {message}",
    }
}

/// Publishes creation events for downstream side effects.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserCreatedEventPublisher: Send + Sync {
    /// Enqueue `event`, waiting a bounded time for capacity.
    async fn publish(&self, event: UserCreatedEvent) -> Result<(), EventPublishError>;
}

/// Reacts to a single creation event.
///
/// Called by the consumer loop one event at a time; the next event is not
/// dequeued until this returns.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserCreatedHandler: Send + Sync {
    async fn handle(&self, event: UserCreatedEvent) -> Result<(), UserCreatedHandlerError>;
}
