//! Bounded in-process channel for `UserCreatedEvent`s.
//!
//! One topic, FIFO, fixed capacity. Publishing waits at most
//! `publish_timeout` for a free slot. Consuming blocks on the queue and the
//! cancellation signal at the same time, so new events and shutdown are both
//! observed as soon as they happen, though never in the middle of a handler
//! call.
//!
//! The channel keeps its own sender, so it only reports `Closed` once the
//! consumer side has shut down.

use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc::error::SendTimeoutError;
use tokio::sync::{Mutex, mpsc, watch};
use tracing::{debug, info, warn};

use crate::domain::ports::{EventPublishError, UserCreatedEventPublisher, UserCreatedHandler};
use crate::domain::{TraceId, UserCreatedEvent};

/// Default number of buffered events.
pub const DEFAULT_EVENT_CHANNEL_CAPACITY: usize = 100;
/// Default time a publisher waits for a free slot.
pub const DEFAULT_PUBLISH_TIMEOUT: Duration = Duration::from_secs(1);

/// Single-topic, bounded event channel shared by producers and one consumer.
///
/// # Examples
/// ```
/// use std::time::Duration;
/// use simplecrm::outbound::events::UserCreatedEventChannel;
///
/// let channel = UserCreatedEventChannel::new(10, Duration::from_millis(250));
/// assert_eq!(channel.capacity(), 10);
/// assert_eq!(channel.len(), 0);
/// ```
pub struct UserCreatedEventChannel {
    sender: mpsc::Sender<UserCreatedEvent>,
    receiver: Mutex<mpsc::Receiver<UserCreatedEvent>>,
    publish_timeout: Duration,
}

impl Default for UserCreatedEventChannel {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_CHANNEL_CAPACITY, DEFAULT_PUBLISH_TIMEOUT)
    }
}

impl UserCreatedEventChannel {
    /// Create a channel holding at most `capacity` events (minimum one).
    pub fn new(capacity: usize, publish_timeout: Duration) -> Self {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        Self {
            sender,
            receiver: Mutex::new(receiver),
            publish_timeout,
        }
    }

    /// Maximum number of buffered events.
    pub fn capacity(&self) -> usize {
        self.sender.max_capacity()
    }

    /// Number of events waiting to be consumed. Never exceeds [`capacity`].
    ///
    /// [`capacity`]: Self::capacity
    pub fn len(&self) -> usize {
        self.sender.max_capacity() - self.sender.capacity()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn publish_timeout(&self) -> Duration {
        self.publish_timeout
    }

    /// Deliver events to `handler` in publish order until `cancel` flips to
    /// `true` or its sender is dropped.
    ///
    /// Only one consumer runs at a time; a second call waits until the first
    /// returns. On exit the channel is closed, so later publishes fail with
    /// [`EventPublishError::Closed`] instead of waiting out the timeout.
    pub async fn consume<H>(&self, handler: &H, mut cancel: watch::Receiver<bool>)
    where
        H: UserCreatedHandler + ?Sized,
    {
        let mut receiver = self.receiver.lock().await;
        while !*cancel.borrow_and_update() {
            tokio::select! {
                biased;
                changed = cancel.changed() => {
                    if changed.is_err() {
                        debug!("cancellation sender dropped");
                        break;
                    }
                }
                next = receiver.recv() => match next {
                    Some(event) => dispatch(handler, event).await,
                    None => break,
                },
            }
        }
        receiver.close();
        let undelivered = receiver.len();
        if undelivered > 0 {
            warn!(undelivered, "event channel closed with undelivered events");
        }
    }
}

async fn dispatch<H>(handler: &H, event: UserCreatedEvent)
where
    H: UserCreatedHandler + ?Sized,
{
    let user_id = event.user().id().clone();
    let trace_id = event.trace_id();
    info!(%user_id, trace_id = ?trace_id.map(|id| id.to_string()), "user created event received");

    let outcome = match trace_id {
        Some(id) => TraceId::scope(id, handler.handle(event)).await,
        None => handler.handle(event).await,
    };
    if let Err(error) = outcome {
        warn!(%user_id, %error, "user created handler failed");
    }
}

#[async_trait]
impl UserCreatedEventPublisher for UserCreatedEventChannel {
    async fn publish(&self, event: UserCreatedEvent) -> Result<(), EventPublishError> {
        match self.sender.send_timeout(event, self.publish_timeout).await {
            Ok(()) => {
                debug!(pending = self.len(), "user created event published");
                Ok(())
            }
            Err(SendTimeoutError::Timeout(event)) => {
                let waited_ms = u64::try_from(self.publish_timeout.as_millis()).unwrap_or(u64::MAX);
                warn!(
                    user_id = %event.user().id(),
                    waited_ms,
                    capacity = self.capacity(),
                    "event channel full; publish timed out"
                );
                Err(EventPublishError::timeout(waited_ms))
            }
            Err(SendTimeoutError::Closed(event)) => {
                warn!(user_id = %event.user().id(), "event channel closed; event dropped");
                Err(EventPublishError::closed())
            }
        }
    }
}

#[cfg(test)]
mod tests;
