//! In-process event plumbing for the user-creation workflow.
//!
//! - [`UserCreatedEventChannel`] implements the publisher port and owns the
//!   bounded queue.
//! - [`spawn_user_created_consumer`] runs the single consumer loop.

mod channel;
mod consumer;

pub use channel::{
    DEFAULT_EVENT_CHANNEL_CAPACITY, DEFAULT_PUBLISH_TIMEOUT, UserCreatedEventChannel,
};
pub use consumer::spawn_user_created_consumer;
