//! Background task that drains the user-created channel.

use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::info;

use crate::domain::ports::UserCreatedHandler;

use super::UserCreatedEventChannel;

/// Spawn the consumer loop on the current runtime.
///
/// Call once at startup. The task ends when `cancel` is set to `true` (or its
/// sender is dropped); await the returned handle to know it has stopped.
///
/// ```ignore
/// let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
/// let consumer = spawn_user_created_consumer(channel, handler, shutdown_rx);
/// // ... serve requests ...
/// shutdown_tx.send(true)?;
/// consumer.await?;
/// ```
pub fn spawn_user_created_consumer(
    channel: Arc<UserCreatedEventChannel>,
    handler: Arc<dyn UserCreatedHandler>,
    cancel: watch::Receiver<bool>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!(
            capacity = channel.capacity(),
            "user created consumer started"
        );
        channel.consume(handler.as_ref(), cancel).await;
        info!("user created consumer stopped");
    })
}
