//! Default downstream reaction to a new user: a welcome notification.
//!
//! Delivery is a structured log line for now; a mail adapter would implement
//! the same handler port.

use async_trait::async_trait;
use tracing::info;

use crate::domain::UserCreatedEvent;
use crate::domain::ports::{UserCreatedHandler, UserCreatedHandlerError};

/// Logs a welcome notification for each newly created user.
#[derive(Debug, Default, Clone, Copy)]
pub struct WelcomeNotificationHandler;

impl WelcomeNotificationHandler {
    /// Greeting sent to the new user.
    pub fn greeting(event: &UserCreatedEvent) -> String {
        let user = event.user();
        format!(
            "Welcome to SimpleCRM, {} {}!",
            user.first_name(),
            user.last_name()
        )
    }
}

#[async_trait]
impl UserCreatedHandler for WelcomeNotificationHandler {
    async fn handle(&self, event: UserCreatedEvent) -> Result<(), UserCreatedHandlerError> {
        let greeting = Self::greeting(&event);
        let user = event.user();
        info!(
            user_id = %user.id(),
            email = %user.email(),
            greeting = %greeting,
            "welcome notification sent"
        );
        Ok(())
    }
}
