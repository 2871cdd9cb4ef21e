//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod user_commands;
mod user_created_events;
mod user_store;

pub use user_commands::{
    CreateUserCommand, CreateUserRequest, UserCreationError, UserLookupError, UserLookupQuery,
};
#[cfg(test)]
pub use user_commands::{MockCreateUserCommand, MockUserLookupQuery};
pub use user_created_events::{
    EventPublishError, UserCreatedEventPublisher, UserCreatedHandler, UserCreatedHandlerError,
};
#[cfg(test)]
pub use user_created_events::{MockUserCreatedEventPublisher, MockUserCreatedHandler};
#[cfg(test)]
pub use user_store::MockUserStore;
pub use user_store::{UserQueries, UserStore, UserStoreError, UserStoreScope};
