//! Domain primitives, ports, and services.
//!
//! Purpose: define the strongly typed user model, the error envelope shared by
//! adapters, and the user-creation workflow. Nothing here knows about HTTP,
//! SQL, or the concrete event channel.
//!
//! Public surface:
//! - `User`, `NewUser` and their field newtypes.
//! - `Error` / `ErrorCode`: transport-agnostic error payload.
//! - `UserCreationService`: implements the driving ports in [`ports`].
//! - `UserCreatedEvent` and `WelcomeNotificationHandler`.

pub mod error;
pub mod ports;
pub mod trace_id;
pub mod user;
pub mod user_creation;
pub mod user_events;
pub mod welcome_notifier;

pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{
    EMAIL_MAX, EmailAddress, NAME_MAX, NameField, NewUser, PersonName, User, UserDto, UserId,
    UserValidationError,
};
pub use self::user_creation::UserCreationService;
pub use self::user_events::UserCreatedEvent;
pub use self::welcome_notifier::WelcomeNotificationHandler;
