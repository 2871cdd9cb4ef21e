//! Outbound adapters implementing domain ports.
//!
//! - **persistence**: PostgreSQL user store using Diesel
//! - **memory**: process-local user store for tests and database-less runs
//! - **events**: bounded in-process channel for user-created events
//!
//! Adapters translate between domain types and infrastructure
//! representations and contain no business rules.

pub mod events;
pub mod memory;
pub mod persistence;
