//! PostgreSQL persistence adapters using Diesel.
//!
//! Row structs (`models.rs`) and table definitions (`schema.rs`) stay private
//! to this module; only the store and its pool are exported.
//!
//! ```ignore
//! use simplecrm::outbound::persistence::{DbPool, DieselUserStore, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/crm")).await?;
//! let store = DieselUserStore::new(pool);
//! ```

mod diesel_error_mapping;
mod diesel_user_store;
mod models;
mod pool;
mod schema;

pub use diesel_user_store::DieselUserStore;
pub use pool::{DbPool, OwnedConnection, PoolConfig, PoolError};
