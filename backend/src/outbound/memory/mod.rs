//! Process-local adapters with no external infrastructure.

mod in_memory_user_store;

pub use in_memory_user_store::InMemoryUserStore;
