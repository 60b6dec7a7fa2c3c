//! Storage implementations for different backends

pub mod in_memory;
pub mod retry;
#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use in_memory::InMemoryStore;
pub use retry::{RetryPolicy, with_backoff};
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteStore;
