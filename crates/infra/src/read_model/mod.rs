//! Read-only data store abstractions for the statistics engine.

pub mod in_memory;
pub mod sample;
pub mod sqlite;
pub mod store;

pub use in_memory::{Dataset, InMemoryStore};
pub use sqlite::SqliteStore;
pub use store::{DataStore, StoreSession};
