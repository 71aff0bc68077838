//! Infrastructure layer: the read-only data store behind the statistics engine.

pub mod config;
pub mod error;
pub mod read_model;

pub use config::StoreConfig;
pub use error::{StoreError, StoreResult};
pub use read_model::sample::sample_dataset;
pub use read_model::{DataStore, Dataset, InMemoryStore, SqliteStore, StoreSession};
