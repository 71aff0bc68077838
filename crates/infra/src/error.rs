use thiserror::Error;

use northwind_core::DomainError;

pub type StoreResult<T> = Result<T, StoreError>;

/// Data store operation error.
///
/// These are **infrastructure errors** (connectivity, SQL, row decoding) as
/// opposed to domain errors. The statistics engine returns them to its caller
/// unchanged and never retries.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store could not be reached (pool closed, connection refused, ...).
    #[error("data store unavailable: {0}")]
    Unavailable(String),

    /// The underlying query failed.
    #[error("query failed: {0}")]
    Query(#[from] sqlx::Error),

    /// A row could not be turned into a read model.
    #[error("failed to decode {table} row: {reason}")]
    Decode { table: &'static str, reason: String },

    /// A row violated a domain rule (negative price, zero quantity, ...).
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Store configuration was invalid.
    #[error("invalid store configuration: {0}")]
    Config(String),
}

impl StoreError {
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }

    pub fn decode(table: &'static str, reason: impl Into<String>) -> Self {
        Self::Decode {
            table,
            reason: reason.into(),
        }
    }
}
