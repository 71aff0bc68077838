//! Store configuration loading.

use crate::error::{StoreError, StoreResult};

pub const DATABASE_URL_VAR: &str = "NORTHWIND_DATABASE_URL";
pub const MAX_CONNECTIONS_VAR: &str = "NORTHWIND_MAX_CONNECTIONS";

const DEFAULT_DATABASE_URL: &str = "sqlite://northwind.db";

/// Connection settings for the SQLite store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub database_url: String,
    /// Upper bound of the pool. One interactive operator needs one connection.
    pub max_connections: u32,
    /// Create the database file when it does not exist.
    pub create_if_missing: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            max_connections: 1,
            create_if_missing: false,
        }
    }
}

impl StoreConfig {
    /// Load from `NORTHWIND_DATABASE_URL` / `NORTHWIND_MAX_CONNECTIONS`,
    /// falling back to defaults for unset variables.
    pub fn from_env() -> StoreResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`StoreConfig::from_env`], reading variables through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> StoreResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        match lookup(DATABASE_URL_VAR) {
            Some(url) if !url.trim().is_empty() => config.database_url = url.trim().to_string(),
            _ => tracing::debug!(
                default = DEFAULT_DATABASE_URL,
                "{DATABASE_URL_VAR} not set; using default database"
            ),
        }

        if let Some(raw) = lookup(MAX_CONNECTIONS_VAR) {
            let max = raw.trim().parse::<u32>().map_err(|e| {
                StoreError::Config(format!("{MAX_CONNECTIONS_VAR}={raw:?}: {e}"))
            })?;
            if max == 0 {
                return Err(StoreError::Config(format!(
                    "{MAX_CONNECTIONS_VAR} must be at least 1"
                )));
            }
            config.max_connections = max;
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn unset_variables_fall_back_to_defaults() {
        let config = StoreConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config, StoreConfig::default());
        assert_eq!(config.database_url, "sqlite://northwind.db");
        assert_eq!(config.max_connections, 1);
    }

    #[test]
    fn variables_override_defaults() {
        let config = StoreConfig::from_lookup(lookup_from(&[
            (DATABASE_URL_VAR, " sqlite:///data/nw.db "),
            (MAX_CONNECTIONS_VAR, "4"),
        ]))
        .unwrap();

        assert_eq!(config.database_url, "sqlite:///data/nw.db");
        assert_eq!(config.max_connections, 4);
    }

    #[test]
    fn rejects_unparseable_or_zero_pool_size() {
        let err = StoreConfig::from_lookup(lookup_from(&[(MAX_CONNECTIONS_VAR, "many")])).unwrap_err();
        assert!(matches!(err, StoreError::Config(_)));

        let err = StoreConfig::from_lookup(lookup_from(&[(MAX_CONNECTIONS_VAR, "0")])).unwrap_err();
        assert!(matches!(err, StoreError::Config(_)));
    }
}
