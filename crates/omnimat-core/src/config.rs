//! Matrix construction configuration

use crate::types::StorageType;
use std::env;

/// Environment variable selecting the default storage type (`DENSE` / `SPARSE`)
pub const ENV_DEFAULT_STORAGE: &str = "OMNIMAT_DEFAULT_STORAGE";

/// Environment variable capping sparse matrix entries
pub const ENV_MAX_SPARSE_ENTRIES: &str = "OMNIMAT_MAX_SPARSE_ENTRIES";

/// Settings applied by a [`FactoryRegistry`](crate::factory::FactoryRegistry)
/// when it creates matrices
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MatrixConfig {
    /// Storage used when a caller does not pick one
    pub default_storage: StorageType,
    /// Entry cap for sparse matrices built by the default factories
    pub max_sparse_entries: Option<usize>,
}

impl MatrixConfig {
    /// Create a configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults overridden by `OMNIMAT_DEFAULT_STORAGE` and
    /// `OMNIMAT_MAX_SPARSE_ENTRIES`. Unparseable values are ignored with a
    /// warning.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(raw) = lookup(ENV_DEFAULT_STORAGE) {
            match StorageType::parse(&raw) {
                Some(storage) => config.default_storage = storage,
                None => tracing::warn!(value = %raw, "ignoring {}", ENV_DEFAULT_STORAGE),
            }
        }
        if let Some(raw) = lookup(ENV_MAX_SPARSE_ENTRIES) {
            match raw.trim().parse::<usize>() {
                Ok(max) => config.max_sparse_entries = Some(max),
                Err(_) => tracing::warn!(value = %raw, "ignoring {}", ENV_MAX_SPARSE_ENTRIES),
            }
        }
        config
    }

    /// Set the default storage type
    pub fn with_default_storage(mut self, storage: StorageType) -> Self {
        self.default_storage = storage;
        self
    }

    /// Set the sparse entry cap
    pub fn with_max_sparse_entries(mut self, max: usize) -> Self {
        self.max_sparse_entries = Some(max);
        self
    }
}
