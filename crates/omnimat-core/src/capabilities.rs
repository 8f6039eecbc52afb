//! Optional feature registry.
//!
//! Optional collaborators (a linear-algebra backend, a viewer, file links)
//! are registered explicitly while the application is configured. Callers
//! ask [`CapabilityRegistry::is_available`] and fetch the injected
//! implementation with [`CapabilityRegistry::get`]; nothing is discovered at
//! runtime.
//!
//! # Examples
//!
//! ```
//! use omnimat_core::capabilities::{CapabilityRegistry, Feature};
//! use omnimat_core::link::{DelimitedTextSource, StringTableReader};
//! use std::sync::Arc;
//!
//! let mut registry = CapabilityRegistry::new();
//! assert!(!registry.is_available(Feature::FileLink));
//!
//! let reader: Arc<dyn DelimitedTextSource> = Arc::new(StringTableReader);
//! registry.register(Feature::FileLink, Arc::new(reader));
//! assert!(registry.is_available(Feature::FileLink));
//! assert!(registry.get::<Arc<dyn DelimitedTextSource>>(Feature::FileLink).is_some());
//! ```

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Optional collaborator kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feature {
    LinearAlgebraBackend,
    Viewer,
    FileLink,
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Feature::LinearAlgebraBackend => f.write_str("linear-algebra-backend"),
            Feature::Viewer => f.write_str("viewer"),
            Feature::FileLink => f.write_str("file-link"),
        }
    }
}

/// Feature flags plus their injected implementations.
#[derive(Default)]
pub struct CapabilityRegistry {
    providers: HashMap<Feature, Arc<dyn Any + Send + Sync>>,
}

impl CapabilityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `feature` available, backed by `provider`. Replaces any earlier
    /// provider.
    pub fn register(&mut self, feature: Feature, provider: Arc<dyn Any + Send + Sync>) {
        tracing::debug!(%feature, "capability registered");
        self.providers.insert(feature, provider);
    }

    pub fn unregister(&mut self, feature: Feature) -> bool {
        self.providers.remove(&feature).is_some()
    }

    pub fn is_available(&self, feature: Feature) -> bool {
        self.providers.contains_key(&feature)
    }

    /// Provider for `feature`, if one of type `T` is registered.
    pub fn get<T: Any + Send + Sync>(&self, feature: Feature) -> Option<&T> {
        self.providers.get(&feature)?.downcast_ref::<T>()
    }
}

impl fmt::Debug for CapabilityRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.providers.keys()).finish()
    }
}
