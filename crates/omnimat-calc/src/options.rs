//! Evaluation modes, dimension selectors and calculation options

use omnimat_core::StorageType;
use std::fmt;

/// How a calculation is delivered to the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EvalMode {
    /// Return the node itself; every read recomputes from current sources
    #[default]
    Link,
    /// Evaluate once into a freshly allocated matrix
    New,
    /// Evaluate once and write the result back into the first source
    Orig,
}

/// Axis along which a calculation groups cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Dimension {
    /// Every cell forms one group
    #[default]
    All,
    /// One group per row (2D only)
    Row,
    /// One group per column (2D only)
    Column,
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dimension::All => f.write_str("ALL"),
            Dimension::Row => f.write_str("ROW"),
            Dimension::Column => f.write_str("COLUMN"),
        }
    }
}

/// Options shared by statistical calculations and materialisation
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CalcOptions {
    /// Skip NaN cells instead of propagating them
    pub ignore_nan: bool,
    /// Divide variances by `n - 1` instead of `n`
    pub bessel_correction: bool,
    /// Storage of matrices created by [`EvalMode::New`]
    pub storage: StorageType,
}

impl Default for CalcOptions {
    fn default() -> Self {
        Self {
            ignore_nan: false,
            bessel_correction: false,
            storage: StorageType::Dense,
        }
    }
}

impl CalcOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ignore_nan(mut self, ignore: bool) -> Self {
        self.ignore_nan = ignore;
        self
    }

    pub fn with_bessel_correction(mut self, bessel: bool) -> Self {
        self.bessel_correction = bessel;
        self
    }

    pub fn with_storage(mut self, storage: StorageType) -> Self {
        self.storage = storage;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = CalcOptions::default();
        assert!(!options.ignore_nan);
        assert!(!options.bessel_correction);
        assert_eq!(options.storage, StorageType::Dense);
        assert_eq!(EvalMode::default(), EvalMode::Link);
        assert_eq!(Dimension::default(), Dimension::All);
    }

    #[test]
    fn test_builder() {
        let options = CalcOptions::new()
            .with_ignore_nan(true)
            .with_bessel_correction(true)
            .with_storage(StorageType::Sparse);
        assert!(options.ignore_nan && options.bessel_correction);
        assert_eq!(options.storage, StorageType::Sparse);
        assert_eq!(Dimension::Column.to_string(), "COLUMN");
    }
}
