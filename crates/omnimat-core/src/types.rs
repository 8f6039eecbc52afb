//! Core type definitions shared by every matrix.
//!
//! - [`ValueType`]: the closed set of element kinds a matrix can store
//! - [`StorageType`]: dense (full allocation) or sparse (entry-map allocation)
//! - [`Annotation`]: optional label metadata, not part of numeric identity
//! - [`MatrixId`]: process-unique identity used for dependency tracking
//!
//! # Examples
//!
//! ```
//! use omnimat_core::{StorageType, ValueType};
//!
//! assert!(ValueType::Int.is_integral());
//! assert!(!ValueType::Double.is_integral());
//! assert_eq!(StorageType::Sparse.to_string(), "SPARSE");
//! ```

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Element kind a matrix stores.
///
/// Drives which typed accessor family is authoritative for a matrix: the
/// `get`/`set` pair matching the value type stores values exactly, every
/// other accessor converts through [`Value`](crate::Value).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ValueType {
    Boolean,
    Byte,
    Short,
    Char,
    Int,
    Long,
    Float,
    Double,
    BigInteger,
    Object,
    String,
}

impl ValueType {
    /// Every value type, in declaration order.
    pub const ALL: [ValueType; 11] = [
        ValueType::Boolean,
        ValueType::Byte,
        ValueType::Short,
        ValueType::Char,
        ValueType::Int,
        ValueType::Long,
        ValueType::Float,
        ValueType::Double,
        ValueType::BigInteger,
        ValueType::Object,
        ValueType::String,
    ];

    /// Whether the type has no representation for NaN or infinities.
    pub fn is_integral(self) -> bool {
        matches!(
            self,
            ValueType::Boolean
                | ValueType::Byte
                | ValueType::Short
                | ValueType::Char
                | ValueType::Int
                | ValueType::Long
                | ValueType::BigInteger
        )
    }

    /// Whether the type stores IEEE-754 values.
    pub fn is_floating(self) -> bool {
        matches!(self, ValueType::Float | ValueType::Double)
    }

    /// Upper-case name, as used in error messages.
    pub fn name(self) -> &'static str {
        match self {
            ValueType::Boolean => "BOOLEAN",
            ValueType::Byte => "BYTE",
            ValueType::Short => "SHORT",
            ValueType::Char => "CHAR",
            ValueType::Int => "INT",
            ValueType::Long => "LONG",
            ValueType::Float => "FLOAT",
            ValueType::Double => "DOUBLE",
            ValueType::BigInteger => "BIGINTEGER",
            ValueType::Object => "OBJECT",
            ValueType::String => "STRING",
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Physical storage strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StorageType {
    /// Fully allocated; every in-bounds cell exists
    #[default]
    Dense,
    /// Entry map; only explicitly set non-default cells exist
    Sparse,
}

impl StorageType {
    /// Parse from a case-insensitive name.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dense" => Some(StorageType::Dense),
            "sparse" => Some(StorageType::Sparse),
            _ => None,
        }
    }
}

impl fmt::Display for StorageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageType::Dense => f.write_str("DENSE"),
            StorageType::Sparse => f.write_str("SPARSE"),
        }
    }
}

/// Optional label metadata attached to a matrix.
///
/// Mutable for the life of the matrix and never part of its numeric identity.
///
/// # Examples
///
/// ```
/// use omnimat_core::Annotation;
///
/// let annotation = Annotation::new("temperatures")
///     .with_dimension_labels(vec!["station".into(), "day".into()]);
/// assert_eq!(annotation.label, "temperatures");
/// assert_eq!(annotation.dimension_label(1), Some("day"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Annotation {
    /// Label of the whole matrix
    pub label: String,
    /// Optional label per dimension
    pub dimension_labels: Vec<String>,
}

impl Annotation {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            dimension_labels: Vec::new(),
        }
    }

    pub fn with_dimension_labels(mut self, labels: Vec<String>) -> Self {
        self.dimension_labels = labels;
        self
    }

    pub fn dimension_label(&self, dimension: usize) -> Option<&str> {
        self.dimension_labels.get(dimension).map(String::as_str)
    }
}

/// Process-unique identity of a matrix instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MatrixId(pub u64);

static NEXT_MATRIX_ID: AtomicU64 = AtomicU64::new(1);

impl MatrixId {
    /// Allocate a fresh identity.
    pub fn next() -> Self {
        MatrixId(NEXT_MATRIX_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for MatrixId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Matrix({})", self.0)
    }
}
