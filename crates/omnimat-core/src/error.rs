//! Unified error types for matrix storage and calculation
//!
//! Every failure raised by the core falls into one of five kinds:
//!
//! - **Out-of-bounds**: a coordinate access outside the declared size
//! - **Type validation**: a value that the target element type cannot represent
//! - **Capacity**: a sparse insert beyond a configured entry cap
//! - **Unsupported operation**: a dimension selector or strategy a node does not implement
//! - **Construction**: an invalid argument combination at factory or node build time
//!
//! Link sources add an I/O kind for failures of the underlying reader or
//! writer.
//!
//! None of them is retried or downgraded to a default value inside the core.
//!
//! # Examples
//!
//! ```
//! use omnimat_core::error::{MatrixError, ValidationError};
//! use omnimat_core::ValueType;
//!
//! let err: MatrixError = ValidationError::NonFinite {
//!     value: f64::NAN,
//!     target: ValueType::Int,
//! }
//! .into();
//! assert!(err.is_type_validation());
//! ```

use crate::coordinates::Coordinates;
use crate::types::ValueType;
use thiserror::Error;

/// Top-level error type for all matrix operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MatrixError {
    /// Coordinate access outside the declared size
    #[error("Index out of bounds: coordinates {coordinates} exceed size {size:?}")]
    OutOfBounds {
        coordinates: Coordinates,
        size: Vec<usize>,
    },

    /// Value not representable in the target element type
    #[error("Type validation error: {0}")]
    TypeValidation(#[from] ValidationError),

    /// Sparse insert beyond the configured entry cap
    #[error("Capacity exceeded: sparse matrix holds at most {max_entries} entries")]
    Capacity { max_entries: usize },

    /// Operation, selector or strategy not implemented by the receiver
    #[error("Unsupported operation {operation}: {reason}")]
    Unsupported { operation: String, reason: String },

    /// Invalid argument combination at build time
    #[error("Construction error: {0}")]
    Construction(#[from] ConstructionError),

    /// Failure reading or writing an external link source
    #[error("I/O error: {0}")]
    Io(String),
}

/// Errors raised when a value cannot be represented in a target type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("{target} cannot represent non-finite value {value}")]
    NonFinite { value: f64, target: ValueType },

    #[error("value {value} is outside the range of {target}")]
    OutOfRange { value: String, target: ValueType },

    #[error("cannot parse {text:?} as {target}")]
    Unparseable { text: String, target: ValueType },

    #[error("{code} is not a valid char code point")]
    InvalidChar { code: i64 },
}

/// Errors raised while building matrices or calculation nodes
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConstructionError {
    #[error("size mismatch: expected {expected:?}, got {got:?}")]
    SizeMismatch {
        expected: Vec<usize>,
        got: Vec<usize>,
    },

    #[error("{operation} requires a {expected}D matrix, got {got}D")]
    DimensionMismatch {
        operation: String,
        expected: usize,
        got: usize,
    },

    #[error("invalid argument: {reason}")]
    InvalidArgument { reason: String },

    #[error("matrix {node} would depend on itself")]
    Cycle { node: u64 },

    #[error("{operation} memoizes an aggregate and needs a repeatable source")]
    NonRepeatableSource { operation: String },
}

/// Result type alias for matrix operations
pub type MatrixResult<T> = Result<T, MatrixError>;

impl MatrixError {
    /// Create an out-of-bounds error
    pub fn out_of_bounds(coordinates: &Coordinates, size: &[usize]) -> Self {
        MatrixError::OutOfBounds {
            coordinates: coordinates.clone(),
            size: size.to_vec(),
        }
    }

    /// Create an unsupported-operation error
    pub fn unsupported(operation: impl Into<String>, reason: impl Into<String>) -> Self {
        MatrixError::Unsupported {
            operation: operation.into(),
            reason: reason.into(),
        }
    }

    /// Create an invalid-argument construction error
    pub fn invalid_argument(reason: impl Into<String>) -> Self {
        MatrixError::Construction(ConstructionError::InvalidArgument {
            reason: reason.into(),
        })
    }

    /// Create a size-mismatch construction error
    pub fn size_mismatch(expected: &[usize], got: &[usize]) -> Self {
        MatrixError::Construction(ConstructionError::SizeMismatch {
            expected: expected.to_vec(),
            got: got.to_vec(),
        })
    }

    pub fn is_out_of_bounds(&self) -> bool {
        matches!(self, MatrixError::OutOfBounds { .. })
    }

    pub fn is_type_validation(&self) -> bool {
        matches!(self, MatrixError::TypeValidation(_))
    }

    pub fn is_capacity(&self) -> bool {
        matches!(self, MatrixError::Capacity { .. })
    }

    pub fn is_unsupported(&self) -> bool {
        matches!(self, MatrixError::Unsupported { .. })
    }

    pub fn is_construction(&self) -> bool {
        matches!(self, MatrixError::Construction(_))
    }
}

impl From<std::io::Error> for MatrixError {
    fn from(err: std::io::Error) -> Self {
        MatrixError::Io(err.to_string())
    }
}
