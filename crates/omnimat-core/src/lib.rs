//! # omnimat-core
//!
//! Typed N-dimensional matrix contract and storage engines for omnimat.
//!
//! This crate provides the foundation every other omnimat crate builds on:
//!
//! - **Coordinates** ([`Coordinates`]) and column-major flattening helpers
//! - **Value types** ([`ValueType`]) with a single shared conversion routine ([`Value`])
//! - **The matrix contract** ([`Matrix`]) with typed accessors for all eleven kinds
//! - **Storage engines**: [`DenseMatrix`] (full allocation) and [`SparseMatrix`] (entry map)
//! - **Factories** ([`FactoryRegistry`]) producing any value type × storage combination
//! - **Observers** ([`Observers`]) signalling "state may have changed"
//!
//! ## Core Principles
//!
//! ### One conversion routine
//!
//! Each matrix has one authoritative accessor pair, the one matching its
//! value type. Every other accessor goes through [`Value`]; integral targets
//! reject NaN and infinities, truncate toward zero and refuse out-of-range
//! values instead of wrapping. A failed conversion never changes the cell.
//!
//! ### Memory Layout
//!
//! Dense matrices are column-major: the first coordinate varies fastest, so
//! in 2D the linear index of `(row, column)` is `column * rows + row`.
//!
//! ### Sharing
//!
//! Matrices are shared as [`MatrixRef`] (`Arc<dyn Matrix>`). Engines use
//! interior mutability behind `parking_lot` locks, so concurrent readers are
//! safe and every method takes `&self`.
//!
//! ## Quick Start
//!
//! ```
//! use omnimat_core::{Coordinates, FactoryRegistry, Matrix, StorageType, ValueType};
//!
//! let registry = FactoryRegistry::with_defaults();
//! let m = registry.zeros(ValueType::Double, &[3, 4]).unwrap();
//! assert_eq!(m.size(), &[3, 4]);
//! assert_eq!(m.storage_type(), StorageType::Dense);
//!
//! m.set_as_double(1.5, &Coordinates::at(2, 3)).unwrap();
//! assert_eq!(m.get_as_string(&Coordinates::at(2, 3)).unwrap(), "1.5");
//! ```
//!
//! ## Sparse Storage
//!
//! ```
//! use omnimat_core::{Coordinates, Matrix, SparseEnumerable, SparseMatrix};
//!
//! let m = SparseMatrix::<i64>::with_max_entries(&[1_000_000, 1_000_000], 2);
//! m.set_as_long(7, &Coordinates::at(12, 99)).unwrap();
//! m.set_as_long(8, &Coordinates::at(500, 1)).unwrap();
//! assert!(m.set_as_long(9, &Coordinates::at(0, 0)).unwrap_err().is_capacity());
//! assert_eq!(m.available_coordinates().count(), 2);
//! ```
//!
//! ## Error Handling
//!
//! Operations return [`MatrixResult`]; see [`error`] for the five kinds.
//!
//! ```
//! use omnimat_core::{Coordinates, DenseMatrix, Matrix};
//!
//! let m = DenseMatrix::<i32>::zeros(&[2, 2]);
//! assert!(m.get_value(&Coordinates::at(2, 0)).unwrap_err().is_out_of_bounds());
//! assert!(m.set_as_double(f64::NAN, &Coordinates::at(0, 0)).unwrap_err().is_type_validation());
//! ```
//!
//! ## Features
//!
//! - `serde`: Enable serialization/deserialization of the plain data types

pub mod capabilities;
pub mod config;
pub mod coordinates;
pub mod dense;
pub mod element;
pub mod error;
pub mod factory;
pub mod link;
pub mod matrix;
pub mod observer;
pub mod sparse;
pub mod types;
pub mod value;


pub use capabilities::{CapabilityRegistry, Feature};
pub use config::MatrixConfig;
pub use coordinates::{element_count, from_linear_index, linear_index, AllCoordinates, Coordinates};
pub use dense::*;
pub use element::Element;
pub use error::{ConstructionError, MatrixError, MatrixResult, ValidationError};
pub use factory::{create_matrix, DenseFactory, FactoryRegistry, MatrixFactory, SparseFactory};
pub use link::{DelimitedTextSource, LinkOptions, StringTableReader};
pub use matrix::{
    matrices_equal, CoordinateIter, DenseAddressable, Matrix, MatrixHeader, MatrixRef, SparseEnumerable,
    TypedAccess,
};
pub use observer::{Observers, SubscriptionId};
pub use sparse::*;
pub use types::{Annotation, MatrixId, StorageType, ValueType};
pub use value::Value;
