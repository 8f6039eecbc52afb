//! # omnimat - Typed Matrices with Lazy Calculations
//!
//! N-dimensional matrices of eleven value types, dense or sparse storage,
//! and a graph of lazy calculations on top.
//!
//! This is the **meta crate** that re-exports all omnimat components for convenient access.
//!
//! ## Quick Start
//!
//! ```
//! use omnimat::prelude::*;
//!
//! let m = create_matrix(ValueType::Double, StorageType::Sparse, &[1000, 1000]);
//! m.set_as_double(2.0, &Coordinates::at(3, 4))?;
//! let total = m.sum(Dimension::All, EvalMode::New)?;
//! assert_eq!(total.get_as_double(&Coordinates::at(0, 0))?, 2.0);
//! # Ok::<(), anyhow::Error>(())
//! ```
//!
//! ## Components
//!
//! ### Matrices ([`core`])
//!
//! Coordinates, value types and the shared conversion routine, the matrix
//! contract, dense and sparse engines, factories, observers and the
//! delimited-text link contract.
//!
//! ```
//! use omnimat::core::{Coordinates, DenseMatrix, Matrix};
//!
//! let m = DenseMatrix::<i16>::zeros(&[2, 3]);
//! m.set_as_double(7.9, &Coordinates::at(1, 2)).unwrap();
//! assert_eq!(m.get_as_int(&Coordinates::at(1, 2)).unwrap(), 7);
//! ```
//!
//! ### Calculations ([`calc`])
//!
//! Calculation nodes, evaluation modes and the built-in transforms.
//!
//! ```
//! use omnimat::calc::{Dimension, EvalMode, MatrixCalcExt};
//! use omnimat::core::{Coordinates, DenseMatrix, MatrixRef};
//! use std::sync::Arc;
//!
//! let m: MatrixRef = Arc::new(DenseMatrix::from_column_major(vec![1.0, 2.0, 3.0, 4.0], &[2, 2]).unwrap());
//! let centered = m.center(Dimension::Column, EvalMode::Link).unwrap();
//! assert_eq!(centered.get_as_double(&Coordinates::at(0, 1)).unwrap(), -0.5);
//! ```
//!
//! ### Logging ([`logging`])
//!
//! `tracing` subscriber setup for applications embedding omnimat.
//!
//! ## Features
//!
//! - `logging` (default): Enable [`logging::init_tracing`] through `tracing-subscriber`
//! - `serde`: Enable serialization of the plain data types

pub mod logging;

// Re-export all components
pub use omnimat_calc as calc;
pub use omnimat_core as core;

pub mod prelude {
    //! Prelude module for convenient imports
    //!
    //! # Example
    //!
    //! ```
    //! use omnimat::prelude::*;
    //!
    //! let m = DenseMatrix::<f64>::zeros(&[10, 20, 30]);
    //! assert_eq!(m.size(), &[10, 20, 30]);
    //! ```

    // Matrices
    pub use crate::core::{
        create_matrix, Coordinates, DenseMatrix, FactoryRegistry, Matrix, MatrixConfig, MatrixError, MatrixRef,
        MatrixResult, SparseMatrix, StorageType, TypedAccess, Value, ValueType,
    };

    // Calculations
    pub use crate::calc::{
        evaluate, AggregateOp, BinaryOp, CalcOptions, CalculationNode, Dimension, DiscretizationMethod, EvalMode,
        MatrixCalcExt, PairwiseStatistic, RandomFill, UnaryOp,
    };
}
