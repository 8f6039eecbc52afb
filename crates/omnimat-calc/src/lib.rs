//! # omnimat-calc
//!
//! Lazy calculation graph over omnimat matrices.
//!
//! A calculation is a matrix whose cells are computed from other matrices.
//! This crate provides:
//!
//! - **Calculation nodes** ([`CalculationNode`]) wrapping a [`Calculation`]
//!   over shared source matrices, with cycle rejection and change forwarding
//! - **Evaluation modes** ([`EvalMode`]): keep the live node, materialise a
//!   snapshot, or write the result back into the first source
//! - **Dimension selectors** ([`Dimension`]) for per-row, per-column and
//!   whole-matrix statistics
//! - **Transforms** ([`transforms`]): elementwise math, arithmetic,
//!   aggregates, centering and standardization, discretization, random
//!   fills, pairwise column statistics, transpose and value-type conversion
//!
//! ## Link versus materialise
//!
//! ```
//! use omnimat_calc::{EvalMode, MatrixCalcExt};
//! use omnimat_core::{Coordinates, DenseMatrix, MatrixRef};
//! use std::sync::Arc;
//!
//! # fn main() -> anyhow::Result<()> {
//! let source: MatrixRef = Arc::new(DenseMatrix::from_column_major(vec![0.0, 0.5], &[2, 1])?);
//! let live = source.tan(EvalMode::Link)?;
//! let frozen = source.tan(EvalMode::New)?;
//!
//! source.set_as_double(1.0, &Coordinates::at(0, 0))?;
//! assert_eq!(live.get_as_double(&Coordinates::at(0, 0))?, 1.0f64.tan());
//! assert_eq!(frozen.get_as_double(&Coordinates::at(0, 0))?, 0.0);
//! # Ok(())
//! # }
//! ```
//!
//! ## Memoised aggregates
//!
//! Center, standardize and the binning discretizers compute their per-group
//! statistics on the first read and keep them until a source reports a
//! change. They refuse non-idempotent sources such as random fills;
//! materialise those first.
//!
//! ## Features
//!
//! - `serde`: Enable serialization/deserialization of [`EvalMode`], [`Dimension`]
//!   and [`CalcOptions`]

pub mod dimension;
pub mod ext;
pub mod memo;
pub mod node;
pub mod options;
pub mod stats;
pub mod transforms;

#[cfg(test)]
mod property_tests;

pub use dimension::DimensionGroups;
pub use ext::MatrixCalcExt;
pub use memo::Memo;
pub use node::{evaluate, expect_2d, expect_sources, materialize, materialize_as, Calculation, CalculationNode};
pub use options::{CalcOptions, Dimension, EvalMode};
pub use transforms::*;
