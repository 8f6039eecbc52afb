//! Built-in calculations.
//!
//! Each transform is a [`Calculation`](crate::Calculation) to be wrapped in a
//! [`CalculationNode`](crate::CalculationNode), usually through
//! [`MatrixCalcExt`](crate::MatrixCalcExt).

pub mod aggregate;
pub mod binary;
pub mod convert;
pub mod discretize;
pub mod pairwise;
pub mod random;
pub mod standardize;
pub mod transpose;
pub mod unary;

pub use aggregate::{AggregateCalculation, AggregateOp};
pub use binary::{BinaryCalculation, BinaryOp, Operand};
pub use convert::ConvertCalculation;
pub use discretize::{DiscretizationMethod, DiscretizeCalculation};
pub use pairwise::{PairwiseCalculation, PairwiseStatistic};
pub use random::{RandomCalculation, RandomFill};
pub use standardize::{CenterCalculation, StandardizeCalculation};
pub use transpose::TransposeCalculation;
pub use unary::{UnaryCalculation, UnaryOp};
