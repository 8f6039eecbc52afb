//! Fluent construction of calculation nodes.
//!
//! ```
//! use omnimat_calc::{Dimension, EvalMode, MatrixCalcExt};
//! use omnimat_core::{Coordinates, DenseMatrix, MatrixRef};
//! use std::sync::Arc;
//!
//! # fn main() -> anyhow::Result<()> {
//! let m: MatrixRef = Arc::new(DenseMatrix::from_column_major(vec![1.0, 2.0, 3.0, 4.0], &[2, 2])?);
//! let sums = m.times(2.0, EvalMode::Link)?.sum(Dimension::Column, EvalMode::New)?;
//! assert_eq!(sums.get_as_double(&Coordinates::at(0, 1))?, 14.0);
//! # Ok(())
//! # }
//! ```

use crate::node::{evaluate, Calculation, CalculationNode};
use crate::options::{CalcOptions, Dimension, EvalMode};
use crate::transforms::{
    AggregateCalculation, AggregateOp, BinaryCalculation, BinaryOp, CenterCalculation, ConvertCalculation,
    DiscretizationMethod, DiscretizeCalculation, Operand, PairwiseCalculation, PairwiseStatistic, RandomCalculation,
    RandomFill, StandardizeCalculation, TransposeCalculation, UnaryCalculation, UnaryOp,
};
use omnimat_core::{MatrixRef, MatrixResult, ValueType};

/// Transforms of a shared matrix, each delivered according to an
/// [`EvalMode`].
///
/// The receiver is always the first source of the new node, so
/// [`EvalMode::Orig`] writes back into it.
pub trait MatrixCalcExt {
    /// Wrap `calculation` over this matrix followed by `others`.
    fn calculate_with<C>(
        &self,
        calculation: C,
        others: &[MatrixRef],
        mode: EvalMode,
        options: &CalcOptions,
    ) -> MatrixResult<MatrixRef>
    where
        C: Calculation + 'static;

    fn calculate<C>(&self, calculation: C, mode: EvalMode, options: &CalcOptions) -> MatrixResult<MatrixRef>
    where
        C: Calculation + 'static,
    {
        self.calculate_with(calculation, &[], mode, options)
    }

    fn unary(&self, op: UnaryOp, mode: EvalMode) -> MatrixResult<MatrixRef> {
        self.calculate(UnaryCalculation::new(op), mode, &CalcOptions::default())
    }

    fn abs(&self, mode: EvalMode) -> MatrixResult<MatrixRef> {
        self.unary(UnaryOp::Abs, mode)
    }

    fn negate(&self, mode: EvalMode) -> MatrixResult<MatrixRef> {
        self.unary(UnaryOp::Negate, mode)
    }

    fn sqrt(&self, mode: EvalMode) -> MatrixResult<MatrixRef> {
        self.unary(UnaryOp::Sqrt, mode)
    }

    fn exp(&self, mode: EvalMode) -> MatrixResult<MatrixRef> {
        self.unary(UnaryOp::Exp, mode)
    }

    /// Natural logarithm
    fn log(&self, mode: EvalMode) -> MatrixResult<MatrixRef> {
        self.unary(UnaryOp::Log, mode)
    }

    fn sin(&self, mode: EvalMode) -> MatrixResult<MatrixRef> {
        self.unary(UnaryOp::Sin, mode)
    }

    fn cos(&self, mode: EvalMode) -> MatrixResult<MatrixRef> {
        self.unary(UnaryOp::Cos, mode)
    }

    fn tan(&self, mode: EvalMode) -> MatrixResult<MatrixRef> {
        self.unary(UnaryOp::Tan, mode)
    }

    fn power(&self, exponent: f64, mode: EvalMode) -> MatrixResult<MatrixRef> {
        self.unary(UnaryOp::Power(exponent), mode)
    }

    /// `op(self, operand)` cell by cell.
    ///
    /// # Errors
    ///
    /// `SizeMismatch` when a matrix operand differs in size.
    fn binary(&self, op: BinaryOp, operand: Operand, mode: EvalMode) -> MatrixResult<MatrixRef> {
        let options = CalcOptions::default();
        match operand {
            Operand::Matrix(right) => self.calculate_with(BinaryCalculation::matrices(op), &[right], mode, &options),
            Operand::Scalar(value) => self.calculate(BinaryCalculation::scalar(op, value), mode, &options),
        }
    }

    fn plus(&self, operand: impl Into<Operand>, mode: EvalMode) -> MatrixResult<MatrixRef> {
        self.binary(BinaryOp::Plus, operand.into(), mode)
    }

    fn minus(&self, operand: impl Into<Operand>, mode: EvalMode) -> MatrixResult<MatrixRef> {
        self.binary(BinaryOp::Minus, operand.into(), mode)
    }

    fn times(&self, operand: impl Into<Operand>, mode: EvalMode) -> MatrixResult<MatrixRef> {
        self.binary(BinaryOp::Times, operand.into(), mode)
    }

    fn divide(&self, operand: impl Into<Operand>, mode: EvalMode) -> MatrixResult<MatrixRef> {
        self.binary(BinaryOp::Divide, operand.into(), mode)
    }

    fn aggregate(
        &self,
        op: AggregateOp,
        dimension: Dimension,
        options: &CalcOptions,
        mode: EvalMode,
    ) -> MatrixResult<MatrixRef> {
        self.calculate(AggregateCalculation::new(op, dimension, options.clone()), mode, options)
    }

    fn sum(&self, dimension: Dimension, mode: EvalMode) -> MatrixResult<MatrixRef> {
        self.aggregate(AggregateOp::Sum, dimension, &CalcOptions::default(), mode)
    }

    fn mean(&self, dimension: Dimension, mode: EvalMode) -> MatrixResult<MatrixRef> {
        self.aggregate(AggregateOp::Mean, dimension, &CalcOptions::default(), mode)
    }

    fn std(&self, dimension: Dimension, options: &CalcOptions, mode: EvalMode) -> MatrixResult<MatrixRef> {
        self.aggregate(AggregateOp::Std, dimension, options, mode)
    }

    fn center(&self, dimension: Dimension, mode: EvalMode) -> MatrixResult<MatrixRef> {
        let options = CalcOptions::default();
        self.calculate(CenterCalculation::new(dimension, options.clone()), mode, &options)
    }

    fn standardize(&self, dimension: Dimension, mode: EvalMode) -> MatrixResult<MatrixRef> {
        self.standardize_with(dimension, &CalcOptions::default(), mode)
    }

    fn standardize_with(&self, dimension: Dimension, options: &CalcOptions, mode: EvalMode) -> MatrixResult<MatrixRef> {
        self.calculate(StandardizeCalculation::new(dimension, options.clone()), mode, options)
    }

    /// # Errors
    ///
    /// `Unsupported` for [`DiscretizationMethod::InformationGain`].
    fn discretize(
        &self,
        method: DiscretizationMethod,
        dimension: Dimension,
        mode: EvalMode,
    ) -> MatrixResult<MatrixRef> {
        self.calculate(DiscretizeCalculation::new(method, dimension)?, mode, &CalcOptions::default())
    }

    /// Random values of this matrix's size.
    fn random_fill(&self, fill: RandomFill, mode: EvalMode) -> MatrixResult<MatrixRef> {
        self.calculate(RandomCalculation::new(fill)?, mode, &CalcOptions::default())
    }

    fn pairwise(&self, statistic: PairwiseStatistic, options: &CalcOptions, mode: EvalMode) -> MatrixResult<MatrixRef> {
        self.calculate(PairwiseCalculation::new(statistic, options.clone()), mode, options)
    }

    fn transpose(&self, mode: EvalMode) -> MatrixResult<MatrixRef>;

    fn convert(&self, target: ValueType, mode: EvalMode) -> MatrixResult<MatrixRef> {
        self.calculate(ConvertCalculation::new(target), mode, &CalcOptions::default())
    }
}

impl MatrixCalcExt for MatrixRef {
    fn calculate_with<C>(
        &self,
        calculation: C,
        others: &[MatrixRef],
        mode: EvalMode,
        options: &CalcOptions,
    ) -> MatrixResult<MatrixRef>
    where
        C: Calculation + 'static,
    {
        let mut sources = Vec::with_capacity(others.len() + 1);
        sources.push(self.clone());
        sources.extend(others.iter().cloned());
        let node = CalculationNode::new(calculation, sources)?;
        evaluate(node, mode, options)
    }

    fn transpose(&self, mode: EvalMode) -> MatrixResult<MatrixRef> {
        self.calculate(TransposeCalculation::of(self), mode, &CalcOptions::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use omnimat_core::{Coordinates, DenseMatrix, Matrix, SparseMatrix, StorageType};
    use std::sync::Arc;

    fn grid() -> MatrixRef {
        Arc::new(DenseMatrix::from_column_major(vec![1.0, 2.0, 3.0, 4.0], &[2, 2]).unwrap())
    }

    #[test]
    fn test_chain_in_link_mode() {
        let m = grid();
        let chained = m.negate(EvalMode::Link).unwrap().plus(10.0, EvalMode::Link).unwrap();
        assert_eq!(chained.get_as_double(&Coordinates::at(1, 1)).unwrap(), 6.0);
        m.set_as_double(0.0, &Coordinates::at(1, 1)).unwrap();
        assert_eq!(chained.get_as_double(&Coordinates::at(1, 1)).unwrap(), 10.0);
    }

    #[test]
    fn test_matrix_operand() {
        let m = grid();
        let product = m.times(&m, EvalMode::New).unwrap();
        assert_eq!(product.get_as_double(&Coordinates::at(0, 1)).unwrap(), 9.0);
        let wide: MatrixRef = Arc::new(DenseMatrix::<f64>::zeros(&[2, 3]));
        assert!(m.plus(wide, EvalMode::Link).unwrap_err().is_construction());
    }

    #[test]
    fn test_new_mode_honours_storage() {
        let options = CalcOptions::new().with_storage(StorageType::Sparse);
        let sums = grid()
            .aggregate(AggregateOp::Sum, Dimension::Row, &options, EvalMode::New)
            .unwrap();
        assert_eq!(sums.storage_type(), StorageType::Sparse);
        assert_eq!(sums.get_as_double(&Coordinates::at(1, 0)).unwrap(), 6.0);
    }

    #[test]
    fn test_orig_mode_writes_back() {
        let m = grid();
        let result = m.power(2.0, EvalMode::Orig).unwrap();
        assert_eq!(result.id(), m.id());
        assert_eq!(m.get_as_double(&Coordinates::at(1, 1)).unwrap(), 16.0);
        assert!(m.sum(Dimension::All, EvalMode::Orig).unwrap_err().is_construction());
    }

    #[test]
    fn test_transpose_and_convert() {
        let sparse: MatrixRef = Arc::new(SparseMatrix::<i16>::zeros(&[2, 5]));
        let t = sparse.transpose(EvalMode::Link).unwrap();
        assert_eq!(t.size(), &[5, 2]);
        assert_eq!(t.value_type(), ValueType::Short);
        let text = grid().convert(ValueType::Int, EvalMode::New).unwrap();
        assert_eq!(text.value_type(), ValueType::Int);
        assert_eq!(text.get_as_int(&Coordinates::at(1, 0)).unwrap(), 2);
    }

    #[test]
    fn test_random_and_discretize() {
        let noise = grid().random_fill(RandomFill::uniform(0.0, 1.0), EvalMode::Link).unwrap();
        assert!(!noise.is_idempotent());
        assert!(noise
            .discretize(DiscretizationMethod::FixedWidth { bins: 2 }, Dimension::All, EvalMode::Link)
            .unwrap_err()
            .is_construction());
        let frozen = grid().random_fill(RandomFill::uniform(0.0, 1.0), EvalMode::New).unwrap();
        let bins = frozen
            .discretize(DiscretizationMethod::FixedWidth { bins: 2 }, Dimension::All, EvalMode::Link)
            .unwrap();
        assert!(bins.get_as_int(&Coordinates::at(0, 0)).unwrap() <= 1);
    }
}
