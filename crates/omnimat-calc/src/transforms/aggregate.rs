//! Aggregates over a dimension

use crate::dimension::DimensionGroups;
use crate::node::{expect_sources, Calculation};
use crate::options::{CalcOptions, Dimension};
use crate::stats::Moments;
use omnimat_core::{Coordinates, MatrixRef, MatrixResult, Value, ValueType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AggregateOp {
    Sum,
    Prod,
    Mean,
    Min,
    Max,
    /// Number of non-zero cells
    Count,
    Var,
    Std,
}

impl AggregateOp {
    pub fn name(self) -> &'static str {
        match self {
            AggregateOp::Sum => "sum",
            AggregateOp::Prod => "prod",
            AggregateOp::Mean => "mean",
            AggregateOp::Min => "min",
            AggregateOp::Max => "max",
            AggregateOp::Count => "count",
            AggregateOp::Var => "var",
            AggregateOp::Std => "std",
        }
    }

    fn finish(self, moments: &Moments, options: &CalcOptions) -> f64 {
        match self {
            AggregateOp::Sum => moments.sum,
            AggregateOp::Prod => moments.product,
            AggregateOp::Mean => moments.mean(),
            AggregateOp::Min => moments.minimum(),
            AggregateOp::Max => moments.maximum(),
            AggregateOp::Count => moments.non_zero as f64,
            AggregateOp::Var => moments.variance(options.bessel_correction),
            AggregateOp::Std => moments.std(options.bessel_correction),
        }
    }
}

/// One `DOUBLE` cell per group: `[1, 1]` for `All`, `[rows, 1]` for `Row`,
/// `[1, columns]` for `Column`. Recomputed on every read.
#[derive(Debug, Clone)]
pub struct AggregateCalculation {
    op: AggregateOp,
    dimension: Dimension,
    options: CalcOptions,
}

impl AggregateCalculation {
    pub fn new(op: AggregateOp, dimension: Dimension, options: CalcOptions) -> Self {
        Self {
            op,
            dimension,
            options,
        }
    }
}

impl Calculation for AggregateCalculation {
    fn name(&self) -> &'static str {
        self.op.name()
    }

    fn value_type(&self) -> ValueType {
        ValueType::Double
    }

    fn dimension(&self) -> Dimension {
        self.dimension
    }

    fn output_size(&self, sources: &[MatrixRef]) -> MatrixResult<Vec<usize>> {
        expect_sources(self.name(), sources, 1)?;
        Ok(DimensionGroups::new(self.name(), self.dimension, sources[0].size())?.aggregate_size())
    }

    fn get(&self, sources: &[MatrixRef], coordinates: &Coordinates) -> MatrixResult<Value> {
        let source = &sources[0];
        let groups = DimensionGroups::new(self.name(), self.dimension, source.size())?;
        let values = groups
            .members(groups.group_of(coordinates))
            .map(|c| source.get_as_double(&c))
            .collect::<MatrixResult<Vec<f64>>>()?;
        let moments = Moments::collect(values, self.options.ignore_nan);
        Ok(Value::Double(self.op.finish(&moments, &self.options)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::CalculationNode;
    use omnimat_core::{DenseMatrix, Matrix};
    use std::sync::Arc;

    // 2x3, columns [1, 4], [2, 5], [3, 6]
    fn grid() -> MatrixRef {
        Arc::new(DenseMatrix::from_column_major(vec![1.0, 4.0, 2.0, 5.0, 3.0, 6.0], &[2, 3]).unwrap())
    }

    fn aggregate(op: AggregateOp, dimension: Dimension, options: CalcOptions, source: MatrixRef) -> Arc<CalculationNode> {
        CalculationNode::new(AggregateCalculation::new(op, dimension, options), vec![source]).unwrap()
    }

    #[test]
    fn test_output_sizes() {
        let all = aggregate(AggregateOp::Sum, Dimension::All, CalcOptions::default(), grid());
        assert_eq!(all.size(), &[1, 1]);
        assert_eq!(all.get_as_double(&Coordinates::at(0, 0)).unwrap(), 21.0);

        let rows = aggregate(AggregateOp::Sum, Dimension::Row, CalcOptions::default(), grid());
        assert_eq!(rows.size(), &[2, 1]);
        assert_eq!(rows.get_as_double(&Coordinates::at(1, 0)).unwrap(), 15.0);

        let columns = aggregate(AggregateOp::Mean, Dimension::Column, CalcOptions::default(), grid());
        assert_eq!(columns.size(), &[1, 3]);
        assert_eq!(columns.get_as_double(&Coordinates::at(0, 2)).unwrap(), 4.5);
    }

    #[test]
    fn test_variance_and_bessel() {
        let population = aggregate(AggregateOp::Var, Dimension::Row, CalcOptions::default(), grid());
        assert!((population.get_as_double(&Coordinates::at(0, 0)).unwrap() - 2.0 / 3.0).abs() < 1e-12);
        let sample = aggregate(
            AggregateOp::Var,
            Dimension::Row,
            CalcOptions::new().with_bessel_correction(true),
            grid(),
        );
        assert!((sample.get_as_double(&Coordinates::at(0, 0)).unwrap() - 1.0).abs() < 1e-12);
        let std = aggregate(
            AggregateOp::Std,
            Dimension::All,
            CalcOptions::new().with_bessel_correction(true),
            grid(),
        );
        assert!((std.get_as_double(&Coordinates::at(0, 0)).unwrap() - 3.5f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_ignore_nan() {
        let source = grid();
        source.set_as_double(f64::NAN, &Coordinates::at(0, 0)).unwrap();
        let strict = aggregate(AggregateOp::Max, Dimension::Column, CalcOptions::default(), source.clone());
        assert!(strict.get_as_double(&Coordinates::at(0, 0)).unwrap().is_nan());
        let lenient = aggregate(
            AggregateOp::Max,
            Dimension::Column,
            CalcOptions::new().with_ignore_nan(true),
            source,
        );
        assert_eq!(lenient.get_as_double(&Coordinates::at(0, 0)).unwrap(), 4.0);
    }

    #[test]
    fn test_count_and_prod() {
        let source = grid();
        source.set_as_double(0.0, &Coordinates::at(1, 2)).unwrap();
        let count = aggregate(AggregateOp::Count, Dimension::All, CalcOptions::default(), source.clone());
        assert_eq!(count.get_as_double(&Coordinates::at(0, 0)).unwrap(), 5.0);
        let prod = aggregate(AggregateOp::Prod, Dimension::Row, CalcOptions::default(), source);
        assert_eq!(prod.get_as_double(&Coordinates::at(0, 0)).unwrap(), 6.0);
    }

    #[test]
    fn test_row_on_3d_is_unsupported() {
        let cube: MatrixRef = Arc::new(DenseMatrix::<f64>::zeros(&[2, 2, 2]));
        let err = CalculationNode::new(
            AggregateCalculation::new(AggregateOp::Sum, Dimension::Row, CalcOptions::default()),
            vec![cube.clone()],
        )
        .unwrap_err();
        assert!(err.is_unsupported());
        let all = aggregate(AggregateOp::Sum, Dimension::All, CalcOptions::default(), cube);
        assert_eq!(all.get_as_double(&Coordinates::at(0, 0)).unwrap(), 0.0);
    }
}
