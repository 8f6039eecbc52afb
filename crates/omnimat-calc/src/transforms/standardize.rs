//! Centering and standardization along a dimension.
//!
//! Both calculations compute a per-group center (mean) matrix, and
//! standardization also a scale (standard deviation) matrix, on the first
//! read. The matrices are memoised for every later read of the node and
//! dropped when a source reports a change.
//!
//! Standard deviations are population values unless
//! [`CalcOptions::bessel_correction`] is set. A group with zero scale keeps
//! its centered values unscaled.

use crate::dimension::DimensionGroups;
use crate::memo::Memo;
use crate::node::{expect_sources, Calculation};
use crate::options::{CalcOptions, Dimension};
use crate::stats::Moments;
use omnimat_core::{Coordinates, DenseMatrix, MatrixRef, MatrixResult, TypedAccess, Value, ValueType};

/// Memoised per-group statistics in aggregate shape.
#[derive(Debug)]
struct GroupMoments {
    groups: DimensionGroups,
    center: DenseMatrix<f64>,
    scale: DenseMatrix<f64>,
}

impl GroupMoments {
    fn compute(operation: &str, dimension: Dimension, options: &CalcOptions, source: &MatrixRef) -> MatrixResult<Self> {
        let groups = DimensionGroups::new(operation, dimension, source.size())?;
        let mut centers = Vec::with_capacity(groups.group_count());
        let mut scales = Vec::with_capacity(groups.group_count());
        for group in 0..groups.group_count() {
            let values = groups
                .members(group)
                .map(|c| source.get_as_double(&c))
                .collect::<MatrixResult<Vec<f64>>>()?;
            let moments = Moments::collect(values, options.ignore_nan);
            centers.push(moments.mean());
            scales.push(moments.std(options.bessel_correction));
        }
        // One cell per group, groups in column-major order of the aggregate shape.
        let size = groups.aggregate_size();
        let center = DenseMatrix::from_column_major(centers, &size)?;
        let scale = DenseMatrix::from_column_major(scales, &size)?;
        tracing::debug!(operation, %dimension, groups = groups.group_count(), "group moments computed");
        Ok(Self { groups, center, scale })
    }

    fn aggregate_coordinates(&self, coordinates: &Coordinates) -> Coordinates {
        let group = self.groups.group_of(coordinates);
        match self.groups.dimension() {
            Dimension::All => Coordinates::at(0, 0),
            Dimension::Row => Coordinates::at(group, 0),
            Dimension::Column => Coordinates::at(0, group),
        }
    }

    fn center_at(&self, coordinates: &Coordinates) -> MatrixResult<f64> {
        self.center.get(&self.aggregate_coordinates(coordinates))
    }

    fn scale_at(&self, coordinates: &Coordinates) -> MatrixResult<f64> {
        self.scale.get(&self.aggregate_coordinates(coordinates))
    }
}

fn validate(operation: &str, dimension: Dimension, sources: &[MatrixRef]) -> MatrixResult<Vec<usize>> {
    expect_sources(operation, sources, 1)?;
    DimensionGroups::new(operation, dimension, sources[0].size())?;
    Ok(sources[0].size().to_vec())
}

/// `x - mean(group of x)`.
#[derive(Debug)]
pub struct CenterCalculation {
    dimension: Dimension,
    options: CalcOptions,
    moments: Memo<GroupMoments>,
}

impl CenterCalculation {
    pub fn new(dimension: Dimension, options: CalcOptions) -> Self {
        Self {
            dimension,
            options,
            moments: Memo::new(),
        }
    }
}

impl Calculation for CenterCalculation {
    fn name(&self) -> &'static str {
        "center"
    }

    fn value_type(&self) -> ValueType {
        ValueType::Double
    }

    fn dimension(&self) -> Dimension {
        self.dimension
    }

    fn requires_repeatable_sources(&self) -> bool {
        true
    }

    fn output_size(&self, sources: &[MatrixRef]) -> MatrixResult<Vec<usize>> {
        validate(self.name(), self.dimension, sources)
    }

    fn get(&self, sources: &[MatrixRef], coordinates: &Coordinates) -> MatrixResult<Value> {
        let moments = self
            .moments
            .get_or_try_init(|| GroupMoments::compute(self.name(), self.dimension, &self.options, &sources[0]))?;
        let x = sources[0].get_as_double(coordinates)?;
        Ok(Value::Double(x - moments.center_at(coordinates)?))
    }

    fn invalidate(&self) {
        self.moments.clear();
    }
}

/// `(x - mean) / std` per group.
#[derive(Debug)]
pub struct StandardizeCalculation {
    dimension: Dimension,
    options: CalcOptions,
    moments: Memo<GroupMoments>,
}

impl StandardizeCalculation {
    pub fn new(dimension: Dimension, options: CalcOptions) -> Self {
        Self {
            dimension,
            options,
            moments: Memo::new(),
        }
    }
}

impl Calculation for StandardizeCalculation {
    fn name(&self) -> &'static str {
        "standardize"
    }

    fn value_type(&self) -> ValueType {
        ValueType::Double
    }

    fn dimension(&self) -> Dimension {
        self.dimension
    }

    fn requires_repeatable_sources(&self) -> bool {
        true
    }

    fn output_size(&self, sources: &[MatrixRef]) -> MatrixResult<Vec<usize>> {
        validate(self.name(), self.dimension, sources)
    }

    fn get(&self, sources: &[MatrixRef], coordinates: &Coordinates) -> MatrixResult<Value> {
        let moments = self
            .moments
            .get_or_try_init(|| GroupMoments::compute(self.name(), self.dimension, &self.options, &sources[0]))?;
        let centered = sources[0].get_as_double(coordinates)? - moments.center_at(coordinates)?;
        let scale = moments.scale_at(coordinates)?;
        if scale == 0.0 {
            Ok(Value::Double(centered))
        } else {
            Ok(Value::Double(centered / scale))
        }
    }

    fn invalidate(&self) {
        self.moments.clear();
    }
}
