//! Discretization strategies.
//!
//! [`DiscretizeCalculation`] dispatches on a [`DiscretizationMethod`]:
//!
//! - `Round` rounds each cell to the nearest integer (`LONG` cells)
//! - `FixedWidth { bins }` splits each group's finite `[min, max]` range
//!   into equal intervals and yields the bin index (`INT` cells); infinite
//!   cells fall into the first or last bin
//! - `EqualFrequency { bins }` puts roughly the same number of a group's
//!   cells in each bin (`INT` cells)
//! - `StringCategorical` numbers each group's distinct texts in sorted order
//!   (`INT` cells)
//! - `InformationGain` is not implemented and fails at construction
//!
//! The binning strategies memoise their per-group thresholds on first read.
//! NaN cells have no bin and fail the read with a type-validation error.

use crate::dimension::DimensionGroups;
use crate::memo::Memo;
use crate::node::{expect_sources, Calculation};
use crate::options::Dimension;
use omnimat_core::{Coordinates, MatrixError, MatrixRef, MatrixResult, Value, ValueType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiscretizationMethod {
    Round,
    FixedWidth { bins: usize },
    EqualFrequency { bins: usize },
    StringCategorical,
    /// Supervised binning; not available
    InformationGain,
}

/// Per-group lookup state of the binning strategies.
#[derive(Debug)]
enum Thresholds {
    /// `(min, max)` per group
    Ranges(Vec<(f64, f64)>),
    /// Sorted lower bin edges (excluding the first bin) per group
    Quantiles(Vec<Vec<f64>>),
    /// Sorted distinct texts per group
    Categories(Vec<Vec<String>>),
}

#[derive(Debug)]
pub struct DiscretizeCalculation {
    method: DiscretizationMethod,
    dimension: Dimension,
    thresholds: Memo<(DimensionGroups, Thresholds)>,
}

impl DiscretizeCalculation {
    /// # Errors
    ///
    /// `Unsupported` for `InformationGain`, invalid argument for zero bins.
    pub fn new(method: DiscretizationMethod, dimension: Dimension) -> MatrixResult<Self> {
        match method {
            DiscretizationMethod::InformationGain => {
                return Err(MatrixError::unsupported(
                    "discretize",
                    "information gain discretization is not implemented",
                ))
            }
            DiscretizationMethod::FixedWidth { bins: 0 } | DiscretizationMethod::EqualFrequency { bins: 0 } => {
                return Err(MatrixError::invalid_argument("discretization needs at least one bin"))
            }
            _ => {}
        }
        Ok(Self {
            method,
            dimension,
            thresholds: Memo::new(),
        })
    }

    pub fn method(&self) -> DiscretizationMethod {
        self.method
    }

    fn compute_thresholds(&self, source: &MatrixRef) -> MatrixResult<(DimensionGroups, Thresholds)> {
        let groups = DimensionGroups::new(self.name(), self.dimension, source.size())?;
        let thresholds = match self.method {
            DiscretizationMethod::FixedWidth { .. } => {
                let mut ranges = Vec::with_capacity(groups.group_count());
                for group in 0..groups.group_count() {
                    let (mut min, mut max) = (f64::INFINITY, f64::NEG_INFINITY);
                    for c in groups.members(group) {
                        let x = source.get_as_double(&c)?;
                        if x.is_finite() {
                            min = min.min(x);
                            max = max.max(x);
                        }
                    }
                    ranges.push((min, max));
                }
                Thresholds::Ranges(ranges)
            }
            DiscretizationMethod::EqualFrequency { bins } => {
                let mut edges = Vec::with_capacity(groups.group_count());
                for group in 0..groups.group_count() {
                    let mut values = Vec::new();
                    for c in groups.members(group) {
                        let x = source.get_as_double(&c)?;
                        if !x.is_nan() {
                            values.push(x);
                        }
                    }
                    values.sort_by(f64::total_cmp);
                    let n = values.len();
                    let group_edges = if n == 0 {
                        Vec::new()
                    } else {
                        (1..bins).map(|k| values[(k * n / bins).min(n - 1)]).collect()
                    };
                    edges.push(group_edges);
                }
                Thresholds::Quantiles(edges)
            }
            DiscretizationMethod::StringCategorical => {
                let mut categories = Vec::with_capacity(groups.group_count());
                for group in 0..groups.group_count() {
                    let mut texts = groups
                        .members(group)
                        .map(|c| source.get_as_string(&c))
                        .collect::<MatrixResult<Vec<String>>>()?;
                    texts.sort();
                    texts.dedup();
                    categories.push(texts);
                }
                Thresholds::Categories(categories)
            }
            DiscretizationMethod::Round | DiscretizationMethod::InformationGain => {
                return Err(MatrixError::unsupported(self.name(), "no thresholds for this method"))
            }
        };
        tracing::debug!(method = ?self.method, groups = groups.group_count(), "discretization thresholds computed");
        Ok((groups, thresholds))
    }
}

// Bin index as INT, rejecting NaN through the shared conversion.
fn bin_value(bin: f64) -> MatrixResult<Value> {
    Ok(Value::Int(Value::Double(bin).to_i32()?))
}

impl Calculation for DiscretizeCalculation {
    fn name(&self) -> &'static str {
        "discretize"
    }

    fn value_type(&self) -> ValueType {
        match self.method {
            DiscretizationMethod::Round => ValueType::Long,
            _ => ValueType::Int,
        }
    }

    fn dimension(&self) -> Dimension {
        self.dimension
    }

    fn requires_repeatable_sources(&self) -> bool {
        self.method != DiscretizationMethod::Round
    }

    fn output_size(&self, sources: &[MatrixRef]) -> MatrixResult<Vec<usize>> {
        expect_sources(self.name(), sources, 1)?;
        DimensionGroups::new(self.name(), self.dimension, sources[0].size())?;
        Ok(sources[0].size().to_vec())
    }

    fn get(&self, sources: &[MatrixRef], coordinates: &Coordinates) -> MatrixResult<Value> {
        let source = &sources[0];
        if self.method == DiscretizationMethod::Round {
            let x = source.get_as_double(coordinates)?;
            return Ok(Value::Long(Value::Double(x.round()).to_i64()?));
        }

        let memo = self.thresholds.get_or_try_init(|| self.compute_thresholds(source))?;
        let (groups, thresholds) = memo.as_ref();
        let group = groups.group_of(coordinates);
        match thresholds {
            Thresholds::Ranges(ranges) => {
                let bins = match self.method {
                    DiscretizationMethod::FixedWidth { bins } => bins,
                    _ => 1,
                };
                let x = source.get_as_double(coordinates)?;
                let (min, max) = ranges[group];
                let bin = if x.is_nan() {
                    f64::NAN
                } else if x.is_infinite() {
                    if x > 0.0 {
                        (bins - 1) as f64
                    } else {
                        0.0
                    }
                } else if max > min {
                    (((x - min) / (max - min)) * bins as f64).floor().clamp(0.0, (bins - 1) as f64)
                } else {
                    0.0
                };
                bin_value(bin)
            }
            Thresholds::Quantiles(edges) => {
                let x = source.get_as_double(coordinates)?;
                let bin = if x.is_nan() {
                    f64::NAN
                } else {
                    edges[group].iter().filter(|&&edge| x >= edge).count() as f64
                };
                bin_value(bin)
            }
            Thresholds::Categories(categories) => {
                let text = source.get_as_string(coordinates)?;
                let index = categories[group].binary_search(&text).map_err(|_| {
                    MatrixError::unsupported(self.name(), format!("category {:?} appeared after thresholds were computed", text))
                })?;
                Ok(Value::Int(index as i32))
            }
        }
    }

    fn invalidate(&self) {
        self.thresholds.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::CalculationNode;
    use omnimat_core::{DenseMatrix, Matrix};
    use std::sync::Arc;

    fn node(method: DiscretizationMethod, dimension: Dimension, source: MatrixRef) -> Arc<CalculationNode> {
        CalculationNode::new(DiscretizeCalculation::new(method, dimension).unwrap(), vec![source]).unwrap()
    }

    fn row(values: Vec<f64>) -> MatrixRef {
        let n = values.len();
        Arc::new(DenseMatrix::from_column_major(values, &[1, n]).unwrap())
    }

    fn bins(node: &dyn Matrix) -> Vec<i32> {
        (0..node.column_count())
            .map(|c| node.get_as_int(&Coordinates::at(0, c)).unwrap())
            .collect()
    }

    #[test]
    fn test_information_gain_is_unsupported() {
        let err = DiscretizeCalculation::new(DiscretizationMethod::InformationGain, Dimension::Column).unwrap_err();
        assert!(err.is_unsupported());
        assert!(DiscretizeCalculation::new(DiscretizationMethod::FixedWidth { bins: 0 }, Dimension::All)
            .unwrap_err()
            .is_construction());
    }

    #[test]
    fn test_round() {
        let n = node(DiscretizationMethod::Round, Dimension::All, row(vec![1.4, -2.6, 3.5]));
        assert_eq!(n.value_type(), ValueType::Long);
        assert_eq!(n.get_value(&Coordinates::at(0, 1)).unwrap(), Value::Long(-3));
        assert_eq!(n.get_as_long(&Coordinates::at(0, 2)).unwrap(), 4);
    }

    #[test]
    fn test_fixed_width() {
        let n = node(
            DiscretizationMethod::FixedWidth { bins: 4 },
            Dimension::All,
            row(vec![0.0, 2.4, 5.0, 7.6, 10.0]),
        );
        assert_eq!(bins(n.as_ref()), vec![0, 0, 2, 3, 3]);
    }

    #[test]
    fn test_equal_frequency() {
        let n = node(
            DiscretizationMethod::EqualFrequency { bins: 2 },
            Dimension::All,
            row(vec![5.0, 1.0, 100.0, 2.0]),
        );
        assert_eq!(bins(n.as_ref()), vec![1, 0, 1, 0]);
    }

    #[test]
    fn test_fixed_width_puts_infinities_in_edge_bins() {
        let n = node(
            DiscretizationMethod::FixedWidth { bins: 4 },
            Dimension::All,
            row(vec![f64::NEG_INFINITY, 0.0, 5.0, 10.0, f64::INFINITY]),
        );
        assert_eq!(bins(n.as_ref()), vec![0, 0, 2, 3, 3]);
    }

    #[test]
    fn test_nan_has_no_bin() {
        let n = node(
            DiscretizationMethod::FixedWidth { bins: 2 },
            Dimension::All,
            row(vec![0.0, f64::NAN, 1.0]),
        );
        assert!(n.get_value(&Coordinates::at(0, 1)).unwrap_err().is_type_validation());
        assert_eq!(n.get_as_int(&Coordinates::at(0, 2)).unwrap(), 1);
    }

    #[test]
    fn test_string_categorical_per_column() {
        let source: MatrixRef = Arc::new(
            DenseMatrix::from_column_major(
                vec!["red", "blue", "red", "x", "y", "x"]
                    .into_iter()
                    .map(String::from)
                    .collect(),
                &[3, 2],
            )
            .unwrap(),
        );
        let n = node(DiscretizationMethod::StringCategorical, Dimension::Column, source);
        assert_eq!(n.get_as_int(&Coordinates::at(0, 0)).unwrap(), 1);
        assert_eq!(n.get_as_int(&Coordinates::at(1, 0)).unwrap(), 0);
        assert_eq!(n.get_as_int(&Coordinates::at(1, 1)).unwrap(), 1);
    }

    #[test]
    fn test_thresholds_follow_source_changes() {
        let source = row(vec![0.0, 5.0, 10.0]);
        let n = node(DiscretizationMethod::FixedWidth { bins: 2 }, Dimension::All, source.clone());
        assert_eq!(bins(n.as_ref()), vec![0, 1, 1]);
        source.set_as_double(20.0, &Coordinates::at(0, 2)).unwrap();
        assert_eq!(bins(n.as_ref()), vec![0, 0, 1]);
    }
}
