//! Statistics between pairs of columns.
//!
//! For a `rows × columns` source the output is `columns × columns`; cell
//! `(i, j)` compares column `i` with column `j` and reads both columns in
//! full. With `ignore_nan`, rows where either column is NaN are skipped.

use crate::node::{expect_2d, expect_sources, Calculation};
use crate::options::CalcOptions;
use crate::stats::{student_t_two_sided, Moments};
use omnimat_core::{Coordinates, MatrixRef, MatrixResult, Value, ValueType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PairwiseStatistic {
    /// Sample covariance with `bessel_correction`, population otherwise
    Covariance,
    /// Pearson correlation
    Correlation,
    /// Two-sided p-value of the paired t-test
    TTestPValue,
    /// t statistic of the paired t-test
    TTestStatistic,
}

impl PairwiseStatistic {
    pub fn name(self) -> &'static str {
        match self {
            PairwiseStatistic::Covariance => "covariance",
            PairwiseStatistic::Correlation => "correlation",
            PairwiseStatistic::TTestPValue => "ttest_p_value",
            PairwiseStatistic::TTestStatistic => "ttest_statistic",
        }
    }
}

#[derive(Debug, Clone)]
pub struct PairwiseCalculation {
    statistic: PairwiseStatistic,
    options: CalcOptions,
}

impl PairwiseCalculation {
    pub fn new(statistic: PairwiseStatistic, options: CalcOptions) -> Self {
        Self { statistic, options }
    }

    fn paired_columns(&self, source: &MatrixRef, i: usize, j: usize) -> MatrixResult<(Vec<f64>, Vec<f64>)> {
        let mut xs = Vec::with_capacity(source.row_count());
        let mut ys = Vec::with_capacity(source.row_count());
        for row in 0..source.row_count() {
            let x = source.get_as_double(&Coordinates::at(row, i))?;
            let y = source.get_as_double(&Coordinates::at(row, j))?;
            if self.options.ignore_nan && (x.is_nan() || y.is_nan()) {
                continue;
            }
            xs.push(x);
            ys.push(y);
        }
        Ok((xs, ys))
    }

    fn covariance(&self, xs: &[f64], ys: &[f64]) -> f64 {
        let n = xs.len();
        let denominator = if self.options.bessel_correction { n.saturating_sub(1) } else { n };
        if denominator == 0 {
            return f64::NAN;
        }
        let mx = xs.iter().sum::<f64>() / n as f64;
        let my = ys.iter().sum::<f64>() / n as f64;
        let sum: f64 = xs.iter().zip(ys).map(|(x, y)| (x - mx) * (y - my)).sum();
        sum / denominator as f64
    }

    fn correlation(xs: &[f64], ys: &[f64]) -> f64 {
        let n = xs.len();
        if n == 0 {
            return f64::NAN;
        }
        let mx = xs.iter().sum::<f64>() / n as f64;
        let my = ys.iter().sum::<f64>() / n as f64;
        let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
        for (x, y) in xs.iter().zip(ys) {
            sxy += (x - mx) * (y - my);
            sxx += (x - mx) * (x - mx);
            syy += (y - my) * (y - my);
        }
        sxy / (sxx * syy).sqrt()
    }

    /// `(t, p)` of the paired t-test on `x - y`.
    ///
    /// Identical columns give `(0, 1)`; a constant non-zero difference
    /// gives `(±inf, 0)`.
    fn paired_t_test(xs: &[f64], ys: &[f64]) -> (f64, f64) {
        let differences = xs.iter().zip(ys).map(|(x, y)| x - y);
        let moments = Moments::collect(differences, false);
        if moments.count < 2 {
            return (f64::NAN, f64::NAN);
        }
        let mean = moments.mean();
        let sd = moments.std(true);
        if sd == 0.0 {
            return if mean == 0.0 {
                (0.0, 1.0)
            } else {
                (mean.signum() * f64::INFINITY, 0.0)
            };
        }
        let t = mean / (sd / (moments.count as f64).sqrt());
        (t, student_t_two_sided(t, (moments.count - 1) as f64))
    }
}

impl Calculation for PairwiseCalculation {
    fn name(&self) -> &'static str {
        self.statistic.name()
    }

    fn value_type(&self) -> ValueType {
        ValueType::Double
    }

    fn output_size(&self, sources: &[MatrixRef]) -> MatrixResult<Vec<usize>> {
        expect_sources(self.name(), sources, 1)?;
        expect_2d(self.name(), &sources[0])?;
        let columns = sources[0].column_count();
        Ok(vec![columns, columns])
    }

    fn get(&self, sources: &[MatrixRef], coordinates: &Coordinates) -> MatrixResult<Value> {
        let (xs, ys) = self.paired_columns(&sources[0], coordinates.row(), coordinates.column())?;
        let value = match self.statistic {
            PairwiseStatistic::Covariance => self.covariance(&xs, &ys),
            PairwiseStatistic::Correlation => Self::correlation(&xs, &ys),
            PairwiseStatistic::TTestStatistic => Self::paired_t_test(&xs, &ys).0,
            PairwiseStatistic::TTestPValue => Self::paired_t_test(&xs, &ys).1,
        };
        Ok(Value::Double(value))
    }
}
