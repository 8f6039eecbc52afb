//! Random fills.
//!
//! A random node has the size of its source and ignores the source's
//! values. Every read draws a fresh sample, so the node is not idempotent:
//! memoising calculations refuse it as a source, and materialising it is the
//! way to get a stable matrix.

use crate::node::{expect_sources, Calculation};
use omnimat_core::{Coordinates, MatrixError, MatrixRef, MatrixResult, Value, ValueType};
use scirs2_core::random::quick::random_f64;

/// Distribution of the drawn samples.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RandomFill {
    /// Uniform on `[min, max)`
    Uniform { min: f64, max: f64 },
    /// Gaussian via Box-Muller
    Normal { mean: f64, std: f64 },
}

impl RandomFill {
    pub fn uniform(min: f64, max: f64) -> Self {
        RandomFill::Uniform { min, max }
    }

    pub fn normal(mean: f64, std: f64) -> Self {
        RandomFill::Normal { mean, std }
    }

    pub fn sample(self) -> f64 {
        match self {
            RandomFill::Uniform { min, max } => min + random_f64() * (max - min),
            RandomFill::Normal { mean, std } => {
                // 1 - u keeps the logarithm finite.
                let u1 = 1.0 - random_f64();
                let u2 = random_f64();
                let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
                mean + std * z
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct RandomCalculation {
    fill: RandomFill,
}

impl RandomCalculation {
    /// # Errors
    ///
    /// Invalid argument for non-finite parameters, `min > max` or a
    /// negative standard deviation.
    pub fn new(fill: RandomFill) -> MatrixResult<Self> {
        let valid = match fill {
            RandomFill::Uniform { min, max } => min.is_finite() && max.is_finite() && min <= max,
            RandomFill::Normal { mean, std } => mean.is_finite() && std.is_finite() && std >= 0.0,
        };
        if !valid {
            return Err(MatrixError::invalid_argument(format!("invalid random fill {:?}", fill)));
        }
        Ok(Self { fill })
    }
}

impl Calculation for RandomCalculation {
    fn name(&self) -> &'static str {
        "random"
    }

    fn value_type(&self) -> ValueType {
        ValueType::Double
    }

    fn is_idempotent(&self) -> bool {
        false
    }

    fn output_size(&self, sources: &[MatrixRef]) -> MatrixResult<Vec<usize>> {
        expect_sources(self.name(), sources, 1)?;
        Ok(sources[0].size().to_vec())
    }

    fn get(&self, _sources: &[MatrixRef], _coordinates: &Coordinates) -> MatrixResult<Value> {
        Ok(Value::Double(self.fill.sample()))
    }
}
