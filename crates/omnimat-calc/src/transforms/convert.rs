//! Value-type conversion view.
//!
//! Reads go through the shared conversion routine, so a `DOUBLE` source
//! seen as `INT` truncates toward zero and a NaN cell fails the read with a
//! type-validation error. Writes are handed to the source unchanged, where
//! the source's own type decides whether they fit.

use crate::node::{expect_sources, Calculation};
use omnimat_core::{Coordinates, MatrixRef, MatrixResult, Value, ValueType};

#[derive(Debug, Clone)]
pub struct ConvertCalculation {
    target: ValueType,
}

impl ConvertCalculation {
    pub fn new(target: ValueType) -> Self {
        Self { target }
    }

    pub fn target(&self) -> ValueType {
        self.target
    }
}

impl Calculation for ConvertCalculation {
    fn name(&self) -> &'static str {
        "convert"
    }

    fn value_type(&self) -> ValueType {
        self.target
    }

    fn output_size(&self, sources: &[MatrixRef]) -> MatrixResult<Vec<usize>> {
        expect_sources(self.name(), sources, 1)?;
        Ok(sources[0].size().to_vec())
    }

    fn get(&self, sources: &[MatrixRef], coordinates: &Coordinates) -> MatrixResult<Value> {
        sources[0].get_value(coordinates)?.convert_to(self.target)
    }

    fn set(&self, sources: &[MatrixRef], value: Value, coordinates: &Coordinates) -> MatrixResult<()> {
        sources[0].set_value(value, coordinates)
    }
}
