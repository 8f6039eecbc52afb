//! Transposed view of a two-dimensional matrix.

use crate::node::{expect_2d, expect_sources, Calculation};
use omnimat_core::{Coordinates, MatrixRef, MatrixResult, Value, ValueType};

/// Cell `(r, c)` of the view is cell `(c, r)` of the source.
///
/// The view keeps the source's value type and is writable: a write lands in
/// the source at the swapped coordinates.
#[derive(Debug, Clone)]
pub struct TransposeCalculation {
    value_type: ValueType,
}

impl TransposeCalculation {
    pub fn new(value_type: ValueType) -> Self {
        Self { value_type }
    }

    /// Transpose of `source`, typed like it.
    pub fn of(source: &MatrixRef) -> Self {
        Self::new(source.value_type())
    }
}

impl Calculation for TransposeCalculation {
    fn name(&self) -> &'static str {
        "transpose"
    }

    fn value_type(&self) -> ValueType {
        self.value_type
    }

    fn output_size(&self, sources: &[MatrixRef]) -> MatrixResult<Vec<usize>> {
        expect_sources(self.name(), sources, 1)?;
        expect_2d(self.name(), &sources[0])?;
        Ok(vec![sources[0].column_count(), sources[0].row_count()])
    }

    fn get(&self, sources: &[MatrixRef], coordinates: &Coordinates) -> MatrixResult<Value> {
        sources[0].get_value(&coordinates.transpose())?.convert_to(self.value_type)
    }

    fn set(&self, sources: &[MatrixRef], value: Value, coordinates: &Coordinates) -> MatrixResult<()> {
        sources[0].set_value(value, &coordinates.transpose())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::CalculationNode;
    use omnimat_core::{DenseMatrix, Matrix, SparseMatrix};
    use std::sync::Arc;

    #[test]
    fn test_transpose_reads_swapped() {
        let source: MatrixRef = Arc::new(DenseMatrix::from_column_major(vec![1i32, 2, 3, 4, 5, 6], &[2, 3]).unwrap());
        let node = CalculationNode::new(TransposeCalculation::of(&source), vec![source.clone()]).unwrap();
        assert_eq!(node.size(), &[3, 2]);
        assert_eq!(node.value_type(), ValueType::Int);
        assert_eq!(node.get_value(&Coordinates::at(2, 1)).unwrap(), Value::Int(6));
        assert_eq!(node.get_as_int(&Coordinates::at(1, 0)).unwrap(), 3);
    }

    #[test]
    fn test_transpose_writes_through() {
        let source: MatrixRef = Arc::new(SparseMatrix::<f64>::zeros(&[4, 2]));
        let node = CalculationNode::new(TransposeCalculation::of(&source), vec![source.clone()]).unwrap();
        node.set_as_double(7.5, &Coordinates::at(1, 3)).unwrap();
        assert_eq!(source.get_as_double(&Coordinates::at(3, 1)).unwrap(), 7.5);
        assert!(node.set_as_double(1.0, &Coordinates::at(2, 0)).unwrap_err().is_out_of_bounds());
    }

    #[test]
    fn test_transpose_needs_2d() {
        let cube: MatrixRef = Arc::new(DenseMatrix::<f64>::zeros(&[1, 2, 3]));
        assert!(CalculationNode::new(TransposeCalculation::of(&cube), vec![cube]).is_err());
    }
}
