//! Elementwise arithmetic between two matrices or a matrix and a scalar

use crate::node::{expect_sources, Calculation};
use omnimat_core::{Coordinates, MatrixError, MatrixRef, MatrixResult, Value, ValueType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Plus,
    Minus,
    Times,
    Divide,
    Power,
    Min,
    Max,
}

impl BinaryOp {
    /// IEEE semantics; `Min` and `Max` propagate NaN.
    pub fn apply(self, a: f64, b: f64) -> f64 {
        match self {
            BinaryOp::Plus => a + b,
            BinaryOp::Minus => a - b,
            BinaryOp::Times => a * b,
            BinaryOp::Divide => a / b,
            BinaryOp::Power => a.powf(b),
            BinaryOp::Min if a.is_nan() || b.is_nan() => f64::NAN,
            BinaryOp::Min => a.min(b),
            BinaryOp::Max if a.is_nan() || b.is_nan() => f64::NAN,
            BinaryOp::Max => a.max(b),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            BinaryOp::Plus => "plus",
            BinaryOp::Minus => "minus",
            BinaryOp::Times => "times",
            BinaryOp::Divide => "divide",
            BinaryOp::Power => "power",
            BinaryOp::Min => "min",
            BinaryOp::Max => "max",
        }
    }
}

/// Right-hand side of a binary calculation.
#[derive(Debug, Clone)]
pub enum Operand {
    /// Second source matrix of the same size
    Matrix(MatrixRef),
    Scalar(f64),
}

impl From<MatrixRef> for Operand {
    fn from(matrix: MatrixRef) -> Self {
        Operand::Matrix(matrix)
    }
}

impl From<&MatrixRef> for Operand {
    fn from(matrix: &MatrixRef) -> Self {
        Operand::Matrix(matrix.clone())
    }
}

impl From<f64> for Operand {
    fn from(value: f64) -> Self {
        Operand::Scalar(value)
    }
}

/// `DOUBLE` view of `op(left, right)`.
///
/// With a matrix operand the node has two sources that must share a size;
/// with a scalar operand it has one.
#[derive(Debug, Clone)]
pub struct BinaryCalculation {
    op: BinaryOp,
    scalar: Option<f64>,
}

impl BinaryCalculation {
    /// Calculation plus the sources it expects.
    pub fn with_operand(op: BinaryOp, left: MatrixRef, operand: Operand) -> (Self, Vec<MatrixRef>) {
        match operand {
            Operand::Matrix(right) => (Self { op, scalar: None }, vec![left, right]),
            Operand::Scalar(value) => (
                Self {
                    op,
                    scalar: Some(value),
                },
                vec![left],
            ),
        }
    }

    /// Two-source calculation.
    pub fn matrices(op: BinaryOp) -> Self {
        Self { op, scalar: None }
    }

    /// One-source calculation with a fixed right-hand side.
    pub fn scalar(op: BinaryOp, value: f64) -> Self {
        Self {
            op,
            scalar: Some(value),
        }
    }
}

impl Calculation for BinaryCalculation {
    fn name(&self) -> &'static str {
        self.op.name()
    }

    fn value_type(&self) -> ValueType {
        ValueType::Double
    }

    fn output_size(&self, sources: &[MatrixRef]) -> MatrixResult<Vec<usize>> {
        match self.scalar {
            Some(_) => expect_sources(self.name(), sources, 1)?,
            None => {
                expect_sources(self.name(), sources, 2)?;
                if sources[0].size() != sources[1].size() {
                    return Err(MatrixError::size_mismatch(sources[0].size(), sources[1].size()));
                }
            }
        }
        Ok(sources[0].size().to_vec())
    }

    fn get(&self, sources: &[MatrixRef], coordinates: &Coordinates) -> MatrixResult<Value> {
        let a = sources[0].get_as_double(coordinates)?;
        let b = match self.scalar {
            Some(value) => value,
            None => sources[1].get_as_double(coordinates)?,
        };
        Ok(Value::Double(self.op.apply(a, b)))
    }
}
