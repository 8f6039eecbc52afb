//! Elementwise math on a single source

use crate::node::{expect_sources, Calculation};
use omnimat_core::{Coordinates, MatrixRef, MatrixResult, Value, ValueType};

/// Elementwise function applied to every cell as `f64`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UnaryOp {
    Abs,
    Negate,
    Sign,
    Sqrt,
    Exp,
    Log,
    Log2,
    Log10,
    Round,
    Floor,
    Ceil,
    Sin,
    Cos,
    Tan,
    Asin,
    Acos,
    Atan,
    Sinh,
    Cosh,
    Tanh,
    /// Raise to a fixed exponent
    Power(f64),
}

impl UnaryOp {
    pub fn apply(self, x: f64) -> f64 {
        match self {
            UnaryOp::Abs => x.abs(),
            UnaryOp::Negate => -x,
            UnaryOp::Sign => {
                if x.is_nan() || x == 0.0 {
                    x
                } else {
                    x.signum()
                }
            }
            UnaryOp::Sqrt => x.sqrt(),
            UnaryOp::Exp => x.exp(),
            UnaryOp::Log => x.ln(),
            UnaryOp::Log2 => x.log2(),
            UnaryOp::Log10 => x.log10(),
            UnaryOp::Round => x.round(),
            UnaryOp::Floor => x.floor(),
            UnaryOp::Ceil => x.ceil(),
            UnaryOp::Sin => x.sin(),
            UnaryOp::Cos => x.cos(),
            UnaryOp::Tan => x.tan(),
            UnaryOp::Asin => x.asin(),
            UnaryOp::Acos => x.acos(),
            UnaryOp::Atan => x.atan(),
            UnaryOp::Sinh => x.sinh(),
            UnaryOp::Cosh => x.cosh(),
            UnaryOp::Tanh => x.tanh(),
            UnaryOp::Power(exponent) => x.powf(exponent),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            UnaryOp::Abs => "abs",
            UnaryOp::Negate => "negate",
            UnaryOp::Sign => "sign",
            UnaryOp::Sqrt => "sqrt",
            UnaryOp::Exp => "exp",
            UnaryOp::Log => "log",
            UnaryOp::Log2 => "log2",
            UnaryOp::Log10 => "log10",
            UnaryOp::Round => "round",
            UnaryOp::Floor => "floor",
            UnaryOp::Ceil => "ceil",
            UnaryOp::Sin => "sin",
            UnaryOp::Cos => "cos",
            UnaryOp::Tan => "tan",
            UnaryOp::Asin => "asin",
            UnaryOp::Acos => "acos",
            UnaryOp::Atan => "atan",
            UnaryOp::Sinh => "sinh",
            UnaryOp::Cosh => "cosh",
            UnaryOp::Tanh => "tanh",
            UnaryOp::Power(_) => "power",
        }
    }
}

/// `DOUBLE` view of `op(source)`, same size as the source.
#[derive(Debug, Clone)]
pub struct UnaryCalculation {
    op: UnaryOp,
}

impl UnaryCalculation {
    pub fn new(op: UnaryOp) -> Self {
        Self { op }
    }

    pub fn op(&self) -> UnaryOp {
        self.op
    }
}

impl Calculation for UnaryCalculation {
    fn name(&self) -> &'static str {
        self.op.name()
    }

    fn value_type(&self) -> ValueType {
        ValueType::Double
    }

    fn output_size(&self, sources: &[MatrixRef]) -> MatrixResult<Vec<usize>> {
        expect_sources(self.name(), sources, 1)?;
        Ok(sources[0].size().to_vec())
    }

    fn get(&self, sources: &[MatrixRef], coordinates: &Coordinates) -> MatrixResult<Value> {
        let x = sources[0].get_as_double(coordinates)?;
        Ok(Value::Double(self.op.apply(x)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::CalculationNode;
    use omnimat_core::{DenseMatrix, Matrix};
    use std::sync::Arc;

    #[test]
    fn test_ops() {
        assert_eq!(UnaryOp::Abs.apply(-3.0), 3.0);
        assert_eq!(UnaryOp::Sign.apply(-0.5), -1.0);
        assert_eq!(UnaryOp::Sign.apply(0.0), 0.0);
        assert!(UnaryOp::Sign.apply(f64::NAN).is_nan());
        assert_eq!(UnaryOp::Power(3.0).apply(2.0), 8.0);
        assert_eq!(UnaryOp::Log10.apply(1000.0), 3.0);
        assert!(UnaryOp::Sqrt.apply(-1.0).is_nan());
        assert_eq!(UnaryOp::Ceil.apply(1.2), 2.0);
    }

    #[test]
    fn test_reads_any_numeric_source() {
        let source: MatrixRef = Arc::new(DenseMatrix::from_column_major(vec![-1i32, 4], &[1, 2]).unwrap());
        let node = CalculationNode::new(UnaryCalculation::new(UnaryOp::Abs), vec![source]).unwrap();
        assert_eq!(node.value_type(), ValueType::Double);
        assert_eq!(node.get_value(&Coordinates::at(0, 0)).unwrap(), Value::Double(1.0));
    }

    #[test]
    fn test_source_count_is_validated() {
        assert!(CalculationNode::new(UnaryCalculation::new(UnaryOp::Exp), vec![])
            .unwrap_err()
            .is_construction());
    }
}
