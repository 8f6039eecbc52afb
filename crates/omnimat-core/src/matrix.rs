//! The matrix contract.
//!
//! [`Matrix`] is the object-safe interface every storage engine and every
//! calculation node implements. Its authoritative path is
//! [`Matrix::get_value`] / [`Matrix::set_value`]; the typed `get_as_*` /
//! `set_as_*` family is provided on top of it and always converts through
//! [`Value`], so conversions are identical across implementations.
//!
//! Capabilities beyond the contract are separate traits:
//!
//! - [`TypedAccess<T>`]: exact access in the matrix's own element type
//! - [`SparseEnumerable`]: entry counts and caps of sparse engines
//! - [`DenseAddressable`]: column-major linear addressing of dense engines
//!
//! # Examples
//!
//! ```
//! use omnimat_core::{Coordinates, DenseMatrix, Matrix};
//!
//! let m = DenseMatrix::<i32>::zeros(&[2, 2]);
//! let c = Coordinates::at(1, 0);
//! m.set_as_double(7.9, &c).unwrap();
//! assert_eq!(m.get_as_int(&c).unwrap(), 7);
//! assert!(m.set_as_double(f64::NAN, &c).is_err());
//! assert_eq!(m.get_as_int(&c).unwrap(), 7);
//! ```

use crate::coordinates::{element_count, Coordinates};
use crate::element::Element;
use crate::error::MatrixResult;
use crate::observer::Observers;
use crate::types::{Annotation, MatrixId, StorageType, ValueType};
use crate::value::Value;
use num_bigint::BigInt;
use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;

/// Shared, reference-counted matrix handle.
///
/// Calculation nodes hold their sources through this handle; they never
/// copy them.
pub type MatrixRef = Arc<dyn Matrix>;

/// Sequence of coordinates produced by [`Matrix::available_coordinates`].
pub type CoordinateIter<'a> = Box<dyn Iterator<Item = Coordinates> + Send + 'a>;

macro_rules! typed_accessors {
    ($($get:ident, $set:ident, $ty:ty, $conv:ident, $variant:ident;)*) => {
        $(
            fn $get(&self, coordinates: &Coordinates) -> MatrixResult<$ty> {
                self.get_value(coordinates)?.$conv()
            }

            fn $set(&self, value: $ty, coordinates: &Coordinates) -> MatrixResult<()> {
                self.set_value(Value::$variant(value), coordinates)
            }
        )*
    };
}

/// Generic N-dimensional matrix of a fixed value type and storage type.
///
/// Size, value type and storage type are immutable for the life of the
/// instance. Implementations use interior mutability, so every method takes
/// `&self` and handles can be shared as [`MatrixRef`].
pub trait Matrix: Send + Sync + fmt::Debug {
    fn id(&self) -> MatrixId;

    /// Extent of every dimension.
    fn size(&self) -> &[usize];

    fn value_type(&self) -> ValueType;

    fn storage_type(&self) -> StorageType;

    fn annotation(&self) -> Option<Annotation>;

    fn set_annotation(&self, annotation: Option<Annotation>);

    /// Read a cell in dynamic form. Fails when out of bounds.
    fn get_value(&self, coordinates: &Coordinates) -> MatrixResult<Value>;

    /// Write a cell, converting to the value type first. A failed
    /// conversion leaves the cell unchanged.
    fn set_value(&self, value: Value, coordinates: &Coordinates) -> MatrixResult<()>;

    /// Whether a cell exists: every in-bounds cell for dense storage, only
    /// explicit entries for sparse storage.
    fn contains(&self, coordinates: &Coordinates) -> bool;

    /// All existing cells. Finite; never yields out-of-bounds coordinates.
    fn available_coordinates(&self) -> CoordinateIter<'_>;

    fn observers(&self) -> &Observers;

    /// Matrices this one reads from. Empty for storage engines.
    fn sources(&self) -> Vec<MatrixRef> {
        Vec::new()
    }

    /// Whether repeated reads of an unchanged matrix return the same values.
    fn is_idempotent(&self) -> bool {
        true
    }

    fn dimension_count(&self) -> usize {
        self.size().len()
    }

    fn row_count(&self) -> usize {
        self.size().first().copied().unwrap_or(1)
    }

    fn column_count(&self) -> usize {
        self.size().get(1).copied().unwrap_or(1)
    }

    /// Number of addressable cells, `product(size)`.
    fn element_count(&self) -> usize {
        element_count(self.size())
    }

    /// Signal "state may have changed" to every subscriber.
    fn notify_changed(&self) {
        self.observers().notify()
    }

    /// Whether `id` appears anywhere in this matrix's transitive sources.
    fn depends_on(&self, id: MatrixId) -> bool {
        self.sources()
            .iter()
            .any(|source| source.id() == id || source.depends_on(id))
    }

    typed_accessors! {
        get_as_double, set_as_double, f64, to_f64, Double;
        get_as_float, set_as_float, f32, to_f32, Float;
        get_as_long, set_as_long, i64, to_i64, Long;
        get_as_int, set_as_int, i32, to_i32, Int;
        get_as_short, set_as_short, i16, to_i16, Short;
        get_as_byte, set_as_byte, i8, to_i8, Byte;
        get_as_char, set_as_char, char, to_char, Char;
        get_as_boolean, set_as_boolean, bool, to_bool, Boolean;
        get_as_big_integer, set_as_big_integer, BigInt, to_big_integer, BigInteger;
    }

    fn get_as_string(&self, coordinates: &Coordinates) -> MatrixResult<String> {
        Ok(self.get_value(coordinates)?.to_text())
    }

    fn set_as_string(&self, value: &str, coordinates: &Coordinates) -> MatrixResult<()> {
        self.set_value(Value::String(value.to_string()), coordinates)
    }

    fn get_as_object(&self, coordinates: &Coordinates) -> MatrixResult<Value> {
        self.get_value(coordinates)
    }

    fn set_as_object(&self, value: Value, coordinates: &Coordinates) -> MatrixResult<()> {
        self.set_value(value, coordinates)
    }
}

/// Exact access in the matrix's own element type.
pub trait TypedAccess<T: Element>: Matrix {
    fn get(&self, coordinates: &Coordinates) -> MatrixResult<T>;

    fn set(&self, value: T, coordinates: &Coordinates) -> MatrixResult<()>;
}

/// Entry bookkeeping of sparse engines.
pub trait SparseEnumerable: Matrix {
    /// Number of explicit entries.
    fn entry_count(&self) -> usize;

    /// Configured entry cap, if any.
    fn max_entries(&self) -> Option<usize>;

    /// Fraction of cells holding an explicit entry.
    fn density(&self) -> f64 {
        let total = self.element_count();
        if total == 0 {
            0.0
        } else {
            self.entry_count() as f64 / total as f64
        }
    }
}

/// Column-major linear addressing of dense engines.
pub trait DenseAddressable: Matrix {
    /// Linear index of in-bounds coordinates, `column * rows + row` in 2D.
    fn linear_index(&self, coordinates: &Coordinates) -> MatrixResult<usize>;

    fn get_linear(&self, index: usize) -> MatrixResult<Value>;

    fn set_linear(&self, value: Value, index: usize) -> MatrixResult<()>;
}

/// Identity, size, annotation and observers shared by every implementation.
#[derive(Debug)]
pub struct MatrixHeader {
    id: MatrixId,
    size: Vec<usize>,
    annotation: RwLock<Option<Annotation>>,
    observers: Observers,
}

impl MatrixHeader {
    pub fn new(size: &[usize]) -> Self {
        Self {
            id: MatrixId::next(),
            size: size.to_vec(),
            annotation: RwLock::new(None),
            observers: Observers::new(),
        }
    }

    pub fn id(&self) -> MatrixId {
        self.id
    }

    pub fn size(&self) -> &[usize] {
        &self.size
    }

    pub fn annotation(&self) -> Option<Annotation> {
        self.annotation.read().clone()
    }

    pub fn set_annotation(&self, annotation: Option<Annotation>) {
        *self.annotation.write() = annotation;
    }

    pub fn observers(&self) -> &Observers {
        &self.observers
    }
}

/// Whether two matrices have the same size and equal values in every cell.
///
/// Cells are compared through [`Value::to_f64`] when both value types are
/// numeric and through [`Value`] equality otherwise. Annotations are ignored.
pub fn matrices_equal(a: &dyn Matrix, b: &dyn Matrix) -> MatrixResult<bool> {
    if a.size() != b.size() {
        return Ok(false);
    }
    let numeric = |t: ValueType| !matches!(t, ValueType::Object | ValueType::String);
    let compare_numeric = numeric(a.value_type()) && numeric(b.value_type());
    for c in crate::coordinates::AllCoordinates::new(a.size()) {
        let (x, y) = (a.get_value(&c)?, b.get_value(&c)?);
        let equal = if compare_numeric {
            let (x, y) = (x.to_f64()?, y.to_f64()?);
            x == y || (x.is_nan() && y.is_nan())
        } else {
            x == y
        };
        if !equal {
            return Ok(false);
        }
    }
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dense::DenseMatrix;
    use crate::sparse::SparseMatrix;

    #[test]
    fn test_conversion_through_non_authoritative_accessors() {
        let m = DenseMatrix::<f64>::zeros(&[2, 2]);
        let c = Coordinates::at(0, 1);
        m.set_as_int(-12, &c).unwrap();
        assert_eq!(m.get_as_double(&c).unwrap(), -12.0);
        m.set_as_char('A', &c).unwrap();
        assert_eq!(m.get_as_double(&c).unwrap(), 65.0);
        assert_eq!(m.get_as_char(&c).unwrap(), 'A');
        assert_eq!(m.get_as_string(&c).unwrap(), "65");
    }

    #[test]
    fn test_integral_matrix_rejects_non_finite() {
        let m = DenseMatrix::<i64>::zeros(&[1, 3]);
        let c = Coordinates::at(0, 2);
        m.set_as_long(9, &c).unwrap();
        for v in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            assert!(m.set_as_double(v, &c).unwrap_err().is_type_validation());
        }
        assert_eq!(m.get_as_long(&c).unwrap(), 9);
    }

    #[test]
    fn test_floating_matrix_keeps_ieee_values() {
        let m = DenseMatrix::<f32>::zeros(&[1, 1]);
        let c = Coordinates::at(0, 0);
        m.set_as_double(f64::INFINITY, &c).unwrap();
        assert_eq!(m.get_as_float(&c).unwrap(), f32::INFINITY);
        m.set_as_double(f64::NAN, &c).unwrap();
        assert!(m.get_as_double(&c).unwrap().is_nan());
    }

    #[test]
    fn test_row_and_column_counts() {
        let m = DenseMatrix::<f64>::zeros(&[3, 5]);
        assert_eq!(m.row_count(), 3);
        assert_eq!(m.column_count(), 5);
        assert_eq!(m.element_count(), 15);
        assert_eq!(m.dimension_count(), 2);
    }

    #[test]
    fn test_matrices_equal_across_storage() {
        let dense = DenseMatrix::<f64>::zeros(&[2, 2]);
        let sparse = SparseMatrix::<i32>::zeros(&[2, 2]);
        dense.set_as_double(3.0, &Coordinates::at(1, 1)).unwrap();
        assert!(!matrices_equal(&dense, &sparse).unwrap());
        sparse.set_as_int(3, &Coordinates::at(1, 1)).unwrap();
        assert!(matrices_equal(&dense, &sparse).unwrap());
        let other = DenseMatrix::<f64>::zeros(&[2, 3]);
        assert!(!matrices_equal(&dense, &other).unwrap());
    }

    #[test]
    fn test_annotation_is_mutable() {
        let m = DenseMatrix::<f64>::zeros(&[1, 1]);
        assert!(m.annotation().is_none());
        m.set_annotation(Some(Annotation::new("weights")));
        assert_eq!(m.annotation().unwrap().label, "weights");
    }
}
