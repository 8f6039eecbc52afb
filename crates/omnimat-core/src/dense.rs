//! Dense storage engine.
//!
//! [`DenseMatrix<T>`] allocates every cell up front in a
//! `scirs2_core::ndarray_ext` array laid out column-major, so the memory
//! order of the buffer is the flattening order documented in
//! [`coordinates`](crate::coordinates): for 2D, `column * rows + row`.
//!
//! Operations are O(1) per cell and `contains` is true for every in-bounds
//! coordinate. The size is fixed at construction.
//!
//! # Examples
//!
//! ```
//! use omnimat_core::{Coordinates, DenseMatrix, Matrix, TypedAccess};
//!
//! let m = DenseMatrix::from_column_major(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], &[2, 3]).unwrap();
//! assert_eq!(m.get(&Coordinates::at(1, 0)).unwrap(), 2.0);
//! assert_eq!(m.get(&Coordinates::at(0, 2)).unwrap(), 5.0);
//! assert_eq!(m.available_coordinates().count(), 6);
//! ```

use crate::coordinates::{element_count, from_linear_index, linear_index, AllCoordinates, Coordinates};
use crate::element::Element;
use crate::error::{MatrixError, MatrixResult};
use crate::matrix::{CoordinateIter, DenseAddressable, Matrix, MatrixHeader, TypedAccess};
use crate::observer::Observers;
use crate::types::{Annotation, MatrixId, StorageType, ValueType};
use crate::value::Value;
use num_bigint::BigInt;
use parking_lot::RwLock;
use scirs2_core::ndarray_ext::{Array, IxDyn};
use std::fmt;

/// Fully allocated N-dimensional matrix of element type `T`.
///
/// Storage sits behind a `parking_lot::RwLock`, so concurrent readers are
/// safe; readers interleaved with writers see each cell either before or
/// after a write, never torn.
pub struct DenseMatrix<T: Element> {
    header: MatrixHeader,
    data: RwLock<Array<T, IxDyn>>,
}

fn reversed(size: &[usize]) -> Vec<usize> {
    size.iter().rev().copied().collect()
}

impl<T: Element> DenseMatrix<T> {
    /// Matrix of the type's default value.
    pub fn zeros(size: &[usize]) -> Self {
        Self::filled(size, T::default())
    }

    /// Matrix with every cell set to `value`.
    pub fn filled(size: &[usize], value: T) -> Self {
        // Allocating with reversed axes and flipping them yields
        // column-major memory order.
        let data = Array::from_elem(IxDyn(&reversed(size)), value).reversed_axes();
        Self {
            header: MatrixHeader::new(size),
            data: RwLock::new(data),
        }
    }

    /// Build from a column-major buffer.
    ///
    /// # Errors
    ///
    /// Construction error if `data.len() != product(size)`.
    pub fn from_column_major(data: Vec<T>, size: &[usize]) -> MatrixResult<Self> {
        let expected = element_count(size);
        if data.len() != expected {
            return Err(MatrixError::invalid_argument(format!(
                "size {:?} requires {} elements, got {}",
                size,
                expected,
                data.len()
            )));
        }
        let array = Array::from_shape_vec(IxDyn(&reversed(size)), data)
            .map_err(|e| MatrixError::invalid_argument(e.to_string()))?
            .reversed_axes();
        Ok(Self {
            header: MatrixHeader::new(size),
            data: RwLock::new(array),
        })
    }

    /// Wrap an existing array of any layout.
    pub fn from_array(array: Array<T, IxDyn>) -> Self {
        Self {
            header: MatrixHeader::new(array.shape()),
            data: RwLock::new(array),
        }
    }

    /// Matrix whose cells are produced by `f(coordinates)`.
    pub fn from_fn<F>(size: &[usize], mut f: F) -> Self
    where
        F: FnMut(&Coordinates) -> T,
    {
        let data: Vec<T> = AllCoordinates::new(size).map(|c| f(&c)).collect();
        // Length matches by construction.
        let array = Array::from_shape_vec(IxDyn(&reversed(size)), data)
            .map(|a| a.reversed_axes())
            .unwrap_or_else(|_| Array::from_elem(IxDyn(size), T::default()));
        Self {
            header: MatrixHeader::new(size),
            data: RwLock::new(array),
        }
    }

    /// Copy of the underlying array.
    pub fn to_array(&self) -> Array<T, IxDyn> {
        self.data.read().clone()
    }

    /// Cells in column-major order, ready for serialized-buffer interop.
    pub fn to_column_major_vec(&self) -> Vec<T> {
        self.data.read().t().iter().cloned().collect()
    }

    /// Set every cell to `value`; notifies once.
    pub fn fill(&self, value: T) {
        self.data.write().fill(value);
        tracing::debug!(matrix = %self.header.id(), "dense fill");
        self.header.observers().notify();
    }

    /// Overwrite every cell from a source of the same size, converting
    /// through the shared routine. Notifies once.
    pub fn copy_from(&self, source: &dyn Matrix) -> MatrixResult<()> {
        if source.size() != self.size() {
            return Err(MatrixError::size_mismatch(self.size(), source.size()));
        }
        let mut converted = Vec::with_capacity(self.element_count());
        for c in AllCoordinates::new(self.size()) {
            converted.push((T::from_value(&source.get_value(&c)?)?, c));
        }
        {
            let mut data = self.data.write();
            for (value, c) in converted {
                data[IxDyn(c.as_slice())] = value;
            }
        }
        tracing::debug!(matrix = %self.header.id(), source = %source.id(), "dense copy");
        self.header.observers().notify();
        Ok(())
    }
}

impl<T: Element> Matrix for DenseMatrix<T> {
    fn id(&self) -> MatrixId {
        self.header.id()
    }

    fn size(&self) -> &[usize] {
        self.header.size()
    }

    fn value_type(&self) -> ValueType {
        T::VALUE_TYPE
    }

    fn storage_type(&self) -> StorageType {
        StorageType::Dense
    }

    fn annotation(&self) -> Option<Annotation> {
        self.header.annotation()
    }

    fn set_annotation(&self, annotation: Option<Annotation>) {
        self.header.set_annotation(annotation)
    }

    fn get_value(&self, coordinates: &Coordinates) -> MatrixResult<Value> {
        Ok(TypedAccess::<T>::get(self, coordinates)?.to_value())
    }

    fn set_value(&self, value: Value, coordinates: &Coordinates) -> MatrixResult<()> {
        coordinates.check_bounds(self.size())?;
        let converted = T::from_value(&value)?;
        TypedAccess::<T>::set(self, converted, coordinates)
    }

    fn contains(&self, coordinates: &Coordinates) -> bool {
        coordinates.is_within(self.size())
    }

    fn available_coordinates(&self) -> CoordinateIter<'_> {
        Box::new(AllCoordinates::new(self.size()))
    }

    fn observers(&self) -> &Observers {
        self.header.observers()
    }
}

impl<T: Element> TypedAccess<T> for DenseMatrix<T> {
    fn get(&self, coordinates: &Coordinates) -> MatrixResult<T> {
        coordinates.check_bounds(self.size())?;
        Ok(self.data.read()[IxDyn(coordinates.as_slice())].clone())
    }

    fn set(&self, value: T, coordinates: &Coordinates) -> MatrixResult<()> {
        coordinates.check_bounds(self.size())?;
        self.data.write()[IxDyn(coordinates.as_slice())] = value;
        self.header.observers().notify();
        Ok(())
    }
}

impl<T: Element> DenseAddressable for DenseMatrix<T> {
    fn linear_index(&self, coordinates: &Coordinates) -> MatrixResult<usize> {
        coordinates.check_bounds(self.size())?;
        Ok(linear_index(coordinates, self.size()))
    }

    fn get_linear(&self, index: usize) -> MatrixResult<Value> {
        self.get_value(&self.coordinates_of(index)?)
    }

    fn set_linear(&self, value: Value, index: usize) -> MatrixResult<()> {
        let coordinates = self.coordinates_of(index)?;
        self.set_value(value, &coordinates)
    }
}

impl<T: Element> DenseMatrix<T> {
    fn coordinates_of(&self, index: usize) -> MatrixResult<Coordinates> {
        let count = self.element_count();
        if index >= count {
            return Err(MatrixError::out_of_bounds(&Coordinates::new(&[index]), &[count]));
        }
        Ok(from_linear_index(index, self.size()))
    }
}

impl<T: Element> fmt::Debug for DenseMatrix<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DenseMatrix")
            .field("id", &self.header.id())
            .field("size", &self.size())
            .field("value_type", &T::VALUE_TYPE)
            .finish()
    }
}

pub type DenseBooleanMatrix = DenseMatrix<bool>;
pub type DenseByteMatrix = DenseMatrix<i8>;
pub type DenseShortMatrix = DenseMatrix<i16>;
pub type DenseCharMatrix = DenseMatrix<char>;
pub type DenseIntMatrix = DenseMatrix<i32>;
pub type DenseLongMatrix = DenseMatrix<i64>;
pub type DenseFloatMatrix = DenseMatrix<f32>;
pub type DenseDoubleMatrix = DenseMatrix<f64>;
pub type DenseBigIntegerMatrix = DenseMatrix<BigInt>;
pub type DenseObjectMatrix = DenseMatrix<Value>;
pub type DenseStringMatrix = DenseMatrix<String>;
