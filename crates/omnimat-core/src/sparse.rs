//! Sparse storage engine.
//!
//! [`SparseMatrix<T>`] keeps only explicit entries in an ordered map keyed by
//! [`Coordinates`]. Cells without an entry read as the value type's default.
//! Writing the default deletes the entry, so `contains` reports exactly the
//! cells that hold a non-default value.
//!
//! An optional entry cap bounds memory. Inserting a new entry beyond the cap
//! fails with [`MatrixError::Capacity`]; overwriting or deleting an existing
//! entry always succeeds.
//!
//! # Examples
//!
//! ```
//! use omnimat_core::{Coordinates, Matrix, SparseEnumerable, SparseMatrix};
//!
//! let m = SparseMatrix::<f64>::zeros(&[1000, 1000]);
//! m.set_as_double(2.5, &Coordinates::at(10, 20)).unwrap();
//! assert_eq!(m.entry_count(), 1);
//! assert_eq!(m.get_as_double(&Coordinates::at(0, 0)).unwrap(), 0.0);
//!
//! m.set_as_double(0.0, &Coordinates::at(10, 20)).unwrap();
//! assert_eq!(m.available_coordinates().count(), 0);
//! ```

use crate::coordinates::Coordinates;
use crate::element::Element;
use crate::error::{MatrixError, MatrixResult};
use crate::matrix::{CoordinateIter, Matrix, MatrixHeader, SparseEnumerable, TypedAccess};
use crate::observer::Observers;
use crate::types::{Annotation, MatrixId, StorageType, ValueType};
use crate::value::Value;
use num_bigint::BigInt;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::fmt;
use std::ops::Bound::{Excluded, Unbounded};

/// Matrix storing only non-default cells.
pub struct SparseMatrix<T: Element> {
    header: MatrixHeader,
    entries: RwLock<BTreeMap<Coordinates, T>>,
    max_entries: Option<usize>,
}

impl<T: Element> SparseMatrix<T> {
    /// Empty matrix without an entry cap.
    pub fn zeros(size: &[usize]) -> Self {
        Self {
            header: MatrixHeader::new(size),
            entries: RwLock::new(BTreeMap::new()),
            max_entries: None,
        }
    }

    /// Empty matrix refusing more than `max_entries` explicit entries.
    pub fn with_max_entries(size: &[usize], max_entries: usize) -> Self {
        Self {
            max_entries: Some(max_entries),
            ..Self::zeros(size)
        }
    }

    /// Build from explicit entries. Default values are skipped.
    ///
    /// # Errors
    ///
    /// Out-of-bounds coordinates.
    pub fn from_entries<I>(size: &[usize], entries: I) -> MatrixResult<Self>
    where
        I: IntoIterator<Item = (Coordinates, T)>,
    {
        let matrix = Self::zeros(size);
        {
            let mut map = matrix.entries.write();
            for (c, value) in entries {
                c.check_bounds(size)?;
                if value.is_default() {
                    map.remove(&c);
                } else {
                    map.insert(c, value);
                }
            }
        }
        Ok(matrix)
    }

    /// Snapshot of the explicit entries in coordinate order.
    pub fn entries(&self) -> Vec<(Coordinates, T)> {
        self.entries
            .read()
            .iter()
            .map(|(c, v)| (c.clone(), v.clone()))
            .collect()
    }

    /// Drop every entry; notifies once.
    pub fn clear(&self) {
        self.entries.write().clear();
        tracing::debug!(matrix = %self.header.id(), "sparse clear");
        self.header.observers().notify();
    }

    /// Replace the contents with the non-default cells of `source`, which
    /// must have the same size. Only the source's available coordinates are
    /// visited.
    pub fn copy_from(&self, source: &dyn Matrix) -> MatrixResult<()> {
        if source.size() != self.size() {
            return Err(MatrixError::size_mismatch(self.size(), source.size()));
        }
        let mut incoming = BTreeMap::new();
        for c in source.available_coordinates() {
            let value = T::from_value(&source.get_value(&c)?)?;
            if !value.is_default() {
                incoming.insert(c, value);
            }
        }
        if let Some(max) = self.max_entries {
            if incoming.len() > max {
                tracing::warn!(matrix = %self.header.id(), max, wanted = incoming.len(), "sparse copy exceeds entry cap");
                return Err(MatrixError::Capacity { max_entries: max });
            }
        }
        *self.entries.write() = incoming;
        tracing::debug!(matrix = %self.header.id(), source = %source.id(), "sparse copy");
        self.header.observers().notify();
        Ok(())
    }
}

impl<T: Element> Matrix for SparseMatrix<T> {
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
        StorageType::Sparse
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
        coordinates.is_within(self.size()) && self.entries.read().contains_key(coordinates)
    }

    fn available_coordinates(&self) -> CoordinateIter<'_> {
        Box::new(EntryCoordinates {
            matrix: self,
            last: None,
            done: false,
        })
    }

    fn observers(&self) -> &Observers {
        self.header.observers()
    }
}

impl<T: Element> TypedAccess<T> for SparseMatrix<T> {
    fn get(&self, coordinates: &Coordinates) -> MatrixResult<T> {
        coordinates.check_bounds(self.size())?;
        Ok(self
            .entries
            .read()
            .get(coordinates)
            .cloned()
            .unwrap_or_default())
    }

    fn set(&self, value: T, coordinates: &Coordinates) -> MatrixResult<()> {
        coordinates.check_bounds(self.size())?;
        {
            let mut entries = self.entries.write();
            if value.is_default() {
                entries.remove(coordinates);
            } else if let Some(existing) = entries.get_mut(coordinates) {
                *existing = value;
            } else {
                if let Some(max) = self.max_entries {
                    if entries.len() >= max {
                        tracing::warn!(matrix = %self.header.id(), max, %coordinates, "sparse entry cap reached");
                        return Err(MatrixError::Capacity { max_entries: max });
                    }
                }
                entries.insert(coordinates.clone(), value);
            }
        }
        self.header.observers().notify();
        Ok(())
    }
}

impl<T: Element> SparseEnumerable for SparseMatrix<T> {
    fn entry_count(&self) -> usize {
        self.entries.read().len()
    }

    fn max_entries(&self) -> Option<usize> {
        self.max_entries
    }
}

/// Lazy walk over the entry keys.
///
/// Each step takes a short read lock and resumes strictly after the last
/// yielded key, so concurrent writes never invalidate the iterator and no
/// key is yielded twice.
struct EntryCoordinates<'a, T: Element> {
    matrix: &'a SparseMatrix<T>,
    last: Option<Coordinates>,
    done: bool,
}

impl<T: Element> Iterator for EntryCoordinates<'_, T> {
    type Item = Coordinates;

    fn next(&mut self) -> Option<Coordinates> {
        if self.done {
            return None;
        }
        let entries = self.matrix.entries.read();
        let next = match &self.last {
            None => entries.keys().next().cloned(),
            Some(last) => entries
                .range::<Coordinates, _>((Excluded(last), Unbounded))
                .next()
                .map(|(c, _)| c.clone()),
        };
        drop(entries);
        match next {
            Some(c) => {
                self.last = Some(c.clone());
                Some(c)
            }
            None => {
                self.done = true;
                None
            }
        }
    }
}

impl<T: Element> fmt::Debug for SparseMatrix<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SparseMatrix")
            .field("id", &self.header.id())
            .field("size", &self.size())
            .field("value_type", &T::VALUE_TYPE)
            .field("entries", &self.entry_count())
            .field("max_entries", &self.max_entries)
            .finish()
    }
}

pub type SparseBooleanMatrix = SparseMatrix<bool>;
pub type SparseByteMatrix = SparseMatrix<i8>;
pub type SparseShortMatrix = SparseMatrix<i16>;
pub type SparseCharMatrix = SparseMatrix<char>;
pub type SparseIntMatrix = SparseMatrix<i32>;
pub type SparseLongMatrix = SparseMatrix<i64>;
pub type SparseFloatMatrix = SparseMatrix<f32>;
pub type SparseDoubleMatrix = SparseMatrix<f64>;
pub type SparseBigIntegerMatrix = SparseMatrix<BigInt>;
pub type SparseObjectMatrix = SparseMatrix<Value>;
pub type SparseStringMatrix = SparseMatrix<String>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dense::DenseMatrix;

    #[test]
    fn test_default_write_deletes_entry() {
        let m = SparseMatrix::<i32>::zeros(&[3, 3]);
        let c = Coordinates::at(1, 2);
        m.set(5, &c).unwrap();
        assert!(m.contains(&c));
        m.set(0, &c).unwrap();
        assert!(!m.contains(&c));
        assert_eq!(m.entry_count(), 0);
        assert_eq!(m.get(&c).unwrap(), 0);
    }

    #[test]
    fn test_available_coordinates_are_entries() {
        let m = SparseMatrix::<f64>::zeros(&[10, 10]);
        let cells = [Coordinates::at(9, 0), Coordinates::at(0, 9), Coordinates::at(4, 4)];
        for c in &cells {
            m.set_as_double(1.0, c).unwrap();
        }
        let mut seen: Vec<_> = m.available_coordinates().collect();
        seen.sort();
        let mut expected = cells.to_vec();
        expected.sort();
        assert_eq!(seen, expected);
        assert!(seen.iter().all(|c| m.contains(c)));
    }

    #[test]
    fn test_iteration_tolerates_concurrent_delete() {
        let m = SparseMatrix::<i64>::zeros(&[4, 1]);
        for row in 0..4 {
            m.set(1, &Coordinates::at(row, 0)).unwrap();
        }
        let mut iter = m.available_coordinates();
        let first = iter.next().unwrap();
        m.set(0, &Coordinates::at(2, 0)).unwrap();
        let rest: Vec<_> = iter.collect();
        assert_eq!(first, Coordinates::at(0, 0));
        assert_eq!(rest, vec![Coordinates::at(1, 0), Coordinates::at(3, 0)]);
    }

    #[test]
    fn test_capacity_rejects_only_new_entries() {
        let m = SparseMatrix::<f64>::with_max_entries(&[5, 5], 2);
        m.set(1.0, &Coordinates::at(0, 0)).unwrap();
        m.set(2.0, &Coordinates::at(1, 1)).unwrap();
        let err = m.set(3.0, &Coordinates::at(2, 2)).unwrap_err();
        assert!(err.is_capacity());
        assert!(!m.contains(&Coordinates::at(2, 2)));
        m.set(4.0, &Coordinates::at(0, 0)).unwrap();
        m.set(0.0, &Coordinates::at(1, 1)).unwrap();
        m.set(3.0, &Coordinates::at(2, 2)).unwrap();
        assert_eq!(m.entry_count(), 2);
        assert_eq!(m.max_entries(), Some(2));
    }

    #[test]
    fn test_out_of_bounds() {
        let m = SparseMatrix::<bool>::zeros(&[2, 2]);
        assert!(m.get_as_boolean(&Coordinates::at(2, 2)).unwrap_err().is_out_of_bounds());
        assert!(m.set(true, &Coordinates::new(&[0])).unwrap_err().is_out_of_bounds());
        assert!(!m.contains(&Coordinates::at(9, 9)));
    }

    #[test]
    fn test_failed_conversion_keeps_entry() {
        let m = SparseMatrix::<i8>::zeros(&[1, 1]);
        let c = Coordinates::at(0, 0);
        m.set_as_byte(3, &c).unwrap();
        assert!(m.set_as_double(300.0, &c).unwrap_err().is_type_validation());
        assert_eq!(m.get(&c).unwrap(), 3);
    }

    #[test]
    fn test_copy_from_dense() {
        let dense = DenseMatrix::<f64>::zeros(&[3, 2]);
        dense.set_as_double(1.5, &Coordinates::at(2, 1)).unwrap();
        let sparse = SparseMatrix::<f64>::zeros(&[3, 2]);
        sparse.set(9.0, &Coordinates::at(0, 0)).unwrap();
        sparse.copy_from(&dense).unwrap();
        assert_eq!(sparse.entries(), vec![(Coordinates::at(2, 1), 1.5)]);

        let capped = SparseMatrix::<f64>::with_max_entries(&[3, 2], 0);
        assert!(capped.copy_from(&dense).unwrap_err().is_capacity());
    }

    #[test]
    fn test_density_and_from_entries() {
        let m = SparseMatrix::from_entries(
            &[2, 5],
            vec![(Coordinates::at(0, 1), 2i32), (Coordinates::at(1, 1), 0)],
        )
        .unwrap();
        assert_eq!(m.entry_count(), 1);
        assert!((m.density() - 0.1).abs() < 1e-12);
        assert!(SparseMatrix::from_entries(&[1, 1], vec![(Coordinates::at(1, 0), 1i32)]).is_err());
    }
}
