//! Cell coordinates and column-major flattening.
//!
//! [`Coordinates`] is an immutable ordered tuple of non-negative indices
//! identifying one cell of an N-dimensional matrix. Ordering is
//! lexicographic, so coordinates can key ordered maps.
//!
//! Flattening is column-major: the first index varies fastest. For a 2D
//! matrix the linear index is `column * rows + row`.
//!
//! # Examples
//!
//! ```
//! use omnimat_core::coordinates::{linear_index, AllCoordinates, Coordinates};
//!
//! let c = Coordinates::new(&[1, 2]);
//! assert!(c.is_within(&[3, 4]));
//! assert_eq!(linear_index(&c, &[3, 4]), 2 * 3 + 1);
//!
//! let all: Vec<_> = AllCoordinates::new(&[2, 2]).collect();
//! assert_eq!(all[1], Coordinates::new(&[1, 0]));
//! ```

use crate::error::{MatrixError, MatrixResult};
use smallvec::SmallVec;
use std::fmt;

/// Immutable N-dimensional cell position.
///
/// Backed by a `SmallVec` so coordinates of up to six dimensions never
/// allocate.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Coordinates(SmallVec<[usize; 6]>);

impl Coordinates {
    pub fn new(indices: &[usize]) -> Self {
        Coordinates(SmallVec::from_slice(indices))
    }

    /// Two-dimensional shorthand.
    pub fn at(row: usize, column: usize) -> Self {
        Coordinates::new(&[row, column])
    }

    /// All-zero coordinates with `dimensions` entries.
    pub fn origin(dimensions: usize) -> Self {
        Coordinates(SmallVec::from_elem(0, dimensions))
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }

    /// Number of dimensions.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, dimension: usize) -> Option<usize> {
        self.0.get(dimension).copied()
    }

    /// First index, or 0 for zero-dimensional coordinates.
    pub fn row(&self) -> usize {
        self.get(0).unwrap_or(0)
    }

    /// Second index, or 0 when absent.
    pub fn column(&self) -> usize {
        self.get(1).unwrap_or(0)
    }

    /// Copy with the first two indices swapped.
    pub fn transpose(&self) -> Self {
        let mut swapped = self.0.clone();
        if swapped.len() >= 2 {
            swapped.swap(0, 1);
        }
        Coordinates(swapped)
    }

    /// Copy with one index replaced.
    pub fn with(&self, dimension: usize, index: usize) -> Self {
        let mut changed = self.0.clone();
        changed[dimension] = index;
        Coordinates(changed)
    }

    /// Componentwise `0 <= c[i] < size[i]` with matching dimension count.
    pub fn is_within(&self, size: &[usize]) -> bool {
        self.0.len() == size.len() && self.0.iter().zip(size).all(|(&c, &s)| c < s)
    }

    /// Fail with [`MatrixError::OutOfBounds`] unless within `size`.
    pub fn check_bounds(&self, size: &[usize]) -> MatrixResult<()> {
        if self.is_within(size) {
            Ok(())
        } else {
            Err(MatrixError::out_of_bounds(self, size))
        }
    }
}

impl fmt::Debug for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Coordinates{}", self)
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        for (i, index) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", index)?;
        }
        f.write_str(")")
    }
}

impl From<&[usize]> for Coordinates {
    fn from(indices: &[usize]) -> Self {
        Coordinates::new(indices)
    }
}

impl<const N: usize> From<[usize; N]> for Coordinates {
    fn from(indices: [usize; N]) -> Self {
        Coordinates::new(&indices)
    }
}

impl From<Vec<usize>> for Coordinates {
    fn from(indices: Vec<usize>) -> Self {
        Coordinates(SmallVec::from_vec(indices))
    }
}

impl std::ops::Index<usize> for Coordinates {
    type Output = usize;
    fn index(&self, dimension: usize) -> &usize {
        &self.0[dimension]
    }
}

/// Column-major linear index of in-bounds coordinates.
pub fn linear_index(coordinates: &Coordinates, size: &[usize]) -> usize {
    let mut index = 0;
    let mut stride = 1;
    for (&c, &s) in coordinates.as_slice().iter().zip(size) {
        index += c * stride;
        stride *= s;
    }
    index
}

/// Inverse of [`linear_index`].
pub fn from_linear_index(mut index: usize, size: &[usize]) -> Coordinates {
    let mut indices: SmallVec<[usize; 6]> = SmallVec::with_capacity(size.len());
    for &s in size {
        if s == 0 {
            indices.push(0);
        } else {
            indices.push(index % s);
            index /= s;
        }
    }
    Coordinates(indices)
}

/// Number of cells addressed by a size vector.
pub fn element_count(size: &[usize]) -> usize {
    size.iter().product()
}

/// Lazy iterator over every in-bounds coordinate of a size, column-major.
///
/// Restart by constructing a new iterator; iteration is a simple counting
/// sequence and never allocates beyond the yielded coordinates.
#[derive(Debug, Clone)]
pub struct AllCoordinates {
    size: SmallVec<[usize; 6]>,
    next: Option<SmallVec<[usize; 6]>>,
    remaining: usize,
}

impl AllCoordinates {
    pub fn new(size: &[usize]) -> Self {
        let remaining = element_count(size);
        let next = if remaining == 0 {
            None
        } else {
            Some(SmallVec::from_elem(0, size.len()))
        };
        Self {
            size: SmallVec::from_slice(size),
            next,
            remaining,
        }
    }
}

impl Iterator for AllCoordinates {
    type Item = Coordinates;

    fn next(&mut self) -> Option<Coordinates> {
        let current = self.next.take()?;
        self.remaining -= 1;

        let mut advanced = current.clone();
        let mut carried = true;
        for (index, &extent) in advanced.iter_mut().zip(self.size.iter()) {
            *index += 1;
            if *index < extent {
                carried = false;
                break;
            }
            *index = 0;
        }
        if !carried {
            self.next = Some(advanced);
        }

        Some(Coordinates(current))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for AllCoordinates {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds() {
        let c = Coordinates::at(1, 3);
        assert!(c.is_within(&[2, 4]));
        assert!(!c.is_within(&[2, 3]));
        assert!(!c.is_within(&[2, 4, 1]));
        assert!(c.check_bounds(&[1, 4]).unwrap_err().is_out_of_bounds());
    }

    #[test]
    fn test_ordering_is_lexicographic() {
        let mut cs = vec![
            Coordinates::at(1, 0),
            Coordinates::at(0, 5),
            Coordinates::at(0, 1),
        ];
        cs.sort();
        assert_eq!(
            cs,
            vec![
                Coordinates::at(0, 1),
                Coordinates::at(0, 5),
                Coordinates::at(1, 0)
            ]
        );
    }

    #[test]
    fn test_column_major_2d() {
        let size = [3, 4];
        assert_eq!(linear_index(&Coordinates::at(2, 0), &size), 2);
        assert_eq!(linear_index(&Coordinates::at(0, 1), &size), 3);
        assert_eq!(linear_index(&Coordinates::at(2, 3), &size), 3 * 3 + 2);
        assert_eq!(from_linear_index(7, &size), Coordinates::at(1, 2));
    }

    #[test]
    fn test_all_coordinates_order() {
        let all: Vec<_> = AllCoordinates::new(&[2, 3]).collect();
        assert_eq!(all.len(), 6);
        for (i, c) in all.iter().enumerate() {
            assert_eq!(linear_index(c, &[2, 3]), i);
        }
        assert_eq!(all[5], Coordinates::at(1, 2));
    }

    #[test]
    fn test_all_coordinates_empty_and_3d() {
        assert_eq!(AllCoordinates::new(&[0, 3]).count(), 0);
        let it = AllCoordinates::new(&[2, 2, 2]);
        assert_eq!(it.len(), 8);
        assert!(it.clone().all(|c| c.is_within(&[2, 2, 2])));
    }

    #[test]
    fn test_transpose_and_display() {
        let c = Coordinates::new(&[4, 7, 1]);
        assert_eq!(c.transpose(), Coordinates::new(&[7, 4, 1]));
        assert_eq!(c.to_string(), "(4, 7, 1)");
        assert_eq!(c.with(2, 9), Coordinates::new(&[4, 7, 9]));
    }
}
