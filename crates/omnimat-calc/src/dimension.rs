//! Grouping of cells along a [`Dimension`].
//!
//! `All` puts every cell of a matrix of any rank into one group. `Row` and
//! `Column` need a 2D matrix and produce one group per row or column.
//! Aggregates over the groups have the shape `[1, 1]`, `[rows, 1]` or
//! `[1, columns]` respectively, and group `g` lands at the matching cell of
//! that shape.

use crate::options::Dimension;
use omnimat_core::{AllCoordinates, Coordinates, MatrixError, MatrixResult};

/// Cell groups of one source size along one dimension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DimensionGroups {
    dimension: Dimension,
    size: Vec<usize>,
}

impl DimensionGroups {
    /// # Errors
    ///
    /// `Unsupported` when `Row` or `Column` is requested for a non-2D size.
    pub fn new(operation: &str, dimension: Dimension, size: &[usize]) -> MatrixResult<Self> {
        if dimension != Dimension::All && size.len() != 2 {
            return Err(MatrixError::unsupported(
                operation,
                format!("{} grouping requires a 2D matrix, got {}D", dimension, size.len()),
            ));
        }
        Ok(Self {
            dimension,
            size: size.to_vec(),
        })
    }

    pub fn dimension(&self) -> Dimension {
        self.dimension
    }

    pub fn group_count(&self) -> usize {
        match self.dimension {
            Dimension::All => 1,
            Dimension::Row => self.size[0],
            Dimension::Column => self.size[1],
        }
    }

    /// Group of a source cell, or of a cell of the aggregate shape.
    pub fn group_of(&self, coordinates: &Coordinates) -> usize {
        match self.dimension {
            Dimension::All => 0,
            Dimension::Row => coordinates.row(),
            Dimension::Column => coordinates.column(),
        }
    }

    /// Source cells of group `group`, in column-major order.
    pub fn members(&self, group: usize) -> Box<dyn Iterator<Item = Coordinates> + Send> {
        match self.dimension {
            Dimension::All => Box::new(AllCoordinates::new(&self.size)),
            Dimension::Row => Box::new((0..self.size[1]).map(move |column| Coordinates::at(group, column))),
            Dimension::Column => Box::new((0..self.size[0]).map(move |row| Coordinates::at(row, group))),
        }
    }

    /// Shape holding one cell per group.
    pub fn aggregate_size(&self) -> Vec<usize> {
        match self.dimension {
            Dimension::All => vec![1, 1],
            Dimension::Row => vec![self.size[0], 1],
            Dimension::Column => vec![1, self.size[1]],
        }
    }
}
