//! Tile matrix storage.
//!
//! Two interchangeable backends store the `position -> tile id` grid of a
//! tile layer: [`DenseTileMatrix`] keeps a full row-major array,
//! [`SparseTileMatrix`] keeps only non-empty cells. The backend is picked
//! when the matrix is constructed and never switches on its own; both obey
//! the same query/resize contract and compare equal when they describe the
//! same logical grid.

mod dense;
mod sparse;

use std::ops::{Index, IndexMut};

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::grid::{MatrixExtent, TilePos};
use crate::id::TileId;

pub use dense::DenseTileMatrix;
pub use sparse::SparseTileMatrix;

/// A tile matrix with an explicit, construction-time backend choice.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TileMatrix {
    Dense(DenseTileMatrix),
    Sparse(SparseTileMatrix),
}

impl TileMatrix {
    /// Create an empty matrix with dense storage.
    pub fn dense(extent: MatrixExtent) -> Self {
        Self::Dense(DenseTileMatrix::new(extent))
    }

    /// Create an empty matrix with sparse storage.
    pub fn sparse(extent: MatrixExtent) -> Self {
        Self::Sparse(SparseTileMatrix::new(extent))
    }

    /// Whether this matrix uses the dense backend.
    pub fn is_dense(&self) -> bool {
        matches!(self, Self::Dense(_))
    }

    /// Whether this matrix uses the sparse backend.
    pub fn is_sparse(&self) -> bool {
        matches!(self, Self::Sparse(_))
    }

    /// The current row/column dimensions.
    pub fn extent(&self) -> MatrixExtent {
        match self {
            Self::Dense(matrix) => matrix.extent(),
            Self::Sparse(matrix) => matrix.extent(),
        }
    }

    /// Check whether a position falls inside the matrix.
    pub fn is_valid(&self, pos: TilePos) -> bool {
        self.extent().contains(pos)
    }

    /// Get the tile at a position, or `None` if the position is invalid.
    pub fn get(&self, pos: TilePos) -> Option<TileId> {
        match self {
            Self::Dense(matrix) => matrix.get(pos),
            Self::Sparse(matrix) => matrix.get(pos),
        }
    }

    /// Get the tile at a position, with a checked bounds error.
    pub fn at(&self, pos: TilePos) -> Result<TileId> {
        match self {
            Self::Dense(matrix) => matrix.at(pos),
            Self::Sparse(matrix) => matrix.at(pos),
        }
    }

    /// Set the tile at a position, with a checked bounds error.
    pub fn set(&mut self, pos: TilePos, tile: TileId) -> Result<()> {
        match self {
            Self::Dense(matrix) => matrix.set(pos, tile),
            Self::Sparse(matrix) => matrix.set(pos, tile),
        }
    }

    /// Resize the matrix, filling new cells with the empty sentinel and
    /// discarding cells outside the new extent.
    pub fn resize(&mut self, extent: MatrixExtent) {
        match self {
            Self::Dense(matrix) => matrix.resize(extent),
            Self::Sparse(matrix) => matrix.resize(extent),
        }
    }

    /// Convert to the dense backend, preserving contents.
    ///
    /// No-op if already dense.
    pub fn to_dense(&mut self) {
        if let Self::Sparse(sparse) = self {
            let mut dense = DenseTileMatrix::new(sparse.extent());
            for (pos, tile) in sparse.iter_stored() {
                dense[pos] = tile;
            }
            *self = Self::Dense(dense);
        }
    }

    /// Convert to the sparse backend, preserving contents.
    ///
    /// No-op if already sparse.
    pub fn to_sparse(&mut self) {
        if let Self::Dense(dense) = self {
            let mut sparse = SparseTileMatrix::new(dense.extent());
            for (pos, tile) in dense.iter() {
                if !tile.is_empty() {
                    sparse[pos] = tile;
                }
            }
            *self = Self::Sparse(sparse);
        }
    }

    /// A row-major snapshot of the logical grid, regardless of backend.
    ///
    /// Intended for serializer collaborators that emit dense tile runs.
    pub fn as_tile_rows(&self) -> Vec<Vec<TileId>> {
        let extent = self.extent();
        (0..extent.rows)
            .map(|row| {
                (0..extent.cols)
                    .map(|col| self[TilePos::from_usize(row, col)])
                    .collect()
            })
            .collect()
    }

    /// Visit every cell in a half-open rectangular region, row-major.
    ///
    /// Positions outside the matrix are skipped.
    pub fn each_in_region(&self, begin: TilePos, end: TilePos, mut f: impl FnMut(TilePos, TileId)) {
        for row in begin.row..end.row {
            for col in begin.col..end.col {
                let pos = TilePos::new(row, col);
                if let Some(tile) = self.get(pos) {
                    f(pos, tile);
                }
            }
        }
    }
}

impl PartialEq for TileMatrix {
    /// Matrices are equal iff they have the same extent and the same tile
    /// at every valid coordinate; the backend does not matter.
    fn eq(&self, other: &Self) -> bool {
        self.extent() == other.extent()
            && self.extent().iter_positions().all(|pos| self.get(pos) == other.get(pos))
    }
}

impl Eq for TileMatrix {}

impl Index<TilePos> for TileMatrix {
    type Output = TileId;

    /// Unchecked fast path; the caller must have validated `pos` with
    /// [`is_valid`](TileMatrix::is_valid).
    fn index(&self, pos: TilePos) -> &TileId {
        match self {
            Self::Dense(matrix) => &matrix[pos],
            Self::Sparse(matrix) => &matrix[pos],
        }
    }
}

impl IndexMut<TilePos> for TileMatrix {
    fn index_mut(&mut self, pos: TilePos) -> &mut TileId {
        match self {
            Self::Dense(matrix) => &mut matrix[pos],
            Self::Sparse(matrix) => &mut matrix[pos],
        }
    }
}
