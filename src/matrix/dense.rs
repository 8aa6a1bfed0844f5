//! Dense tile matrix backend.
//!
//! Stores an explicit row-major grid; every cell, including empty ones,
//! consumes storage. This is the default backend for ordinary layers where
//! most cells end up populated.

use std::ops::{Index, IndexMut};

use serde::{Deserialize, Serialize};

use crate::error::{MapError, Result};
use crate::grid::{MatrixExtent, TilePos};
use crate::id::TileId;

/// A resizable 2D grid of tile identifiers with per-cell storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DenseTileMatrix {
    extent: MatrixExtent,
    tiles: Vec<Vec<TileId>>,
}

impl DenseTileMatrix {
    /// Create a matrix with every cell set to the empty sentinel.
    pub fn new(extent: MatrixExtent) -> Self {
        Self {
            extent,
            tiles: vec![vec![TileId::EMPTY; extent.cols]; extent.rows],
        }
    }

    /// Create a matrix from existing row data.
    ///
    /// Every row must have the same length.
    pub fn from_rows(tiles: Vec<Vec<TileId>>) -> Self {
        let rows = tiles.len();
        let cols = tiles.first().map_or(0, |row| row.len());
        debug_assert!(tiles.iter().all(|row| row.len() == cols));

        Self {
            extent: MatrixExtent::new(rows, cols),
            tiles,
        }
    }

    /// The current row/column dimensions.
    pub fn extent(&self) -> MatrixExtent {
        self.extent
    }

    /// Check whether a position falls inside the matrix.
    pub fn is_valid(&self, pos: TilePos) -> bool {
        self.extent.contains(pos)
    }

    /// Get the tile at a position, or `None` if the position is invalid.
    pub fn get(&self, pos: TilePos) -> Option<TileId> {
        let (row, col) = pos.as_usize()?;
        self.tiles.get(row)?.get(col).copied()
    }

    /// Get the tile at a position, with a checked bounds error.
    pub fn at(&self, pos: TilePos) -> Result<TileId> {
        self.get(pos).ok_or(MapError::PosOutOfBounds {
            pos,
            extent: self.extent,
        })
    }

    /// Set the tile at a position, with a checked bounds error.
    pub fn set(&mut self, pos: TilePos, tile: TileId) -> Result<()> {
        let (row, col) = pos.as_usize().ok_or(MapError::PosOutOfBounds {
            pos,
            extent: self.extent,
        })?;

        match self.tiles.get_mut(row).and_then(|r| r.get_mut(col)) {
            Some(cell) => {
                *cell = tile;
                Ok(())
            }
            None => Err(MapError::PosOutOfBounds {
                pos,
                extent: self.extent,
            }),
        }
    }

    /// Resize the matrix, adjusting columns and rows independently.
    ///
    /// New cells are filled with the empty sentinel; shrinking discards
    /// trailing rows/columns.
    pub fn resize(&mut self, extent: MatrixExtent) {
        for row in &mut self.tiles {
            row.resize(extent.cols, TileId::EMPTY);
        }
        self.tiles.resize(extent.rows, vec![TileId::EMPTY; extent.cols]);
        self.extent = extent;
    }

    /// Iterate over every cell, row-major.
    pub fn iter(&self) -> impl Iterator<Item = (TilePos, TileId)> + '_ {
        self.tiles.iter().enumerate().flat_map(|(row, tiles)| {
            tiles
                .iter()
                .enumerate()
                .map(move |(col, &tile)| (TilePos::from_usize(row, col), tile))
        })
    }

    /// A row-major snapshot of the stored tiles.
    pub fn rows(&self) -> &[Vec<TileId>] {
        &self.tiles
    }
}

impl Index<TilePos> for DenseTileMatrix {
    type Output = TileId;

    /// Unchecked fast path; the caller must have validated `pos` with
    /// [`is_valid`](DenseTileMatrix::is_valid).
    fn index(&self, pos: TilePos) -> &TileId {
        &self.tiles[pos.row as usize][pos.col as usize]
    }
}

impl IndexMut<TilePos> for DenseTileMatrix {
    fn index_mut(&mut self, pos: TilePos) -> &mut TileId {
        &mut self.tiles[pos.row as usize][pos.col as usize]
    }
}
