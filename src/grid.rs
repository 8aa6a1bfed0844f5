//! Grid coordinate and extent types.
//!
//! Positions are signed so that tools and commands can represent coordinates
//! slightly outside the current grid (e.g. while dragging near an edge);
//! bounds checks treat any negative component as invalid.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A row/column position in a tile grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TilePos {
    pub row: i32,
    pub col: i32,
}

impl TilePos {
    /// Create a position from signed row/column coordinates.
    pub fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// Create a position from unsigned coordinates.
    ///
    /// Values beyond `i32::MAX` are saturated.
    pub fn from_usize(row: usize, col: usize) -> Self {
        Self {
            row: i32::try_from(row).unwrap_or(i32::MAX),
            col: i32::try_from(col).unwrap_or(i32::MAX),
        }
    }

    /// Convert to unsigned coordinates, or `None` if either component is
    /// negative.
    pub fn as_usize(self) -> Option<(usize, usize)> {
        if self.row >= 0 && self.col >= 0 {
            Some((self.row as usize, self.col as usize))
        } else {
            None
        }
    }

    /// Return this position shifted by the given row/column deltas.
    pub fn offset_by(self, row_delta: i32, col_delta: i32) -> Self {
        Self {
            row: self.row + row_delta,
            col: self.col + col_delta,
        }
    }
}

impl fmt::Display for TilePos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// The row/column dimensions of a tile grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MatrixExtent {
    pub rows: usize,
    pub cols: usize,
}

impl MatrixExtent {
    /// Create an extent from row and column counts.
    pub fn new(rows: usize, cols: usize) -> Self {
        Self { rows, cols }
    }

    /// Check whether a position falls inside this extent.
    pub fn contains(&self, pos: TilePos) -> bool {
        pos.row >= 0
            && pos.col >= 0
            && (pos.row as usize) < self.rows
            && (pos.col as usize) < self.cols
    }

    /// Total number of cells.
    pub fn cell_count(&self) -> usize {
        self.rows * self.cols
    }

    /// Iterate over every position in the extent, row-major.
    pub fn iter_positions(&self) -> impl Iterator<Item = TilePos> + '_ {
        (0..self.rows)
            .flat_map(move |row| (0..self.cols).map(move |col| TilePos::from_usize(row, col)))
    }
}

impl fmt::Display for MatrixExtent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.rows, self.cols)
    }
}
