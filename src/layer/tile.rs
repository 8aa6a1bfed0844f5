//! Tile layers.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::grid::{MatrixExtent, TilePos};
use crate::id::TileId;
use crate::layer::{impl_layer_common, LayerCore};
use crate::matrix::TileMatrix;

/// A layer holding a grid of tile identifiers.
///
/// The matrix always matches the owning map's extent, except transiently
/// while a map-level resize is cascading through the tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileLayer {
    pub(crate) core: LayerCore,
    matrix: TileMatrix,
}

impl_layer_common!(TileLayer);

impl TileLayer {
    /// Create a tile layer with dense storage.
    pub fn new_dense(extent: MatrixExtent) -> Self {
        Self {
            core: LayerCore::new("Tile Layer"),
            matrix: TileMatrix::dense(extent),
        }
    }

    /// Create a tile layer with sparse storage.
    pub fn new_sparse(extent: MatrixExtent) -> Self {
        Self {
            core: LayerCore::new("Tile Layer"),
            matrix: TileMatrix::sparse(extent),
        }
    }

    /// The layer's grid dimensions.
    pub fn extent(&self) -> MatrixExtent {
        self.matrix.extent()
    }

    /// Get the tile at a position, or `None` if the position is invalid.
    pub fn tile_at(&self, pos: TilePos) -> Option<TileId> {
        self.matrix.get(pos)
    }

    /// Set the tile at a position, with a checked bounds error.
    pub fn set_tile(&mut self, pos: TilePos, tile: TileId) -> Result<()> {
        self.matrix.set(pos, tile)
    }

    /// Resize the layer's grid.
    pub fn resize(&mut self, extent: MatrixExtent) {
        self.matrix.resize(extent);
    }

    /// Append one empty row.
    pub fn add_row(&mut self) {
        let extent = self.matrix.extent();
        self.matrix.resize(MatrixExtent::new(extent.rows + 1, extent.cols));
    }

    /// Append one empty column.
    pub fn add_column(&mut self) {
        let extent = self.matrix.extent();
        self.matrix.resize(MatrixExtent::new(extent.rows, extent.cols + 1));
    }

    /// Discard the trailing row.
    ///
    /// The owning map guards against removing the last row.
    pub fn remove_row(&mut self) {
        let extent = self.matrix.extent();
        debug_assert!(extent.rows > 1);
        self.matrix.resize(MatrixExtent::new(extent.rows - 1, extent.cols));
    }

    /// Discard the trailing column.
    pub fn remove_column(&mut self) {
        let extent = self.matrix.extent();
        debug_assert!(extent.cols > 1);
        self.matrix.resize(MatrixExtent::new(extent.rows, extent.cols - 1));
    }

    /// Flood-fill the 4-connected region containing `origin` with
    /// `replacement`, replacing every cell that holds the same tile as
    /// `origin`.
    ///
    /// Returns the affected positions, so that callers can undo the fill.
    /// No-op if `origin` is outside the grid or already holds
    /// `replacement`.
    pub fn flood(&mut self, origin: TilePos, replacement: TileId) -> Vec<TilePos> {
        let mut affected = Vec::new();

        let Some(target) = self.tile_at(origin) else {
            return affected;
        };
        if target == replacement {
            return affected;
        }

        let mut queue = VecDeque::new();
        if self.set_tile(origin, replacement).is_ok() {
            affected.push(origin);
            queue.push_back(origin);
        }

        while let Some(pos) = queue.pop_front() {
            let neighbours = [
                pos.offset_by(-1, 0),
                pos.offset_by(1, 0),
                pos.offset_by(0, -1),
                pos.offset_by(0, 1),
            ];
            for next in neighbours {
                if self.tile_at(next) == Some(target) && self.set_tile(next, replacement).is_ok() {
                    affected.push(next);
                    queue.push_back(next);
                }
            }
        }

        affected
    }

    /// The underlying tile matrix.
    pub fn matrix(&self) -> &TileMatrix {
        &self.matrix
    }

    /// Mutable access to the underlying tile matrix.
    pub fn matrix_mut(&mut self) -> &mut TileMatrix {
        &mut self.matrix
    }

    /// Deep-clone with a fresh UUID and no persistent id.
    pub(crate) fn clone_with_new_ids(&self) -> Self {
        Self {
            core: self.core.renewed(),
            matrix: self.matrix.clone(),
        }
    }
}
