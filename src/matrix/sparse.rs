//! Sparse tile matrix backend.
//!
//! Stores only non-empty cells in a position-keyed map. Reading an absent
//! position yields the empty sentinel without inserting anything, and
//! shrinking purges every stored entry outside the new extent so that a
//! later re-grow cannot resurrect discarded tiles.

use std::collections::HashMap;
use std::ops::{Index, IndexMut};

use serde::{Deserialize, Serialize};

use crate::error::{MapError, Result};
use crate::grid::{MatrixExtent, TilePos};
use crate::id::TileId;

/// A resizable 2D grid of tile identifiers storing only non-empty cells.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SparseTileMatrix {
    extent: MatrixExtent,
    #[serde(with = "tile_entries")]
    tiles: HashMap<TilePos, TileId>,
}

impl SparseTileMatrix {
    /// Create a matrix with every cell set to the empty sentinel.
    pub fn new(extent: MatrixExtent) -> Self {
        Self {
            extent,
            tiles: HashMap::new(),
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
    ///
    /// Valid positions without a stored entry read as the empty sentinel.
    pub fn get(&self, pos: TilePos) -> Option<TileId> {
        if self.extent.contains(pos) {
            Some(self.tiles.get(&pos).copied().unwrap_or(TileId::EMPTY))
        } else {
            None
        }
    }

    /// Get the tile at a position, with a checked bounds error.
    pub fn at(&self, pos: TilePos) -> Result<TileId> {
        self.get(pos).ok_or(MapError::PosOutOfBounds {
            pos,
            extent: self.extent,
        })
    }

    /// Set the tile at a position, with a checked bounds error.
    ///
    /// Writing the empty sentinel erases the stored entry.
    pub fn set(&mut self, pos: TilePos, tile: TileId) -> Result<()> {
        if !self.extent.contains(pos) {
            return Err(MapError::PosOutOfBounds {
                pos,
                extent: self.extent,
            });
        }

        if tile.is_empty() {
            self.tiles.remove(&pos);
        } else {
            self.tiles.insert(pos, tile);
        }
        Ok(())
    }

    /// Resize the matrix.
    ///
    /// Existing entries are left untouched except that entries outside the
    /// new extent are purged.
    pub fn resize(&mut self, extent: MatrixExtent) {
        self.extent = extent;
        self.tiles.retain(|pos, _| extent.contains(*pos));
    }

    /// Iterate over the stored (non-empty) cells in arbitrary order.
    pub fn iter_stored(&self) -> impl Iterator<Item = (TilePos, TileId)> + '_ {
        self.tiles.iter().map(|(&pos, &tile)| (pos, tile))
    }

    /// Number of stored (non-empty) cells.
    pub fn stored_count(&self) -> usize {
        self.tiles.len()
    }
}

impl PartialEq for SparseTileMatrix {
    /// Equality is defined over the logical grid, not the internal map:
    /// stored empty-sentinel entries (possible via `index_mut`) compare
    /// equal to absent ones.
    fn eq(&self, other: &Self) -> bool {
        self.extent == other.extent
            && self.extent.iter_positions().all(|pos| self.get(pos) == other.get(pos))
    }
}

impl Eq for SparseTileMatrix {}

impl Index<TilePos> for SparseTileMatrix {
    type Output = TileId;

    /// Unchecked fast path; the caller must have validated `pos` with
    /// [`is_valid`](SparseTileMatrix::is_valid).
    fn index(&self, pos: TilePos) -> &TileId {
        debug_assert!(self.extent.contains(pos));
        self.tiles.get(&pos).unwrap_or(&TileId::EMPTY)
    }
}

impl IndexMut<TilePos> for SparseTileMatrix {
    /// Unchecked fast path; inserts an entry on first access to a cell.
    fn index_mut(&mut self, pos: TilePos) -> &mut TileId {
        debug_assert!(self.extent.contains(pos));
        self.tiles.entry(pos).or_insert(TileId::EMPTY)
    }
}

mod tile_entries {
    //! Serializes the position-keyed map as a list of entries, since
    //! formats like JSON only support string keys.

    use super::*;
    use serde::{Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        tiles: &HashMap<TilePos, TileId>,
        serializer: S,
    ) -> std::result::Result<S::Ok, S::Error> {
        let mut entries: Vec<(TilePos, TileId)> =
            tiles.iter().map(|(&pos, &tile)| (pos, tile)).collect();
        entries.sort();
        serde::Serialize::serialize(&entries, serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> std::result::Result<HashMap<TilePos, TileId>, D::Error> {
        let entries: Vec<(TilePos, TileId)> = serde::Deserialize::deserialize(deserializer)?;
        Ok(entries.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_cells_read_empty() {
        let matrix = SparseTileMatrix::new(MatrixExtent::new(3, 3));

        assert_eq!(matrix.get(TilePos::new(1, 1)), Some(TileId::EMPTY));
        assert_eq!(matrix.stored_count(), 0);
    }

    #[test]
    fn test_set_and_get() {
        let mut matrix = SparseTileMatrix::new(MatrixExtent::new(3, 3));
        let pos = TilePos::new(2, 0);

        matrix.set(pos, TileId(11)).unwrap();
        assert_eq!(matrix.get(pos), Some(TileId(11)));
        assert_eq!(matrix[pos], TileId(11));
        assert_eq!(matrix.stored_count(), 1);
    }

    #[test]
    fn test_writing_empty_erases() {
        let mut matrix = SparseTileMatrix::new(MatrixExtent::new(3, 3));
        let pos = TilePos::new(0, 0);

        matrix.set(pos, TileId(4)).unwrap();
        matrix.set(pos, TileId::EMPTY).unwrap();

        assert_eq!(matrix.get(pos), Some(TileId::EMPTY));
        assert_eq!(matrix.stored_count(), 0);
    }

    #[test]
    fn test_out_of_bounds() {
        let mut matrix = SparseTileMatrix::new(MatrixExtent::new(2, 2));

        assert!(matrix.at(TilePos::new(-1, 0)).is_err());
        assert!(matrix.set(TilePos::new(0, 2), TileId(1)).is_err());
        assert_eq!(matrix.get(TilePos::new(2, 2)), None);
    }

    #[test]
    fn test_shrink_purges_outside_entries() {
        let mut matrix = SparseTileMatrix::new(MatrixExtent::new(4, 4));
        matrix.set(TilePos::new(0, 0), TileId(1)).unwrap();
        matrix.set(TilePos::new(3, 3), TileId(2)).unwrap();

        matrix.resize(MatrixExtent::new(2, 2));
        assert_eq!(matrix.stored_count(), 1);

        // Re-growing must not resurrect the purged tile.
        matrix.resize(MatrixExtent::new(4, 4));
        assert_eq!(matrix.get(TilePos::new(3, 3)), Some(TileId::EMPTY));
        assert_eq!(matrix.get(TilePos::new(0, 0)), Some(TileId(1)));
    }

    #[test]
    fn test_grow_keeps_entries_in_place() {
        let mut matrix = SparseTileMatrix::new(MatrixExtent::new(2, 2));
        matrix.set(TilePos::new(1, 1), TileId(8)).unwrap();

        matrix.resize(MatrixExtent::new(6, 3));
        assert_eq!(matrix.get(TilePos::new(1, 1)), Some(TileId(8)));
    }

    #[test]
    fn test_logical_equality_ignores_stored_empties() {
        let mut a = SparseTileMatrix::new(MatrixExtent::new(2, 2));
        let b = SparseTileMatrix::new(MatrixExtent::new(2, 2));

        // Force a stored empty-sentinel entry through the unchecked path.
        let pos = TilePos::new(0, 0);
        a[pos] = TileId::EMPTY;

        assert_eq!(a.stored_count(), 1);
        assert_eq!(a, b);
    }

    #[test]
    fn test_serde_roundtrip() {
        let mut matrix = SparseTileMatrix::new(MatrixExtent::new(3, 3));
        matrix.set(TilePos::new(0, 2), TileId(5)).unwrap();
        matrix.set(TilePos::new(2, 1), TileId(6)).unwrap();

        let json = serde_json::to_string(&matrix).unwrap();
        let back: SparseTileMatrix = serde_json::from_str(&json).unwrap();
        assert_eq!(back, matrix);
    }
}
