//! Tile snapshots for undoable grid edits.
//!
//! A [`TileCache`] captures the tiles of every tile layer in a rectangular
//! region so that a command can put them back later. Caches from several
//! edits can be merged; the earliest captured value for a cell wins, since
//! that is the state the whole edit sequence started from.

use std::collections::HashMap;

use uuid::Uuid;

use crate::grid::TilePos;
use crate::id::TileId;
use crate::map::Map;

/// Captured tiles, keyed by layer UUID and position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TileCache {
    layers: HashMap<Uuid, HashMap<TilePos, TileId>>,
}

impl TileCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Capture the non-empty tiles of every tile layer in the half-open
    /// region `[begin, end)`.
    ///
    /// Cells already captured for a layer keep their first value.
    pub fn save_tiles(&mut self, map: &Map, begin: TilePos, end: TilePos) {
        for layer in map.iter_layers() {
            let Some(tile_layer) = layer.as_tile_layer() else {
                continue;
            };

            let tiles = self.layers.entry(tile_layer.uuid()).or_default();
            tile_layer.matrix().each_in_region(begin, end, |pos, tile| {
                if !tile.is_empty() {
                    tiles.entry(pos).or_insert(tile);
                }
            });
        }
    }

    /// Write the captured tiles back into the map.
    ///
    /// Layers that no longer exist and positions outside the current
    /// extent are skipped.
    pub fn restore_tiles(&self, map: &mut Map) {
        for (layer_uuid, tiles) in &self.layers {
            let Some(layer) = map.find_tile_layer_mut(*layer_uuid) else {
                continue;
            };
            for (&pos, &tile) in tiles {
                let _ = layer.set_tile(pos, tile);
            }
        }
    }

    /// Fold another cache into this one.
    ///
    /// On collision, the tile already in this cache wins.
    pub fn merge_with(&mut self, other: &TileCache) {
        for (layer_uuid, tiles) in &other.layers {
            let merged = self.layers.entry(*layer_uuid).or_default();
            for (&pos, &tile) in tiles {
                merged.entry(pos).or_insert(tile);
            }
        }
    }

    /// The captured tiles for one layer, if any.
    pub fn layer_tiles(&self, layer_uuid: Uuid) -> Option<&HashMap<TilePos, TileId>> {
        self.layers.get(&layer_uuid)
    }

    /// Whether nothing has been captured.
    pub fn is_empty(&self) -> bool {
        self.layers.values().all(HashMap::is_empty)
    }

    /// Drop everything captured so far.
    pub fn clear(&mut self) {
        self.layers.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::MatrixExtent;

    fn corner(map: &Map) -> TilePos {
        TilePos::from_usize(map.row_count(), map.column_count())
    }

    #[test]
    fn test_save_and_restore_after_row_removal() {
        let mut map = Map::new();
        let tile = map.add_tile_layer(None).unwrap();

        let layer = map.find_tile_layer_mut(tile).unwrap();
        layer.set_tile(TilePos::new(4, 2), TileId(9)).unwrap();
        layer.set_tile(TilePos::new(0, 0), TileId(3)).unwrap();

        let mut cache = TileCache::new();
        cache.save_tiles(&map, TilePos::new(0, 0), corner(&map));

        map.remove_row().unwrap();
        assert_eq!(
            map.find_tile_layer(tile).unwrap().tile_at(TilePos::new(4, 2)),
            None
        );

        map.add_row();
        cache.restore_tiles(&mut map);

        let layer = map.find_tile_layer(tile).unwrap();
        assert_eq!(layer.tile_at(TilePos::new(4, 2)), Some(TileId(9)));
        assert_eq!(layer.tile_at(TilePos::new(0, 0)), Some(TileId(3)));
    }

    #[test]
    fn test_save_is_limited_to_region() {
        let mut map = Map::new();
        let tile = map.add_tile_layer(None).unwrap();

        let layer = map.find_tile_layer_mut(tile).unwrap();
        layer.set_tile(TilePos::new(0, 0), TileId(1)).unwrap();
        layer.set_tile(TilePos::new(3, 3), TileId(2)).unwrap();

        let mut cache = TileCache::new();
        cache.save_tiles(&map, TilePos::new(0, 0), TilePos::new(2, 2));

        let tiles = cache.layer_tiles(tile).unwrap();
        assert_eq!(tiles.get(&TilePos::new(0, 0)), Some(&TileId(1)));
        assert_eq!(tiles.get(&TilePos::new(3, 3)), None);
    }

    #[test]
    fn test_restore_skips_out_of_extent_positions() {
        let mut map = Map::new();
        let tile = map.add_tile_layer(None).unwrap();

        map.find_tile_layer_mut(tile)
            .unwrap()
            .set_tile(TilePos::new(4, 4), TileId(7))
            .unwrap();

        let mut cache = TileCache::new();
        cache.save_tiles(&map, TilePos::new(0, 0), corner(&map));

        map.resize(MatrixExtent::new(2, 2)).unwrap();
        cache.restore_tiles(&mut map);

        assert_eq!(
            map.find_tile_layer(tile).unwrap().tile_at(TilePos::new(4, 4)),
            None
        );
        assert_eq!(map.find_tile_layer(tile).unwrap().extent(), MatrixExtent::new(2, 2));
    }

    #[test]
    fn test_merge_keeps_earliest_value() {
        let mut map = Map::new();
        let tile = map.add_tile_layer(None).unwrap();
        let pos = TilePos::new(1, 1);

        map.find_tile_layer_mut(tile).unwrap().set_tile(pos, TileId(1)).unwrap();
        let mut first = TileCache::new();
        first.save_tiles(&map, TilePos::new(0, 0), corner(&map));

        map.find_tile_layer_mut(tile).unwrap().set_tile(pos, TileId(2)).unwrap();
        let mut second = TileCache::new();
        second.save_tiles(&map, TilePos::new(0, 0), corner(&map));

        first.merge_with(&second);
        assert_eq!(first.layer_tiles(tile).unwrap()[&pos], TileId(1));

        first.restore_tiles(&mut map);
        assert_eq!(map.find_tile_layer(tile).unwrap().tile_at(pos), Some(TileId(1)));
    }

    #[test]
    fn test_clear() {
        let mut map = Map::new();
        let tile = map.add_tile_layer(None).unwrap();
        map.find_tile_layer_mut(tile)
            .unwrap()
            .set_tile(TilePos::new(0, 0), TileId(1))
            .unwrap();

        let mut cache = TileCache::new();
        assert!(cache.is_empty());

        cache.save_tiles(&map, TilePos::new(0, 0), corner(&map));
        assert!(!cache.is_empty());

        cache.clear();
        assert!(cache.is_empty());
    }
}
