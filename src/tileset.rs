//! Attached tilesets and global tile id allocation.
//!
//! A map does not own tileset pixel data; it tracks [`TilesetRef`] entries
//! that reserve contiguous ranges in the global tile id space. The
//! [`TilesetBundle`] hands out those ranges so that every attached tileset
//! covers a disjoint `[first_tile, last_tile]` interval and the empty
//! sentinel (id zero) is never claimed.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{MapError, Result};
use crate::id::TileId;
use crate::meta::Metadata;

/// A tileset attached to a map, described by its global tile id range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TilesetRef {
    meta: Metadata,
    first_tile: TileId,
    tile_count: i32,
    embedded: bool,
}

impl TilesetRef {
    /// Describe a tileset with the given number of tiles.
    ///
    /// The first tile id is assigned when the tileset is attached.
    pub fn new(name: impl Into<String>, tile_count: i32) -> Self {
        debug_assert!(tile_count > 0);
        Self {
            meta: Metadata::new(name),
            first_tile: TileId::EMPTY,
            tile_count,
            embedded: false,
        }
    }

    /// The tileset's metadata.
    pub fn meta(&self) -> &Metadata {
        &self.meta
    }

    /// Mutable access to the tileset's metadata.
    pub fn meta_mut(&mut self) -> &mut Metadata {
        &mut self.meta
    }

    /// The tileset's UUID.
    pub fn uuid(&self) -> Uuid {
        self.meta.uuid()
    }

    /// The first global tile id claimed by this tileset.
    pub fn first_tile(&self) -> TileId {
        self.first_tile
    }

    /// The last global tile id claimed by this tileset.
    pub fn last_tile(&self) -> TileId {
        TileId(self.first_tile.0 + self.tile_count - 1)
    }

    /// Number of tiles in this tileset.
    pub fn tile_count(&self) -> i32 {
        self.tile_count
    }

    /// Whether a global tile id falls inside this tileset's range.
    pub fn contains(&self, tile: TileId) -> bool {
        tile >= self.first_tile && tile <= self.last_tile()
    }

    /// Whether the tileset is stored inside the map document rather than
    /// in an external file.
    pub fn embedded(&self) -> bool {
        self.embedded
    }

    /// Mark the tileset as embedded or external.
    pub fn set_embedded(&mut self, embedded: bool) {
        self.embedded = embedded;
    }
}

/// The collection of tilesets attached to a map.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TilesetBundle {
    tilesets: Vec<TilesetRef>,
    active_tileset: Option<Uuid>,
    next_first_tile: Option<TileId>,
}

impl TilesetBundle {
    /// Create an empty bundle.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a tileset, assigning it the next free tile id range.
    ///
    /// Returns the tileset's UUID.
    pub fn attach_tileset(&mut self, tileset: TilesetRef) -> Uuid {
        let first_tile = self.next_first_tile.unwrap_or(TileId(1));
        self.attach_tileset_at(tileset, first_tile)
    }

    /// Attach a tileset at an explicit first tile id.
    ///
    /// Used when restoring a map whose ranges were assigned earlier.
    pub fn attach_tileset_at(&mut self, mut tileset: TilesetRef, first_tile: TileId) -> Uuid {
        debug_assert!(first_tile > TileId::EMPTY);
        tileset.first_tile = first_tile;

        let next = TileId(tileset.last_tile().0 + 1);
        match self.next_first_tile {
            Some(current) if current >= next => {}
            _ => self.next_first_tile = Some(next),
        }

        let uuid = tileset.uuid();
        debug_assert!(self.get(uuid).is_none());
        self.tilesets.push(tileset);
        uuid
    }

    /// Detach a tileset by UUID, handing it back.
    ///
    /// Its tile id range is retired, never reused. Clears the active
    /// tileset if it was the one detached.
    pub fn detach_tileset(&mut self, uuid: Uuid) -> Result<TilesetRef> {
        let index = self
            .tilesets
            .iter()
            .position(|tileset| tileset.uuid() == uuid)
            .ok_or(MapError::TilesetNotFound(uuid))?;

        if self.active_tileset == Some(uuid) {
            self.active_tileset = None;
        }
        Ok(self.tilesets.remove(index))
    }

    /// Mark a tileset as active, or clear the selection with `None`.
    pub fn select_tileset(&mut self, uuid: Option<Uuid>) -> Result<()> {
        if let Some(uuid) = uuid {
            if self.get(uuid).is_none() {
                return Err(MapError::TilesetNotFound(uuid));
            }
        }
        self.active_tileset = uuid;
        Ok(())
    }

    /// The UUID of the active tileset, if any.
    pub fn active_tileset_id(&self) -> Option<Uuid> {
        self.active_tileset
    }

    /// Find an attached tileset by UUID.
    pub fn get(&self, uuid: Uuid) -> Option<&TilesetRef> {
        self.tilesets.iter().find(|tileset| tileset.uuid() == uuid)
    }

    /// Find a mutable attached tileset by UUID.
    pub fn get_mut(&mut self, uuid: Uuid) -> Option<&mut TilesetRef> {
        self.tilesets.iter_mut().find(|tileset| tileset.uuid() == uuid)
    }

    /// Find the tileset whose range contains a global tile id.
    pub fn get_by_tile(&self, tile: TileId) -> Option<&TilesetRef> {
        if tile.is_empty() {
            return None;
        }
        self.tilesets.iter().find(|tileset| tileset.contains(tile))
    }

    /// Whether a tile id is the empty sentinel or claimed by an attached
    /// tileset.
    pub fn is_valid_tile(&self, tile: TileId) -> bool {
        tile.is_empty() || self.get_by_tile(tile).is_some()
    }

    /// Number of attached tilesets.
    pub fn len(&self) -> usize {
        self.tilesets.len()
    }

    /// Whether no tilesets are attached.
    pub fn is_empty(&self) -> bool {
        self.tilesets.is_empty()
    }

    /// Iterate over the attached tilesets in attachment order.
    pub fn iter(&self) -> impl Iterator<Item = &TilesetRef> {
        self.tilesets.iter()
    }
}
