//! The map: layer tree, tilesets, and grid geometry under one roof.
//!
//! [`Map`] wraps an invisible root group layer and enforces the strict,
//! error-reporting contracts that the layer tree itself leaves to the
//! caller: addressing a missing layer is a [`MapError`] here, grid
//! mutations cascade to every tile layer, and persistent ids are assigned
//! from map-owned counters.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{MapError, Result};
use crate::grid::{MatrixExtent, TilePos};
use crate::id::{LayerId, ObjectId, TileId};
use crate::layer::{
    GroupLayer, Layer, LayerIter, LayerKind, LayerVisitor, LayerVisitorMut, Object, ObjectLayer,
    TileLayer,
};
use crate::meta::Metadata;
use crate::tileset::{TilesetBundle, TilesetRef};

/// The pixel size of a single tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileSize {
    pub width: i32,
    pub height: i32,
}

impl TileSize {
    pub fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }
}

impl Default for TileSize {
    fn default() -> Self {
        Self {
            width: 32,
            height: 32,
        }
    }
}

/// Tiles replaced by [`Map::fix_tiles`], keyed by layer UUID and position.
pub type FixTilesResult = HashMap<Uuid, HashMap<TilePos, TileId>>;

/// A tile map document: grid geometry, the layer tree, and attached
/// tilesets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Map {
    meta: Metadata,
    root: GroupLayer,
    extent: MatrixExtent,
    tile_size: TileSize,
    active_layer: Option<Uuid>,
    tilesets: TilesetBundle,
    next_layer_id: i32,
    next_object_id: i32,
}

impl Map {
    /// Create an empty 5x5 map with 32x32 pixel tiles.
    pub fn new() -> Self {
        Self {
            meta: Metadata::new("Map"),
            root: GroupLayer::new(),
            extent: MatrixExtent::new(5, 5),
            tile_size: TileSize::default(),
            active_layer: None,
            tilesets: TilesetBundle::new(),
            next_layer_id: 1,
            next_object_id: 1,
        }
    }

    /// Create an empty map with the given extent and tile size.
    pub fn with_extent(extent: MatrixExtent, tile_size: TileSize) -> Result<Self> {
        if extent.rows < 1 || extent.cols < 1 {
            return Err(MapError::InvalidExtent {
                rows: extent.rows,
                cols: extent.cols,
            });
        }

        let mut map = Self::new();
        map.extent = extent;
        map.tile_size = tile_size;
        Ok(map)
    }

    /// The map's metadata.
    pub fn meta(&self) -> &Metadata {
        &self.meta
    }

    /// Mutable access to the map's metadata.
    pub fn meta_mut(&mut self) -> &mut Metadata {
        &mut self.meta
    }

    /// The map's UUID.
    pub fn uuid(&self) -> Uuid {
        self.meta.uuid()
    }

    // -- grid geometry --------------------------------------------------

    /// The map's grid dimensions.
    pub fn extent(&self) -> MatrixExtent {
        self.extent
    }

    /// Number of tile rows.
    pub fn row_count(&self) -> usize {
        self.extent.rows
    }

    /// Number of tile columns.
    pub fn column_count(&self) -> usize {
        self.extent.cols
    }

    /// The pixel size of a single tile.
    pub fn tile_size(&self) -> TileSize {
        self.tile_size
    }

    /// Set the pixel size of a single tile.
    pub fn set_tile_size(&mut self, tile_size: TileSize) {
        self.tile_size = tile_size;
    }

    /// Check whether a position falls inside the map's grid.
    pub fn is_valid_position(&self, pos: TilePos) -> bool {
        self.extent.contains(pos)
    }

    /// Append one row to the map and every tile layer.
    pub fn add_row(&mut self) {
        struct AddRow;

        impl LayerVisitorMut for AddRow {
            fn visit_tile_layer(&mut self, layer: &mut TileLayer) {
                layer.add_row();
            }
        }

        self.extent.rows += 1;
        self.root.each_mut(&mut AddRow);
    }

    /// Append one column to the map and every tile layer.
    pub fn add_column(&mut self) {
        struct AddColumn;

        impl LayerVisitorMut for AddColumn {
            fn visit_tile_layer(&mut self, layer: &mut TileLayer) {
                layer.add_column();
            }
        }

        self.extent.cols += 1;
        self.root.each_mut(&mut AddColumn);
    }

    /// Discard the trailing row from the map and every tile layer.
    ///
    /// Fails if the map has only one row.
    pub fn remove_row(&mut self) -> Result<()> {
        struct RemoveRow;

        impl LayerVisitorMut for RemoveRow {
            fn visit_tile_layer(&mut self, layer: &mut TileLayer) {
                layer.remove_row();
            }
        }

        if self.extent.rows <= 1 {
            return Err(MapError::InvalidExtent {
                rows: self.extent.rows.saturating_sub(1),
                cols: self.extent.cols,
            });
        }

        self.extent.rows -= 1;
        self.root.each_mut(&mut RemoveRow);
        Ok(())
    }

    /// Discard the trailing column from the map and every tile layer.
    ///
    /// Fails if the map has only one column.
    pub fn remove_column(&mut self) -> Result<()> {
        struct RemoveColumn;

        impl LayerVisitorMut for RemoveColumn {
            fn visit_tile_layer(&mut self, layer: &mut TileLayer) {
                layer.remove_column();
            }
        }

        if self.extent.cols <= 1 {
            return Err(MapError::InvalidExtent {
                rows: self.extent.rows,
                cols: self.extent.cols.saturating_sub(1),
            });
        }

        self.extent.cols -= 1;
        self.root.each_mut(&mut RemoveColumn);
        Ok(())
    }

    /// Resize the map and every tile layer in one step.
    ///
    /// Fails if either dimension would become zero.
    pub fn resize(&mut self, extent: MatrixExtent) -> Result<()> {
        struct Resize {
            extent: MatrixExtent,
        }

        impl LayerVisitorMut for Resize {
            fn visit_tile_layer(&mut self, layer: &mut TileLayer) {
                layer.resize(self.extent);
            }
        }

        if extent.rows < 1 || extent.cols < 1 {
            return Err(MapError::InvalidExtent {
                rows: extent.rows,
                cols: extent.cols,
            });
        }

        self.extent = extent;
        self.root.each_mut(&mut Resize { extent });
        Ok(())
    }

    // -- layer management -----------------------------------------------

    /// Add a layer to the root or to a group layer, assigning persistent
    /// ids throughout the added subtree.
    ///
    /// Returns the UUID of the added layer.
    pub fn add_layer(&mut self, parent: Option<Uuid>, layer: impl Into<Layer>) -> Result<Uuid> {
        let mut layer = layer.into();
        let uuid = layer.uuid();

        self.assign_layer_ids(&mut layer);

        match parent {
            None => {
                self.root.append_layer(layer);
                Ok(uuid)
            }
            Some(parent_uuid) => match self.root.append_layer_to(parent_uuid, layer) {
                Ok(()) => Ok(uuid),
                Err(_) if self.root.find_layer(parent_uuid).is_some() => {
                    Err(MapError::WrongLayerType {
                        uuid: parent_uuid,
                        expected: LayerKind::Group.name(),
                    })
                }
                Err(_) => Err(MapError::LayerNotFound(parent_uuid)),
            },
        }
    }

    /// Add an empty tile layer with dense storage, sized to the map.
    pub fn add_tile_layer(&mut self, parent: Option<Uuid>) -> Result<Uuid> {
        self.add_layer(parent, TileLayer::new_dense(self.extent))
    }

    /// Add an empty tile layer with sparse storage, sized to the map.
    pub fn add_sparse_tile_layer(&mut self, parent: Option<Uuid>) -> Result<Uuid> {
        self.add_layer(parent, TileLayer::new_sparse(self.extent))
    }

    /// Add an empty object layer.
    pub fn add_object_layer(&mut self, parent: Option<Uuid>) -> Result<Uuid> {
        self.add_layer(parent, ObjectLayer::new())
    }

    /// Add an empty group layer.
    pub fn add_group_layer(&mut self, parent: Option<Uuid>) -> Result<Uuid> {
        self.add_layer(parent, GroupLayer::new())
    }

    /// Remove a layer (and its subtree) by UUID, handing it back.
    ///
    /// Clears the active layer if it was inside the removed subtree.
    pub fn remove_layer(&mut self, uuid: Uuid) -> Result<Layer> {
        let removed = self
            .root
            .remove_layer(uuid)
            .ok_or(MapError::LayerNotFound(uuid))?;

        if let Some(active) = self.active_layer {
            if subtree_contains(&removed, active) {
                self.active_layer = None;
            }
        }
        Ok(removed)
    }

    /// Duplicate a layer by UUID, returning the UUID of the clone.
    ///
    /// The clone sits right after the source among its siblings and gets
    /// fresh UUIDs and persistent ids throughout its subtree.
    pub fn duplicate_layer(&mut self, uuid: Uuid) -> Result<Uuid> {
        let clone_uuid = self
            .root
            .duplicate_layer(uuid)
            .ok_or(MapError::LayerNotFound(uuid))?
            .uuid();

        let mut next = self.next_layer_id;
        if let Some(clone) = self.root.find_layer_mut(clone_uuid) {
            let mut assign = AssignLayerIds { next: &mut next };
            clone.accept_mut(&mut assign);
        }
        self.next_layer_id = next;

        Ok(clone_uuid)
    }

    /// Move a layer one step toward the front of its sibling list.
    ///
    /// Returns whether the layer actually moved.
    pub fn move_layer_up(&mut self, uuid: Uuid) -> Result<bool> {
        if self.root.find_layer(uuid).is_none() {
            return Err(MapError::LayerNotFound(uuid));
        }
        Ok(self.root.move_layer_up(uuid))
    }

    /// Move a layer one step toward the back of its sibling list.
    ///
    /// Returns whether the layer actually moved.
    pub fn move_layer_down(&mut self, uuid: Uuid) -> Result<bool> {
        if self.root.find_layer(uuid).is_none() {
            return Err(MapError::LayerNotFound(uuid));
        }
        Ok(self.root.move_layer_down(uuid))
    }

    /// Whether [`move_layer_up`](Self::move_layer_up) would move the layer.
    pub fn can_move_layer_up(&self, uuid: Uuid) -> Result<bool> {
        if self.root.find_layer(uuid).is_none() {
            return Err(MapError::LayerNotFound(uuid));
        }
        Ok(self.root.can_move_layer_up(uuid))
    }

    /// Whether [`move_layer_down`](Self::move_layer_down) would move the
    /// layer.
    pub fn can_move_layer_down(&self, uuid: Uuid) -> Result<bool> {
        if self.root.find_layer(uuid).is_none() {
            return Err(MapError::LayerNotFound(uuid));
        }
        Ok(self.root.can_move_layer_down(uuid))
    }

    /// Mark a layer as active.
    pub fn select_layer(&mut self, uuid: Uuid) -> Result<()> {
        if self.root.find_layer(uuid).is_none() {
            return Err(MapError::LayerNotFound(uuid));
        }
        self.active_layer = Some(uuid);
        Ok(())
    }

    /// Clear the active layer selection.
    pub fn deselect_layer(&mut self) {
        self.active_layer = None;
    }

    /// The UUID of the active layer, if any.
    pub fn active_layer_id(&self) -> Option<Uuid> {
        self.active_layer
    }

    /// Whether the active layer exists and has the given kind.
    pub fn is_active_layer(&self, kind: LayerKind) -> bool {
        self.active_layer
            .and_then(|uuid| self.root.find_layer(uuid))
            .is_some_and(|layer| layer.kind() == kind)
    }

    // -- layer access ---------------------------------------------------

    /// Find a layer by UUID.
    pub fn find_layer(&self, uuid: Uuid) -> Option<&Layer> {
        self.root.find_layer(uuid)
    }

    /// Find a mutable layer by UUID.
    pub fn find_layer_mut(&mut self, uuid: Uuid) -> Option<&mut Layer> {
        self.root.find_layer_mut(uuid)
    }

    /// Find a tile layer by UUID.
    pub fn find_tile_layer(&self, uuid: Uuid) -> Option<&TileLayer> {
        self.root.find_tile_layer(uuid)
    }

    /// Find a mutable tile layer by UUID.
    pub fn find_tile_layer_mut(&mut self, uuid: Uuid) -> Option<&mut TileLayer> {
        self.root.find_tile_layer_mut(uuid)
    }

    /// Find an object layer by UUID.
    pub fn find_object_layer(&self, uuid: Uuid) -> Option<&ObjectLayer> {
        self.root.find_object_layer(uuid)
    }

    /// Find a mutable object layer by UUID.
    pub fn find_object_layer_mut(&mut self, uuid: Uuid) -> Option<&mut ObjectLayer> {
        self.root.find_object_layer_mut(uuid)
    }

    /// Find a group layer by UUID.
    pub fn find_group_layer(&self, uuid: Uuid) -> Option<&GroupLayer> {
        self.root.find_group_layer(uuid)
    }

    /// Find a mutable group layer by UUID.
    pub fn find_group_layer_mut(&mut self, uuid: Uuid) -> Option<&mut GroupLayer> {
        self.root.find_group_layer_mut(uuid)
    }

    /// Get a tile layer by UUID, with strict errors.
    pub fn view_tile_layer(&self, uuid: Uuid) -> Result<&TileLayer> {
        self.view_layer(uuid)?
            .as_tile_layer()
            .ok_or(MapError::WrongLayerType {
                uuid,
                expected: LayerKind::Tile.name(),
            })
    }

    /// Get a mutable tile layer by UUID, with strict errors.
    pub fn view_tile_layer_mut(&mut self, uuid: Uuid) -> Result<&mut TileLayer> {
        self.view_layer_mut(uuid)?
            .as_tile_layer_mut()
            .ok_or(MapError::WrongLayerType {
                uuid,
                expected: LayerKind::Tile.name(),
            })
    }

    /// Get an object layer by UUID, with strict errors.
    pub fn view_object_layer(&self, uuid: Uuid) -> Result<&ObjectLayer> {
        self.view_layer(uuid)?
            .as_object_layer()
            .ok_or(MapError::WrongLayerType {
                uuid,
                expected: LayerKind::Object.name(),
            })
    }

    /// Get a mutable object layer by UUID, with strict errors.
    pub fn view_object_layer_mut(&mut self, uuid: Uuid) -> Result<&mut ObjectLayer> {
        self.view_layer_mut(uuid)?
            .as_object_layer_mut()
            .ok_or(MapError::WrongLayerType {
                uuid,
                expected: LayerKind::Object.name(),
            })
    }

    /// Get a group layer by UUID, with strict errors.
    pub fn view_group_layer(&self, uuid: Uuid) -> Result<&GroupLayer> {
        self.view_layer(uuid)?
            .as_group_layer()
            .ok_or(MapError::WrongLayerType {
                uuid,
                expected: LayerKind::Group.name(),
            })
    }

    /// Get a mutable group layer by UUID, with strict errors.
    pub fn view_group_layer_mut(&mut self, uuid: Uuid) -> Result<&mut GroupLayer> {
        self.view_layer_mut(uuid)?
            .as_group_layer_mut()
            .ok_or(MapError::WrongLayerType {
                uuid,
                expected: LayerKind::Group.name(),
            })
    }

    /// The position of a layer within its sibling list.
    pub fn layer_local_index(&self, uuid: Uuid) -> Option<usize> {
        self.root.layer_local_index(uuid)
    }

    /// The position of a layer in a pre-order walk of the whole tree.
    pub fn layer_global_index(&self, uuid: Uuid) -> Option<usize> {
        self.root.layer_global_index(uuid)
    }

    /// The layer at a global (pre-order) index.
    pub fn layer_at_index(&self, index: usize) -> Option<&Layer> {
        self.root.layer_at_index(index)
    }

    /// Total number of layers, at any depth.
    pub fn layer_count(&self) -> usize {
        self.root.layer_count()
    }

    /// Iterate over all layers in pre-order.
    pub fn iter_layers(&self) -> LayerIter<'_> {
        self.root.iter()
    }

    /// Visit all layers in pre-order.
    pub fn visit_layers(&self, visitor: &mut dyn LayerVisitor) {
        self.root.each(visitor);
    }

    /// Visit all layers mutably in pre-order.
    pub fn visit_layers_mut(&mut self, visitor: &mut dyn LayerVisitorMut) {
        self.root.each_mut(visitor);
    }

    // -- objects --------------------------------------------------------

    /// Add an object to an object layer, assigning its persistent id.
    ///
    /// Returns the object's UUID.
    pub fn add_object(&mut self, layer_uuid: Uuid, mut object: Object) -> Result<Uuid> {
        let next_id = ObjectId(self.next_object_id);
        let layer = self.view_object_layer_mut(layer_uuid)?;

        if object.persistent_id().is_none() {
            object.set_persistent_id(Some(next_id));
        }
        let uuid = layer.add_object(object);
        self.next_object_id += 1;
        Ok(uuid)
    }

    /// Remove an object from an object layer, handing it back.
    pub fn remove_object(&mut self, layer_uuid: Uuid, object_uuid: Uuid) -> Result<Object> {
        self.view_object_layer_mut(layer_uuid)?
            .remove_object(object_uuid)
            .ok_or(MapError::ObjectNotFound(object_uuid))
    }

    // -- tilesets -------------------------------------------------------

    /// Attach a tileset, assigning its global tile id range.
    pub fn attach_tileset(&mut self, tileset: TilesetRef) -> Uuid {
        self.tilesets.attach_tileset(tileset)
    }

    /// Detach a tileset by UUID, handing it back.
    pub fn detach_tileset(&mut self, uuid: Uuid) -> Result<TilesetRef> {
        self.tilesets.detach_tileset(uuid)
    }

    /// Mark a tileset as active, or clear the selection with `None`.
    pub fn select_tileset(&mut self, uuid: Option<Uuid>) -> Result<()> {
        self.tilesets.select_tileset(uuid)
    }

    /// The attached tilesets.
    pub fn tilesets(&self) -> &TilesetBundle {
        &self.tilesets
    }

    /// Replace every tile id not claimed by an attached tileset with the
    /// empty sentinel.
    ///
    /// Returns the replaced tiles per layer, for undo purposes. Layers
    /// with no invalid tiles are not listed.
    pub fn fix_tiles(&mut self) -> FixTilesResult {
        struct FixTiles<'a> {
            tilesets: &'a TilesetBundle,
            result: FixTilesResult,
        }

        impl LayerVisitorMut for FixTiles<'_> {
            fn visit_tile_layer(&mut self, layer: &mut TileLayer) {
                let extent = layer.extent();
                let mut previous = HashMap::new();

                for pos in extent.iter_positions() {
                    let Some(tile) = layer.tile_at(pos) else {
                        continue;
                    };
                    if !self.tilesets.is_valid_tile(tile)
                        && layer.set_tile(pos, TileId::EMPTY).is_ok()
                    {
                        previous.insert(pos, tile);
                    }
                }

                if !previous.is_empty() {
                    self.result.insert(layer.uuid(), previous);
                }
            }
        }

        let mut visitor = FixTiles {
            tilesets: &self.tilesets,
            result: FixTilesResult::new(),
        };
        self.root.each_mut(&mut visitor);
        visitor.result
    }

    fn view_layer(&self, uuid: Uuid) -> Result<&Layer> {
        self.root.find_layer(uuid).ok_or(MapError::LayerNotFound(uuid))
    }

    fn view_layer_mut(&mut self, uuid: Uuid) -> Result<&mut Layer> {
        self.root
            .find_layer_mut(uuid)
            .ok_or(MapError::LayerNotFound(uuid))
    }

    fn assign_layer_ids(&mut self, layer: &mut Layer) {
        let mut next = self.next_layer_id;
        let mut assign = AssignLayerIds { next: &mut next };
        layer.accept_mut(&mut assign);
        self.next_layer_id = next;
    }
}

impl Default for Map {
    fn default() -> Self {
        Self::new()
    }
}

/// Assigns sequential persistent ids to every visited layer that lacks
/// one.
struct AssignLayerIds<'a> {
    next: &'a mut i32,
}

impl LayerVisitorMut for AssignLayerIds<'_> {
    fn visit_tile_layer(&mut self, layer: &mut TileLayer) {
        if layer.persistent_id().is_none() {
            layer.set_persistent_id(Some(LayerId(*self.next)));
            *self.next += 1;
        }
    }

    fn visit_object_layer(&mut self, layer: &mut ObjectLayer) {
        if layer.persistent_id().is_none() {
            layer.set_persistent_id(Some(LayerId(*self.next)));
            *self.next += 1;
        }
    }

    fn visit_group_layer(&mut self, layer: &mut GroupLayer) {
        if layer.persistent_id().is_none() {
            layer.set_persistent_id(Some(LayerId(*self.next)));
            *self.next += 1;
        }
    }
}

fn subtree_contains(layer: &Layer, uuid: Uuid) -> bool {
    if layer.uuid() == uuid {
        return true;
    }
    match layer {
        Layer::Group(group) => group.find_layer(uuid).is_some(),
        _ => false,
    }
}
