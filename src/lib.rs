//! tilework - Tile map core model
//!
//! A library implementing the document model of a tile map editor: a
//! recursive layer tree (tile, object, and group layers), interchangeable
//! dense/sparse tile storage, attached tilesets with global tile id
//! ranges, and snapshot support for undoable grid edits.

pub mod error;
pub mod grid;
pub mod id;
pub mod layer;
pub mod map;
pub mod matrix;
pub mod meta;
pub mod property;
pub mod snapshot;
pub mod tileset;

pub use error::{MapError, Result};
pub use grid::{MatrixExtent, TilePos};
pub use id::{LayerId, ObjectId, TileId};
pub use layer::{
    GroupLayer, Layer, LayerIter, LayerKind, LayerVisitor, LayerVisitorMut, Object, ObjectKind,
    ObjectLayer, TileLayer,
};
pub use map::{FixTilesResult, Map, TileSize};
pub use matrix::{DenseTileMatrix, SparseTileMatrix, TileMatrix};
pub use meta::Metadata;
pub use property::{Color, PropertyMap, PropertyValue};
pub use snapshot::TileCache;
pub use tileset::{TilesetBundle, TilesetRef};
