//! The layer tree: tile, object, and group layers.
//!
//! [`Layer`] is a closed sum over the three layer kinds that compose a
//! map's content tree. Group layers own their children exclusively; every
//! structural operation (remove, duplicate, move) either transfers
//! ownership out of the tree or reorders siblings in place.

mod group;
mod object;
mod tile;
mod visitor;

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::id::LayerId;
use crate::meta::Metadata;

pub use group::{GroupLayer, LayerIter};
pub use object::{Object, ObjectKind, ObjectLayer};
pub use tile::TileLayer;
pub use visitor::{LayerVisitor, LayerVisitorMut};

/// The kind of a layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayerKind {
    Tile,
    Object,
    Group,
}

impl LayerKind {
    /// Get the short name for this kind.
    pub fn name(&self) -> &'static str {
        match self {
            LayerKind::Tile => "tile",
            LayerKind::Object => "object",
            LayerKind::Group => "group",
        }
    }
}

impl fmt::Display for LayerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// State shared by every layer kind: identity, persistent id, opacity,
/// and visibility.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct LayerCore {
    pub(crate) meta: Metadata,
    pub(crate) persistent_id: Option<LayerId>,
    pub(crate) opacity: f32,
    pub(crate) visible: bool,
}

impl LayerCore {
    pub(crate) fn new(name: impl Into<String>) -> Self {
        Self {
            meta: Metadata::new(name),
            persistent_id: None,
            opacity: 1.0,
            visible: true,
        }
    }

    /// Clone for duplication: fresh UUID, no persistent id, same
    /// appearance state.
    pub(crate) fn renewed(&self) -> Self {
        Self {
            meta: self.meta.renewed(),
            persistent_id: None,
            opacity: self.opacity,
            visible: self.visible,
        }
    }
}

/// Implements the accessors shared by all layer kinds, delegating to the
/// embedded [`LayerCore`].
macro_rules! impl_layer_common {
    ($type:ty) => {
        impl $type {
            /// The layer's metadata.
            pub fn meta(&self) -> &crate::meta::Metadata {
                &self.core.meta
            }

            /// Mutable access to the layer's metadata.
            pub fn meta_mut(&mut self) -> &mut crate::meta::Metadata {
                &mut self.core.meta
            }

            /// The layer's UUID.
            pub fn uuid(&self) -> uuid::Uuid {
                self.core.meta.uuid()
            }

            /// The serialization-facing layer id, if assigned.
            pub fn persistent_id(&self) -> Option<crate::id::LayerId> {
                self.core.persistent_id
            }

            /// Assign or clear the serialization-facing layer id.
            pub fn set_persistent_id(&mut self, id: Option<crate::id::LayerId>) {
                self.core.persistent_id = id;
            }

            /// The layer opacity, in `[0, 1]`.
            pub fn opacity(&self) -> f32 {
                self.core.opacity
            }

            /// Set the layer opacity, clamped to `[0, 1]`.
            pub fn set_opacity(&mut self, opacity: f32) {
                self.core.opacity = opacity.clamp(0.0, 1.0);
            }

            /// Whether the layer is visible.
            pub fn visible(&self) -> bool {
                self.core.visible
            }

            /// Show or hide the layer.
            pub fn set_visible(&mut self, visible: bool) {
                self.core.visible = visible;
            }
        }
    };
}

pub(crate) use impl_layer_common;

/// A node in the map's layer tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Layer {
    Tile(TileLayer),
    Object(ObjectLayer),
    Group(GroupLayer),
}

impl Layer {
    /// The kind of this layer.
    pub fn kind(&self) -> LayerKind {
        match self {
            Layer::Tile(_) => LayerKind::Tile,
            Layer::Object(_) => LayerKind::Object,
            Layer::Group(_) => LayerKind::Group,
        }
    }

    /// The layer's UUID.
    pub fn uuid(&self) -> Uuid {
        self.meta().uuid()
    }

    /// The layer's metadata.
    pub fn meta(&self) -> &Metadata {
        match self {
            Layer::Tile(layer) => layer.meta(),
            Layer::Object(layer) => layer.meta(),
            Layer::Group(layer) => layer.meta(),
        }
    }

    /// Mutable access to the layer's metadata.
    pub fn meta_mut(&mut self) -> &mut Metadata {
        match self {
            Layer::Tile(layer) => layer.meta_mut(),
            Layer::Object(layer) => layer.meta_mut(),
            Layer::Group(layer) => layer.meta_mut(),
        }
    }

    /// The serialization-facing layer id, if assigned.
    pub fn persistent_id(&self) -> Option<LayerId> {
        match self {
            Layer::Tile(layer) => layer.persistent_id(),
            Layer::Object(layer) => layer.persistent_id(),
            Layer::Group(layer) => layer.persistent_id(),
        }
    }

    /// Assign or clear the serialization-facing layer id.
    pub fn set_persistent_id(&mut self, id: Option<LayerId>) {
        match self {
            Layer::Tile(layer) => layer.set_persistent_id(id),
            Layer::Object(layer) => layer.set_persistent_id(id),
            Layer::Group(layer) => layer.set_persistent_id(id),
        }
    }

    /// The layer opacity, in `[0, 1]`.
    pub fn opacity(&self) -> f32 {
        match self {
            Layer::Tile(layer) => layer.opacity(),
            Layer::Object(layer) => layer.opacity(),
            Layer::Group(layer) => layer.opacity(),
        }
    }

    /// Set the layer opacity, clamped to `[0, 1]`.
    pub fn set_opacity(&mut self, opacity: f32) {
        match self {
            Layer::Tile(layer) => layer.set_opacity(opacity),
            Layer::Object(layer) => layer.set_opacity(opacity),
            Layer::Group(layer) => layer.set_opacity(opacity),
        }
    }

    /// Whether the layer is visible.
    pub fn visible(&self) -> bool {
        match self {
            Layer::Tile(layer) => layer.visible(),
            Layer::Object(layer) => layer.visible(),
            Layer::Group(layer) => layer.visible(),
        }
    }

    /// Show or hide the layer.
    pub fn set_visible(&mut self, visible: bool) {
        match self {
            Layer::Tile(layer) => layer.set_visible(visible),
            Layer::Object(layer) => layer.set_visible(visible),
            Layer::Group(layer) => layer.set_visible(visible),
        }
    }

    /// Dispatch a read-only visitor to this layer.
    ///
    /// Group layers visit themselves first and then every descendant in
    /// child-list order (pre-order).
    pub fn accept(&self, visitor: &mut dyn LayerVisitor) {
        match self {
            Layer::Tile(layer) => visitor.visit_tile_layer(layer),
            Layer::Object(layer) => visitor.visit_object_layer(layer),
            Layer::Group(layer) => {
                visitor.visit_group_layer(layer);
                layer.each(visitor);
            }
        }
    }

    /// Dispatch a mutating visitor to this layer, pre-order for groups.
    pub fn accept_mut(&mut self, visitor: &mut dyn LayerVisitorMut) {
        match self {
            Layer::Tile(layer) => visitor.visit_tile_layer(layer),
            Layer::Object(layer) => visitor.visit_object_layer(layer),
            Layer::Group(layer) => {
                visitor.visit_group_layer(layer);
                layer.each_mut(visitor);
            }
        }
    }

    /// Deep-clone this layer with fresh UUIDs and cleared persistent ids,
    /// recursively for groups and their descendants.
    pub fn clone_with_new_ids(&self) -> Layer {
        match self {
            Layer::Tile(layer) => Layer::Tile(layer.clone_with_new_ids()),
            Layer::Object(layer) => Layer::Object(layer.clone_with_new_ids()),
            Layer::Group(layer) => Layer::Group(layer.clone_with_new_ids()),
        }
    }

    /// Downcast to a tile layer.
    pub fn as_tile_layer(&self) -> Option<&TileLayer> {
        match self {
            Layer::Tile(layer) => Some(layer),
            _ => None,
        }
    }

    /// Downcast to a mutable tile layer.
    pub fn as_tile_layer_mut(&mut self) -> Option<&mut TileLayer> {
        match self {
            Layer::Tile(layer) => Some(layer),
            _ => None,
        }
    }

    /// Downcast to an object layer.
    pub fn as_object_layer(&self) -> Option<&ObjectLayer> {
        match self {
            Layer::Object(layer) => Some(layer),
            _ => None,
        }
    }

    /// Downcast to a mutable object layer.
    pub fn as_object_layer_mut(&mut self) -> Option<&mut ObjectLayer> {
        match self {
            Layer::Object(layer) => Some(layer),
            _ => None,
        }
    }

    /// Downcast to a group layer.
    pub fn as_group_layer(&self) -> Option<&GroupLayer> {
        match self {
            Layer::Group(layer) => Some(layer),
            _ => None,
        }
    }

    /// Downcast to a mutable group layer.
    pub fn as_group_layer_mut(&mut self) -> Option<&mut GroupLayer> {
        match self {
            Layer::Group(layer) => Some(layer),
            _ => None,
        }
    }
}

impl From<TileLayer> for Layer {
    fn from(layer: TileLayer) -> Self {
        Layer::Tile(layer)
    }
}

impl From<ObjectLayer> for Layer {
    fn from(layer: ObjectLayer) -> Self {
        Layer::Object(layer)
    }
}

impl From<GroupLayer> for Layer {
    fn from(layer: GroupLayer) -> Self {
        Layer::Group(layer)
    }
}
