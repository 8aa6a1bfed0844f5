//! Object layers and the objects they hold.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::id::ObjectId;
use crate::layer::{impl_layer_common, LayerCore};
use crate::meta::Metadata;

/// The geometric kind of a map object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectKind {
    Point,
    Rect,
    Ellipse,
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ObjectKind::Point => "point",
            ObjectKind::Rect => "rect",
            ObjectKind::Ellipse => "ellipse",
        };
        write!(f, "{name}")
    }
}

/// A freely positioned map object: a point, rectangle, or ellipse.
///
/// Coordinates and size are in pixels, independent of the tile grid.
/// Points ignore their size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Object {
    meta: Metadata,
    persistent_id: Option<ObjectId>,
    kind: ObjectKind,
    x: f32,
    y: f32,
    width: f32,
    height: f32,
    tag: String,
    visible: bool,
}

impl Object {
    /// Create an object of the given kind at the origin.
    pub fn new(kind: ObjectKind) -> Self {
        Self {
            meta: Metadata::new("Object"),
            persistent_id: None,
            kind,
            x: 0.0,
            y: 0.0,
            width: 0.0,
            height: 0.0,
            tag: String::new(),
            visible: true,
        }
    }

    /// The object's metadata.
    pub fn meta(&self) -> &Metadata {
        &self.meta
    }

    /// Mutable access to the object's metadata.
    pub fn meta_mut(&mut self) -> &mut Metadata {
        &mut self.meta
    }

    /// The object's UUID.
    pub fn uuid(&self) -> Uuid {
        self.meta.uuid()
    }

    /// The serialization-facing object id, if assigned.
    pub fn persistent_id(&self) -> Option<ObjectId> {
        self.persistent_id
    }

    /// Assign or clear the serialization-facing object id.
    pub fn set_persistent_id(&mut self, id: Option<ObjectId>) {
        self.persistent_id = id;
    }

    /// The object's geometric kind.
    pub fn kind(&self) -> ObjectKind {
        self.kind
    }

    /// The object's position, in pixels.
    pub fn position(&self) -> (f32, f32) {
        (self.x, self.y)
    }

    /// Move the object.
    pub fn set_position(&mut self, x: f32, y: f32) {
        self.x = x;
        self.y = y;
    }

    /// The object's size, in pixels.
    pub fn size(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    /// Resize the object.
    pub fn set_size(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
    }

    /// The object's user-defined tag.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Set the object's user-defined tag.
    pub fn set_tag(&mut self, tag: impl Into<String>) {
        self.tag = tag.into();
    }

    /// Whether the object is visible.
    pub fn visible(&self) -> bool {
        self.visible
    }

    /// Show or hide the object.
    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    /// Clone with a fresh UUID and no persistent id.
    pub(crate) fn clone_with_new_ids(&self) -> Self {
        let mut clone = self.clone();
        clone.meta = self.meta.renewed();
        clone.persistent_id = None;
        clone
    }
}

/// A layer holding freely positioned objects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectLayer {
    pub(crate) core: LayerCore,
    objects: Vec<Object>,
    active_object: Option<Uuid>,
}

impl_layer_common!(ObjectLayer);

impl ObjectLayer {
    /// Create an empty object layer.
    pub fn new() -> Self {
        Self {
            core: LayerCore::new("Object Layer"),
            objects: Vec::new(),
            active_object: None,
        }
    }

    /// Add an object, returning its UUID.
    pub fn add_object(&mut self, object: Object) -> Uuid {
        let uuid = object.uuid();
        debug_assert!(self.find_object(uuid).is_none());
        self.objects.push(object);
        uuid
    }

    /// Remove an object by UUID, handing it back if found.
    ///
    /// Clears the active object if it was the one removed.
    pub fn remove_object(&mut self, uuid: Uuid) -> Option<Object> {
        let index = self.objects.iter().position(|object| object.uuid() == uuid)?;
        if self.active_object == Some(uuid) {
            self.active_object = None;
        }
        Some(self.objects.remove(index))
    }

    /// Find an object by UUID.
    pub fn find_object(&self, uuid: Uuid) -> Option<&Object> {
        self.objects.iter().find(|object| object.uuid() == uuid)
    }

    /// Find a mutable object by UUID.
    pub fn find_object_mut(&mut self, uuid: Uuid) -> Option<&mut Object> {
        self.objects.iter_mut().find(|object| object.uuid() == uuid)
    }

    /// Mark an object as active, or clear the selection with `None`.
    ///
    /// Returns `false` if the given object is not in this layer.
    pub fn select_object(&mut self, uuid: Option<Uuid>) -> bool {
        match uuid {
            Some(uuid) if self.find_object(uuid).is_none() => false,
            _ => {
                self.active_object = uuid;
                true
            }
        }
    }

    /// The UUID of the active object, if any.
    pub fn active_object_id(&self) -> Option<Uuid> {
        self.active_object
    }

    /// Iterate over the objects in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Object> {
        self.objects.iter()
    }

    /// Iterate mutably over the objects in insertion order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Object> {
        self.objects.iter_mut()
    }

    /// Number of objects in this layer.
    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    /// Deep-clone with fresh UUIDs for the layer and every object.
    pub(crate) fn clone_with_new_ids(&self) -> Self {
        Self {
            core: self.core.renewed(),
            objects: self.objects.iter().map(Object::clone_with_new_ids).collect(),
            active_object: None,
        }
    }
}

impl Default for ObjectLayer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_and_find() {
        let mut layer = ObjectLayer::new();

        let mut object = Object::new(ObjectKind::Rect);
        object.set_position(10.0, 20.0);
        object.set_size(32.0, 16.0);
        let uuid = layer.add_object(object);

        assert_eq!(layer.object_count(), 1);
        let found = layer.find_object(uuid).unwrap();
        assert_eq!(found.kind(), ObjectKind::Rect);
        assert_eq!(found.position(), (10.0, 20.0));
        assert_eq!(found.size(), (32.0, 16.0));
    }

    #[test]
    fn test_remove_clears_selection() {
        let mut layer = ObjectLayer::new();
        let uuid = layer.add_object(Object::new(ObjectKind::Point));

        assert!(layer.select_object(Some(uuid)));
        assert_eq!(layer.active_object_id(), Some(uuid));

        let removed = layer.remove_object(uuid).unwrap();
        assert_eq!(removed.uuid(), uuid);
        assert_eq!(layer.active_object_id(), None);
        assert_eq!(layer.object_count(), 0);
    }

    #[test]
    fn test_select_unknown_object_fails() {
        let mut layer = ObjectLayer::new();
        layer.add_object(Object::new(ObjectKind::Ellipse));

        assert!(!layer.select_object(Some(Uuid::new_v4())));
        assert_eq!(layer.active_object_id(), None);
        assert!(layer.select_object(None));
    }

    #[test]
    fn test_clone_renews_object_ids() {
        let mut layer = ObjectLayer::new();
        let mut object = Object::new(ObjectKind::Point);
        object.set_tag("spawn");
        object.set_persistent_id(Some(ObjectId(7)));
        let uuid = layer.add_object(object);

        let clone = layer.clone_with_new_ids();
        assert_ne!(clone.uuid(), layer.uuid());
        assert_eq!(clone.object_count(), 1);

        let cloned_object = clone.iter().next().unwrap();
        assert_ne!(cloned_object.uuid(), uuid);
        assert_eq!(cloned_object.persistent_id(), None);
        assert_eq!(cloned_object.tag(), "spawn");
    }
}
