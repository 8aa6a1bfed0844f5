//! Metadata bundle carried by every addressable map entity.
//!
//! Each layer, object, tileset reference, and the map itself embeds a
//! [`Metadata`] value: a process-unique UUID, a display name, named
//! properties, and attached component instances (a component is a named
//! bundle of attribute values). Metadata has no lifecycle of its own; it
//! lives and dies with its owner.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::property::{PropertyMap, PropertyValue};

/// Name, identity, and attached attributes of a map entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    uuid: Uuid,
    name: String,
    properties: PropertyMap,
    components: HashMap<String, PropertyMap>,
}

impl Metadata {
    /// Create metadata with a fresh UUID and the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            name: name.into(),
            properties: PropertyMap::new(),
            components: HashMap::new(),
        }
    }

    /// The UUID identifying the owning entity.
    ///
    /// Immutable for the lifetime of the entity; cloning via
    /// [`renewed`](Self::renewed) is the only way to obtain a copy with a
    /// different UUID.
    pub fn uuid(&self) -> Uuid {
        self.uuid
    }

    /// The display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Set the display name.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Look up a property by name.
    pub fn property(&self, name: &str) -> Option<&PropertyValue> {
        self.properties.get(name)
    }

    /// Set a property, replacing any previous value under the same name.
    pub fn set_property(&mut self, name: impl Into<String>, value: impl Into<PropertyValue>) {
        self.properties.insert(name.into(), value.into());
    }

    /// Remove a property, returning the previous value if present.
    pub fn remove_property(&mut self, name: &str) -> Option<PropertyValue> {
        self.properties.remove(name)
    }

    /// All properties.
    pub fn properties(&self) -> &PropertyMap {
        &self.properties
    }

    /// Attach a component instance, replacing any existing one with the
    /// same name.
    pub fn attach_component(&mut self, name: impl Into<String>, attributes: PropertyMap) {
        self.components.insert(name.into(), attributes);
    }

    /// Detach a component, returning its attributes if it was attached.
    pub fn detach_component(&mut self, name: &str) -> Option<PropertyMap> {
        self.components.remove(name)
    }

    /// Look up an attached component by name.
    pub fn component(&self, name: &str) -> Option<&PropertyMap> {
        self.components.get(name)
    }

    /// Mutable access to an attached component.
    pub fn component_mut(&mut self, name: &str) -> Option<&mut PropertyMap> {
        self.components.get_mut(name)
    }

    /// Check whether a component with the given name is attached.
    pub fn has_component(&self, name: &str) -> bool {
        self.components.contains_key(name)
    }

    /// Clone this metadata with a fresh UUID.
    ///
    /// Used when duplicating entities: the copy keeps the name, properties,
    /// and components but gets a new identity.
    pub fn renewed(&self) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            name: self.name.clone(),
            properties: self.properties.clone(),
            components: self.components.clone(),
        }
    }
}

impl Default for Metadata {
    fn default() -> Self {
        Self::new("")
    }
}
