//! Visitor traits for traversing heterogeneous layer trees.
//!
//! Renderers, exporters, and command objects implement one of these traits
//! and hand themselves to [`Layer::accept`] or [`GroupLayer::each`]; the
//! tree performs the type dispatch and the pre-order recursion, so callers
//! never match on layer variants themselves. All methods default to no-ops,
//! so a visitor only overrides the layer kinds it cares about.
//!
//! Visitors borrow the tree for the duration of one traversal call only.
//!
//! [`Layer::accept`]: crate::layer::Layer::accept
//! [`GroupLayer::each`]: crate::layer::GroupLayer::each

use crate::layer::{GroupLayer, ObjectLayer, TileLayer};

/// Read-only visitor over a layer tree.
pub trait LayerVisitor {
    fn visit_tile_layer(&mut self, _layer: &TileLayer) {}

    fn visit_object_layer(&mut self, _layer: &ObjectLayer) {}

    fn visit_group_layer(&mut self, _layer: &GroupLayer) {}
}

/// Mutating visitor over a layer tree.
///
/// This is also the crate's mutable pre-order traversal mechanism: a safe
/// mutable tree iterator cannot hand out a layer and keep its children, so
/// mutation flows through visitors instead.
pub trait LayerVisitorMut {
    fn visit_tile_layer(&mut self, _layer: &mut TileLayer) {}

    fn visit_object_layer(&mut self, _layer: &mut ObjectLayer) {}

    fn visit_group_layer(&mut self, _layer: &mut GroupLayer) {}
}
