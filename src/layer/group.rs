//! Group layers.
//!
//! A group layer owns an ordered list of child layers and is the only
//! source of structure in the layer tree. All tree queries address layers
//! by UUID and search the whole subtree, so callers can treat any group
//! (usually the map's invisible root) as the tree handle.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::layer::{
    impl_layer_common, Layer, LayerCore, LayerVisitor, LayerVisitorMut, ObjectLayer, TileLayer,
};

/// A layer that groups other layers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupLayer {
    pub(crate) core: LayerCore,
    children: Vec<Layer>,
}

impl_layer_common!(GroupLayer);

impl GroupLayer {
    /// Create an empty group layer.
    pub fn new() -> Self {
        Self {
            core: LayerCore::new("Group Layer"),
            children: Vec::new(),
        }
    }

    /// Append a layer to this group's child list.
    pub fn append_layer(&mut self, layer: impl Into<Layer>) {
        let layer = layer.into();
        debug_assert!(self.find_layer(layer.uuid()).is_none());
        self.children.push(layer);
    }

    /// Append a layer to a descendant group.
    ///
    /// Hands the layer back if no descendant has the given UUID.
    pub fn append_layer_to(
        &mut self,
        parent_uuid: Uuid,
        layer: impl Into<Layer>,
    ) -> Result<(), Layer> {
        let layer = layer.into();
        match self.find_group_layer_mut(parent_uuid) {
            Some(parent) => {
                parent.append_layer(layer);
                Ok(())
            }
            None => Err(layer),
        }
    }

    /// Insert a layer at a local index in this group's child list.
    ///
    /// Hands the layer back if the index is past the end.
    pub fn insert_layer(&mut self, index: usize, layer: impl Into<Layer>) -> Result<(), Layer> {
        let layer = layer.into();
        if index > self.children.len() {
            return Err(layer);
        }
        debug_assert!(self.find_layer(layer.uuid()).is_none());
        self.children.insert(index, layer);
        Ok(())
    }

    /// Insert a layer at a local index in a descendant group.
    ///
    /// Hands the layer back if the parent is missing or the index is past
    /// the end of the parent's child list.
    pub fn insert_layer_to(
        &mut self,
        parent_uuid: Uuid,
        index: usize,
        layer: impl Into<Layer>,
    ) -> Result<(), Layer> {
        let layer = layer.into();
        match self.find_group_layer_mut(parent_uuid) {
            Some(parent) => parent.insert_layer(index, layer),
            None => Err(layer),
        }
    }

    /// Remove a layer (and its subtree) by UUID, handing it back.
    pub fn remove_layer(&mut self, uuid: Uuid) -> Option<Layer> {
        let parent = self.find_parent_mut(uuid)?;
        let index = parent.local_index_of(uuid)?;
        Some(parent.children.remove(index))
    }

    /// Duplicate a layer by UUID.
    ///
    /// The clone receives fresh UUIDs throughout its subtree and is placed
    /// immediately after the source layer among its siblings.
    pub fn duplicate_layer(&mut self, uuid: Uuid) -> Option<&Layer> {
        let parent = self.find_parent_mut(uuid)?;
        let index = parent.local_index_of(uuid)?;

        let clone = parent.children[index].clone_with_new_ids();
        parent.children.insert(index + 1, clone);
        Some(&parent.children[index + 1])
    }

    /// Move a layer one step toward the front of its sibling list.
    ///
    /// Returns `false` if the layer is missing or already first.
    pub fn move_layer_up(&mut self, uuid: Uuid) -> bool {
        let Some(parent) = self.find_parent_mut(uuid) else {
            return false;
        };
        match parent.local_index_of(uuid) {
            Some(index) if index > 0 => {
                parent.children.swap(index - 1, index);
                true
            }
            _ => false,
        }
    }

    /// Move a layer one step toward the back of its sibling list.
    ///
    /// Returns `false` if the layer is missing or already last.
    pub fn move_layer_down(&mut self, uuid: Uuid) -> bool {
        let Some(parent) = self.find_parent_mut(uuid) else {
            return false;
        };
        match parent.local_index_of(uuid) {
            Some(index) if index + 1 < parent.children.len() => {
                parent.children.swap(index, index + 1);
                true
            }
            _ => false,
        }
    }

    /// Whether [`move_layer_up`](Self::move_layer_up) would succeed.
    pub fn can_move_layer_up(&self, uuid: Uuid) -> bool {
        self.layer_local_index(uuid).is_some_and(|index| index > 0)
    }

    /// Whether [`move_layer_down`](Self::move_layer_down) would succeed.
    pub fn can_move_layer_down(&self, uuid: Uuid) -> bool {
        match self.find_parent(uuid) {
            Some(parent) => parent
                .local_index_of(uuid)
                .is_some_and(|index| index + 1 < parent.children.len()),
            None => false,
        }
    }

    /// The position of a layer within its sibling list.
    pub fn layer_local_index(&self, uuid: Uuid) -> Option<usize> {
        self.find_parent(uuid)?.local_index_of(uuid)
    }

    /// The position of a layer in a pre-order walk of this group's
    /// descendants (this group itself is not counted).
    pub fn layer_global_index(&self, uuid: Uuid) -> Option<usize> {
        fn walk(group: &GroupLayer, uuid: Uuid, index: &mut usize) -> Option<usize> {
            for child in &group.children {
                if child.uuid() == uuid {
                    return Some(*index);
                }
                *index += 1;
                if let Layer::Group(inner) = child {
                    if let Some(found) = walk(inner, uuid, index) {
                        return Some(found);
                    }
                }
            }
            None
        }

        let mut index = 0;
        walk(self, uuid, &mut index)
    }

    /// The layer at a global (pre-order) index.
    pub fn layer_at_index(&self, index: usize) -> Option<&Layer> {
        fn walk<'a>(children: &'a [Layer], target: usize, index: &mut usize) -> Option<&'a Layer> {
            for child in children {
                if *index == target {
                    return Some(child);
                }
                *index += 1;
                if let Layer::Group(inner) = child {
                    if let Some(found) = walk(&inner.children, target, index) {
                        return Some(found);
                    }
                }
            }
            None
        }

        let mut current = 0;
        walk(&self.children, index, &mut current)
    }

    /// The mutable layer at a global (pre-order) index.
    pub fn layer_at_index_mut(&mut self, index: usize) -> Option<&mut Layer> {
        fn walk<'a>(
            children: &'a mut [Layer],
            target: usize,
            index: &mut usize,
        ) -> Option<&'a mut Layer> {
            for child in children {
                if *index == target {
                    return Some(child);
                }
                *index += 1;
                if let Layer::Group(inner) = child {
                    if let Some(found) = walk(&mut inner.children, target, index) {
                        return Some(found);
                    }
                }
            }
            None
        }

        let mut current = 0;
        walk(&mut self.children, index, &mut current)
    }

    /// Find a descendant layer by UUID.
    pub fn find_layer(&self, uuid: Uuid) -> Option<&Layer> {
        self.iter().find(|layer| layer.uuid() == uuid)
    }

    /// Find a mutable descendant layer by UUID.
    pub fn find_layer_mut(&mut self, uuid: Uuid) -> Option<&mut Layer> {
        fn walk(children: &mut [Layer], uuid: Uuid) -> Option<&mut Layer> {
            for child in children {
                if child.uuid() == uuid {
                    return Some(child);
                }
                if let Layer::Group(inner) = child {
                    if let Some(found) = walk(&mut inner.children, uuid) {
                        return Some(found);
                    }
                }
            }
            None
        }

        walk(&mut self.children, uuid)
    }

    /// Find a descendant tile layer by UUID.
    pub fn find_tile_layer(&self, uuid: Uuid) -> Option<&TileLayer> {
        self.find_layer(uuid)?.as_tile_layer()
    }

    /// Find a mutable descendant tile layer by UUID.
    pub fn find_tile_layer_mut(&mut self, uuid: Uuid) -> Option<&mut TileLayer> {
        self.find_layer_mut(uuid)?.as_tile_layer_mut()
    }

    /// Find a descendant object layer by UUID.
    pub fn find_object_layer(&self, uuid: Uuid) -> Option<&ObjectLayer> {
        self.find_layer(uuid)?.as_object_layer()
    }

    /// Find a mutable descendant object layer by UUID.
    pub fn find_object_layer_mut(&mut self, uuid: Uuid) -> Option<&mut ObjectLayer> {
        self.find_layer_mut(uuid)?.as_object_layer_mut()
    }

    /// Find a descendant group layer by UUID.
    pub fn find_group_layer(&self, uuid: Uuid) -> Option<&GroupLayer> {
        self.find_layer(uuid)?.as_group_layer()
    }

    /// Find a mutable descendant group layer by UUID.
    pub fn find_group_layer_mut(&mut self, uuid: Uuid) -> Option<&mut GroupLayer> {
        self.find_layer_mut(uuid)?.as_group_layer_mut()
    }

    /// Total number of descendant layers, at any depth.
    pub fn layer_count(&self) -> usize {
        self.children
            .iter()
            .map(|child| match child {
                Layer::Group(group) => 1 + group.layer_count(),
                _ => 1,
            })
            .sum()
    }

    /// Number of direct children.
    pub fn top_level_layer_count(&self) -> usize {
        self.children.len()
    }

    /// Iterate over all descendants in pre-order.
    pub fn iter(&self) -> LayerIter<'_> {
        LayerIter {
            stack: vec![self.children.iter()],
        }
    }

    /// Visit all descendants in pre-order (this group itself is not
    /// visited).
    pub fn each(&self, visitor: &mut dyn LayerVisitor) {
        for child in &self.children {
            child.accept(visitor);
        }
    }

    /// Visit all descendants mutably in pre-order.
    pub fn each_mut(&mut self, visitor: &mut dyn LayerVisitorMut) {
        for child in &mut self.children {
            child.accept_mut(visitor);
        }
    }

    /// Deep-clone with fresh UUIDs and cleared persistent ids throughout
    /// the subtree.
    pub(crate) fn clone_with_new_ids(&self) -> Self {
        Self {
            core: self.core.renewed(),
            children: self.children.iter().map(Layer::clone_with_new_ids).collect(),
        }
    }

    /// Find the group whose direct child list contains the given UUID.
    fn find_parent(&self, uuid: Uuid) -> Option<&GroupLayer> {
        if self.local_index_of(uuid).is_some() {
            return Some(self);
        }
        for child in &self.children {
            if let Layer::Group(group) = child {
                if let Some(parent) = group.find_parent(uuid) {
                    return Some(parent);
                }
            }
        }
        None
    }

    /// Mutable variant of [`find_parent`](Self::find_parent). Every
    /// structural operation funnels through this lookup.
    fn find_parent_mut(&mut self, uuid: Uuid) -> Option<&mut GroupLayer> {
        if self.local_index_of(uuid).is_some() {
            return Some(self);
        }
        for child in &mut self.children {
            if let Layer::Group(group) = child {
                if let Some(parent) = group.find_parent_mut(uuid) {
                    return Some(parent);
                }
            }
        }
        None
    }

    fn local_index_of(&self, uuid: Uuid) -> Option<usize> {
        self.children.iter().position(|child| child.uuid() == uuid)
    }
}

impl Default for GroupLayer {
    fn default() -> Self {
        Self::new()
    }
}

/// Pre-order iterator over a group's descendants.
pub struct LayerIter<'a> {
    stack: Vec<std::slice::Iter<'a, Layer>>,
}

impl<'a> Iterator for LayerIter<'a> {
    type Item = &'a Layer;

    fn next(&mut self) -> Option<&'a Layer> {
        loop {
            let iter = self.stack.last_mut()?;
            match iter.next() {
                Some(layer) => {
                    if let Layer::Group(group) = layer {
                        self.stack.push(group.children.iter());
                    }
                    return Some(layer);
                }
                None => {
                    self.stack.pop();
                }
            }
        }
    }
}

impl<'a> IntoIterator for &'a GroupLayer {
    type Item = &'a Layer;
    type IntoIter = LayerIter<'a>;

    fn into_iter(self) -> LayerIter<'a> {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::MatrixExtent;

    struct Hierarchy {
        root: GroupLayer,

        g1: Uuid,
        g2: Uuid,
        g3: Uuid,
        g4: Uuid,

        t1: Uuid,
        t2: Uuid,
        t3: Uuid,
        t4: Uuid,

        o1: Uuid,
        o2: Uuid,
        o3: Uuid,
        o4: Uuid,
    }

    /// Builds the test tree used throughout this module:
    ///
    /// ```text
    /// root
    /// |-- T (t1)
    /// |-- G (g1)
    /// |   |-- G (g2)
    /// |   |   |-- O (o1)
    /// |   |   |-- G (g3)
    /// |   |   |-- O (o2)
    /// |   |-- T (t2)
    /// |   |-- G (g4)
    /// |   |   |-- O (o3)
    /// |   |-- T (t3)
    /// |-- O (o4)
    /// |-- T (t4)
    /// ```
    fn make_hierarchy() -> Hierarchy {
        let extent = MatrixExtent::new(5, 5);

        let t1 = TileLayer::new_dense(extent);
        let t2 = TileLayer::new_dense(extent);
        let t3 = TileLayer::new_sparse(extent);
        let t4 = TileLayer::new_sparse(extent);

        let o1 = ObjectLayer::new();
        let o2 = ObjectLayer::new();
        let o3 = ObjectLayer::new();
        let o4 = ObjectLayer::new();

        let mut g1 = GroupLayer::new();
        let mut g2 = GroupLayer::new();
        let g3 = GroupLayer::new();
        let mut g4 = GroupLayer::new();

        let hierarchy_ids = (
            g1.uuid(),
            g2.uuid(),
            g3.uuid(),
            g4.uuid(),
            t1.uuid(),
            t2.uuid(),
            t3.uuid(),
            t4.uuid(),
            o1.uuid(),
            o2.uuid(),
            o3.uuid(),
            o4.uuid(),
        );

        g2.append_layer(o1);
        g2.append_layer(g3);
        g2.append_layer(o2);

        g4.append_layer(o3);

        g1.append_layer(g2);
        g1.append_layer(t2);
        g1.append_layer(g4);
        g1.append_layer(t3);

        let mut root = GroupLayer::new();
        root.append_layer(t1);
        root.append_layer(g1);
        root.append_layer(o4);
        root.append_layer(t4);

        let (g1, g2, g3, g4, t1, t2, t3, t4, o1, o2, o3, o4) = hierarchy_ids;
        Hierarchy {
            root,
            g1,
            g2,
            g3,
            g4,
            t1,
            t2,
            t3,
            t4,
            o1,
            o2,
            o3,
            o4,
        }
    }

    fn assert_global_indices(root: &GroupLayer, expected: &[(Uuid, usize)]) {
        for (uuid, index) in expected {
            assert_eq!(root.layer_global_index(*uuid), Some(*index), "layer {uuid}");
        }
    }

    #[test]
    fn test_append_layer() {
        let mut layer = GroupLayer::new();
        assert_eq!(layer.layer_count(), 0);

        layer.append_layer(TileLayer::new_dense(MatrixExtent::new(5, 5)));
        assert_eq!(layer.layer_count(), 1);

        layer.append_layer(ObjectLayer::new());
        assert_eq!(layer.layer_count(), 2);

        layer.append_layer(GroupLayer::new());
        assert_eq!(layer.layer_count(), 3);
    }

    #[test]
    fn test_append_layer_to() {
        let mut root = GroupLayer::new();

        let group1 = GroupLayer::new();
        let group2 = GroupLayer::new();
        let group1_uuid = group1.uuid();
        let group2_uuid = group2.uuid();

        root.append_layer(group1);
        assert_eq!(root.layer_count(), 1);

        assert!(root.append_layer_to(group1_uuid, group2).is_ok());
        assert_eq!(root.layer_count(), 2);
        assert_eq!(root.find_group_layer(group1_uuid).unwrap().layer_count(), 1);

        assert!(root.append_layer_to(group2_uuid, ObjectLayer::new()).is_ok());
        assert!(root.append_layer_to(group2_uuid, GroupLayer::new()).is_ok());
        assert!(root
            .append_layer_to(group2_uuid, TileLayer::new_dense(MatrixExtent::new(5, 5)))
            .is_ok());
        assert_eq!(root.layer_count(), 5);
        assert_eq!(root.find_group_layer(group1_uuid).unwrap().layer_count(), 4);
        assert_eq!(root.find_group_layer(group2_uuid).unwrap().layer_count(), 3);

        assert!(root.append_layer_to(group1_uuid, GroupLayer::new()).is_ok());
        assert!(root
            .append_layer_to(group1_uuid, TileLayer::new_dense(MatrixExtent::new(5, 5)))
            .is_ok());
        assert_eq!(root.layer_count(), 7);
        assert_eq!(root.find_group_layer(group1_uuid).unwrap().layer_count(), 6);
        assert_eq!(root.find_group_layer(group2_uuid).unwrap().layer_count(), 3);

        // Unknown parents hand the layer back.
        let orphan = ObjectLayer::new();
        let orphan_uuid = orphan.uuid();
        let returned = root.append_layer_to(Uuid::new_v4(), orphan).unwrap_err();
        assert_eq!(returned.uuid(), orphan_uuid);
        assert_eq!(root.layer_count(), 7);
    }

    #[test]
    fn test_insert_layer() {
        let mut hierarchy = make_hierarchy();
        let root = &mut hierarchy.root;
        assert_eq!(root.layer_count(), 12);

        let new_layer = ObjectLayer::new();
        let new_layer_uuid = new_layer.uuid();

        assert!(root.insert_layer(2, new_layer).is_ok());
        assert_eq!(root.layer_count(), 13);
        assert_eq!(root.layer_local_index(new_layer_uuid), Some(2));
        assert_eq!(root.layer_global_index(new_layer_uuid), Some(10));
    }

    #[test]
    fn test_insert_layer_at_front() {
        let mut hierarchy = make_hierarchy();
        let root = &mut hierarchy.root;

        let new_layer = ObjectLayer::new();
        let new_layer_uuid = new_layer.uuid();

        assert!(root.insert_layer(0, new_layer).is_ok());
        assert_eq!(root.layer_count(), 13);
        assert_eq!(root.layer_local_index(new_layer_uuid), Some(0));
        assert_eq!(root.layer_global_index(new_layer_uuid), Some(0));
    }

    #[test]
    fn test_insert_layer_at_back() {
        let mut hierarchy = make_hierarchy();
        let root = &mut hierarchy.root;

        let new_layer = ObjectLayer::new();
        let new_layer_uuid = new_layer.uuid();
        let target_index = root.top_level_layer_count();

        assert!(root.insert_layer(target_index, new_layer).is_ok());
        assert_eq!(root.layer_count(), 13);
        assert_eq!(root.layer_local_index(new_layer_uuid), Some(target_index));
        assert_eq!(root.layer_global_index(new_layer_uuid), Some(12));
    }

    #[test]
    fn test_insert_layer_past_end_fails() {
        let mut root = GroupLayer::new();
        root.append_layer(ObjectLayer::new());

        let rejected = ObjectLayer::new();
        let rejected_uuid = rejected.uuid();

        let returned = root.insert_layer(2, rejected).unwrap_err();
        assert_eq!(returned.uuid(), rejected_uuid);
        assert_eq!(root.layer_count(), 1);
    }

    #[test]
    fn test_insert_layer_to() {
        let mut hierarchy = make_hierarchy();

        let new_layer = ObjectLayer::new();
        let new_layer_uuid = new_layer.uuid();

        assert!(hierarchy.root.insert_layer_to(hierarchy.g2, 1, new_layer).is_ok());
        assert_eq!(hierarchy.root.layer_count(), 13);
        assert_eq!(hierarchy.root.layer_local_index(new_layer_uuid), Some(1));
        assert_eq!(hierarchy.root.layer_global_index(new_layer_uuid), Some(4));
    }

    #[test]
    fn test_remove_layer() {
        let mut hierarchy = make_hierarchy();
        let root_uuid = hierarchy.root.uuid();

        assert_eq!(hierarchy.root.layer_count(), 12);
        assert!(hierarchy.root.remove_layer(root_uuid).is_none());

        let removed = hierarchy.root.remove_layer(hierarchy.g2).unwrap();
        assert_eq!(removed.uuid(), hierarchy.g2);
        assert!(hierarchy.root.remove_layer(hierarchy.g2).is_none());
        assert_eq!(hierarchy.root.layer_count(), 8);

        assert!(hierarchy.root.remove_layer(hierarchy.t3).is_some());
        assert_eq!(hierarchy.root.layer_count(), 7);

        assert!(hierarchy.root.remove_layer(hierarchy.g1).is_some());
        assert!(hierarchy.root.remove_layer(hierarchy.g1).is_none());
        assert_eq!(hierarchy.root.layer_count(), 3);

        assert!(hierarchy.root.remove_layer(hierarchy.t1).is_some());
        assert!(hierarchy.root.remove_layer(hierarchy.o4).is_some());
        assert!(hierarchy.root.remove_layer(hierarchy.t4).is_some());
        assert_eq!(hierarchy.root.layer_count(), 0);
    }

    #[test]
    fn test_duplicate_layer() {
        let mut hierarchy = make_hierarchy();
        let root_uuid = hierarchy.root.uuid();

        assert!(hierarchy.root.duplicate_layer(root_uuid).is_none());
        assert_eq!(hierarchy.root.layer_count(), 12);

        let duplicated = hierarchy.root.duplicate_layer(hierarchy.g2).unwrap();
        let duplicated_uuid = duplicated.uuid();
        let duplicated_group = duplicated.as_group_layer().unwrap();

        assert_ne!(duplicated_uuid, hierarchy.g2);
        assert_eq!(duplicated_group.layer_count(), 3);
        assert_eq!(hierarchy.root.layer_count(), 16);

        // The clone sits right after the source in the sibling list.
        assert_eq!(hierarchy.root.layer_local_index(hierarchy.g2), Some(0));
        assert_eq!(hierarchy.root.layer_local_index(duplicated_uuid), Some(1));
    }

    #[test]
    fn test_move_layer_up() {
        let mut hierarchy = make_hierarchy();

        assert!(!hierarchy.root.move_layer_up(hierarchy.t1));
        assert!(!hierarchy.root.move_layer_up(hierarchy.o3));

        assert!(hierarchy.root.move_layer_up(hierarchy.g1));
        assert_global_indices(
            &hierarchy.root,
            &[
                (hierarchy.g1, 0),
                (hierarchy.g2, 1),
                (hierarchy.o1, 2),
                (hierarchy.g3, 3),
                (hierarchy.o2, 4),
                (hierarchy.t2, 5),
                (hierarchy.g4, 6),
                (hierarchy.o3, 7),
                (hierarchy.t3, 8),
                (hierarchy.t1, 9),
                (hierarchy.o4, 10),
                (hierarchy.t4, 11),
            ],
        );

        assert!(hierarchy.root.move_layer_up(hierarchy.g4));
        assert_global_indices(
            &hierarchy.root,
            &[
                (hierarchy.g1, 0),
                (hierarchy.g2, 1),
                (hierarchy.o1, 2),
                (hierarchy.g3, 3),
                (hierarchy.o2, 4),
                (hierarchy.g4, 5),
                (hierarchy.o3, 6),
                (hierarchy.t2, 7),
                (hierarchy.t3, 8),
                (hierarchy.t1, 9),
                (hierarchy.o4, 10),
                (hierarchy.t4, 11),
            ],
        );
    }

    #[test]
    fn test_move_layer_down() {
        let mut hierarchy = make_hierarchy();

        assert!(!hierarchy.root.move_layer_down(hierarchy.t4));
        assert!(!hierarchy.root.move_layer_down(hierarchy.o2));

        assert!(hierarchy.root.move_layer_down(hierarchy.g2));
        assert_global_indices(
            &hierarchy.root,
            &[
                (hierarchy.t1, 0),
                (hierarchy.g1, 1),
                (hierarchy.t2, 2),
                (hierarchy.g2, 3),
                (hierarchy.o1, 4),
                (hierarchy.g3, 5),
                (hierarchy.o2, 6),
                (hierarchy.g4, 7),
                (hierarchy.o3, 8),
                (hierarchy.t3, 9),
                (hierarchy.o4, 10),
                (hierarchy.t4, 11),
            ],
        );

        assert!(hierarchy.root.move_layer_down(hierarchy.g3));
        assert_global_indices(
            &hierarchy.root,
            &[
                (hierarchy.t1, 0),
                (hierarchy.g1, 1),
                (hierarchy.t2, 2),
                (hierarchy.g2, 3),
                (hierarchy.o1, 4),
                (hierarchy.o2, 5),
                (hierarchy.g3, 6),
                (hierarchy.g4, 7),
                (hierarchy.o3, 8),
                (hierarchy.t3, 9),
                (hierarchy.o4, 10),
                (hierarchy.t4, 11),
            ],
        );
    }

    #[test]
    fn test_can_move_layer_up() {
        let hierarchy = make_hierarchy();
        let root = &hierarchy.root;

        assert!(!root.can_move_layer_up(hierarchy.t1));
        assert!(root.can_move_layer_up(hierarchy.g1));
        assert!(!root.can_move_layer_up(hierarchy.g2));
        assert!(!root.can_move_layer_up(hierarchy.o1));
        assert!(root.can_move_layer_up(hierarchy.g3));
        assert!(root.can_move_layer_up(hierarchy.o2));
        assert!(root.can_move_layer_up(hierarchy.t2));
        assert!(root.can_move_layer_up(hierarchy.g4));
        assert!(!root.can_move_layer_up(hierarchy.o3));
        assert!(root.can_move_layer_up(hierarchy.t3));
        assert!(root.can_move_layer_up(hierarchy.o4));
        assert!(root.can_move_layer_up(hierarchy.t4));
    }

    #[test]
    fn test_can_move_layer_down() {
        let hierarchy = make_hierarchy();
        let root = &hierarchy.root;

        assert!(root.can_move_layer_down(hierarchy.t1));
        assert!(root.can_move_layer_down(hierarchy.g1));
        assert!(root.can_move_layer_down(hierarchy.g2));
        assert!(root.can_move_layer_down(hierarchy.o1));
        assert!(root.can_move_layer_down(hierarchy.g3));
        assert!(!root.can_move_layer_down(hierarchy.o2));
        assert!(root.can_move_layer_down(hierarchy.t2));
        assert!(root.can_move_layer_down(hierarchy.g4));
        assert!(!root.can_move_layer_down(hierarchy.o3));
        assert!(!root.can_move_layer_down(hierarchy.t3));
        assert!(root.can_move_layer_down(hierarchy.o4));
        assert!(!root.can_move_layer_down(hierarchy.t4));
    }

    #[test]
    fn test_layer_local_index() {
        let hierarchy = make_hierarchy();
        let root = &hierarchy.root;

        assert_eq!(root.layer_local_index(hierarchy.t1), Some(0));
        assert_eq!(root.layer_local_index(hierarchy.g1), Some(1));
        assert_eq!(root.layer_local_index(hierarchy.g2), Some(0));
        assert_eq!(root.layer_local_index(hierarchy.o1), Some(0));
        assert_eq!(root.layer_local_index(hierarchy.g3), Some(1));
        assert_eq!(root.layer_local_index(hierarchy.o2), Some(2));
        assert_eq!(root.layer_local_index(hierarchy.t2), Some(1));
        assert_eq!(root.layer_local_index(hierarchy.g4), Some(2));
        assert_eq!(root.layer_local_index(hierarchy.o3), Some(0));
        assert_eq!(root.layer_local_index(hierarchy.t3), Some(3));
        assert_eq!(root.layer_local_index(hierarchy.o4), Some(2));
        assert_eq!(root.layer_local_index(hierarchy.t4), Some(3));

        assert_eq!(root.layer_local_index(Uuid::new_v4()), None);
    }

    #[test]
    fn test_layer_global_index() {
        let hierarchy = make_hierarchy();

        assert_global_indices(
            &hierarchy.root,
            &[
                (hierarchy.t1, 0),
                (hierarchy.g1, 1),
                (hierarchy.g2, 2),
                (hierarchy.o1, 3),
                (hierarchy.g3, 4),
                (hierarchy.o2, 5),
                (hierarchy.t2, 6),
                (hierarchy.g4, 7),
                (hierarchy.o3, 8),
                (hierarchy.t3, 9),
                (hierarchy.o4, 10),
                (hierarchy.t4, 11),
            ],
        );

        assert_eq!(hierarchy.root.layer_global_index(Uuid::new_v4()), None);
    }

    #[test]
    fn test_layer_at_index_is_inverse_of_global_index() {
        let hierarchy = make_hierarchy();
        let root = &hierarchy.root;

        for index in 0..root.layer_count() {
            let layer = root.layer_at_index(index).unwrap();
            assert_eq!(root.layer_global_index(layer.uuid()), Some(index));
        }
        assert!(root.layer_at_index(root.layer_count()).is_none());
    }

    #[test]
    fn test_iteration() {
        let hierarchy = make_hierarchy();
        let root = &hierarchy.root;

        let mut count = 0;
        for layer in root {
            assert!(root.find_layer(layer.uuid()).is_some());
            count += 1;
        }
        assert_eq!(count, 12);

        let visited: Vec<Uuid> = root.iter().map(Layer::uuid).collect();
        assert_eq!(visited[0], hierarchy.t1);
        assert_eq!(visited[1], hierarchy.g1);
        assert_eq!(visited[2], hierarchy.g2);
        assert_eq!(visited[11], hierarchy.t4);
    }

    #[test]
    fn test_each_visits_all_descendants() {
        let hierarchy = make_hierarchy();

        #[derive(Default)]
        struct Counter {
            tiles: usize,
            objects: usize,
            groups: usize,
        }

        impl LayerVisitor for Counter {
            fn visit_tile_layer(&mut self, _layer: &TileLayer) {
                self.tiles += 1;
            }

            fn visit_object_layer(&mut self, _layer: &ObjectLayer) {
                self.objects += 1;
            }

            fn visit_group_layer(&mut self, _layer: &GroupLayer) {
                self.groups += 1;
            }
        }

        let mut counter = Counter::default();
        hierarchy.root.each(&mut counter);

        assert_eq!(counter.tiles, 4);
        assert_eq!(counter.objects, 4);
        assert_eq!(counter.groups, 4);
    }

    #[test]
    fn test_each_mut_can_rewrite_descendants() {
        let mut hierarchy = make_hierarchy();

        struct HideAll;

        impl LayerVisitorMut for HideAll {
            fn visit_tile_layer(&mut self, layer: &mut TileLayer) {
                layer.set_visible(false);
            }

            fn visit_object_layer(&mut self, layer: &mut ObjectLayer) {
                layer.set_visible(false);
            }

            fn visit_group_layer(&mut self, layer: &mut GroupLayer) {
                layer.set_visible(false);
            }
        }

        hierarchy.root.each_mut(&mut HideAll);

        assert!(hierarchy.root.iter().all(|layer| !layer.visible()));
        assert!(hierarchy.root.visible());
    }

    #[test]
    fn test_typed_finds() {
        let mut hierarchy = make_hierarchy();

        assert!(hierarchy.root.find_tile_layer(hierarchy.t2).is_some());
        assert!(hierarchy.root.find_object_layer(hierarchy.o3).is_some());
        assert!(hierarchy.root.find_group_layer(hierarchy.g3).is_some());

        // Kind mismatches come back empty.
        assert!(hierarchy.root.find_tile_layer(hierarchy.o1).is_none());
        assert!(hierarchy.root.find_group_layer(hierarchy.t1).is_none());

        assert!(hierarchy.root.find_tile_layer_mut(hierarchy.t4).is_some());
        assert!(hierarchy.root.find_object_layer_mut(hierarchy.o1).is_some());
        assert!(hierarchy.root.find_group_layer_mut(hierarchy.g4).is_some());
    }
}
