//! Arena-backed scene tree

use std::ops::{Index, IndexMut};

use crate::scene::node::{GeometryPayload, NodeId, NodeKind, SceneNode};

/// The scene graph: an arena of nodes plus a distinguished root
///
/// Nodes are addressed by [`NodeId`] and reference their children by id, so
/// an id can only ever point at an already-allocated slot. The tree performs
/// no cycle detection; callers must keep the parent/child structure acyclic
/// because traversal is unconditionally recursive.
///
/// Detaching a child only removes it from the parent's child list. The node
/// stays allocated, keeps its id, and can be re-attached later — until then
/// it is simply invisible to every traversal.
#[derive(Debug)]
pub struct SceneTree {
    nodes: Vec<SceneNode>,
    root: NodeId,
}

impl Default for SceneTree {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneTree {
    /// Create a tree containing only an empty root node
    pub fn new() -> Self {
        let root = NodeId(0);
        Self {
            nodes: vec![SceneNode::new(root, NodeKind::Geometry(GeometryPayload::empty()))],
            root,
        }
    }

    /// Id of the root node
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Allocate a new detached node with identity transform defaults
    pub fn create_node(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(SceneNode::new(id, kind));
        id
    }

    /// Append `child` to `parent`'s ordered child list
    ///
    /// Insertion order is traversal order. The caller is responsible for
    /// keeping the structure a tree.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) {
        self.nodes[parent.index()].children.push(child);
    }

    /// Remove `child` from `parent`'s child list by id-equality search
    ///
    /// Returns whether the child was present. The detached subtree stays
    /// allocated for possible re-attachment.
    pub fn detach_child(&mut self, parent: NodeId, child: NodeId) -> bool {
        let children = &mut self.nodes[parent.index()].children;
        match children.iter().position(|&c| c == child) {
            Some(pos) => {
                children.remove(pos);
                true
            }
            None => false,
        }
    }

    /// Whether `child` is currently in `parent`'s child list
    pub fn has_child(&self, parent: NodeId, child: NodeId) -> bool {
        self.nodes[parent.index()].children.contains(&child)
    }

    /// Borrow a node
    pub fn node(&self, id: NodeId) -> &SceneNode {
        &self.nodes[id.index()]
    }

    /// Mutably borrow a node
    pub fn node_mut(&mut self, id: NodeId) -> &mut SceneNode {
        &mut self.nodes[id.index()]
    }

    /// Number of allocated nodes, attached or not
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the arena holds no nodes besides the root
    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    /// Count the nodes reachable from `id`, excluding `id` itself
    pub fn descendant_count(&self, id: NodeId) -> usize {
        self.node(id)
            .children()
            .iter()
            .map(|&child| 1 + self.descendant_count(child))
            .sum()
    }
}

impl Index<NodeId> for SceneTree {
    type Output = SceneNode;

    fn index(&self, id: NodeId) -> &SceneNode {
        self.node(id)
    }
}

impl IndexMut<NodeId> for SceneTree {
    fn index_mut(&mut self, id: NodeId) -> &mut SceneNode {
        self.node_mut(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_monotonic_and_stable() {
        let mut tree = SceneTree::new();
        let a = tree.create_node(NodeKind::Geometry(GeometryPayload::empty()));
        let b = tree.create_node(NodeKind::Geometry(GeometryPayload::empty()));

        assert_eq!(a.index() + 1, b.index());
        assert_eq!(tree[a].id(), a);
        assert_eq!(tree.len(), 3); // root + 2
    }

    #[test]
    fn test_child_order_is_insertion_order() {
        let mut tree = SceneTree::new();
        let root = tree.root();
        let a = tree.create_node(NodeKind::Geometry(GeometryPayload::empty()));
        let b = tree.create_node(NodeKind::Geometry(GeometryPayload::empty()));
        let c = tree.create_node(NodeKind::Geometry(GeometryPayload::empty()));
        tree.add_child(root, a);
        tree.add_child(root, b);
        tree.add_child(root, c);

        assert_eq!(tree[root].children(), &[a, b, c]);
    }

    #[test]
    fn test_detach_and_reattach() {
        let mut tree = SceneTree::new();
        let root = tree.root();
        let a = tree.create_node(NodeKind::Geometry(GeometryPayload::empty()));
        let b = tree.create_node(NodeKind::Geometry(GeometryPayload::empty()));
        tree.add_child(root, a);
        tree.add_child(root, b);

        assert!(tree.detach_child(root, a));
        assert!(!tree.detach_child(root, a));
        assert_eq!(tree[root].children(), &[b]);

        // The node survived detachment and keeps its id
        tree.add_child(root, a);
        assert_eq!(tree[root].children(), &[b, a]);
        assert_eq!(tree[a].id(), a);
    }

    #[test]
    fn test_descendant_count() {
        let mut tree = SceneTree::new();
        let root = tree.root();
        let a = tree.create_node(NodeKind::Geometry(GeometryPayload::empty()));
        let b = tree.create_node(NodeKind::Geometry(GeometryPayload::empty()));
        let c = tree.create_node(NodeKind::Geometry(GeometryPayload::empty()));
        tree.add_child(root, a);
        tree.add_child(a, b);
        tree.add_child(b, c);

        assert_eq!(tree.descendant_count(root), 3);
        assert_eq!(tree.descendant_count(b), 1);
    }
}
