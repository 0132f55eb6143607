//! # Mind Map Tree
//!
//! A mind map is an ordered tree of named, positioned nodes with exactly one
//! root. Nodes live in a flat slot arena; each record keeps its parent slot
//! and an ordered list of child slots. The parent link is a plain arena index
//! and never keeps anything alive: ownership always runs parent → children,
//! and removing a node removes its entire subtree from the arena.
//!
//! Callers address nodes by [NodeId]. Slots are an internal detail and never
//! leave this module.

use crate::{CanvasPoint, NodeId};
use slotmap::SlotMap;
use std::collections::HashMap;
use std::fmt;

slotmap::new_key_type! {
    struct NodeSlot;
}

/// Errors raised by structural tree operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TreeError {
    #[error("node {0} not found")]
    NodeNotFound(NodeId),
    /// The root has no parent to be detached from; deleting it means
    /// deleting the whole document.
    #[error("the root node can't be removed from its own map")]
    RootRemovalRefused,
    #[error("node id {0} is already in use")]
    DuplicateId(NodeId),
    #[error("nodes can't be nested deeper than {MAX_DEPTH} levels")]
    TooDeep,
}

/// Deepest level a node may sit at; the root is level 0.
///
/// Each level nests two JSON containers in a saved map, and the decoder
/// accepts at most 127 nested containers.
pub const MAX_DEPTH: usize = 60;

/// A single idea in the map.
#[derive(Debug, Clone)]
pub struct Node {
    id: NodeId,
    name: String,
    position: Option<CanvasPoint>,
    parent: Option<NodeSlot>,
    children: Vec<NodeSlot>,
}

impl Node {
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Display text. May be empty while the user is still typing.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Where the node sits in canvas space, once placed.
    pub fn position(&self) -> Option<CanvasPoint> {
        self.position
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    pub fn child_count(&self) -> usize {
        self.children.len()
    }
}

/// The document's node tree.
#[derive(Debug, Clone)]
pub struct MindMap {
    root: NodeSlot,
    nodes: SlotMap<NodeSlot, Node>,
    /// Maps node ids to their arena slots.
    index: HashMap<NodeId, NodeSlot>,
}

impl MindMap {
    /// Creates a map holding only a root node.
    pub fn new(root_name: impl Into<String>, position: Option<CanvasPoint>) -> Self {
        let id = NodeId::new();
        let mut nodes = SlotMap::with_key();
        let root = nodes.insert(Node {
            id,
            name: root_name.into(),
            position,
            parent: None,
            children: Vec::new(),
        });

        let mut index = HashMap::new();
        index.insert(id, root);

        Self { root, nodes, index }
    }

    pub fn root(&self) -> &Node {
        &self.nodes[self.root]
    }

    pub fn root_id(&self) -> NodeId {
        self.root().id
    }

    /// Number of nodes in the map, root included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.index.contains_key(&id)
    }

    /// Direct lookup through the id index.
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.index.get(&id).and_then(|&slot| self.nodes.get(slot))
    }

    /// Appends a new node to the end of `parent`'s children.
    pub fn add_child(
        &mut self,
        parent: NodeId,
        name: impl Into<String>,
        position: Option<CanvasPoint>,
    ) -> Result<NodeId, TreeError> {
        self.add_child_with_id(parent, NodeId::new(), name, position)
    }

    /// Like [MindMap::add_child], with a caller-chosen id.
    ///
    /// The node is created here, so it can never already be attached
    /// somewhere else in the tree.
    pub fn add_child_with_id(
        &mut self,
        parent: NodeId,
        id: NodeId,
        name: impl Into<String>,
        position: Option<CanvasPoint>,
    ) -> Result<NodeId, TreeError> {
        let parent_slot = self.slot(parent)?;
        if self.index.contains_key(&id) {
            return Err(TreeError::DuplicateId(id));
        }
        if self.slot_depth(parent_slot) >= MAX_DEPTH {
            return Err(TreeError::TooDeep);
        }

        let slot = self.nodes.insert(Node {
            id,
            name: name.into(),
            position,
            parent: Some(parent_slot),
            children: Vec::new(),
        });
        self.nodes[parent_slot].children.push(slot);
        self.index.insert(id, slot);

        Ok(id)
    }

    /// Depth-first search from the root, in child insertion order.
    pub fn search(&self, id: NodeId) -> Option<&Node> {
        self.iter().find(|node| node.id == id)
    }

    /// Removes a node together with its whole subtree.
    ///
    /// Returns the removed ids in pre-order. The root can't be removed this
    /// way.
    pub fn remove(&mut self, id: NodeId) -> Result<Vec<NodeId>, TreeError> {
        let slot = self.slot(id)?;
        let Some(parent) = self.nodes[slot].parent else {
            return Err(TreeError::RootRemovalRefused);
        };

        let doomed = self.subtree_slots(slot);
        self.nodes[parent].children.retain(|&child| child != slot);

        let mut removed = Vec::with_capacity(doomed.len());
        for slot in doomed {
            if let Some(node) = self.nodes.remove(slot) {
                self.index.remove(&node.id);
                removed.push(node.id);
            }
        }

        Ok(removed)
    }

    /// Number of parent hops between a node and the root (the root is 0).
    pub fn depth(&self, id: NodeId) -> Option<usize> {
        self.index.get(&id).map(|&slot| self.slot_depth(slot))
    }

    pub fn parent(&self, id: NodeId) -> Option<&Node> {
        let node = self.get(id)?;
        node.parent.and_then(|slot| self.nodes.get(slot))
    }

    /// Children of a node in insertion order. Empty when the id is unknown.
    pub fn children(&self, id: NodeId) -> impl Iterator<Item = &Node> + '_ {
        self.get(id)
            .map(|node| node.children.as_slice())
            .unwrap_or_default()
            .iter()
            .filter_map(|&slot| self.nodes.get(slot))
    }

    pub fn rename(&mut self, id: NodeId, name: impl Into<String>) -> Result<(), TreeError> {
        let slot = self.slot(id)?;
        self.nodes[slot].name = name.into();
        Ok(())
    }

    pub fn set_position(&mut self, id: NodeId, position: CanvasPoint) -> Result<(), TreeError> {
        let slot = self.slot(id)?;
        self.nodes[slot].position = Some(position);
        Ok(())
    }

    /// Pre-order walk of the subtree rooted at `id`.
    ///
    /// Yields nothing if `id` isn't in the map.
    pub fn pre_order(&self, id: NodeId) -> PreOrder<'_> {
        PreOrder {
            tree: self,
            stack: self.index.get(&id).copied().into_iter().collect(),
        }
    }

    /// Pre-order walk of the whole map.
    pub fn iter(&self) -> PreOrder<'_> {
        PreOrder {
            tree: self,
            stack: vec![self.root],
        }
    }

    fn slot(&self, id: NodeId) -> Result<NodeSlot, TreeError> {
        self.index
            .get(&id)
            .copied()
            .ok_or(TreeError::NodeNotFound(id))
    }

    fn slot_depth(&self, mut slot: NodeSlot) -> usize {
        let mut depth = 0;
        while let Some(parent) = self.nodes.get(slot).and_then(|node| node.parent) {
            depth += 1;
            slot = parent;
        }
        depth
    }

    fn subtree_slots(&self, slot: NodeSlot) -> Vec<NodeSlot> {
        let mut slots = Vec::new();
        let mut stack = vec![slot];
        while let Some(slot) = stack.pop() {
            slots.push(slot);
            if let Some(node) = self.nodes.get(slot) {
                stack.extend(node.children.iter().rev().copied());
            }
        }
        slots
    }

    fn write_outline(&self, f: &mut fmt::Formatter<'_>, slot: NodeSlot) -> fmt::Result {
        let node = &self.nodes[slot];
        write!(f, "{}", node.name)?;
        if node.children.is_empty() {
            return Ok(());
        }

        write!(f, " {{")?;
        for (i, &child) in node.children.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            self.write_outline(f, child)?;
        }
        write!(f, "}}")
    }
}

/// Renders the map as a one-line outline, e.g. `Trip {Flights {Hotel}, Food}`.
impl fmt::Display for MindMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_outline(f, self.root)
    }
}

/// Lazy pre-order traversal over a subtree.
///
/// Created by [MindMap::pre_order] and [MindMap::iter]. It is consumed as it
/// goes; start a new one to walk again.
pub struct PreOrder<'a> {
    tree: &'a MindMap,
    stack: Vec<NodeSlot>,
}

impl<'a> Iterator for PreOrder<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        let slot = self.stack.pop()?;
        let node = self.tree.nodes.get(slot)?;
        self.stack.extend(node.children.iter().rev().copied());
        Some(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// root -> [a -> [a1, a2], b]
    fn sample() -> (MindMap, [NodeId; 5]) {
        let mut map = MindMap::new("root", Some(CanvasPoint::new(1000.0, 1000.0)));
        let root = map.root_id();
        let a = map.add_child(root, "a", Some(CanvasPoint::new(900.0, 900.0))).unwrap();
        let a1 = map.add_child(a, "a1", Some(CanvasPoint::new(800.0, 850.0))).unwrap();
        let a2 = map.add_child(a, "a2", Some(CanvasPoint::new(800.0, 950.0))).unwrap();
        let b = map.add_child(root, "b", Some(CanvasPoint::new(1100.0, 1000.0))).unwrap();
        (map, [root, a, a1, a2, b])
    }

    #[test]
    fn test_new_map_has_single_root() {
        let map = MindMap::new("Trip Plan", None);
        assert_eq!(map.len(), 1);
        assert!(map.root().is_root());
        assert_eq!(map.root().name(), "Trip Plan");
        assert_eq!(map.children(map.root_id()).count(), 0);
    }

    #[test]
    fn test_add_child_sets_parent_and_order() {
        let (map, [root, a, a1, a2, b]) = sample();

        let names: Vec<_> = map.children(root).map(|n| n.name()).collect();
        assert_eq!(names, ["a", "b"]);
        let names: Vec<_> = map.children(a).map(|n| n.name()).collect();
        assert_eq!(names, ["a1", "a2"]);

        assert_eq!(map.parent(a1).unwrap().id(), a);
        assert_eq!(map.parent(a2).unwrap().id(), a);
        assert_eq!(map.parent(b).unwrap().id(), root);
        assert!(map.parent(root).is_none());
    }

    #[test]
    fn test_add_child_to_missing_parent() {
        let (mut map, _) = sample();
        let ghost = NodeId::from_u128(7);
        assert_eq!(
            map.add_child(ghost, "x", None),
            Err(TreeError::NodeNotFound(ghost))
        );
        assert_eq!(map.len(), 5);
    }

    #[test]
    fn test_duplicate_id_is_rejected() {
        let (mut map, [root, a, ..]) = sample();
        assert_eq!(
            map.add_child_with_id(root, a, "again", None),
            Err(TreeError::DuplicateId(a))
        );
    }

    #[test]
    fn test_depth_is_capped() {
        let mut map = MindMap::new("root", None);
        let mut tip = map.root_id();
        for _ in 0..MAX_DEPTH {
            tip = map.add_child(tip, "deeper", None).unwrap();
        }
        assert_eq!(map.depth(tip), Some(MAX_DEPTH));

        assert_eq!(map.add_child(tip, "too deep", None), Err(TreeError::TooDeep));
        assert_eq!(map.len(), MAX_DEPTH + 1);

        // Siblings at the cap's parent level are still fine.
        let parent = map.parent(tip).unwrap().id();
        assert!(map.add_child(parent, "sibling", None).is_ok());
    }

    #[test]
    fn test_search_finds_every_present_id() {
        let (map, ids) = sample();
        for id in ids {
            let found = map.search(id).expect("present id must be found");
            assert_eq!(found.id(), id);
            assert_eq!(map.get(id).unwrap().id(), id);
        }
        assert!(map.search(NodeId::from_u128(99)).is_none());
        assert!(map.get(NodeId::from_u128(99)).is_none());
    }

    #[test]
    fn test_depth() {
        let (map, [root, a, a1, a2, b]) = sample();
        assert_eq!(map.depth(root), Some(0));
        assert_eq!(map.depth(a), Some(1));
        assert_eq!(map.depth(b), Some(1));
        for id in [a, a1, a2, b] {
            let parent = map.parent(id).unwrap().id();
            assert_eq!(map.depth(id).unwrap(), map.depth(parent).unwrap() + 1);
        }
        assert_eq!(map.depth(NodeId::from_u128(99)), None);
    }

    #[test]
    fn test_pre_order() {
        let (map, [root, a, a1, a2, b]) = sample();
        let ids: Vec<_> = map.pre_order(root).map(|n| n.id()).collect();
        assert_eq!(ids, [root, a, a1, a2, b]);

        let ids: Vec<_> = map.pre_order(a).map(|n| n.id()).collect();
        assert_eq!(ids, [a, a1, a2]);

        assert_eq!(map.pre_order(NodeId::from_u128(99)).count(), 0);
    }

    #[test]
    fn test_remove_subtree() {
        let (mut map, [root, a, a1, a2, b]) = sample();
        let expected: Vec<_> = map.pre_order(a).map(|n| n.id()).collect();

        let removed = map.remove(a).unwrap();
        assert_eq!(removed, expected);
        assert_eq!(map.len(), 2);
        for id in [a, a1, a2] {
            assert!(map.search(id).is_none());
            assert!(!map.contains(id));
        }
        assert!(map.contains(root));
        assert!(map.contains(b));
        let names: Vec<_> = map.children(root).map(|n| n.name()).collect();
        assert_eq!(names, ["b"]);
    }

    #[test]
    fn test_remove_root_is_refused() {
        let (mut map, [root, ..]) = sample();
        assert_eq!(map.remove(root), Err(TreeError::RootRemovalRefused));
        assert_eq!(map.len(), 5);
    }

    #[test]
    fn test_remove_missing_node() {
        let (mut map, _) = sample();
        let ghost = NodeId::from_u128(5);
        assert_eq!(map.remove(ghost), Err(TreeError::NodeNotFound(ghost)));
    }

    #[test]
    fn test_rename_and_move() {
        let (mut map, [_, a, ..]) = sample();
        map.rename(a, "Flights").unwrap();
        map.set_position(a, CanvasPoint::new(1.0, 2.0)).unwrap();
        let node = map.get(a).unwrap();
        assert_eq!(node.name(), "Flights");
        assert_eq!(node.position(), Some(CanvasPoint::new(1.0, 2.0)));
    }

    #[test]
    fn test_outline() {
        let (map, _) = sample();
        assert_eq!(map.to_string(), "root {a {a1, a2}, b}");
    }
}
