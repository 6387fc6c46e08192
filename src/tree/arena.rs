//! Arena-backed element tree with generation-checked handles.
//!
//! Every node lives in a [`SlotMap`]; a [`NodeId`] carries the slot index and
//! its generation.  Removing a node bumps the generation of its slot, so any
//! handle still pointing at it (a parent's child list, the navigation cursor)
//! resolves to `None` instead of to whatever reuses the slot later.
//!
//! Each tree also carries a [`TreeEpoch`].  Handles are only meaningful
//! within the tree that issued them; callers that keep a handle across
//! snapshots pair it with the epoch and compare before resolving.

use std::sync::atomic::{AtomicU64, Ordering};

use slotmap::{new_key_type, SlotMap};
use thiserror::Error;

use super::node::{NodeSpec, UiNode};

new_key_type! {
    /// Handle to a node in a [`UiTree`].
    pub struct NodeId;
}

/// Identity of one tree snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TreeEpoch(u64);

static NEXT_EPOCH: AtomicU64 = AtomicU64::new(1);

impl TreeEpoch {
    fn next() -> Self {
        Self(NEXT_EPOCH.fetch_add(1, Ordering::Relaxed))
    }
}

/// Errors raised while building a tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TreeError {
    #[error("node {0:?} is not in the tree")]
    UnknownNode(NodeId),
}

// ---------------------------------------------------------------------------
// UiTree
// ---------------------------------------------------------------------------

/// Snapshot of the host's element tree.
///
/// The tree does not enforce acyclicity: hosts may hand over malformed
/// structures and every traversal guards against revisiting nodes.
#[derive(Debug, Clone)]
pub struct UiTree {
    nodes: SlotMap<NodeId, UiNode>,
    root: Option<NodeId>,
    epoch: TreeEpoch,
}

impl UiTree {
    pub fn new() -> Self {
        Self {
            nodes: SlotMap::with_key(),
            root: None,
            epoch: TreeEpoch::next(),
        }
    }

    /// Create a tree containing only `root`.
    pub fn with_root(root: UiNode) -> (Self, NodeId) {
        let mut tree = Self::new();
        let id = tree.insert(root);
        tree.root = Some(id);
        (tree, id)
    }

    /// Build a tree from a nested host description.
    pub fn from_spec(spec: &NodeSpec) -> Self {
        let (mut tree, root) = Self::with_root(spec.to_node());

        // Explicit stack: host trees can be deeper than the call stack allows.
        let mut pending: Vec<(NodeId, &NodeSpec)> = vec![(root, spec)];
        while let Some((parent, parent_spec)) = pending.pop() {
            for child_spec in &parent_spec.children {
                let child = tree.insert(child_spec.to_node());
                tree.nodes[parent].children.push(child);
                pending.push((child, child_spec));
            }
        }
        tree
    }

    pub fn epoch(&self) -> TreeEpoch {
        self.epoch
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn set_root(&mut self, id: NodeId) -> Result<(), TreeError> {
        if !self.nodes.contains_key(id) {
            return Err(TreeError::UnknownNode(id));
        }
        self.root = Some(id);
        Ok(())
    }

    /// Insert a detached node.
    pub fn insert(&mut self, node: UiNode) -> NodeId {
        self.nodes.insert(node)
    }

    /// Insert `node` and append it to `parent`'s children.
    pub fn add_child(&mut self, parent: NodeId, node: UiNode) -> Result<NodeId, TreeError> {
        if !self.nodes.contains_key(parent) {
            return Err(TreeError::UnknownNode(parent));
        }
        let child = self.nodes.insert(node);
        self.nodes[parent].children.push(child);
        Ok(child)
    }

    /// Append an existing node to `parent`'s children.
    ///
    /// No structural checks are made, so this can express the shared and
    /// cyclic links a misbehaving host produces.
    pub fn link(&mut self, parent: NodeId, child: NodeId) -> Result<(), TreeError> {
        if !self.nodes.contains_key(child) {
            return Err(TreeError::UnknownNode(child));
        }
        let node = self
            .nodes
            .get_mut(parent)
            .ok_or(TreeError::UnknownNode(parent))?;
        node.children.push(child);
        Ok(())
    }

    /// Remove a node, leaving every handle to it stale.
    ///
    /// Its children stay in the arena but are unreachable through it.
    pub fn remove(&mut self, id: NodeId) -> Option<UiNode> {
        if self.root == Some(id) {
            self.root = None;
        }
        self.nodes.remove(id)
    }

    /// Resolve a handle; stale handles yield `None`.
    pub fn get(&self, id: NodeId) -> Option<&UiNode> {
        self.nodes.get(id)
    }

    /// Resolve a handle issued by the snapshot `epoch`.  Handles from any
    /// other snapshot yield `None`, even if their slot is occupied here.
    pub fn resolve(&self, epoch: TreeEpoch, id: NodeId) -> Option<&UiNode> {
        if epoch != self.epoch {
            return None;
        }
        self.nodes.get(id)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut UiNode> {
        self.nodes.get_mut(id)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Children of `id`, or an empty slice when the handle is stale.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes.get(id).map(UiNode::children).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl Default for UiTree {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_child_keeps_order() {
        let (mut tree, root) = UiTree::with_root(UiNode::new());
        let a = tree.add_child(root, UiNode::new().with_text("a")).unwrap();
        let b = tree.add_child(root, UiNode::new().with_text("b")).unwrap();
        assert_eq!(tree.children(root), &[a, b]);
        assert_eq!(tree.len(), 3);
    }

    #[test]
    fn removed_handle_is_stale() {
        let (mut tree, root) = UiTree::with_root(UiNode::new());
        let child = tree.add_child(root, UiNode::new().with_text("gone")).unwrap();
        tree.remove(child);

        assert!(tree.get(child).is_none());
        assert!(tree.children(child).is_empty());
        // The parent still lists the dead handle.
        assert_eq!(tree.children(root), &[child]);
    }

    #[test]
    fn resolve_rejects_handles_from_another_snapshot() {
        let (first, first_root) = UiTree::with_root(UiNode::new().with_text("first"));
        let (second, second_root) = UiTree::with_root(UiNode::new().with_text("second"));
        assert_eq!(first_root, second_root);

        assert!(second.get(first_root).is_some());
        assert!(second.resolve(first.epoch(), first_root).is_none());
        assert_eq!(
            second.resolve(second.epoch(), second_root).and_then(UiNode::spoken_label),
            Some("second")
        );
    }

    #[test]
    fn reused_slot_does_not_resurrect_old_handle() {
        let (mut tree, root) = UiTree::with_root(UiNode::new());
        let old = tree.add_child(root, UiNode::new().with_text("old")).unwrap();
        tree.remove(old);
        let new = tree.insert(UiNode::new().with_text("new"));

        assert_ne!(old, new);
        assert!(tree.get(old).is_none());
        assert_eq!(tree.get(new).unwrap().text, "new");
    }

    #[test]
    fn removing_root_clears_it() {
        let (mut tree, root) = UiTree::with_root(UiNode::new());
        tree.remove(root);
        assert_eq!(tree.root(), None);
    }

    #[test]
    fn link_rejects_unknown_nodes() {
        let (mut tree, root) = UiTree::with_root(UiNode::new());
        let child = tree.add_child(root, UiNode::new()).unwrap();
        tree.remove(child);
        assert_eq!(tree.link(root, child), Err(TreeError::UnknownNode(child)));
        assert!(tree.set_root(child).is_err());
    }

    #[test]
    fn link_allows_cycles() {
        let (mut tree, root) = UiTree::with_root(UiNode::new());
        let child = tree.add_child(root, UiNode::new()).unwrap();
        tree.link(child, root).unwrap();
        assert_eq!(tree.children(child), &[root]);
    }

    #[test]
    fn from_spec_preserves_shape() {
        let spec = NodeSpec {
            tag: "Root".into(),
            children: vec![
                NodeSpec {
                    text: "first".into(),
                    children: vec![NodeSpec {
                        text: "nested".into(),
                        ..NodeSpec::default()
                    }],
                    ..NodeSpec::default()
                },
                NodeSpec {
                    text: "second".into(),
                    ..NodeSpec::default()
                },
            ],
            ..NodeSpec::default()
        };

        let tree = UiTree::from_spec(&spec);
        let root = tree.root().unwrap();
        let kids = tree.children(root);
        assert_eq!(kids.len(), 2);
        assert_eq!(tree.get(kids[0]).unwrap().text, "first");
        assert_eq!(tree.get(kids[1]).unwrap().text, "second");

        let nested = tree.children(kids[0]);
        assert_eq!(tree.get(nested[0]).unwrap().text, "nested");
    }

    #[test]
    fn every_tree_has_its_own_epoch() {
        let a = UiTree::new();
        let b = UiTree::new();
        assert_ne!(a.epoch(), b.epoch());
        assert_eq!(a.clone().epoch(), a.epoch());
    }
}
