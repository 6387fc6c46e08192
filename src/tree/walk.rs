//! Bounded pre-order traversal shared by the content extractor and the
//! navigation cursor.
//!
//! The walk is iterative, never visits a node twice in one pass, skips stale
//! handles as empty subtrees, and stops descending past `max_depth` or after
//! yielding `max_nodes` nodes.

use std::collections::HashSet;

use super::arena::{NodeId, UiTree};
use super::node::UiNode;

/// Sibling order used when descending.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChildOrder {
    /// First child first.
    Forward,
    /// Last child first.
    Reverse,
}

/// Upper bounds that keep a traversal inside the host's event-processing
/// time budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WalkLimits {
    /// Nodes deeper than this (root = 0) are not visited.
    pub max_depth: usize,
    /// The walk ends after this many nodes.
    pub max_nodes: usize,
}

impl Default for WalkLimits {
    fn default() -> Self {
        Self {
            max_depth: 128,
            max_nodes: 10_000,
        }
    }
}

/// Pre-order iterator over the nodes reachable from a root.
pub struct PreOrder<'a> {
    tree: &'a UiTree,
    order: ChildOrder,
    limits: WalkLimits,
    stack: Vec<(NodeId, usize)>,
    visited: HashSet<NodeId>,
    yielded: usize,
    stale: usize,
}

impl<'a> PreOrder<'a> {
    pub fn new(tree: &'a UiTree, root: NodeId, order: ChildOrder, limits: WalkLimits) -> Self {
        Self {
            tree,
            order,
            limits,
            stack: vec![(root, 0)],
            visited: HashSet::new(),
            yielded: 0,
            stale: 0,
        }
    }

    /// Stale handles skipped so far.
    pub fn stale_count(&self) -> usize {
        self.stale
    }

    /// `true` once the node budget is spent with work still pending.
    pub fn hit_node_limit(&self) -> bool {
        self.yielded >= self.limits.max_nodes && !self.stack.is_empty()
    }
}

impl<'a> Iterator for PreOrder<'a> {
    type Item = (NodeId, &'a UiNode);

    fn next(&mut self) -> Option<Self::Item> {
        if self.yielded >= self.limits.max_nodes {
            return None;
        }

        let tree = self.tree;
        while let Some((id, depth)) = self.stack.pop() {
            if !self.visited.insert(id) {
                continue;
            }
            let Some(node) = tree.get(id) else {
                self.stale += 1;
                continue;
            };

            if depth < self.limits.max_depth {
                // The stack pops last-in first, so push in the opposite order
                // to the one we want to visit.
                let children = node.children().iter().map(|&child| (child, depth + 1));
                match self.order {
                    ChildOrder::Forward => self.stack.extend(children.rev()),
                    ChildOrder::Reverse => self.stack.extend(children),
                }
            }

            self.yielded += 1;
            return Some((id, node));
        }
        None
    }
}
