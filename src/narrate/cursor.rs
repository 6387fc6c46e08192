//! Interactive-element navigation.
//!
//! Both directions run a fresh pre-order search below the supplied root and
//! stop at the first interactive descendant.  The root itself is never a
//! candidate, so a clickable window container does not hide the controls
//! inside it.  The search never starts from the
//! current position, so calling `navigate_next` twice against the same tree
//! lands on the same node both times.
//!
//! The cursor is stamped with the epoch of the tree it was set in.  Once the
//! host replaces the tree, [`NavigationCursor::current_node`] resolves to
//! `None` even if a handle with the same index exists in the new snapshot.

use crate::tree::{ChildOrder, NodeId, PreOrder, TreeEpoch, UiTree, WalkLimits};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Next,
    Previous,
}

impl Direction {
    fn child_order(self) -> ChildOrder {
        match self {
            Direction::Next => ChildOrder::Forward,
            Direction::Previous => ChildOrder::Reverse,
        }
    }
}

/// A successful navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationHit {
    pub node: NodeId,
    /// What to speak; `None` when the node has neither text nor description.
    pub announcement: Option<String>,
}

/// First interactive descendant of `root` in the given sibling order.
pub fn find_interactive(
    tree: &UiTree,
    root: NodeId,
    order: ChildOrder,
    limits: WalkLimits,
) -> Option<NodeId> {
    PreOrder::new(tree, root, order, limits)
        .find(|&(id, node)| id != root && node.is_interactive())
        .map(|(id, _)| id)
}

/// Holds at most one current element.
#[derive(Debug, Clone, Default)]
pub struct NavigationCursor {
    current: Option<(TreeEpoch, NodeId)>,
    limits: WalkLimits,
}

impl NavigationCursor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limits(limits: WalkLimits) -> Self {
        Self {
            current: None,
            limits,
        }
    }

    /// Raw handle last set, regardless of which tree issued it.
    pub fn current(&self) -> Option<NodeId> {
        self.current.map(|(_, id)| id)
    }

    /// The current element if it still exists in `tree`.
    pub fn current_node(&self, tree: &UiTree) -> Option<NodeId> {
        let (epoch, id) = self.current?;
        tree.resolve(epoch, id).map(|_| id)
    }

    pub fn clear(&mut self) {
        self.current = None;
    }

    pub fn navigate_next(&mut self, tree: &UiTree, root: NodeId) -> Option<NavigationHit> {
        self.navigate(tree, root, Direction::Next)
    }

    pub fn navigate_previous(&mut self, tree: &UiTree, root: NodeId) -> Option<NavigationHit> {
        self.navigate(tree, root, Direction::Previous)
    }

    /// Move to the first interactive node in `direction`.  On a miss the
    /// cursor is left where it was.
    pub fn navigate(
        &mut self,
        tree: &UiTree,
        root: NodeId,
        direction: Direction,
    ) -> Option<NavigationHit> {
        let Some(id) = find_interactive(tree, root, direction.child_order(), self.limits) else {
            log::debug!("cursor: no interactive element ({direction:?})");
            return None;
        };

        self.current = Some((tree.epoch(), id));
        let announcement = tree
            .get(id)
            .and_then(|node| node.spoken_label())
            .map(str::to_owned);
        Some(NavigationHit {
            node: id,
            announcement,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
