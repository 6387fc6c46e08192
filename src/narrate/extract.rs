//! Whole-screen reading: walk a tree once and build a single spoken string.
//!
//! For every visited node, in order:
//!
//! 1. its text, if not blank;
//! 2. its description, if not blank and different from the text;
//! 3. its role label, if the tag is recognised;
//!
//! then its children, first to last.  Each fragment is closed with
//! [`FRAGMENT_TERMINATOR`] and fragments are joined with a space, so
//! `[A("Hello"), B(description "World")]` reads `"Hello. World."`.
//!
//! The string is only produced after the walk completes; nothing is spoken
//! while the tree is still being read.

use crate::tree::node::non_blank;
use crate::tree::{ChildOrder, NodeId, PreOrder, UiNode, UiTree, WalkLimits};

use super::role::RoleTable;

/// Appended to every fragment.
pub const FRAGMENT_TERMINATOR: &str = ".";

/// Bounds on one extraction pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractLimits {
    /// Fragments beyond this count are dropped and the walk stops.
    pub max_fragments: usize,
    pub walk: WalkLimits,
}

impl Default for ExtractLimits {
    fn default() -> Self {
        Self {
            max_fragments: 500,
            walk: WalkLimits::default(),
        }
    }
}

/// Result of one extraction pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    /// The spoken string; empty when no node contributed a fragment.
    pub text: String,
    pub fragments: usize,
    pub nodes_visited: usize,
    /// Stale handles met during the walk.
    pub stale_nodes: usize,
    /// `true` when a fragment or node limit cut the walk short.
    pub truncated: bool,
}

impl Extraction {
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Builds the spoken form of a subtree.
#[derive(Debug, Clone, Default)]
pub struct ContentExtractor {
    roles: RoleTable,
    limits: ExtractLimits,
}

impl ContentExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limits(mut self, limits: ExtractLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn with_roles(mut self, roles: RoleTable) -> Self {
        self.roles = roles;
        self
    }

    /// Read the subtree under `root`.
    pub fn extract(&self, tree: &UiTree, root: NodeId) -> Extraction {
        let mut walk = PreOrder::new(tree, root, ChildOrder::Forward, self.limits.walk);
        let mut fragments: Vec<&str> = Vec::new();
        let mut nodes_visited = 0;
        let mut truncated = false;

        'walk: for (_, node) in walk.by_ref() {
            nodes_visited += 1;
            for fragment in self.fragments_of(node) {
                if fragments.len() == self.limits.max_fragments {
                    truncated = true;
                    break 'walk;
                }
                fragments.push(fragment);
            }
        }
        truncated |= walk.hit_node_limit();

        if truncated {
            log::debug!(
                "extract: stopped after {} fragments / {} nodes",
                fragments.len(),
                nodes_visited
            );
        }

        let text = fragments
            .iter()
            .map(|f| format!("{f}{FRAGMENT_TERMINATOR}"))
            .collect::<Vec<_>>()
            .join(" ");

        Extraction {
            text,
            fragments: fragments.len(),
            nodes_visited,
            stale_nodes: walk.stale_count(),
            truncated,
        }
    }

    /// Read the whole tree from its root.  `None` when the tree has no root.
    pub fn extract_tree(&self, tree: &UiTree) -> Option<Extraction> {
        tree.root().map(|root| self.extract(tree, root))
    }

    fn fragments_of<'n>(&self, node: &'n UiNode) -> impl Iterator<Item = &'n str> {
        let text = non_blank(&node.text);
        let description = non_blank(&node.description).filter(|d| Some(*d) != text);
        let role = non_blank(self.roles.classify(&node.tag));
        [text, description, role].into_iter().flatten()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::NodeSpec;

    fn extractor() -> ContentExtractor {
        ContentExtractor::new()
    }

    #[test]
    fn text_then_description_fallback() {
        let (mut tree, root) = UiTree::with_root(UiNode::new());
        tree.add_child(root, UiNode::new().with_text("Hello")).unwrap();
        tree.add_child(root, UiNode::new().with_description("World")).unwrap();

        let out = extractor().extract(&tree, root);
        assert_eq!(out.text, "Hello. World.");
        assert_eq!(out.fragments, 2);
        assert_eq!(out.nodes_visited, 3);
        assert!(!out.truncated);
    }

    #[test]
    fn fragment_order_is_text_description_role() {
        let (tree, root) = UiTree::with_root(
            UiNode::new()
                .with_text("Save")
                .with_description("Save the document")
                .with_tag("android.widget.Button"),
        );
        assert_eq!(
            extractor().extract(&tree, root).text,
            "Save. Save the document. button."
        );
    }

    #[test]
    fn description_equal_to_text_is_not_repeated() {
        let (tree, root) = UiTree::with_root(UiNode::new().with_text("OK").with_description("OK"));
        assert_eq!(extractor().extract(&tree, root).text, "OK.");
    }

    #[test]
    fn role_alone_is_spoken() {
        let (tree, root) = UiTree::with_root(UiNode::new().with_tag("android.widget.ImageView"));
        assert_eq!(extractor().extract(&tree, root).text, "image.");
    }

    #[test]
    fn all_empty_yields_empty_string() {
        let (mut tree, root) = UiTree::with_root(UiNode::new().with_tag("FrameLayout"));
        tree.add_child(root, UiNode::new().with_text("  ")).unwrap();

        let out = extractor().extract(&tree, root);
        assert!(out.is_empty());
        assert_eq!(out.fragments, 0);
    }

    #[test]
    fn children_follow_their_parent_in_order() {
        let spec: NodeSpec = serde_json::from_str(
            r#"{"text": "Settings", "children": [
                   {"text": "Wi-Fi", "children": [{"text": "On"}]},
                   {"text": "Bluetooth"}
               ]}"#,
        )
        .unwrap();
        let tree = UiTree::from_spec(&spec);
        assert_eq!(
            extractor().extract_tree(&tree).unwrap().text,
            "Settings. Wi-Fi. On. Bluetooth."
        );
    }

    #[test]
    fn every_node_of_an_acyclic_tree_is_visited_once() {
        let (mut tree, root) = UiTree::with_root(UiNode::new().with_text("n0"));
        let mut frontier = vec![root];
        let mut count = 1;
        for depth in 0..4 {
            let mut next = Vec::new();
            for parent in frontier {
                for i in 0..3 {
                    let id = tree
                        .add_child(parent, UiNode::new().with_text(format!("d{depth}c{i}")))
                        .unwrap();
                    next.push(id);
                    count += 1;
                }
            }
            frontier = next;
        }

        let out = extractor().extract(&tree, root);
        assert_eq!(out.nodes_visited, count);
        assert_eq!(out.fragments, count);
        assert!(!out.truncated);
    }

    #[test]
    fn cycle_terminates() {
        let (mut tree, root) = UiTree::with_root(UiNode::new().with_text("loop"));
        let child = tree.add_child(root, UiNode::new().with_text("back")).unwrap();
        tree.link(child, root).unwrap();

        assert_eq!(extractor().extract(&tree, root).text, "loop. back.");
    }

    #[test]
    fn stale_subtree_is_skipped() {
        let (mut tree, root) = UiTree::with_root(UiNode::new());
        tree.add_child(root, UiNode::new().with_text("before")).unwrap();
        let gone = tree.add_child(root, UiNode::new().with_text("gone")).unwrap();
        tree.add_child(gone, UiNode::new().with_text("inside")).unwrap();
        tree.add_child(root, UiNode::new().with_text("after")).unwrap();
        tree.remove(gone);

        let out = extractor().extract(&tree, root);
        assert_eq!(out.text, "before. after.");
        assert_eq!(out.stale_nodes, 1);
    }

    #[test]
    fn fragment_limit_truncates() {
        let (mut tree, root) = UiTree::with_root(UiNode::new());
        for i in 0..10 {
            tree.add_child(root, UiNode::new().with_text(format!("item {i}")))
                .unwrap();
        }
        let limited = extractor().with_limits(ExtractLimits {
            max_fragments: 3,
            ..ExtractLimits::default()
        });

        let out = limited.extract(&tree, root);
        assert_eq!(out.text, "item 0. item 1. item 2.");
        assert!(out.truncated);
    }

    #[test]
    fn exact_fragment_budget_is_not_truncation() {
        let (mut tree, root) = UiTree::with_root(UiNode::new());
        tree.add_child(root, UiNode::new().with_text("a")).unwrap();
        tree.add_child(root, UiNode::new().with_text("b")).unwrap();
        let limited = extractor().with_limits(ExtractLimits {
            max_fragments: 2,
            ..ExtractLimits::default()
        });
        assert!(!limited.extract(&tree, root).truncated);
    }

    #[test]
    fn tree_without_root_has_nothing_to_read() {
        assert!(extractor().extract_tree(&UiTree::new()).is_none());
    }
}
