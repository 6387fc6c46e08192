//! UI element snapshots held in a [`UiTree`](super::UiTree).

use serde::{Deserialize, Serialize};

use super::arena::NodeId;

// ---------------------------------------------------------------------------
// InteractiveFlags
// ---------------------------------------------------------------------------

/// The four host flags that make an element reachable by the navigation
/// cursor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InteractiveFlags {
    pub clickable: bool,
    pub long_clickable: bool,
    pub checkable: bool,
    pub editable: bool,
}

impl InteractiveFlags {
    /// `true` when any flag is set.
    pub fn any(self) -> bool {
        self.clickable || self.long_clickable || self.checkable || self.editable
    }
}

// ---------------------------------------------------------------------------
// UiNode
// ---------------------------------------------------------------------------

/// Owned snapshot of one on-screen element.
///
/// Children are handles into the same tree; a handle whose node has since
/// been removed resolves to nothing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UiNode {
    pub text: String,
    pub description: String,
    /// Host classification string, e.g. `android.widget.Button`.
    pub tag: String,
    pub flags: InteractiveFlags,
    pub(crate) children: Vec<NodeId>,
}

impl UiNode {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    pub fn with_flags(mut self, flags: InteractiveFlags) -> Self {
        self.flags = flags;
        self
    }

    pub fn clickable(mut self) -> Self {
        self.flags.clickable = true;
        self
    }

    pub fn long_clickable(mut self) -> Self {
        self.flags.long_clickable = true;
        self
    }

    pub fn checkable(mut self) -> Self {
        self.flags.checkable = true;
        self
    }

    pub fn editable(mut self) -> Self {
        self.flags.editable = true;
        self
    }

    /// Child handles in host order.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn is_interactive(&self) -> bool {
        self.flags.any()
    }

    /// Short label used when the element is announced on its own: the text
    /// if it has any, otherwise the description.
    pub fn spoken_label(&self) -> Option<&str> {
        non_blank(&self.text).or_else(|| non_blank(&self.description))
    }
}

/// `Some(trimmed)` unless `s` is empty or whitespace only.
pub(crate) fn non_blank(s: &str) -> Option<&str> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

// ---------------------------------------------------------------------------
// NodeSpec
// ---------------------------------------------------------------------------

/// Nested, serialisable description of a subtree as delivered by a host.
///
/// ```
/// use screen_narrator::tree::{NodeSpec, UiTree};
///
/// let spec: NodeSpec = serde_json::from_str(
///     r#"{"tag": "Frame", "children": [{"text": "OK", "clickable": true}]}"#,
/// ).unwrap();
/// let tree = UiTree::from_spec(&spec);
/// assert_eq!(tree.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NodeSpec {
    pub text: String,
    pub description: String,
    pub tag: String,
    #[serde(flatten)]
    pub flags: InteractiveFlags,
    pub children: Vec<NodeSpec>,
}

impl NodeSpec {
    /// The node itself, without its children.
    pub(crate) fn to_node(&self) -> UiNode {
        UiNode {
            text: self.text.clone(),
            description: self.description.clone(),
            tag: self.tag.clone(),
            flags: self.flags,
            children: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_flags_is_not_interactive() {
        assert!(!UiNode::new().with_text("label").is_interactive());
    }

    #[test]
    fn each_flag_alone_is_interactive() {
        assert!(UiNode::new().clickable().is_interactive());
        assert!(UiNode::new().long_clickable().is_interactive());
        assert!(UiNode::new().checkable().is_interactive());
        assert!(UiNode::new().editable().is_interactive());
    }

    #[test]
    fn spoken_label_prefers_text() {
        let node = UiNode::new().with_text("Send").with_description("send button");
        assert_eq!(node.spoken_label(), Some("Send"));
    }

    #[test]
    fn spoken_label_falls_back_to_description() {
        let node = UiNode::new().with_text("   ").with_description("Close");
        assert_eq!(node.spoken_label(), Some("Close"));
        assert_eq!(UiNode::new().spoken_label(), None);
    }

    #[test]
    fn spec_reads_camel_case_flags() {
        let spec: NodeSpec =
            serde_json::from_str(r#"{"text": "Hold", "longClickable": true}"#).unwrap();
        assert!(spec.flags.long_clickable);
        assert!(!spec.flags.clickable);
        assert!(spec.children.is_empty());
    }
}
