//! Change notifications as delivered by the host.

use crate::tree::{NodeId, TreeEpoch};

/// Kinds the dispatcher knows how to announce.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventKind {
    ScreenChanged,
    ElementFocused,
    ElementActivated,
    Announcement,
    TextChanged,
    /// Anything else; carried so it can be logged, then ignored.
    Unrecognized(String),
}

impl EventKind {
    /// Map a host kind name onto an [`EventKind`].
    ///
    /// Accepts the snake_case variant names as well as the host's
    /// accessibility event names (`window_state_changed`, `view_focused`, …).
    pub fn classify(name: &str) -> Self {
        match name.trim() {
            "screen_changed" | "window_state_changed" => EventKind::ScreenChanged,
            "element_focused" | "view_focused" => EventKind::ElementFocused,
            "element_activated" | "view_clicked" => EventKind::ElementActivated,
            "announcement" => EventKind::Announcement,
            "text_changed" | "view_text_changed" => EventKind::TextChanged,
            other => EventKind::Unrecognized(other.to_owned()),
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, EventKind::Unrecognized(_))
    }
}

/// One host notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeNotification {
    pub kind: EventKind,
    /// Element the event is about, with the snapshot that issued the handle.
    pub source: Option<(TreeEpoch, NodeId)>,
    /// Event text; multi-part texts are already joined.
    pub text: String,
    pub description: String,
    /// Package / application identifier of the foreground app.
    pub app_id: String,
}

impl ChangeNotification {
    pub fn new(kind: EventKind) -> Self {
        Self {
            kind,
            source: None,
            text: String::new(),
            description: String::new(),
            app_id: String::new(),
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_app_id(mut self, app_id: impl Into<String>) -> Self {
        self.app_id = app_id.into();
        self
    }

    pub fn with_source(mut self, epoch: TreeEpoch, id: NodeId) -> Self {
        self.source = Some((epoch, id));
        self
    }
}
