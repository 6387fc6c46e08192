//! Notification → announcement decisions.
//!
//! | kind             | gates                                 | spoken text                    |
//! |------------------|---------------------------------------|--------------------------------|
//! | ScreenChanged    | announce screen changes               | "opened <app>" (+ auto read)   |
//! | ElementFocused   | announce form fields OR buttons       | text, else description         |
//! | ElementActivated | none                                  | "activated"                    |
//! | Announcement     | none                                  | event text                     |
//! | TextChanged      | none                                  | event text                     |
//!
//! The dispatcher only decides.  The caller speaks the announcement and, when
//! asked, runs a whole-screen read on the current root.

use crate::config::{ConfigSnapshot, Gate};
use crate::tree::node::non_blank;
use crate::tree::UiNode;

use super::notification::{ChangeNotification, EventKind};

/// Fixed phrases used in announcements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Phrases {
    /// Prefix for screen changes: "opened <app>".
    pub opened: String,
    pub activated: String,
    /// Stands in for a missing application id.
    pub unknown_app: String,
}

impl Default for Phrases {
    fn default() -> Self {
        Self {
            opened: "opened".into(),
            activated: "activated".into(),
            unknown_app: "unknown application".into(),
        }
    }
}

/// What to do about one notification.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dispatch {
    pub announcement: Option<String>,
    /// Follow the announcement with a whole-screen read.
    pub read_screen: bool,
}

impl Dispatch {
    fn silent() -> Self {
        Self::default()
    }

    fn say(text: &str) -> Self {
        Self {
            announcement: non_blank(text).map(str::to_owned),
            read_screen: false,
        }
    }
}

/// Gates that must have at least one open member for `kind` to be spoken.
pub fn gates_for(kind: &EventKind) -> &'static [Gate] {
    match kind {
        EventKind::ScreenChanged => &[Gate::AnnounceScreenChanges],
        EventKind::ElementFocused => &[Gate::AnnounceFormFields, Gate::AnnounceButtons],
        EventKind::ElementActivated
        | EventKind::Announcement
        | EventKind::TextChanged
        | EventKind::Unrecognized(_) => &[],
    }
}

#[derive(Debug, Clone, Default)]
pub struct EventDispatcher {
    phrases: Phrases,
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_phrases(phrases: Phrases) -> Self {
        Self { phrases }
    }

    pub fn phrases(&self) -> &Phrases {
        &self.phrases
    }

    /// Decide what `notification` should produce.  `source` is the resolved
    /// source element, if the notification named one that still exists.
    pub fn dispatch(
        &self,
        notification: &ChangeNotification,
        source: Option<&UiNode>,
        config: &ConfigSnapshot,
    ) -> Dispatch {
        let kind = &notification.kind;
        if let EventKind::Unrecognized(name) = kind {
            log::debug!("events: ignoring {name:?}");
            return Dispatch::silent();
        }
        if !config.any_open(gates_for(kind)) {
            log::debug!("events: {kind:?} gated off");
            return Dispatch::silent();
        }

        match kind {
            EventKind::ScreenChanged => {
                let app = non_blank(&notification.app_id)
                    .unwrap_or(self.phrases.unknown_app.as_str());
                Dispatch {
                    announcement: Some(format!("{} {app}", self.phrases.opened)),
                    read_screen: config.gate(Gate::AutoRead),
                }
            }
            EventKind::ElementFocused => {
                let label = non_blank(&notification.text)
                    .or_else(|| non_blank(&notification.description))
                    .or_else(|| source.and_then(UiNode::spoken_label));
                Dispatch {
                    announcement: label.map(str::to_owned),
                    read_screen: false,
                }
            }
            EventKind::ElementActivated => Dispatch::say(&self.phrases.activated),
            EventKind::Announcement | EventKind::TextChanged => Dispatch::say(&notification.text),
            EventKind::Unrecognized(_) => Dispatch::silent(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn dispatcher() -> EventDispatcher {
        EventDispatcher::new()
    }

    fn note(kind: EventKind) -> ChangeNotification {
        ChangeNotification::new(kind)
    }

    #[test]
    fn screen_change_announces_app_and_requests_read() {
        let d = dispatcher().dispatch(
            &note(EventKind::ScreenChanged).with_app_id("com.example.mail"),
            None,
            &ConfigSnapshot::default(),
        );
        assert_eq!(d.announcement.as_deref(), Some("opened com.example.mail"));
        assert!(d.read_screen);
    }

    #[test]
    fn screen_change_without_auto_read_only_announces() {
        let config = ConfigSnapshot {
            auto_read: false,
            ..ConfigSnapshot::default()
        };
        let d = dispatcher().dispatch(&note(EventKind::ScreenChanged), None, &config);
        assert_eq!(d.announcement.as_deref(), Some("opened unknown application"));
        assert!(!d.read_screen);
    }

    #[test]
    fn closed_screen_change_gate_is_silent() {
        let config = ConfigSnapshot {
            announce_screen_changes: false,
            ..ConfigSnapshot::default()
        };
        let d = dispatcher().dispatch(
            &note(EventKind::ScreenChanged).with_app_id("app"),
            None,
            &config,
        );
        assert_eq!(d, Dispatch::default());
    }

    #[test]
    fn focus_needs_either_gate() {
        let focus = note(EventKind::ElementFocused).with_text("Name");
        let only_buttons = ConfigSnapshot {
            announce_form_fields: false,
            ..ConfigSnapshot::default()
        };
        let neither = ConfigSnapshot {
            announce_buttons: false,
            ..only_buttons.clone()
        };

        assert_eq!(
            dispatcher().dispatch(&focus, None, &only_buttons).announcement.as_deref(),
            Some("Name")
        );
        assert_eq!(dispatcher().dispatch(&focus, None, &neither).announcement, None);
    }

    #[test]
    fn focus_text_precedence() {
        let config = ConfigSnapshot::default();
        let both = note(EventKind::ElementFocused)
            .with_text("Text")
            .with_description("Desc");
        let desc_only = note(EventKind::ElementFocused)
            .with_text(" ")
            .with_description("Desc");
        let source = UiNode::new().with_description("From node");

        let d = dispatcher();
        assert_eq!(d.dispatch(&both, None, &config).announcement.as_deref(), Some("Text"));
        assert_eq!(
            d.dispatch(&desc_only, None, &config).announcement.as_deref(),
            Some("Desc")
        );
        assert_eq!(
            d.dispatch(&note(EventKind::ElementFocused), Some(&source), &config)
                .announcement
                .as_deref(),
            Some("From node")
        );
        assert_eq!(
            d.dispatch(&note(EventKind::ElementFocused), None, &config).announcement,
            None
        );
    }

    #[test]
    fn ungated_kinds_ignore_every_gate() {
        let closed = ConfigSnapshot {
            auto_read: false,
            announce_screen_changes: false,
            announce_form_fields: false,
            announce_buttons: false,
            ..ConfigSnapshot::default()
        };
        let d = dispatcher();
        assert_eq!(
            d.dispatch(&note(EventKind::ElementActivated), None, &closed)
                .announcement
                .as_deref(),
            Some("activated")
        );
        assert_eq!(
            d.dispatch(&note(EventKind::Announcement).with_text("Saved"), None, &closed)
                .announcement
                .as_deref(),
            Some("Saved")
        );
        assert_eq!(
            d.dispatch(&note(EventKind::TextChanged).with_text("abc"), None, &closed)
                .announcement
                .as_deref(),
            Some("abc")
        );
    }

    #[test]
    fn empty_text_is_silent() {
        let d = dispatcher().dispatch(
            &note(EventKind::Announcement),
            None,
            &ConfigSnapshot::default(),
        );
        assert_eq!(d, Dispatch::default());
    }

    #[test]
    fn unrecognized_kind_is_ignored() {
        let d = dispatcher().dispatch(
            &note(EventKind::Unrecognized("view_scrolled".into())).with_text("text"),
            None,
            &ConfigSnapshot::default(),
        );
        assert_eq!(d, Dispatch::default());
    }

    #[test]
    fn custom_phrases_are_used() {
        let d = EventDispatcher::with_phrases(Phrases {
            opened: "now showing".into(),
            activated: "pressed".into(),
            unknown_app: "an app".into(),
        });
        let config = ConfigSnapshot::default();
        assert_eq!(
            d.dispatch(&note(EventKind::ScreenChanged), None, &config).announcement.as_deref(),
            Some("now showing an app")
        );
        assert_eq!(
            d.dispatch(&note(EventKind::ElementActivated), None, &config)
                .announcement
                .as_deref(),
            Some("pressed")
        );
    }
}
