//! JSON-lines host adapter.
//!
//! The binary reads one JSON object per line from stdin and forwards it to
//! the narrator.  Every object carries a `"type"`:
//!
//! ```text
//! {"type": "connected"}
//! {"type": "tree", "root": {"tag": "Frame", "children": [{"text": "OK", "clickable": true}]}}
//! {"type": "event", "kind": "window_state_changed", "package": "com.example.mail"}
//! {"type": "event", "kind": "announcement", "text": ["Message", "sent"]}
//! {"type": "command", "command": "navigate_next"}
//! {"type": "engine_ready", "ok": true}
//! {"type": "speech_finished"}
//! {"type": "interrupt"}
//! {"type": "set_enabled", "enabled": false}
//! {"type": "setting", "change": {"name": "volume", "value": 0.5}}
//! ```
//!
//! Blank lines and lines starting with `#` are skipped.  Malformed lines are
//! logged and skipped; they never stop the pump.

use serde::Deserialize;
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;

use crate::events::{ChangeNotification, EventKind};
use crate::service::{NarratorCommand, NarratorMessage, SettingChange};
use crate::tree::{NodeSpec, UiTree};

/// Errors raised while decoding a host line.
#[derive(Debug, Error)]
pub enum HostError {
    #[error("malformed host message: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Event text as hosts send it: one string or a list of parts.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum EventText {
    One(String),
    Many(Vec<String>),
}

impl EventText {
    /// Parts joined with a single space.
    pub fn joined(self) -> String {
        match self {
            EventText::One(text) => text,
            EventText::Many(parts) => parts.join(" "),
        }
    }
}

impl Default for EventText {
    fn default() -> Self {
        EventText::One(String::new())
    }
}

fn default_ok() -> bool {
    true
}

/// One decoded line.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HostInput {
    Connected,
    Tree {
        root: NodeSpec,
    },
    Event {
        kind: String,
        #[serde(default)]
        text: EventText,
        #[serde(default)]
        description: String,
        #[serde(default, alias = "package")]
        app_id: String,
    },
    Command {
        command: NarratorCommand,
    },
    EngineReady {
        #[serde(default = "default_ok")]
        ok: bool,
    },
    SpeechFinished,
    Interrupt,
    SetEnabled {
        enabled: bool,
    },
    Setting {
        change: SettingChange,
    },
}

impl From<HostInput> for NarratorMessage {
    fn from(input: HostInput) -> Self {
        match input {
            HostInput::Connected => NarratorMessage::Connected,
            HostInput::Tree { root } => NarratorMessage::TreeUpdated(UiTree::from_spec(&root)),
            HostInput::Event {
                kind,
                text,
                description,
                app_id,
            } => NarratorMessage::Notification(
                ChangeNotification::new(EventKind::classify(&kind))
                    .with_text(text.joined())
                    .with_description(description)
                    .with_app_id(app_id),
            ),
            HostInput::Command { command } => NarratorMessage::Command(command),
            HostInput::EngineReady { ok } => NarratorMessage::EngineReady { ok },
            HostInput::SpeechFinished => NarratorMessage::SpeechFinished,
            HostInput::Interrupt => NarratorMessage::Interrupt,
            HostInput::SetEnabled { enabled } => NarratorMessage::SetEnabled(enabled),
            HostInput::Setting { change } => NarratorMessage::UpdateSetting(change),
        }
    }
}

/// Decode one line.  `Ok(None)` for blank and comment lines.
pub fn parse_line(line: &str) -> Result<Option<NarratorMessage>, HostError> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }
    let input: HostInput = serde_json::from_str(line)?;
    Ok(Some(input.into()))
}

/// Forward every decodable line of `reader` to `tx`.
///
/// Returns when the reader hits end of input or the narrator has gone away.
/// Returns the number of messages forwarded.
pub async fn pump<R>(reader: R, tx: &mpsc::Sender<NarratorMessage>) -> std::io::Result<usize>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    let mut forwarded = 0;
    let mut line_no = 0;

    while let Some(line) = lines.next_line().await? {
        line_no += 1;
        match parse_line(&line) {
            Ok(Some(message)) => {
                if tx.send(message).await.is_err() {
                    log::warn!("host: narrator stopped, dropping remaining input");
                    break;
                }
                forwarded += 1;
            }
            Ok(None) => {}
            Err(e) => log::warn!("host: line {line_no}: {e}"),
        }
    }
    Ok(forwarded)
}

/// [`pump`] over the process's stdin.
pub async fn pump_stdin(tx: &mpsc::Sender<NarratorMessage>) -> std::io::Result<usize> {
    pump(tokio::io::BufReader::new(tokio::io::stdin()), tx).await
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SpeechMode;

    fn parse(line: &str) -> NarratorMessage {
        parse_line(line).unwrap().unwrap()
    }

    #[test]
    fn blank_and_comment_lines_are_skipped() {
        assert!(parse_line("").unwrap().is_none());
        assert!(parse_line("   ").unwrap().is_none());
        assert!(parse_line("# comment").unwrap().is_none());
    }

    #[test]
    fn tree_line_builds_a_tree() {
        let msg = parse(
            r#"{"type": "tree", "root": {"tag": "Frame", "children": [{"text": "OK", "clickable": true}]}}"#,
        );
        let tree = match msg {
            NarratorMessage::TreeUpdated(tree) => tree,
            other => panic!("expected TreeUpdated, got {other:?}"),
        };
        let root = tree.root().unwrap();
        let ok = tree.children(root)[0];
        assert!(tree.get(ok).unwrap().is_interactive());
    }

    #[test]
    fn event_text_parts_are_joined_and_package_alias_accepted() {
        let msg = parse(
            r#"{"type": "event", "kind": "window_state_changed", "text": ["Inbox", "3 unread"], "package": "mail"}"#,
        );
        let n = match msg {
            NarratorMessage::Notification(n) => n,
            other => panic!("expected Notification, got {other:?}"),
        };
        assert_eq!(n.kind, EventKind::ScreenChanged);
        assert_eq!(n.text, "Inbox 3 unread");
        assert_eq!(n.app_id, "mail");
        assert_eq!(n.source, None);
    }

    #[test]
    fn unknown_event_kind_is_still_forwarded() {
        let msg = parse(r#"{"type": "event", "kind": "view_scrolled"}"#);
        let n = match msg {
            NarratorMessage::Notification(n) => n,
            other => panic!("expected Notification, got {other:?}"),
        };
        assert_eq!(n.kind, EventKind::Unrecognized("view_scrolled".into()));
    }

    #[test]
    fn command_setting_and_lifecycle_lines() {
        assert!(matches!(
            parse(r#"{"type": "command", "command": "read_screen"}"#),
            NarratorMessage::Command(NarratorCommand::ReadScreen)
        ));
        assert!(matches!(
            parse(r#"{"type": "setting", "change": {"name": "speech_mode", "value": "beeps"}}"#),
            NarratorMessage::UpdateSetting(SettingChange::SpeechMode(SpeechMode::Beeps))
        ));
        assert!(matches!(
            parse(r#"{"type": "engine_ready"}"#),
            NarratorMessage::EngineReady { ok: true }
        ));
        assert!(matches!(
            parse(r#"{"type": "set_enabled", "enabled": false}"#),
            NarratorMessage::SetEnabled(false)
        ));
        assert!(matches!(parse(r#"{"type": "interrupt"}"#), NarratorMessage::Interrupt));
    }

    #[test]
    fn malformed_lines_are_errors() {
        assert!(parse_line("{not json").is_err());
        assert!(parse_line(r#"{"type": "teleport"}"#).is_err());
        assert!(parse_line(r#"{"type": "command", "command": "fly"}"#).is_err());
    }

    #[tokio::test]
    async fn pump_skips_bad_lines_and_forwards_the_rest() {
        let input: &[u8] = b"{\"type\": \"connected\"}\n\
                             garbage\n\
                             \n\
                             {\"type\": \"command\", \"command\": \"stop_speech\"}\n";
        let (tx, mut rx) = mpsc::channel(8);

        let forwarded = pump(input, &tx).await.unwrap();
        drop(tx);

        assert_eq!(forwarded, 2);
        assert!(matches!(rx.recv().await, Some(NarratorMessage::Connected)));
        assert!(matches!(
            rx.recv().await,
            Some(NarratorMessage::Command(NarratorCommand::StopSpeech))
        ));
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn pump_stops_when_narrator_is_gone() {
        let input: &[u8] = b"{\"type\": \"connected\"}\n{\"type\": \"connected\"}\n";
        let (tx, rx) = mpsc::channel(8);
        drop(rx);
        assert_eq!(pump(input, &tx).await.unwrap(), 0);
    }
}
