//! Immutable per-operation view of the narrator configuration.
//!
//! A [`ConfigSnapshot`] is taken from [`NarratorSettings`] at the start of
//! every message the narrator processes and handed explicitly to each
//! component that needs it.  Nothing holds on to a snapshot across messages,
//! so a setting change is observed by the very next operation.
//!
//! [`NarratorSettings`]: super::NarratorSettings

use super::settings::SpeechMode;

/// Named boolean gates consulted by the event dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
    AnnounceScreenChanges,
    AutoRead,
    AnnounceFormFields,
    AnnounceButtons,
}

/// Read-only gates and voice parameters for one operation.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigSnapshot {
    pub speech_mode: SpeechMode,
    pub volume: f32,
    pub rate: f32,
    pub pitch: f32,
    /// Voice language tag applied when the engine reports ready.
    pub language: String,
    pub auto_read: bool,
    pub announce_screen_changes: bool,
    pub announce_form_fields: bool,
    pub announce_buttons: bool,
}

impl ConfigSnapshot {
    /// Current value of a named gate.
    pub fn gate(&self, gate: Gate) -> bool {
        match gate {
            Gate::AnnounceScreenChanges => self.announce_screen_changes,
            Gate::AutoRead => self.auto_read,
            Gate::AnnounceFormFields => self.announce_form_fields,
            Gate::AnnounceButtons => self.announce_buttons,
        }
    }

    /// `true` when at least one of `gates` is open.  An empty list means the
    /// category is always announced.
    pub fn any_open(&self, gates: &[Gate]) -> bool {
        gates.is_empty() || gates.iter().any(|&g| self.gate(g))
    }
}

impl Default for ConfigSnapshot {
    fn default() -> Self {
        super::NarratorSettings::default().snapshot()
    }
}
