//! Messages accepted by the narrator loop.

use serde::{Deserialize, Serialize};

use crate::config::{NarratorSettings, NavigationMode, ReviewMode, SpeechMode};
use crate::events::ChangeNotification;
use crate::tree::UiTree;

/// Everything that can reach the [`Narrator`](super::Narrator).
///
/// Hosts, the hotkey thread and the synthesis callback all feed the same
/// channel, so messages are handled one at a time in arrival order.
#[derive(Debug)]
pub enum NarratorMessage {
    /// The host has bound the narrator.
    Connected,
    /// A fresh snapshot of the element tree.  Replaces the previous one.
    TreeUpdated(UiTree),
    Notification(ChangeNotification),
    Command(NarratorCommand),
    /// The synthesis engine finished initialising.
    EngineReady { ok: bool },
    /// The engine finished playing the current utterance.
    SpeechFinished,
    /// The host wants output stopped now.
    Interrupt,
    SetEnabled(bool),
    UpdateSetting(SettingChange),
}

/// User-issued commands (gestures, host buttons).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NarratorCommand {
    NavigateNext,
    NavigatePrevious,
    ReadScreen,
    StopSpeech,
    CycleSpeechMode,
}

/// One runtime settings change.
///
/// Serialises as `{"name": "volume", "value": 0.5}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "name", content = "value", rename_all = "snake_case")]
pub enum SettingChange {
    SpeechRate(f32),
    Volume(f32),
    Pitch(f32),
    SpeechMode(SpeechMode),
    ReviewMode(ReviewMode),
    NavigationMode(NavigationMode),
    AutoRead(bool),
    AnnounceScreenChanges(bool),
    AnnounceFormFields(bool),
    AnnounceButtons(bool),
}

impl SettingChange {
    /// Write the change into `settings`; numeric values are clamped.
    pub fn apply(&self, settings: &mut NarratorSettings) {
        match *self {
            SettingChange::SpeechRate(rate) => settings.set_speech_rate(rate),
            SettingChange::Volume(volume) => settings.set_volume(volume),
            SettingChange::Pitch(pitch) => settings.set_pitch(pitch),
            SettingChange::SpeechMode(mode) => settings.modes.speech_mode = mode,
            SettingChange::ReviewMode(mode) => settings.modes.review_mode = mode,
            SettingChange::NavigationMode(mode) => settings.modes.navigation_mode = mode,
            SettingChange::AutoRead(on) => settings.announcements.auto_read = on,
            SettingChange::AnnounceScreenChanges(on) => settings.announcements.screen_changes = on,
            SettingChange::AnnounceFormFields(on) => settings.announcements.form_fields = on,
            SettingChange::AnnounceButtons(on) => settings.announcements.buttons = on,
        }
    }
}
