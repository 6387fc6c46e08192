//! Narrator settings structs, defaults, clamped setters and persistence.
//!
//! All structs implement `Serialize`, `Deserialize`, `Default` and `Clone`
//! so they can be round-tripped through TOML files.  A flat camelCase JSON
//! form is also supported for exporting and importing a whole profile.

use anyhow::{Context, Result};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;

use super::snapshot::ConfigSnapshot;
use super::AppPaths;

// ---------------------------------------------------------------------------
// Mode enums
// ---------------------------------------------------------------------------

/// How utterances reach the synthesis engine.
///
/// | Variant | Behaviour                                         |
/// |---------|---------------------------------------------------|
/// | Talk    | Every utterance is spoken                         |
/// | Beeps   | Accepted for compatibility; utterances are spoken |
/// | Off     | Utterances are dropped before the engine          |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpeechMode {
    Talk,
    Beeps,
    Off,
}

impl SpeechMode {
    /// `true` when utterances must not be forwarded to the engine.
    pub fn is_silent(self) -> bool {
        self == SpeechMode::Off
    }

    /// The mode that follows `self` in the talk → beeps → off cycle.
    pub fn next(self) -> Self {
        match self {
            SpeechMode::Talk => SpeechMode::Beeps,
            SpeechMode::Beeps => SpeechMode::Off,
            SpeechMode::Off => SpeechMode::Talk,
        }
    }

    /// Spoken name of the mode, used when the user cycles modes.
    pub fn label(self) -> &'static str {
        match self {
            SpeechMode::Talk => "speech mode talk",
            SpeechMode::Beeps => "speech mode beeps",
            SpeechMode::Off => "speech mode off",
        }
    }
}

impl Default for SpeechMode {
    fn default() -> Self {
        Self::Talk
    }
}

/// What the review commands operate on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewMode {
    Object,
    Document,
    Screen,
}

impl Default for ReviewMode {
    fn default() -> Self {
        Self::Object
    }
}

/// How keyboard input is interpreted while navigating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NavigationMode {
    Browse,
    Focus,
    Object,
}

impl Default for NavigationMode {
    fn default() -> Self {
        Self::Browse
    }
}

/// Key held down to issue narrator gestures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ModifierKey {
    CapsLock,
    Insert,
}

impl Default for ModifierKey {
    fn default() -> Self {
        Self::CapsLock
    }
}

/// Gesture layout: keypad keys on desktop keyboards, arrows on laptops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyboardLayout {
    Desktop,
    Laptop,
}

impl Default for KeyboardLayout {
    fn default() -> Self {
        Self::Desktop
    }
}

// ---------------------------------------------------------------------------
// SpeechSettings
// ---------------------------------------------------------------------------

/// Voice and synthesis parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeechSettings {
    /// Synthesis backend: `"log"` or the name of an espeak-compatible command.
    pub synthesizer: String,
    /// Voice language tag handed to the engine once it is ready.
    pub voice: String,
    /// Speech rate multiplier (0.5 – 2.0).
    pub rate: f32,
    /// Output volume (0.0 – 1.0).
    pub volume: f32,
    /// Pitch multiplier (0.0 – 2.0).
    pub pitch: f32,
    /// Intonation variation (0 – 100).
    pub inflection: u8,
    /// Symbol verbosity: 0 none, 1 some, 2 most, 3 all.
    pub punctuation_level: u8,
    pub announce_capitals: bool,
    pub say_numbers: bool,
}

impl Default for SpeechSettings {
    fn default() -> Self {
        Self {
            synthesizer: "espeak-ng".into(),
            voice: "en-US".into(),
            rate: 1.0,
            volume: 0.8,
            pitch: 1.0,
            inflection: 50,
            punctuation_level: 1,
            announce_capitals: true,
            say_numbers: true,
        }
    }
}

// ---------------------------------------------------------------------------
// ModeSettings
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ModeSettings {
    pub speech_mode: SpeechMode,
    pub review_mode: ReviewMode,
    pub navigation_mode: NavigationMode,
}

// ---------------------------------------------------------------------------
// AnnouncementSettings
// ---------------------------------------------------------------------------

/// Gates that enable or suppress categories of announcement.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnouncementSettings {
    /// Read the whole screen after announcing a screen change.
    pub auto_read: bool,
    pub screen_changes: bool,
    pub form_fields: bool,
    pub links: bool,
    pub graphics: bool,
    pub buttons: bool,
    pub menus: bool,
    pub tables: bool,
    pub frames: bool,
    pub page_structure: bool,
    pub emphasis: bool,
}

impl Default for AnnouncementSettings {
    fn default() -> Self {
        Self {
            auto_read: true,
            screen_changes: true,
            form_fields: true,
            links: true,
            graphics: true,
            buttons: true,
            menus: true,
            tables: true,
            frames: true,
            page_structure: true,
            emphasis: true,
        }
    }
}

// ---------------------------------------------------------------------------
// KeyboardSettings
// ---------------------------------------------------------------------------

/// Global gesture bindings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyboardSettings {
    pub modifier: ModifierKey,
    pub layout: KeyboardLayout,
    /// When `false` the hotkey listener is not started.
    pub key_bindings: bool,
}

impl Default for KeyboardSettings {
    fn default() -> Self {
        Self {
            modifier: ModifierKey::default(),
            layout: KeyboardLayout::default(),
            key_bindings: true,
        }
    }
}

// ---------------------------------------------------------------------------
// AdvancedSettings
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AdvancedSettings {
    /// Raise the default log filter from `info` to `debug`.
    pub enable_logging: bool,
    pub performance_mode: bool,
}

// ---------------------------------------------------------------------------
// NarratorSettings  (top-level)
// ---------------------------------------------------------------------------

/// Top-level narrator configuration, serialised as `settings.toml`.
///
/// # Persistence
///
/// ```rust,no_run
/// use screen_narrator::config::NarratorSettings;
///
/// // Load (returns Default when file is missing)
/// let mut settings = NarratorSettings::load().unwrap();
///
/// settings.set_speech_rate(1.5);
/// // settings.save().unwrap();
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NarratorSettings {
    pub speech: SpeechSettings,
    pub modes: ModeSettings,
    pub announcements: AnnouncementSettings,
    pub keyboard: KeyboardSettings,
    pub advanced: AdvancedSettings,
}

impl NarratorSettings {
    /// Load settings from the platform-appropriate `settings.toml`.
    ///
    /// Returns `Ok(NarratorSettings::default())` when the file does not exist
    /// yet (first run).
    pub fn load() -> Result<Self> {
        Self::load_from(&AppPaths::new().settings_file)
    }

    /// Load from an explicit path (useful for tests).
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let settings: Self = toml::from_str(&content)?;
        Ok(settings)
    }

    /// Save settings to the platform-appropriate `settings.toml`, creating
    /// parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&AppPaths::new().settings_file)
    }

    /// Save to an explicit path (useful for tests).
    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Restore every setting to its default value.
    pub fn reset_to_defaults(&mut self) {
        *self = Self::default();
    }

    /// Immutable view of the gates and voice parameters for one operation.
    pub fn snapshot(&self) -> ConfigSnapshot {
        ConfigSnapshot {
            speech_mode: self.modes.speech_mode,
            volume: self.speech.volume,
            rate: self.speech.rate,
            pitch: self.speech.pitch,
            language: self.speech.voice.clone(),
            auto_read: self.announcements.auto_read,
            announce_screen_changes: self.announcements.screen_changes,
            announce_form_fields: self.announcements.form_fields,
            announce_buttons: self.announcements.buttons,
        }
    }

    // -----------------------------------------------------------------------
    // Clamped setters
    // -----------------------------------------------------------------------
    //
    // Non-finite values are ignored so a bad import cannot poison the engine.

    pub fn set_speech_rate(&mut self, rate: f32) {
        if rate.is_finite() {
            self.speech.rate = rate.clamp(0.5, 2.0);
        }
    }

    pub fn set_volume(&mut self, volume: f32) {
        if volume.is_finite() {
            self.speech.volume = volume.clamp(0.0, 1.0);
        }
    }

    pub fn set_pitch(&mut self, pitch: f32) {
        if pitch.is_finite() {
            self.speech.pitch = pitch.clamp(0.0, 2.0);
        }
    }

    pub fn set_inflection(&mut self, inflection: i64) {
        self.speech.inflection = inflection.clamp(0, 100) as u8;
    }

    pub fn set_punctuation_level(&mut self, level: i64) {
        self.speech.punctuation_level = level.clamp(0, 3) as u8;
    }

    // -----------------------------------------------------------------------
    // JSON export / import
    // -----------------------------------------------------------------------

    /// Export every setting as a flat camelCase JSON object.
    pub fn export_json(&self) -> Result<String> {
        let value = serde_json::json!({
            "synthesizer": self.speech.synthesizer,
            "voice": self.speech.voice,
            "speechRate": self.speech.rate,
            "volume": self.speech.volume,
            "pitch": self.speech.pitch,
            "inflection": self.speech.inflection,
            "punctuationLevel": self.speech.punctuation_level,
            "announceCapitals": self.speech.announce_capitals,
            "sayNumbers": self.speech.say_numbers,
            "speechMode": self.modes.speech_mode,
            "reviewMode": self.modes.review_mode,
            "navigationMode": self.modes.navigation_mode,
            "autoRead": self.announcements.auto_read,
            "announceScreenChanges": self.announcements.screen_changes,
            "announceFormFields": self.announcements.form_fields,
            "announceLinks": self.announcements.links,
            "announceGraphics": self.announcements.graphics,
            "announceButtons": self.announcements.buttons,
            "announceMenus": self.announcements.menus,
            "announceTables": self.announcements.tables,
            "announceFrames": self.announcements.frames,
            "announcePageStructure": self.announcements.page_structure,
            "announceEmphasis": self.announcements.emphasis,
            "modifierKey": self.keyboard.modifier,
            "keyboardLayout": self.keyboard.layout,
            "enableKeyBindings": self.keyboard.key_bindings,
            "enableLogging": self.advanced.enable_logging,
            "performanceMode": self.advanced.performance_mode,
        });
        Ok(serde_json::to_string_pretty(&value)?)
    }

    /// Apply a flat JSON object produced by [`export_json`](Self::export_json).
    ///
    /// Unknown keys and values of the wrong type are skipped; numeric values
    /// go through the clamped setters.  Returns the number of entries applied.
    ///
    /// # Errors
    ///
    /// Fails only when `json` is not a JSON object.
    pub fn import_json(&mut self, json: &str) -> Result<usize> {
        let entries: serde_json::Map<String, Value> = serde_json::from_str(json)?;
        let mut applied = 0;
        for (key, value) in &entries {
            if self.apply_entry(key, value) {
                applied += 1;
            } else {
                log::warn!("settings: skipping import entry {key:?} = {value}");
            }
        }
        Ok(applied)
    }

    /// Write [`export_json`](Self::export_json) to `path`, creating parent
    /// directories as needed.
    pub fn export_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.export_json()?)?;
        Ok(())
    }

    /// [`import_json`](Self::import_json) from a file.
    pub fn import_from(&mut self, path: &std::path::Path) -> Result<usize> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        self.import_json(&json)
    }

    fn apply_entry(&mut self, key: &str, value: &Value) -> bool {
        match key {
            "synthesizer" => string_into(value, &mut self.speech.synthesizer),
            "voice" => string_into(value, &mut self.speech.voice),
            "speechRate" => value.as_f64().map(|v| self.set_speech_rate(v as f32)).is_some(),
            "volume" => value.as_f64().map(|v| self.set_volume(v as f32)).is_some(),
            "pitch" => value.as_f64().map(|v| self.set_pitch(v as f32)).is_some(),
            "inflection" => value.as_f64().map(|v| self.set_inflection(v as i64)).is_some(),
            "punctuationLevel" => value
                .as_f64()
                .map(|v| self.set_punctuation_level(v as i64))
                .is_some(),
            "announceCapitals" => bool_into(value, &mut self.speech.announce_capitals),
            "sayNumbers" => bool_into(value, &mut self.speech.say_numbers),
            "speechMode" => enum_into(value, &mut self.modes.speech_mode),
            "reviewMode" => enum_into(value, &mut self.modes.review_mode),
            "navigationMode" => enum_into(value, &mut self.modes.navigation_mode),
            "autoRead" => bool_into(value, &mut self.announcements.auto_read),
            "announceScreenChanges" => bool_into(value, &mut self.announcements.screen_changes),
            "announceFormFields" => bool_into(value, &mut self.announcements.form_fields),
            "announceLinks" => bool_into(value, &mut self.announcements.links),
            "announceGraphics" => bool_into(value, &mut self.announcements.graphics),
            "announceButtons" => bool_into(value, &mut self.announcements.buttons),
            "announceMenus" => bool_into(value, &mut self.announcements.menus),
            "announceTables" => bool_into(value, &mut self.announcements.tables),
            "announceFrames" => bool_into(value, &mut self.announcements.frames),
            "announcePageStructure" => bool_into(value, &mut self.announcements.page_structure),
            "announceEmphasis" => bool_into(value, &mut self.announcements.emphasis),
            "modifierKey" => enum_into(value, &mut self.keyboard.modifier),
            "keyboardLayout" => enum_into(value, &mut self.keyboard.layout),
            "enableKeyBindings" => bool_into(value, &mut self.keyboard.key_bindings),
            "enableLogging" => bool_into(value, &mut self.advanced.enable_logging),
            "performanceMode" => bool_into(value, &mut self.advanced.performance_mode),
            _ => false,
        }
    }
}

fn string_into(value: &Value, slot: &mut String) -> bool {
    match value.as_str() {
        Some(s) => {
            *slot = s.to_string();
            true
        }
        None => false,
    }
}

fn bool_into(value: &Value, slot: &mut bool) -> bool {
    match value.as_bool() {
        Some(b) => {
            *slot = b;
            true
        }
        None => false,
    }
}

fn enum_into<T: DeserializeOwned>(value: &Value, slot: &mut T) -> bool {
    match serde_json::from_value(value.clone()) {
        Ok(parsed) => {
            *slot = parsed;
            true
        }
        Err(_) => false,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
