//! Configuration module for the screen narrator.
//!
//! Provides `NarratorSettings` (persisted settings), `ConfigSnapshot` (the
//! read-only per-operation view the core consumes), `AppPaths` for
//! cross-platform directories, and TOML persistence via
//! `NarratorSettings::load` / `NarratorSettings::save`.

pub mod paths;
pub mod settings;
pub mod snapshot;

pub use paths::AppPaths;
pub use settings::{
    AdvancedSettings, AnnouncementSettings, KeyboardLayout, KeyboardSettings, ModeSettings,
    ModifierKey, NarratorSettings, NavigationMode, ReviewMode, SpeechMode, SpeechSettings,
};
pub use snapshot::{ConfigSnapshot, Gate};
