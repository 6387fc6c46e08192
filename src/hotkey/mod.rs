//! Global keyboard gestures, backed by `rdev`.
//!
//! # Design
//!
//! `rdev::listen()` is a blocking OS-level call that never returns while the
//! process is alive.  It runs on a **dedicated OS thread** owned by
//! [`HotkeyListener`]; the thread turns key events into
//! [`NarratorCommand`]s with a [`GestureTracker`] and forwards them into the
//! narrator channel.
//!
//! # Gestures
//!
//! | gesture (modifier held) | desktop layout | laptop layout |
//! |-------------------------|----------------|---------------|
//! | next element            | keypad 6       | right arrow   |
//! | previous element        | keypad 4       | left arrow    |
//! | read screen             | down arrow     | down arrow    |
//! | cycle speech mode       | S              | S             |
//!
//! Either Control key stops speech, with or without the modifier.
//!
//! # Usage
//!
//! ```no_run
//! use tokio::sync::mpsc;
//! use screen_narrator::config::KeyboardSettings;
//! use screen_narrator::hotkey::HotkeyListener;
//!
//! let (tx, mut rx) = mpsc::channel(64);
//! let _listener = HotkeyListener::start(&KeyboardSettings::default(), tx);
//!
//! // In your async loop:
//! // while let Some(msg) = rx.recv().await { ... }
//! ```

pub mod listener;

pub use listener::HotkeyListener;

use rdev::{EventType, Key};

use crate::config::{KeyboardLayout, KeyboardSettings, ModifierKey};
use crate::service::NarratorCommand;

// ---------------------------------------------------------------------------
// Key mapping
// ---------------------------------------------------------------------------

/// The [`rdev::Key`] behind a configured modifier.
pub fn modifier_key(modifier: ModifierKey) -> Key {
    match modifier {
        ModifierKey::CapsLock => Key::CapsLock,
        ModifierKey::Insert => Key::Insert,
    }
}

/// Command bound to `key` while the modifier is held.
pub fn gesture_command(layout: KeyboardLayout, key: Key) -> Option<NarratorCommand> {
    match (layout, key) {
        (KeyboardLayout::Desktop, Key::Kp6) | (KeyboardLayout::Laptop, Key::RightArrow) => {
            Some(NarratorCommand::NavigateNext)
        }
        (KeyboardLayout::Desktop, Key::Kp4) | (KeyboardLayout::Laptop, Key::LeftArrow) => {
            Some(NarratorCommand::NavigatePrevious)
        }
        (_, Key::DownArrow) => Some(NarratorCommand::ReadScreen),
        (_, Key::KeyS) => Some(NarratorCommand::CycleSpeechMode),
        _ => None,
    }
}

fn is_control(key: Key) -> bool {
    matches!(key, Key::ControlLeft | Key::ControlRight)
}

// ---------------------------------------------------------------------------
// GestureTracker
// ---------------------------------------------------------------------------

/// Tracks the modifier and maps raw key events to commands.
#[derive(Debug, Clone)]
pub struct GestureTracker {
    modifier: Key,
    layout: KeyboardLayout,
    modifier_held: bool,
}

impl GestureTracker {
    pub fn new(settings: &KeyboardSettings) -> Self {
        Self {
            modifier: modifier_key(settings.modifier),
            layout: settings.layout,
            modifier_held: false,
        }
    }

    pub fn modifier_held(&self) -> bool {
        self.modifier_held
    }

    /// Feed one key event; returns the command it completes, if any.
    pub fn on_event(&mut self, event: &EventType) -> Option<NarratorCommand> {
        match *event {
            EventType::KeyPress(key) if key == self.modifier => {
                self.modifier_held = true;
                None
            }
            EventType::KeyRelease(key) if key == self.modifier => {
                self.modifier_held = false;
                None
            }
            EventType::KeyPress(key) if is_control(key) => Some(NarratorCommand::StopSpeech),
            EventType::KeyPress(key) if self.modifier_held => gesture_command(self.layout, key),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
