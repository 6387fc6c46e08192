//! Speech output state machine.
//!
//! ```text
//!            speak(u)                     speak(u')
//!   Idle ─────────────────▶ Speaking(u) ───────────▶ Speaking(u')
//!    ▲                          │          (engine.stop, then engine.speak)
//!    │   stop / finished /      │
//!    └──── engine went quiet ◀──┘
//! ```
//!
//! There is no queue: every accepted utterance cancels the one in flight.
//! The speech mode is read from the snapshot passed to each call; `off`
//! drops the utterance before the engine sees it.

use crate::config::ConfigSnapshot;
use crate::tree::node::non_blank;

use super::engine::{SpeechEngine, SpeechError, VoiceSettings};
use super::utterance::Utterance;

/// What the controller is doing right now.
#[derive(Debug, Clone, PartialEq)]
pub enum SpeechState {
    Idle,
    Speaking(Utterance),
}

/// Result of a [`SpeechController::speak`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeakOutcome {
    /// Handed to an idle engine.
    Started,
    /// Cancelled the utterance in flight and took its place.
    Replaced,
    /// Speech mode is off; the engine was not called.
    Muted,
    /// Nothing to say.
    Empty,
    /// The engine refused it.
    Dropped,
}

impl SpeakOutcome {
    /// `true` when the engine is now playing the new utterance.
    pub fn is_spoken(self) -> bool {
        matches!(self, SpeakOutcome::Started | SpeakOutcome::Replaced)
    }
}

pub struct SpeechController {
    engine: Box<dyn SpeechEngine>,
    state: SpeechState,
}

impl std::fmt::Debug for SpeechController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpeechController")
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl SpeechController {
    pub fn new(engine: Box<dyn SpeechEngine>) -> Self {
        Self {
            engine,
            state: SpeechState::Idle,
        }
    }

    pub fn state(&self) -> &SpeechState {
        &self.state
    }

    pub fn is_speaking(&self) -> bool {
        matches!(self.state, SpeechState::Speaking(_))
    }

    /// Speak `text` with the voice parameters of `config`.
    pub fn speak_text(&mut self, text: &str, config: &ConfigSnapshot) -> SpeakOutcome {
        self.speak(Utterance::new(text.trim(), config), config)
    }

    /// Cancel whatever is playing and start `utterance`.
    ///
    /// A muted or empty utterance leaves the current state untouched.  If
    /// the engine rejects the new utterance the old one has already been
    /// cancelled and the controller ends up idle.
    pub fn speak(&mut self, utterance: Utterance, config: &ConfigSnapshot) -> SpeakOutcome {
        if non_blank(&utterance.text).is_none() {
            return SpeakOutcome::Empty;
        }
        if config.speech_mode.is_silent() {
            log::debug!("speech: muted, dropping {:?}", utterance.text);
            return SpeakOutcome::Muted;
        }

        let replaced = self.is_speaking();
        if replaced {
            self.engine.stop();
            self.state = SpeechState::Idle;
        }

        match self.engine.speak(&utterance) {
            Ok(()) => {
                self.state = SpeechState::Speaking(utterance);
                if replaced {
                    SpeakOutcome::Replaced
                } else {
                    SpeakOutcome::Started
                }
            }
            Err(e) => {
                log::warn!("speech: dropped {:?}: {e}", utterance.text);
                SpeakOutcome::Dropped
            }
        }
    }

    /// Cancel the utterance in flight.  Returns `false` when already idle.
    pub fn stop(&mut self) -> bool {
        if !self.is_speaking() {
            return false;
        }
        self.engine.stop();
        self.state = SpeechState::Idle;
        true
    }

    /// The host reported that playback ended.
    pub fn finished(&mut self) {
        if self.is_speaking() {
            log::debug!("speech: finished");
        }
        self.state = SpeechState::Idle;
    }

    /// Drop to idle if the engine has gone quiet on its own.
    pub fn sync_with_engine(&mut self) {
        if self.is_speaking() && !self.engine.is_speaking() {
            self.state = SpeechState::Idle;
        }
    }

    /// Apply the configured voice once the engine is up.  An unsupported
    /// language falls back to the engine default.
    pub fn engine_ready(&mut self, config: &ConfigSnapshot) -> Result<(), SpeechError> {
        let voice = VoiceSettings {
            language: non_blank(&config.language).map(str::to_owned),
        };
        match self.engine.configure(&voice) {
            Err(SpeechError::LanguageUnsupported(language)) => {
                log::warn!("speech: language {language} not supported, using engine default");
                self.engine.configure(&VoiceSettings::default())
            }
            other => other,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
