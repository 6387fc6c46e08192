//! One announcement as handed to a synthesis engine.

use crate::config::ConfigSnapshot;

/// Text plus the voice parameters in force when it was issued.
#[derive(Debug, Clone, PartialEq)]
pub struct Utterance {
    pub text: String,
    /// 0.0 – 1.0
    pub volume: f32,
    /// Multiplier on the engine's normal speaking rate.
    pub rate: f32,
    /// Multiplier on the engine's normal pitch.
    pub pitch: f32,
    /// Always set: a new utterance replaces whatever is playing.
    pub interrupt: bool,
}

impl Utterance {
    /// Build an utterance with the voice parameters of `config`.
    pub fn new(text: impl Into<String>, config: &ConfigSnapshot) -> Self {
        Self {
            text: text.into(),
            volume: config.volume,
            rate: config.rate,
            pitch: config.pitch,
            interrupt: true,
        }
    }
}
