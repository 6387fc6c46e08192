//! Speech output.
//!
//! # Architecture
//!
//! ```text
//! text + ConfigSnapshot
//!        │
//!        ▼
//! ┌──────────────────────┐   speak / stop    ┌─────────────────────────┐
//! │  SpeechController    │──────────────────▶│  SpeechEngine (trait)   │
//! │  Idle | Speaking(u)  │◀──────────────────│  LogEngine              │
//! │  mode gate (off)     │    is_speaking    │  ProcessEngine (espeak) │
//! └──────────────────────┘                   └─────────────────────────┘
//! ```

pub mod controller;
pub mod engine;
pub mod utterance;

// ── Public re-exports ──────────────────────────────────────────────────────

pub use controller::{SpeakOutcome, SpeechController, SpeechState};
pub use engine::{open_engine, LogEngine, ProcessEngine, SpeechEngine, SpeechError, VoiceSettings};
pub use utterance::Utterance;

// test-only re-export so the service tests can build a controller around
// the recording engine.
#[cfg(test)]
pub use engine::{EngineCall, MockSpeechEngine};
