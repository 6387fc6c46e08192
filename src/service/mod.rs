//! The narrator service: one tokio task that owns all narration state.
//!
//! # Architecture
//!
//! ```text
//! HotkeyListener (rdev thread) ──┐
//! host adapter (stdin lines) ────┼──▶ mpsc::Sender<NarratorMessage>
//! synthesis callbacks ───────────┘              │
//!                                               ▼
//!                                   Narrator::run()  ← async tokio task
//!                                               │
//!            ┌──────────────────┬───────────────┼─────────────────┐
//!            ▼                  ▼               ▼                 ▼
//!     EventDispatcher   NavigationCursor  ContentExtractor  SpeechController
//! ```

pub mod message;
pub mod runner;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use message::{NarratorCommand, NarratorMessage, SettingChange};
pub use runner::{Narrator, ACTIVE_PHRASE};
