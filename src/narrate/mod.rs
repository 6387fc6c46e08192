//! Turning a tree into speech: role labels, whole-screen reading, and
//! interactive-element navigation.
//!
//! ```text
//! UiTree ──▶ ContentExtractor ──▶ "Hello. World. button."
//!    │             │
//!    │             └── RoleTable::classify(tag)
//!    │
//!    └────▶ NavigationCursor ──▶ NavigationHit { node, announcement }
//! ```
//!
//! Nothing here speaks.  Callers hand the resulting strings to the
//! [`SpeechController`](crate::speech::SpeechController).

pub mod cursor;
pub mod extract;
pub mod role;

pub use cursor::{find_interactive, Direction, NavigationCursor, NavigationHit};
pub use extract::{ContentExtractor, ExtractLimits, Extraction, FRAGMENT_TERMINATOR};
pub use role::{classify_role, RoleRule, RoleTable, STANDARD_ROLES};
