//! UI element tree snapshots.
//!
//! # Architecture
//!
//! ```text
//! host tree (NodeSpec / direct inserts)
//!        │
//!        ▼
//! UiTree ── SlotMap<NodeId, UiNode> ── root: Option<NodeId> ── epoch
//!        │
//!        ▼
//! PreOrder walk (visited guard, stale-as-empty, depth/node limits)
//!        │
//!        ├─▶ ContentExtractor (forward order)
//!        └─▶ NavigationCursor (forward / reverse order)
//! ```
//!
//! The narrator never holds a borrowed node beyond one operation.  Handles
//! are [`NodeId`]s; resolving a handle whose node is gone yields `None`.

pub mod arena;
pub mod node;
pub mod walk;

pub use arena::{NodeId, TreeEpoch, TreeError, UiTree};
pub use node::{InteractiveFlags, NodeSpec, UiNode};
pub use walk::{ChildOrder, PreOrder, WalkLimits};
