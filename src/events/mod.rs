//! Host change notifications and the decisions they lead to.
//!
//! ```text
//! host event ──▶ EventKind::classify ──▶ ChangeNotification
//!                                               │
//!                          ConfigSnapshot ──────┤
//!                                               ▼
//!                                        EventDispatcher
//!                                               │
//!                                               ▼
//!                              Dispatch { announcement, read_screen }
//! ```

pub mod dispatcher;
pub mod notification;

pub use dispatcher::{gates_for, Dispatch, EventDispatcher, Phrases};
pub use notification::{ChangeNotification, EventKind};
