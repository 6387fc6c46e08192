//! Screen narrator: the core of a screen reader.
//!
//! Takes snapshots of an on-screen element tree plus a stream of change
//! notifications, and turns them into spoken output.
//!
//! | module     | role                                                      |
//! |------------|-----------------------------------------------------------|
//! | `tree`     | element tree arena, generation-checked handles, walks     |
//! | `narrate`  | role classifier, content extractor, navigation cursor     |
//! | `speech`   | speech output controller and synthesis engines            |
//! | `events`   | change notifications and the event dispatcher             |
//! | `config`   | persisted settings and the per-operation snapshot         |
//! | `service`  | the narrator loop that ties everything together           |
//! | `hotkey`   | global keyboard gestures                                  |
//! | `host`     | JSON-lines adapter for hosts driving the binary           |

pub mod config;
pub mod events;
pub mod host;
pub mod hotkey;
pub mod narrate;
pub mod service;
pub mod speech;
pub mod tree;
