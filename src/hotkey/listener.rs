//! Dedicated OS-thread gesture listener using `rdev::listen`.
//!
//! `rdev::listen` is a blocking call that must live on its own OS thread.
//! [`HotkeyListener`] owns that thread and a stop flag; dropping it sets the
//! flag so the callback silently ignores further events.
//!
//! # Shutdown caveat
//!
//! `rdev::listen` has **no graceful shutdown API**.  The thread stays blocked
//! in the rdev event loop until the process exits.  It only holds a weak
//! handle on the narrator channel, so it never keeps the narrator alive once
//! every other sender is gone.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use tokio::sync::mpsc;

use crate::config::KeyboardSettings;
use crate::service::NarratorMessage;

use super::GestureTracker;

// ---------------------------------------------------------------------------
// HotkeyListener
// ---------------------------------------------------------------------------

/// Handle to a running gesture listener thread.
///
/// Construct one with [`HotkeyListener::start`].  Drop it to stop forwarding
/// events.
pub struct HotkeyListener {
    /// Shared stop flag, set `true` on [`Drop`].
    stop: Arc<AtomicBool>,
    /// Never joined: `rdev::listen` does not return.
    _thread: std::thread::JoinHandle<()>,
}

impl HotkeyListener {
    /// Spawn a dedicated OS thread that listens for global key events and
    /// forwards completed gestures as [`NarratorMessage::Command`] on `tx`.
    ///
    /// The thread uses `blocking_send`, so it works from a non-async context.
    ///
    /// # Panics
    ///
    /// Panics if the OS refuses to create the thread.
    pub fn start(settings: &KeyboardSettings, tx: mpsc::Sender<NarratorMessage>) -> Self {
        let stop = Arc::new(AtomicBool::new(false));
        let stop_clone = Arc::clone(&stop);
        let weak_tx = tx.downgrade();
        let mut tracker = GestureTracker::new(settings);

        let thread = std::thread::Builder::new()
            .name("hotkey-listener".into())
            .spawn(move || {
                let result = rdev::listen(move |event| {
                    if stop_clone.load(Ordering::Relaxed) {
                        return;
                    }
                    let Some(command) = tracker.on_event(&event.event_type) else {
                        return;
                    };
                    log::debug!("hotkey: {command:?}");
                    if let Some(tx) = weak_tx.upgrade() {
                        let _ = tx.blocking_send(NarratorMessage::Command(command));
                    }
                });

                if let Err(e) = result {
                    log::error!("hotkey-listener: rdev::listen exited with error: {:?}", e);
                }
            })
            .expect("failed to spawn hotkey-listener thread");

        Self {
            stop,
            _thread: thread,
        }
    }
}

impl Drop for HotkeyListener {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
    }
}
