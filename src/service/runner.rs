//! Narrator loop: owns the tree snapshot, the cursor and the speech
//! controller, and handles one [`NarratorMessage`] at a time.
//!
//! # Message flow
//!
//! ```text
//! TreeUpdated(tree)          └─▶ replace snapshot (cursor goes stale)
//!
//! Notification(n)
//!   └─▶ EventDispatcher::dispatch(n, source, snapshot)
//!         ├─ announcement            → speak
//!         └─ read_screen             → announcement + ContentExtractor → speak
//!
//! Command(NavigateNext|Previous)
//!   └─▶ NavigationCursor::navigate(tree, root) → speak label (if any)
//!
//! Command(ReadScreen)        └─▶ ContentExtractor → speak
//! Command(StopSpeech) / Interrupt / channel closed
//!                            └─▶ SpeechController::stop
//! ```
//!
//! A fresh [`ConfigSnapshot`] is taken at the start of every message; no
//! component sees settings older than the message it is handling.
//!
//! Handling is blocking work (engines spawn, query and reap child processes;
//! setting changes are written to disk), so [`Narrator::run`] moves the
//! narrator onto `tokio::task::spawn_blocking` for each message and the
//! async runtime never stalls.

use std::path::PathBuf;

use tokio::sync::mpsc;

use crate::config::{ConfigSnapshot, NarratorSettings};
use crate::events::{ChangeNotification, EventDispatcher};
use crate::narrate::{ContentExtractor, Direction, NavigationCursor, FRAGMENT_TERMINATOR};
use crate::speech::{SpeakOutcome, SpeechController, SpeechEngine};
use crate::tree::UiTree;

use super::message::{NarratorCommand, NarratorMessage, SettingChange};

/// Spoken when the host binds the narrator.
pub const ACTIVE_PHRASE: &str = "screen reader active";

// ---------------------------------------------------------------------------
// Narrator
// ---------------------------------------------------------------------------

/// The screen reader core.
///
/// Create with [`Narrator::new`], then either call [`run`](Self::run) inside
/// a tokio task or feed messages directly through [`handle`](Self::handle).
///
/// ```rust,no_run
/// use screen_narrator::config::NarratorSettings;
/// use screen_narrator::service::{Narrator, NarratorMessage};
/// use screen_narrator::speech::LogEngine;
///
/// # async fn example() {
/// let narrator = Narrator::new(NarratorSettings::default(), Box::new(LogEngine::default()));
/// let (tx, rx) = tokio::sync::mpsc::channel(64);
/// let task = tokio::spawn(narrator.run(rx));
///
/// tx.send(NarratorMessage::Connected).await.unwrap();
/// drop(tx);
/// let _narrator = task.await.unwrap();
/// # }
/// ```
pub struct Narrator {
    settings: NarratorSettings,
    settings_path: Option<PathBuf>,
    tree: Option<UiTree>,
    cursor: NavigationCursor,
    extractor: ContentExtractor,
    dispatcher: EventDispatcher,
    speech: SpeechController,
    enabled: bool,
}

impl Narrator {
    pub fn new(settings: NarratorSettings, engine: Box<dyn SpeechEngine>) -> Self {
        Self {
            settings,
            settings_path: None,
            tree: None,
            cursor: NavigationCursor::new(),
            extractor: ContentExtractor::new(),
            dispatcher: EventDispatcher::new(),
            speech: SpeechController::new(engine),
            enabled: true,
        }
    }

    /// Persist runtime setting changes to `path`.
    pub fn with_settings_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.settings_path = Some(path.into());
        self
    }

    pub fn with_extractor(mut self, extractor: ContentExtractor) -> Self {
        self.extractor = extractor;
        self
    }

    pub fn with_dispatcher(mut self, dispatcher: EventDispatcher) -> Self {
        self.dispatcher = dispatcher;
        self
    }

    pub fn settings(&self) -> &NarratorSettings {
        &self.settings
    }

    pub fn tree(&self) -> Option<&UiTree> {
        self.tree.as_ref()
    }

    pub fn cursor(&self) -> &NavigationCursor {
        &self.cursor
    }

    pub fn speech(&self) -> &SpeechController {
        &self.speech
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    // -----------------------------------------------------------------------
    // Main async loop
    // -----------------------------------------------------------------------

    /// Handle messages until every sender is gone, then silence output and
    /// hand the narrator back.
    pub async fn run(mut self, mut rx: mpsc::Receiver<NarratorMessage>) -> Self {
        while let Some(message) = rx.recv().await {
            self = self.off_runtime(move |n| n.handle(message)).await;
        }

        log::info!("narrator: channel closed, shutting down");
        self.off_runtime(|n| {
            n.speech.stop();
        })
        .await
    }

    /// Run `f` on the blocking pool and take the narrator back.  A panic in
    /// `f` is re-raised here.
    async fn off_runtime<F>(mut self, f: F) -> Self
    where
        F: FnOnce(&mut Self) + Send + 'static,
    {
        let result = tokio::task::spawn_blocking(move || {
            f(&mut self);
            self
        })
        .await;

        match result {
            Ok(narrator) => narrator,
            Err(e) if e.is_panic() => std::panic::resume_unwind(e.into_panic()),
            Err(e) => panic!("narrator: blocking handler did not complete: {e}"),
        }
    }

    /// Process one message to completion.
    pub fn handle(&mut self, message: NarratorMessage) {
        self.speech.sync_with_engine();
        let config = self.settings.snapshot();

        match message {
            NarratorMessage::Connected => {
                log::info!("narrator: connected");
                if config.auto_read {
                    self.say(ACTIVE_PHRASE, &config);
                }
            }
            NarratorMessage::TreeUpdated(tree) => {
                log::debug!("narrator: tree updated ({} nodes)", tree.len());
                self.tree = Some(tree);
            }
            NarratorMessage::Notification(notification) => {
                self.on_notification(&notification, &config);
            }
            NarratorMessage::Command(command) => self.on_command(command, &config),
            NarratorMessage::EngineReady { ok: true } => {
                if let Err(e) = self.speech.engine_ready(&config) {
                    log::warn!("narrator: could not configure voice: {e}");
                }
            }
            NarratorMessage::EngineReady { ok: false } => {
                log::warn!("narrator: speech engine failed to initialise");
            }
            NarratorMessage::SpeechFinished => self.speech.finished(),
            NarratorMessage::Interrupt => {
                log::debug!("narrator: interrupted");
                self.speech.stop();
            }
            NarratorMessage::SetEnabled(enabled) => {
                log::info!("narrator: {}", if enabled { "enabled" } else { "disabled" });
                self.enabled = enabled;
                if !enabled {
                    self.speech.stop();
                }
            }
            NarratorMessage::UpdateSetting(change) => self.update_setting(&change),
        }
    }

    // -----------------------------------------------------------------------
    // Handlers
    // -----------------------------------------------------------------------

    fn on_notification(&mut self, notification: &ChangeNotification, config: &ConfigSnapshot) {
        let source = match (notification.source, self.tree.as_ref()) {
            (Some((epoch, id)), Some(tree)) => tree.resolve(epoch, id),
            _ => None,
        };
        let dispatch = self.dispatcher.dispatch(notification, source, config);

        let mut text = dispatch.announcement.unwrap_or_default();
        if dispatch.read_screen {
            if let Some(screen) = self.screen_text() {
                // One utterance so the screen text does not cut off the
                // announcement.
                if !text.is_empty() {
                    text.push_str(FRAGMENT_TERMINATOR);
                    text.push(' ');
                }
                text.push_str(&screen);
            }
        }
        self.say(&text, config);
    }

    fn on_command(&mut self, command: NarratorCommand, config: &ConfigSnapshot) {
        log::debug!("narrator: command {command:?}");
        match command {
            NarratorCommand::NavigateNext => self.navigate(Direction::Next, config),
            NarratorCommand::NavigatePrevious => self.navigate(Direction::Previous, config),
            NarratorCommand::ReadScreen => match self.screen_text() {
                Some(text) => {
                    self.say(&text, config);
                }
                None => log::debug!("narrator: nothing to read"),
            },
            NarratorCommand::StopSpeech => {
                self.speech.stop();
            }
            NarratorCommand::CycleSpeechMode => self.cycle_speech_mode(config),
        }
    }

    fn navigate(&mut self, direction: Direction, config: &ConfigSnapshot) {
        let Some(tree) = self.tree.as_ref() else {
            log::debug!("narrator: no tree to navigate");
            return;
        };
        let Some(root) = tree.root() else {
            return;
        };
        if let Some(hit) = self.cursor.navigate(tree, root, direction) {
            if let Some(label) = hit.announcement {
                self.say(&label, config);
            }
        }
    }

    fn cycle_speech_mode(&mut self, before: &ConfigSnapshot) {
        let next = before.speech_mode.next();
        self.settings.modes.speech_mode = next;
        self.persist();

        // Announce with whichever mode is audible so switching to off is
        // still confirmed.
        let config = if next.is_silent() {
            before.clone()
        } else {
            self.settings.snapshot()
        };
        self.say(next.label(), &config);
    }

    fn update_setting(&mut self, change: &SettingChange) {
        log::debug!("narrator: setting {change:?}");
        change.apply(&mut self.settings);
        self.persist();
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    /// Extracted text of the current tree, if there is any.
    fn screen_text(&self) -> Option<String> {
        let extraction = self.extractor.extract_tree(self.tree.as_ref()?)?;
        (!extraction.is_empty()).then_some(extraction.text)
    }

    fn say(&mut self, text: &str, config: &ConfigSnapshot) -> SpeakOutcome {
        if !self.enabled {
            log::debug!("narrator: disabled, not speaking {text:?}");
            return SpeakOutcome::Muted;
        }
        self.speech.speak_text(text, config)
    }

    fn persist(&self) {
        let Some(path) = &self.settings_path else {
            return;
        };
        if let Err(e) = self.settings.save_to(path) {
            log::warn!("narrator: could not save settings to {}: {e}", path.display());
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
