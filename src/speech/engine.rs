//! Synthesis engine trait and implementations.
//!
//! # Overview
//!
//! [`SpeechEngine`] is what the [`SpeechController`] drives.  It is
//! object-safe and `Send` so the narrator can own a `Box<dyn SpeechEngine>`
//! inside its task.
//!
//! - [`LogEngine`] writes every utterance to the log.  Always available; used
//!   when no synthesizer is configured or the configured one cannot run.
//! - [`ProcessEngine`] drives an espeak-compatible command line, one child
//!   process per utterance.  Killing the child is the cancellation.
//! - `MockSpeechEngine` (test-only) records every call so tests can inspect
//!   the engine's current slot.
//!
//! [`SpeechController`]: super::SpeechController

use std::process::{Child, Command, Stdio};

use thiserror::Error;

use super::utterance::Utterance;

// ---------------------------------------------------------------------------
// SpeechError
// ---------------------------------------------------------------------------

/// All errors that can arise from a synthesis engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpeechError {
    /// The engine has not finished initialising.
    #[error("speech engine not ready")]
    NotReady,

    /// The backend could not be reached at all.
    #[error("speech engine unavailable: {0}")]
    Unavailable(String),

    /// The requested voice language is not installed.
    #[error("language not supported: {0}")]
    LanguageUnsupported(String),

    /// The backend accepted the request and then failed.
    #[error("synthesis failed: {0}")]
    Synthesis(String),
}

/// Engine-level voice selection applied on the ready callback.
///
/// Volume, rate and pitch travel with each [`Utterance`]; only the language
/// is sticky.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VoiceSettings {
    /// BCP-47 style tag such as `en-US`; `None` selects the engine default.
    pub language: Option<String>,
}

// ---------------------------------------------------------------------------
// SpeechEngine trait
// ---------------------------------------------------------------------------

/// Object-safe interface for text-to-speech backends.
///
/// # Contract
///
/// - `speak` replaces anything currently playing.
/// - `stop` on an idle engine is a no-op.
/// - `is_speaking` may reap finished work, hence `&mut self`.
pub trait SpeechEngine: Send {
    fn speak(&mut self, utterance: &Utterance) -> Result<(), SpeechError>;

    fn stop(&mut self);

    fn is_speaking(&mut self) -> bool;

    fn configure(&mut self, voice: &VoiceSettings) -> Result<(), SpeechError>;
}

// Compile-time assertion: Box<dyn SpeechEngine> must be constructible.
const _: fn() = || {
    fn _assert_object_safe(_: Box<dyn SpeechEngine>) {}
};

/// Open the engine for the `synthesizer` setting: `"log"` (or empty) selects
/// [`LogEngine`], anything else is taken as a command name for
/// [`ProcessEngine`].
///
/// A command that fails [`ProcessEngine::verify`] is replaced by
/// [`LogEngine`]; the error is returned alongside so the caller can report
/// the engine as not ready.
pub fn open_engine(synthesizer: &str) -> (Box<dyn SpeechEngine>, Result<(), SpeechError>) {
    match synthesizer.trim() {
        "" | "log" => (Box::new(LogEngine::default()), Ok(())),
        command => {
            let engine = ProcessEngine::new(command);
            match engine.verify() {
                Ok(()) => (Box::new(engine), Ok(())),
                Err(e) => (Box::new(LogEngine::default()), Err(e)),
            }
        }
    }
}

// ---------------------------------------------------------------------------
// LogEngine
// ---------------------------------------------------------------------------

/// Writes utterances to the log instead of an audio device.
#[derive(Debug, Default)]
pub struct LogEngine {
    language: Option<String>,
}

impl SpeechEngine for LogEngine {
    fn speak(&mut self, utterance: &Utterance) -> Result<(), SpeechError> {
        log::info!(
            "speak [{}] vol={:.2} rate={:.2} pitch={:.2}: {}",
            self.language.as_deref().unwrap_or("default"),
            utterance.volume,
            utterance.rate,
            utterance.pitch,
            utterance.text
        );
        Ok(())
    }

    fn stop(&mut self) {
        log::debug!("speak: stop");
    }

    fn is_speaking(&mut self) -> bool {
        // Logging completes synchronously.
        false
    }

    fn configure(&mut self, voice: &VoiceSettings) -> Result<(), SpeechError> {
        self.language = voice.language.clone();
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// ProcessEngine
// ---------------------------------------------------------------------------

/// espeak's normal speaking rate in words per minute.
const BASE_WORDS_PER_MINUTE: f32 = 175.0;
/// espeak's normal pitch on its 0 – 99 scale.
const BASE_PITCH: f32 = 50.0;
const MAX_PITCH: f32 = 99.0;

/// Drives an espeak-ng compatible command line.
#[derive(Debug)]
pub struct ProcessEngine {
    command: String,
    voice: Option<String>,
    child: Option<Child>,
}

impl ProcessEngine {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            voice: None,
            child: None,
        }
    }

    /// Command-line arguments for `utterance`, text last.
    pub fn args_for(&self, utterance: &Utterance) -> Vec<String> {
        let amplitude = (utterance.volume.clamp(0.0, 1.0) * 100.0).round() as u32;
        let wpm = (utterance.rate.max(0.0) * BASE_WORDS_PER_MINUTE).round() as u32;
        let pitch = (utterance.pitch.max(0.0) * BASE_PITCH).min(MAX_PITCH).round() as u32;

        let mut args = vec![
            "-a".to_owned(),
            amplitude.to_string(),
            "-s".to_owned(),
            wpm.to_string(),
            "-p".to_owned(),
            pitch.to_string(),
        ];
        if let Some(voice) = &self.voice {
            args.push("-v".to_owned());
            args.push(voice.clone());
        }
        args.push("--".to_owned());
        args.push(utterance.text.clone());
        args
    }

    /// Check that the command runs at all.
    pub fn verify(&self) -> Result<(), SpeechError> {
        let status = Command::new(&self.command)
            .arg("--version")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map_err(|e| SpeechError::Unavailable(format!("{}: {e}", self.command)))?;
        if !status.success() {
            return Err(SpeechError::Unavailable(format!(
                "{} exited with {}",
                self.command, status
            )));
        }
        Ok(())
    }

    fn kill_child(&mut self) {
        if let Some(mut child) = self.child.take() {
            // Already exited is fine.
            let _ = child.kill();
            let _ = child.wait();
        }
    }

    /// Ask the command whether it has a voice for `language`.  The listing
    /// always starts with a header line; anything after it is a match.
    fn has_voice(&self, language: &str) -> Result<bool, SpeechError> {
        let output = Command::new(&self.command)
            .arg(format!("--voices={language}"))
            .stdin(Stdio::null())
            .stderr(Stdio::null())
            .output()
            .map_err(|e| SpeechError::Unavailable(format!("{}: {e}", self.command)))?;
        if !output.status.success() {
            return Err(SpeechError::Unavailable(format!(
                "{} exited with {}",
                self.command, output.status
            )));
        }
        let listing = String::from_utf8_lossy(&output.stdout);
        Ok(listing.lines().filter(|l| !l.trim().is_empty()).count() > 1)
    }
}

impl SpeechEngine for ProcessEngine {
    fn speak(&mut self, utterance: &Utterance) -> Result<(), SpeechError> {
        self.kill_child();
        let child = Command::new(&self.command)
            .args(self.args_for(utterance))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| SpeechError::Unavailable(format!("{}: {e}", self.command)))?;
        log::debug!("speak: spawned {} (pid {})", self.command, child.id());
        self.child = Some(child);
        Ok(())
    }

    fn stop(&mut self) {
        self.kill_child();
    }

    fn is_speaking(&mut self) -> bool {
        let Some(child) = self.child.as_mut() else {
            return false;
        };
        match child.try_wait() {
            Ok(None) => true,
            Ok(Some(status)) => {
                if !status.success() {
                    log::warn!("speak: {} exited with {status}", self.command);
                }
                self.child = None;
                false
            }
            Err(e) => {
                log::warn!("speak: could not poll {}: {e}", self.command);
                self.child = None;
                false
            }
        }
    }

    fn configure(&mut self, voice: &VoiceSettings) -> Result<(), SpeechError> {
        match voice.language.as_deref() {
            None => {
                self.voice = None;
                Ok(())
            }
            Some(language) => {
                let tag = language.to_ascii_lowercase();
                if !self.has_voice(&tag)? {
                    return Err(SpeechError::LanguageUnsupported(language.to_owned()));
                }
                self.voice = Some(tag);
                Ok(())
            }
        }
    }
}

impl Drop for ProcessEngine {
    fn drop(&mut self) {
        self.kill_child();
    }
}

// ---------------------------------------------------------------------------
// MockSpeechEngine  (test-only)
// ---------------------------------------------------------------------------

#[cfg(test)]
pub use mock::{EngineCall, MockSpeechEngine};

#[cfg(test)]
mod mock {
    use std::sync::{Arc, Mutex};

    use super::*;

    /// One call observed by the mock.
    #[derive(Debug, Clone, PartialEq)]
    pub enum EngineCall {
        Speak(String),
        Stop,
        Configure(Option<String>),
    }

    #[derive(Debug, Default)]
    struct MockState {
        calls: Vec<EngineCall>,
        current: Option<Utterance>,
        fail_speak: bool,
        unsupported_language: Option<String>,
        language: Option<String>,
    }

    /// Records every call; clones share state, so keep one clone for
    /// assertions and hand the other to the controller.
    #[derive(Debug, Clone, Default)]
    pub struct MockSpeechEngine {
        state: Arc<Mutex<MockState>>,
    }

    impl MockSpeechEngine {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn calls(&self) -> Vec<EngineCall> {
            self.state.lock().unwrap().calls.clone()
        }

        pub fn spoken(&self) -> Vec<String> {
            self.calls()
                .into_iter()
                .filter_map(|c| match c {
                    EngineCall::Speak(text) => Some(text),
                    _ => None,
                })
                .collect()
        }

        /// The utterance occupying the engine right now.
        pub fn current(&self) -> Option<Utterance> {
            self.state.lock().unwrap().current.clone()
        }

        pub fn language(&self) -> Option<String> {
            self.state.lock().unwrap().language.clone()
        }

        /// Simulate playback completing.
        pub fn finish(&self) {
            self.state.lock().unwrap().current = None;
        }

        pub fn set_fail_speak(&self, fail: bool) {
            self.state.lock().unwrap().fail_speak = fail;
        }

        pub fn set_unsupported_language(&self, language: impl Into<String>) {
            self.state.lock().unwrap().unsupported_language = Some(language.into());
        }
    }

    impl SpeechEngine for MockSpeechEngine {
        fn speak(&mut self, utterance: &Utterance) -> Result<(), SpeechError> {
            let mut state = self.state.lock().unwrap();
            state.calls.push(EngineCall::Speak(utterance.text.clone()));
            if state.fail_speak {
                return Err(SpeechError::Unavailable("mock".into()));
            }
            state.current = Some(utterance.clone());
            Ok(())
        }

        fn stop(&mut self) {
            let mut state = self.state.lock().unwrap();
            state.calls.push(EngineCall::Stop);
            state.current = None;
        }

        fn is_speaking(&mut self) -> bool {
            self.state.lock().unwrap().current.is_some()
        }

        fn configure(&mut self, voice: &VoiceSettings) -> Result<(), SpeechError> {
            let mut state = self.state.lock().unwrap();
            state.calls.push(EngineCall::Configure(voice.language.clone()));
            if let Some(lang) = &voice.language {
                if state.unsupported_language.as_ref() == Some(lang) {
                    return Err(SpeechError::LanguageUnsupported(lang.clone()));
                }
            }
            state.language = voice.language.clone();
            Ok(())
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
