//! Application entry point: screen narrator driven over stdin.
//!
//! # Startup sequence
//!
//! 1. Load [`NarratorSettings`] from disk (defaults on first run).
//! 2. Initialise logging (`debug` when advanced logging is on).
//! 3. Create [`tokio`] runtime (multi-thread, 2 workers).
//! 4. Open the synthesis engine named by the settings (log engine if it
//!    cannot run).
//! 5. Spawn the narrator loop and report whether the engine is ready.
//! 6. Spawn the hotkey listener thread (unless key bindings are off).
//! 7. Pump host messages from stdin until end of input, then wait for the
//!    narrator to drain and stop speaking.
//!
//! `--export-settings [FILE]` and `--import-settings FILE` run after step 2
//! and exit without starting the narrator.

use std::path::PathBuf;

use anyhow::Context;
use tokio::sync::mpsc;

use screen_narrator::{
    config::{AppPaths, NarratorSettings},
    host,
    hotkey::HotkeyListener,
    service::{Narrator, NarratorMessage},
    speech::open_engine,
};

fn main() -> anyhow::Result<()> {
    // 1. Configuration
    let paths = AppPaths::new();
    let (settings, load_error) = match NarratorSettings::load_from(&paths.settings_file) {
        Ok(settings) => (settings, None),
        Err(e) => (NarratorSettings::default(), Some(e)),
    };

    // 2. Logging
    let default_filter = if settings.advanced.enable_logging {
        "debug"
    } else {
        "info"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
    log::info!("screen narrator starting up");
    if let Some(e) = load_error {
        log::warn!("Failed to load settings ({e}); using defaults");
    }

    let mut args = std::env::args().skip(1);
    match args.next().as_deref() {
        Some("--export-settings") => {
            let target = args.next().map(PathBuf::from).unwrap_or(paths.export_file);
            settings.export_to(&target)?;
            log::info!("settings exported to {}", target.display());
            return Ok(());
        }
        Some("--import-settings") => {
            let source = args
                .next()
                .map(PathBuf::from)
                .context("--import-settings needs a file")?;
            let mut settings = settings;
            let applied = settings.import_from(&source)?;
            settings.save_to(&paths.settings_file)?;
            log::info!("imported {applied} settings from {}", source.display());
            return Ok(());
        }
        Some(other) => log::warn!("ignoring unknown argument {other:?}"),
        None => {}
    }

    // 3. Tokio runtime
    let rt = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .expect("failed to create tokio runtime");

    // 4. Synthesis engine
    let (engine, availability) = open_engine(&settings.speech.synthesizer);
    match &availability {
        Ok(()) => log::info!("synthesizer: {}", settings.speech.synthesizer),
        Err(e) => log::warn!("synthesizer unusable ({e}); speaking to the log instead"),
    }

    rt.block_on(async move {
        // 5. Narrator loop
        let (tx, rx) = mpsc::channel::<NarratorMessage>(64);
        let keyboard = settings.keyboard.clone();
        let narrator =
            Narrator::new(settings, engine).with_settings_path(paths.settings_file.clone());
        let task = tokio::spawn(narrator.run(rx));

        let ready = NarratorMessage::EngineReady { ok: availability.is_ok() };
        if tx.send(ready).await.is_err() {
            log::error!("narrator stopped before the engine was reported ready");
        }

        // 6. Hotkey listener thread
        let _listener = keyboard
            .key_bindings
            .then(|| HotkeyListener::start(&keyboard, tx.clone()));

        // 7. Host input
        match host::pump_stdin(&tx).await {
            Ok(count) => log::info!("host: input closed after {count} messages"),
            Err(e) => log::error!("host: stdin read failed: {e}"),
        }
        drop(tx);

        if let Err(e) = task.await {
            log::error!("narrator task failed: {e}");
        }
    });
    Ok(())
}
