//! Cross-platform application paths using the `dirs` crate.
//!
//! Layout:
//!
//! Config dir (settings + exported profiles):
//!   Windows: %APPDATA%\screen-narrator\
//!   macOS:   ~/Library/Application Support/screen-narrator/
//!   Linux:   ~/.config/screen-narrator/

use std::path::PathBuf;

/// Holds all resolved application directory/file paths.
#[derive(Debug, Clone)]
pub struct AppPaths {
    /// Directory for `settings.toml` and `settings-export.json`.
    pub config_dir: PathBuf,
    /// Full path to `settings.toml`.
    pub settings_file: PathBuf,
    /// Default target of a JSON settings export.
    pub export_file: PathBuf,
}

impl AppPaths {
    const APP_NAME: &'static str = "screen-narrator";

    /// Resolves all paths using the `dirs` crate.
    ///
    /// Falls back to the current directory if the platform cannot provide a
    /// standard path.
    pub fn new() -> Self {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(Self::APP_NAME);

        let settings_file = config_dir.join("settings.toml");
        let export_file = config_dir.join("settings-export.json");

        Self {
            config_dir,
            settings_file,
            export_file,
        }
    }
}

impl Default for AppPaths {
    fn default() -> Self {
        Self::new()
    }
}
