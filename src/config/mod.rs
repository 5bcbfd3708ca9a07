//! Configuration module for Clipboard Typer.
//!
//! Provides [`Settings`] (the flat, user-editable configuration), the
//! [`Theme`] selector, partial updates via [`SettingsUpdate`] and JSON
//! persistence via `Settings::load_from` / `Settings::save_to`.

pub mod settings;

pub use settings::{
    sanitize_hotkey, Settings, SettingsUpdate, Theme, DEFAULT_HOTKEY, DEFAULT_STOP_KEY,
    MAX_DELAY_SECS, SETTINGS_FILE,
};

use thiserror::Error;

/// Problems reading, writing or validating settings.
///
/// Load failures are never fatal: callers fall back to
/// [`Settings::default`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot access settings file: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed settings file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("missing required keys in settings file: {}", .0.join(", "))]
    MissingFields(Vec<String>),

    #[error("{0}")]
    Invalid(String),

    /// Settings cannot change while a key is being recorded.
    #[error("Finish recording the key before saving")]
    Recording,
}
