//! Application settings, defaults and JSON persistence.
//!
//! The settings file is a flat JSON object:
//!
//! ```json
//! {
//!   "min_delay": 0.05,
//!   "max_delay": 0.15,
//!   "start_delay": 0.5,
//!   "hotkey": "ctrl+shift+t",
//!   "stop_key": "esc",
//!   "theme": "light"
//! }
//! ```
//!
//! `hotkey`, `stop_key`, `min_delay` and `max_delay` are required.  A file
//! missing any of them is ignored as a whole and the built-in defaults apply.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::ConfigError;

/// Fixed relative path of the settings file.
pub const SETTINGS_FILE: &str = "clipboard_typer_settings.json";

/// Start/stop hotkey used when none (or an unusable one) is configured.
pub const DEFAULT_HOTKEY: &str = "ctrl+shift+t";

/// Emergency stop key used when none is configured.
pub const DEFAULT_STOP_KEY: &str = "esc";

/// Upper bound for any delay, in seconds.
pub const MAX_DELAY_SECS: f64 = 3600.0;

const REQUIRED_FIELDS: [&str; 4] = ["hotkey", "stop_key", "min_delay", "max_delay"];

// ---------------------------------------------------------------------------
// Theme
// ---------------------------------------------------------------------------

/// Colour scheme of the settings window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
    Hacker,
}

impl Theme {
    pub const ALL: [Theme; 3] = [Theme::Light, Theme::Dark, Theme::Hacker];

    /// Resolve a theme by its settings-file name.  Unknown names fall back to
    /// [`Theme::Light`].
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "dark" => Theme::Dark,
            "hacker" => Theme::Hacker,
            "light" => Theme::Light,
            other => {
                log::warn!("unknown theme '{other}', using light");
                Theme::Light
            }
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
            Theme::Hacker => "hacker",
        }
    }

    /// Label shown next to the radio button.
    pub fn label(&self) -> &'static str {
        match self {
            Theme::Light => "Light",
            Theme::Dark => "Dark",
            Theme::Hacker => "Hacker",
        }
    }
}

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

/// Everything the user can configure.
///
/// Delays are in seconds.  A validated `Settings` always has non-negative,
/// finite delays with `min_delay <= max_delay`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Settings {
    pub min_delay: f64,
    pub max_delay: f64,
    pub start_delay: f64,
    pub hotkey: String,
    pub stop_key: String,
    pub theme: Theme,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            min_delay: 0.05,
            max_delay: 0.15,
            start_delay: 0.5,
            hotkey: DEFAULT_HOTKEY.into(),
            stop_key: DEFAULT_STOP_KEY.into(),
            theme: Theme::Light,
        }
    }
}

/// Shape of the file on disk: every field optional so that missing required
/// fields can be reported by name instead of as a serde error.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SettingsFile {
    min_delay: Option<f64>,
    max_delay: Option<f64>,
    start_delay: Option<f64>,
    hotkey: Option<String>,
    stop_key: Option<String>,
    theme: Option<String>,
}

impl SettingsFile {
    fn missing_required(&self) -> Vec<String> {
        let present = [
            self.hotkey.is_some(),
            self.stop_key.is_some(),
            self.min_delay.is_some(),
            self.max_delay.is_some(),
        ];
        REQUIRED_FIELDS
            .iter()
            .zip(present)
            .filter(|(_, present)| !present)
            .map(|(name, _)| name.to_string())
            .collect()
    }
}

impl Settings {
    /// Load from an explicit path.
    ///
    /// Returns `Ok(Settings::default())` when the file does not exist.
    ///
    /// # Errors
    ///
    /// * [`ConfigError::Io`] — the file exists but cannot be read.
    /// * [`ConfigError::Parse`] — not JSON, or a field has the wrong type.
    /// * [`ConfigError::MissingFields`] — a required field is absent.
    /// * [`ConfigError::Invalid`] — a delay is negative, not finite or above
    ///   [`MAX_DELAY_SECS`].
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            log::info!(
                "settings file {} not found, using defaults",
                path.display()
            );
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let file: SettingsFile = serde_json::from_str(&content)?;

        let missing = file.missing_required();
        if !missing.is_empty() {
            return Err(ConfigError::MissingFields(missing));
        }

        let defaults = Self::default();
        let mut settings = Self {
            min_delay: file.min_delay.unwrap_or(defaults.min_delay),
            max_delay: file.max_delay.unwrap_or(defaults.max_delay),
            start_delay: file.start_delay.unwrap_or(defaults.start_delay),
            hotkey: file.hotkey.unwrap_or(defaults.hotkey),
            stop_key: file.stop_key.unwrap_or(defaults.stop_key),
            theme: file
                .theme
                .as_deref()
                .map(Theme::from_name)
                .unwrap_or(defaults.theme),
        };
        settings.validate()?;

        log::info!("settings loaded from {}", path.display());
        Ok(settings)
    }

    /// Load from `path`, logging and falling back to defaults on any error.
    pub fn load_or_default(path: &Path) -> Self {
        Self::load_from(path).unwrap_or_else(|e| {
            log::warn!("ignoring settings file {}: {e}", path.display());
            Self::default()
        })
    }

    /// Overwrite `path` with these settings, creating parent directories as
    /// needed.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        log::info!("settings saved to {}", path.display());
        Ok(())
    }

    /// Check the delay invariants, swapping `min_delay` and `max_delay` when
    /// they are out of order.
    pub fn validate(&mut self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("min_delay", self.min_delay),
            ("max_delay", self.max_delay),
            ("start_delay", self.start_delay),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::Invalid(format!("{name} must be a number")));
            }
            if value < 0.0 {
                return Err(ConfigError::Invalid("Delays cannot be negative".into()));
            }
            if value > MAX_DELAY_SECS {
                return Err(ConfigError::Invalid(format!(
                    "Delays cannot exceed {MAX_DELAY_SECS} seconds"
                )));
            }
        }
        if self.min_delay > self.max_delay {
            std::mem::swap(&mut self.min_delay, &mut self.max_delay);
        }
        Ok(())
    }

    /// Apply a partial update.  Nothing is changed unless the whole update
    /// validates.
    pub fn apply(&mut self, update: SettingsUpdate) -> Result<(), ConfigError> {
        let mut next = self.clone();
        if let Some(v) = update.min_delay {
            next.min_delay = v;
        }
        if let Some(v) = update.max_delay {
            next.max_delay = v;
        }
        if let Some(v) = update.start_delay {
            next.start_delay = v;
        }
        if let Some(hotkey) = update.hotkey {
            next.hotkey = sanitize_hotkey(&hotkey);
        }
        if let Some(stop_key) = update.stop_key {
            next.stop_key = stop_key.trim().to_string();
        }
        if let Some(theme) = update.theme {
            next.theme = theme;
        }
        next.validate()?;
        *self = next;
        Ok(())
    }

    /// The two-line hint shown at the bottom of the window.
    pub fn info_text(&self) -> String {
        format!(
            "Press {} to start/stop typing from clipboard.\nPress {} for emergency stop.",
            self.hotkey, self.stop_key
        )
    }
}

/// Clean up a hotkey typed or recorded in the UI.
///
/// An empty value becomes [`DEFAULT_HOTKEY`]; a multi-character value without
/// `+` is treated as space separated (`"ctrl shift t"` → `"ctrl+shift+t"`).
pub fn sanitize_hotkey(raw: &str) -> String {
    let hotkey = raw.trim();
    if hotkey.is_empty() {
        return DEFAULT_HOTKEY.into();
    }
    if !hotkey.contains('+') && hotkey.chars().count() > 1 {
        return hotkey.split_whitespace().collect::<Vec<_>>().join("+");
    }
    hotkey.to_string()
}

// ---------------------------------------------------------------------------
// SettingsUpdate
// ---------------------------------------------------------------------------

/// A partial change to [`Settings`]; `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SettingsUpdate {
    pub min_delay: Option<f64>,
    pub max_delay: Option<f64>,
    pub start_delay: Option<f64>,
    pub hotkey: Option<String>,
    pub stop_key: Option<String>,
    pub theme: Option<Theme>,
}

impl SettingsUpdate {
    /// Build an update from the raw text of the window's form fields.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Invalid`] when a delay field is not a number.
    pub fn from_form(
        min_delay: &str,
        max_delay: &str,
        start_delay: &str,
        hotkey: &str,
        stop_key: &str,
        theme: Theme,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            min_delay: Some(parse_seconds("min_delay", min_delay)?),
            max_delay: Some(parse_seconds("max_delay", max_delay)?),
            start_delay: Some(parse_seconds("start_delay", start_delay)?),
            hotkey: Some(hotkey.to_string()),
            stop_key: Some(stop_key.to_string()),
            theme: Some(theme),
        })
    }
}

fn parse_seconds(field: &str, raw: &str) -> Result<f64, ConfigError> {
    raw.trim()
        .parse::<f64>()
        .map_err(|_| ConfigError::Invalid(format!("could not convert {field} '{raw}' to a number")))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
