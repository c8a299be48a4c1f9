//! Application settings for eyes-break.
//!
//! Settings are persisted to `~/.eyes-break/settings.json` and shared live
//! with the session components through a [`SettingsHandle`].

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use crate::error::EyesBreakError;

/// Live, read-only view of the current settings.
///
/// Reading through the handle always observes the most recently saved value.
pub type SettingsHandle = watch::Receiver<AppSettings>;

/// Supported interface languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// English.
    #[default]
    En,
    /// Spanish.
    Es,
}

impl Language {
    /// All supported languages.
    pub const ALL: [Self; 2] = [Self::En, Self::Es];

    /// The language code as persisted.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Es => "es",
        }
    }

    /// Human-readable language name.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::En => "English",
            Self::Es => "Español",
        }
    }

    /// Parse a language code.
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|lang| lang.code().eq_ignore_ascii_case(code.trim()))
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Persisted application settings.
///
/// Field order is the on-disk key order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AppSettings {
    /// Work interval, `HH:MM:SS`.
    pub work_time: String,
    /// Break interval, `HH:MM:SS`.
    pub break_time: String,
    /// Interface language.
    pub language: Language,
    /// Delay between characters of the status message, in milliseconds.
    pub message_animation_delay: u64,
    /// Show a desktop notification when a break starts.
    pub notifications_enabled: bool,
    /// Play sounds on session transitions.
    pub sound_enabled: bool,
}

// Default value functions
fn default_work_time() -> String {
    "00:20:00".to_string()
}

fn default_break_time() -> String {
    "00:00:20".to_string()
}

const fn default_message_animation_delay() -> u64 {
    70
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            work_time: default_work_time(),
            break_time: default_break_time(),
            language: Language::default(),
            message_animation_delay: default_message_animation_delay(),
            notifications_enabled: true,
            sound_enabled: true,
        }
    }
}

impl AppSettings {
    /// Read settings from a specific path.
    ///
    /// Returns defaults if the file doesn't exist. Fields missing from an
    /// otherwise well-formed file take their default values.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn read_from_path(path: &Path) -> Result<Self, EyesBreakError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path).map_err(|e| {
            EyesBreakError::Config(format!(
                "Failed to read settings file {}: {e}",
                path.display()
            ))
        })?;

        serde_json::from_str(&contents).map_err(|e| {
            EyesBreakError::Config(format!(
                "Failed to parse settings file {}: {e}",
                path.display()
            ))
        })
    }

    /// Write settings to a specific path.
    ///
    /// # Errors
    ///
    /// Returns an error if the settings file cannot be written.
    pub fn write_to_path(&self, path: &Path) -> Result<(), EyesBreakError> {
        let mut contents = serde_json::to_string_pretty(self)
            .map_err(|e| EyesBreakError::Config(format!("Failed to serialize settings: {e}")))?;
        contents.push('\n');

        std::fs::write(path, contents).map_err(|e| {
            EyesBreakError::Config(format!(
                "Failed to write settings file {}: {e}",
                path.display()
            ))
        })
    }
}

/// Owner of the persisted settings and of the live value.
///
/// This is the only writer; every other component reads through a
/// [`SettingsHandle`].
#[derive(Debug)]
pub struct SettingsStore {
    path: PathBuf,
    tx: watch::Sender<AppSettings>,
}

impl SettingsStore {
    /// Create a store backed by `path`, holding defaults until [`load`](Self::load).
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        let (tx, _rx) = watch::channel(AppSettings::default());
        Self { path, tx }
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load persisted settings and publish them.
    ///
    /// A malformed file is ignored as a whole: the compiled-in defaults are
    /// used instead of a partial merge.
    pub fn load(&self) -> AppSettings {
        let settings = AppSettings::read_from_path(&self.path).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "falling back to default settings");
            AppSettings::default()
        });

        self.tx.send_replace(settings.clone());
        settings
    }

    /// Persist settings, then publish them.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written; the live value is left
    /// unchanged in that case.
    pub fn save(&self, settings: AppSettings) -> Result<(), EyesBreakError> {
        settings.write_to_path(&self.path).inspect_err(|e| {
            tracing::error!(error = %e, "error saving settings");
        })?;

        tracing::debug!(path = %self.path.display(), "settings saved");
        self.tx.send_replace(settings);
        Ok(())
    }

    /// Apply a change to the current settings and persist the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn update<F>(&self, change: F) -> Result<AppSettings, EyesBreakError>
    where
        F: FnOnce(&mut AppSettings),
    {
        let mut settings = self.current();
        change(&mut settings);
        self.save(settings.clone())?;
        Ok(settings)
    }

    /// Persist and publish the compiled-in defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn reset_to_defaults(&self) -> Result<(), EyesBreakError> {
        self.save(AppSettings::default())
    }

    /// Snapshot of the current settings.
    #[must_use]
    pub fn current(&self) -> AppSettings {
        self.tx.borrow().clone()
    }

    /// A live handle for readers.
    #[must_use]
    pub fn handle(&self) -> SettingsHandle {
        self.tx.subscribe()
    }
}
