//! Configuration management for eyes-break.
//!
//! This module handles loading, saving, and validating settings stored in
//! `~/.eyes-break/`.

mod paths;
mod settings;
mod validate;

pub use paths::{Paths, HOME_ENV};
pub use settings::{AppSettings, Language, SettingsHandle, SettingsStore};
pub use validate::{validate_time_field, FieldError, SettingKey, SettingsDraft};
