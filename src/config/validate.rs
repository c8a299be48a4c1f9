//! Validation of edited settings.
//!
//! Edits are checked field by field before anything reaches the
//! [`SettingsStore`](super::SettingsStore); an invalid draft never mutates
//! the stored configuration.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

use super::settings::{AppSettings, Language};
use crate::core::{normalize_time_input, Timespan};

static TIME_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([01]\d|2[0-3]):[0-5]\d:[0-5]\d$")
        .unwrap_or_else(|e| panic!("Invalid time regex: {e}"))
});

/// Why a single field was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FieldError {
    /// The field is empty.
    #[error("this field is required")]
    Required,
    /// Not a 24h `HH:MM:SS` value.
    #[error("invalid format, use HH:MM:SS (24h)")]
    InvalidFormat,
    /// The time is `00:00:00`.
    #[error("the time cannot be 00:00:00")]
    ZeroDuration,
    /// Not a supported language code.
    #[error("unsupported language")]
    UnknownLanguage,
    /// Not a non-negative integer.
    #[error("expected a non-negative integer")]
    InvalidNumber,
    /// Not `true` or `false`.
    #[error("expected true or false")]
    InvalidBool,
}

/// A settings field addressable from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingKey {
    /// `workTime`
    WorkTime,
    /// `breakTime`
    BreakTime,
    /// `language`
    Language,
    /// `messageAnimationDelay`
    MessageAnimationDelay,
    /// `notificationsEnabled`
    NotificationsEnabled,
    /// `soundEnabled`
    SoundEnabled,
}

impl SettingKey {
    /// All keys in schema order.
    pub const ALL: [Self; 6] = [
        Self::WorkTime,
        Self::BreakTime,
        Self::Language,
        Self::MessageAnimationDelay,
        Self::NotificationsEnabled,
        Self::SoundEnabled,
    ];

    /// The persisted (camelCase) key.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::WorkTime => "workTime",
            Self::BreakTime => "breakTime",
            Self::Language => "language",
            Self::MessageAnimationDelay => "messageAnimationDelay",
            Self::NotificationsEnabled => "notificationsEnabled",
            Self::SoundEnabled => "soundEnabled",
        }
    }

    /// Current value of this field in `settings`, as it would be typed.
    #[must_use]
    pub fn read(&self, settings: &AppSettings) -> String {
        match self {
            Self::WorkTime => settings.work_time.clone(),
            Self::BreakTime => settings.break_time.clone(),
            Self::Language => settings.language.code().to_string(),
            Self::MessageAnimationDelay => settings.message_animation_delay.to_string(),
            Self::NotificationsEnabled => settings.notifications_enabled.to_string(),
            Self::SoundEnabled => settings.sound_enabled.to_string(),
        }
    }

    /// Whether the field is an on/off switch.
    #[must_use]
    pub const fn is_toggle(&self) -> bool {
        matches!(self, Self::NotificationsEnabled | Self::SoundEnabled)
    }

    /// Parse a key, accepting camelCase or kebab-case.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        let wanted: String = s.chars().filter(|c| *c != '-' && *c != '_').collect();
        Self::ALL
            .into_iter()
            .find(|key| key.as_str().eq_ignore_ascii_case(&wanted))
    }
}

impl fmt::Display for SettingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validate and normalize a time field.
///
/// The raw input is padded to `HH:MM:SS` first, then checked.
///
/// # Errors
///
/// Returns the reason the value was rejected.
pub fn validate_time_field(raw: &str) -> Result<String, FieldError> {
    if raw.trim().is_empty() {
        return Err(FieldError::Required);
    }

    let normalized = normalize_time_input(raw);
    if !TIME_PATTERN.is_match(&normalized) {
        return Err(FieldError::InvalidFormat);
    }

    match Timespan::parse(&normalized) {
        Ok(span) if span.is_zero() => Err(FieldError::ZeroDuration),
        Ok(_) => Ok(normalized),
        Err(_) => Err(FieldError::InvalidFormat),
    }
}

fn parse_bool(raw: &str) -> Result<bool, FieldError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "on" | "yes" | "1" => Ok(true),
        "false" | "off" | "no" | "0" => Ok(false),
        _ => Err(FieldError::InvalidBool),
    }
}

/// A set of pending edits, validated as a whole.
#[derive(Debug, Clone, Default)]
pub struct SettingsDraft {
    edits: Vec<(SettingKey, String)>,
}

impl SettingsDraft {
    /// Start an empty draft.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an edit. A later edit of the same key replaces the earlier one.
    #[must_use]
    pub fn set(mut self, key: SettingKey, raw: impl Into<String>) -> Self {
        self.edits.retain(|(k, _)| *k != key);
        self.edits.push((key, raw.into()));
        self
    }

    /// Apply every edit to a copy of `base`.
    ///
    /// # Errors
    ///
    /// Returns every rejected field with its reason; `base` is untouched.
    pub fn apply(&self, base: &AppSettings) -> Result<AppSettings, Vec<(SettingKey, FieldError)>> {
        let mut settings = base.clone();
        let mut errors = Vec::new();

        for (key, raw) in &self.edits {
            let result = match key {
                SettingKey::WorkTime => validate_time_field(raw).map(|v| settings.work_time = v),
                SettingKey::BreakTime => validate_time_field(raw).map(|v| settings.break_time = v),
                SettingKey::Language => Language::from_code(raw)
                    .ok_or(FieldError::UnknownLanguage)
                    .map(|v| settings.language = v),
                SettingKey::MessageAnimationDelay => raw
                    .trim()
                    .parse::<u64>()
                    .map_err(|_| FieldError::InvalidNumber)
                    .map(|v| settings.message_animation_delay = v),
                SettingKey::NotificationsEnabled => {
                    parse_bool(raw).map(|v| settings.notifications_enabled = v)
                },
                SettingKey::SoundEnabled => parse_bool(raw).map(|v| settings.sound_enabled = v),
            };

            if let Err(e) = result {
                errors.push((*key, e));
            }
        }

        if errors.is_empty() {
            Ok(settings)
        } else {
            Err(errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_time_field() {
        assert_eq!(validate_time_field("00:25:00"), Ok("00:25:00".to_string()));
        assert_eq!(validate_time_field("0:5"), Ok("00:05:00".to_string()));
        assert_eq!(validate_time_field(""), Err(FieldError::Required));
        assert_eq!(validate_time_field("   "), Err(FieldError::Required));
        assert_eq!(validate_time_field("24:00:00"), Err(FieldError::InvalidFormat));
        assert_eq!(validate_time_field("00:61:00"), Err(FieldError::InvalidFormat));
        assert_eq!(validate_time_field("ab:cd:ef"), Err(FieldError::InvalidFormat));
        assert_eq!(validate_time_field("00:00:00"), Err(FieldError::ZeroDuration));
        assert_eq!(validate_time_field("0"), Err(FieldError::ZeroDuration));
    }

    #[test]
    fn test_setting_key_parse() {
        assert_eq!(SettingKey::parse("workTime"), Some(SettingKey::WorkTime));
        assert_eq!(SettingKey::parse("work-time"), Some(SettingKey::WorkTime));
        assert_eq!(SettingKey::parse("sound_enabled"), Some(SettingKey::SoundEnabled));
        assert_eq!(SettingKey::parse("volume"), None);
    }

    #[test]
    fn test_read_round_trips_through_draft() {
        let settings = AppSettings {
            work_time: "00:45:00".to_string(),
            language: Language::Es,
            sound_enabled: false,
            ..AppSettings::default()
        };
        let mut draft = SettingsDraft::new();
        for key in SettingKey::ALL {
            draft = draft.set(key, key.read(&settings));
        }
        assert_eq!(draft.apply(&AppSettings::default()).unwrap(), settings);
    }

    #[test]
    fn test_draft_applies_valid_edits() {
        let base = AppSettings::default();
        let updated = SettingsDraft::new()
            .set(SettingKey::WorkTime, "0:25")
            .set(SettingKey::Language, "es")
            .set(SettingKey::SoundEnabled, "off")
            .set(SettingKey::MessageAnimationDelay, "0")
            .apply(&base)
            .unwrap();

        assert_eq!(updated.work_time, "00:25:00");
        assert_eq!(updated.language, Language::Es);
        assert!(!updated.sound_enabled);
        assert_eq!(updated.message_animation_delay, 0);
    }

    #[test]
    fn test_draft_reports_every_bad_field() {
        let base = AppSettings::default();
        let errors = SettingsDraft::new()
            .set(SettingKey::WorkTime, "")
            .set(SettingKey::BreakTime, "00:00:00")
            .set(SettingKey::Language, "fr")
            .set(SettingKey::NotificationsEnabled, "maybe")
            .apply(&base)
            .unwrap_err();

        assert_eq!(
            errors,
            vec![
                (SettingKey::WorkTime, FieldError::Required),
                (SettingKey::BreakTime, FieldError::ZeroDuration),
                (SettingKey::Language, FieldError::UnknownLanguage),
                (SettingKey::NotificationsEnabled, FieldError::InvalidBool),
            ]
        );
    }

    #[test]
    fn test_later_edit_replaces_earlier() {
        let updated = SettingsDraft::new()
            .set(SettingKey::BreakTime, "bogus")
            .set(SettingKey::BreakTime, "00:05:00")
            .apply(&AppSettings::default())
            .unwrap();

        assert_eq!(updated.break_time, "00:05:00");
    }
}
