//! Command implementations for eyes-break.

mod run;

pub use run::session;

use clap::CommandFactory;
use clap_complete::Shell;
use colored::Colorize;

use crate::cli::args::{Cli, ConfigCommands, OutputFormat};
use crate::config::{SettingKey, SettingsDraft, SettingsStore};
use crate::error::EyesBreakError;
use crate::output::format_settings;

/// Execute config subcommands
///
/// # Errors
///
/// Returns an error if a key or value is invalid, or the settings file
/// cannot be written.
pub fn config(
    store: &SettingsStore,
    cmd: ConfigCommands,
    format: OutputFormat,
) -> Result<String, EyesBreakError> {
    match cmd {
        ConfigCommands::Show => format_settings(&store.load(), format),

        ConfigCommands::Set { key, value } => {
            let key = SettingKey::parse(&key).ok_or_else(|| {
                let supported: Vec<_> = SettingKey::ALL.iter().map(SettingKey::as_str).collect();
                EyesBreakError::Validation(format!(
                    "Unknown setting: {key}. Supported: {}",
                    supported.join(", ")
                ))
            })?;

            let current = store.load();
            let updated = SettingsDraft::new()
                .set(key, value)
                .apply(&current)
                .map_err(|errors| {
                    let reasons: Vec<_> = errors
                        .iter()
                        .map(|(key, reason)| format!("{key}: {reason}"))
                        .collect();
                    EyesBreakError::Validation(reasons.join("; "))
                })?;
            store.save(updated.clone())?;

            match format {
                OutputFormat::Pretty => Ok(format!(
                    "{} {} = {}",
                    "Set".green(),
                    key,
                    key.read(&updated).bold()
                )),
                OutputFormat::Json => format_settings(&updated, format),
            }
        }

        ConfigCommands::Reset => {
            store.reset_to_defaults()?;
            match format {
                OutputFormat::Pretty => Ok(format!("{} settings to defaults", "Reset".green())),
                OutputFormat::Json => format_settings(&store.current(), format),
            }
        }

        ConfigCommands::Path => Ok(store.path().display().to_string()),
    }
}

/// Generate a completion script for `shell`.
///
/// # Errors
///
/// Returns an error if the generated script is not UTF-8.
pub fn completions(shell: Shell) -> Result<String, EyesBreakError> {
    let mut cmd = Cli::command();
    let mut buf = Vec::new();
    clap_complete::generate(shell, &mut cmd, "eyes-break", &mut buf);
    String::from_utf8(buf).map_err(|e| EyesBreakError::Config(format!("UTF-8 error: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AppSettings, Language};
    use tempfile::TempDir;

    fn store() -> (TempDir, SettingsStore) {
        let dir = TempDir::new().unwrap();
        let store = SettingsStore::new(dir.path().join("settings.json"));
        (dir, store)
    }

    #[test]
    fn test_set_persists_normalized_value() {
        let (_dir, store) = store();

        let output = config(
            &store,
            ConfigCommands::Set {
                key: "work-time".to_string(),
                value: "0:25".to_string(),
            },
            OutputFormat::Pretty,
        )
        .unwrap();

        assert!(output.contains("workTime"));
        let saved = AppSettings::read_from_path(store.path()).unwrap();
        assert_eq!(saved.work_time, "00:25:00");
    }

    #[test]
    fn test_set_rejects_zero_duration_without_writing() {
        let (_dir, store) = store();

        let err = config(
            &store,
            ConfigCommands::Set {
                key: "breakTime".to_string(),
                value: "00:00:00".to_string(),
            },
            OutputFormat::Pretty,
        )
        .unwrap_err();

        assert!(matches!(err, EyesBreakError::Validation(ref msg) if msg.contains("breakTime")));
        assert!(!store.path().exists());
    }

    #[test]
    fn test_set_unknown_key() {
        let (_dir, store) = store();
        let err = config(
            &store,
            ConfigCommands::Set {
                key: "volume".to_string(),
                value: "11".to_string(),
            },
            OutputFormat::Pretty,
        )
        .unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_set_json_prints_settings() {
        let (_dir, store) = store();
        let output = config(
            &store,
            ConfigCommands::Set {
                key: "language".to_string(),
                value: "es".to_string(),
            },
            OutputFormat::Json,
        )
        .unwrap();

        let parsed: AppSettings = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed.language, Language::Es);
    }

    #[test]
    fn test_reset_restores_defaults() {
        let (_dir, store) = store();
        store.update(|s| s.sound_enabled = false).unwrap();

        config(&store, ConfigCommands::Reset, OutputFormat::Pretty).unwrap();

        assert_eq!(AppSettings::read_from_path(store.path()).unwrap(), AppSettings::default());
    }

    #[test]
    fn test_path_prints_location() {
        let (dir, store) = store();
        let output = config(&store, ConfigCommands::Path, OutputFormat::Pretty).unwrap();
        assert_eq!(output, dir.path().join("settings.json").display().to_string());
    }

    #[test]
    fn test_completions_mention_binary() {
        let script = completions(Shell::Bash).unwrap();
        assert!(script.contains("eyes-break"));
    }
}
