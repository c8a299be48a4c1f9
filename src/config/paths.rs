//! Path resolution for eyes-break configuration and data files.
//!
//! All eyes-break data is stored in `~/.eyes-break/`:
//! - `settings.json` - Persisted application settings
//! - `sounds/` - `welcome.wav`, `work.wav`, `break.wav`
//! - `eyes-break.log` - Log output while the terminal surface is running
//!
//! The root can be moved with the `EYES_BREAK_HOME` environment variable.

use std::path::PathBuf;

use crate::error::EyesBreakError;

/// Environment variable overriding the data root.
pub const HOME_ENV: &str = "EYES_BREAK_HOME";

/// Paths to eyes-break configuration and data directories.
#[derive(Debug, Clone)]
pub struct Paths {
    /// Root directory: `~/.eyes-break/`
    pub root: PathBuf,
    /// Settings file: `~/.eyes-break/settings.json`
    pub settings_file: PathBuf,
    /// Sounds directory: `~/.eyes-break/sounds/`
    pub sounds: PathBuf,
    /// Log file: `~/.eyes-break/eyes-break.log`
    pub log_file: PathBuf,
}

impl Paths {
    /// Resolve paths from `EYES_BREAK_HOME`, or the user's home directory.
    ///
    /// # Errors
    ///
    /// Returns an error if neither variable is set.
    pub fn new() -> Result<Self, EyesBreakError> {
        if let Ok(root) = std::env::var(HOME_ENV) {
            return Ok(Self::with_root(PathBuf::from(root)));
        }

        let home = std::env::var("HOME").map_err(|_| {
            EyesBreakError::Config("Could not determine home directory".to_string())
        })?;

        Ok(Self::with_root(PathBuf::from(home).join(".eyes-break")))
    }

    /// Create paths with a custom root directory (useful for testing).
    #[must_use]
    pub fn with_root(root: PathBuf) -> Self {
        Self {
            settings_file: root.join("settings.json"),
            sounds: root.join("sounds"),
            log_file: root.join("eyes-break.log"),
            root,
        }
    }

    /// Ensure all directories exist, creating them if necessary.
    ///
    /// # Errors
    ///
    /// Returns an error if directory creation fails.
    pub fn ensure_dirs(&self) -> Result<(), EyesBreakError> {
        for dir in [&self.root, &self.sounds] {
            if !dir.exists() {
                std::fs::create_dir_all(dir).map_err(|e| {
                    EyesBreakError::Config(format!(
                        "Failed to create directory {}: {e}",
                        dir.display()
                    ))
                })?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_paths_with_root() {
        let root = PathBuf::from("/tmp/test-eyes-break");
        let paths = Paths::with_root(root.clone());

        assert_eq!(paths.root, root);
        assert_eq!(paths.settings_file, root.join("settings.json"));
        assert_eq!(paths.sounds, root.join("sounds"));
        assert_eq!(paths.log_file, root.join("eyes-break.log"));
    }

    #[test]
    fn test_ensure_dirs() {
        let temp_dir = TempDir::new().unwrap();
        let paths = Paths::with_root(temp_dir.path().join("nested"));

        paths.ensure_dirs().unwrap();

        assert!(paths.root.exists());
        assert!(paths.sounds.exists());
    }
}
