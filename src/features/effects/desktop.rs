//! Desktop-backed collaborators.
//!
//! Notifications go through `osascript` on macOS and `notify-send`
//! elsewhere. Clips are played by whichever of `afplay`, `paplay`, or
//! `aplay` is installed.

use std::collections::HashMap;
use std::path::PathBuf;
use std::process::{Child, Stdio};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use tokio::process::Command;

use super::{AudioPlayer, EffectError, MenuItem, Notifier, Shell, Sound};

const AUDIO_PROGRAMS: [&str; 3] = ["afplay", "paplay", "aplay"];

fn on_path(program: &str) -> bool {
    std::env::var_os("PATH").is_some_and(|paths| {
        std::env::split_paths(&paths).any(|dir| dir.join(program).is_file())
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Backend {
    AppleScript,
    NotifySend,
}

impl Backend {
    const fn detect() -> Self {
        if cfg!(target_os = "macos") {
            Self::AppleScript
        } else {
            Self::NotifySend
        }
    }

    const fn program(self) -> &'static str {
        match self {
            Self::AppleScript => "osascript",
            Self::NotifySend => "notify-send",
        }
    }
}

fn apple_script(title: &str, body: &str) -> String {
    format!(
        r#"display notification "{}" with title "{}""#,
        body.replace('"', r#"\""#),
        title.replace('"', r#"\""#)
    )
}

/// Notifications through the platform's command-line notifier.
///
/// Permission is considered granted once the notifier program is found.
#[derive(Debug)]
pub struct DesktopNotifier {
    backend: Backend,
    granted: AtomicBool,
}

impl Default for DesktopNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl DesktopNotifier {
    #[must_use]
    pub fn new() -> Self {
        Self {
            backend: Backend::detect(),
            granted: AtomicBool::new(false),
        }
    }
}

#[async_trait]
impl Notifier for DesktopNotifier {
    async fn permission_granted(&self) -> bool {
        self.granted.load(Ordering::SeqCst)
    }

    async fn request_permission(&self) -> Result<bool, EffectError> {
        let found = on_path(self.backend.program());
        self.granted.store(found, Ordering::SeqCst);
        Ok(found)
    }

    async fn send(&self, title: &str, body: &str) -> Result<(), EffectError> {
        let program = self.backend.program();
        let mut command = Command::new(program);
        match self.backend {
            Backend::AppleScript => command.arg("-e").arg(apple_script(title, body)),
            Backend::NotifySend => command.arg(title).arg(body),
        };

        let output = command.output().await?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(EffectError::Command {
                program,
                reason: stderr.trim().to_string(),
            });
        }

        Ok(())
    }
}

/// Plays clips from a sounds directory with an external player program.
#[derive(Debug)]
pub struct CommandPlayer {
    sounds_dir: PathBuf,
    program: Option<&'static str>,
    playing: Mutex<HashMap<Sound, Child>>,
}

impl CommandPlayer {
    /// Use the first installed player program.
    #[must_use]
    pub fn new(sounds_dir: impl Into<PathBuf>) -> Self {
        let program = AUDIO_PROGRAMS.into_iter().find(|p| on_path(p));
        if program.is_none() {
            tracing::warn!("no audio player found, sounds are disabled");
        }
        Self::with_program(sounds_dir, program)
    }

    /// Use a specific player program, or none.
    #[must_use]
    pub fn with_program(sounds_dir: impl Into<PathBuf>, program: Option<&'static str>) -> Self {
        Self {
            sounds_dir: sounds_dir.into(),
            program,
            playing: Mutex::new(HashMap::new()),
        }
    }

    fn playing(&self) -> MutexGuard<'_, HashMap<Sound, Child>> {
        self.playing.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn stop(mut child: Child) {
    if matches!(child.try_wait(), Ok(None)) {
        let _ = child.kill();
    }
    let _ = child.wait();
}

impl AudioPlayer for CommandPlayer {
    fn rewind(&self, sound: Sound) {
        if let Some(child) = self.playing().remove(&sound) {
            stop(child);
        }
    }

    fn play(&self, sound: Sound) -> Result<(), EffectError> {
        let path = self.sounds_dir.join(sound.file_name());
        if !path.is_file() {
            return Err(EffectError::MissingSound(path));
        }
        let program = self.program.ok_or(EffectError::Unavailable {
            backend: "audio player",
        })?;

        let child = std::process::Command::new(program)
            .arg(&path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;

        if let Some(previous) = self.playing().insert(sound, child) {
            stop(previous);
        }
        Ok(())
    }
}

impl Drop for CommandPlayer {
    fn drop(&mut self) {
        for (_, child) in self.playing().drain() {
            stop(child);
        }
    }
}

/// Shell used when no surface is attached. Only logs.
#[derive(Debug, Default, Clone, Copy)]
pub struct HeadlessShell;

impl Shell for HeadlessShell {
    fn install_menu(&self, items: &[MenuItem]) -> Result<(), EffectError> {
        tracing::debug!(items = items.len(), "menu not installed: running headless");
        Ok(())
    }

    fn show(&self) -> Result<(), EffectError> {
        tracing::info!("show requested");
        Ok(())
    }

    fn hide(&self) -> Result<(), EffectError> {
        tracing::info!("hide requested");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_apple_script_escapes_quotes() {
        assert_eq!(
            apple_script(r#"Say "hi""#, "rest"),
            r#"display notification "rest" with title "Say \"hi\"""#
        );
    }

    #[test]
    fn test_play_missing_clip() {
        let dir = TempDir::new().unwrap();
        let player = CommandPlayer::with_program(dir.path(), Some("true"));

        let err = player.play(Sound::Break).unwrap_err();
        assert!(matches!(err, EffectError::MissingSound(path) if path.ends_with("break.wav")));
    }

    #[test]
    fn test_play_without_program() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("work.wav"), b"RIFF").unwrap();
        let player = CommandPlayer::with_program(dir.path(), None);

        assert!(matches!(
            player.play(Sound::Work),
            Err(EffectError::Unavailable { .. })
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_play_then_rewind_reaps_process() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("welcome.wav"), b"RIFF").unwrap();
        let player = CommandPlayer::with_program(dir.path(), Some("true"));

        player.play(Sound::Welcome).unwrap();
        assert!(player.playing().contains_key(&Sound::Welcome));

        player.rewind(Sound::Welcome);
        assert!(player.playing().is_empty());
    }

    #[test]
    fn test_rewind_idle_clip_is_noop() {
        let player = CommandPlayer::with_program("/nonexistent", None);
        player.rewind(Sound::Work);
    }

    #[test]
    fn test_headless_shell_never_fails() {
        let shell = HeadlessShell;
        assert!(shell.install_menu(&super::super::tray_menu()).is_ok());
        assert!(shell.show().is_ok());
        assert!(shell.hide().is_ok());
    }
}
