//! Notification, audio, and window side effects.
//!
//! The session controller never talks to the desktop directly. It goes
//! through a [`SideEffectCoordinator`], which applies the live settings
//! flags and the notification permission state before touching any of the
//! collaborators below.

mod desktop;
mod menu;

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::config::SettingsHandle;

pub use desktop::{CommandPlayer, DesktopNotifier, HeadlessShell};
pub use menu::{tray_menu, MenuAction, MenuItem};

/// Errors raised by side-effect collaborators.
#[derive(Debug, Error)]
pub enum EffectError {
    /// The user or platform refused notifications.
    #[error("notification permission denied")]
    PermissionDenied,

    /// No backend program is installed for this effect.
    #[error("{backend} is not available on this system")]
    Unavailable {
        /// What was looked for.
        backend: &'static str,
    },

    /// A backend program ran but failed.
    #[error("{program} failed: {reason}")]
    Command {
        /// Program name.
        program: &'static str,
        /// Its stderr, trimmed.
        reason: String,
    },

    /// The clip for a sound is missing.
    #[error("sound file not found: {}", .0.display())]
    MissingSound(PathBuf),

    /// The surface cannot show or hide itself.
    #[error("window error: {0}")]
    Window(String),

    /// Spawning or talking to a process failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Audio clips played on session transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sound {
    /// Played once at startup.
    Welcome,
    /// Played when a work session starts after a break.
    Work,
    /// Played when a break starts.
    Break,
}

impl Sound {
    /// Clip file name under the sounds directory.
    #[must_use]
    pub const fn file_name(&self) -> &'static str {
        match self {
            Self::Welcome => "welcome.wav",
            Self::Work => "work.wav",
            Self::Break => "break.wav",
        }
    }
}

/// Desktop notifications.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Whether notifications are currently allowed.
    async fn permission_granted(&self) -> bool;

    /// Ask for permission. Returns whether it was granted.
    async fn request_permission(&self) -> Result<bool, EffectError>;

    /// Show a notification.
    async fn send(&self, title: &str, body: &str) -> Result<(), EffectError>;
}

/// Audio playback.
#[cfg_attr(test, mockall::automock)]
pub trait AudioPlayer: Send + Sync {
    /// Move the clip back to its start, stopping it if it is playing.
    fn rewind(&self, sound: Sound);

    /// Start playing a clip.
    fn play(&self, sound: Sound) -> Result<(), EffectError>;
}

/// The window or surface hosting the application.
#[cfg_attr(test, mockall::automock)]
pub trait Shell: Send + Sync {
    /// Install the tray menu.
    fn install_menu(&self, items: &[MenuItem]) -> Result<(), EffectError>;

    /// Bring the application to the front.
    fn show(&self) -> Result<(), EffectError>;

    /// Hide the application.
    fn hide(&self) -> Result<(), EffectError>;
}

/// Applies settings flags and permission state to notifications and sounds.
pub struct SideEffectCoordinator {
    settings: SettingsHandle,
    notifier: Arc<dyn Notifier>,
    audio: Arc<dyn AudioPlayer>,
}

impl SideEffectCoordinator {
    pub fn new(
        settings: SettingsHandle,
        notifier: Arc<dyn Notifier>,
        audio: Arc<dyn AudioPlayer>,
    ) -> Self {
        Self {
            settings,
            notifier,
            audio,
        }
    }

    /// Confirm notification permission, requesting it when missing.
    ///
    /// # Errors
    ///
    /// Returns [`EffectError::PermissionDenied`] if the request was refused,
    /// or the notifier's error if the request itself failed.
    pub async fn initialize(&self) -> Result<(), EffectError> {
        if self.ensure_permission().await? {
            Ok(())
        } else {
            Err(EffectError::PermissionDenied)
        }
    }

    async fn ensure_permission(&self) -> Result<bool, EffectError> {
        if self.notifier.permission_granted().await {
            return Ok(true);
        }
        tracing::debug!("requesting notification permission");
        self.notifier.request_permission().await
    }

    /// Send a notification if notifications are enabled and permitted.
    ///
    /// Failures are logged and dropped.
    pub async fn notify(&self, title: &str, body: &str) {
        if !self.settings.borrow().notifications_enabled {
            return;
        }

        match self.ensure_permission().await {
            Ok(true) => {
                if let Err(e) = self.notifier.send(title, body).await {
                    tracing::warn!(error = %e, "notification failed");
                }
            },
            Ok(false) => tracing::debug!("notification skipped: permission not granted"),
            Err(e) => tracing::warn!(error = %e, "notification permission request failed"),
        }
    }

    /// Play a sound from its start if sound is enabled.
    ///
    /// Failures are logged and dropped.
    pub fn play(&self, sound: Sound) {
        if !self.settings.borrow().sound_enabled {
            return;
        }

        self.audio.rewind(sound);
        if let Err(e) = self.audio.play(sound) {
            tracing::warn!(?sound, error = %e, "sound playback failed");
        }
    }
}
