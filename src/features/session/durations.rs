use crate::config::SettingsHandle;
use crate::core::ZERO_DURATION;

use super::SessionState;

/// Maps a session state to the duration configured for it.
///
/// Every call reads the live settings.
#[derive(Clone)]
pub struct DurationResolver {
    settings: SettingsHandle,
}

impl DurationResolver {
    pub fn new(settings: SettingsHandle) -> Self {
        Self { settings }
    }

    /// `HH:MM:SS` duration for `state`. `Waiting` is always zero.
    #[must_use]
    pub fn duration_for(&self, state: SessionState) -> String {
        match state {
            SessionState::Waiting => ZERO_DURATION.to_string(),
            SessionState::Work => self.settings.borrow().work_time.clone(),
            SessionState::Break => self.settings.borrow().break_time.clone(),
        }
    }
}
