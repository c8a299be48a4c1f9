use serde::Serialize;

use super::SessionState;
use crate::core::ZERO_DURATION;

/// String key of the toggle title while idle.
pub const TITLE_START: &str = "home.start";
/// String key of the toggle title while a session runs.
pub const TITLE_STOP: &str = "home.stop";

/// Everything a surface needs to draw the home screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HomeView {
    pub state: SessionState,
    /// String key of the toggle button title.
    pub title_key: &'static str,
    /// The part of the status message revealed so far.
    pub current_message: String,
    /// Percent complete of the running interval.
    pub progress: u8,
    pub timer_work: String,
    pub timer_break: String,
    /// Set right after a session starts, cleared when the app hides again.
    pub animated_after_started: bool,
    pub show_settings: bool,
}

impl Default for HomeView {
    fn default() -> Self {
        Self {
            state: SessionState::Waiting,
            title_key: TITLE_START,
            current_message: String::new(),
            progress: 0,
            timer_work: ZERO_DURATION.to_string(),
            timer_break: ZERO_DURATION.to_string(),
            animated_after_started: false,
            show_settings: false,
        }
    }
}

impl HomeView {
    /// Remaining time of the interval that is running, if any.
    #[must_use]
    pub fn active_timer(&self) -> Option<&str> {
        match self.state {
            SessionState::Waiting => None,
            SessionState::Work => Some(&self.timer_work),
            SessionState::Break => Some(&self.timer_break),
        }
    }
}
