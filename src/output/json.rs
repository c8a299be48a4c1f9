//! JSON output formatting for eyes-break.

use chrono::{DateTime, Local};
use serde::Serialize;
use serde_json::json;

use crate::config::AppSettings;
use crate::error::EyesBreakError;
use crate::features::session::HomeView;

/// Format settings as JSON, exactly as they are persisted
///
/// # Errors
///
/// Returns `EyesBreakError::Parse` if JSON serialization fails.
pub fn format_settings_json(settings: &AppSettings) -> Result<String, EyesBreakError> {
    to_json(settings)
}

/// Format a session snapshot as a single JSON line
///
/// # Errors
///
/// Returns `EyesBreakError::Parse` if JSON serialization fails.
pub fn format_view_json(view: &HomeView, at: DateTime<Local>) -> Result<String, EyesBreakError> {
    let output = json!({
        "at": at.to_rfc3339(),
        "state": view.state,
        "progress": view.progress,
        "timerWork": view.timer_work,
        "timerBreak": view.timer_break,
    });
    Ok(serde_json::to_string(&output)?)
}

/// Serialize any value to pretty JSON.
///
/// # Errors
///
/// Returns `EyesBreakError::Parse` if JSON serialization fails.
pub fn to_json<T: Serialize>(value: &T) -> Result<String, EyesBreakError> {
    Ok(serde_json::to_string_pretty(value)?)
}
