//! Output formatting for eyes-break.
//!
//! Settings and session snapshots can be printed for people or for scripts.

mod json;
mod pretty;

use chrono::{DateTime, Local};

use crate::cli::args::OutputFormat;
use crate::config::AppSettings;
use crate::error::EyesBreakError;
use crate::features::session::HomeView;

pub use json::*;
pub use pretty::*;

/// Format settings based on output format
///
/// # Errors
///
/// Returns `EyesBreakError::Parse` if JSON serialization fails.
pub fn format_settings(settings: &AppSettings, format: OutputFormat) -> Result<String, EyesBreakError> {
    match format {
        OutputFormat::Pretty => Ok(format_settings_pretty(settings)),
        OutputFormat::Json => format_settings_json(settings),
    }
}

/// Format one session snapshot based on output format
///
/// # Errors
///
/// Returns `EyesBreakError::Parse` if JSON serialization fails.
pub fn format_view(
    view: &HomeView,
    at: DateTime<Local>,
    format: OutputFormat,
) -> Result<String, EyesBreakError> {
    match format {
        OutputFormat::Pretty => Ok(format_view_pretty(view, at)),
        OutputFormat::Json => format_view_json(view, at),
    }
}
