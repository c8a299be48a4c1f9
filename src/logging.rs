//! Tracing setup.
//!
//! The filter comes from `EYES_BREAK_LOG` (e.g. `eyes_break=trace`), falling
//! back to `info`, or `debug` with `--verbose`. While the terminal UI owns
//! the screen, output goes to the log file instead of stderr.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::error::EyesBreakError;

/// Environment variable holding the log filter.
pub const LOG_ENV: &str = "EYES_BREAK_LOG";

fn filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "info" }))
}

/// Install the global subscriber, writing to `log_file` when given.
///
/// # Errors
///
/// Returns an error if the log file cannot be opened or a subscriber is
/// already installed.
pub fn init(verbose: bool, log_file: Option<&Path>) -> Result<(), EyesBreakError> {
    let file_layer = match log_file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            Some(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
        },
        None => None,
    };
    let stderr_layer = log_file
        .is_none()
        .then(|| fmt::layer().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(filter(verbose))
        .with(file_layer)
        .with(stderr_layer)
        .try_init()
        .map_err(|e| EyesBreakError::Config(format!("Failed to initialize logging: {e}")))
}
