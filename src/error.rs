//! Error types for eyes-break.

use thiserror::Error;

use crate::core::TimespanError;
use crate::engine::EngineError;
use crate::features::bridge::BridgeError;
use crate::features::effects::EffectError;

/// Top-level error for eyes-break operations.
#[derive(Error, Debug)]
pub enum EyesBreakError {
    /// Configuration could not be read, parsed, or written.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A settings value failed validation.
    #[error("Invalid value: {0}")]
    Validation(String),

    /// A time value could not be parsed.
    #[error(transparent)]
    Timespan(#[from] TimespanError),

    /// The timer engine refused a command.
    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    /// Communication with the timer engine failed.
    #[error(transparent)]
    Bridge(#[from] BridgeError),

    /// A notification, audio, or window side effect failed.
    #[error(transparent)]
    Effect(#[from] EffectError),

    /// The terminal surface failed.
    #[error("Terminal error: {0}")]
    Terminal(String),

    /// JSON (de)serialization failed.
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Filesystem or process I/O failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl EyesBreakError {
    /// Process exit code for this error.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) | Self::Validation(_) | Self::Timespan(_) => 2,
            Self::Engine(_) | Self::Bridge(_) | Self::Effect(_) => 3,
            Self::Terminal(_) | Self::Parse(_) | Self::Io(_) => 1,
        }
    }
}
