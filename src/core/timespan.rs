//! `HH:MM:SS` timespans.
//!
//! Durations travel between the settings store, the session controller, and
//! the timer engine as zero-padded `HH:MM:SS` strings. This module parses,
//! formats, and normalizes them.

use std::fmt;
use std::time::Duration;

use thiserror::Error;

/// The duration shown while no session is running.
pub const ZERO_DURATION: &str = "00:00:00";

const SECONDS_PER_MINUTE: u64 = 60;
const SECONDS_PER_HOUR: u64 = 60 * SECONDS_PER_MINUTE;
const MS_PER_SECOND: u64 = 1000;

/// Errors produced while parsing a timespan.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimespanError {
    /// Not three numeric `:`-separated fields.
    #[error("invalid time format, expected HH:MM:SS")]
    InvalidFormat,
    /// Minutes or seconds of 60 and above, or a total that overflows.
    #[error("time value is out of range")]
    OutOfRange,
}

/// A parsed `HH:MM:SS` value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Timespan {
    total_seconds: u64,
}

impl Timespan {
    /// Build a timespan from whole seconds.
    #[must_use]
    pub const fn from_seconds(total_seconds: u64) -> Self {
        Self { total_seconds }
    }

    /// Build a timespan from milliseconds, truncating to whole seconds.
    #[must_use]
    pub const fn from_millis(ms: u64) -> Self {
        Self::from_seconds(ms / MS_PER_SECOND)
    }

    /// Parse a `HH:MM:SS` string.
    ///
    /// Hours are unbounded; minutes and seconds must be below 60.
    ///
    /// # Errors
    ///
    /// Returns [`TimespanError::InvalidFormat`] for anything that is not three
    /// numeric fields and [`TimespanError::OutOfRange`] for field overflow.
    pub fn parse(s: &str) -> Result<Self, TimespanError> {
        let parts: Vec<&str> = s.trim().split(':').collect();
        let &[hours, minutes, seconds] = parts.as_slice() else {
            return Err(TimespanError::InvalidFormat);
        };

        let field = |p: &str| -> Result<u64, TimespanError> {
            if p.is_empty() || !p.bytes().all(|b| b.is_ascii_digit()) {
                return Err(TimespanError::InvalidFormat);
            }
            p.parse::<u64>().map_err(|_| TimespanError::OutOfRange)
        };

        let hours = field(hours)?;
        let minutes = field(minutes)?;
        let seconds = field(seconds)?;

        if minutes >= SECONDS_PER_MINUTE || seconds >= SECONDS_PER_MINUTE {
            return Err(TimespanError::OutOfRange);
        }

        let total_seconds = hours
            .checked_mul(SECONDS_PER_HOUR)
            .and_then(|h| h.checked_add(minutes * SECONDS_PER_MINUTE + seconds))
            .ok_or(TimespanError::OutOfRange)?;

        Ok(Self { total_seconds })
    }

    /// Total length as a duration the runtime can sleep on.
    #[must_use]
    pub const fn to_duration(&self) -> Duration {
        Duration::from_secs(self.total_seconds)
    }

    /// Check whether this is `00:00:00`.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.total_seconds == 0
    }
}

impl fmt::Display for Timespan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hours = self.total_seconds / SECONDS_PER_HOUR;
        let minutes = (self.total_seconds % SECONDS_PER_HOUR) / SECONDS_PER_MINUTE;
        let seconds = self.total_seconds % SECONDS_PER_MINUTE;
        write!(f, "{hours:02}:{minutes:02}:{seconds:02}")
    }
}

impl std::str::FromStr for Timespan {
    type Err = TimespanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Pad user input to `HH:MM:SS`.
///
/// Each `:`-separated field is left-padded to two digits and missing fields
/// default to `"00"`. Empty input becomes [`ZERO_DURATION`]. The result is
/// not validated.
#[must_use]
pub fn normalize_time_input(input: &str) -> String {
    let input = input.trim();
    if input.is_empty() {
        return ZERO_DURATION.to_string();
    }

    let mut parts = input.split(':');
    let mut next = || {
        parts
            .next()
            .map_or_else(|| "00".to_string(), |p| format!("{p:0>2}"))
    };

    let (h, m, s) = (next(), next(), next());
    format!("{h}:{m}:{s}")
}
