//! Event and command vocabulary shared with the timer engine.
//!
//! The engine speaks in string names with JSON payloads. Everything past the
//! bridge works with the typed [`EngineEvent`] and [`Command`] instead.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::BridgeError;

/// Kinds of events the engine emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// `session-progress`: percent complete as a number.
    Progress,
    /// `session-time-progress`: remaining time as `HH:MM:SS`.
    TimeProgress,
    /// `session-completed`
    Completed,
    /// `session-cancelled`
    Cancelled,
    /// `session-started`: whether the engine accepted the run.
    Started,
}

impl EventKind {
    /// Every kind.
    pub const ALL: [Self; 5] = [
        Self::Progress,
        Self::TimeProgress,
        Self::Completed,
        Self::Cancelled,
        Self::Started,
    ];

    /// The kinds the session controller keeps a permanent listener on.
    pub const LIFECYCLE: [Self; 4] = [
        Self::Progress,
        Self::TimeProgress,
        Self::Completed,
        Self::Cancelled,
    ];

    /// Wire name of the event.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Progress => "session-progress",
            Self::TimeProgress => "session-time-progress",
            Self::Completed => "session-completed",
            Self::Cancelled => "session-cancelled",
            Self::Started => "session-started",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A decoded engine event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// Percent complete, rounded to the nearest integer and clamped to 0..=100.
    Progress(u8),
    /// Remaining time of the running session.
    TimeProgress(String),
    /// The running session reached its end.
    Completed,
    /// The running session was cancelled.
    Cancelled,
    /// The engine accepted (`true`) or rejected (`false`) a start request.
    Started(bool),
}

impl EngineEvent {
    /// Decode a raw payload received for `kind`.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::Decode`] when the payload has the wrong shape.
    pub fn decode(kind: EventKind, payload: &Value) -> Result<Self, BridgeError> {
        let malformed = |expected: &str| BridgeError::Decode {
            event: kind,
            reason: format!("expected {expected}, got {payload}"),
        };

        match kind {
            EventKind::Progress => payload
                .as_f64()
                .map(|p| Self::Progress(round_percent(p)))
                .ok_or_else(|| malformed("a number")),
            EventKind::TimeProgress => payload
                .as_str()
                .map(|s| Self::TimeProgress(s.to_string()))
                .ok_or_else(|| malformed("a string")),
            EventKind::Completed => Ok(Self::Completed),
            EventKind::Cancelled => Ok(Self::Cancelled),
            EventKind::Started => match payload {
                Value::Null => Ok(Self::Started(true)),
                Value::Bool(accepted) => Ok(Self::Started(*accepted)),
                _ => Err(malformed("a boolean")),
            },
        }
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn round_percent(raw: f64) -> u8 {
    raw.round().clamp(0.0, 100.0) as u8
}

/// Arguments of `start_session`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartSessionArgs {
    /// Session length, `HH:MM:SS`.
    pub duration_str: String,
}

/// Commands sent to the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Start a countdown of the given `HH:MM:SS` length.
    StartSession(String),
    /// Cancel the running countdown.
    CancelSession,
    /// Shut the application down.
    ExitApp,
}

impl Command {
    /// Wire name of the command.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::StartSession(_) => "start_session",
            Self::CancelSession => "cancel_session",
            Self::ExitApp => "exit_app",
        }
    }

    /// Wire arguments of the command, if it takes any.
    #[must_use]
    pub fn args(&self) -> Option<Value> {
        match self {
            Self::StartSession(duration) => Some(serde_json::json!({ "durationStr": duration })),
            Self::CancelSession | Self::ExitApp => None,
        }
    }
}
