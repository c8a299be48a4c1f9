use std::fmt;

use serde::Serialize;

/// Where the work/break cycle currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionState {
    /// Idle. Initial state, and where a cancellation lands.
    #[default]
    Waiting,
    /// A work interval is running.
    Work,
    /// A break interval is running.
    Break,
}

impl SessionState {
    /// String key of the status message shown in this state.
    #[must_use]
    pub const fn message_key(&self) -> &'static str {
        match self {
            Self::Waiting => "home.messages.waiting",
            Self::Work => "home.messages.work",
            Self::Break => "home.messages.break",
        }
    }

    /// The state a completed interval hands over to.
    ///
    /// `Waiting` has no successor.
    #[must_use]
    pub const fn next(&self) -> Option<Self> {
        match self {
            Self::Waiting => None,
            Self::Work => Some(Self::Break),
            Self::Break => Some(Self::Work),
        }
    }

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Waiting => "WAITING",
            Self::Work => "WORK",
            Self::Break => "BREAK",
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alternation() {
        assert_eq!(SessionState::Work.next(), Some(SessionState::Break));
        assert_eq!(SessionState::Break.next(), Some(SessionState::Work));
        assert_eq!(SessionState::Waiting.next(), None);
    }

    #[test]
    fn test_serializes_upper_case() {
        assert_eq!(
            serde_json::to_string(&SessionState::Break).unwrap(),
            "\"BREAK\""
        );
    }
}
