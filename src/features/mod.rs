//! Feature implementations for eyes-break.
//!
//! - Session state machine and message animation
//! - Event bridge to the timer engine
//! - Notification, audio, and window side effects
//! - Interface strings

pub mod bridge;
pub mod effects;
pub mod i18n;
pub mod session;
