//! Core primitives shared across eyes-break.
//!
//! - [`timespan`]: `HH:MM:SS` parsing, formatting, and input normalization
//! - [`generation`]: supersession counters for cancellable work

pub mod generation;
pub mod timespan;

pub use generation::{Generation, Ticket};
pub use timespan::{normalize_time_input, Timespan, TimespanError, ZERO_DURATION};
