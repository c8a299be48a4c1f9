//! Command-line interface for eyes-break.

pub mod args;
pub mod commands;
