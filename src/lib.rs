//! eyes-break - a work/break reminder
//!
//! This crate alternates work and break intervals, driven by a timer engine
//! that reports progress as events, and reminds you to rest your eyes with
//! sounds, desktop notifications, and a terminal interface.

#![deny(unsafe_code)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod cli;
pub mod config;
pub mod core;
pub mod engine;
pub mod error;
pub mod features;
pub mod logging;
pub mod output;
pub mod tui;

pub use cli::args::{Cli, Commands, OutputFormat};
pub use engine::LocalEngine;
pub use error::EyesBreakError;
