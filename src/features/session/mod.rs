//! The work/break session.
//!
//! - [`controller`]: the state machine and its input loop
//! - [`animator`]: status message reveal
//! - [`durations`]: configured length of each state
//! - [`view`]: the snapshot surfaces render

pub mod animator;
pub mod controller;
pub mod durations;
pub mod state;
pub mod view;

pub use animator::{reveal, Frame, MessageAnimator};
pub use controller::{AppContext, ControllerHandle, Input, SessionController, VISIBILITY_DELAY};
pub use durations::DurationResolver;
pub use state::SessionState;
pub use view::{HomeView, TITLE_START, TITLE_STOP};
