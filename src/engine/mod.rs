//! Timer engine binding.
//!
//! The engine owns wall-clock time. It is driven by named commands and
//! reports back through named events with JSON payloads. [`EngineHost`] is
//! that contract; [`LocalEngine`] is the in-process implementation.

mod local;

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

pub use local::{LocalEngine, TICK_INTERVAL};

/// Callback receiving the raw payload of one event.
pub type RawHandler = Arc<dyn Fn(&Value) + Send + Sync>;

/// Identifies one registered listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

/// Errors reported by an engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// The engine does not know this command.
    #[error("unknown command '{0}'")]
    UnknownCommand(String),
    /// The command arguments are missing or malformed.
    #[error("invalid arguments for '{command}': {reason}")]
    InvalidArgs {
        /// Command name.
        command: String,
        /// What was wrong.
        reason: String,
    },
    /// The engine refused the request.
    #[error("rejected: {0}")]
    Rejected(String),
    /// The engine is gone.
    #[error("engine unavailable")]
    Unavailable,
}

/// The interface to a timer engine.
///
/// Handlers registered for the same event fire in registration order.
#[async_trait]
pub trait EngineHost: Send + Sync {
    /// Send a command.
    async fn invoke(&self, command: &str, args: Option<Value>) -> Result<(), EngineError>;

    /// Register a handler for an event name.
    fn listen(&self, event: &str, handler: RawHandler) -> ListenerId;

    /// Remove a handler. Unknown ids are ignored.
    fn unlisten(&self, id: ListenerId);
}
