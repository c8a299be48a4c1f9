//! Character-by-character reveal of the status message.

use std::time::Duration;

use tokio::task::JoinHandle;

use crate::core::Generation;

/// Every non-empty prefix of `message`, shortest first, split on char
/// boundaries.
pub fn reveal(message: &str) -> impl Iterator<Item = &str> + '_ {
    message
        .char_indices()
        .map(move |(start, c)| &message[..start + c.len_utf8()])
}

/// One step of a reveal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// The run that produced this frame.
    pub generation: u64,
    pub text: String,
}

/// Runs at most one reveal at a time.
///
/// Starting a new reveal supersedes the running one; frames from a
/// superseded run are never delivered after the new run starts.
#[derive(Debug, Default)]
pub struct MessageAnimator {
    generation: Generation,
    task: Option<JoinHandle<()>>,
}

impl MessageAnimator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reveal `message`, one more character every `delay`, handing each
    /// prefix to `sink`. Returns the generation of the new run.
    pub fn start<F>(&mut self, message: String, delay: Duration, sink: F) -> u64
    where
        F: Fn(Frame) + Send + 'static,
    {
        self.abort_task();
        let ticket = self.generation.advance();
        let generation = ticket.id();

        self.task = Some(tokio::spawn(async move {
            for prefix in reveal(&message) {
                tokio::time::sleep(delay).await;
                if !ticket.is_current() {
                    return;
                }
                sink(Frame {
                    generation,
                    text: prefix.to_string(),
                });
            }
        }));

        generation
    }

    /// Stop the running reveal, if any.
    pub fn cancel(&mut self) {
        self.generation.invalidate();
        self.abort_task();
    }

    /// Whether frames of `generation` are still wanted.
    #[must_use]
    pub fn is_current(&self, generation: u64) -> bool {
        self.generation.is_current(generation)
    }

    fn abort_task(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl Drop for MessageAnimator {
    fn drop(&mut self) {
        self.cancel();
    }
}
