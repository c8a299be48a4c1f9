//! Supersession counters.
//!
//! A [`Generation`] hands out [`Ticket`]s. Only the most recently issued
//! ticket is current; in-flight work holding an older ticket must treat
//! itself as cancelled and do nothing.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// A shared, monotonically increasing generation id.
#[derive(Debug, Clone, Default)]
pub struct Generation {
    current: Arc<AtomicU64>,
}

/// Proof of having started work at a given generation.
#[derive(Debug, Clone)]
pub struct Ticket {
    id: u64,
    current: Arc<AtomicU64>,
}

impl Generation {
    /// Create a counter with no outstanding work.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Supersede all outstanding tickets and issue a new one.
    pub fn advance(&self) -> Ticket {
        let id = self.current.fetch_add(1, Ordering::SeqCst) + 1;
        Ticket {
            id,
            current: Arc::clone(&self.current),
        }
    }

    /// Supersede all outstanding tickets without issuing a new one.
    pub fn invalidate(&self) {
        self.current.fetch_add(1, Ordering::SeqCst);
    }

    /// Check an id captured from a ticket against the counter.
    #[must_use]
    pub fn is_current(&self, id: u64) -> bool {
        self.current.load(Ordering::SeqCst) == id
    }
}

impl Ticket {
    /// The id this ticket was issued with.
    #[must_use]
    pub const fn id(&self) -> u64 {
        self.id
    }

    /// True until the owning [`Generation`] moves on.
    #[must_use]
    pub fn is_current(&self) -> bool {
        self.current.load(Ordering::SeqCst) == self.id
    }
}
