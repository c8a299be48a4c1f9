//! The single channel between eyes-break and the timer engine.
//!
//! [`EventBridge`] registers event listeners, decodes payloads into
//! [`EngineEvent`]s, dispatches [`Command`]s, and tracks every subscription
//! so that [`cleanup`](EventBridge::cleanup) can tear them all down before
//! the same kinds are subscribed again.

mod protocol;

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock, Weak};

use serde_json::Value;
use thiserror::Error;

use crate::engine::{EngineError, EngineHost, ListenerId, RawHandler};

pub use protocol::{Command, EngineEvent, EventKind, StartSessionArgs};

/// Errors raised by the bridge.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// A live subscription for this kind already exists.
    #[error("already listening for {0}; call cleanup first")]
    AlreadySubscribed(EventKind),

    /// The engine did not accept a command.
    #[error("failed to dispatch {command}: {source}")]
    Dispatch {
        /// Command name.
        command: &'static str,
        /// Engine-side failure.
        #[source]
        source: EngineError,
    },

    /// An event payload had the wrong shape.
    #[error("malformed {event} payload: {reason}")]
    Decode {
        /// Event kind.
        event: EventKind,
        /// What was wrong.
        reason: String,
    },
}

/// Capability to remove one listener.
///
/// Clones share state: the first call unsubscribes, later calls do nothing.
#[derive(Clone)]
pub struct Unlisten {
    host: Weak<dyn EngineHost>,
    id: ListenerId,
    active: Arc<AtomicBool>,
}

impl Unlisten {
    fn new(host: &Arc<dyn EngineHost>, id: ListenerId) -> Self {
        Self {
            host: Arc::downgrade(host),
            id,
            active: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Remove the listener.
    pub fn call(&self) {
        if self.active.swap(false, Ordering::SeqCst) {
            if let Some(host) = self.host.upgrade() {
                host.unlisten(self.id);
            }
        }
    }

    /// Whether the listener is still registered.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }
}

impl std::fmt::Debug for Unlisten {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Unlisten")
            .field("id", &self.id)
            .field("active", &self.is_active())
            .finish()
    }
}

/// Typed front end to an [`EngineHost`].
pub struct EventBridge {
    host: Arc<dyn EngineHost>,
    listeners: HashMap<EventKind, Unlisten>,
    pending_once: HashMap<EventKind, Unlisten>,
}

impl EventBridge {
    /// Create a bridge with no subscriptions.
    #[must_use]
    pub fn new(host: Arc<dyn EngineHost>) -> Self {
        Self {
            host,
            listeners: HashMap::new(),
            pending_once: HashMap::new(),
        }
    }

    /// Subscribe `handler` to `kind`.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::AlreadySubscribed`] if a live subscription for
    /// `kind` exists. Re-subscribing requires [`cleanup`](Self::cleanup) or
    /// calling the earlier [`Unlisten`] first.
    pub fn listen<F>(&mut self, kind: EventKind, handler: F) -> Result<Unlisten, BridgeError>
    where
        F: Fn(EngineEvent) + Send + Sync + 'static,
    {
        if self.is_listening(kind) {
            return Err(BridgeError::AlreadySubscribed(kind));
        }

        let raw: RawHandler = Arc::new(move |payload: &Value| {
            if let Some(event) = decode_or_log(kind, payload) {
                handler(event);
            }
        });

        let id = self.host.listen(kind.as_str(), raw);
        let unlisten = Unlisten::new(&self.host, id);
        self.listeners.insert(kind, unlisten.clone());

        tracing::debug!(event = kind.as_str(), "listening for engine event");
        Ok(unlisten)
    }

    /// Subscribe `handler` to the next `kind` event only.
    ///
    /// At most one one-shot is pending per kind; registering another
    /// supersedes the earlier one.
    pub fn listen_once<F>(&mut self, kind: EventKind, handler: F) -> Unlisten
    where
        F: Fn(EngineEvent) + Send + Sync + 'static,
    {
        if let Some(previous) = self.pending_once.remove(&kind) {
            previous.call();
        }

        let fired = AtomicBool::new(false);
        let slot: Arc<OnceLock<Unlisten>> = Arc::new(OnceLock::new());
        let own_slot = Arc::clone(&slot);

        let raw: RawHandler = Arc::new(move |payload: &Value| {
            if fired.swap(true, Ordering::SeqCst) {
                return;
            }
            if let Some(unlisten) = own_slot.get() {
                unlisten.call();
            }
            if let Some(event) = decode_or_log(kind, payload) {
                handler(event);
            }
        });

        let id = self.host.listen(kind.as_str(), raw);
        let unlisten = Unlisten::new(&self.host, id);
        let _ = slot.set(unlisten.clone());
        self.pending_once.insert(kind, unlisten.clone());

        unlisten
    }

    /// Whether a live subscription for `kind` exists.
    #[must_use]
    pub fn is_listening(&self, kind: EventKind) -> bool {
        self.listeners.get(&kind).is_some_and(Unlisten::is_active)
    }

    /// Remove every tracked subscription, one-shots included.
    ///
    /// Returns once every unsubscribe has completed.
    pub fn cleanup(&mut self) {
        let count = self.listeners.len() + self.pending_once.len();
        for (_, unlisten) in self.listeners.drain().chain(self.pending_once.drain()) {
            unlisten.call();
        }

        if count > 0 {
            tracing::debug!(count, "removed engine listeners");
        }
    }

    /// Send a command to the engine.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::Dispatch`] if the engine reports a failure.
    /// Nothing is retried.
    pub async fn dispatch(&self, command: &Command) -> Result<(), BridgeError> {
        let name = command.name();
        tracing::debug!(command = name, "dispatching engine command");

        self.host
            .invoke(name, command.args())
            .await
            .map_err(|source| {
                tracing::error!(command = name, error = %source, "engine command failed");
                BridgeError::Dispatch {
                    command: name,
                    source,
                }
            })
    }
}

impl Drop for EventBridge {
    fn drop(&mut self) {
        self.cleanup();
    }
}

fn decode_or_log(kind: EventKind, payload: &Value) -> Option<EngineEvent> {
    EngineEvent::decode(kind, payload)
        .inspect_err(|e| tracing::warn!(error = %e, "dropping engine event"))
        .ok()
}

#[cfg(test)]
pub(crate) mod testing {
    //! An engine double that records commands and lets tests emit events.

    use std::sync::Mutex;

    use super::*;
    use async_trait::async_trait;

    #[derive(Default)]
    pub struct FakeHost {
        next_id: Mutex<u64>,
        listeners: Mutex<Vec<(ListenerId, String, RawHandler)>>,
        pub invoked: Mutex<Vec<(String, Option<Value>)>>,
        pub fail_with: Mutex<Option<EngineError>>,
    }

    impl FakeHost {
        pub fn emit(&self, event: &str, payload: Value) {
            let handlers: Vec<RawHandler> = self
                .listeners
                .lock()
                .unwrap()
                .iter()
                .filter(|(_, name, _)| name == event)
                .map(|(_, _, handler)| Arc::clone(handler))
                .collect();
            for handler in handlers {
                handler(&payload);
            }
        }

        pub fn listener_count(&self, event: &str) -> usize {
            self.listeners
                .lock()
                .unwrap()
                .iter()
                .filter(|(_, name, _)| name == event)
                .count()
        }

        pub fn commands(&self) -> Vec<String> {
            self.invoked
                .lock()
                .unwrap()
                .iter()
                .map(|(name, _)| name.clone())
                .collect()
        }
    }

    #[async_trait]
    impl EngineHost for FakeHost {
        async fn invoke(&self, command: &str, args: Option<Value>) -> Result<(), EngineError> {
            if let Some(err) = self.fail_with.lock().unwrap().clone() {
                return Err(err);
            }
            self.invoked.lock().unwrap().push((command.to_string(), args));
            Ok(())
        }

        fn listen(&self, event: &str, handler: RawHandler) -> ListenerId {
            let mut next = self.next_id.lock().unwrap();
            *next += 1;
            let id = ListenerId(*next);
            self.listeners
                .lock()
                .unwrap()
                .push((id, event.to_string(), handler));
            id
        }

        fn unlisten(&self, id: ListenerId) {
            self.listeners.lock().unwrap().retain(|(lid, _, _)| *lid != id);
        }
    }
}
