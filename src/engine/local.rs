//! In-process countdown engine.
//!
//! Runs one countdown at a time on the tokio runtime and reports progress
//! through the same named events an out-of-process engine would emit.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::sync::watch;
use tokio::time::Instant;

use super::{EngineError, EngineHost, ListenerId, RawHandler};
use crate::core::{Generation, Ticket, Timespan};
use crate::features::bridge::{EventKind, StartSessionArgs};

/// Countdown update interval.
pub const TICK_INTERVAL: Duration = Duration::from_millis(100);

struct Listener {
    id: ListenerId,
    event: String,
    handler: RawHandler,
}

struct Inner {
    listeners: Mutex<Vec<Listener>>,
    next_id: AtomicU64,
    runs: Generation,
    current_run: Mutex<Option<Ticket>>,
    cancel_requested: AtomicBool,
    exit_tx: watch::Sender<bool>,
    tick: Duration,
}

/// A timer engine living inside this process.
#[derive(Clone)]
pub struct LocalEngine {
    inner: Arc<Inner>,
}

impl Default for LocalEngine {
    fn default() -> Self {
        Self::new()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl LocalEngine {
    /// Create an idle engine ticking every [`TICK_INTERVAL`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_tick(TICK_INTERVAL)
    }

    /// Create an idle engine with a custom tick.
    #[must_use]
    pub fn with_tick(tick: Duration) -> Self {
        let (exit_tx, _) = watch::channel(false);
        Self {
            inner: Arc::new(Inner {
                listeners: Mutex::new(Vec::new()),
                next_id: AtomicU64::new(1),
                runs: Generation::new(),
                current_run: Mutex::new(None),
                cancel_requested: AtomicBool::new(false),
                exit_tx,
                tick,
            }),
        }
    }

    /// Resolves once `exit_app` has been received.
    pub async fn exit_requested(&self) {
        let mut rx = self.inner.exit_tx.subscribe();
        let _ = rx.wait_for(|exit| *exit).await;
    }

    /// Whether a countdown is running.
    #[must_use]
    pub fn is_running(&self) -> bool {
        lock(&self.inner.current_run)
            .as_ref()
            .is_some_and(Ticket::is_current)
    }

    fn emit(&self, kind: EventKind, payload: &Value) {
        let handlers: Vec<RawHandler> = lock(&self.inner.listeners)
            .iter()
            .filter(|l| l.event == kind.as_str())
            .map(|l| Arc::clone(&l.handler))
            .collect();

        for handler in handlers {
            handler(payload);
        }
    }

    fn start(&self, args: Option<Value>) -> Result<(), EngineError> {
        let invalid = |reason: String| EngineError::InvalidArgs {
            command: "start_session".to_string(),
            reason,
        };
        let args: StartSessionArgs = args
            .ok_or_else(|| invalid("missing durationStr".to_string()))
            .and_then(|v| serde_json::from_value(v).map_err(|e| invalid(e.to_string())))?;

        let total = match Timespan::parse(&args.duration_str) {
            Ok(span) if !span.is_zero() => span,
            Ok(_) => return Err(self.reject(&args.duration_str, "duration is zero")),
            Err(e) => return Err(self.reject(&args.duration_str, &e.to_string())),
        };

        let ticket = self.inner.runs.advance();
        *lock(&self.inner.current_run) = Some(ticket.clone());
        self.inner.cancel_requested.store(false, Ordering::SeqCst);

        tracing::info!(duration = %total, "countdown started");
        self.emit(EventKind::Started, &json!(true));

        let engine = self.clone();
        tokio::spawn(async move { engine.countdown(ticket, total.to_duration()).await });
        Ok(())
    }

    fn reject(&self, duration: &str, reason: &str) -> EngineError {
        tracing::warn!(duration, reason, "countdown rejected");
        self.emit(EventKind::Started, &json!(false));
        EngineError::Rejected(format!("'{duration}': {reason}"))
    }

    fn cancel(&self) {
        if self.is_running() {
            self.inner.cancel_requested.store(true, Ordering::SeqCst);
        } else {
            tracing::debug!("cancel with no countdown running");
            self.emit(EventKind::Cancelled, &json!(true));
        }
    }

    fn exit(&self) {
        self.inner.runs.invalidate();
        self.inner.exit_tx.send_replace(true);
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    async fn countdown(self, ticket: Ticket, total: Duration) {
        let started_at = Instant::now();
        let mut interval = tokio::time::interval(self.inner.tick);
        let mut last_percent: Option<u8> = None;
        let mut last_remaining = String::new();

        loop {
            interval.tick().await;

            if !ticket.is_current() {
                return;
            }

            if self.inner.cancel_requested.swap(false, Ordering::SeqCst) {
                self.inner.runs.invalidate();
                tracing::info!("countdown cancelled");
                self.emit(EventKind::Cancelled, &json!(true));
                return;
            }

            let elapsed = started_at.elapsed();
            if elapsed >= total {
                break;
            }

            let percent = (elapsed.as_secs_f64() / total.as_secs_f64() * 100.0).min(100.0);
            let rounded = percent.round() as u8;
            if last_percent != Some(rounded) {
                self.emit(EventKind::Progress, &json!(percent));
                last_percent = Some(rounded);
            }

            let remaining_ms = (total - elapsed).as_millis() as u64;
            let remaining = Timespan::from_millis(remaining_ms).to_string();
            if remaining != last_remaining {
                self.emit(EventKind::TimeProgress, &json!(remaining));
                last_remaining = remaining;
            }
        }

        self.inner.runs.invalidate();
        tracing::info!("countdown completed");
        self.emit(EventKind::Progress, &json!(100.0));
        self.emit(EventKind::Completed, &json!(true));
    }
}

#[async_trait]
impl EngineHost for LocalEngine {
    async fn invoke(&self, command: &str, args: Option<Value>) -> Result<(), EngineError> {
        match command {
            "start_session" => self.start(args),
            "cancel_session" => {
                self.cancel();
                Ok(())
            },
            "exit_app" => {
                self.exit();
                Ok(())
            },
            other => Err(EngineError::UnknownCommand(other.to_string())),
        }
    }

    fn listen(&self, event: &str, handler: RawHandler) -> ListenerId {
        let id = ListenerId(self.inner.next_id.fetch_add(1, Ordering::SeqCst));
        lock(&self.inner.listeners).push(Listener {
            id,
            event: event.to_string(),
            handler,
        });
        id
    }

    fn unlisten(&self, id: ListenerId) {
        lock(&self.inner.listeners).retain(|l| l.id != id);
    }
}
