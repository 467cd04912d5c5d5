use std::sync::{Arc, Mutex};
use std::time::Duration;

use futures::future::BoxFuture;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time;

/// Deferred work run when a burst of triggers goes quiet. Called at fire
/// time, so it observes whatever state exists then.
pub type DebouncedAction = Arc<dyn Fn() -> BoxFuture<'static, ()> + Send + Sync>;

/// Collapses bursts of [`Debouncer::trigger`] calls into one run of the
/// action, `delay` after the last call.
///
/// Holds at most one scheduled timer. A trigger replaces (aborts) the
/// pending timer. Once the timer fires, the action runs as its own task, so
/// a later trigger never cancels work that has already started.
pub struct Debouncer {
    name: &'static str,
    delay: Duration,
    action: DebouncedAction,
    runtime: Handle,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl Debouncer {
    /// Must be called from within a Tokio runtime; timers run on it.
    pub fn new(name: &'static str, delay: Duration, action: DebouncedAction) -> Self {
        Self::with_handle(name, delay, action, Handle::current())
    }

    pub fn with_handle(
        name: &'static str,
        delay: Duration,
        action: DebouncedAction,
        runtime: Handle,
    ) -> Self {
        Self {
            name,
            delay,
            action,
            runtime,
            pending: Mutex::new(None),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Record one input change and restart the quiet interval.
    pub fn trigger(&self) {
        let mut pending = self.pending.lock().expect("debouncer mutex poisoned");
        if let Some(previous) = pending.take() {
            if !previous.is_finished() {
                previous.abort();
                tracing::trace!(debouncer = self.name, "pending action superseded");
            }
        }

        let action = self.action.clone();
        let delay = self.delay;
        let runtime = self.runtime.clone();
        let name = self.name;
        *pending = Some(self.runtime.spawn(async move {
            time::sleep(delay).await;
            tracing::debug!(debouncer = name, "quiet interval elapsed, firing");
            runtime.spawn(action());
        }));
    }

    /// Whether a timer is scheduled and has not fired yet.
    pub fn is_pending(&self) -> bool {
        let pending = self.pending.lock().expect("debouncer mutex poisoned");
        pending.as_ref().is_some_and(|handle| !handle.is_finished())
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        if let Ok(mut pending) = self.pending.lock() {
            if let Some(handle) = pending.take() {
                handle.abort();
            }
        }
    }
}

impl std::fmt::Debug for Debouncer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Debouncer")
            .field("name", &self.name)
            .field("delay", &self.delay)
            .finish()
    }
}
