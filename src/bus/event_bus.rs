use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, Weak};

use super::event_types::{AppEvent, EventKind};

/// Error a subscriber may return to report a failed delivery.
pub type HandlerError = Box<dyn std::error::Error + Send + Sync>;
pub type HandlerResult = Result<(), HandlerError>;

/// Shared callback. Identity is the `Arc` allocation, so unsubscribing needs
/// the same `Handler` value that was subscribed.
pub type Handler = Arc<dyn Fn(&AppEvent) -> HandlerResult + Send + Sync>;

type Registry = Mutex<HashMap<EventKind, Vec<Handler>>>;

/// In-process publish/subscribe registry.
///
/// Cloning is cheap and yields another reference to the same registry.
#[derive(Clone, Default)]
pub struct EventBus {
    registry: Arc<Registry>,
    seq: Arc<AtomicU64>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for every future event of `kind`.
    ///
    /// Subscribing the same handler twice delivers twice per publish.
    pub fn subscribe(&self, kind: EventKind, handler: Handler) -> Subscription {
        let mut guard = self.registry.lock().expect("event bus mutex poisoned");
        guard.entry(kind).or_default().push(handler.clone());
        tracing::debug!(event = %kind, "subscriber registered");
        Subscription {
            registry: Arc::downgrade(&self.registry),
            kind,
            handler,
        }
    }

    /// Convenience: wrap a closure in a [`Handler`] and subscribe it.
    pub fn on<F>(&self, kind: EventKind, callback: F) -> Subscription
    where
        F: Fn(&AppEvent) -> HandlerResult + Send + Sync + 'static,
    {
        self.subscribe(kind, Arc::new(callback))
    }

    /// Remove the first registration of `handler` for `kind`. Absent handlers
    /// are ignored.
    pub fn unsubscribe(&self, kind: EventKind, handler: &Handler) {
        remove_handler(&self.registry, kind, handler);
    }

    /// Deliver `event` to every subscriber of its kind, in subscribe order.
    ///
    /// A subscriber that returns an error or panics is logged and skipped;
    /// the remaining subscribers still run. Returns how many subscribers
    /// completed without a fault.
    pub fn publish(&self, event: AppEvent) -> usize {
        let kind = event.kind();
        let seq = self.seq.fetch_add(1, Ordering::Relaxed);

        // Snapshot so subscribers can (un)subscribe while being delivered to.
        let handlers: Vec<Handler> = {
            let guard = self.registry.lock().expect("event bus mutex poisoned");
            match guard.get(&kind) {
                Some(list) => list.clone(),
                None => return 0,
            }
        };

        let mut delivered = 0;
        for handler in &handlers {
            match panic::catch_unwind(AssertUnwindSafe(|| handler(&event))) {
                Ok(Ok(())) => delivered += 1,
                Ok(Err(error)) => {
                    tracing::error!(event = %kind, seq, "error in subscriber: {error}");
                }
                Err(payload) => {
                    tracing::error!(
                        event = %kind,
                        seq,
                        "subscriber panicked: {}",
                        panic_message(payload.as_ref())
                    );
                }
            }
        }

        tracing::trace!(event = %kind, seq, delivered, total = handlers.len(), "event published");
        delivered
    }

    /// Number of registrations currently held for `kind`.
    pub fn subscriber_count(&self, kind: EventKind) -> usize {
        let guard = self.registry.lock().expect("event bus mutex poisoned");
        guard.get(&kind).map(Vec::len).unwrap_or(0)
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kinds: Vec<(EventKind, usize)> = match self.registry.lock() {
            Ok(guard) => guard.iter().map(|(kind, list)| (*kind, list.len())).collect(),
            Err(_) => Vec::new(),
        };
        f.debug_struct("EventBus").field("subscribers", &kinds).finish()
    }
}

/// Handle returned by [`EventBus::subscribe`].
///
/// Dropping it keeps the registration alive; call [`Subscription::unsubscribe`]
/// to remove it.
pub struct Subscription {
    registry: Weak<Registry>,
    kind: EventKind,
    handler: Handler,
}

impl Subscription {
    pub fn unsubscribe(self) {
        if let Some(registry) = self.registry.upgrade() {
            remove_handler(&registry, self.kind, &self.handler);
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").field("kind", &self.kind).finish()
    }
}

fn remove_handler(registry: &Registry, kind: EventKind, handler: &Handler) {
    let mut guard = registry.lock().expect("event bus mutex poisoned");
    let Some(list) = guard.get_mut(&kind) else {
        return;
    };
    if let Some(position) = list.iter().position(|existing| Arc::ptr_eq(existing, handler)) {
        list.remove(position);
        tracing::debug!(event = %kind, "subscriber removed");
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        return (*message).to_string();
    }
    if let Some(message) = payload.downcast_ref::<String>() {
        return message.clone();
    }
    "non-string panic payload".to_string()
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::model::LabelData;

    fn label(text: &str) -> LabelData {
        LabelData {
            main_text: text.to_string(),
            ..LabelData::default()
        }
    }

    fn recorder(log: &Arc<Mutex<Vec<String>>>, tag: &'static str) -> Handler {
        let log = log.clone();
        Arc::new(move |event: &AppEvent| -> HandlerResult {
            log.lock()
                .expect("log mutex")
                .push(format!("{tag}:{}", event.label().main_text));
            Ok(())
        })
    }

    #[test]
    fn delivers_in_subscribe_order() {
        let bus = EventBus::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        bus.subscribe(EventKind::AddToQueue, recorder(&log, "a"));
        bus.subscribe(EventKind::AddToQueue, recorder(&log, "b"));
        bus.subscribe(EventKind::AddToQueue, recorder(&log, "c"));

        let delivered = bus.publish(AppEvent::AddToQueue(label("Rosa")));

        assert_eq!(delivered, 3);
        assert_eq!(*log.lock().unwrap(), vec!["a:Rosa", "b:Rosa", "c:Rosa"]);
    }

    #[test]
    fn publish_without_subscribers_is_noop() {
        let bus = EventBus::new();
        assert_eq!(bus.publish(AppEvent::LoadInEditor(label("Salvia"))), 0);
        assert_eq!(bus.subscriber_count(EventKind::LoadInEditor), 0);
    }

    #[test]
    fn only_matching_kind_is_delivered() {
        let bus = EventBus::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        bus.subscribe(EventKind::AddToQueue, recorder(&log, "queue"));
        bus.subscribe(EventKind::LoadInEditor, recorder(&log, "editor"));

        bus.publish(AppEvent::LoadInEditor(label("Thyme")));

        assert_eq!(*log.lock().unwrap(), vec!["editor:Thyme"]);
    }

    #[test]
    fn failing_subscriber_does_not_block_later_ones() {
        let bus = EventBus::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        bus.subscribe(EventKind::AddToQueue, recorder(&log, "first"));
        bus.on(EventKind::AddToQueue, |_| Err("printer offline".into()));
        bus.subscribe(EventKind::AddToQueue, recorder(&log, "last"));

        let delivered = bus.publish(AppEvent::AddToQueue(label("Iris")));

        assert_eq!(delivered, 2);
        assert_eq!(*log.lock().unwrap(), vec!["first:Iris", "last:Iris"]);
    }

    #[test]
    fn panicking_subscriber_is_contained() {
        let bus = EventBus::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        bus.on(EventKind::AddToQueue, |_| panic!("boom"));
        bus.subscribe(EventKind::AddToQueue, recorder(&log, "after"));

        let delivered = bus.publish(AppEvent::AddToQueue(label("Aster")));

        assert_eq!(delivered, 1);
        assert_eq!(*log.lock().unwrap(), vec!["after:Aster"]);
    }

    #[test]
    fn subscription_handle_removes_only_its_handler() {
        let bus = EventBus::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        let first = bus.subscribe(EventKind::AddToQueue, recorder(&log, "first"));
        bus.subscribe(EventKind::AddToQueue, recorder(&log, "second"));

        first.unsubscribe();
        bus.publish(AppEvent::AddToQueue(label("Fern")));

        assert_eq!(*log.lock().unwrap(), vec!["second:Fern"]);
        assert_eq!(bus.subscriber_count(EventKind::AddToQueue), 1);
    }

    #[test]
    fn duplicate_subscription_delivers_twice_and_unsubscribes_once() {
        let bus = EventBus::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        let handler = recorder(&log, "dup");
        bus.subscribe(EventKind::AddToQueue, handler.clone());
        bus.subscribe(EventKind::AddToQueue, handler.clone());

        bus.publish(AppEvent::AddToQueue(label("Mint")));
        assert_eq!(log.lock().unwrap().len(), 2);

        bus.unsubscribe(EventKind::AddToQueue, &handler);
        bus.publish(AppEvent::AddToQueue(label("Mint")));
        assert_eq!(log.lock().unwrap().len(), 3);
    }

    #[test]
    fn unsubscribing_unknown_handler_is_noop() {
        let bus = EventBus::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        let never_registered = recorder(&log, "ghost");
        bus.unsubscribe(EventKind::LoadInEditor, &never_registered);

        bus.subscribe(EventKind::LoadInEditor, recorder(&log, "real"));
        bus.unsubscribe(EventKind::LoadInEditor, &never_registered);

        assert_eq!(bus.subscriber_count(EventKind::LoadInEditor), 1);
    }

    #[test]
    fn subscriber_can_unsubscribe_during_delivery() {
        let bus = EventBus::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        let slot: Arc<Mutex<Option<Handler>>> = Arc::new(Mutex::new(None));

        let bus_for_handler = bus.clone();
        let slot_for_handler = slot.clone();
        let log_for_handler = log.clone();
        let once: Handler = Arc::new(move |_event: &AppEvent| -> HandlerResult {
            log_for_handler.lock().expect("log mutex").push("once".to_string());
            if let Some(me) = slot_for_handler.lock().expect("slot mutex").take() {
                bus_for_handler.unsubscribe(EventKind::AddToQueue, &me);
            }
            Ok(())
        });
        *slot.lock().unwrap() = Some(once.clone());
        bus.subscribe(EventKind::AddToQueue, once);

        bus.publish(AppEvent::AddToQueue(label("Sage")));
        bus.publish(AppEvent::AddToQueue(label("Sage")));

        assert_eq!(*log.lock().unwrap(), vec!["once"]);
    }

    #[test]
    fn handle_outliving_bus_is_harmless() {
        let bus = EventBus::new();
        let subscription = bus.on(EventKind::AddToQueue, |_| Ok(()));
        drop(bus);
        subscription.unsubscribe();
    }
}
