//! Print queue fed by `AddToQueue` events.

use std::sync::{Arc, Mutex, MutexGuard, Weak};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::app::ModuleContext;
use crate::bus::{AppEvent, EventBus, EventKind, Subscription};
use crate::model::LabelData;
use crate::ui::notify_failure;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueItem {
    pub id: String,
    pub label: LabelData,
}

/// Outcome of [`QueueModule::print_all`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueueRun {
    pub printed: usize,
    pub total: usize,
}

pub struct QueueModule {
    ctx: ModuleContext,
    items: Mutex<Vec<QueueItem>>,
}

impl QueueModule {
    pub fn new(ctx: ModuleContext) -> Arc<Self> {
        Arc::new(Self {
            ctx,
            items: Mutex::new(Vec::new()),
        })
    }

    /// Subscribe `queue` to `AddToQueue` on `bus`.
    pub fn attach(queue: &Arc<Self>, bus: &EventBus) -> Subscription {
        let queue: Weak<Self> = Arc::downgrade(queue);
        bus.on(EventKind::AddToQueue, move |event| {
            if let (Some(queue), AppEvent::AddToQueue(label)) = (queue.upgrade(), event) {
                queue.add(label.clone());
            }
            Ok(())
        })
    }

    fn items_guard(&self) -> MutexGuard<'_, Vec<QueueItem>> {
        self.items.lock().expect("queue mutex poisoned")
    }

    pub fn add(&self, label: LabelData) -> String {
        let id = format!("queue-{}", Uuid::new_v4().simple());
        tracing::debug!(%id, label = %label.summary(), "label queued");
        self.items_guard().push(QueueItem {
            id: id.clone(),
            label,
        });
        id
    }

    pub fn items(&self) -> Vec<QueueItem> {
        self.items_guard().clone()
    }

    pub fn len(&self) -> usize {
        self.items_guard().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items_guard().is_empty()
    }

    pub fn get(&self, id: &str) -> Option<QueueItem> {
        self.items_guard().iter().find(|item| item.id == id).cloned()
    }

    pub fn remove(&self, id: &str) -> bool {
        let mut items = self.items_guard();
        let before = items.len();
        items.retain(|item| item.id != id);
        before != items.len()
    }

    pub fn clear(&self) {
        self.items_guard().clear();
        self.ctx.notifier.notify("Queue cleared.");
    }

    /// Print one copy of `item`. The item stays queued either way.
    pub async fn print_item(&self, item: &QueueItem) -> bool {
        let label = item.label.for_print();
        match self
            .ctx
            .backend
            .print_label(&self.ctx.session_id, 1, &label)
            .await
        {
            Ok(_) => {
                self.ctx.notifier.notify("Printed one label.");
                true
            }
            Err(error) => {
                notify_failure(
                    self.ctx.notifier.as_ref(),
                    &error,
                    "Error printing label. Please try again.",
                );
                false
            }
        }
    }

    /// Print every queued item once, in order. Failures don't stop the run.
    pub async fn print_all(&self) -> QueueRun {
        let items = self.items();
        let total = items.len();
        if total == 0 {
            return QueueRun { printed: 0, total };
        }

        let mut printed = 0;
        for item in &items {
            if self.print_item(item).await {
                printed += 1;
            }
        }

        tracing::info!(printed, total, "queue printed");
        self.ctx
            .notifier
            .notify(&format!("Printed {printed} of {total} labels."));
        QueueRun { printed, total }
    }
}

impl std::fmt::Debug for QueueModule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueueModule")
            .field("len", &self.len())
            .finish()
    }
}
