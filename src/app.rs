//! Application wiring: one bus, one session, three modules.

use std::sync::{Arc, Weak};

use crate::api::{ApiError, TagBackend};
use crate::bus::{EventBus, EventKind, Subscription};
use crate::config::AppConfig;
use crate::editor::EditorModule;
use crate::queue::QueueModule;
use crate::search::SearchModule;
use crate::ui::{Notifier, PreviewSink};

/// Collaborators every module receives.
#[derive(Clone)]
pub struct ModuleContext {
    /// Identifies this client's preview slot on the label server.
    pub session_id: String,
    pub backend: Arc<dyn TagBackend>,
    pub bus: EventBus,
    pub notifier: Arc<dyn Notifier>,
}

impl std::fmt::Debug for ModuleContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModuleContext")
            .field("session_id", &self.session_id)
            .field("bus", &self.bus)
            .finish()
    }
}

pub struct App {
    pub bus: EventBus,
    pub session_id: String,
    pub editor: Arc<EditorModule>,
    pub search: SearchModule,
    pub queue: Arc<QueueModule>,
    subscriptions: Vec<Subscription>,
}

impl App {
    /// Build the modules and connect them through a fresh bus. Must be called
    /// from within a Tokio runtime.
    pub fn new(
        config: &AppConfig,
        backend: Arc<dyn TagBackend>,
        notifier: Arc<dyn Notifier>,
        preview: Arc<dyn PreviewSink>,
    ) -> Self {
        let bus = EventBus::new();
        let session_id = generate_session_id();
        let ctx = ModuleContext {
            session_id: session_id.clone(),
            backend,
            bus: bus.clone(),
            notifier,
        };

        let editor = Arc::new(EditorModule::new(ctx.clone(), preview, &config.editor));
        let search = SearchModule::new(ctx.clone());
        let queue = QueueModule::new(ctx);

        let mut subscriptions = Vec::new();
        subscriptions.push(QueueModule::attach(&queue, &bus));

        let editor_ref: Weak<EditorModule> = Arc::downgrade(&editor);
        subscriptions.push(bus.on(EventKind::LoadInEditor, move |event| {
            if let Some(editor) = editor_ref.upgrade() {
                editor.load_data(event.label());
            }
            Ok(())
        }));

        tracing::info!(session_id = %session_id, "tag editor session created");

        Self {
            bus,
            session_id,
            editor,
            search,
            queue,
            subscriptions,
        }
    }

    /// Load the template catalog and render the first preview.
    pub async fn start(&self) -> Result<(), ApiError> {
        self.editor.load_templates().await
    }

    /// Detach the modules from the bus.
    pub fn shutdown(self) {
        for subscription in self.subscriptions {
            subscription.unsubscribe();
        }
    }
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("session_id", &self.session_id)
            .field("bus", &self.bus)
            .finish()
    }
}

/// 8 random bytes, hex encoded.
pub fn generate_session_id() -> String {
    rand::random::<[u8; 8]>()
        .iter()
        .map(|byte| format!("{byte:02x}"))
        .collect()
}
