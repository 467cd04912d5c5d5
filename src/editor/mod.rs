//! Label editor: form state, debounced previews, printing, and saving.
//!
//! Every input change goes through one [`Debouncer`], so a burst of
//! keystrokes or wheel ticks produces a single preview request. Preview
//! responses are fenced by a [`RequestSequence`]: only the newest request may
//! update the preview image.

mod state;

use std::sync::{Arc, Mutex, MutexGuard};

use chrono::Utc;
use futures::FutureExt;
use tokio::runtime::Handle;

use crate::api::ApiError;
use crate::app::ModuleContext;
use crate::bus::AppEvent;
use crate::config::EditorConfig;
use crate::model::{Axis, LabelData, TextField};
use crate::runtime::{DebouncedAction, Debouncer, RequestSequence};
use crate::ui::{notify_failure, PreviewSink};

pub use state::EditorState;

pub struct EditorModule {
    core: Arc<EditorCore>,
    debouncer: Debouncer,
}

/// Shared with the debounced preview task.
struct EditorCore {
    ctx: ModuleContext,
    preview: Arc<dyn PreviewSink>,
    default_template: Option<String>,
    state: Mutex<EditorState>,
    sequence: RequestSequence,
    runtime: Handle,
}

impl EditorModule {
    /// Must be called from within a Tokio runtime.
    pub fn new(ctx: ModuleContext, preview: Arc<dyn PreviewSink>, config: &EditorConfig) -> Self {
        let runtime = Handle::current();
        let core = Arc::new(EditorCore {
            ctx,
            preview,
            default_template: config.default_template.clone(),
            state: Mutex::new(EditorState::default()),
            sequence: RequestSequence::new(),
            runtime: runtime.clone(),
        });

        let for_action = core.clone();
        let action: DebouncedAction = Arc::new(move || {
            let core = for_action.clone();
            async move { core.update_preview().await }.boxed()
        });

        Self {
            core,
            debouncer: Debouncer::with_handle("preview", config.debounce(), action, runtime),
        }
    }

    pub fn snapshot(&self) -> EditorState {
        self.core.state().clone()
    }

    pub fn form(&self) -> LabelData {
        self.core.state().form.clone()
    }

    pub fn print_count(&self) -> u32 {
        self.core.state().print_count
    }

    pub fn preview_url(&self) -> Option<String> {
        self.core.state().preview_url.clone()
    }

    pub fn field_label(&self, field: TextField) -> String {
        self.core.state().field_label(field).to_string()
    }

    pub fn template_names(&self) -> Vec<String> {
        self.core.state().templates.keys().cloned().collect()
    }

    pub fn preview_pending(&self) -> bool {
        self.debouncer.is_pending()
    }

    /// Fetch the catalog, select the initial template, seed offsets from it,
    /// and render a first preview.
    pub async fn load_templates(&self) -> Result<(), ApiError> {
        let catalog = match self.core.ctx.backend.templates().await {
            Ok(catalog) => catalog,
            Err(error) => {
                tracing::error!("error loading templates: {error}");
                self.core
                    .ctx
                    .notifier
                    .notify("Error loading templates. Please refresh the page.");
                return Err(error);
            }
        };

        {
            let mut state = self.core.state();
            state.templates = catalog;
            let initial = state.initial_template(self.core.default_template.as_deref());
            if let Some(name) = initial {
                state.apply_template(&name);
                state.apply_template_offsets();
            }
            tracing::info!(
                templates = state.templates.len(),
                selected = state.form.template_name.as_deref().unwrap_or("-"),
                "template catalog loaded"
            );
        }

        self.core.update_preview().await;
        Ok(())
    }

    /// Switch templates and re-render immediately. Unknown names are
    /// rejected with a toast.
    pub async fn select_template(&self, name: &str) -> bool {
        let applied = self.core.state().apply_template(name);
        if !applied {
            self.core
                .ctx
                .notifier
                .notify(&format!("Unknown template: {name}"));
            return false;
        }
        self.core.update_preview().await;
        true
    }

    pub fn set_text(&self, field: TextField, value: impl Into<String>) {
        self.core.state().form.set_text(field, value);
        self.debouncer.trigger();
    }

    pub fn set_offset(&self, axis: Axis, value: i64) {
        self.core.state().form.set_offset(axis, value);
        self.debouncer.trigger();
    }

    /// Offset button: one step in `direction`.
    pub fn adjust_offset(&self, axis: Axis, direction: i64) -> i64 {
        let next = self.core.state().nudge_offset(axis, direction);
        self.debouncer.trigger();
        next
    }

    /// Mouse wheel over an offset input.
    pub fn scroll_offset(&self, axis: Axis, delta_y: f64) -> i64 {
        let next = self.core.state().scroll_offset(axis, delta_y);
        self.debouncer.trigger();
        next
    }

    pub fn set_print_count(&self, count: u32) {
        self.core.state().print_count = count;
    }

    /// Render the current form now, bypassing the debounce window.
    pub async fn update_preview(&self) {
        self.core.update_preview().await;
    }

    pub async fn print_one(&self) -> bool {
        let form = self.form();
        match self
            .core
            .ctx
            .backend
            .print_label(&self.core.ctx.session_id, 1, &form)
            .await
        {
            Ok(_) => {
                self.core.state().consume_one_print();
                self.core.ctx.notifier.notify("Printed one label.");
                true
            }
            Err(error) => {
                notify_failure(
                    self.core.ctx.notifier.as_ref(),
                    &error,
                    "Error printing label. Please try again.",
                );
                false
            }
        }
    }

    /// Print `print_count` copies in one job, then reset the count.
    pub async fn print_batch(&self) -> bool {
        let (form, count) = {
            let state = self.core.state();
            (state.form.clone(), state.print_count)
        };
        if count == 0 {
            self.core
                .ctx
                .notifier
                .notify("Can't print batch, no labels queued.");
            return false;
        }

        match self
            .core
            .ctx
            .backend
            .print_label(&self.core.ctx.session_id, count, &form)
            .await
        {
            Ok(_) => {
                self.core.state().print_count = 0;
                self.core
                    .ctx
                    .notifier
                    .notify(&format!("Printed batch of {count} labels."));
                true
            }
            Err(error) => {
                notify_failure(
                    self.core.ctx.notifier.as_ref(),
                    &error,
                    "Error printing batch. Please try again.",
                );
                false
            }
        }
    }

    /// Keep the session's current preview as a saved label. Returns the
    /// saved image path.
    pub async fn save_label(&self) -> Option<String> {
        match self.core.ctx.backend.save_label(&self.core.ctx.session_id).await {
            Ok(saved) => {
                self.core
                    .ctx
                    .notifier
                    .notify(&format!("Saved to: {}", saved.saved_path));
                Some(saved.saved_path)
            }
            Err(error) => {
                match error.backend_message() {
                    Some(message) => self.core.ctx.notifier.notify(&format!("Error: {message}")),
                    None => tracing::error!("save label failed: {error}"),
                }
                None
            }
        }
    }

    /// Hand the current form to whoever listens for queue additions.
    pub fn add_to_queue(&self) -> usize {
        let mut label = self.form();
        label.image_path = self.preview_url();
        self.core.ctx.bus.publish(AppEvent::AddToQueue(label))
    }

    /// Replace the form with `label` and re-render in the background.
    pub fn load_data(&self, label: &LabelData) {
        self.core.state().load(label);
        let core = self.core.clone();
        self.core.runtime.spawn(async move { core.update_preview().await });
    }
}

impl EditorCore {
    fn state(&self) -> MutexGuard<'_, EditorState> {
        self.state.lock().expect("editor state mutex poisoned")
    }

    async fn update_preview(&self) {
        let form = self.state().form.clone();
        let ticket = self.sequence.issue();

        match self
            .ctx
            .backend
            .preview_label(&self.ctx.session_id, &form)
            .await
        {
            Ok(response) => {
                if !self.sequence.is_latest(ticket) {
                    tracing::debug!(ticket = ticket.value(), "discarding stale preview response");
                    return;
                }
                let Some(path) = response.image_path else {
                    return;
                };
                let url = format!("{path}?v={}", Utc::now().timestamp_millis());
                self.state().preview_url = Some(url.clone());
                self.preview.show_image(&url);
            }
            Err(error) => {
                // Failures are reported even when a newer request has
                // superseded this one; only the image is fenced.
                tracing::warn!(
                    ticket = ticket.value(),
                    stale = !self.sequence.is_latest(ticket),
                    "preview error: {error}"
                );
                let message = match error.backend_message() {
                    Some(message) => format!("Error generating preview: {message}"),
                    None => "Error generating preview. Please try again.".to_string(),
                };
                self.ctx.notifier.notify(&message);
            }
        }
    }
}

impl std::fmt::Debug for EditorModule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditorModule")
            .field("session_id", &self.core.ctx.session_id)
            .field("debouncer", &self.debouncer)
            .finish()
    }
}
