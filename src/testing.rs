//! Test doubles shared by the module tests.
//!
//! `MockBackend` answers from in-memory state and records every call, so the
//! editor, queue, and search modules can be exercised without a server and
//! under a paused clock.

use std::collections::{HashSet, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;

use crate::api::{ApiError, TagBackend};
use crate::app::ModuleContext;
use crate::bus::EventBus;
use crate::model::{
    LabelData, LabelTemplate, PreviewResponse, PrintResponse, SaveResponse, SearchResult,
    TemplateCatalog,
};
use crate::ui::{Notifier, PreviewSink};

pub const SESSION_ID: &str = "0123456789abcdef";

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Templates,
    Preview(LabelData),
    Print { count: u32, label: LabelData },
    Save,
    Search(String),
}

#[derive(Default)]
pub struct MockBackend {
    catalog: Mutex<TemplateCatalog>,
    offline: AtomicBool,
    preview_error: Mutex<Option<String>>,
    preview_delays: Mutex<VecDeque<Duration>>,
    previews: AtomicUsize,
    failing_prints: Mutex<HashSet<String>>,
    search_results: Mutex<Vec<SearchResult>>,
    calls: Mutex<Vec<Call>>,
}

impl MockBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Backend preloaded with two templates.
    pub fn with_templates() -> Arc<Self> {
        let backend = Self::new();
        backend.set_catalog(sample_catalog());
        backend
    }

    pub fn set_catalog(&self, catalog: TemplateCatalog) {
        *self.catalog.lock().unwrap() = catalog;
    }

    /// Every request fails at the transport level.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    pub fn fail_previews_with(&self, message: &str) {
        *self.preview_error.lock().unwrap() = Some(message.to_string());
    }

    pub fn clear_preview_failure(&self) {
        *self.preview_error.lock().unwrap() = None;
    }

    /// Delay the next preview responses, in call order.
    pub fn delay_previews(&self, delays: &[Duration]) {
        self.preview_delays.lock().unwrap().extend(delays.iter().copied());
    }

    /// Prints whose main text equals `main_text` are rejected by the server.
    pub fn fail_prints_for(&self, main_text: &str) {
        self.failing_prints
            .lock()
            .unwrap()
            .insert(main_text.to_string());
    }

    pub fn set_search_results(&self, results: Vec<SearchResult>) {
        *self.search_results.lock().unwrap() = results;
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn previews(&self) -> Vec<LabelData> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Preview(label) => Some(label),
                _ => None,
            })
            .collect()
    }

    pub fn prints(&self) -> Vec<(u32, LabelData)> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Print { count, label } => Some((count, label)),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn check_online(&self) -> Result<(), ApiError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(ApiError::Request("connection refused".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl TagBackend for MockBackend {
    async fn templates(&self) -> Result<TemplateCatalog, ApiError> {
        self.record(Call::Templates);
        self.check_online()?;
        Ok(self.catalog.lock().unwrap().clone())
    }

    async fn preview_label(
        &self,
        session_id: &str,
        label: &LabelData,
    ) -> Result<PreviewResponse, ApiError> {
        self.record(Call::Preview(label.clone()));
        let number = self.previews.fetch_add(1, Ordering::SeqCst) + 1;
        let delay = self.preview_delays.lock().unwrap().pop_front();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.check_online()?;
        if let Some(message) = self.preview_error.lock().unwrap().clone() {
            return Err(ApiError::Backend {
                status: 400,
                message,
            });
        }
        Ok(PreviewResponse {
            message: Some(format!("Preview updated for session {session_id}.")),
            image_path: Some(format!(
                "/static/preview_images/preview_{session_id}_{number}.png"
            )),
        })
    }

    async fn print_label(
        &self,
        session_id: &str,
        count: u32,
        label: &LabelData,
    ) -> Result<PrintResponse, ApiError> {
        self.record(Call::Print {
            count,
            label: label.clone(),
        });
        self.check_online()?;
        if self.failing_prints.lock().unwrap().contains(&label.main_text) {
            return Err(ApiError::Backend {
                status: 500,
                message: "Printing is not available on this platform".to_string(),
            });
        }
        Ok(PrintResponse {
            message: Some(format!(
                "Printed {count} copies of preview image for session {session_id}."
            )),
        })
    }

    async fn save_label(&self, _session_id: &str) -> Result<SaveResponse, ApiError> {
        self.record(Call::Save);
        self.check_online()?;
        Ok(SaveResponse {
            message: None,
            saved_path: "/static/generated_labels/label_rosa_peace__20240501-101500.png"
                .to_string(),
        })
    }

    async fn search_labels(&self, query: &str) -> Result<Vec<SearchResult>, ApiError> {
        self.record(Call::Search(query.to_string()));
        self.check_online()?;
        Ok(self.search_results.lock().unwrap().clone())
    }
}

/// Collects toasts and preview images in arrival order.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    toasts: Mutex<Vec<String>>,
    images: Mutex<Vec<String>>,
}

impl RecordingSurface {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn toasts(&self) -> Vec<String> {
        self.toasts.lock().unwrap().clone()
    }

    pub fn last_toast(&self) -> Option<String> {
        self.toasts.lock().unwrap().last().cloned()
    }

    pub fn images(&self) -> Vec<String> {
        self.images.lock().unwrap().clone()
    }
}

impl Notifier for RecordingSurface {
    fn notify(&self, message: &str) {
        self.toasts.lock().unwrap().push(message.to_string());
    }
}

impl PreviewSink for RecordingSurface {
    fn show_image(&self, image_url: &str) {
        self.images.lock().unwrap().push(image_url.to_string());
    }
}

pub fn context(backend: Arc<MockBackend>, surface: Arc<RecordingSurface>) -> ModuleContext {
    ModuleContext {
        session_id: SESSION_ID.to_string(),
        backend,
        bus: EventBus::new(),
        notifier: surface,
    }
}

pub fn sample_catalog() -> TemplateCatalog {
    let mut catalog = TemplateCatalog::new();
    for raw in [
        json!({
            "label": "Default Label Template",
            "offsets": [7, 0],
            "fields": [
                { "name": "main_text", "x": 20, "y": 10, "data": { "type": "text", "label": "Genus" } },
                { "name": "midtext", "x": 20, "y": 60, "data": { "type": "text" } },
                { "name": "subtext", "x": 20, "y": 95, "data": { "type": "text" } }
            ]
        }),
        json!({
            "label": "Tall Stake",
            "offsets": [0, 4],
            "fields": [
                { "name": "main_text", "x": 5, "y": 5, "label": "Common Name", "data": { "type": "text" } }
            ]
        }),
    ] {
        let template: LabelTemplate = serde_json::from_value(raw).expect("sample template");
        catalog.insert(template.label.clone(), template);
    }
    catalog
}

pub fn search_result(main_text: &str, midtext: &str) -> SearchResult {
    SearchResult {
        preview_path: format!(
            "/static/generated_labels/label_{}_{}__20240501-101500.png",
            main_text.to_lowercase(),
            midtext.to_lowercase()
        ),
        main_text: main_text.to_string(),
        midtext: midtext.to_string(),
        subtext: String::new(),
        date_created: "2024-05-01T10:15:00".to_string(),
        template_name: None,
    }
}
