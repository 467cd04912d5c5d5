//! Shared helpers for end-to-end tests against a mocked label server.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use httpmock::Method::GET;
use httpmock::{Mock, MockServer};
use serde_json::json;

use tagpress_lib::api::HttpTagBackend;
use tagpress_lib::app::App;
use tagpress_lib::config::{AppConfig, EditorConfig, ServerConfig};
use tagpress_lib::ui::{Notifier, PreviewSink};

#[derive(Debug, Default)]
pub struct RecordingSurface {
    toasts: Mutex<Vec<String>>,
    images: Mutex<Vec<String>>,
}

impl RecordingSurface {
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

pub const DEBOUNCE_MS: u64 = 50;

pub fn config(server: &MockServer, timeout_ms: u64) -> AppConfig {
    AppConfig {
        server: ServerConfig {
            base_url: server.base_url(),
            timeout_ms,
        },
        editor: EditorConfig {
            debounce_ms: DEBOUNCE_MS,
            default_template: None,
        },
    }
}

pub fn app(server: &MockServer) -> (App, Arc<RecordingSurface>) {
    app_with_config(&config(server, 5_000))
}

pub fn app_with_config(config: &AppConfig) -> (App, Arc<RecordingSurface>) {
    let backend = Arc::new(HttpTagBackend::new(&config.server).expect("backend"));
    let surface = Arc::new(RecordingSurface::default());
    let app = App::new(config, backend, surface.clone(), surface.clone());
    (app, surface)
}

pub fn mock_templates(server: &MockServer) -> Mock<'_> {
    server.mock(|when, then| {
        when.method(GET).path("/get_templates");
        then.status(200).json_body(json!({
            "Default Label Template": {
                "label": "Default Label Template",
                "base_image": "static/label_templates/default.png",
                "offsets": [7, 0],
                "fields": [
                    { "name": "main_text", "x": 20, "y": 10,
                      "data": { "type": "text", "label": "Genus", "style": { "size": 60 } } },
                    { "name": "midtext", "x": 20, "y": 60, "data": { "type": "text" } },
                    { "name": "subtext", "x": 20, "y": 95, "data": { "type": "text" } }
                ]
            },
            "Tall Stake": {
                "label": "Tall Stake",
                "offsets": [0, 4],
                "fields": [
                    { "name": "main_text", "x": 5, "y": 5, "label": "Common Name",
                      "data": { "type": "text" } }
                ]
            }
        }));
    })
}

/// Poll `check` until it holds or `timeout` passes.
pub async fn wait_until(timeout: Duration, mut check: impl FnMut() -> bool) -> bool {
    let deadline = tokio::time::Instant::now() + timeout;
    loop {
        if check() {
            return true;
        }
        if tokio::time::Instant::now() >= deadline {
            return false;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}
