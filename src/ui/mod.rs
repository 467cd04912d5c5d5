//! Output surfaces the modules report to.
//!
//! Both are fire-and-forget: implementations must not block and cannot fail.

use crate::api::ApiError;

/// User-visible status messages ("toasts").
pub trait Notifier: Send + Sync {
    fn notify(&self, message: &str);
}

/// Where the rendered preview image is shown.
pub trait PreviewSink: Send + Sync {
    fn show_image(&self, image_url: &str);
}

/// Writes toasts and preview updates to stdout, for the console front end.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleSurface;

impl Notifier for ConsoleSurface {
    fn notify(&self, message: &str) {
        tracing::info!(target: "tagpress::toast", "{message}");
        println!("» {message}");
    }
}

impl PreviewSink for ConsoleSurface {
    fn show_image(&self, image_url: &str) {
        println!("  preview: {image_url}");
    }
}

/// Toast a failed request: the server's own message when it sent one,
/// `fallback` for transport-level failures.
pub fn notify_failure(notifier: &dyn Notifier, error: &ApiError, fallback: &str) {
    match error.backend_message() {
        Some(message) => notifier.notify(&format!("Error: {message}")),
        None => {
            tracing::error!("{fallback} ({error})");
            notifier.notify(fallback);
        }
    }
}
