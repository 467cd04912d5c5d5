//! Plant tag editor client.
//!
//! Talks to a label server that renders, prints, saves, and searches tags.
//! The pieces:
//! - `bus`: typed publish/subscribe between modules
//! - `editor`: form state with debounced previews, printing, and saving
//! - `queue`: labels collected for a later print run
//! - `search`: saved-label lookup feeding the editor and queue
//! - `api`: the label server seam and its HTTP client
//! - `app`: wiring, `console`: the stdin front end

pub mod api;
pub mod app;
pub mod bus;
pub mod config;
pub mod console;
pub mod editor;
pub mod model;
pub mod queue;
pub mod runtime;
pub mod search;
pub mod ui;

#[cfg(test)]
mod testing;

use std::sync::Arc;

use api::{ApiError, HttpTagBackend};
use app::App;
use config::{AppConfig, ConfigError};
use ui::ConsoleSurface;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    Config(#[from] ConfigError),
    #[error("{0}")]
    Api(#[from] ApiError),
    #[error("console i/o failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Install the global subscriber. Logs go to stderr so they don't mix with
/// console output.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tagpress=debug,info".parse().expect("valid env filter")),
        )
        .with_writer(std::io::stderr)
        .init();
}

pub async fn run() -> Result<(), AppError> {
    init_tracing();

    let config = AppConfig::load()?;
    tracing::info!(server = %config.server.base_url, "starting tag editor");

    let backend = Arc::new(HttpTagBackend::new(&config.server)?);
    let surface = Arc::new(ConsoleSurface);
    let app = App::new(&config, backend, surface.clone(), surface);

    // The editor stays usable offline; `templates` retries the load.
    if let Err(error) = app.start().await {
        tracing::warn!("initial template load failed: {error}");
    }

    console::run_loop(&app).await?;
    app.shutdown();
    tracing::info!("tag editor stopped");
    Ok(())
}
