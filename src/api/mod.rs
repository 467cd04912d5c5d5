//! Label server boundary.
//!
//! The server renders previews, prints, stores saved labels, and answers
//! searches. Everything here is request/response; nothing is retried.

mod client;
mod error;

use async_trait::async_trait;

use crate::model::{
    LabelData, PreviewResponse, PrintResponse, SaveResponse, SearchResult, TemplateCatalog,
};

pub use client::HttpTagBackend;
pub use error::ApiError;

#[async_trait]
pub trait TagBackend: Send + Sync {
    async fn templates(&self) -> Result<TemplateCatalog, ApiError>;

    /// Render `label` into the session's preview image.
    async fn preview_label(
        &self,
        session_id: &str,
        label: &LabelData,
    ) -> Result<PreviewResponse, ApiError>;

    async fn print_label(
        &self,
        session_id: &str,
        count: u32,
        label: &LabelData,
    ) -> Result<PrintResponse, ApiError>;

    /// Persist the session's current preview as a saved label.
    async fn save_label(&self, session_id: &str) -> Result<SaveResponse, ApiError>;

    async fn search_labels(&self, query: &str) -> Result<Vec<SearchResult>, ApiError>;
}
