use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::{ApiError, TagBackend};
use crate::config::ServerConfig;
use crate::model::{
    LabelData, PreviewRequest, PreviewResponse, PrintRequest, PrintResponse, SaveRequest,
    SaveResponse, SearchRequest, SearchResult, TemplateCatalog,
};

/// [`TagBackend`] speaking JSON over HTTP to the label server.
pub struct HttpTagBackend {
    base_url: String,
    timeout_ms: u64,
    client: reqwest::Client,
}

impl HttpTagBackend {
    pub fn new(config: &ServerConfig) -> Result<Self, ApiError> {
        let base_url = config.base_url.trim().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(ApiError::Config(
                "label server base url cannot be empty".to_string(),
            ));
        }
        if config.timeout_ms == 0 {
            return Err(ApiError::Config(
                "label server timeout must be greater than 0".to_string(),
            ));
        }

        Ok(Self {
            base_url,
            timeout_ms: config.timeout_ms,
            client: reqwest::Client::builder()
                .timeout(Duration::from_millis(config.timeout_ms))
                .build()
                .map_err(|error| ApiError::Config(error.to_string()))?,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self
            .client
            .get(self.endpoint(path))
            .send()
            .await
            .map_err(|error| self.map_connectivity_error(error))?;
        decode_reply(path, response).await
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self
            .client
            .post(self.endpoint(path))
            .json(body)
            .send()
            .await
            .map_err(|error| self.map_connectivity_error(error))?;
        decode_reply(path, response).await
    }

    fn map_connectivity_error(&self, error: reqwest::Error) -> ApiError {
        if error.is_connect() {
            return ApiError::Request(format!(
                "could not reach label server at {}: {error}",
                self.base_url
            ));
        }
        if error.is_timeout() {
            return ApiError::Timeout(format!(
                "label server request timed out after {} ms",
                self.timeout_ms
            ));
        }
        ApiError::from(error)
    }
}

#[async_trait]
impl TagBackend for HttpTagBackend {
    async fn templates(&self) -> Result<TemplateCatalog, ApiError> {
        self.get_json("/get_templates").await
    }

    async fn preview_label(
        &self,
        session_id: &str,
        label: &LabelData,
    ) -> Result<PreviewResponse, ApiError> {
        self.post_json(
            "/preview_label",
            &PreviewRequest {
                session_id,
                label_data: label,
            },
        )
        .await
    }

    async fn print_label(
        &self,
        session_id: &str,
        count: u32,
        label: &LabelData,
    ) -> Result<PrintResponse, ApiError> {
        self.post_json(
            "/print_label",
            &PrintRequest {
                session_id,
                count,
                label_data: label,
            },
        )
        .await
    }

    async fn save_label(&self, session_id: &str) -> Result<SaveResponse, ApiError> {
        self.post_json("/save_label", &SaveRequest { session_id })
            .await
    }

    async fn search_labels(&self, query: &str) -> Result<Vec<SearchResult>, ApiError> {
        self.post_json("/search_labels", &SearchRequest { query })
            .await
    }
}

/// An `error` string in the body wins over the HTTP status: the server uses
/// it for both 4xx rejections and soft failures.
async fn decode_reply<T: DeserializeOwned>(
    path: &str,
    response: reqwest::Response,
) -> Result<T, ApiError> {
    let status = response.status();
    let payload: serde_json::Value = response.json().await.map_err(|error| {
        ApiError::InvalidResponse(format!(
            "failed to parse {path} JSON (status {}): {error}",
            status.as_u16()
        ))
    })?;

    if let Some(message) = payload.get("error").and_then(|value| value.as_str()) {
        return Err(ApiError::Backend {
            status: status.as_u16(),
            message: message.to_string(),
        });
    }

    if !status.is_success() {
        return Err(ApiError::Request(format!(
            "{path} returned status {}: {payload}",
            status.as_u16()
        )));
    }

    serde_json::from_value(payload)
        .map_err(|error| ApiError::InvalidResponse(format!("unexpected {path} body: {error}")))
}
