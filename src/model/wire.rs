//! Request and response bodies exchanged with the label server.

use serde::{Deserialize, Serialize};

use super::label::LabelData;

#[derive(Debug, Clone, Serialize)]
pub struct PreviewRequest<'a> {
    pub session_id: &'a str,
    pub label_data: &'a LabelData,
}

#[derive(Debug, Clone, Serialize)]
pub struct PrintRequest<'a> {
    pub session_id: &'a str,
    pub count: u32,
    pub label_data: &'a LabelData,
}

#[derive(Debug, Clone, Serialize)]
pub struct SaveRequest<'a> {
    pub session_id: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchRequest<'a> {
    pub query: &'a str,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PreviewResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub image_path: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PrintResponse {
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SaveResponse {
    #[serde(default)]
    pub message: Option<String>,
    pub saved_path: String,
}

/// A saved label matched by `/search_labels`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    #[serde(default)]
    pub preview_path: String,
    #[serde(default)]
    pub main_text: String,
    #[serde(default)]
    pub midtext: String,
    #[serde(default)]
    pub subtext: String,
    #[serde(default)]
    pub date_created: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_name: Option<String>,
}

impl SearchResult {
    /// The subset the editor needs to reload this label.
    pub fn editor_data(&self) -> LabelData {
        let label = LabelData {
            template_name: self.template_name.clone(),
            main_text: self.main_text.clone(),
            midtext: self.midtext.clone(),
            subtext: self.subtext.clone(),
            ..LabelData::default()
        };
        LabelData {
            template_name: Some(label.template_or_default().to_string()),
            ..label
        }
    }

    /// Queue entry pointing at the already rendered image.
    pub fn queue_data(&self) -> LabelData {
        LabelData {
            template_name: self.template_name.clone(),
            main_text: self.main_text.clone(),
            midtext: self.midtext.clone(),
            subtext: self.subtext.clone(),
            image_path: Some(self.preview_path.clone()).filter(|path| !path.is_empty()),
            date_created: Some(self.date_created.clone()).filter(|date| !date.is_empty()),
            ..LabelData::default()
        }
    }
}
