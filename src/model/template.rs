use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::label::TextField;

/// Templates keyed by their `label`. Ordered by key; the first entry is the
/// editor's default.
pub type TemplateCatalog = BTreeMap<String, LabelTemplate>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelTemplate {
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_image: Option<String>,
    #[serde(default)]
    pub fields: Vec<LabelField>,
    #[serde(default)]
    pub offsets: [i64; 2],
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_path: Option<String>,
}

impl LabelTemplate {
    pub fn field(&self, name: &str) -> Option<&LabelField> {
        self.fields.iter().find(|field| field.name == name)
    }

    /// Display label for each editor text input this template knows about.
    pub fn text_field_labels(&self) -> Vec<(TextField, String)> {
        TextField::all()
            .iter()
            .filter_map(|text_field| {
                self.field(text_field.as_str())
                    .map(|field| (*text_field, field.display_label()))
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelField {
    pub name: String,
    #[serde(default)]
    pub x: i64,
    #[serde(default)]
    pub y: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default)]
    pub data: FieldData,
}

impl LabelField {
    pub fn display_label(&self) -> String {
        self.label
            .as_deref()
            .or(self.data.label.as_deref())
            .filter(|label| !label.trim().is_empty())
            .unwrap_or(&self.name)
            .to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldData {
    #[serde(rename = "type", default = "default_field_kind")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default)]
    pub style: TextStyle,
}

impl Default for FieldData {
    fn default() -> Self {
        Self {
            kind: default_field_kind(),
            label: None,
            style: TextStyle::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct TextStyle {
    #[serde(default = "default_font_base")]
    pub font_base: String,
    #[serde(default = "default_font_size")]
    pub size: u32,
    #[serde(default)]
    pub bold: bool,
    #[serde(default)]
    pub italic: bool,
    #[serde(default = "default_spacing")]
    pub spacing: i64,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_base: default_font_base(),
            size: default_font_size(),
            bold: false,
            italic: false,
            spacing: default_spacing(),
        }
    }
}

fn default_field_kind() -> String {
    "text".to_string()
}

fn default_font_base() -> String {
    "arial.ttf".to_string()
}

fn default_font_size() -> u32 {
    48
}

fn default_spacing() -> i64 {
    1
}
