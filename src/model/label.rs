use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Template the label server falls back to when a label names none.
pub const DEFAULT_TEMPLATE_NAME: &str = "Default Label Template";

/// Form contents of a single label.
///
/// Field names follow the label server's form names, hence the hyphenated
/// offsets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_name: Option<String>,
    #[serde(default)]
    pub main_text: String,
    #[serde(default)]
    pub midtext: String,
    #[serde(default)]
    pub subtext: String,
    #[serde(rename = "x-offset", default)]
    pub x_offset: i64,
    #[serde(rename = "y-offset", default)]
    pub y_offset: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_created: Option<String>,
}

impl LabelData {
    pub fn text(&self, field: TextField) -> &str {
        match field {
            TextField::MainText => &self.main_text,
            TextField::Midtext => &self.midtext,
            TextField::Subtext => &self.subtext,
        }
    }

    pub fn set_text(&mut self, field: TextField, value: impl Into<String>) {
        let value = value.into();
        match field {
            TextField::MainText => self.main_text = value,
            TextField::Midtext => self.midtext = value,
            TextField::Subtext => self.subtext = value,
        }
    }

    pub fn offset(&self, axis: Axis) -> i64 {
        match axis {
            Axis::X => self.x_offset,
            Axis::Y => self.y_offset,
        }
    }

    pub fn set_offset(&mut self, axis: Axis, value: i64) {
        match axis {
            Axis::X => self.x_offset = value,
            Axis::Y => self.y_offset = value,
        }
    }

    pub fn template_or_default(&self) -> &str {
        self.template_name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(DEFAULT_TEMPLATE_NAME)
    }

    /// Texts and template only, as the server expects for a reprint.
    pub fn for_print(&self) -> LabelData {
        LabelData {
            template_name: Some(self.template_or_default().to_string()),
            main_text: self.main_text.clone(),
            midtext: self.midtext.clone(),
            subtext: self.subtext.clone(),
            ..LabelData::default()
        }
    }

    /// One-line summary used by the queue and console listings.
    pub fn summary(&self) -> String {
        let title = if self.main_text.is_empty() {
            "Untitled"
        } else {
            self.main_text.as_str()
        };
        match (self.midtext.is_empty(), self.subtext.is_empty()) {
            (true, true) => title.to_string(),
            (false, true) => format!("{title} ({})", self.midtext),
            (true, false) => format!("{title} - {}", self.subtext),
            (false, false) => format!("{title} ({}) - {}", self.midtext, self.subtext),
        }
    }
}

/// Free-text inputs of the editor form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextField {
    MainText,
    Midtext,
    Subtext,
}

impl TextField {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::MainText => "main_text",
            Self::Midtext => "midtext",
            Self::Subtext => "subtext",
        }
    }

    pub const fn default_label(&self) -> &'static str {
        match self {
            Self::MainText => "Main Text",
            Self::Midtext => "Cultivar",
            Self::Subtext => "Subtext",
        }
    }

    pub const fn all() -> &'static [TextField] {
        &[TextField::MainText, TextField::Midtext, TextField::Subtext]
    }
}

impl std::fmt::Display for TextField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TextField {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "main_text" | "main" | "maintext" => Ok(Self::MainText),
            "midtext" | "mid" | "cultivar" => Ok(Self::Midtext),
            "subtext" | "sub" => Ok(Self::Subtext),
            _ => Err(format!("unknown text field: {value}")),
        }
    }
}

/// Print offset axis. Each axis nudges by its own step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
}

impl Axis {
    pub const fn step(&self) -> i64 {
        match self {
            Self::X => 7,
            Self::Y => 1,
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::X => "x",
            Self::Y => "y",
        }
    }
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Axis {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "x" | "x-offset" => Ok(Self::X),
            "y" | "y-offset" => Ok(Self::Y),
            _ => Err(format!("unknown axis: {value}")),
        }
    }
}
