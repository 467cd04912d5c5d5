//! Label domain types shared by the editor, queue, search, and backend client.

mod label;
mod template;
mod wire;

pub use label::{Axis, LabelData, TextField, DEFAULT_TEMPLATE_NAME};
pub use template::{FieldData, LabelField, LabelTemplate, TemplateCatalog, TextStyle};
pub use wire::{
    PreviewRequest, PreviewResponse, PrintRequest, PrintResponse, SaveRequest, SaveResponse,
    SearchRequest, SearchResult,
};
