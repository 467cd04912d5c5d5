use std::collections::BTreeMap;

use crate::model::{Axis, LabelData, TemplateCatalog, TextField};

/// Everything the editor form shows. Mutations here are synchronous and
/// never touch the network.
#[derive(Debug, Clone)]
pub struct EditorState {
    pub templates: TemplateCatalog,
    pub form: LabelData,
    pub field_labels: BTreeMap<TextField, String>,
    pub print_count: u32,
    pub preview_url: Option<String>,
}

impl Default for EditorState {
    fn default() -> Self {
        Self {
            templates: TemplateCatalog::new(),
            form: LabelData::default(),
            field_labels: default_field_labels(),
            print_count: 1,
            preview_url: None,
        }
    }
}

impl EditorState {
    pub fn field_label(&self, field: TextField) -> &str {
        self.field_labels
            .get(&field)
            .map(String::as_str)
            .unwrap_or(field.default_label())
    }

    /// Pick the template to select after a catalog load: `preferred` when the
    /// catalog has it, otherwise the first entry.
    pub fn initial_template(&self, preferred: Option<&str>) -> Option<String> {
        preferred
            .filter(|name| self.templates.contains_key(*name))
            .map(str::to_string)
            .or_else(|| self.templates.keys().next().cloned())
    }

    /// Select `name` and relabel the text inputs from its fields. Returns
    /// false, leaving the state untouched, for unknown templates.
    pub fn apply_template(&mut self, name: &str) -> bool {
        let Some(template) = self.templates.get(name) else {
            return false;
        };
        let mut labels = default_field_labels();
        labels.extend(template.text_field_labels());
        self.field_labels = labels;
        self.form.template_name = Some(name.to_string());
        true
    }

    /// Reset the form offsets to the selected template's own defaults.
    pub fn apply_template_offsets(&mut self) {
        let offsets = self
            .form
            .template_name
            .as_deref()
            .and_then(|name| self.templates.get(name))
            .map(|template| template.offsets);
        if let Some([x, y]) = offsets {
            self.form.x_offset = x;
            self.form.y_offset = y;
        }
    }

    /// Move `axis` by one step in `direction` (negative moves back). Saturates
    /// at the `i64` bounds.
    pub fn nudge_offset(&mut self, axis: Axis, direction: i64) -> i64 {
        let next = self
            .form
            .offset(axis)
            .saturating_add(axis.step().saturating_mul(direction));
        self.form.set_offset(axis, next);
        next
    }

    /// Wheel up (negative delta) increases the offset, wheel down decreases.
    pub fn scroll_offset(&mut self, axis: Axis, delta_y: f64) -> i64 {
        let direction = if delta_y < 0.0 { 1 } else { -1 };
        self.nudge_offset(axis, direction)
    }

    /// Replace texts and, when given, the template with `label`. Offsets are
    /// kept: saved labels don't carry the printer calibration.
    pub fn load(&mut self, label: &LabelData) {
        for field in TextField::all() {
            self.form.set_text(*field, label.text(*field));
        }
        if let Some(name) = label.template_name.as_deref() {
            if !self.apply_template(name) {
                self.form.template_name = Some(name.to_string());
            }
        }
    }

    pub fn consume_one_print(&mut self) {
        self.print_count = self.print_count.saturating_sub(1);
    }
}

fn default_field_labels() -> BTreeMap<TextField, String> {
    TextField::all()
        .iter()
        .map(|field| (*field, field.default_label().to_string()))
        .collect()
}
