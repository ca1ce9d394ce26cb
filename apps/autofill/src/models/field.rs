use serde::{Deserialize, Serialize};

/// Type tag assigned to a form field by the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Text,
    Textarea,
    Checkbox,
    Radio,
    Select,
}

impl FieldKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKind::Text => "text",
            FieldKind::Textarea => "textarea",
            FieldKind::Checkbox => "checkbox",
            FieldKind::Radio => "radio",
            FieldKind::Select => "select",
        }
    }

    /// Text inputs and textareas accept arbitrary prose.
    pub fn is_free_text(&self) -> bool {
        matches!(self, FieldKind::Text | FieldKind::Textarea)
    }
}

/// A classified field: semantic label, type tag and the ordered option texts.
/// Built per field, discarded once the field has been answered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub label: String,
    #[serde(rename = "type")]
    pub kind: FieldKind,
    #[serde(default)]
    pub options: Vec<String>,
}

impl FieldDescriptor {
    pub fn new(label: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            label: label.into(),
            kind,
            options: Vec::new(),
        }
    }

    pub fn with_options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = options.into_iter().map(Into::into).collect();
        self
    }
}

/// Raw DOM evidence the form driver extracts for a single field.
///
/// Every probe is optional; the driver fills in whatever it could read and
/// the classifier decides which one wins.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldSnapshot {
    /// Lower-case tag name: `input`, `textarea`, `select`, `div`, ...
    pub tag: String,
    #[serde(rename = "type")]
    pub type_attr: Option<String>,
    pub role: Option<String>,
    pub name: Option<String>,
    pub value: Option<String>,
    /// Text of `label[for=<id>]`, resolved by the driver.
    pub bound_label: Option<String>,
    /// Text of the first labelling element under the field's parent.
    pub parent_label: Option<String>,
    /// Text of the enclosing fieldset's legend.
    pub legend: Option<String>,
    /// Texts of spans nested inside that legend, in document order.
    pub legend_spans: Vec<String>,
    /// Heading text of the nearest form-component container.
    pub group_heading: Option<String>,
    /// Id of the nearest form-element container div.
    pub container_id: Option<String>,
    /// Raw option texts (select options, radio labels, checkbox labels).
    pub options: Vec<String>,
}
