//! Label probing: turns the driver's DOM evidence into a human-readable label.
//!
//! Probe order:
//! 1. `label[for=<id>]`
//! 2. a labelling element under the parent
//! 3. fieldset legend (radio / checkbox groups only)
//! 4. form-component heading
//! 5. the field's own `value` (radios) / `name`, then the container id
//! 6. `Unlabeled <type>`

use crate::models::field::{FieldKind, FieldSnapshot};

/// Marker the site puts in form-element container ids.
const FORM_ELEMENT_MARKER: &str = "formElement";

/// Returns the first non-empty probe, trimmed. Never fails.
pub fn derive_label(snapshot: &FieldSnapshot, kind: FieldKind) -> String {
    non_empty(snapshot.bound_label.as_deref())
        .or_else(|| non_empty(snapshot.parent_label.as_deref()))
        .or_else(|| legend_text(snapshot, kind))
        .or_else(|| non_empty(snapshot.group_heading.as_deref()))
        .or_else(|| declared_name(snapshot, kind))
        .unwrap_or_else(|| synthetic_label(snapshot))
}

fn non_empty(text: Option<&str>) -> Option<String> {
    text.map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}

/// Legend spans carry the visible question; the bare legend often repeats it
/// alongside screen-reader text, so spans win.
fn legend_text(snapshot: &FieldSnapshot, kind: FieldKind) -> Option<String> {
    if !matches!(kind, FieldKind::Radio | FieldKind::Checkbox) {
        return None;
    }
    snapshot
        .legend_spans
        .iter()
        .find_map(|span| non_empty(Some(span)))
        .or_else(|| non_empty(snapshot.legend.as_deref()))
}

fn declared_name(snapshot: &FieldSnapshot, kind: FieldKind) -> Option<String> {
    let own = if kind == FieldKind::Radio {
        non_empty(snapshot.value.as_deref())
    } else {
        non_empty(snapshot.name.as_deref())
    };
    own.or_else(|| container_label(snapshot.container_id.as_deref()?))
}

/// `...-formElement-...-phoneNumber` → `Phonenumber`
fn container_label(container_id: &str) -> Option<String> {
    if !container_id.contains(FORM_ELEMENT_MARKER) {
        return None;
    }
    let segment = container_id.rsplit('-').next()?;
    if segment.is_empty() || segment == container_id {
        return None;
    }
    Some(title_case(segment))
}

fn title_case(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                None => String::new(),
                Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn synthetic_label(snapshot: &FieldSnapshot) -> String {
    let field_type = snapshot
        .type_attr
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .unwrap_or("field");
    format!("Unlabeled {field_type}")
}
