//! Field Classifier: assigns a semantic label, a type tag and clean options
//! to a single form field snapshot. Pure and infallible.

pub mod handlers;
pub mod label;
pub mod options;

use crate::models::field::{FieldDescriptor, FieldKind, FieldSnapshot};

use self::label::derive_label;
use self::options::normalize_options;

const COVER_LETTER_MARKER: &str = "cover letter";

/// Classifies a snapshot into a `FieldDescriptor`.
pub fn classify(snapshot: &FieldSnapshot) -> FieldDescriptor {
    let kind = classify_kind(snapshot);
    FieldDescriptor {
        label: derive_label(snapshot, kind),
        kind,
        options: normalize_options(&snapshot.options, kind),
    }
}

/// Maps tag / `type` / `role` to a type tag. Unknown inputs are treated as text.
pub fn classify_kind(snapshot: &FieldSnapshot) -> FieldKind {
    let attr = |value: &Option<String>| value.as_deref().map(|v| v.trim().to_ascii_lowercase());
    let type_attr = attr(&snapshot.type_attr);
    let role = attr(&snapshot.role);

    match snapshot.tag.trim().to_ascii_lowercase().as_str() {
        "textarea" => return FieldKind::Textarea,
        "select" => return FieldKind::Select,
        _ => {}
    }

    let is = |expected: &str| {
        type_attr.as_deref() == Some(expected) || role.as_deref() == Some(expected)
    };
    if is("radio") {
        FieldKind::Radio
    } else if is("checkbox") {
        FieldKind::Checkbox
    } else {
        FieldKind::Text
    }
}

/// A field expecting a generated cover letter.
pub fn is_cover_letter_field(label: &str) -> bool {
    label.to_lowercase().contains(COVER_LETTER_MARKER)
}

/// Resume pickers are left on the site's default choice.
pub fn is_resume_selector(descriptor: &FieldDescriptor) -> bool {
    if !matches!(descriptor.kind, FieldKind::Radio | FieldKind::Select) {
        return false;
    }
    let label = descriptor.label.to_lowercase();
    label.contains("resume")
        || label
            .split(|c: char| !c.is_alphanumeric())
            .any(|word| word == "cv")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(tag: &str, type_attr: Option<&str>, role: Option<&str>) -> FieldSnapshot {
        FieldSnapshot {
            tag: tag.to_string(),
            type_attr: type_attr.map(str::to_string),
            role: role.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn test_classify_kind_by_tag() {
        assert_eq!(classify_kind(&snapshot("TEXTAREA", None, None)), FieldKind::Textarea);
        assert_eq!(classify_kind(&snapshot("select", None, None)), FieldKind::Select);
    }

    #[test]
    fn test_classify_kind_by_type_and_role() {
        assert_eq!(classify_kind(&snapshot("input", Some("radio"), None)), FieldKind::Radio);
        assert_eq!(classify_kind(&snapshot("div", None, Some("radio"))), FieldKind::Radio);
        assert_eq!(
            classify_kind(&snapshot("input", Some("checkbox"), None)),
            FieldKind::Checkbox
        );
        assert_eq!(classify_kind(&snapshot("div", None, Some("checkbox"))), FieldKind::Checkbox);
    }

    #[test]
    fn test_unknown_input_is_text() {
        assert_eq!(classify_kind(&snapshot("input", Some("email"), None)), FieldKind::Text);
        assert_eq!(classify_kind(&snapshot("input", None, None)), FieldKind::Text);
    }

    #[test]
    fn test_classify_builds_full_descriptor() {
        let mut s = snapshot("select", None, None);
        s.bound_label = Some("English proficiency".to_string());
        s.options = vec!["Select an option".to_string(), "Native".to_string()];
        let descriptor = classify(&s);
        assert_eq!(descriptor.label, "English proficiency");
        assert_eq!(descriptor.kind, FieldKind::Select);
        assert_eq!(descriptor.options, vec!["Native".to_string()]);
    }

    #[test]
    fn test_unlabeled_snapshot_never_fails() {
        let descriptor = classify(&snapshot("input", Some("radio"), None));
        assert_eq!(descriptor.label, "Unlabeled radio");
    }

    #[test]
    fn test_cover_letter_detection_is_case_insensitive() {
        assert!(is_cover_letter_field("Cover Letter"));
        assert!(is_cover_letter_field("Please paste your cover letter here"));
        assert!(!is_cover_letter_field("Letter of recommendation"));
    }

    #[test]
    fn test_resume_selector_only_for_choice_fields() {
        let radio = FieldDescriptor::new("Choose a resume", FieldKind::Radio);
        assert!(is_resume_selector(&radio));
        let cv = FieldDescriptor::new("Upload CV", FieldKind::Select);
        assert!(is_resume_selector(&cv));
        let text = FieldDescriptor::new("Resume headline", FieldKind::Text);
        assert!(!is_resume_selector(&text));
        let unrelated = FieldDescriptor::new("Are you a CVS employee?", FieldKind::Radio);
        assert!(!is_resume_selector(&unrelated));
    }
}
