use crate::models::field::FieldKind;

/// Placeholder entry selects render before a choice is made.
const PLACEHOLDER_OPTION: &str = "Select an option";

/// Cleans raw option texts. Radio buttons keep their position even when the
/// label is empty (`Option <n>`), since the driver clicks by index.
pub fn normalize_options(raw: &[String], kind: FieldKind) -> Vec<String> {
    match kind {
        FieldKind::Radio => raw
            .iter()
            .enumerate()
            .map(|(i, text)| {
                let text = text.trim();
                if text.is_empty() {
                    format!("Option {}", i + 1)
                } else {
                    text.to_string()
                }
            })
            .collect(),
        _ => raw
            .iter()
            .map(|text| text.trim())
            .filter(|text| !text.is_empty() && *text != PLACEHOLDER_OPTION)
            .map(str::to_string)
            .collect(),
    }
}
