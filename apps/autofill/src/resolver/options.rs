//! Maps a generated answer onto a concrete fillable value.

use crate::models::field::{FieldDescriptor, FieldKind};
use crate::resolver::generator::GeneratedAnswer;

/// Finds the option matching `needle`: exact (case-insensitive) first, then an
/// option containing it as a whole word, then any option containing it.
/// "No" therefore beats "Not sure" for `no`.
pub fn find_option<'a>(options: &'a [String], needle: &str) -> Option<&'a str> {
    let needle = needle.trim().to_lowercase();
    if needle.is_empty() {
        return None;
    }
    let lowered: Vec<String> = options.iter().map(|o| o.to_lowercase()).collect();

    let exact = lowered.iter().position(|o| o.trim() == needle);
    let word = || {
        lowered.iter().position(|o| {
            o.split(|c: char| !c.is_alphanumeric())
                .any(|w| w == needle)
        })
    };
    let substring = || lowered.iter().position(|o| o.contains(&needle));

    exact
        .or_else(word)
        .or_else(substring)
        .map(|i| options[i].as_str())
}

/// Turns a generator result into a value, or `None` when it cannot be used
/// for this field (empty text, or text matching none of the options).
pub fn map_generated(answer: &GeneratedAnswer, descriptor: &FieldDescriptor) -> Option<String> {
    match answer {
        GeneratedAnswer::Boolean(flag) => Some(map_boolean(*flag, &descriptor.options)),
        GeneratedAnswer::Text(text) => map_text(text, descriptor),
    }
}

/// Matching option by text first; otherwise by position
/// (false → option 0, true → option 1).
fn map_boolean(flag: bool, options: &[String]) -> String {
    let canonical = yes_no(flag);
    if options.len() < 2 {
        return canonical.to_string();
    }
    if let Some(option) = find_option(options, canonical) {
        return option.to_string();
    }
    let position = usize::from(flag);
    options[position].clone()
}

fn map_text(text: &str, descriptor: &FieldDescriptor) -> Option<String> {
    let cleaned = clean(text);
    if cleaned.is_empty() {
        return None;
    }
    let options = &descriptor.options;
    let polarity = parse_yes_no(cleaned);

    if options.is_empty() {
        return match (descriptor.kind, polarity) {
            (FieldKind::Checkbox, Some(flag)) => Some(yes_no(flag).to_string()),
            _ => Some(cleaned.to_string()),
        };
    }

    if options.len() == 2 {
        if let Some(flag) = polarity {
            if let Some(option) = find_option(options, yes_no(flag)) {
                return Some(option.to_string());
            }
        }
    }

    if let Some(option) = option_by_index(cleaned, options) {
        return Some(option.to_string());
    }

    option_by_text(cleaned, options).map(str::to_string)
}

/// `"2"` with three options → the second option.
fn option_by_index<'a>(text: &str, options: &'a [String]) -> Option<&'a str> {
    if text.is_empty() || !text.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let index: usize = text.parse().ok()?;
    if (1..=options.len()).contains(&index) {
        Some(options[index - 1].as_str())
    } else {
        None
    }
}

fn option_by_text<'a>(text: &str, options: &'a [String]) -> Option<&'a str> {
    let wanted = text.to_lowercase();
    options
        .iter()
        .find(|o| o.to_lowercase() == wanted)
        .or_else(|| {
            options.iter().find(|o| {
                let o = o.to_lowercase();
                o.contains(&wanted) || wanted.contains(&o)
            })
        })
        .map(String::as_str)
}

fn parse_yes_no(text: &str) -> Option<bool> {
    match text.to_lowercase().as_str() {
        "yes" => Some(true),
        "no" => Some(false),
        _ => None,
    }
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "Yes"
    } else {
        "No"
    }
}

/// Drops surrounding whitespace and quotes, and trailing sentence punctuation.
fn clean(text: &str) -> &str {
    text.trim()
        .trim_matches(|c| c == '"' || c == '\'')
        .trim_end_matches(['.', '!'])
        .trim()
}
