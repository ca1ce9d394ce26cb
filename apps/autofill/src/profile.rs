//! Applicant profile: the CV text generation is grounded on.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::{info, warn};

/// Upper bound on CV characters sent with each prompt.
const MAX_PROMPT_CHARS: usize = 6000;

#[derive(Debug, Clone, Default)]
pub struct ApplicantProfile {
    cv_text: String,
}

impl ApplicantProfile {
    pub fn new(cv_text: impl Into<String>) -> Self {
        Self {
            cv_text: cv_text.into(),
        }
    }

    /// Reads the CV at `path` (`.pdf` or plain text). Never fails: an absent or
    /// unreadable CV leaves the profile empty and generation runs without it.
    pub fn load(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            warn!("CV_PATH not set, generating answers without an applicant profile");
            return Self::default();
        };
        match read_cv(path) {
            Ok(cv_text) => {
                info!("Loaded CV from {} ({} chars)", path.display(), cv_text.chars().count());
                Self { cv_text }
            }
            Err(e) => {
                warn!("Failed to read CV: {e:#}");
                Self::default()
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.cv_text.trim().is_empty()
    }

    /// CV text trimmed to the prompt budget.
    pub fn prompt_excerpt(&self) -> String {
        if self.is_empty() {
            return "(no CV provided)".to_string();
        }
        self.cv_text.trim().chars().take(MAX_PROMPT_CHARS).collect()
    }
}

fn read_cv(path: &Path) -> Result<String> {
    let is_pdf = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));

    let text = if is_pdf {
        pdf_extract::extract_text(path)
            .with_context(|| format!("Failed to extract text from {}", path.display()))?
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?
    };
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_path_yields_empty_profile() {
        let profile = ApplicantProfile::load(None);
        assert!(profile.is_empty());
        assert_eq!(profile.prompt_excerpt(), "(no CV provided)");
    }

    #[test]
    fn test_unreadable_file_yields_empty_profile() {
        let dir = tempfile::tempdir().unwrap();
        let profile = ApplicantProfile::load(Some(&dir.path().join("missing.txt")));
        assert!(profile.is_empty());
    }

    #[test]
    fn test_text_cv_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cv.txt");
        std::fs::write(&path, "Data Scientist. Python, PyTorch.\n").unwrap();
        let profile = ApplicantProfile::load(Some(&path));
        assert_eq!(profile.prompt_excerpt(), "Data Scientist. Python, PyTorch.");
    }

    #[test]
    fn test_excerpt_is_bounded() {
        let profile = ApplicantProfile::new("x".repeat(MAX_PROMPT_CHARS + 500));
        assert_eq!(profile.prompt_excerpt().chars().count(), MAX_PROMPT_CHARS);
    }
}
