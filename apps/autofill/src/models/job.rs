use serde::{Deserialize, Serialize};

/// The job posting a processing session is applying to.
/// Only used to bias generated content; the resolver never mutates it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobContext {
    pub id: String,
    pub title: String,
    pub company: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
}

impl JobContext {
    /// One-line summary used inside prompts.
    pub fn headline(&self) -> String {
        match self.location.as_deref().filter(|l| !l.trim().is_empty()) {
            Some(location) => format!("{} at {} ({location})", self.title, self.company),
            None => format!("{} at {}", self.title, self.company),
        }
    }
}
