//! Cover-letter fields.
//!
//! NEEDS_GENERATION → GENERATING → FILLED_WITH_GENERATED | FILLED_WITH_FALLBACK
//!
//! One generation attempt per visit; every visit starts over from
//! NEEDS_GENERATION. Without a job context the attempt is skipped and the
//! field goes straight to the fallback.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::models::field::FieldDescriptor;
use crate::models::job::JobContext;
use crate::resolver::generator::{CoverLetterGenerator, GenerationError};
use crate::resolver::prompts::FALLBACK_COVER_LETTER_TEMPLATE;
use crate::store::AnswerStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CoverLetterState {
    NeedsGeneration,
    Generating,
    FilledWithGenerated,
    FilledWithFallback,
}

impl CoverLetterState {
    pub fn can_advance_to(self, next: CoverLetterState) -> bool {
        use CoverLetterState::*;
        matches!(
            (self, next),
            (NeedsGeneration, Generating)
                | (NeedsGeneration, FilledWithFallback)
                | (Generating, FilledWithGenerated)
                | (Generating, FilledWithFallback)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            CoverLetterState::FilledWithGenerated | CoverLetterState::FilledWithFallback
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CoverLetterOutcome {
    pub text: String,
    pub state: CoverLetterState,
}

fn advance(state: &mut CoverLetterState, next: CoverLetterState, label: &str) {
    debug_assert!(state.can_advance_to(next), "{state:?} -> {next:?}");
    debug!("Cover letter '{label}': {:?} -> {:?}", state, next);
    *state = next;
}

/// Runs one visit of a cover-letter field. Never fails: generation errors end
/// in FILLED_WITH_FALLBACK.
pub async fn fill_cover_letter(
    generator: &dyn CoverLetterGenerator,
    descriptor: &FieldDescriptor,
    store: &AnswerStore,
    job: Option<&JobContext>,
) -> CoverLetterOutcome {
    let label = descriptor.label.as_str();
    let mut state = CoverLetterState::NeedsGeneration;

    let attempt = match job {
        Some(job) => {
            advance(&mut state, CoverLetterState::Generating, label);
            info!("Generating cover letter for {}", job.headline());
            generator.generate(job, &applicant_name(store)).await
        }
        None => Err(GenerationError::MissingJobContext),
    };

    match attempt {
        Ok(text) => {
            advance(&mut state, CoverLetterState::FilledWithGenerated, label);
            CoverLetterOutcome { text, state }
        }
        Err(e) => {
            advance(&mut state, CoverLetterState::FilledWithFallback, label);
            let text = match store.get(label) {
                Some(stored) => {
                    warn!("Cover letter generation failed for '{label}' ({e}), reusing stored answer");
                    stored.to_string()
                }
                None if descriptor.kind.is_free_text() => {
                    warn!("Cover letter generation failed for '{label}' ({e}), using template letter");
                    fallback_cover_letter(job, store)
                }
                None => {
                    warn!("Cover letter generation failed for '{label}' ({e}), leaving it empty");
                    String::new()
                }
            };
            CoverLetterOutcome { text, state }
        }
    }
}

/// "First name Last name" from stored answers, or a neutral sign-off.
fn applicant_name(store: &AnswerStore) -> String {
    let name = [store.get("First name"), store.get("Last name")]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    if name.is_empty() {
        "The Applicant".to_string()
    } else {
        name
    }
}

fn fallback_cover_letter(job: Option<&JobContext>, store: &AnswerStore) -> String {
    let title = job.map(|j| j.title.as_str()).unwrap_or("the position");
    let company = job.map(|j| j.company.as_str()).unwrap_or("your company");
    FALLBACK_COVER_LETTER_TEMPLATE
        .replace("{title}", title)
        .replace("{company}", company)
        .replace("{applicant}", &applicant_name(store))
}
