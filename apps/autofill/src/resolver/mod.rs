//! Answer Resolver: turns a classified field into a value to fill.
//!
//! Precedence, evaluated in this order for every field:
//! 1. `answer` rules from the rule table (never persisted, recomputed per visit)
//! 2. cover-letter fields: always regenerated while a job context exists
//! 3. stored answers (exact, then case-insensitive label match)
//! 4. generation, mapped onto the field's options
//! 5. degradation: `prefer_option` rules → first option → generic sentence → "Yes"
//!
//! Only successful generations are written back to the store.

pub mod cover_letter;
pub mod generator;
pub mod options;
pub mod prompts;
pub mod rules;

use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use crate::classifier::is_cover_letter_field;
use crate::models::field::FieldDescriptor;
use crate::models::job::JobContext;
use crate::session::Session;
use crate::store::AnswerStore;

use self::cover_letter::{fill_cover_letter, CoverLetterState};
use self::generator::{AnswerGenerator, CoverLetterGenerator};
use self::options::{find_option, map_generated};
use self::rules::RuleTable;

/// Default for free-text fields when generation fails.
pub const GENERIC_AFFIRMATIVE: &str =
    "Yes, I meet this requirement and would be happy to discuss it further.";
pub const ABSOLUTE_FALLBACK: &str = "Yes";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerSource {
    Stored,
    Rule,
    Generated,
    CoverLetter,
    CoverLetterFallback,
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Resolution {
    pub value: String,
    pub source: AnswerSource,
    /// True when this resolution wrote a new answer into the store.
    pub persisted: bool,
}

impl Resolution {
    fn new(value: impl Into<String>, source: AnswerSource) -> Self {
        Self {
            value: value.into(),
            source,
            persisted: false,
        }
    }
}

pub struct AnswerResolver {
    rules: Arc<RuleTable>,
    answers: Arc<dyn AnswerGenerator>,
    cover_letters: Arc<dyn CoverLetterGenerator>,
}

impl AnswerResolver {
    pub fn new(
        rules: Arc<RuleTable>,
        answers: Arc<dyn AnswerGenerator>,
        cover_letters: Arc<dyn CoverLetterGenerator>,
    ) -> Self {
        Self {
            rules,
            answers,
            cover_letters,
        }
    }

    /// Always returns something fillable. The store is mutated in memory only;
    /// flushing is the caller's job.
    pub async fn resolve(
        &self,
        descriptor: &FieldDescriptor,
        store: &mut AnswerStore,
        session: &mut Session,
    ) -> Resolution {
        let label = descriptor.label.as_str();

        if let Some((rule, value)) = self.rules.fixed_answer(label) {
            match fit_to_options(value, descriptor) {
                Some(value) => {
                    info!("Answered '{label}' with rule '{}'", rule.name);
                    return Resolution::new(value, AnswerSource::Rule);
                }
                None => warn!(
                    "Rule '{}' value '{value}' matches no option of '{label}', skipping it",
                    rule.name
                ),
            }
        }

        if is_cover_letter_field(label) {
            return self.resolve_cover_letter(descriptor, store, session).await;
        }

        if let Some(stored) = store.get(label) {
            info!("Found stored answer for '{label}'");
            return Resolution::new(stored, AnswerSource::Stored);
        }

        self.generate(descriptor, store, session.job.as_ref()).await
    }

    async fn resolve_cover_letter(
        &self,
        descriptor: &FieldDescriptor,
        store: &mut AnswerStore,
        session: &mut Session,
    ) -> Resolution {
        let outcome = fill_cover_letter(
            self.cover_letters.as_ref(),
            descriptor,
            store,
            session.job.as_ref(),
        )
        .await;
        session.cover_letter_state = Some(outcome.state);

        if outcome.state == CoverLetterState::FilledWithGenerated {
            session.used_cover = true;
            store.insert(descriptor.label.clone(), outcome.text.clone());
            return Resolution {
                value: outcome.text,
                source: AnswerSource::CoverLetter,
                persisted: true,
            };
        }
        Resolution::new(outcome.text, AnswerSource::CoverLetterFallback)
    }

    async fn generate(
        &self,
        descriptor: &FieldDescriptor,
        store: &mut AnswerStore,
        job: Option<&JobContext>,
    ) -> Resolution {
        let label = descriptor.label.as_str();
        let mapped = match self.answers.generate(descriptor, job).await {
            Ok(answer) => {
                let mapped = map_generated(&answer, descriptor);
                if mapped.is_none() {
                    warn!("Generated answer {answer:?} for '{label}' is not usable");
                }
                mapped
            }
            Err(e) => {
                warn!("Answer generation failed for '{label}': {e}");
                None
            }
        };

        match mapped {
            Some(value) => {
                info!("Generated answer for '{label}'");
                store.insert(label, value.clone());
                Resolution {
                    value,
                    source: AnswerSource::Generated,
                    persisted: true,
                }
            }
            None => self.degrade(descriptor),
        }
    }

    fn degrade(&self, descriptor: &FieldDescriptor) -> Resolution {
        let label = descriptor.label.as_str();
        let value = if let Some((rule, option)) =
            self.rules.preferred_option(label, &descriptor.options)
        {
            warn!("Falling back to '{option}' for '{label}' (rule '{}')", rule.name);
            option.to_string()
        } else if let Some(first) = descriptor.options.first() {
            warn!("Falling back to first option '{first}' for '{label}'");
            first.clone()
        } else if descriptor.kind.is_free_text() {
            warn!("Falling back to generic answer for '{label}'");
            GENERIC_AFFIRMATIVE.to_string()
        } else {
            warn!("Falling back to '{ABSOLUTE_FALLBACK}' for '{label}'");
            ABSOLUTE_FALLBACK.to_string()
        };
        Resolution::new(value, AnswerSource::Fallback)
    }
}

/// A rule value as-is for free fields; on option fields only an option whose
/// text matches it. Rule values are never read as option indexes.
fn fit_to_options<'a>(value: &'a str, descriptor: &'a FieldDescriptor) -> Option<&'a str> {
    if descriptor.options.is_empty() {
        Some(value)
    } else {
        find_option(&descriptor.options, value)
    }
}


#[cfg(test)]
mod tests {
    use super::generator::GeneratedAnswer;
    use super::testing::{ScriptedAnswers, ScriptedLetters};
    use super::*;
    use crate::models::field::FieldKind;

    fn resolver(answers: Arc<ScriptedAnswers>, letters: Arc<ScriptedLetters>) -> AnswerResolver {
        AnswerResolver::new(Arc::new(RuleTable::default()), answers, letters)
    }

    fn job() -> JobContext {
        JobContext {
            id: "3900000001".to_string(),
            title: "ML Engineer".to_string(),
            company: "Acme".to_string(),
            description: None,
            location: None,
        }
    }

    #[tokio::test]
    async fn test_stored_answer_returned_unchanged() {
        let answers = Arc::new(ScriptedAnswers::text("should not be used"));
        let r = resolver(answers.clone(), Arc::new(ScriptedLetters::failing()));
        let mut store = AnswerStore::from_answers([("Mobile phone number", "+30 600")]);
        let mut session = Session::new(None);

        let descriptor = FieldDescriptor::new("mobile phone NUMBER", FieldKind::Text);
        let resolution = r.resolve(&descriptor, &mut store, &mut session).await;

        assert_eq!(resolution.value, "+30 600");
        assert_eq!(resolution.source, AnswerSource::Stored);
        assert!(!resolution.persisted);
        assert_eq!(answers.calls(), 0);
    }

    #[tokio::test]
    async fn test_years_of_experience_ignores_store() {
        let r = resolver(
            Arc::new(ScriptedAnswers::text("10")),
            Arc::new(ScriptedLetters::failing()),
        );
        let mut store = AnswerStore::from_answers([("Years of experience", "7")]);
        let mut session = Session::new(None);

        let descriptor = FieldDescriptor::new("Years of experience", FieldKind::Text);
        let resolution = r.resolve(&descriptor, &mut store, &mut session).await;

        assert_eq!(resolution.value, "2");
        assert_eq!(resolution.source, AnswerSource::Rule);
        assert_eq!(store.get("Years of experience"), Some("7"));
    }

    #[tokio::test]
    async fn test_salary_rule_skipped_on_yes_no_radio() {
        let answers = Arc::new(ScriptedAnswers::text("yes"));
        let r = resolver(answers.clone(), Arc::new(ScriptedLetters::failing()));
        let mut store = AnswerStore::in_memory();
        let mut session = Session::new(None);

        let descriptor = FieldDescriptor::new("Is the salary range acceptable?", FieldKind::Radio)
            .with_options(["Yes", "No"]);
        let resolution = r.resolve(&descriptor, &mut store, &mut session).await;

        assert_eq!(resolution.value, "Yes");
        assert_eq!(resolution.source, AnswerSource::Generated);
        assert_eq!(answers.calls(), 1);
    }

    #[tokio::test]
    async fn test_experience_rule_skipped_on_range_select() {
        let r = resolver(
            Arc::new(ScriptedAnswers::failing()),
            Arc::new(ScriptedLetters::failing()),
        );
        let mut store = AnswerStore::in_memory();
        let mut session = Session::new(None);

        let descriptor =
            FieldDescriptor::new("How many years of experience with Python?", FieldKind::Select)
                .with_options(["0-1", "3-5", "6+"]);
        let resolution = r.resolve(&descriptor, &mut store, &mut session).await;

        assert_ne!(resolution.source, AnswerSource::Rule);
        assert!(descriptor.options.contains(&resolution.value));
    }

    #[tokio::test]
    async fn test_rule_value_selects_matching_option() {
        let r = resolver(
            Arc::new(ScriptedAnswers::failing()),
            Arc::new(ScriptedLetters::failing()),
        );
        let mut store = AnswerStore::in_memory();
        let mut session = Session::new(None);

        let descriptor = FieldDescriptor::new("Years of experience", FieldKind::Select)
            .with_options(["1", "2", "3"]);
        let resolution = r.resolve(&descriptor, &mut store, &mut session).await;

        assert_eq!(resolution.value, "2");
        assert_eq!(resolution.source, AnswerSource::Rule);
    }

    #[tokio::test]
    async fn test_expected_salary() {
        let r = resolver(
            Arc::new(ScriptedAnswers::failing()),
            Arc::new(ScriptedLetters::failing()),
        );
        let mut store = AnswerStore::in_memory();
        let mut session = Session::new(None);
        let descriptor = FieldDescriptor::new("Expected salary", FieldKind::Text);
        assert_eq!(r.resolve(&descriptor, &mut store, &mut session).await.value, "30000");
        assert!(!store.is_dirty());
    }

    #[tokio::test]
    async fn test_cover_letter_regenerated_despite_stored_value() {
        let letters = Arc::new(ScriptedLetters::ok("Fresh letter"));
        let r = resolver(Arc::new(ScriptedAnswers::failing()), letters.clone());
        let mut store = AnswerStore::from_answers([("Cover letter", "Stale letter")]);
        let mut session = Session::new(Some(job()));

        let descriptor = FieldDescriptor::new("Cover letter", FieldKind::Textarea);
        let resolution = r.resolve(&descriptor, &mut store, &mut session).await;

        assert_eq!(letters.calls(), 1);
        assert_eq!(resolution.value, "Fresh letter");
        assert_eq!(resolution.source, AnswerSource::CoverLetter);
        assert!(resolution.persisted);
        assert!(session.used_cover);
        assert_eq!(session.cover_letter_state, Some(CoverLetterState::FilledWithGenerated));
        assert_eq!(store.get("Cover letter"), Some("Fresh letter"));
    }

    #[tokio::test]
    async fn test_cover_letter_failure_falls_back_without_persisting() {
        let r = resolver(
            Arc::new(ScriptedAnswers::failing()),
            Arc::new(ScriptedLetters::failing()),
        );
        let mut store = AnswerStore::from_answers([("Cover letter", "Stale letter")]);
        let mut session = Session::new(Some(job()));

        let descriptor = FieldDescriptor::new("Cover letter", FieldKind::Textarea);
        let resolution = r.resolve(&descriptor, &mut store, &mut session).await;

        assert_eq!(resolution.value, "Stale letter");
        assert_eq!(resolution.source, AnswerSource::CoverLetterFallback);
        assert!(!session.used_cover);
        assert!(!store.is_dirty());
    }

    #[tokio::test]
    async fn test_cover_letter_without_job_skips_generation() {
        let letters = Arc::new(ScriptedLetters::ok("never"));
        let r = resolver(Arc::new(ScriptedAnswers::failing()), letters.clone());
        let mut store = AnswerStore::in_memory();
        let mut session = Session::new(None);

        let descriptor = FieldDescriptor::new("Cover Letter", FieldKind::Textarea);
        let resolution = r.resolve(&descriptor, &mut store, &mut session).await;

        assert_eq!(letters.calls(), 0);
        assert!(resolution.value.starts_with("Dear Hiring Manager,"));
        assert_eq!(session.cover_letter_state, Some(CoverLetterState::FilledWithFallback));
    }

    #[tokio::test]
    async fn test_generated_no_maps_to_option_and_persists() {
        let r = resolver(
            Arc::new(ScriptedAnswers::text("no")),
            Arc::new(ScriptedLetters::failing()),
        );
        let mut store = AnswerStore::in_memory();
        let mut session = Session::new(None);

        let descriptor = FieldDescriptor::new("Do you have a driving licence?", FieldKind::Radio)
            .with_options(["Yes", "No"]);
        let resolution = r.resolve(&descriptor, &mut store, &mut session).await;

        assert_eq!(resolution.value, "No");
        assert_eq!(resolution.source, AnswerSource::Generated);
        assert!(resolution.persisted);
        assert_eq!(store.get("Do you have a driving licence?"), Some("No"));
    }

    #[tokio::test]
    async fn test_numeric_answer_selects_option() {
        let r = resolver(
            Arc::new(ScriptedAnswers::text("2")),
            Arc::new(ScriptedLetters::failing()),
        );
        let mut store = AnswerStore::in_memory();
        let mut session = Session::new(None);

        let descriptor = FieldDescriptor::new("Pick one", FieldKind::Select)
            .with_options(["Option A", "Option B", "Option C"]);
        assert_eq!(
            r.resolve(&descriptor, &mut store, &mut session).await.value,
            "Option B"
        );
    }

    #[tokio::test]
    async fn test_boolean_sentinel_selects_by_position() {
        let r = resolver(
            Arc::new(ScriptedAnswers::with(Some(GeneratedAnswer::Boolean(true)))),
            Arc::new(ScriptedLetters::failing()),
        );
        let mut store = AnswerStore::in_memory();
        let mut session = Session::new(None);

        let descriptor = FieldDescriptor::new("Agree to terms", FieldKind::Radio)
            .with_options(["Disagree", "Agree"]);
        assert_eq!(
            r.resolve(&descriptor, &mut store, &mut session).await.value,
            "Agree"
        );
    }

    #[tokio::test]
    async fn test_relocation_without_output_prefers_yes() {
        let r = resolver(
            Arc::new(ScriptedAnswers::text("")),
            Arc::new(ScriptedLetters::failing()),
        );
        let mut store = AnswerStore::in_memory();
        let mut session = Session::new(None);

        let descriptor = FieldDescriptor::new("Are you willing to relocate?", FieldKind::Radio)
            .with_options(["Yes", "No"]);
        let resolution = r.resolve(&descriptor, &mut store, &mut session).await;

        assert_eq!(resolution.value, "Yes");
        assert_eq!(resolution.source, AnswerSource::Fallback);
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_sponsorship_failure_prefers_no() {
        let r = resolver(
            Arc::new(ScriptedAnswers::failing()),
            Arc::new(ScriptedLetters::failing()),
        );
        let mut store = AnswerStore::in_memory();
        let mut session = Session::new(None);

        let descriptor = FieldDescriptor::new("Will you require visa sponsorship?", FieldKind::Radio)
            .with_options(["Yes", "No"]);
        assert_eq!(r.resolve(&descriptor, &mut store, &mut session).await.value, "No");
    }

    #[tokio::test]
    async fn test_unmatched_answer_defaults_to_first_option() {
        let r = resolver(
            Arc::new(ScriptedAnswers::text("Fluent")),
            Arc::new(ScriptedLetters::failing()),
        );
        let mut store = AnswerStore::in_memory();
        let mut session = Session::new(None);

        let descriptor = FieldDescriptor::new("English level", FieldKind::Select)
            .with_options(["Native", "Professional"]);
        let resolution = r.resolve(&descriptor, &mut store, &mut session).await;
        assert_eq!(resolution.value, "Native");
        assert!(!resolution.persisted);
    }

    #[tokio::test]
    async fn test_generator_error_on_text_field_uses_generic_sentence() {
        let r = resolver(
            Arc::new(ScriptedAnswers::failing()),
            Arc::new(ScriptedLetters::failing()),
        );
        let mut store = AnswerStore::in_memory();
        let mut session = Session::new(None);

        let descriptor = FieldDescriptor::new("Why do you want this job?", FieldKind::Textarea);
        let resolution = r.resolve(&descriptor, &mut store, &mut session).await;

        assert_eq!(resolution.value, GENERIC_AFFIRMATIVE);
        assert!(!resolution.persisted);
        assert!(store.is_empty());
        assert!(!store.is_dirty());
    }

    #[tokio::test]
    async fn test_checkbox_without_options_falls_back_to_yes() {
        let r = resolver(
            Arc::new(ScriptedAnswers::failing()),
            Arc::new(ScriptedLetters::failing()),
        );
        let mut store = AnswerStore::in_memory();
        let mut session = Session::new(None);

        let descriptor = FieldDescriptor::new("I agree to the privacy policy", FieldKind::Checkbox);
        assert_eq!(
            r.resolve(&descriptor, &mut store, &mut session).await.value,
            ABSOLUTE_FALLBACK
        );
    }
}
