//! Generator seams: the text generator and the cover-letter generator.
//!
//! The resolver only sees the traits; `LlmAnswerGenerator` and
//! `LlmCoverLetterGenerator` are the production backends.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::llm_client::prompts::{FORM_READY_INSTRUCTION, JSON_ONLY_SYSTEM};
use crate::llm_client::{LlmClient, LlmError};
use crate::models::field::FieldDescriptor;
use crate::models::job::JobContext;
use crate::profile::ApplicantProfile;
use crate::resolver::prompts::{
    ANSWER_PROMPT_TEMPLATE, ANSWER_SYSTEM, COVER_LETTER_PROMPT_TEMPLATE, COVER_LETTER_SYSTEM,
};

/// Shortest text accepted as a cover letter.
pub const MIN_COVER_LETTER_CHARS: usize = 50;

/// What the text generator produced for one field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum GeneratedAnswer {
    Boolean(bool),
    Text(String),
}

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("LLM call failed: {0}")]
    Llm(#[from] LlmError),

    #[error("generator returned an empty answer")]
    Empty,

    #[error("no job context attached to the session")]
    MissingJobContext,

    #[error("generated cover letter too short ({len} chars)")]
    TooShort { len: usize },
}

#[async_trait]
pub trait AnswerGenerator: Send + Sync {
    async fn generate(
        &self,
        descriptor: &FieldDescriptor,
        job: Option<&JobContext>,
    ) -> Result<GeneratedAnswer, GenerationError>;
}

#[async_trait]
pub trait CoverLetterGenerator: Send + Sync {
    async fn generate(
        &self,
        job: &JobContext,
        applicant: &str,
    ) -> Result<String, GenerationError>;
}

// ────────────────────────────────────────────────────────────────────────────
// LLM-backed implementations
// ────────────────────────────────────────────────────────────────────────────

pub struct LlmAnswerGenerator {
    llm: LlmClient,
    profile: Arc<ApplicantProfile>,
}

impl LlmAnswerGenerator {
    pub fn new(llm: LlmClient, profile: Arc<ApplicantProfile>) -> Self {
        Self { llm, profile }
    }
}

#[async_trait]
impl AnswerGenerator for LlmAnswerGenerator {
    async fn generate(
        &self,
        descriptor: &FieldDescriptor,
        job: Option<&JobContext>,
    ) -> Result<GeneratedAnswer, GenerationError> {
        let prompt = build_answer_prompt(descriptor, job, &self.profile);
        let answer: GeneratedAnswer = self.llm.call_json(&prompt, ANSWER_SYSTEM).await?;
        debug!("Generated answer for '{}': {:?}", descriptor.label, answer);

        match &answer {
            GeneratedAnswer::Text(text) if text.trim().is_empty() => Err(GenerationError::Empty),
            _ => Ok(answer),
        }
    }
}

pub struct LlmCoverLetterGenerator {
    llm: LlmClient,
    profile: Arc<ApplicantProfile>,
}

impl LlmCoverLetterGenerator {
    pub fn new(llm: LlmClient, profile: Arc<ApplicantProfile>) -> Self {
        Self { llm, profile }
    }
}

#[async_trait]
impl CoverLetterGenerator for LlmCoverLetterGenerator {
    async fn generate(
        &self,
        job: &JobContext,
        applicant: &str,
    ) -> Result<String, GenerationError> {
        let prompt = build_cover_letter_prompt(job, applicant, &self.profile);
        let letter = self.llm.call_text(&prompt, COVER_LETTER_SYSTEM).await?;
        check_cover_letter(letter)
    }
}

fn check_cover_letter(letter: String) -> Result<String, GenerationError> {
    let len = letter.trim().chars().count();
    if len < MIN_COVER_LETTER_CHARS {
        return Err(GenerationError::TooShort { len });
    }
    Ok(letter.trim().to_string())
}

fn build_answer_prompt(
    descriptor: &FieldDescriptor,
    job: Option<&JobContext>,
    profile: &ApplicantProfile,
) -> String {
    let options = if descriptor.options.is_empty() {
        "(free answer)".to_string()
    } else {
        descriptor
            .options
            .iter()
            .enumerate()
            .map(|(i, option)| format!("{}. {option}", i + 1))
            .collect::<Vec<_>>()
            .join("\n")
    };
    let job = job
        .map(JobContext::headline)
        .unwrap_or_else(|| "(unknown)".to_string());

    ANSWER_PROMPT_TEMPLATE
        .replace("{json_only}", JSON_ONLY_SYSTEM)
        .replace("{form_ready}", FORM_READY_INSTRUCTION)
        .replace("{label}", &descriptor.label)
        .replace("{field_type}", descriptor.kind.as_str())
        .replace("{options}", &options)
        .replace("{job}", &job)
        .replace("{profile}", &profile.prompt_excerpt())
}

fn build_cover_letter_prompt(job: &JobContext, applicant: &str, profile: &ApplicantProfile) -> String {
    COVER_LETTER_PROMPT_TEMPLATE
        .replace("{form_ready}", FORM_READY_INSTRUCTION)
        .replace("{title}", &job.title)
        .replace("{company}", &job.company)
        .replace("{location}", job.location.as_deref().unwrap_or("not specified"))
        .replace("{description}", job.description.as_deref().unwrap_or("not provided"))
        .replace("{profile}", &profile.prompt_excerpt())
        .replace("{applicant}", applicant)
}
