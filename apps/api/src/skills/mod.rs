// Skill extraction and matching.
// PDF text → prompt → completion (with retry) → SkillList → MatchResult.
// All LLM calls go through llm_client — no direct provider calls here.

pub mod extractor;
pub mod handlers;
pub mod matcher;
pub mod models;
pub mod pdf;
pub mod prompts;

use thiserror::Error;

use crate::llm_client::retry::RetryError;
use crate::llm_client::LlmError;

/// Failures of the extraction pipeline. None of them are retried past this point.
#[derive(Debug, Error)]
pub enum SkillError {
    #[error("No text extracted from the PDF")]
    EmptyDocument,

    #[error("Exceeded {attempts} attempts due to rate limiting")]
    RetryExhausted { attempts: u32 },

    #[error("Completion provider error: {0}")]
    Provider(LlmError),

    #[error("Failed to read PDF: {0}")]
    Extraction(String),

    #[error("Extraction cancelled")]
    Cancelled,
}

impl From<RetryError<LlmError>> for SkillError {
    fn from(err: RetryError<LlmError>) -> Self {
        match err {
            RetryError::Exhausted { attempts } => SkillError::RetryExhausted { attempts },
            RetryError::Cancelled { .. } => SkillError::Cancelled,
            RetryError::Fatal(e) => SkillError::Provider(e),
        }
    }
}
