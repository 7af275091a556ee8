//! Skill Extractor — turns document text into a `SkillList` via the completion provider.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::llm_client::retry::{execute_with_retry, RetryPolicy};
use crate::llm_client::CompletionProvider;
use crate::skills::models::{SkillList, SkillRole};
use crate::skills::prompts::SKILL_EXTRACTION_PROMPT_TEMPLATE;
use crate::skills::SkillError;

/// Builds the extraction prompt for `document_text`.
pub fn build_prompt(document_text: &str, role: SkillRole) -> String {
    SKILL_EXTRACTION_PROMPT_TEMPLATE
        .replace("{document_noun}", role.document_noun())
        .replace("{document_text}", document_text)
}

/// Stateless apart from its injected provider; clone freely across requests.
#[derive(Clone)]
pub struct SkillExtractor {
    provider: Arc<dyn CompletionProvider>,
    retry: RetryPolicy,
}

impl SkillExtractor {
    pub fn new(provider: Arc<dyn CompletionProvider>) -> Self {
        Self::with_retry_policy(provider, RetryPolicy::default())
    }

    pub fn with_retry_policy(provider: Arc<dyn CompletionProvider>, retry: RetryPolicy) -> Self {
        Self { provider, retry }
    }

    /// Extracts up to five skills from `document_text`.
    ///
    /// Fails with `EmptyDocument` before any provider call if the text is blank.
    #[allow(dead_code)]
    pub async fn extract_skills(
        &self,
        document_text: &str,
        role: SkillRole,
    ) -> Result<SkillList, SkillError> {
        self.run(document_text, role, None).await
    }

    /// Same as `extract_skills`, but a cancelled `token` aborts any pending backoff.
    pub async fn extract_skills_until(
        &self,
        document_text: &str,
        role: SkillRole,
        token: &CancellationToken,
    ) -> Result<SkillList, SkillError> {
        self.run(document_text, role, Some(token)).await
    }

    async fn run(
        &self,
        document_text: &str,
        role: SkillRole,
        token: Option<&CancellationToken>,
    ) -> Result<SkillList, SkillError> {
        let document_text = document_text.trim();
        if document_text.is_empty() {
            return Err(SkillError::EmptyDocument);
        }

        let prompt = build_prompt(document_text, role);
        let completion =
            execute_with_retry(self.retry, token, || self.provider.complete(&prompt)).await?;

        let skills = SkillList::from_completion(&completion);
        info!(role = ?role, count = skills.len(), "Extracted skills: {:?}", skills.as_slice());
        Ok(skills)
    }
}
