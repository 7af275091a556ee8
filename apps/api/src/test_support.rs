//! Fakes shared by unit tests across modules.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::config::Config;
use crate::llm_client::retry::RetryPolicy;
use crate::llm_client::{CompletionProvider, LlmError};
use crate::skills::extractor::SkillExtractor;
use crate::skills::pdf::TextExtractor;
use crate::skills::SkillError;
use crate::state::AppState;

/// Replays scripted results in order and records every prompt it receives.
/// Once the script runs out every call reports `RateLimited`.
pub struct ScriptedProvider {
    results: Mutex<Vec<Result<String, LlmError>>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedProvider {
    pub fn new(mut results: Vec<Result<String, LlmError>>) -> Arc<Self> {
        results.reverse();
        Arc::new(Self {
            results: Mutex::new(results),
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn replying(texts: &[&str]) -> Arc<Self> {
        Self::new(texts.iter().map(|t| Ok(t.to_string())).collect())
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }
}

#[async_trait]
impl CompletionProvider for ScriptedProvider {
    async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.results
            .lock()
            .unwrap()
            .pop()
            .unwrap_or(Err(LlmError::RateLimited))
    }
}

/// Treats uploads as UTF-8 text; `CORRUPT` fails like an unreadable PDF.
pub struct Utf8TextExtractor;

impl TextExtractor for Utf8TextExtractor {
    fn extract_text(&self, bytes: &[u8]) -> Result<String, SkillError> {
        match std::str::from_utf8(bytes) {
            Ok("CORRUPT") | Err(_) => Err(SkillError::Extraction("unreadable".to_string())),
            Ok(text) => Ok(text.to_string()),
        }
    }
}

pub fn test_config() -> Config {
    Config {
        openai_api_key: "sk-test".to_string(),
        openai_base_url: "http://127.0.0.1:9/v1".to_string(),
        project_name: "Skill Match API".to_string(),
        port: 0,
        rust_log: "debug".to_string(),
    }
}

pub fn test_state(provider: Arc<ScriptedProvider>) -> AppState {
    AppState {
        config: test_config(),
        extractor: SkillExtractor::with_retry_policy(
            provider,
            RetryPolicy::new(3, Duration::from_millis(10)),
        ),
        text_extractor: Arc::new(Utf8TextExtractor),
        shutdown: CancellationToken::new(),
    }
}

pub const BOUNDARY: &str = "skillmatch-test-boundary";

/// Builds a multipart/form-data body from `(field, filename, content)` triples.
pub fn multipart_body(parts: &[(&str, &str, &str)]) -> String {
    let mut body = String::new();
    for (field, filename, content) in parts {
        body.push_str(&format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\nContent-Type: application/pdf\r\n\r\n{content}\r\n"
        ));
    }
    body.push_str(&format!("--{BOUNDARY}--\r\n"));
    body
}
