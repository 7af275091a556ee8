use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::config::Config;
use crate::skills::extractor::SkillExtractor;
use crate::skills::pdf::TextExtractor;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Wraps the single completion provider client created at startup.
    pub extractor: SkillExtractor,
    /// Pluggable text extractor. Default: PdfTextExtractor.
    pub text_extractor: Arc<dyn TextExtractor>,
    /// Cancelled on shutdown so requests stuck in a retry backoff return early.
    pub shutdown: CancellationToken,
}
