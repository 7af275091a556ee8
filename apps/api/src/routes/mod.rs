pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::skills::handlers;
use crate::state::AppState;

/// Largest accepted upload body; the match endpoint carries two PDFs.
const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health::root_handler))
        .route("/health", get(health::health_handler))
        // Skill extraction
        .route("/extract-skills", post(handlers::handle_extract_skills))
        .route(
            "/extract-skills/required",
            post(handlers::handle_extract_required),
        )
        .route(
            "/extract-skills/candidate",
            post(handlers::handle_extract_candidate),
        )
        // Matching
        .route("/match-skills", post(handlers::handle_match_skills))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(state)
}
