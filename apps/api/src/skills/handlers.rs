use std::sync::Arc;

use axum::{
    extract::{Multipart, State},
    Json,
};
use bytes::Bytes;
use serde::Serialize;
use tracing::info;

use crate::errors::AppError;
use crate::skills::matcher::match_skills;
use crate::skills::models::{MatchResult, SkillList, SkillRole};
use crate::skills::pdf::TextExtractor;
use crate::skills::SkillError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct TopSkillsResponse {
    pub top_skills: SkillList,
}

#[derive(Debug, Serialize)]
pub struct RequiredSkillsResponse {
    pub required_skills: SkillList,
}

#[derive(Debug, Serialize)]
pub struct CandidateSkillsResponse {
    pub candidate_skills: SkillList,
}

/// One uploaded file from a multipart form.
struct Upload {
    field: String,
    filename: String,
    bytes: Bytes,
}

/// Reads every file part of the form into memory.
async fn read_uploads(mut multipart: Multipart) -> Result<Vec<Upload>, AppError> {
    let mut uploads = Vec::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        let filename = field.file_name().unwrap_or_default().to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Invalid file '{name}': {e}")))?;
        uploads.push(Upload {
            field: name,
            filename,
            bytes,
        });
    }
    Ok(uploads)
}

/// Takes the named field out of `uploads`, rejecting anything not named `*.pdf`.
fn take_pdf(uploads: &mut Vec<Upload>, field: &str) -> Result<Bytes, AppError> {
    let index = uploads
        .iter()
        .position(|u| u.field == field)
        .ok_or_else(|| AppError::Validation(format!("Missing file field '{field}'")))?;
    let upload = uploads.swap_remove(index);

    if !is_pdf_filename(&upload.filename) {
        return Err(AppError::Validation(
            "Only PDF files are allowed".to_string(),
        ));
    }
    Ok(upload.bytes)
}

fn is_pdf_filename(filename: &str) -> bool {
    filename.to_ascii_lowercase().ends_with(".pdf")
}

/// Runs the CPU-bound text extraction off the async executor.
async fn extract_text_blocking(
    extractor: Arc<dyn TextExtractor>,
    bytes: Bytes,
) -> Result<String, AppError> {
    tokio::task::spawn_blocking(move || extractor.extract_text(&bytes))
        .await
        .map_err(|e| {
            if e.is_panic() {
                // pdf-extract panics on some malformed files
                AppError::from(SkillError::Extraction("PDF parser crashed".to_string()))
            } else {
                AppError::Internal(anyhow::anyhow!("spawn_blocking failed in text extraction: {e}"))
            }
        })?
        .map_err(AppError::from)
}

async fn extract_from_pdf(
    state: &AppState,
    pdf_bytes: Bytes,
    role: SkillRole,
) -> Result<SkillList, AppError> {
    let text = extract_text_blocking(state.text_extractor.clone(), pdf_bytes).await?;
    let skills = state
        .extractor
        .extract_skills_until(&text, role, &state.shutdown)
        .await?;
    Ok(skills)
}

/// Skills a job description asks for.
pub async fn extract_required_skills(
    state: &AppState,
    pdf_bytes: Bytes,
) -> Result<SkillList, AppError> {
    extract_from_pdf(state, pdf_bytes, SkillRole::Required).await
}

/// Skills a resume offers.
pub async fn extract_candidate_skills(
    state: &AppState,
    pdf_bytes: Bytes,
) -> Result<SkillList, AppError> {
    extract_from_pdf(state, pdf_bytes, SkillRole::Candidate).await
}

/// POST /extract-skills
pub async fn handle_extract_skills(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<TopSkillsResponse>, AppError> {
    let mut uploads = read_uploads(multipart).await?;
    let pdf = take_pdf(&mut uploads, "file")?;
    let top_skills = extract_required_skills(&state, pdf).await?;
    Ok(Json(TopSkillsResponse { top_skills }))
}

/// POST /extract-skills/required
pub async fn handle_extract_required(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<RequiredSkillsResponse>, AppError> {
    let mut uploads = read_uploads(multipart).await?;
    let pdf = take_pdf(&mut uploads, "file")?;
    let required_skills = extract_required_skills(&state, pdf).await?;
    Ok(Json(RequiredSkillsResponse { required_skills }))
}

/// POST /extract-skills/candidate
pub async fn handle_extract_candidate(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<CandidateSkillsResponse>, AppError> {
    let mut uploads = read_uploads(multipart).await?;
    let pdf = take_pdf(&mut uploads, "file")?;
    let candidate_skills = extract_candidate_skills(&state, pdf).await?;
    Ok(Json(CandidateSkillsResponse { candidate_skills }))
}

/// POST /match-skills
/// Expects `job_description` and `resume` PDF fields; both are extracted concurrently.
pub async fn handle_match_skills(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<MatchResult>, AppError> {
    let mut uploads = read_uploads(multipart).await?;
    let job_description = take_pdf(&mut uploads, "job_description")?;
    let resume = take_pdf(&mut uploads, "resume")?;

    let (required, candidate) = tokio::try_join!(
        extract_required_skills(&state, job_description),
        extract_candidate_skills(&state, resume),
    )?;

    let result = match_skills(&required, &candidate);
    info!(
        score = result.match_score,
        matched = result.matched_skills.len(),
        "Computed skill match"
    );
    Ok(Json(result))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::LlmError;
    use crate::routes::build_router;
    use crate::test_support::{multipart_body, test_state, ScriptedProvider, BOUNDARY};
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    async fn post_form(
        provider: Arc<ScriptedProvider>,
        uri: &str,
        parts: &[(&str, &str, &str)],
    ) -> (StatusCode, Value) {
        let app = build_router(test_state(provider));
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header(
                        header::CONTENT_TYPE,
                        format!("multipart/form-data; boundary={BOUNDARY}"),
                    )
                    .body(Body::from(multipart_body(parts)))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[test]
    fn test_pdf_filename_check_is_case_insensitive() {
        assert!(is_pdf_filename("resume.pdf"));
        assert!(is_pdf_filename("RESUME.PDF"));
        assert!(!is_pdf_filename("resume.docx"));
        assert!(!is_pdf_filename("pdf"));
        assert!(!is_pdf_filename(""));
    }

    #[tokio::test]
    async fn test_extract_skills_returns_top_skills() {
        let provider = ScriptedProvider::replying(&["Python, SQL, Leadership, Docker, AWS, Kubernetes"]);
        let (status, body) = post_form(
            provider.clone(),
            "/extract-skills",
            &[("file", "jd.pdf", "We need a Python and SQL engineer.")],
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({"top_skills": ["Python", "SQL", "Leadership", "Docker", "AWS"]})
        );
        assert!(provider.prompts()[0].contains("job description"));
    }

    #[tokio::test]
    async fn test_candidate_endpoint_uses_candidate_prompt() {
        let provider = ScriptedProvider::replying(&["Rust, Go"]);
        let (status, body) = post_form(
            provider.clone(),
            "/extract-skills/candidate",
            &[("file", "cv.pdf", "Seasoned Rust developer.")],
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"candidate_skills": ["Rust", "Go"]}));
        assert!(provider.prompts()[0].contains("candidate skillset"));
    }

    #[tokio::test]
    async fn test_required_endpoint() {
        let provider = ScriptedProvider::replying(&["Kubernetes"]);
        let (status, body) = post_form(
            provider,
            "/extract-skills/required",
            &[("file", "jd.PDF", "Run our clusters.")],
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"required_skills": ["Kubernetes"]}));
    }

    #[tokio::test]
    async fn test_non_pdf_rejected_without_provider_call() {
        let provider = ScriptedProvider::replying(&["Rust"]);
        let (status, body) = post_form(
            provider.clone(),
            "/extract-skills",
            &[("file", "notes.txt", "Rust")],
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["message"], "Only PDF files are allowed");
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn test_missing_field_rejected() {
        let provider = ScriptedProvider::replying(&[]);
        let (status, body) = post_form(
            provider,
            "/extract-skills",
            &[("upload", "jd.pdf", "text")],
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_blank_document_is_unprocessable() {
        let provider = ScriptedProvider::replying(&["Rust"]);
        let (status, body) =
            post_form(provider.clone(), "/extract-skills", &[("file", "jd.pdf", "   ")]).await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"]["message"], "No text extracted from the PDF");
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn test_corrupt_document_is_unprocessable() {
        let provider = ScriptedProvider::replying(&["Rust"]);
        let (status, _) =
            post_form(provider.clone(), "/extract-skills", &[("file", "jd.pdf", "CORRUPT")]).await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn test_rate_limit_exhaustion_is_service_unavailable() {
        let provider = ScriptedProvider::new(vec![]);
        let (status, body) =
            post_form(provider.clone(), "/extract-skills", &[("file", "jd.pdf", "text")]).await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["error"]["code"], "RATE_LIMITED");
        assert_eq!(provider.calls(), 3);
    }

    #[tokio::test]
    async fn test_provider_error_is_bad_gateway() {
        let provider = ScriptedProvider::new(vec![Err(LlmError::Api {
            status: 401,
            message: "Incorrect API key provided".to_string(),
        })]);
        let (status, body) =
            post_form(provider.clone(), "/extract-skills", &[("file", "jd.pdf", "text")]).await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["error"]["code"], "LLM_ERROR");
        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test]
    async fn test_match_skills_scores_both_documents() {
        // Both extractions run concurrently, so each reply must suit either prompt.
        let provider = ScriptedProvider::replying(&["Python, SQL", "Python, SQL"]);
        let (status, body) = post_form(
            provider.clone(),
            "/match-skills",
            &[
                ("job_description", "jd.pdf", "Python and SQL required."),
                ("resume", "cv.pdf", "I write Python and SQL."),
            ],
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["match_score"], json!(100.0));
        assert_eq!(body["matched_skills"], json!(["python", "sql"]));
        assert_eq!(body["required_skills"], json!(["Python", "SQL"]));
        assert_eq!(body["candidate_skills"], json!(["Python", "SQL"]));
        assert_eq!(provider.calls(), 2);
    }

    #[tokio::test]
    async fn test_match_skills_requires_both_files() {
        let provider = ScriptedProvider::replying(&["Python"]);
        let (status, _) = post_form(
            provider.clone(),
            "/match-skills",
            &[("job_description", "jd.pdf", "Python required.")],
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn test_match_skills_rejects_non_pdf_resume() {
        let provider = ScriptedProvider::replying(&["Python"]);
        let (status, body) = post_form(
            provider,
            "/match-skills",
            &[
                ("job_description", "jd.pdf", "Python required."),
                ("resume", "cv.docx", "Python"),
            ],
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["message"], "Only PDF files are allowed");
    }
}
