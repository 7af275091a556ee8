//! Text Extractor — pulls plain text out of uploaded PDF bytes.
//!
//! Extraction is CPU-bound; callers run it inside `tokio::task::spawn_blocking`.

use crate::skills::SkillError;

const PDF_MAGIC: &[u8] = b"%PDF-";

/// Turns an uploaded document into plain text.
/// Carried in `AppState` as `Arc<dyn TextExtractor>`.
pub trait TextExtractor: Send + Sync {
    fn extract_text(&self, bytes: &[u8]) -> Result<String, SkillError>;
}

/// `pdf-extract` backed extractor used in production.
pub struct PdfTextExtractor;

impl TextExtractor for PdfTextExtractor {
    fn extract_text(&self, bytes: &[u8]) -> Result<String, SkillError> {
        if !bytes.starts_with(PDF_MAGIC) {
            return Err(SkillError::Extraction(
                "file does not start with a PDF header".to_string(),
            ));
        }

        let pages = pdf_extract::extract_text_from_mem_by_pages(bytes)
            .map_err(|e| SkillError::Extraction(e.to_string()))?;

        Ok(join_pages(pages))
    }
}

/// Joins page texts with single spaces, skipping pages that produced no text.
pub fn join_pages<I, S>(pages: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    pages
        .into_iter()
        .filter_map(|page| {
            let text = page.as_ref().trim();
            (!text.is_empty()).then(|| text.to_string())
        })
        .collect::<Vec<_>>()
        .join(" ")
}
