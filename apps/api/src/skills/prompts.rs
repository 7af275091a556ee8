// Prompt constants for skill extraction.

/// Skill extraction prompt. Replace `{document_noun}` and `{document_text}` before sending.
/// Sent as a lone user message; no system prompt.
pub const SKILL_EXTRACTION_PROMPT_TEMPLATE: &str = "\
Extract the top 5 technical and soft skills from the following {document_noun}. \
Only return the skills as a comma-separated list, with no additional text:
{document_text}";
