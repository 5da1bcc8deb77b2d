use crate::errors::AppError;
use crate::llm_client::LlmClient;
use crate::models::resume::Resume;
use crate::resumes::prompts::{RESUME_PARSE_PROMPT_TEMPLATE, RESUME_PARSE_SYSTEM};

/// Characters of resume text sent to the model.
pub const MAX_RESUME_CHARS: usize = 15_000;

/// First `max_chars` characters of `text`, cut on a char boundary.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

pub fn build_parse_prompt(resume_text: &str) -> String {
    RESUME_PARSE_PROMPT_TEMPLATE.replace(
        "{resume_text}",
        truncate_chars(resume_text, MAX_RESUME_CHARS),
    )
}

/// Parses extracted resume text into the fixed schema. Sections the model
/// leaves out stay empty.
pub async fn parse_resume(resume_text: &str, llm: &LlmClient) -> Result<Resume, AppError> {
    let prompt = build_parse_prompt(resume_text);
    llm.call_json::<Resume>(&prompt, RESUME_PARSE_SYSTEM)
        .await
        .map_err(|e| AppError::Llm(format!("Resume parsing failed: {e}")))
}
