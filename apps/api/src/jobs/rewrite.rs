use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::jobs::prompts::{REWRITE_PROMPT, REWRITE_SYSTEM};
use crate::llm_client::LlmClient;

#[derive(Debug, Deserialize)]
pub struct RewriteRequest {
    pub text: String,
    /// Which posting field the text belongs to, e.g. "description".
    pub field: String,
}

#[derive(Debug, Serialize)]
pub struct RewriteResponse {
    pub rewritten_text: String,
}

pub fn build_rewrite_prompt(request: &RewriteRequest) -> Result<String, AppError> {
    let text = request.text.trim();
    let field = request.field.trim();
    if text.is_empty() || field.is_empty() {
        return Err(AppError::Validation(
            "Both text and field are required".to_string(),
        ));
    }
    Ok(REWRITE_PROMPT
        .replace("{field}", field)
        .replace("{text}", text))
}

/// Rewrites a posting field in a professional register.
pub async fn rewrite_posting_text(
    request: &RewriteRequest,
    llm: &LlmClient,
) -> Result<RewriteResponse, AppError> {
    let prompt = build_rewrite_prompt(request)?;
    let rewritten_text = llm
        .call_text(&prompt, REWRITE_SYSTEM)
        .await
        .map_err(|e| AppError::Llm(format!("Posting rewrite failed: {e}")))?;
    Ok(RewriteResponse { rewritten_text })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_includes_field_and_text() {
        let request = RewriteRequest {
            text: "we need rust guy".to_string(),
            field: "description".to_string(),
        };
        let prompt = build_rewrite_prompt(&request).unwrap();
        assert!(prompt.contains("job description"));
        assert!(prompt.contains("we need rust guy"));
        assert!(!prompt.contains("{text}"));
    }

    #[test]
    fn test_missing_field_is_rejected() {
        let request = RewriteRequest {
            text: "anything".to_string(),
            field: " ".to_string(),
        };
        assert!(matches!(
            build_rewrite_prompt(&request),
            Err(AppError::Validation(_))
        ));
    }
}
