//! LLM help for individual resume sections.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::AppError;
use crate::llm_client::LlmClient;
use crate::resumes::prompts::{
    ASSIST_SYSTEM, EXPERIENCE_PROMPT_TEMPLATE, SKILLS_PROMPT_TEMPLATE, SUMMARY_PROMPT_TEMPLATE,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssistSection {
    Summary,
    Skills,
    Experience,
}

#[derive(Debug, Deserialize)]
pub struct AssistRequest {
    pub section: AssistSection,
    /// Free-form background: `role`, `description` and anything else useful.
    #[serde(default)]
    pub data: Value,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct AssistResponse {
    pub section: AssistSection,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skills: Option<Vec<String>>,
}

fn data_str<'a>(data: &'a Value, key: &str) -> Option<&'a str> {
    data.get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

pub fn build_assist_prompt(section: AssistSection, data: &Value) -> Result<String, AppError> {
    let background = data.to_string();
    let prompt = match section {
        AssistSection::Summary => SUMMARY_PROMPT_TEMPLATE
            .replace("{role}", data_str(data, "role").unwrap_or("professional"))
            .replace("{background}", &background),
        AssistSection::Experience => {
            let description = data_str(data, "description").ok_or_else(|| {
                AppError::Validation("data.description is required".to_string())
            })?;
            EXPERIENCE_PROMPT_TEMPLATE.replace("{description}", description)
        }
        AssistSection::Skills => {
            let role = data_str(data, "role")
                .ok_or_else(|| AppError::Validation("data.role is required".to_string()))?;
            SKILLS_PROMPT_TEMPLATE
                .replace("{role}", role)
                .replace("{background}", &background)
        }
    };
    Ok(prompt)
}

/// Splits a comma-separated skill list, dropping blanks.
pub fn split_skills(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

pub async fn assist_section(
    request: &AssistRequest,
    llm: &LlmClient,
) -> Result<AssistResponse, AppError> {
    let prompt = build_assist_prompt(request.section, &request.data)?;
    let content = llm
        .call_text(&prompt, ASSIST_SYSTEM)
        .await
        .map_err(|e| AppError::Llm(format!("Resume assist failed: {e}")))?;

    let skills = match request.section {
        AssistSection::Skills => Some(split_skills(&content)),
        _ => None,
    };
    Ok(AssistResponse {
        section: request.section,
        content,
        skills,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_summary_defaults_role() {
        let prompt = build_assist_prompt(AssistSection::Summary, &json!({"years": 4})).unwrap();
        assert!(prompt.contains("for a professional"));
        assert!(prompt.contains(r#"{"years":4}"#));
        assert!(prompt.contains("under 50 words"));
    }

    #[test]
    fn test_experience_requires_description() {
        let err = build_assist_prompt(AssistSection::Experience, &json!({})).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        let prompt = build_assist_prompt(
            AssistSection::Experience,
            &json!({"description": "fixed bugs"}),
        )
        .unwrap();
        assert!(prompt.contains("\"fixed bugs\""));
    }

    #[test]
    fn test_skills_prompt_names_role() {
        let prompt =
            build_assist_prompt(AssistSection::Skills, &json!({"role": "Data Analyst"})).unwrap();
        assert!(prompt.contains("for a Data Analyst"));
        assert!(prompt.contains("comma-separated"));
    }

    #[test]
    fn test_split_skills() {
        assert_eq!(
            split_skills("SQL, Python ,, Tableau,"),
            vec!["SQL", "Python", "Tableau"]
        );
    }

    #[test]
    fn test_section_deserializes_lowercase() {
        let req: AssistRequest =
            serde_json::from_str(r#"{"section": "skills", "data": {"role": "x"}}"#).unwrap();
        assert_eq!(req.section, AssistSection::Skills);
    }
}
