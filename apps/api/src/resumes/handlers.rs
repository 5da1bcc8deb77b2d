use axum::{
    extract::{Multipart, State},
    Json,
};
use tracing::info;

use crate::errors::AppError;
use crate::models::resume::Resume;
use crate::resumes::assist::{assist_section, AssistRequest, AssistResponse};
use crate::resumes::extract::extract_text;
use crate::resumes::parser::parse_resume;
use crate::state::AppState;
use crate::storage::read_file_field;

/// POST /api/v1/resumes/import
pub async fn handle_import(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<Resume>, AppError> {
    let file = read_file_field(&mut multipart, "file").await?;
    let text = tokio::task::spawn_blocking(move || extract_text(&file))
        .await
        .map_err(|e| AppError::Internal(e.into()))?
        .map_err(|e| AppError::Validation(e.to_string()))?;

    if text.trim().is_empty() {
        return Err(AppError::UnprocessableEntity(
            "No text found in the document. Please ensure it is a text-based PDF.".to_string(),
        ));
    }

    let resume = parse_resume(&text, &state.llm).await?;
    info!(
        experiences = resume.work_experiences.len(),
        educations = resume.educations.len(),
        "Resume imported"
    );
    Ok(Json(resume))
}

/// POST /api/v1/resumes/assist
pub async fn handle_assist(
    State(state): State<AppState>,
    Json(req): Json<AssistRequest>,
) -> Result<Json<AssistResponse>, AppError> {
    Ok(Json(assist_section(&req, &state.llm).await?))
}
