use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use tracing::info;

use crate::candidates::completeness::{completeness_report, CompletenessReport};
use crate::candidates::repository::{
    find_user, insert_user, search_candidates, set_resume_url, update_user, CandidateSearch,
    NewUser, UserPatch,
};
use crate::errors::AppError;
use crate::models::user::{CandidateSummaryRow, UserRow};
use crate::state::AppState;
use crate::storage::{object_key, read_file_field, upload_object, RESUME_PREFIX};

#[derive(Serialize)]
pub struct ResumeUploadResponse {
    pub resume_url: String,
}

pub(crate) fn user_not_found(external_id: &str) -> AppError {
    AppError::NotFound(format!("User {external_id} not found"))
}

/// Loads a user by identity-provider id or fails with 404.
pub(crate) async fn require_user(state: &AppState, external_id: &str) -> Result<UserRow, AppError> {
    find_user(&state.db, external_id)
        .await?
        .ok_or_else(|| user_not_found(external_id))
}

/// POST /api/v1/users
pub async fn handle_create_user(
    State(state): State<AppState>,
    Json(req): Json<NewUser>,
) -> Result<(StatusCode, Json<UserRow>), AppError> {
    if req.external_id.trim().is_empty() {
        return Err(AppError::Validation("external_id is required".to_string()));
    }
    if !req.email.contains('@') {
        return Err(AppError::Validation("A valid email is required".to_string()));
    }
    let user = insert_user(&state.db, &req).await?;
    info!(external_id = %user.external_id, role = %user.role, "User created");
    Ok((StatusCode::CREATED, Json(user)))
}

/// GET /api/v1/users/:external_id
pub async fn handle_get_user(
    State(state): State<AppState>,
    Path(external_id): Path<String>,
) -> Result<Json<UserRow>, AppError> {
    Ok(Json(require_user(&state, &external_id).await?))
}

/// PATCH /api/v1/users/:external_id
pub async fn handle_update_user(
    State(state): State<AppState>,
    Path(external_id): Path<String>,
    Json(patch): Json<UserPatch>,
) -> Result<Json<UserRow>, AppError> {
    let user = update_user(&state.db, &external_id, patch)
        .await?
        .ok_or_else(|| user_not_found(&external_id))?;
    Ok(Json(user))
}

/// GET /api/v1/users/:external_id/completeness
pub async fn handle_completeness(
    State(state): State<AppState>,
    Path(external_id): Path<String>,
) -> Result<Json<CompletenessReport>, AppError> {
    let user = require_user(&state, &external_id).await?;
    Ok(Json(completeness_report(&user)))
}

/// GET /api/v1/candidates
pub async fn handle_search_candidates(
    State(state): State<AppState>,
    Query(search): Query<CandidateSearch>,
) -> Result<Json<Vec<CandidateSummaryRow>>, AppError> {
    Ok(Json(search_candidates(&state.db, &search).await?))
}

/// POST /api/v1/users/:external_id/resume
pub async fn handle_upload_resume(
    State(state): State<AppState>,
    Path(external_id): Path<String>,
    mut multipart: Multipart,
) -> Result<Json<ResumeUploadResponse>, AppError> {
    let file = read_file_field(&mut multipart, "file").await?;
    require_user(&state, &external_id).await?;

    let extension = file.extension();
    let key = object_key(RESUME_PREFIX, &external_id, extension.as_deref());
    let resume_url = upload_object(
        &state.s3,
        &state.config.s3_bucket,
        &state.config.s3_public_url,
        &key,
        file,
    )
    .await?;

    if !set_resume_url(&state.db, &external_id, &resume_url).await? {
        return Err(user_not_found(&external_id));
    }
    info!(external_id = %external_id, "Resume uploaded");
    Ok(Json(ResumeUploadResponse { resume_url }))
}
