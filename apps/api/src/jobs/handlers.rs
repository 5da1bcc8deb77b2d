use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::jobs::filters::{apply_post_filters, JobFilters};
use crate::jobs::posting::{prepare_job, CreateJobRequest};
use crate::jobs::repository::{find_job, insert_job, list_roles, list_visible_jobs};
use crate::jobs::rewrite::{rewrite_posting_text, RewriteRequest, RewriteResponse};
use crate::models::job::{Job, JobRoleRow};
use crate::state::AppState;

#[derive(Serialize)]
pub struct JobListResponse {
    pub jobs: Vec<Job>,
    pub count: usize,
}

#[derive(Serialize)]
pub struct CreatedJob {
    pub id: Uuid,
    pub slug: String,
}

#[derive(Deserialize)]
pub struct RoleSearch {
    pub search: Option<String>,
}

/// GET /api/v1/jobs
pub async fn handle_list_jobs(
    State(state): State<AppState>,
    Query(filters): Query<JobFilters>,
) -> Result<Json<JobListResponse>, AppError> {
    let jobs = list_visible_jobs(&state.db, &filters, Utc::now()).await?;
    let jobs = apply_post_filters(jobs, &filters);
    Ok(Json(JobListResponse {
        count: jobs.len(),
        jobs,
    }))
}

/// GET /api/v1/jobs/:id
pub async fn handle_get_job(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Job>, AppError> {
    let job = find_job(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job {id} not found")))?;
    Ok(Json(job))
}

/// POST /api/v1/jobs
pub async fn handle_create_job(
    State(state): State<AppState>,
    Json(req): Json<CreateJobRequest>,
) -> Result<(StatusCode, Json<CreatedJob>), AppError> {
    let new_job = prepare_job(req, Utc::now())?;
    let id = insert_job(&state.db, &new_job).await?;
    info!(job_id = %id, company_id = %new_job.company_id, "Job posted");
    Ok((
        StatusCode::CREATED,
        Json(CreatedJob {
            id,
            slug: new_job.slug,
        }),
    ))
}

/// GET /api/v1/roles
pub async fn handle_list_roles(
    State(state): State<AppState>,
    Query(params): Query<RoleSearch>,
) -> Result<Json<Vec<JobRoleRow>>, AppError> {
    let search = params
        .search
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty());
    let roles = list_roles(&state.db, search).await?;
    Ok(Json(roles))
}

/// POST /api/v1/jobs/rewrite
pub async fn handle_rewrite(
    State(state): State<AppState>,
    Json(req): Json<RewriteRequest>,
) -> Result<Json<RewriteResponse>, AppError> {
    let response = rewrite_posting_text(&req, &state.llm).await?;
    Ok(Json(response))
}
