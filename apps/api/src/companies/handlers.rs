use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::companies::repository::{
    find_company, insert_company, invite_member, list_companies, list_team,
    mark_domain_verified, set_logo_url, update_company, CompanyPatch, NewCompany, TeamInvite,
};
use crate::companies::stats::{compute_dashboard, DashboardStats};
use crate::errors::AppError;
use crate::jobs::repository::company_job_rows;
use crate::models::company::CompanyRow;
use crate::models::job::Job;
use crate::models::user::UserRow;
use crate::slug::slugify;
use crate::state::AppState;
use crate::storage::{object_key, read_file_field, upload_object, LOGO_PREFIX};

const LOGO_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp", "svg"];

#[derive(Debug, Deserialize)]
pub struct CreateCompanyRequest {
    pub name: String,
    pub slug: Option<String>,
    pub website_url: Option<String>,
    pub description: Option<String>,
    pub company_type: Option<String>,
    #[serde(default)]
    pub locations: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct InviteRequest {
    pub email: String,
    pub full_name: Option<String>,
    pub team_role: Option<String>,
}

#[derive(Serialize)]
pub struct LogoResponse {
    pub logo_url: String,
}

/// Slug from an explicit value or the company name.
pub fn prepare_company(req: CreateCompanyRequest) -> Result<NewCompany, AppError> {
    let name = req.name.trim().to_string();
    if name.is_empty() {
        return Err(AppError::Validation("Company name is required".to_string()));
    }
    let slug = req
        .slug
        .as_deref()
        .map(slugify)
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| slugify(&name));
    if slug.is_empty() {
        return Err(AppError::Validation(
            "Company name must contain at least one letter or digit".to_string(),
        ));
    }

    Ok(NewCompany {
        name,
        slug,
        website_url: req.website_url,
        description: req.description,
        company_type: req.company_type,
        locations: req.locations,
        tags: req.tags,
    })
}

fn not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Company {id} not found"))
}

/// Turns an update that touched no row into a 404.
fn require_updated(updated: bool, id: Uuid) -> Result<(), AppError> {
    if updated {
        Ok(())
    } else {
        Err(not_found(id))
    }
}

/// GET /api/v1/companies
pub async fn handle_list_companies(
    State(state): State<AppState>,
) -> Result<Json<Vec<CompanyRow>>, AppError> {
    Ok(Json(list_companies(&state.db).await?))
}

/// GET /api/v1/companies/:id
pub async fn handle_get_company(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<CompanyRow>, AppError> {
    let company = find_company(&state.db, id).await?.ok_or_else(|| not_found(id))?;
    Ok(Json(company))
}

/// POST /api/v1/companies
pub async fn handle_create_company(
    State(state): State<AppState>,
    Json(req): Json<CreateCompanyRequest>,
) -> Result<(StatusCode, Json<CompanyRow>), AppError> {
    let new_company = prepare_company(req)?;
    let company = insert_company(&state.db, &new_company).await?;
    info!(company_id = %company.id, slug = %company.slug, "Company created");
    Ok((StatusCode::CREATED, Json(company)))
}

/// PATCH /api/v1/companies/:id
pub async fn handle_update_company(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(patch): Json<CompanyPatch>,
) -> Result<Json<CompanyRow>, AppError> {
    if matches!(patch.name.as_deref(), Some(name) if name.trim().is_empty()) {
        return Err(AppError::Validation("Company name cannot be empty".to_string()));
    }
    let company = update_company(&state.db, id, &patch)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(company))
}

/// POST /api/v1/companies/:id/verify-domain
pub async fn handle_verify_domain(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    require_updated(mark_domain_verified(&state.db, id).await?, id)?;
    info!(company_id = %id, "Company domain verified");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/companies/:id/logo
pub async fn handle_upload_logo(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<Json<LogoResponse>, AppError> {
    let file = read_file_field(&mut multipart, "file").await?;
    let is_image = file
        .content_type
        .as_deref()
        .map(|ct| ct.starts_with("image/"))
        .unwrap_or(false);
    let extension = file.extension();
    let known_extension = extension
        .as_deref()
        .map(|ext| LOGO_EXTENSIONS.contains(&ext))
        .unwrap_or(false);
    if !is_image && !known_extension {
        return Err(AppError::Validation("Logo must be an image".to_string()));
    }

    let company = find_company(&state.db, id).await?.ok_or_else(|| not_found(id))?;
    let key = object_key(LOGO_PREFIX, &company.slug, extension.as_deref());
    let logo_url = upload_object(
        &state.s3,
        &state.config.s3_bucket,
        &state.config.s3_public_url,
        &key,
        file,
    )
    .await?;

    // The company may have been deleted while the upload ran
    require_updated(set_logo_url(&state.db, id, &logo_url).await?, id)?;
    Ok(Json(LogoResponse { logo_url }))
}

/// GET /api/v1/companies/:id/jobs
pub async fn handle_company_jobs(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<Job>>, AppError> {
    let rows = company_job_rows(&state.db, id).await?;
    Ok(Json(rows.into_iter().map(Job::from).collect()))
}

/// GET /api/v1/companies/:id/dashboard
pub async fn handle_dashboard(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<DashboardStats>, AppError> {
    let rows = company_job_rows(&state.db, id).await?;
    Ok(Json(compute_dashboard(rows)))
}

/// GET /api/v1/companies/:id/team
pub async fn handle_list_team(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<UserRow>>, AppError> {
    Ok(Json(list_team(&state.db, id).await?))
}

/// POST /api/v1/companies/:id/team
pub async fn handle_invite_member(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<InviteRequest>,
) -> Result<(StatusCode, Json<UserRow>), AppError> {
    let email = req.email.trim().to_string();
    if email.is_empty() || !email.contains('@') {
        return Err(AppError::Validation("A valid email is required".to_string()));
    }
    find_company(&state.db, id).await?.ok_or_else(|| not_found(id))?;

    let invite = TeamInvite {
        email,
        full_name: req.full_name,
        team_role: req.team_role.unwrap_or_else(|| "member".to_string()),
    };
    let member = invite_member(&state.db, id, &invite).await?;
    info!(company_id = %id, user_id = %member.id, "Team member invited");
    Ok((StatusCode::CREATED, Json(member)))
}
