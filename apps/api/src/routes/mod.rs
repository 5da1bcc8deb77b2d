pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::candidates::handlers as candidates;
use crate::companies::handlers as companies;
use crate::jobs::handlers as jobs;
use crate::recommendations::handlers as recommendations;
use crate::resumes::handlers as resumes;
use crate::state::AppState;
use crate::verification::handlers as verification;

/// Upload routes accept files up to this size.
const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// The served application: the router wrapped in request tracing and CORS.
pub fn build_app(state: AppState) -> Router {
    build_router(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive()),
    )
}

pub fn build_router(state: AppState) -> Router {
    let uploads = Router::new()
        .route("/api/v1/resumes/import", post(resumes::handle_import))
        .route(
            "/api/v1/users/:external_id/resume",
            post(candidates::handle_upload_resume),
        )
        .route(
            "/api/v1/companies/:id/logo",
            post(companies::handle_upload_logo),
        )
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES));

    Router::new()
        .route("/health", get(health::health_handler))
        // Jobs
        .route(
            "/api/v1/jobs",
            get(jobs::handle_list_jobs).post(jobs::handle_create_job),
        )
        .route("/api/v1/jobs/rewrite", post(jobs::handle_rewrite))
        .route("/api/v1/jobs/:id", get(jobs::handle_get_job))
        .route("/api/v1/roles", get(jobs::handle_list_roles))
        // Companies
        .route(
            "/api/v1/companies",
            get(companies::handle_list_companies).post(companies::handle_create_company),
        )
        .route(
            "/api/v1/companies/:id",
            get(companies::handle_get_company).patch(companies::handle_update_company),
        )
        .route(
            "/api/v1/companies/:id/verify-domain",
            post(companies::handle_verify_domain),
        )
        .route(
            "/api/v1/companies/:id/jobs",
            get(companies::handle_company_jobs),
        )
        .route(
            "/api/v1/companies/:id/dashboard",
            get(companies::handle_dashboard),
        )
        .route(
            "/api/v1/companies/:id/team",
            get(companies::handle_list_team).post(companies::handle_invite_member),
        )
        // Candidates
        .route("/api/v1/users", post(candidates::handle_create_user))
        .route(
            "/api/v1/users/:external_id",
            get(candidates::handle_get_user).patch(candidates::handle_update_user),
        )
        .route(
            "/api/v1/users/:external_id/completeness",
            get(candidates::handle_completeness),
        )
        .route(
            "/api/v1/users/:external_id/recommendations",
            get(recommendations::handle_recommendations),
        )
        .route(
            "/api/v1/candidates",
            get(candidates::handle_search_candidates),
        )
        // Resumes
        .route("/api/v1/resumes/assist", post(resumes::handle_assist))
        // Phone verification
        .route(
            "/api/v1/verification/otp",
            post(verification::handle_send_otp),
        )
        .route(
            "/api/v1/verification/otp/confirm",
            post(verification::handle_confirm_otp),
        )
        .merge(uploads)
        .with_state(state)
}
