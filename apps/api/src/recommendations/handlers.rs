use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use tracing::debug;

use crate::candidates::handlers::require_user;
use crate::errors::AppError;
use crate::jobs::repository::recommendation_feed;
use crate::models::job::Job;
use crate::recommendations::scorer::{CandidateProfile, ScoredMatch};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct RecommendedJob {
    pub job: Job,
    pub score: u32,
    pub match_percent: u32,
    pub reasons: Vec<String>,
}

impl From<ScoredMatch<'_>> for RecommendedJob {
    fn from(scored: ScoredMatch<'_>) -> Self {
        RecommendedJob {
            match_percent: scored.match_percent(),
            job: scored.job.clone(),
            score: scored.score,
            reasons: scored.reasons,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RecommendationsResponse {
    pub backend: &'static str,
    pub matches: Vec<RecommendedJob>,
}

/// GET /api/v1/users/:external_id/recommendations
pub async fn handle_recommendations(
    State(state): State<AppState>,
    Path(external_id): Path<String>,
) -> Result<Json<RecommendationsResponse>, AppError> {
    let user = require_user(&state, &external_id).await?;
    let candidate = CandidateProfile::from(&user);
    let feed = recommendation_feed(&state.db).await?;

    let matches: Vec<RecommendedJob> = state
        .recommender
        .recommend(&candidate, &feed)
        .into_iter()
        .map(RecommendedJob::from)
        .collect();
    debug!(
        external_id = %external_id,
        feed = feed.len(),
        matches = matches.len(),
        "Recommendations scored"
    );

    Ok(Json(RecommendationsResponse {
        backend: state.recommender.backend(),
        matches,
    }))
}
