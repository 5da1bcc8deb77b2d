use std::sync::Arc;

use aws_sdk_s3::Client as S3Client;
use redis::Client as RedisClient;
use sqlx::PgPool;

use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::recommendations::scorer::JobRecommender;
use crate::verification::sms::SmsSender;

/// Shared application state injected into all route handlers via Axum extractors.
/// Every client is built once in `main` and cloned by reference count.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    /// One-time passcode storage.
    pub redis: RedisClient,
    pub s3: S3Client,
    pub llm: LlmClient,
    pub sms: Arc<dyn SmsSender>,
    pub config: Config,
    /// Pluggable job ranker. Default: HeuristicRecommender.
    pub recommender: Arc<dyn JobRecommender>,
}
