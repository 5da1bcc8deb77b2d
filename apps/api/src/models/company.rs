use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

/// Stored SSO settings. Only the record is kept; no SSO flow runs here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SsoConfig {
    pub provider: String,
    pub entry_point: String,
    pub cert: String,
    pub issuer: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CompanyRow {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub website_url: Option<String>,
    pub logo_url: Option<String>,
    pub description: Option<String>,
    pub company_type: Option<String>,
    pub locations: Vec<String>,
    pub tags: Vec<String>,
    pub domain_verified: bool,
    pub sso_enabled: bool,
    pub sso_config: Option<Json<SsoConfig>>,
    pub created_at: DateTime<Utc>,
}
