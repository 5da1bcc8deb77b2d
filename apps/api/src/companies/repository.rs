use sqlx::types::Json;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::models::company::{CompanyRow, SsoConfig};
use crate::models::user::UserRow;

const COMPANY_COLUMNS: &str = "id, name, slug, website_url, logo_url, description, \
     company_type, locations, tags, domain_verified, sso_enabled, sso_config, created_at";

#[derive(Debug, Clone, PartialEq)]
pub struct NewCompany {
    pub name: String,
    pub slug: String,
    pub website_url: Option<String>,
    pub description: Option<String>,
    pub company_type: Option<String>,
    pub locations: Vec<String>,
    pub tags: Vec<String>,
}

/// Fields an employer may change. `None` leaves the column untouched.
#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct CompanyPatch {
    pub name: Option<String>,
    pub website_url: Option<String>,
    pub description: Option<String>,
    pub company_type: Option<String>,
    pub locations: Option<Vec<String>>,
    pub tags: Option<Vec<String>>,
    pub sso_enabled: Option<bool>,
    pub sso_config: Option<SsoConfig>,
}

impl CompanyPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.website_url.is_none()
            && self.description.is_none()
            && self.company_type.is_none()
            && self.locations.is_none()
            && self.tags.is_none()
            && self.sso_enabled.is_none()
            && self.sso_config.is_none()
    }
}

#[derive(Debug, Clone)]
pub struct TeamInvite {
    pub email: String,
    pub full_name: Option<String>,
    pub team_role: String,
}

pub async fn list_companies(pool: &PgPool) -> Result<Vec<CompanyRow>, sqlx::Error> {
    let sql = format!("SELECT {COMPANY_COLUMNS} FROM companies ORDER BY name");
    sqlx::query_as(&sql).fetch_all(pool).await
}

pub async fn find_company(pool: &PgPool, id: Uuid) -> Result<Option<CompanyRow>, sqlx::Error> {
    let sql = format!("SELECT {COMPANY_COLUMNS} FROM companies WHERE id = $1");
    sqlx::query_as(&sql).bind(id).fetch_optional(pool).await
}

pub async fn insert_company(pool: &PgPool, company: &NewCompany) -> Result<CompanyRow, sqlx::Error> {
    let sql = format!(
        "INSERT INTO companies (name, slug, website_url, description, company_type, locations, tags) \
         VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING {COMPANY_COLUMNS}"
    );
    sqlx::query_as(&sql)
        .bind(&company.name)
        .bind(&company.slug)
        .bind(&company.website_url)
        .bind(&company.description)
        .bind(&company.company_type)
        .bind(&company.locations)
        .bind(&company.tags)
        .fetch_one(pool)
        .await
}

/// Applies a partial update. Returns `None` when the company does not exist.
pub async fn update_company(
    pool: &PgPool,
    id: Uuid,
    patch: &CompanyPatch,
) -> Result<Option<CompanyRow>, sqlx::Error> {
    if patch.is_empty() {
        return find_company(pool, id).await;
    }

    let mut qb: QueryBuilder<Postgres> = QueryBuilder::new("UPDATE companies SET ");
    let mut set = qb.separated(", ");
    if let Some(name) = &patch.name {
        set.push("name = ").push_bind_unseparated(name.clone());
    }
    if let Some(website_url) = &patch.website_url {
        set.push("website_url = ")
            .push_bind_unseparated(website_url.clone());
    }
    if let Some(description) = &patch.description {
        set.push("description = ")
            .push_bind_unseparated(description.clone());
    }
    if let Some(company_type) = &patch.company_type {
        set.push("company_type = ")
            .push_bind_unseparated(company_type.clone());
    }
    if let Some(locations) = &patch.locations {
        set.push("locations = ")
            .push_bind_unseparated(locations.clone());
    }
    if let Some(tags) = &patch.tags {
        set.push("tags = ").push_bind_unseparated(tags.clone());
    }
    if let Some(sso_enabled) = patch.sso_enabled {
        set.push("sso_enabled = ").push_bind_unseparated(sso_enabled);
    }
    if let Some(sso_config) = &patch.sso_config {
        set.push("sso_config = ")
            .push_bind_unseparated(Json(sso_config.clone()));
    }
    qb.push(" WHERE id = ")
        .push_bind(id)
        .push(" RETURNING ")
        .push(COMPANY_COLUMNS);

    qb.build_query_as().fetch_optional(pool).await
}

/// Returns `false` when no company matched.
pub async fn mark_domain_verified(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("UPDATE companies SET domain_verified = TRUE WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn set_logo_url(pool: &PgPool, id: Uuid, logo_url: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("UPDATE companies SET logo_url = $1 WHERE id = $2")
        .bind(logo_url)
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn list_team(pool: &PgPool, company_id: Uuid) -> Result<Vec<UserRow>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM users WHERE company_id = $1 ORDER BY created_at")
        .bind(company_id)
        .fetch_all(pool)
        .await
}

/// Creates a placeholder employer account that is claimed on first sign-in.
pub async fn invite_member(
    pool: &PgPool,
    company_id: Uuid,
    invite: &TeamInvite,
) -> Result<UserRow, sqlx::Error> {
    let external_id = format!("pending_{}", Uuid::new_v4());
    sqlx::query_as(
        r#"
        INSERT INTO users (external_id, email, full_name, role, company_id, team_role)
        VALUES ($1, $2, $3, 'employer', $4, $5)
        RETURNING *
        "#,
    )
    .bind(external_id)
    .bind(&invite.email)
    .bind(&invite.full_name)
    .bind(company_id)
    .bind(&invite.team_role)
    .fetch_one(pool)
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_patch_detected() {
        assert!(CompanyPatch::default().is_empty());
        let patch = CompanyPatch {
            sso_enabled: Some(false),
            ..Default::default()
        };
        assert!(!patch.is_empty());
    }

    #[test]
    fn test_patch_deserializes_sso_config() {
        let patch: CompanyPatch = serde_json::from_str(
            r#"{"sso_enabled": true, "sso_config": {"provider": "okta", "entry_point": "https://idp/sso", "cert": "MII", "issuer": "acme"}}"#,
        )
        .unwrap();
        assert_eq!(patch.sso_config.unwrap().provider, "okta");
        assert!(patch.name.is_none());
    }
}
