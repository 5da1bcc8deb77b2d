use serde::Deserialize;
use sqlx::query_builder::Separated;
use sqlx::types::Json;
use sqlx::{Encode, PgPool, Postgres, QueryBuilder, Type};
use uuid::Uuid;

use crate::jobs::filters::like_pattern;
use crate::models::user::{
    CandidateSummaryRow, EducationItem, JobPreferences, ProjectItem, UserRole, UserRow,
    WorkExperienceItem,
};

const MAX_SEARCH_RESULTS: i64 = 100;

#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
    pub external_id: String,
    pub email: String,
    pub role: UserRole,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub full_name: Option<String>,
    pub company_id: Option<Uuid>,
}

/// Profile fields a user may change. `None` leaves the column untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserPatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub full_name: Option<String>,
    pub role: Option<UserRole>,
    pub company_id: Option<Uuid>,
    pub team_role: Option<String>,
    pub headline: Option<String>,
    pub bio: Option<String>,
    pub skills: Option<Vec<String>>,
    pub experience_level: Option<String>,
    pub linkedin_url: Option<String>,
    pub portfolio_url: Option<String>,
    pub phone_country_code: Option<String>,
    pub address_line1: Option<String>,
    pub address_line2: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub country: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub work_experience: Option<Vec<WorkExperienceItem>>,
    pub education: Option<Vec<EducationItem>>,
    pub projects: Option<Vec<ProjectItem>>,
    pub job_preferences: Option<JobPreferences>,
    pub interests: Option<Vec<String>>,
}

/// Query parameters of `GET /api/v1/candidates`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CandidateSearch {
    pub skill: Option<String>,
    pub location: Option<String>,
    pub experience_level: Option<String>,
    pub name: Option<String>,
}

pub async fn insert_user(pool: &PgPool, user: &NewUser) -> Result<UserRow, sqlx::Error> {
    let full_name = user.full_name.clone().or_else(|| {
        match (user.first_name.as_deref(), user.last_name.as_deref()) {
            (Some(first), Some(last)) => Some(format!("{first} {last}")),
            (Some(first), None) => Some(first.to_string()),
            (None, Some(last)) => Some(last.to_string()),
            (None, None) => None,
        }
    });

    sqlx::query_as(
        r#"
        INSERT INTO users (external_id, email, role, first_name, last_name, full_name, company_id)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING *
        "#,
    )
    .bind(&user.external_id)
    .bind(&user.email)
    .bind(user.role.as_str())
    .bind(&user.first_name)
    .bind(&user.last_name)
    .bind(full_name)
    .bind(user.company_id)
    .fetch_one(pool)
    .await
}

pub async fn find_user(pool: &PgPool, external_id: &str) -> Result<Option<UserRow>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM users WHERE external_id = $1")
        .bind(external_id)
        .fetch_optional(pool)
        .await
}

fn set_column<'args, T>(
    set: &mut Separated<'_, 'args, Postgres, &'static str>,
    column: &str,
    value: Option<T>,
) where
    T: 'args + Encode<'args, Postgres> + Type<Postgres> + Send,
{
    if let Some(value) = value {
        set.push(format!("{column} = "));
        set.push_bind_unseparated(value);
    }
}

/// Applies a partial update and bumps `updated_at`.
/// Returns `None` when no user has this external id.
pub async fn update_user(
    pool: &PgPool,
    external_id: &str,
    patch: UserPatch,
) -> Result<Option<UserRow>, sqlx::Error> {
    let mut qb: QueryBuilder<Postgres> = QueryBuilder::new("UPDATE users SET ");
    let mut set = qb.separated(", ");
    set.push("updated_at = NOW()");
    set_column(&mut set, "first_name", patch.first_name);
    set_column(&mut set, "last_name", patch.last_name);
    set_column(&mut set, "full_name", patch.full_name);
    set_column(&mut set, "role", patch.role.map(|r| r.as_str()));
    set_column(&mut set, "company_id", patch.company_id);
    set_column(&mut set, "team_role", patch.team_role);
    set_column(&mut set, "headline", patch.headline);
    set_column(&mut set, "bio", patch.bio);
    set_column(&mut set, "skills", patch.skills);
    set_column(&mut set, "experience_level", patch.experience_level);
    set_column(&mut set, "linkedin_url", patch.linkedin_url);
    set_column(&mut set, "portfolio_url", patch.portfolio_url);
    set_column(&mut set, "phone_country_code", patch.phone_country_code);
    set_column(&mut set, "address_line1", patch.address_line1);
    set_column(&mut set, "address_line2", patch.address_line2);
    set_column(&mut set, "city", patch.city);
    set_column(&mut set, "state", patch.state);
    set_column(&mut set, "zip_code", patch.zip_code);
    set_column(&mut set, "country", patch.country);
    set_column(&mut set, "latitude", patch.latitude);
    set_column(&mut set, "longitude", patch.longitude);
    set_column(&mut set, "work_experience", patch.work_experience.map(Json));
    set_column(&mut set, "education", patch.education.map(Json));
    set_column(&mut set, "projects", patch.projects.map(Json));
    set_column(&mut set, "job_preferences", patch.job_preferences.map(Json));
    set_column(&mut set, "interests", patch.interests);
    qb.push(" WHERE external_id = ")
        .push_bind(external_id.to_string())
        .push(" RETURNING *");

    qb.build_query_as().fetch_optional(pool).await
}

pub async fn set_resume_url(
    pool: &PgPool,
    external_id: &str,
    resume_url: &str,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE users SET resume_url = $1, updated_at = NOW() WHERE external_id = $2",
    )
    .bind(resume_url)
    .bind(external_id)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}

/// Stores a freshly verified phone number.
pub async fn set_verified_phone(
    pool: &PgPool,
    external_id: &str,
    phone: &str,
    country_code: Option<&str>,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE users
        SET phone = $1,
            phone_country_code = COALESCE($2, phone_country_code),
            phone_verified = TRUE,
            updated_at = NOW()
        WHERE external_id = $3
        "#,
    )
    .bind(phone)
    .bind(country_code)
    .bind(external_id)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}

/// Job seekers matching every given filter, most recently updated first.
pub async fn search_candidates(
    pool: &PgPool,
    search: &CandidateSearch,
) -> Result<Vec<CandidateSummaryRow>, sqlx::Error> {
    let mut qb: QueryBuilder<Postgres> = QueryBuilder::new(
        r#"
        SELECT id, external_id, first_name, last_name, full_name, headline, bio, skills,
               experience_level, city, country, resume_url, linkedin_url, portfolio_url
        FROM users
        WHERE role = 'jobseeker'
        "#,
    );

    if let Some(skill) = non_blank(&search.skill) {
        qb.push(" AND ")
            .push_bind(skill.to_string())
            .push(" = ANY(skills)");
    }
    if let Some(location) = non_blank(&search.location) {
        let pattern = like_pattern(location);
        qb.push(" AND (city ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR country ILIKE ")
            .push_bind(pattern)
            .push(")");
    }
    if let Some(level) = non_blank(&search.experience_level) {
        qb.push(" AND experience_level = ")
            .push_bind(level.to_string());
    }
    if let Some(name) = non_blank(&search.name) {
        qb.push(" AND full_name ILIKE ")
            .push_bind(like_pattern(name));
    }
    qb.push(" ORDER BY updated_at DESC LIMIT ")
        .push_bind(MAX_SEARCH_RESULTS);

    qb.build_query_as().fetch_all(pool).await
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patch_accepts_partial_json() {
        let patch: UserPatch = serde_json::from_str(
            r#"{"headline": "Data Analyst", "skills": ["sql"], "work_experience": [{"company": "Acme"}]}"#,
        )
        .unwrap();
        assert_eq!(patch.headline.as_deref(), Some("Data Analyst"));
        assert_eq!(patch.work_experience.unwrap()[0].company, "Acme");
        assert!(patch.city.is_none());
    }

    #[test]
    fn test_new_user_requires_known_role() {
        let parsed: Result<NewUser, _> = serde_json::from_str(
            r#"{"external_id": "u1", "email": "a@b.c", "role": "admin"}"#,
        );
        assert!(parsed.is_err());
    }
}
