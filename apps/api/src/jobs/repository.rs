use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::jobs::filters::{like_pattern, JobFilters};
use crate::models::job::{Job, JobRoleRow, JobRow, JOB_SELECT, VISIBLE_STATUSES};

/// Upper bound on the feed scanned for recommendations.
pub const RECOMMENDATION_FEED_SIZE: i64 = 500;

/// A validated job ready to insert.
#[derive(Debug, Clone, PartialEq)]
pub struct NewJob {
    pub company_id: Uuid,
    pub title: String,
    pub slug: String,
    pub job_type: Option<String>,
    pub workplace_type: String,
    pub location: String,
    pub location_lat: Option<f64>,
    pub location_lng: Option<f64>,
    pub location_place_id: Option<String>,
    pub salary_range: Option<String>,
    pub description: String,
    pub requirements: Vec<String>,
    pub benefits: Vec<String>,
    pub tags: Vec<String>,
    pub application_url: Option<String>,
    pub source: String,
    pub posted_at: DateTime<Utc>,
}

fn visible_statuses() -> Vec<String> {
    VISIBLE_STATUSES.iter().map(|s| s.to_string()).collect()
}

/// Public feed with the SQL-expressible filters applied, newest first.
pub async fn list_visible_jobs(
    pool: &PgPool,
    filters: &JobFilters,
    now: DateTime<Utc>,
) -> Result<Vec<Job>, sqlx::Error> {
    let mut qb: QueryBuilder<Postgres> = QueryBuilder::new(JOB_SELECT);
    qb.push(" WHERE j.status = ANY(")
        .push_bind(visible_statuses())
        .push(")");

    if let Some(keyword) = filters.keyword() {
        qb.push(" AND j.title ILIKE ").push_bind(like_pattern(keyword));
    }
    if let Some(location) = filters.location() {
        qb.push(" AND j.location ILIKE ")
            .push_bind(like_pattern(location));
    }
    if let Some(job_type) = filters.job_type() {
        qb.push(" AND j.job_type = ").push_bind(job_type.to_string());
    }
    if let Some(company_id) = filters.company_id {
        qb.push(" AND j.company_id = ").push_bind(company_id);
    }
    if let Some(role) = filters.role() {
        qb.push(" AND (j.title ILIKE ")
            .push_bind(like_pattern(role))
            .push(" OR ")
            .push_bind(role.to_string())
            .push(" = ANY(j.tags))");
    }
    if let Some(cutoff) = filters.date_posted.and_then(|d| d.cutoff(now)) {
        qb.push(" AND j.posted_at >= ").push_bind(cutoff);
    }

    let (limit, offset) = filters.page();
    qb.push(" ORDER BY j.posted_at DESC LIMIT ")
        .push_bind(limit)
        .push(" OFFSET ")
        .push_bind(offset);

    let rows: Vec<JobRow> = qb.build_query_as().fetch_all(pool).await?;
    Ok(rows.into_iter().map(Job::from).collect())
}

/// Newest visible jobs, unfiltered. Input to the recommender.
pub async fn recommendation_feed(pool: &PgPool) -> Result<Vec<Job>, sqlx::Error> {
    let sql =
        format!("{JOB_SELECT} WHERE j.status = ANY($1) ORDER BY j.posted_at DESC LIMIT $2");
    let rows: Vec<JobRow> = sqlx::query_as(&sql)
        .bind(visible_statuses())
        .bind(RECOMMENDATION_FEED_SIZE)
        .fetch_all(pool)
        .await?;
    Ok(rows.into_iter().map(Job::from).collect())
}

pub async fn find_job(pool: &PgPool, id: Uuid) -> Result<Option<Job>, sqlx::Error> {
    let sql = format!("{JOB_SELECT} WHERE j.id = $1");
    let row: Option<JobRow> = sqlx::query_as(&sql).bind(id).fetch_optional(pool).await?;
    Ok(row.map(Job::from))
}

/// Every job of a company regardless of status, newest first.
pub async fn company_job_rows(
    pool: &PgPool,
    company_id: Uuid,
) -> Result<Vec<JobRow>, sqlx::Error> {
    let sql = format!("{JOB_SELECT} WHERE j.company_id = $1 ORDER BY j.posted_at DESC");
    sqlx::query_as(&sql).bind(company_id).fetch_all(pool).await
}

pub async fn insert_job(pool: &PgPool, job: &NewJob) -> Result<Uuid, sqlx::Error> {
    sqlx::query_scalar(
        r#"
        INSERT INTO jobs
            (company_id, title, slug, job_type, workplace_type, location,
             location_lat, location_lng, location_place_id, salary_range,
             description, requirements, benefits, tags, application_url,
             status, source, posted_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15,
                'active', $16, $17)
        RETURNING id
        "#,
    )
    .bind(job.company_id)
    .bind(&job.title)
    .bind(&job.slug)
    .bind(&job.job_type)
    .bind(&job.workplace_type)
    .bind(&job.location)
    .bind(job.location_lat)
    .bind(job.location_lng)
    .bind(&job.location_place_id)
    .bind(&job.salary_range)
    .bind(&job.description)
    .bind(&job.requirements)
    .bind(&job.benefits)
    .bind(&job.tags)
    .bind(&job.application_url)
    .bind(&job.source)
    .bind(job.posted_at)
    .fetch_one(pool)
    .await
}

/// Role taxonomy, alphabetical. A search term narrows to the first 10 hits.
pub async fn list_roles(
    pool: &PgPool,
    search: Option<&str>,
) -> Result<Vec<JobRoleRow>, sqlx::Error> {
    match search {
        Some(term) => {
            sqlx::query_as(
                "SELECT name, slug FROM job_roles WHERE name ILIKE $1 ORDER BY name LIMIT 10",
            )
            .bind(like_pattern(term))
            .fetch_all(pool)
            .await
        }
        None => {
            sqlx::query_as("SELECT name, slug FROM job_roles ORDER BY name")
                .fetch_all(pool)
                .await
        }
    }
}
