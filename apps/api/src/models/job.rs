use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Statuses a job must carry to appear in the public feed.
pub const VISIBLE_STATUSES: &[&str] = &["active", "approved", "published"];

/// Statuses counted as "active" on the employer dashboard.
pub const ACTIVE_STATUSES: &[&str] = &["active", "published"];

/// Column list for job queries. Every job query joins the owning company.
pub const JOB_SELECT: &str = r#"
    SELECT j.id, j.company_id, j.title, j.slug, j.job_type, j.workplace_type,
           j.location, j.location_lat, j.location_lng, j.location_place_id,
           j.salary_range, j.description, j.requirements, j.benefits, j.tags,
           j.application_url, j.status, j.source, j.posted_at,
           c.name AS company_name, c.logo_url AS company_logo_url
    FROM jobs j
    LEFT JOIN companies c ON c.id = j.company_id
"#;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkplaceType {
    Remote,
    Hybrid,
    Onsite,
}

impl WorkplaceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkplaceType::Remote => "remote",
            WorkplaceType::Hybrid => "hybrid",
            WorkplaceType::Onsite => "onsite",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "remote" => Some(WorkplaceType::Remote),
            "hybrid" => Some(WorkplaceType::Hybrid),
            "onsite" | "on-site" => Some(WorkplaceType::Onsite),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum JobType {
    FullTime,
    PartTime,
    Contract,
    Freelance,
}

impl JobType {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobType::FullTime => "full-time",
            JobType::PartTime => "part-time",
            JobType::Contract => "contract",
            JobType::Freelance => "freelance",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace(' ', "-").as_str() {
            "full-time" | "fulltime" => Some(JobType::FullTime),
            "part-time" | "parttime" => Some(JobType::PartTime),
            "contract" => Some(JobType::Contract),
            "freelance" => Some(JobType::Freelance),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobSource {
    #[default]
    Employer,
    Scraper,
}

impl JobSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobSource::Employer => "employer",
            JobSource::Scraper => "scraper",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JobRow {
    pub id: Uuid,
    pub company_id: Option<Uuid>,
    pub title: String,
    pub slug: String,
    pub job_type: Option<String>,
    pub workplace_type: Option<String>,
    pub location: String,
    pub location_lat: Option<f64>,
    pub location_lng: Option<f64>,
    pub location_place_id: Option<String>,
    pub salary_range: Option<String>,
    pub description: Option<String>,
    pub requirements: Vec<String>,
    pub benefits: Vec<String>,
    pub tags: Vec<String>,
    pub application_url: Option<String>,
    pub status: String,
    pub source: String,
    pub posted_at: DateTime<Utc>,
    pub company_name: Option<String>,
    pub company_logo_url: Option<String>,
}

/// A job posting as served to clients and consumed by the recommender.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub company_id: Option<Uuid>,
    pub company_name: String,
    pub company_logo_url: Option<String>,
    pub location: String,
    pub workplace_type: Option<WorkplaceType>,
    pub location_lat: Option<f64>,
    pub location_lng: Option<f64>,
    pub location_place_id: Option<String>,
    #[serde(rename = "type")]
    pub job_type: Option<JobType>,
    pub salary_range: Option<String>,
    pub posted_at: DateTime<Utc>,
    pub tags: Vec<String>,
    pub description: Option<String>,
    pub requirements: Vec<String>,
    pub benefits: Vec<String>,
    pub application_url: Option<String>,
    pub status: String,
}

impl From<JobRow> for Job {
    fn from(row: JobRow) -> Self {
        Job {
            id: row.id,
            title: row.title,
            slug: row.slug,
            company_id: row.company_id,
            company_name: row
                .company_name
                .unwrap_or_else(|| "Unknown Company".to_string()),
            company_logo_url: row.company_logo_url,
            location: row.location,
            workplace_type: row.workplace_type.as_deref().and_then(WorkplaceType::parse),
            location_lat: row.location_lat,
            location_lng: row.location_lng,
            location_place_id: row.location_place_id,
            job_type: row.job_type.as_deref().and_then(JobType::parse),
            salary_range: row.salary_range,
            posted_at: row.posted_at,
            tags: row.tags,
            description: row.description,
            requirements: row.requirements,
            benefits: row.benefits,
            application_url: row.application_url,
            status: row.status,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JobRoleRow {
    pub name: String,
    pub slug: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_row() -> JobRow {
        JobRow {
            id: Uuid::new_v4(),
            company_id: None,
            title: "Backend Engineer".to_string(),
            slug: "backend-engineer-1".to_string(),
            job_type: Some("Full Time".to_string()),
            workplace_type: Some("On-Site".to_string()),
            location: "Berlin".to_string(),
            location_lat: None,
            location_lng: None,
            location_place_id: None,
            salary_range: None,
            description: None,
            requirements: vec![],
            benefits: vec![],
            tags: vec!["rust".to_string()],
            application_url: None,
            status: "active".to_string(),
            source: "employer".to_string(),
            posted_at: Utc::now(),
            company_name: None,
            company_logo_url: None,
        }
    }

    #[test]
    fn test_job_from_row_defaults_company_name() {
        let job = Job::from(make_row());
        assert_eq!(job.company_name, "Unknown Company");
        assert_eq!(job.job_type, Some(JobType::FullTime));
        assert_eq!(job.workplace_type, Some(WorkplaceType::Onsite));
    }

    #[test]
    fn test_unknown_workplace_type_is_dropped() {
        let mut row = make_row();
        row.workplace_type = Some("moon base".to_string());
        assert_eq!(Job::from(row).workplace_type, None);
    }

    #[test]
    fn test_job_type_serializes_as_type_field() {
        let job = Job::from(make_row());
        let value = serde_json::to_value(&job).unwrap();
        assert_eq!(value["type"], "full-time");
        assert_eq!(value["workplace_type"], "onsite");
    }
}
