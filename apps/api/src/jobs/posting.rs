//! Employer job posting: request shape and validation.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::jobs::repository::NewJob;
use crate::models::job::{JobSource, JobType, WorkplaceType};
use crate::slug::slugify;

#[derive(Debug, Clone, Deserialize)]
pub struct CreateJobRequest {
    pub company_id: Uuid,
    pub title: String,
    #[serde(rename = "type")]
    pub job_type: Option<JobType>,
    pub workplace_type: WorkplaceType,
    #[serde(default)]
    pub location: Option<String>,
    pub location_lat: Option<f64>,
    pub location_lng: Option<f64>,
    pub location_place_id: Option<String>,
    pub salary_range: Option<String>,
    pub description: String,
    #[serde(default)]
    pub requirements: Vec<String>,
    #[serde(default)]
    pub benefits: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub application_url: Option<String>,
    #[serde(default)]
    pub source: JobSource,
}

/// Validates a posting and normalizes it into an insertable job.
///
/// Non-remote postings need a location; remote ones default to "Remote".
/// The slug is the slugified title suffixed with the posting time in millis.
pub fn prepare_job(request: CreateJobRequest, now: DateTime<Utc>) -> Result<NewJob, AppError> {
    let title = request.title.trim().to_string();
    if title.is_empty() {
        return Err(AppError::Validation("title cannot be empty".to_string()));
    }

    let description = request.description.trim().to_string();
    if description.is_empty() {
        return Err(AppError::Validation("description cannot be empty".to_string()));
    }

    let location = request
        .location
        .as_deref()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string);
    let location = match (location, request.workplace_type) {
        (Some(location), _) => location,
        (None, WorkplaceType::Remote) => "Remote".to_string(),
        (None, _) => {
            return Err(AppError::Validation(
                "Please select a valid location for hybrid or onsite jobs".to_string(),
            ))
        }
    };

    let base_slug = slugify(&title);
    let slug = if base_slug.is_empty() {
        format!("job-{}", now.timestamp_millis())
    } else {
        format!("{base_slug}-{}", now.timestamp_millis())
    };

    Ok(NewJob {
        company_id: request.company_id,
        title,
        slug,
        job_type: request.job_type.map(|t| t.as_str().to_string()),
        workplace_type: request.workplace_type.as_str().to_string(),
        location,
        location_lat: request.location_lat,
        location_lng: request.location_lng,
        location_place_id: request.location_place_id,
        salary_range: non_blank_owned(request.salary_range),
        description,
        requirements: clean_lines(request.requirements),
        benefits: clean_lines(request.benefits),
        tags: clean_lines(request.tags),
        application_url: non_blank_owned(request.application_url),
        source: request.source.as_str().to_string(),
        posted_at: now,
    })
}

fn clean_lines(lines: Vec<String>) -> Vec<String> {
    lines
        .into_iter()
        .map(|l| l.trim().to_string())
        .filter(|l| !l.is_empty())
        .collect()
}

fn non_blank_owned(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.timestamp_millis_opt(1_700_000_000_000).unwrap()
    }

    fn make_request(workplace_type: WorkplaceType, location: Option<&str>) -> CreateJobRequest {
        CreateJobRequest {
            company_id: Uuid::new_v4(),
            title: "  Senior Rust Engineer ".to_string(),
            job_type: Some(JobType::FullTime),
            workplace_type,
            location: location.map(String::from),
            location_lat: None,
            location_lng: None,
            location_place_id: None,
            salary_range: Some(" ".to_string()),
            description: "Build the matching engine.".to_string(),
            requirements: vec!["5+ years Rust".to_string(), "   ".to_string()],
            benefits: vec![],
            tags: vec!["Rust".to_string()],
            application_url: None,
            source: JobSource::Employer,
        }
    }

    #[test]
    fn test_remote_job_defaults_location() {
        let job = prepare_job(make_request(WorkplaceType::Remote, None), now()).unwrap();
        assert_eq!(job.location, "Remote");
        assert_eq!(job.workplace_type, "remote");
    }

    #[test]
    fn test_onsite_job_requires_location() {
        let err = prepare_job(make_request(WorkplaceType::Onsite, Some("  ")), now()).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_hybrid_job_keeps_location() {
        let job = prepare_job(make_request(WorkplaceType::Hybrid, Some("Berlin")), now()).unwrap();
        assert_eq!(job.location, "Berlin");
    }

    #[test]
    fn test_slug_and_normalized_fields() {
        let job = prepare_job(make_request(WorkplaceType::Remote, None), now()).unwrap();
        assert_eq!(job.title, "Senior Rust Engineer");
        assert_eq!(job.slug, "senior-rust-engineer-1700000000000");
        assert_eq!(job.requirements, vec!["5+ years Rust".to_string()]);
        assert_eq!(job.salary_range, None);
        assert_eq!(job.job_type.as_deref(), Some("full-time"));
        assert_eq!(job.source, "employer");
        assert_eq!(job.posted_at, now());
    }

    #[test]
    fn test_blank_title_rejected() {
        let mut request = make_request(WorkplaceType::Remote, None);
        request.title = "   ".to_string();
        assert!(prepare_job(request, now()).is_err());
    }

    #[test]
    fn test_request_deserializes_with_defaults() {
        let json = r#"{
            "company_id": "6f1f8a52-3f5e-4a8e-9a43-2f1c2d7c9b10",
            "title": "Designer",
            "type": "part-time",
            "workplace_type": "remote",
            "description": "Design things"
        }"#;
        let request: CreateJobRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.job_type, Some(JobType::PartTime));
        assert_eq!(request.source, JobSource::Employer);
        assert!(request.requirements.is_empty());
    }
}
