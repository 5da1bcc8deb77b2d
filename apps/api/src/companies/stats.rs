use serde::Serialize;

use crate::models::job::{Job, JobRow, ACTIVE_STATUSES};

const RECENT_JOBS: usize = 5;

/// Employer dashboard summary.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardStats {
    pub active_jobs: usize,
    pub total_jobs: usize,
    /// No applicant tracking yet; always 0.
    pub total_applicants: u64,
    /// No view tracking yet; always 0.
    pub total_views: u64,
    pub recent_jobs: Vec<Job>,
}

/// Aggregates a company's jobs. `rows` must be ordered newest first.
pub fn compute_dashboard(rows: Vec<JobRow>) -> DashboardStats {
    let total_jobs = rows.len();
    let active_jobs = rows
        .iter()
        .filter(|row| ACTIVE_STATUSES.contains(&row.status.as_str()))
        .count();
    let recent_jobs = rows.into_iter().take(RECENT_JOBS).map(Job::from).collect();

    DashboardStats {
        active_jobs,
        total_jobs,
        total_applicants: 0,
        total_views: 0,
        recent_jobs,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use uuid::Uuid;

    fn make_row(title: &str, status: &str, age_days: i64) -> JobRow {
        JobRow {
            id: Uuid::new_v4(),
            company_id: None,
            title: title.to_string(),
            slug: title.to_lowercase(),
            job_type: None,
            workplace_type: None,
            location: "Remote".to_string(),
            location_lat: None,
            location_lng: None,
            location_place_id: None,
            salary_range: None,
            description: None,
            requirements: vec![],
            benefits: vec![],
            tags: vec![],
            application_url: None,
            status: status.to_string(),
            source: "employer".to_string(),
            posted_at: Utc::now() - Duration::days(age_days),
            company_name: Some("Acme".to_string()),
            company_logo_url: None,
        }
    }

    #[test]
    fn test_counts_only_active_and_published() {
        let rows = vec![
            make_row("A", "active", 0),
            make_row("B", "published", 1),
            make_row("C", "closed", 2),
            make_row("D", "approved", 3),
        ];
        let stats = compute_dashboard(rows);
        assert_eq!(stats.active_jobs, 2);
        assert_eq!(stats.total_jobs, 4);
        assert_eq!(stats.total_applicants, 0);
        assert_eq!(stats.total_views, 0);
    }

    #[test]
    fn test_recent_jobs_keeps_first_five() {
        let rows: Vec<JobRow> = (0..7)
            .map(|i| make_row(&format!("Job{i}"), "active", i))
            .collect();
        let stats = compute_dashboard(rows);
        let titles: Vec<&str> = stats.recent_jobs.iter().map(|j| j.title.as_str()).collect();
        assert_eq!(titles, vec!["Job0", "Job1", "Job2", "Job3", "Job4"]);
    }

    #[test]
    fn test_empty_company() {
        let stats = compute_dashboard(vec![]);
        assert_eq!(stats.total_jobs, 0);
        assert!(stats.recent_jobs.is_empty());
    }
}
