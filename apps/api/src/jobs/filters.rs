//! Job feed filters.
//!
//! Cheap filters are pushed into SQL by the repository; the fuzzy ones
//! (company name, tenure, salary floor) run here over the fetched page.

use std::sync::LazyLock;

use chrono::{DateTime, Duration, Utc};
use regex::Regex;
use serde::Deserialize;
use uuid::Uuid;

use crate::models::job::Job;

pub const DEFAULT_PAGE_SIZE: i64 = 50;
pub const MAX_PAGE_SIZE: i64 = 100;

static FIRST_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+").expect("static salary regex"));

/// Query parameters accepted by `GET /api/v1/jobs`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct JobFilters {
    pub keyword: Option<String>,
    pub role: Option<String>,
    pub location: Option<String>,
    #[serde(rename = "type")]
    pub job_type: Option<String>,
    pub company_id: Option<Uuid>,
    pub company_name: Option<String>,
    pub tenure: Option<String>,
    pub salary_min: Option<u64>,
    pub date_posted: Option<DatePosted>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl JobFilters {
    pub fn keyword(&self) -> Option<&str> {
        non_blank(self.keyword.as_deref())
    }

    pub fn role(&self) -> Option<&str> {
        non_blank(self.role.as_deref())
    }

    pub fn location(&self) -> Option<&str> {
        non_blank(self.location.as_deref())
    }

    pub fn job_type(&self) -> Option<&str> {
        non_blank(self.job_type.as_deref())
    }

    /// `(limit, offset)` with the limit clamped to `1..=MAX_PAGE_SIZE`.
    pub fn page(&self) -> (i64, i64) {
        let limit = self
            .limit
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE);
        let offset = self.offset.unwrap_or(0).max(0);
        (limit, offset)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum DatePosted {
    #[serde(rename = "24h")]
    LastDay,
    #[serde(rename = "7d")]
    LastWeek,
    #[serde(rename = "30d")]
    LastMonth,
    #[serde(rename = "all")]
    All,
}

impl DatePosted {
    /// Earliest `posted_at` admitted by this window, if any.
    pub fn cutoff(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        let days = match self {
            DatePosted::LastDay => 1,
            DatePosted::LastWeek => 7,
            DatePosted::LastMonth => 30,
            DatePosted::All => return None,
        };
        Some(now - Duration::days(days))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tenure {
    Entry,
    Mid,
    Senior,
    Manager,
}

impl Tenure {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "entry" | "junior" => Some(Tenure::Entry),
            "mid" => Some(Tenure::Mid),
            "senior" => Some(Tenure::Senior),
            "manager" => Some(Tenure::Manager),
            _ => None,
        }
    }

    /// Keyword test over the job's title and tags.
    pub fn matches(&self, job: &Job) -> bool {
        let text = format!("{} {}", job.title, job.tags.join(" ")).to_lowercase();
        let has = |words: &[&str]| words.iter().any(|w| text.contains(w));
        match self {
            Tenure::Entry => has(&["junior", "entry", "intern", "associate"]),
            Tenure::Senior => has(&["senior", "lead", "principal", "staff"]),
            Tenure::Manager => has(&["manager", "head", "director", "vp"]),
            Tenure::Mid => !has(&["senior", "lead", "junior", "intern", "manager"]),
        }
    }
}

/// Annual salary floor read from free-text compensation.
///
/// Takes the first integer in the text; anything under 1000 is read as
/// thousands ("$90k - $120k" → 90 000).
pub fn parse_salary_floor(salary_range: &str) -> Option<u64> {
    let digits = FIRST_NUMBER.find(salary_range)?;
    let amount: u64 = digits.as_str().parse().ok()?;
    if amount < 1000 {
        amount.checked_mul(1000)
    } else {
        Some(amount)
    }
}

/// Applies the filters that are not expressed in SQL.
pub fn apply_post_filters(jobs: Vec<Job>, filters: &JobFilters) -> Vec<Job> {
    let company_name = non_blank(filters.company_name.as_deref()).map(str::to_lowercase);
    // Unknown tenure values do not filter
    let tenure = filters.tenure.as_deref().and_then(Tenure::parse);

    jobs.into_iter()
        .filter(|job| match &company_name {
            Some(name) => job.company_name.to_lowercase().contains(name.as_str()),
            None => true,
        })
        .filter(|job| tenure.map(|t| t.matches(job)).unwrap_or(true))
        // A zero floor is the "any salary" default
        .filter(|job| match filters.salary_min {
            Some(min) if min > 0 => job
                .salary_range
                .as_deref()
                .and_then(parse_salary_floor)
                .map(|amount| amount >= min)
                .unwrap_or(false),
            _ => true,
        })
        .collect()
}

/// Escapes `%`, `_` and `\` so user input matches literally inside ILIKE.
pub fn like_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
