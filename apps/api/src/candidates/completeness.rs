//! Profile completeness: a weighted score plus the fields a job seeker
//! must fill before applying.

use serde::Serialize;

use crate::models::user::UserRow;

const MIN_BIO_CHARS: usize = 50;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CompletenessReport {
    /// 0-100.
    pub score: u32,
    pub missing_fields: Vec<&'static str>,
}

fn filled(value: &Option<String>) -> bool {
    value.as_deref().map(|v| !v.trim().is_empty()).unwrap_or(false)
}

pub fn profile_score(user: &UserRow) -> u32 {
    let weights: [(bool, u32); 13] = [
        (filled(&user.full_name), 10),
        (!user.email.trim().is_empty(), 5),
        (filled(&user.phone), 5),
        (filled(&user.city) || filled(&user.country), 5),
        (filled(&user.headline), 10),
        (
            user.bio
                .as_deref()
                .map(|b| b.chars().count() > MIN_BIO_CHARS)
                .unwrap_or(false),
            10,
        ),
        (filled(&user.linkedin_url) || filled(&user.portfolio_url), 5),
        (!user.skills.is_empty(), 10),
        (!user.work_experience.is_empty(), 10),
        (!user.education.is_empty(), 5),
        (filled(&user.resume_url), 15),
        (user.job_preferences.is_some(), 5),
        (!user.interests.is_empty(), 5),
    ];

    let score: u32 = weights
        .iter()
        .filter(|(present, _)| *present)
        .map(|(_, points)| *points)
        .sum();
    score.min(100)
}

/// Mandatory fields still empty, in display order.
pub fn missing_mandatory_fields(user: &UserRow) -> Vec<&'static str> {
    let checks = [
        (filled(&user.full_name), "Full Name"),
        (filled(&user.phone), "Phone Number"),
        (filled(&user.city) && filled(&user.country), "Location"),
        (filled(&user.headline), "Professional Headline"),
        (!user.skills.is_empty(), "Skills"),
        (filled(&user.resume_url), "Resume"),
    ];
    checks
        .iter()
        .filter(|(present, _)| !present)
        .map(|(_, label)| *label)
        .collect()
}

pub fn completeness_report(user: &UserRow) -> CompletenessReport {
    CompletenessReport {
        score: profile_score(user),
        missing_fields: missing_mandatory_fields(user),
    }
}
