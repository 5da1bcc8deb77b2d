//! Job recommendation scoring: a pluggable ranker that matches a candidate
//! profile against the job feed.
//!
//! Default: `HeuristicRecommender` (pure, deterministic substring heuristics).
//!
//! `AppState` holds an `Arc<dyn JobRecommender>`, chosen at startup.

use serde::Serialize;

use crate::models::job::Job;
use crate::models::user::UserRow;

/// How many matches a recommendation pass returns.
pub const MAX_RECOMMENDATIONS: usize = 3;

const SKILL_MATCH_POINTS: u32 = 15;
const HEADLINE_MATCH_POINTS: u32 = 25;
const REMOTE_POINTS: u32 = 10;
const LOCAL_POINTS: u32 = 20;
/// Headline words must be longer than this to count.
const MIN_HEADLINE_WORD_LEN: usize = 3;
/// Matched tags named in the skills reason.
const REASON_TAG_LIMIT: usize = 2;

pub const REASON_HEADLINE: &str = "Matches your headline role";
pub const REASON_REMOTE: &str = "Remote opportunity";
pub const REASON_LOCAL: &str = "In your location";

// ────────────────────────────────────────────────────────────────────────────
// Data models
// ────────────────────────────────────────────────────────────────────────────

/// The profile attributes the recommender reads.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CandidateProfile {
    pub skills: Vec<String>,
    pub headline: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
}

impl From<&UserRow> for CandidateProfile {
    fn from(user: &UserRow) -> Self {
        Self {
            skills: user.skills.clone(),
            headline: user.headline.clone(),
            city: user.city.clone(),
            country: user.country.clone(),
        }
    }
}

/// A job paired with its heuristic score and the reasons behind it.
/// `score` is an unbounded sum; clamp for display with [`ScoredMatch::match_percent`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredMatch<'a> {
    pub job: &'a Job,
    pub score: u32,
    pub reasons: Vec<String>,
}

impl ScoredMatch<'_> {
    pub fn match_percent(&self) -> u32 {
        self.score.min(100)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

/// Ranks jobs for a candidate. Implement this to swap ranking backends
/// without touching the handler.
pub trait JobRecommender: Send + Sync {
    fn recommend<'a>(
        &self,
        candidate: &CandidateProfile,
        jobs: &'a [Job],
    ) -> Vec<ScoredMatch<'a>>;

    /// Backend label reported to clients.
    fn backend(&self) -> &'static str;
}

/// Substring-heuristic recommender: skill/tag overlap, headline/title overlap
/// and location affinity, summed without normalization.
pub struct HeuristicRecommender;

impl JobRecommender for HeuristicRecommender {
    fn recommend<'a>(
        &self,
        candidate: &CandidateProfile,
        jobs: &'a [Job],
    ) -> Vec<ScoredMatch<'a>> {
        recommend_jobs(candidate, jobs, MAX_RECOMMENDATIONS)
    }

    fn backend(&self) -> &'static str {
        "heuristic"
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Core heuristic
// ────────────────────────────────────────────────────────────────────────────

/// Scores every job, drops zero scores and returns the top `limit` by score.
/// The sort is stable: equal scores keep their feed order.
pub fn recommend_jobs<'a>(
    candidate: &CandidateProfile,
    jobs: &'a [Job],
    limit: usize,
) -> Vec<ScoredMatch<'a>> {
    let mut scored: Vec<ScoredMatch<'a>> = jobs
        .iter()
        .map(|job| score_job(candidate, job))
        .filter(|m| m.score > 0)
        .collect();

    scored.sort_by(|a, b| b.score.cmp(&a.score));
    scored.truncate(limit);
    scored
}

/// Scores a single job against the candidate.
pub fn score_job<'a>(candidate: &CandidateProfile, job: &'a Job) -> ScoredMatch<'a> {
    let mut score = 0;
    let mut reasons = Vec::new();

    // 1. Skill overlap
    let matched_tags = matching_tags(&candidate.skills, &job.tags);
    if !matched_tags.is_empty() {
        score += SKILL_MATCH_POINTS * matched_tags.len() as u32;
        let named: Vec<&str> = matched_tags
            .iter()
            .take(REASON_TAG_LIMIT)
            .map(String::as_str)
            .collect();
        reasons.push(format!("Matches skills: {}", named.join(", ")));
    }

    // 2. Headline/title overlap, flat bonus
    if let Some(headline) = non_blank(candidate.headline.as_deref()) {
        if headline_matches_title(headline, &job.title) {
            score += HEADLINE_MATCH_POINTS;
            reasons.push(REASON_HEADLINE.to_string());
        }
    }

    // 3. Location affinity
    let city = non_blank(candidate.city.as_deref());
    let country = non_blank(candidate.country.as_deref());
    if city.is_some() || country.is_some() {
        match location_affinity(city, country, &job.location) {
            Some(LocationAffinity::Remote) => {
                score += REMOTE_POINTS;
                reasons.push(REASON_REMOTE.to_string());
            }
            Some(LocationAffinity::Local) => {
                score += LOCAL_POINTS;
                reasons.push(REASON_LOCAL.to_string());
            }
            None => {}
        }
    }

    ScoredMatch { job, score, reasons }
}

/// Lower-cased job tags that contain, or are contained in, any candidate skill.
fn matching_tags(skills: &[String], tags: &[String]) -> Vec<String> {
    let skills: Vec<String> = skills
        .iter()
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect();
    if skills.is_empty() {
        return Vec::new();
    }

    tags.iter()
        .map(|t| t.trim().to_lowercase())
        .filter(|tag| !tag.is_empty())
        .filter(|tag| {
            skills
                .iter()
                .any(|skill| tag.contains(skill.as_str()) || skill.contains(tag.as_str()))
        })
        .collect()
}

fn headline_matches_title(headline: &str, title: &str) -> bool {
    let title = title.to_lowercase();
    headline
        .to_lowercase()
        .split(' ')
        .any(|word| word.chars().count() > MIN_HEADLINE_WORD_LEN && title.contains(word))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LocationAffinity {
    Remote,
    Local,
}

fn location_affinity(
    city: Option<&str>,
    country: Option<&str>,
    job_location: &str,
) -> Option<LocationAffinity> {
    let job_location = job_location.trim().to_lowercase();
    if job_location.is_empty() {
        return None;
    }

    if job_location.contains("remote") || job_location.contains("worldwide") {
        return Some(LocationAffinity::Remote);
    }

    let combined = [city, country]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();
    let city_match = city
        .map(|c| job_location.contains(c.to_lowercase().as_str()))
        .unwrap_or(false);

    if job_location.contains(combined.as_str())
        || combined.contains(job_location.as_str())
        || city_match
    {
        Some(LocationAffinity::Local)
    } else {
        None
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use uuid::Uuid;

    fn make_job(title: &str, tags: &[&str], location: &str) -> Job {
        Job {
            id: Uuid::new_v4(),
            title: title.to_string(),
            slug: title.to_lowercase().replace(' ', "-"),
            company_id: None,
            company_name: "Acme".to_string(),
            company_logo_url: None,
            location: location.to_string(),
            workplace_type: None,
            location_lat: None,
            location_lng: None,
            location_place_id: None,
            job_type: None,
            salary_range: None,
            posted_at: Utc::now() - Duration::days(1),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            description: None,
            requirements: vec![],
            benefits: vec![],
            application_url: None,
            status: "active".to_string(),
        }
    }

    fn make_candidate(
        skills: &[&str],
        headline: Option<&str>,
        city: Option<&str>,
        country: Option<&str>,
    ) -> CandidateProfile {
        CandidateProfile {
            skills: skills.iter().map(|s| s.to_string()).collect(),
            headline: headline.map(String::from),
            city: city.map(String::from),
            country: country.map(String::from),
        }
    }

    #[test]
    fn test_empty_profile_scores_nothing() {
        let candidate = CandidateProfile::default();
        let jobs = vec![
            make_job("React Developer", &["React"], "Remote (Worldwide)"),
            make_job("Data Analyst", &["SQL"], "Austin, USA"),
        ];

        for job in &jobs {
            assert_eq!(score_job(&candidate, job).score, 0);
        }
        assert!(recommend_jobs(&candidate, &jobs, MAX_RECOMMENDATIONS).is_empty());
    }

    #[test]
    fn test_remote_only_scores_exactly_ten() {
        let candidate = make_candidate(&[], None, Some("Lisbon"), Some("Portugal"));
        let job = make_job("Accountant", &[], "REMOTE - EMEA");

        let scored = score_job(&candidate, &job);
        assert_eq!(scored.score, 10);
        assert_eq!(scored.reasons, vec![REASON_REMOTE.to_string()]);
    }

    #[test]
    fn test_worldwide_counts_as_remote() {
        let candidate = make_candidate(&[], None, None, Some("India"));
        let job = make_job("Accountant", &[], "Anywhere (Worldwide)");
        assert_eq!(score_job(&candidate, &job).score, 10);
    }

    #[test]
    fn test_single_skill_match_is_fifteen() {
        let candidate = make_candidate(&["react"], None, None, None);
        let job = make_job("Engineer", &["React", "Frontend"], "Berlin");

        let scored = score_job(&candidate, &job);
        assert_eq!(scored.score, 15);
        assert_eq!(scored.reasons, vec!["Matches skills: react".to_string()]);
    }

    #[test]
    fn test_skill_match_works_in_both_directions() {
        // "js" is inside "node.js"; "typescript" contains tag "type"
        let candidate = make_candidate(&["js", "TypeScript"], None, None, None);
        let job = make_job("Engineer", &["Node.js", "type", "Go"], "Berlin");

        let scored = score_job(&candidate, &job);
        assert_eq!(scored.score, 30);
        assert_eq!(scored.reasons, vec!["Matches skills: node.js, type".to_string()]);
    }

    #[test]
    fn test_skills_reason_names_at_most_two_tags() {
        let candidate = make_candidate(&["rust", "go", "sql"], None, None, None);
        let job = make_job("Engineer", &["Rust", "Go", "SQL"], "Berlin");

        let scored = score_job(&candidate, &job);
        assert_eq!(scored.score, 45);
        assert_eq!(scored.reasons, vec!["Matches skills: rust, go".to_string()]);
    }

    #[test]
    fn test_blank_skills_and_tags_never_match() {
        let candidate = make_candidate(&["", "  "], None, None, None);
        let job = make_job("Engineer", &["Rust", ""], "Berlin");
        assert_eq!(score_job(&candidate, &job).score, 0);

        let candidate = make_candidate(&["rust"], None, None, None);
        let job = make_job("Engineer", &["", " "], "Berlin");
        assert_eq!(score_job(&candidate, &job).score, 0);
    }

    #[test]
    fn test_headline_bonus_is_flat() {
        let candidate = make_candidate(&[], Some("Senior React Developer"), None, None);
        let job = make_job("React Developer", &[], "Berlin");

        let scored = score_job(&candidate, &job);
        // "senior" misses; "react" and "developer" both hit, still only 25
        assert_eq!(scored.score, 25);
        assert_eq!(scored.reasons, vec![REASON_HEADLINE.to_string()]);
    }

    #[test]
    fn test_short_headline_words_are_ignored() {
        let candidate = make_candidate(&[], Some("QA Dev Ops"), None, None);
        let job = make_job("QA Dev Ops Lead", &[], "Berlin");
        assert_eq!(score_job(&candidate, &job).score, 0);
    }

    #[test]
    fn test_local_match_on_city() {
        let candidate = make_candidate(&[], None, Some("Austin"), Some("USA"));
        let job = make_job("Engineer", &[], "Austin, TX");

        let scored = score_job(&candidate, &job);
        assert_eq!(scored.score, 20);
        assert_eq!(scored.reasons, vec![REASON_LOCAL.to_string()]);
    }

    #[test]
    fn test_local_match_when_job_location_is_inside_candidate_location() {
        let candidate = make_candidate(&[], None, Some("Pune"), Some("India"));
        let job = make_job("Engineer", &[], "India");
        assert_eq!(score_job(&candidate, &job).score, 20);
    }

    #[test]
    fn test_local_match_on_country_only_profile() {
        let candidate = make_candidate(&[], None, None, Some("Germany"));
        let job = make_job("Engineer", &[], "Munich, Germany");
        assert_eq!(score_job(&candidate, &job).score, 20);
    }

    #[test]
    fn test_remote_takes_precedence_over_local() {
        let candidate = make_candidate(&[], None, Some("Austin"), None);
        let job = make_job("Engineer", &[], "Remote (Austin preferred)");

        let scored = score_job(&candidate, &job);
        assert_eq!(scored.score, 10);
        assert_eq!(scored.reasons, vec![REASON_REMOTE.to_string()]);
    }

    #[test]
    fn test_blank_job_location_never_matches() {
        let candidate = make_candidate(&[], None, Some("Austin"), Some("USA"));
        let job = make_job("Engineer", &[], "   ");
        assert_eq!(score_job(&candidate, &job).score, 0);
    }

    #[test]
    fn test_unrelated_job_is_excluded() {
        let candidate = make_candidate(
            &["python"],
            Some("Data Analyst"),
            Some("Austin"),
            Some("USA"),
        );
        let jobs = vec![make_job("Pastry Chef", &["Baking"], "Paris, France")];
        assert!(recommend_jobs(&candidate, &jobs, MAX_RECOMMENDATIONS).is_empty());
    }

    #[test]
    fn test_worked_example_scores_sixty_five() {
        let candidate = make_candidate(
            &["python", "sql"],
            Some("Data Analyst"),
            Some("Austin"),
            Some("USA"),
        );
        let job = make_job(
            "Senior Data Analyst",
            &["SQL", "Python", "Remote"],
            "Remote (Worldwide)",
        );

        let scored = score_job(&candidate, &job);
        assert_eq!(scored.score, 65);
        assert_eq!(
            scored.reasons,
            vec![
                "Matches skills: sql, python".to_string(),
                REASON_HEADLINE.to_string(),
                REASON_REMOTE.to_string(),
            ]
        );
    }

    #[test]
    fn test_results_capped_and_sorted_descending() {
        let candidate = make_candidate(&["rust", "go", "sql"], None, Some("Berlin"), None);
        let jobs = vec![
            make_job("A", &["Rust"], "Paris"),              // 15
            make_job("B", &["Rust", "Go"], "Berlin"),       // 50
            make_job("C", &[], "Remote"),                   // 10
            make_job("D", &["Rust", "Go", "SQL"], "Paris"), // 45
            make_job("E", &["Go"], "Remote"),               // 25
        ];

        let top = recommend_jobs(&candidate, &jobs, MAX_RECOMMENDATIONS);
        assert_eq!(top.len(), 3);
        let titles: Vec<&str> = top.iter().map(|m| m.job.title.as_str()).collect();
        assert_eq!(titles, vec!["B", "D", "E"]);
        assert!(top.windows(2).all(|w| w[0].score >= w[1].score));
    }

    #[test]
    fn test_ties_keep_feed_order() {
        let candidate = make_candidate(&["rust"], None, None, None);
        let jobs = vec![
            make_job("First", &["Rust"], "Paris"),
            make_job("Second", &["Rust"], "Paris"),
            make_job("Third", &["Rust"], "Paris"),
        ];

        let top = recommend_jobs(&candidate, &jobs, MAX_RECOMMENDATIONS);
        let titles: Vec<&str> = top.iter().map(|m| m.job.title.as_str()).collect();
        assert_eq!(titles, vec!["First", "Second", "Third"]);
    }

    #[test]
    fn test_recommendation_is_idempotent() {
        let candidate = make_candidate(
            &["react", "node"],
            Some("Frontend Engineer"),
            Some("Austin"),
            Some("USA"),
        );
        let jobs = vec![
            make_job("Frontend Engineer", &["React"], "Austin, USA"),
            make_job("Backend Engineer", &["Node"], "Remote"),
            make_job("Designer", &["Figma"], "Paris"),
        ];

        let first = HeuristicRecommender.recommend(&candidate, &jobs);
        let second = HeuristicRecommender.recommend(&candidate, &jobs);
        assert_eq!(first, second);
    }

    #[test]
    fn test_match_percent_clamps_display_only() {
        let candidate = make_candidate(
            &["rust", "go", "sql", "aws", "k8s", "linux"],
            Some("Platform Engineer"),
            Some("Berlin"),
            None,
        );
        let job = make_job(
            "Platform Engineer",
            &["Rust", "Go", "SQL", "AWS", "K8s", "Linux"],
            "Berlin",
        );

        let scored = score_job(&candidate, &job);
        assert_eq!(scored.score, 90 + 25 + 20);
        assert_eq!(scored.match_percent(), 100);
    }

    #[test]
    fn test_backend_label_is_heuristic() {
        assert_eq!(HeuristicRecommender.backend(), "heuristic");
    }
}
