use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::OnceLock;

use crate::models::{Alert, JobPosting, JobType, PostedWithin, Seniority, WorkMode};

/// Absolute salary bounds for the range facet, in USD.
pub const SALARY_FLOOR: u32 = 30_000;
pub const SALARY_CEILING: u32 = 300_000;

/// The active filter selection. An empty facet set means "match any value
/// for that facet"; the default salary range spans the absolute bounds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCriteria {
    pub job_types: BTreeSet<JobType>,
    pub work_modes: BTreeSet<WorkMode>,
    pub seniority: BTreeSet<Seniority>,
    pub posted_within: BTreeSet<PostedWithin>,
    /// (min, max), inclusive, always within SALARY_FLOOR..=SALARY_CEILING.
    pub salary_range: (u32, u32),
    pub query: String,
}

impl Default for FilterCriteria {
    fn default() -> Self {
        Self {
            job_types: BTreeSet::new(),
            work_modes: BTreeSet::new(),
            seniority: BTreeSet::new(),
            posted_within: BTreeSet::new(),
            salary_range: (SALARY_FLOOR, SALARY_CEILING),
            query: String::new(),
        }
    }
}

impl FilterCriteria {
    pub fn with_query(query: &str) -> Self {
        Self {
            query: query.to_string(),
            ..Self::default()
        }
    }

    /// Clamps both bounds into the absolute range and keeps min <= max.
    pub fn set_salary_range(&mut self, min: u32, max: u32) {
        let min = min.clamp(SALARY_FLOOR, SALARY_CEILING);
        let max = max.clamp(SALARY_FLOOR, SALARY_CEILING);
        self.salary_range = if min <= max { (min, max) } else { (max, min) };
    }
}

/// Decides whether one posting satisfies the criteria. Pure; never fails.
pub fn matches(job: &JobPosting, criteria: &FilterCriteria) -> bool {
    // Free text first: a miss rejects before any facet work.
    if !criteria.query.is_empty() && !text_matches(job, &criteria.query) {
        return false;
    }

    if !criteria.job_types.is_empty() && !criteria.job_types.contains(&job.job_type) {
        return false;
    }

    if !criteria.work_modes.is_empty() && !criteria.work_modes.contains(&job.work_mode) {
        return false;
    }

    if !criteria.seniority.is_empty() && !criteria.seniority.contains(&job.seniority) {
        return false;
    }

    if !criteria.posted_within.is_empty() {
        // Unparseable age stays in (fail-open).
        if let Some(age) = parse_posted_age_days(&job.posted_ago) {
            let within_any = criteria
                .posted_within
                .iter()
                .any(|bucket| age <= bucket.max_age_days());
            if !within_any {
                return false;
            }
        }
    }

    // Postings without a parseable salary always pass the salary facet;
    // missing data must not exclude a result.
    if let Some(salary) = job.salary.as_deref() {
        if let Some(value) = parse_salary_figure(salary) {
            let (min, max) = criteria.salary_range;
            if value < min || value > max {
                return false;
            }
        }
    }

    true
}

/// Case-insensitive substring match over title, company, location, the
/// work-mode name, and each matched skill.
pub fn text_matches(job: &JobPosting, query: &str) -> bool {
    let q = query.to_lowercase();
    job.title.to_lowercase().contains(&q)
        || job.company.to_lowercase().contains(&q)
        || job.location.to_lowercase().contains(&q)
        || job.work_mode.to_string().to_lowercase().contains(&q)
        || job
            .matched_skills
            .iter()
            .any(|skill| skill.to_lowercase().contains(&q))
}

/// Stable filter over a posting collection: surviving postings keep their
/// original relative order, and the input is untouched. An empty result is
/// a normal outcome, not an error.
pub fn apply(jobs: &[JobPosting], criteria: &FilterCriteria) -> Vec<JobPosting> {
    jobs.iter()
        .filter(|job| matches(job, criteria))
        .cloned()
        .collect()
}

/// Number of facets currently constraining the result, for the filter
/// badge. Each non-empty facet set counts once; a narrowed salary range
/// counts once.
pub fn count_active_facets(criteria: &FilterCriteria) -> usize {
    let mut count = 0;
    if !criteria.job_types.is_empty() {
        count += 1;
    }
    if !criteria.work_modes.is_empty() {
        count += 1;
    }
    if !criteria.seniority.is_empty() {
        count += 1;
    }
    if !criteria.posted_within.is_empty() {
        count += 1;
    }
    let (min, max) = criteria.salary_range;
    if min > SALARY_FLOOR || max < SALARY_CEILING {
        count += 1;
    }
    count
}

/// Extracts a representative figure from a salary display string like
/// "$120k - $180k": the first dollar amount, as a lower-bound proxy.
/// Returns None when nothing parseable is found.
pub fn parse_salary_figure(text: &str) -> Option<u32> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| {
        Regex::new(r"(?i)\$\s*(\d{1,3}(?:,\d{3})*)\s*(k)?").expect("salary pattern")
    });

    let caps = re.captures(text)?;
    let digits: String = caps[1].chars().filter(|c| c.is_ascii_digit()).collect();
    let num: u32 = digits.parse().ok()?;

    let value = if caps.get(2).is_some() {
        num.saturating_mul(1000)
    } else if num < 1000 {
        // Bare small figure, e.g. "$150 - $200": already in thousands.
        num.saturating_mul(1000)
    } else {
        num
    };
    Some(value)
}

/// Parses a posted-age display string ("2d ago", "1w ago", "3mo ago",
/// "Just posted") into an age in days. None when the format is unknown.
pub fn parse_posted_age_days(text: &str) -> Option<u32> {
    let lower = text.trim().to_lowercase();
    if lower.starts_with("just") || lower.starts_with("today") {
        return Some(0);
    }

    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"^(\d+)\s*(h|d|w|mo|m)").expect("posted-age pattern"));

    let caps = re.captures(&lower)?;
    let n: u32 = caps[1].parse().ok()?;
    match &caps[2] {
        "h" => Some(0),
        "d" => Some(n),
        "w" => Some(n.saturating_mul(7)),
        "mo" | "m" => Some(n.saturating_mul(30)),
        _ => None,
    }
}

impl Alert {
    /// Filter criteria equivalent to this alert's facet selection. The
    /// alert's keywords are not folded in here; see [`alert_matches`].
    pub fn criteria(&self) -> FilterCriteria {
        let mut criteria = FilterCriteria::default();
        criteria.job_types.insert(self.job_type);
        criteria.work_modes.insert(self.work_mode);
        criteria.posted_within.insert(self.posted_within);
        criteria
    }
}

/// A posting matches an alert when it satisfies the alert's facets and at
/// least one keyword (an alert without keywords matches on facets alone).
pub fn alert_matches(job: &JobPosting, alert: &Alert) -> bool {
    if !matches(job, &alert.criteria()) {
        return false;
    }
    if alert.keywords.is_empty() {
        return true;
    }
    alert.keywords.iter().any(|kw| text_matches(job, kw))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_job() -> JobPosting {
        JobPosting {
            id: "1".to_string(),
            title: "Senior Frontend Developer".to_string(),
            company: "TechFlow Inc".to_string(),
            location: "San Francisco, CA".to_string(),
            match_percentage: 92,
            salary: Some("$120k - $180k".to_string()),
            posted_ago: "2d ago".to_string(),
            job_type: JobType::FullTime,
            work_mode: WorkMode::Remote,
            seniority: Seniority::Senior,
            matched_skills: vec!["React".to_string(), "TypeScript".to_string()],
            gap_skills: vec!["GraphQL".to_string()],
            requirements: vec!["5+ years of React experience".to_string()],
            description: "Build the next generation of our platform.".to_string(),
        }
    }

    fn second_job() -> JobPosting {
        JobPosting {
            id: "2".to_string(),
            title: "Data Platform Engineer".to_string(),
            company: "DataVision Labs".to_string(),
            location: "New York, NY".to_string(),
            match_percentage: 81,
            salary: None,
            posted_ago: "1w ago".to_string(),
            job_type: JobType::Contract,
            work_mode: WorkMode::Hybrid,
            seniority: Seniority::Mid,
            matched_skills: vec!["Python".to_string()],
            gap_skills: vec![],
            requirements: vec![],
            description: String::new(),
        }
    }

    #[test]
    fn test_default_criteria_is_identity() {
        let jobs = vec![sample_job(), second_job()];
        let result = apply(&jobs, &FilterCriteria::default());
        assert_eq!(result.len(), 2);
        assert_eq!(result[0].id, "1");
        assert_eq!(result[1].id, "2");
    }

    #[test]
    fn test_apply_is_idempotent() {
        let jobs = vec![sample_job(), second_job()];
        let mut criteria = FilterCriteria::default();
        criteria.work_modes.insert(WorkMode::Remote);

        let once = apply(&jobs, &criteria);
        let twice = apply(&once, &criteria);
        assert_eq!(once.len(), twice.len());
        assert_eq!(once[0].id, twice[0].id);
    }

    #[test]
    fn test_single_element_round_trip() {
        let job = sample_job();
        let mut criteria = FilterCriteria::default();
        criteria.seniority.insert(Seniority::Senior);

        assert!(matches(&job, &criteria));
        assert_eq!(apply(std::slice::from_ref(&job), &criteria).len(), 1);

        criteria.seniority.clear();
        criteria.seniority.insert(Seniority::Entry);
        assert!(!matches(&job, &criteria));
        assert!(apply(std::slice::from_ref(&job), &criteria).is_empty());
    }

    #[test]
    fn test_job_type_facet_rejects() {
        let mut criteria = FilterCriteria::default();
        criteria.job_types.insert(JobType::Contract);
        assert!(!matches(&sample_job(), &criteria));
    }

    #[test]
    fn test_empty_facet_set_imposes_no_constraint() {
        let criteria = FilterCriteria::default();
        assert!(matches(&sample_job(), &criteria));
        assert!(matches(&second_job(), &criteria));
    }

    #[test]
    fn test_salary_above_upper_bound_rejects() {
        let mut criteria = FilterCriteria::default();
        criteria.set_salary_range(30_000, 100_000);
        // Parsed $120k exceeds the 100k ceiling.
        assert!(!matches(&sample_job(), &criteria));
    }

    #[test]
    fn test_missing_salary_fails_open() {
        let mut criteria = FilterCriteria::default();
        criteria.set_salary_range(30_000, 60_000);
        assert!(matches(&second_job(), &criteria));
    }

    #[test]
    fn test_unparseable_salary_fails_open() {
        let mut job = sample_job();
        job.salary = Some("Competitive".to_string());
        let mut criteria = FilterCriteria::default();
        criteria.set_salary_range(30_000, 60_000);
        assert!(matches(&job, &criteria));
    }

    #[test]
    fn test_query_matches_work_mode_name() {
        let criteria = FilterCriteria::with_query("remote");
        assert!(matches(&sample_job(), &criteria));
        assert!(!matches(&second_job(), &criteria));
    }

    #[test]
    fn test_query_matches_skills_case_insensitive() {
        let criteria = FilterCriteria::with_query("typescript");
        assert!(matches(&sample_job(), &criteria));

        let criteria = FilterCriteria::with_query("techflow");
        assert!(matches(&sample_job(), &criteria));

        let criteria = FilterCriteria::with_query("kubernetes");
        assert!(!matches(&sample_job(), &criteria));
    }

    #[test]
    fn test_posted_within_facet() {
        let mut criteria = FilterCriteria::default();
        criteria.posted_within.insert(PostedWithin::ThreeDays);
        assert!(matches(&sample_job(), &criteria)); // 2d ago
        assert!(!matches(&second_job(), &criteria)); // 1w ago

        criteria.posted_within.insert(PostedWithin::OneMonth);
        assert!(matches(&second_job(), &criteria)); // widest bucket wins
    }

    #[test]
    fn test_unparseable_posted_age_fails_open() {
        let mut job = sample_job();
        job.posted_ago = "a while back".to_string();
        let mut criteria = FilterCriteria::default();
        criteria.posted_within.insert(PostedWithin::OneDay);
        assert!(matches(&job, &criteria));
    }

    #[test]
    fn test_count_active_facets() {
        let mut criteria = FilterCriteria::default();
        assert_eq!(count_active_facets(&criteria), 0);

        criteria.job_types.insert(JobType::FullTime);
        criteria.job_types.insert(JobType::Contract);
        assert_eq!(count_active_facets(&criteria), 1); // one facet, two values

        criteria.work_modes.insert(WorkMode::Remote);
        criteria.set_salary_range(50_000, 300_000);
        assert_eq!(count_active_facets(&criteria), 3);

        // A query is not a facet.
        criteria.query = "react".to_string();
        assert_eq!(count_active_facets(&criteria), 3);
    }

    #[test]
    fn test_criteria_equality_is_element_wise() {
        let mut a = FilterCriteria::default();
        let mut b = FilterCriteria::default();
        assert_eq!(a, b);

        a.work_modes.insert(WorkMode::Hybrid);
        assert_ne!(a, b);
        b.work_modes.insert(WorkMode::Hybrid);
        assert_eq!(a, b);
    }

    #[test]
    fn test_set_salary_range_clamps_and_orders() {
        let mut criteria = FilterCriteria::default();
        criteria.set_salary_range(10_000, 400_000);
        assert_eq!(criteria.salary_range, (SALARY_FLOOR, SALARY_CEILING));

        criteria.set_salary_range(200_000, 100_000);
        assert_eq!(criteria.salary_range, (100_000, 200_000));
    }

    #[test]
    fn test_parse_salary_figure() {
        assert_eq!(parse_salary_figure("$120k - $180k"), Some(120_000));
        assert_eq!(parse_salary_figure("$95k"), Some(95_000));
        assert_eq!(parse_salary_figure("$150,000 - $200,000"), Some(150_000));
        assert_eq!(parse_salary_figure("from $85K"), Some(85_000));
        assert_eq!(parse_salary_figure("Competitive"), None);
        assert_eq!(parse_salary_figure(""), None);
    }

    #[test]
    fn test_parse_posted_age_days() {
        assert_eq!(parse_posted_age_days("2d ago"), Some(2));
        assert_eq!(parse_posted_age_days("1w ago"), Some(7));
        assert_eq!(parse_posted_age_days("3mo ago"), Some(90));
        assert_eq!(parse_posted_age_days("5h ago"), Some(0));
        assert_eq!(parse_posted_age_days("Just posted"), Some(0));
        assert_eq!(parse_posted_age_days("a while back"), None);
    }

    #[test]
    fn test_alert_matches() {
        let alert = Alert {
            id: "a1".to_string(),
            name: "Senior React".to_string(),
            keywords: vec!["React".to_string(), "Node.js".to_string()],
            job_type: JobType::FullTime,
            work_mode: WorkMode::Remote,
            salary: None,
            location: None,
            posted_within: PostedWithin::OneWeek,
            is_active: true,
        };

        assert!(alert_matches(&sample_job(), &alert));
        // Contract/Hybrid posting fails the alert facets.
        assert!(!alert_matches(&second_job(), &alert));

        let mut miss = sample_job();
        miss.title = "Staff Accountant".to_string();
        miss.matched_skills = vec!["Excel".to_string()];
        assert!(!alert_matches(&miss, &alert));
    }
}
