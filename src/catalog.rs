use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::models::{
    Alert, ApplicationRecord, ApplicationStatus, JobPosting, JobType, PostedWithin, Seniority,
    WorkMode,
};

/// The external job catalog: postings plus the alert and application seeds
/// for the session. Loaded from a JSON document; postings are read-only
/// once loaded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub jobs: Vec<JobPosting>,
    #[serde(default)]
    pub alerts: Vec<Alert>,
    #[serde(default)]
    pub applications: Vec<ApplicationRecord>,
    /// Job ids bookmarked before this session started.
    #[serde(default)]
    pub bookmarked: Vec<String>,
}

impl Catalog {
    pub fn load(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("Failed to read catalog file: {}", path.display()))?;
        let mut catalog: Catalog = serde_json::from_str(&data)
            .with_context(|| format!("Failed to parse catalog file: {}", path.display()))?;
        for job in &mut catalog.jobs {
            job.match_percentage = job.match_percentage.min(100);
        }
        Ok(catalog)
    }

    fn default_path() -> PathBuf {
        // Use XDG data directory or fallback
        if let Some(proj_dirs) = directories::ProjectDirs::from("", "", "scout") {
            proj_dirs.data_dir().join("catalog.json")
        } else {
            PathBuf::from("catalog.json")
        }
    }

    /// Explicit path, then the platform data directory, then the built-in
    /// sample so every command works out of the box.
    pub fn load_or_sample(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load(p),
            None => {
                let default = Self::default_path();
                if default.exists() {
                    Self::load(&default)
                } else {
                    Ok(Self::sample())
                }
            }
        }
    }

    pub fn job(&self, id: &str) -> Option<&JobPosting> {
        self.jobs.iter().find(|job| job.id == id)
    }

    pub fn alert(&self, id: &str) -> Option<&Alert> {
        self.alerts.iter().find(|alert| alert.id == id)
    }

    /// Built-in demo catalog.
    pub fn sample() -> Self {
        let strings = |items: &[&str]| -> Vec<String> {
            items.iter().map(|s| s.to_string()).collect()
        };

        let jobs = vec![
            JobPosting {
                id: "1".to_string(),
                title: "Senior Frontend Developer".to_string(),
                company: "TechFlow Inc".to_string(),
                location: "San Francisco, CA".to_string(),
                match_percentage: 92,
                salary: Some("$140k - $180k".to_string()),
                posted_ago: "2d ago".to_string(),
                job_type: JobType::FullTime,
                work_mode: WorkMode::Remote,
                seniority: Seniority::Senior,
                matched_skills: strings(&["React", "TypeScript", "JavaScript", "CSS", "Git"]),
                gap_skills: strings(&["GraphQL", "Next.js"]),
                requirements: strings(&[
                    "5+ years of React experience",
                    "Strong TypeScript skills",
                    "Experience with modern build tools",
                ]),
                description: "We're looking for a Senior Frontend Developer to join our growing \
                              team and help build the next generation of our platform."
                    .to_string(),
            },
            JobPosting {
                id: "2".to_string(),
                title: "Full Stack Engineer".to_string(),
                company: "DataVision Labs".to_string(),
                location: "New York, NY".to_string(),
                match_percentage: 87,
                salary: Some("$120k - $160k".to_string()),
                posted_ago: "1d ago".to_string(),
                job_type: JobType::FullTime,
                work_mode: WorkMode::Hybrid,
                seniority: Seniority::Mid,
                matched_skills: strings(&["React", "Node.js", "JavaScript", "PostgreSQL"]),
                gap_skills: strings(&["Redis", "Docker", "AWS"]),
                requirements: strings(&[
                    "3+ years full-stack development",
                    "React and Node.js experience",
                    "API development experience",
                ]),
                description: "Join our team to build scalable web applications that process \
                              millions of data points daily."
                    .to_string(),
            },
            JobPosting {
                id: "3".to_string(),
                title: "React Native Developer".to_string(),
                company: "MobileFirst Solutions".to_string(),
                location: "Austin, TX".to_string(),
                match_percentage: 78,
                salary: Some("$100k - $140k".to_string()),
                posted_ago: "3d ago".to_string(),
                job_type: JobType::FullTime,
                work_mode: WorkMode::OnSite,
                seniority: Seniority::Mid,
                matched_skills: strings(&["React", "JavaScript", "Git", "Redux"]),
                gap_skills: strings(&["React Native", "iOS Development"]),
                requirements: strings(&[
                    "React Native experience",
                    "Mobile app development",
                    "State management (Redux/Context)",
                ]),
                description: "Build beautiful mobile applications that delight users and drive \
                              business growth."
                    .to_string(),
            },
            JobPosting {
                id: "4".to_string(),
                title: "Frontend Team Lead".to_string(),
                company: "InnovateTech".to_string(),
                location: "Seattle, WA".to_string(),
                match_percentage: 85,
                salary: Some("$160k - $200k".to_string()),
                posted_ago: "1w ago".to_string(),
                job_type: JobType::FullTime,
                work_mode: WorkMode::Remote,
                seniority: Seniority::Lead,
                matched_skills: strings(&["React", "TypeScript", "Leadership", "Mentoring"]),
                gap_skills: strings(&["System Design", "Team Management"]),
                requirements: strings(&[
                    "7+ years frontend development",
                    "Team leadership experience",
                    "Architecture design skills",
                ]),
                description: "Lead a team of frontend developers while contributing to \
                              architecture decisions and mentoring junior developers."
                    .to_string(),
            },
        ];

        let alerts = vec![
            Alert {
                id: "1".to_string(),
                name: "Senior React Developer".to_string(),
                keywords: strings(&["React", "TypeScript", "Node.js"]),
                job_type: JobType::FullTime,
                work_mode: WorkMode::Remote,
                salary: Some("$120k - $180k".to_string()),
                location: Some("San Francisco, CA".to_string()),
                posted_within: PostedWithin::OneWeek,
                is_active: true,
            },
            Alert {
                id: "2".to_string(),
                name: "Product Manager - AI".to_string(),
                keywords: strings(&["Product Management", "AI", "Machine Learning"]),
                job_type: JobType::FullTime,
                work_mode: WorkMode::Hybrid,
                salary: Some("$140k - $200k".to_string()),
                location: Some("New York, NY".to_string()),
                posted_within: PostedWithin::ThreeDays,
                is_active: true,
            },
            Alert {
                id: "3".to_string(),
                name: "DevOps Engineer".to_string(),
                keywords: strings(&["AWS", "Docker", "Kubernetes"]),
                job_type: JobType::FullTime,
                work_mode: WorkMode::Remote,
                salary: Some("$110k - $160k".to_string()),
                location: None,
                posted_within: PostedWithin::OneMonth,
                is_active: false,
            },
        ];

        let applications = vec![
            ApplicationRecord {
                id: "1".to_string(),
                job_id: "1".to_string(),
                status: ApplicationStatus::Interview,
                applied_date: date(2024, 1, 15),
                last_update: date(2024, 1, 20),
                notes: Some("Technical interview scheduled for next week".to_string()),
            },
            ApplicationRecord {
                id: "2".to_string(),
                job_id: "2".to_string(),
                status: ApplicationStatus::Reviewing,
                applied_date: date(2024, 1, 18),
                last_update: date(2024, 1, 18),
                notes: None,
            },
            ApplicationRecord {
                id: "3".to_string(),
                job_id: "4".to_string(),
                status: ApplicationStatus::Applied,
                applied_date: date(2024, 1, 22),
                last_update: date(2024, 1, 22),
                notes: Some("Submitted through company website".to_string()),
            },
        ];

        Self {
            jobs,
            alerts,
            applications,
            bookmarked: vec!["1".to_string(), "2".to_string(), "3".to_string()],
        }
    }
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid sample date")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_sample_catalog_is_consistent() {
        let catalog = Catalog::sample();
        assert!(!catalog.jobs.is_empty());

        let ids: HashSet<&str> = catalog.jobs.iter().map(|j| j.id.as_str()).collect();
        assert_eq!(ids.len(), catalog.jobs.len());

        for job in &catalog.jobs {
            assert!(job.match_percentage <= 100);
        }
        for id in &catalog.bookmarked {
            assert!(catalog.job(id).is_some());
        }
        for app in &catalog.applications {
            assert!(catalog.job(&app.job_id).is_some());
        }
    }

    #[test]
    fn test_lookup_by_id() {
        let catalog = Catalog::sample();
        assert_eq!(catalog.job("1").map(|j| j.company.as_str()), Some("TechFlow Inc"));
        assert!(catalog.job("999").is_none());
        assert!(catalog.alert("3").is_some());
        assert!(catalog.alert("999").is_none());
    }

    #[test]
    fn test_parse_catalog_document() {
        let doc = r#"{
            "jobs": [{
                "id": "j1",
                "title": "Backend Engineer",
                "company": "Acme",
                "location": "Denver, CO",
                "matchPercentage": 120,
                "salary": "$130k - $150k",
                "postedAgo": "3d ago",
                "jobType": "Contract",
                "workMode": "On-site",
                "seniority": "Mid Level"
            }],
            "applications": [{
                "id": "a1",
                "jobId": "j1",
                "status": "applied",
                "appliedDate": "2024-01-10",
                "lastUpdate": "2024-01-12"
            }]
        }"#;

        let mut catalog: Catalog = serde_json::from_str(doc).unwrap();
        // load() clamps; mirror it here for the out-of-range fixture.
        for job in &mut catalog.jobs {
            job.match_percentage = job.match_percentage.min(100);
        }

        assert_eq!(catalog.jobs.len(), 1);
        let job = &catalog.jobs[0];
        assert_eq!(job.job_type, JobType::Contract);
        assert_eq!(job.work_mode, WorkMode::OnSite);
        assert_eq!(job.match_percentage, 100);
        assert!(job.matched_skills.is_empty());
        assert_eq!(catalog.applications[0].notes, None);
        assert!(catalog.alerts.is_empty());
    }
}
