use chrono::NaiveDate;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, ValueEnum,
)]
pub enum JobType {
    #[serde(rename = "Full-time")]
    FullTime,
    #[serde(rename = "Part-time")]
    PartTime,
    Contract,
    Freelance,
    Internship,
}

impl fmt::Display for JobType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            JobType::FullTime => "Full-time",
            JobType::PartTime => "Part-time",
            JobType::Contract => "Contract",
            JobType::Freelance => "Freelance",
            JobType::Internship => "Internship",
        })
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, ValueEnum,
)]
pub enum WorkMode {
    Remote,
    Hybrid,
    #[serde(rename = "On-site")]
    OnSite,
}

impl fmt::Display for WorkMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            WorkMode::Remote => "Remote",
            WorkMode::Hybrid => "Hybrid",
            WorkMode::OnSite => "On-site",
        })
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, ValueEnum,
)]
pub enum Seniority {
    #[serde(rename = "Entry Level")]
    Entry,
    #[serde(rename = "Mid Level")]
    Mid,
    #[serde(rename = "Senior Level")]
    Senior,
    #[serde(rename = "Lead/Principal")]
    Lead,
    Executive,
}

impl fmt::Display for Seniority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Seniority::Entry => "Entry Level",
            Seniority::Mid => "Mid Level",
            Seniority::Senior => "Senior Level",
            Seniority::Lead => "Lead/Principal",
            Seniority::Executive => "Executive",
        })
    }
}

/// Recency bucket for the "posted within" facet.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, ValueEnum,
)]
pub enum PostedWithin {
    #[serde(rename = "1 day")]
    OneDay,
    #[serde(rename = "3 days")]
    ThreeDays,
    #[serde(rename = "1 week")]
    OneWeek,
    #[serde(rename = "2 weeks")]
    TwoWeeks,
    #[serde(rename = "1 month")]
    OneMonth,
}

impl PostedWithin {
    pub fn max_age_days(&self) -> u32 {
        match self {
            PostedWithin::OneDay => 1,
            PostedWithin::ThreeDays => 3,
            PostedWithin::OneWeek => 7,
            PostedWithin::TwoWeeks => 14,
            PostedWithin::OneMonth => 30,
        }
    }
}

impl fmt::Display for PostedWithin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PostedWithin::OneDay => "1 day",
            PostedWithin::ThreeDays => "3 days",
            PostedWithin::OneWeek => "1 week",
            PostedWithin::TwoWeeks => "2 weeks",
            PostedWithin::OneMonth => "1 month",
        })
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    Applied,
    Reviewing,
    Interview,
    Offer,
    Rejected,
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ApplicationStatus::Applied => "applied",
            ApplicationStatus::Reviewing => "reviewing",
            ApplicationStatus::Interview => "interview",
            ApplicationStatus::Offer => "offer",
            ApplicationStatus::Rejected => "rejected",
        })
    }
}

/// One job listing. Read-only within this tool; the catalog owns it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobPosting {
    pub id: String,
    pub title: String,
    pub company: String,
    pub location: String,
    /// 0-100, clamped on catalog load.
    pub match_percentage: u8,
    pub salary: Option<String>,
    pub posted_ago: String,
    pub job_type: JobType,
    pub work_mode: WorkMode,
    pub seniority: Seniority,
    #[serde(default)]
    pub matched_skills: Vec<String>,
    #[serde(default)]
    pub gap_skills: Vec<String>,
    #[serde(default)]
    pub requirements: Vec<String>,
    #[serde(default)]
    pub description: String,
}

/// A saved job alert. Its facets translate into filter criteria; keywords
/// are matched any-of against the posting text fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    pub job_type: JobType,
    pub work_mode: WorkMode,
    pub salary: Option<String>,
    pub location: Option<String>,
    pub posted_within: PostedWithin,
    pub is_active: bool,
}

/// Tracks one application to a posting. `job_id` is a back-link only;
/// records whose posting is gone are skipped at render time, not errors.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationRecord {
    pub id: String,
    pub job_id: String,
    pub status: ApplicationStatus,
    pub applied_date: NaiveDate,
    pub last_update: NaiveDate,
    pub notes: Option<String>,
}
