mod catalog;
mod filter;
mod models;
mod store;
mod tui;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use catalog::Catalog;
use filter::FilterCriteria;
use models::{ApplicationStatus, JobPosting, JobType, PostedWithin, Seniority, WorkMode};
use store::{ApplicationTracker, BookmarkSet};

#[derive(Parser)]
#[command(name = "scout")]
#[command(about = "Job search companion - filter, bookmark, and track opportunities")]
struct Cli {
    /// Path to a catalog JSON file (defaults to the data dir, then the built-in sample)
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Default)]
struct FilterArgs {
    /// Search titles, companies, locations, and skills
    #[arg(short, long)]
    query: Option<String>,

    /// Filter by job type (repeatable)
    #[arg(long = "job-type", value_enum)]
    job_types: Vec<JobType>,

    /// Filter by work mode (repeatable)
    #[arg(long = "work-mode", value_enum)]
    work_modes: Vec<WorkMode>,

    /// Filter by seniority level (repeatable)
    #[arg(long, value_enum)]
    seniority: Vec<Seniority>,

    /// Only show jobs posted within a window (repeatable)
    #[arg(long = "posted-within", value_enum)]
    posted_within: Vec<PostedWithin>,

    /// Lowest acceptable salary in USD
    #[arg(long)]
    salary_min: Option<u32>,

    /// Highest acceptable salary in USD
    #[arg(long)]
    salary_max: Option<u32>,
}

impl FilterArgs {
    fn criteria(&self) -> FilterCriteria {
        let mut criteria = FilterCriteria::default();
        criteria.query = self.query.clone().unwrap_or_default();
        criteria.job_types = self.job_types.iter().copied().collect();
        criteria.work_modes = self.work_modes.iter().copied().collect();
        criteria.seniority = self.seniority.iter().copied().collect();
        criteria.posted_within = self.posted_within.iter().copied().collect();
        if self.salary_min.is_some() || self.salary_max.is_some() {
            criteria.set_salary_range(
                self.salary_min.unwrap_or(filter::SALARY_FLOOR),
                self.salary_max.unwrap_or(filter::SALARY_CEILING),
            );
        }
        criteria
    }
}

#[derive(Subcommand)]
enum Commands {
    /// List jobs matching the given filters
    Jobs {
        #[command(flatten)]
        filters: FilterArgs,
    },

    /// Show job details
    Show {
        /// Job ID
        id: String,
    },

    /// List job alerts with live match counts
    Alerts,

    /// List jobs matching one alert
    AlertJobs {
        /// Alert ID
        id: String,

        /// Narrow the alert's results with a search query
        #[arg(short, long)]
        query: Option<String>,
    },

    /// List bookmarked jobs
    Bookmarks {
        /// Search within bookmarks
        #[arg(short, long)]
        query: Option<String>,
    },

    /// Toggle a bookmark
    Bookmark {
        /// Job ID
        job_id: String,
    },

    /// Remove a bookmark
    Unbookmark {
        /// Job ID
        job_id: String,
    },

    /// List tracked applications
    Applications,

    /// Update an application's status
    ApplicationStatus {
        /// Application ID
        id: String,

        #[arg(value_enum)]
        status: ApplicationStatus,
    },

    /// Set an application's notes (omit the text to clear them)
    ApplicationNotes {
        /// Application ID
        id: String,

        text: Option<String>,
    },

    /// Browse jobs interactively
    Browse {
        #[command(flatten)]
        filters: FilterArgs,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let catalog = Catalog::load_or_sample(cli.catalog.as_deref())?;
    let mut bookmarks = BookmarkSet::seeded(catalog.bookmarked.iter().cloned());
    let mut applications = ApplicationTracker::seeded(catalog.applications.clone());

    match cli.command {
        Commands::Jobs { filters } => {
            let criteria = filters.criteria();
            let jobs = filter::apply(&catalog.jobs, &criteria);
            let active = filter::count_active_facets(&criteria);
            if active > 0 {
                println!("Active filters: {}", active);
            }
            print_job_table(&jobs, &bookmarks, "No jobs match your filters.");
        }

        Commands::Show { id } => match catalog.job(&id) {
            Some(job) => print_job_detail(job, &bookmarks),
            None => println!("Job #{} not found.", id),
        },

        Commands::Alerts => {
            if catalog.alerts.is_empty() {
                println!("No alerts configured.");
            } else {
                println!(
                    "{:<6} {:<8} {:<28} {:<12} {:<10} {:<10} {:>8}",
                    "ID", "ACTIVE", "NAME", "TYPE", "MODE", "WITHIN", "MATCHES"
                );
                println!("{}", "-".repeat(88));
                for alert in &catalog.alerts {
                    let matches = catalog
                        .jobs
                        .iter()
                        .filter(|job| filter::alert_matches(job, alert))
                        .count();
                    println!(
                        "{:<6} {:<8} {:<28} {:<12} {:<10} {:<10} {:>8}",
                        alert.id,
                        if alert.is_active { "yes" } else { "no" },
                        truncate(&alert.name, 26),
                        alert.job_type.to_string(),
                        alert.work_mode.to_string(),
                        alert.posted_within.to_string(),
                        matches
                    );
                }
            }
        }

        Commands::AlertJobs { id, query } => match catalog.alert(&id) {
            Some(alert) => {
                let mut jobs: Vec<JobPosting> = catalog
                    .jobs
                    .iter()
                    .filter(|job| filter::alert_matches(job, alert))
                    .cloned()
                    .collect();
                if let Some(q) = &query {
                    jobs.retain(|job| filter::text_matches(job, q));
                }
                println!("Alert '{}': {} matching job(s)", alert.name, jobs.len());
                if !alert.is_active {
                    println!("(This alert is paused.)");
                }
                print_job_table(&jobs, &bookmarks, "No jobs match this alert.");
            }
            None => println!("Alert #{} not found.", id),
        },

        Commands::Bookmarks { query } => {
            let mut jobs: Vec<JobPosting> = catalog
                .jobs
                .iter()
                .filter(|job| bookmarks.contains(&job.id))
                .cloned()
                .collect();

            if jobs.is_empty() {
                println!("No bookmarks yet.");
            } else {
                let avg_match = jobs
                    .iter()
                    .map(|job| job.match_percentage as u32)
                    .sum::<u32>()
                    / jobs.len() as u32;
                let remote = jobs
                    .iter()
                    .filter(|job| job.work_mode == WorkMode::Remote)
                    .count();
                println!(
                    "{} bookmarked | avg match {}% | {} remote",
                    jobs.len(),
                    avg_match,
                    remote
                );

                if let Some(q) = &query {
                    jobs.retain(|job| filter::text_matches(job, q));
                }
                print_job_table(&jobs, &bookmarks, "No bookmarks match your search.");
            }
        }

        Commands::Bookmark { job_id } => {
            if catalog.job(&job_id).is_none() {
                println!("Note: job #{} is not in the catalog.", job_id);
            }
            if bookmarks.toggle(&job_id) {
                println!("Bookmarked job #{}.", job_id);
            } else {
                println!("Removed bookmark for job #{}.", job_id);
            }
            println!("{} bookmark(s) total.", bookmarks.len());
        }

        Commands::Unbookmark { job_id } => {
            bookmarks.remove(&job_id);
            println!("Removed bookmark for job #{}.", job_id);
            println!("{} bookmark(s) total.", bookmarks.len());
        }

        Commands::Applications => {
            let resolved = applications.resolved(&catalog.jobs);
            if resolved.is_empty() {
                println!("No applications tracked.");
            } else {
                println!(
                    "{:<6} {:<12} {:<12} {:<12} {:<28} {}",
                    "ID", "STATUS", "APPLIED", "UPDATED", "TITLE", "NOTES"
                );
                println!("{}", "-".repeat(100));
                for (record, job) in resolved {
                    println!(
                        "{:<6} {:<12} {:<12} {:<12} {:<28} {}",
                        record.id,
                        record.status.to_string(),
                        record.applied_date.to_string(),
                        record.last_update.to_string(),
                        truncate(&job.title, 26),
                        record.notes.as_deref().unwrap_or("No notes added yet")
                    );
                }
            }
        }

        Commands::ApplicationStatus { id, status } => {
            if applications.update_status(&id, status) {
                print_application(&applications, &catalog, &id);
            } else {
                println!("Application #{} not found.", id);
            }
        }

        Commands::ApplicationNotes { id, text } => {
            if applications.update_notes(&id, text.as_deref().unwrap_or("")) {
                print_application(&applications, &catalog, &id);
            } else {
                println!("Application #{} not found.", id);
            }
        }

        Commands::Browse { filters } => {
            tui::run_browse(&catalog.jobs, &filters.criteria(), &mut bookmarks)?;
        }
    }

    Ok(())
}

fn print_job_table(jobs: &[JobPosting], bookmarks: &BookmarkSet, empty_message: &str) {
    if jobs.is_empty() {
        println!("{}", empty_message);
        return;
    }
    println!(
        "{:<6} {:<2} {:<30} {:<20} {:<18} {:>6} {:<14}",
        "ID", "", "TITLE", "COMPANY", "LOCATION", "MATCH", "SALARY"
    );
    println!("{}", "-".repeat(102));
    for job in jobs {
        let marker = if bookmarks.contains(&job.id) { "*" } else { " " };
        println!(
            "{:<6} {:<2} {:<30} {:<20} {:<18} {:>5}% {:<14}",
            job.id,
            marker,
            truncate(&job.title, 28),
            truncate(&job.company, 18),
            truncate(&job.location, 16),
            job.match_percentage,
            truncate(job.salary.as_deref().unwrap_or("-"), 14)
        );
    }
}

fn print_job_detail(job: &JobPosting, bookmarks: &BookmarkSet) {
    println!("Job #{}", job.id);
    println!("Title: {}", job.title);
    println!("Company: {}", job.company);
    println!("Location: {}", job.location);
    println!("{} | {} | {}", job.job_type, job.work_mode, job.seniority);
    println!("Match: {}%", job.match_percentage);
    if let Some(salary) = &job.salary {
        println!("Salary: {}", salary);
    }
    println!("Posted: {}", job.posted_ago);
    if bookmarks.contains(&job.id) {
        println!("Bookmarked: yes");
    }
    if !job.matched_skills.is_empty() {
        println!("Matched skills: {}", job.matched_skills.join(", "));
    }
    if !job.gap_skills.is_empty() {
        println!("Skill gaps: {}", job.gap_skills.join(", "));
    }
    if !job.requirements.is_empty() {
        println!("\nRequirements:");
        for req in &job.requirements {
            println!("  - {}", req);
        }
    }
    if !job.description.is_empty() {
        println!("\n{}", job.description);
    }
}

fn print_application(applications: &ApplicationTracker, catalog: &Catalog, id: &str) {
    let Some(record) = applications.get(id) else {
        return;
    };
    println!("Application #{}", record.id);
    match catalog.job(&record.job_id) {
        Some(job) => println!("Job: {} at {}", job.title, job.company),
        None => println!("Job: #{} (no longer in catalog)", record.job_id),
    }
    println!("Status: {}", record.status);
    println!("Applied: {}", record.applied_date);
    println!("Updated: {}", record.last_update);
    println!(
        "Notes: {}",
        record.notes.as_deref().unwrap_or("No notes added yet")
    );
}

fn truncate(s: &str, max: usize) -> String {
    if s.len() <= max {
        s.to_string()
    } else {
        format!("{}...", &s[..max.saturating_sub(3)])
    }
}
