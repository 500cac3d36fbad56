use chrono::NaiveDate;
use std::collections::BTreeSet;

use crate::models::{ApplicationRecord, ApplicationStatus, JobPosting};

/// The set of bookmarked job ids for one session. Sole owner of its
/// membership; every mutation goes through these methods.
#[derive(Debug, Clone, Default)]
pub struct BookmarkSet {
    ids: BTreeSet<String>,
}

impl BookmarkSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seeded<I>(ids: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        Self {
            ids: ids.into_iter().collect(),
        }
    }

    /// Flips membership: removes when present, adds when absent. Returns
    /// the new membership state. Always succeeds.
    pub fn toggle(&mut self, job_id: &str) -> bool {
        if self.ids.remove(job_id) {
            false
        } else {
            self.ids.insert(job_id.to_string());
            true
        }
    }

    /// Removes when present; no-op when absent.
    pub fn remove(&mut self, job_id: &str) {
        self.ids.remove(job_id);
    }

    pub fn contains(&self, job_id: &str) -> bool {
        self.ids.contains(job_id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }
}

/// Session-local collection of application records. Orphaned records
/// (job_id with no catalog posting) are kept but excluded from display.
#[derive(Debug, Clone, Default)]
pub struct ApplicationTracker {
    records: Vec<ApplicationRecord>,
}

impl ApplicationTracker {
    pub fn seeded(records: Vec<ApplicationRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[ApplicationRecord] {
        &self.records
    }

    pub fn get(&self, application_id: &str) -> Option<&ApplicationRecord> {
        self.records.iter().find(|rec| rec.id == application_id)
    }

    fn get_mut(&mut self, application_id: &str) -> Option<&mut ApplicationRecord> {
        self.records.iter_mut().find(|rec| rec.id == application_id)
    }

    /// Stores trimmed notes; whitespace-only input clears them to unset so
    /// display can fall back to its "no notes" placeholder. Returns false
    /// when the record is unknown.
    pub fn update_notes(&mut self, application_id: &str, text: &str) -> bool {
        let Some(record) = self.get_mut(application_id) else {
            return false;
        };
        let trimmed = text.trim();
        record.notes = if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        };
        true
    }

    /// Replaces the status and stamps `last_update` with today's date.
    pub fn update_status(&mut self, application_id: &str, status: ApplicationStatus) -> bool {
        self.update_status_on(application_id, status, chrono::Local::now().date_naive())
    }

    pub fn update_status_on(
        &mut self,
        application_id: &str,
        status: ApplicationStatus,
        today: NaiveDate,
    ) -> bool {
        let Some(record) = self.get_mut(application_id) else {
            return false;
        };
        record.status = status;
        record.last_update = today;
        true
    }

    /// Explicit deletion; no-op when absent.
    pub fn remove(&mut self, application_id: &str) -> bool {
        let before = self.records.len();
        self.records.retain(|rec| rec.id != application_id);
        self.records.len() != before
    }

    /// Joins records to their postings, in record order. Records whose
    /// posting cannot be resolved are skipped silently.
    pub fn resolved<'a>(
        &'a self,
        jobs: &'a [JobPosting],
    ) -> Vec<(&'a ApplicationRecord, &'a JobPosting)> {
        self.records
            .iter()
            .filter_map(|rec| {
                jobs.iter()
                    .find(|job| job.id == rec.job_id)
                    .map(|job| (rec, job))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{JobType, Seniority, WorkMode};

    fn record(id: &str, job_id: &str) -> ApplicationRecord {
        ApplicationRecord {
            id: id.to_string(),
            job_id: job_id.to_string(),
            status: ApplicationStatus::Applied,
            applied_date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            last_update: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            notes: None,
        }
    }

    fn posting(id: &str) -> JobPosting {
        JobPosting {
            id: id.to_string(),
            title: format!("Job {id}"),
            company: "Acme".to_string(),
            location: "Remote".to_string(),
            match_percentage: 80,
            salary: None,
            posted_ago: "1d ago".to_string(),
            job_type: JobType::FullTime,
            work_mode: WorkMode::Remote,
            seniority: Seniority::Mid,
            matched_skills: vec![],
            gap_skills: vec![],
            requirements: vec![],
            description: String::new(),
        }
    }

    #[test]
    fn test_toggle_twice_restores_membership() {
        let mut bookmarks = BookmarkSet::new();
        assert!(bookmarks.toggle("1"));
        assert!(bookmarks.contains("1"));
        assert!(!bookmarks.toggle("1"));
        assert!(!bookmarks.contains("1"));
        assert!(bookmarks.is_empty());
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let mut bookmarks = BookmarkSet::seeded(vec!["1".to_string()]);
        bookmarks.remove("99");
        assert_eq!(bookmarks.len(), 1);
        bookmarks.remove("1");
        assert!(bookmarks.is_empty());
    }

    #[test]
    fn test_whitespace_notes_become_unset() {
        let mut tracker = ApplicationTracker::seeded(vec![record("a1", "1")]);
        assert!(tracker.update_notes("a1", "   "));
        assert_eq!(tracker.get("a1").unwrap().notes, None);
    }

    #[test]
    fn test_notes_are_trimmed() {
        let mut tracker = ApplicationTracker::seeded(vec![record("a1", "1")]);
        assert!(tracker.update_notes("a1", "  phone screen Friday  "));
        assert_eq!(
            tracker.get("a1").unwrap().notes.as_deref(),
            Some("phone screen Friday")
        );
    }

    #[test]
    fn test_update_notes_unknown_record() {
        let mut tracker = ApplicationTracker::default();
        assert!(!tracker.update_notes("missing", "note"));
    }

    #[test]
    fn test_status_update_bumps_last_update() {
        let mut tracker = ApplicationTracker::seeded(vec![record("a1", "1")]);
        let today = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
        assert!(tracker.update_status_on("a1", ApplicationStatus::Interview, today));

        let rec = tracker.get("a1").unwrap();
        assert_eq!(rec.status, ApplicationStatus::Interview);
        assert_eq!(rec.last_update, today);
        assert_eq!(
            rec.applied_date,
            NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
        );
    }

    #[test]
    fn test_resolved_excludes_orphans() {
        let tracker =
            ApplicationTracker::seeded(vec![record("a1", "1"), record("a2", "gone")]);
        let jobs = vec![posting("1")];

        let resolved = tracker.resolved(&jobs);
        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].0.id, "a1");
        assert_eq!(resolved[0].1.id, "1");
        // The orphan is still tracked, just not rendered.
        assert_eq!(tracker.records().len(), 2);
    }

    #[test]
    fn test_remove_application() {
        let mut tracker = ApplicationTracker::seeded(vec![record("a1", "1")]);
        assert!(tracker.remove("a1"));
        assert!(!tracker.remove("a1"));
        assert!(tracker.records().is_empty());
    }
}
