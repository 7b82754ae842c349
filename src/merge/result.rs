// ABOUTME: Per-row outcome types and whole-job report aggregation
// ABOUTME: Makes partial-failure behavior explicit: rows attempted, succeeded, failed with reasons

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum RowStatus {
    Pending,
    Resolved,
    Saved,
    Failed,
    Skipped,
}

/// Result of producing one row's message. Failures carry enough context
/// (row index, recipients, reason) to retry the row later.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RowOutcome {
    pub row_index: usize,
    pub status: RowStatus,
    pub recipients: Vec<String>,
    pub error: Option<String>,
}

impl RowOutcome {
    pub fn new(row_index: usize) -> Self {
        Self {
            row_index,
            status: RowStatus::Pending,
            recipients: Vec::new(),
            error: None,
        }
    }

    pub fn mark_resolved(&mut self, recipients: Vec<String>) {
        self.status = RowStatus::Resolved;
        self.recipients = recipients;
    }

    pub fn mark_saved(&mut self) {
        self.status = RowStatus::Saved;
    }

    pub fn mark_failed(&mut self, reason: String) {
        self.status = RowStatus::Failed;
        self.error = Some(reason);
    }

    pub fn mark_skipped(&mut self, reason: String) {
        self.status = RowStatus::Skipped;
        self.error = Some(reason);
    }

    pub fn is_successful(&self) -> bool {
        self.status == RowStatus::Saved
    }

    pub fn is_failed(&self) -> bool {
        self.status == RowStatus::Failed
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum MergeStatus {
    Running,
    Success,
    Failed,
    PartialSuccess,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MergeSummary {
    pub rows_attempted: usize,
    pub rows_succeeded: usize,
    pub rows_failed: usize,
    pub rows_skipped: usize,
}

/// Aggregate result of one merge job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MergeReport {
    pub run_id: String,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub duration: Option<Duration>,
    pub status: MergeStatus,
    pub outcomes: Vec<RowOutcome>,
    pub summary: MergeSummary,
    pub warnings: Vec<String>,
}

impl MergeReport {
    pub fn new(run_id: String) -> Self {
        Self {
            run_id,
            start_time: Utc::now(),
            end_time: None,
            duration: None,
            status: MergeStatus::Running,
            outcomes: Vec::new(),
            summary: MergeSummary::default(),
            warnings: Vec::new(),
        }
    }

    pub fn add_outcome(&mut self, outcome: RowOutcome) {
        self.outcomes.push(outcome);
        self.update_summary();
    }

    pub fn add_warning(&mut self, warning: String) {
        self.warnings.push(warning);
    }

    pub fn mark_completed(&mut self) {
        self.end_time = Some(Utc::now());
        self.duration = Some(
            (Utc::now() - self.start_time)
                .to_std()
                .unwrap_or(Duration::ZERO),
        );
        self.update_summary();
        self.update_status();
    }

    pub fn failures(&self) -> impl Iterator<Item = &RowOutcome> {
        self.outcomes.iter().filter(|o| o.is_failed())
    }

    fn update_status(&mut self) {
        let attempted: Vec<_> = self
            .outcomes
            .iter()
            .filter(|o| o.status != RowStatus::Skipped)
            .collect();

        if attempted.is_empty() {
            self.status = MergeStatus::Success;
            return;
        }

        let has_failed = attempted.iter().any(|o| o.is_failed());
        let has_success = attempted.iter().any(|o| o.is_successful());

        self.status = match (has_failed, has_success) {
            (false, _) => MergeStatus::Success,
            (true, false) => MergeStatus::Failed,
            (true, true) => MergeStatus::PartialSuccess,
        };
    }

    fn update_summary(&mut self) {
        let skipped = self
            .outcomes
            .iter()
            .filter(|o| o.status == RowStatus::Skipped)
            .count();

        self.summary = MergeSummary {
            rows_attempted: self.outcomes.len() - skipped,
            rows_succeeded: self.outcomes.iter().filter(|o| o.is_successful()).count(),
            rows_failed: self.outcomes.iter().filter(|o| o.is_failed()).count(),
            rows_skipped: skipped,
        };
    }
}

impl std::fmt::Display for MergeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MergeStatus::Running => write!(f, "running"),
            MergeStatus::Success => write!(f, "success"),
            MergeStatus::Failed => write!(f, "failed"),
            MergeStatus::PartialSuccess => write!(f, "partial_success"),
        }
    }
}

impl std::fmt::Display for RowStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RowStatus::Pending => write!(f, "pending"),
            RowStatus::Resolved => write!(f, "resolved"),
            RowStatus::Saved => write!(f, "saved"),
            RowStatus::Failed => write!(f, "failed"),
            RowStatus::Skipped => write!(f, "skipped"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_outcome_lifecycle() {
        let mut outcome = RowOutcome::new(1);
        assert_eq!(outcome.status, RowStatus::Pending);

        outcome.mark_resolved(vec!["alice@x.com".to_string()]);
        assert_eq!(outcome.status, RowStatus::Resolved);
        assert!(!outcome.is_successful());

        outcome.mark_saved();
        assert!(outcome.is_successful());
        assert!(!outcome.is_failed());
    }

    #[test]
    fn test_report_aggregation() {
        let mut report = MergeReport::new("run_1".to_string());

        let mut ok = RowOutcome::new(1);
        ok.mark_resolved(vec!["a@x.com".to_string()]);
        ok.mark_saved();

        let mut bad = RowOutcome::new(2);
        bad.mark_failed("sink rejected save".to_string());

        report.add_outcome(ok);
        report.add_outcome(bad);
        report.mark_completed();

        assert_eq!(report.summary.rows_attempted, 2);
        assert_eq!(report.summary.rows_succeeded, 1);
        assert_eq!(report.summary.rows_failed, 1);
        assert_eq!(report.status, MergeStatus::PartialSuccess);
        assert_eq!(report.failures().count(), 1);
    }

    #[test]
    fn test_all_failed_report() {
        let mut report = MergeReport::new("run_2".to_string());
        let mut bad = RowOutcome::new(1);
        bad.mark_failed("boom".to_string());
        report.add_outcome(bad);
        report.mark_completed();

        assert_eq!(report.status, MergeStatus::Failed);
    }

    #[test]
    fn test_skipped_rows_counted_separately() {
        let mut report = MergeReport::new("run_3".to_string());

        let mut ok = RowOutcome::new(1);
        ok.mark_saved();
        report.add_outcome(ok);

        let mut skipped = RowOutcome::new(2);
        skipped.mark_skipped("row limit reached".to_string());
        report.add_outcome(skipped);
        report.mark_completed();

        assert_eq!(report.summary.rows_attempted, 1);
        assert_eq!(report.summary.rows_skipped, 1);
        assert_eq!(report.status, MergeStatus::Success);
    }
}
