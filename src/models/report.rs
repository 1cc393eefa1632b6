//! Daily batch report models.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::GrantJudgment;

/// A per-employee failure recorded during a batch run.
///
/// One employee's failure never aborts the batch; it lands here and the
/// employee is retried on the next run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchError {
    /// The employee whose processing failed.
    pub employee_id: String,
    /// A description of the failure.
    pub message: String,
}

/// The outcome of one daily batch run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchReport {
    /// The date the batch ran for.
    pub as_of: NaiveDate,
    /// Employees whose schedule matched the date and were judged.
    pub processed: u32,
    /// Judgments that produced a grant.
    pub granted: u32,
    /// Judgments that did not meet the eligibility conditions.
    pub rejected: u32,
    /// Cohorts expired across all employees.
    pub expired_cohorts: u32,
    /// Every judgment made during the run.
    pub judgments: Vec<GrantJudgment>,
    /// Per-employee failures, isolated from the rest of the run.
    pub errors: Vec<BatchError>,
}

impl BatchReport {
    /// Creates an empty report for a run date.
    pub fn new(as_of: NaiveDate) -> Self {
        Self {
            as_of,
            processed: 0,
            granted: 0,
            rejected: 0,
            expired_cohorts: 0,
            judgments: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// Merges another report into this one. Used when the batch is fanned
    /// out over worker threads and each worker builds a partial report.
    pub fn merge(&mut self, other: BatchReport) {
        self.processed += other.processed;
        self.granted += other.granted;
        self.rejected += other.rejected;
        self.expired_cohorts += other.expired_cohorts;
        self.judgments.extend(other.judgments);
        self.errors.extend(other.errors);
    }
}
