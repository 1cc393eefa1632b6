//! Employee model.
//!
//! The engine reads an employee's hire date and weekly contracted work days,
//! and writes back two cached fields: the grant-date schedule and the
//! current leave balance. Everything else about an employee belongs to the
//! account subsystem.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Represents an employee subject to paid-leave accrual.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    /// Unique identifier for the employee.
    pub id: String,
    /// The date the employee was hired. Immutable once grants exist.
    pub hire_date: NaiveDate,
    /// Weekly contracted work days (0-7).
    pub weekly_work_days: u8,
    /// Whether the employee is active. Inactive employees are skipped by
    /// the daily batch.
    #[serde(default = "default_active")]
    pub active: bool,
    /// Cached grant-date schedule, recomputed explicitly on hire-date
    /// changes. Derived data; the ledger is authoritative.
    #[serde(default)]
    pub grant_schedule: Vec<NaiveDate>,
    /// Cached current balance in days. Derived data; always equals the
    /// ledger-derived value.
    #[serde(default)]
    pub cached_balance: u32,
}

fn default_active() -> bool {
    true
}

impl Employee {
    /// Returns true when `date` is one of the cached schedule's grant dates.
    pub fn is_grant_date(&self, date: NaiveDate) -> bool {
        self.grant_schedule.contains(&date)
    }

    /// Returns the most recent cached grant date on or before `as_of`,
    /// if any grant date has been reached yet.
    pub fn latest_grant_date(&self, as_of: NaiveDate) -> Option<NaiveDate> {
        self.grant_schedule
            .iter()
            .copied()
            .filter(|d| *d <= as_of)
            .max()
    }
}
