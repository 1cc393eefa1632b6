//! Collaborator store traits and in-memory implementations.
//!
//! The engine owns no persistence. Employees, raw attendance and the leave
//! ledger live behind these traits so any transactional backend with
//! per-employee atomicity can be plugged in. The in-memory implementations
//! serve tests, demos and embedding.

mod locks;
mod memory;

use chrono::NaiveDate;

use crate::error::LeaveResult;
use crate::models::{Employee, EntryKind, LeaveLedgerEntry};

pub use locks::EmployeeLockMap;
pub use memory::{InMemoryAttendanceStore, InMemoryEmployeeStore, InMemoryLedgerStore};

/// Read/write access to employee records.
///
/// The engine only reads the hire date and weekly work days, and writes the
/// two cached fields (grant schedule, current balance).
pub trait EmployeeStore: Send + Sync {
    /// Fetches one employee.
    ///
    /// Fails with [`crate::error::LeaveError::EmployeeLookup`] when the
    /// employee does not exist or the backend is unavailable.
    fn get(&self, employee_id: &str) -> LeaveResult<Employee>;

    /// Lists all active employees, for the daily batch.
    fn active_employees(&self) -> LeaveResult<Vec<Employee>>;

    /// Writes the cached balance field. Called only by the balance manager.
    fn set_cached_balance(&self, employee_id: &str, days: u32) -> LeaveResult<()>;

    /// Writes the cached grant-date schedule. Called on hire-date changes.
    fn set_grant_schedule(&self, employee_id: &str, schedule: Vec<NaiveDate>) -> LeaveResult<()>;
}

/// Read access to the external attendance (clock-event) store.
pub trait AttendanceStore: Send + Sync {
    /// Counts completed attendance days in `[start, end]`, one unit per
    /// calendar day with a work session. Leave days are not included here;
    /// the aggregator adds those from the ledger.
    fn count_attended_days(
        &self,
        employee_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> LeaveResult<u32>;
}

/// Append-only access to the leave ledger.
pub trait LedgerStore: Send + Sync {
    /// Appends one entry.
    fn insert(&self, entry: LeaveLedgerEntry) -> LeaveResult<()>;

    /// Returns all entries for an employee, oldest first.
    fn entries(&self, employee_id: &str) -> LeaveResult<Vec<LeaveLedgerEntry>>;

    /// Returns the entries of one cohort, oldest first.
    fn cohort_entries(
        &self,
        employee_id: &str,
        grant_date: NaiveDate,
    ) -> LeaveResult<Vec<LeaveLedgerEntry>>;

    /// Bounded in-place shrink of a cohort's grant entries by up to
    /// `amount` days, oldest entries first, never below zero per entry.
    /// Returns the number of days actually removed. This is the only
    /// sanctioned in-place mutation; regular cancellation appends a
    /// `Cancel` entry instead.
    fn reduce_granted_days(
        &self,
        employee_id: &str,
        grant_date: NaiveDate,
        amount: u32,
    ) -> LeaveResult<u32>;
}

/// Sums the days of all entries of one kind.
pub fn sum_days(entries: &[LeaveLedgerEntry], kind: EntryKind) -> u32 {
    entries
        .iter()
        .filter(|e| e.kind == kind)
        .map(|e| e.days)
        .sum()
}

/// Computes a cohort's remaining days from its entries, floored at zero.
pub fn cohort_remaining(entries: &[LeaveLedgerEntry]) -> u32 {
    let granted = i64::from(sum_days(entries, EntryKind::Grant));
    let consumed = i64::from(sum_days(entries, EntryKind::Use))
        + i64::from(sum_days(entries, EntryKind::Expire))
        + i64::from(sum_days(entries, EntryKind::Cancel));

    (granted - consumed).max(0) as u32
}
