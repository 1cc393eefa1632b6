//! Attendance aggregation over the external clock-event store.
//!
//! For entitlement purposes an attended day is either a calendar day with a
//! completed work session or a day of paid leave already taken: statutory
//! attendance counts leave usage as attendance. The aggregator therefore
//! mixes the external attendance count with `Use` entries from the ledger.

use std::sync::Arc;

use chrono::NaiveDate;

use crate::error::LeaveResult;
use crate::models::EntryKind;
use crate::store::{AttendanceStore, LedgerStore};

/// Thin adapter combining the attendance store and the leave ledger.
#[derive(Clone)]
pub struct AttendanceAggregator {
    attendance: Arc<dyn AttendanceStore>,
    ledger: Arc<dyn LedgerStore>,
}

impl AttendanceAggregator {
    /// Creates an aggregator over the two sources.
    pub fn new(attendance: Arc<dyn AttendanceStore>, ledger: Arc<dyn LedgerStore>) -> Self {
        Self { attendance, ledger }
    }

    /// Counts attended days in `[start, end]`: worked days plus leave days
    /// used in the range.
    pub fn attended_days(
        &self,
        employee_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> LeaveResult<u32> {
        let worked = self.attendance.count_attended_days(employee_id, start, end)?;

        let leave_used: u32 = self
            .ledger
            .entries(employee_id)?
            .iter()
            .filter(|e| e.kind == EntryKind::Use)
            .filter(|e| e.occurred_on.is_some_and(|d| start <= d && d <= end))
            .map(|e| e.days)
            .sum();

        Ok(worked + leave_used)
    }
}
