//! In-memory store implementations.
//!
//! Mutex-guarded maps implementing the collaborator traits, used by the
//! test suites and by embedders that keep their records elsewhere. Poisoned
//! locks are recovered: the data is plain and every operation leaves it
//! consistent.

use std::collections::{BTreeSet, HashMap};
use std::sync::Mutex;

use chrono::{Days, NaiveDate};

use crate::error::{LeaveError, LeaveResult};
use crate::models::{Employee, EntryKind, LeaveLedgerEntry};

use super::{AttendanceStore, EmployeeStore, LedgerStore};

/// In-memory [`EmployeeStore`].
#[derive(Debug, Default)]
pub struct InMemoryEmployeeStore {
    employees: Mutex<HashMap<String, Employee>>,
}

impl InMemoryEmployeeStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces an employee record.
    pub fn upsert(&self, employee: Employee) {
        let mut employees = self.employees.lock().unwrap_or_else(|e| e.into_inner());
        employees.insert(employee.id.clone(), employee);
    }
}

impl EmployeeStore for InMemoryEmployeeStore {
    fn get(&self, employee_id: &str) -> LeaveResult<Employee> {
        let employees = self.employees.lock().unwrap_or_else(|e| e.into_inner());
        employees
            .get(employee_id)
            .cloned()
            .ok_or_else(|| LeaveError::EmployeeLookup {
                employee_id: employee_id.to_string(),
                message: "not found".to_string(),
            })
    }

    fn active_employees(&self) -> LeaveResult<Vec<Employee>> {
        let employees = self.employees.lock().unwrap_or_else(|e| e.into_inner());
        let mut active: Vec<Employee> = employees.values().filter(|e| e.active).cloned().collect();
        active.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(active)
    }

    fn set_cached_balance(&self, employee_id: &str, days: u32) -> LeaveResult<()> {
        let mut employees = self.employees.lock().unwrap_or_else(|e| e.into_inner());
        let employee = employees
            .get_mut(employee_id)
            .ok_or_else(|| LeaveError::EmployeeLookup {
                employee_id: employee_id.to_string(),
                message: "not found".to_string(),
            })?;
        employee.cached_balance = days;
        Ok(())
    }

    fn set_grant_schedule(&self, employee_id: &str, schedule: Vec<NaiveDate>) -> LeaveResult<()> {
        let mut employees = self.employees.lock().unwrap_or_else(|e| e.into_inner());
        let employee = employees
            .get_mut(employee_id)
            .ok_or_else(|| LeaveError::EmployeeLookup {
                employee_id: employee_id.to_string(),
                message: "not found".to_string(),
            })?;
        employee.grant_schedule = schedule;
        Ok(())
    }
}

/// In-memory [`AttendanceStore`]: a set of attended calendar days per
/// employee.
#[derive(Debug, Default)]
pub struct InMemoryAttendanceStore {
    attended: Mutex<HashMap<String, BTreeSet<NaiveDate>>>,
}

impl InMemoryAttendanceStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one attended day.
    pub fn mark_attended(&self, employee_id: &str, date: NaiveDate) {
        let mut attended = self.attended.lock().unwrap_or_else(|e| e.into_inner());
        attended
            .entry(employee_id.to_string())
            .or_default()
            .insert(date);
    }

    /// Records `count` consecutive attended days starting at `start`.
    pub fn mark_attended_run(&self, employee_id: &str, start: NaiveDate, count: u64) {
        for offset in 0..count {
            if let Some(date) = start.checked_add_days(Days::new(offset)) {
                self.mark_attended(employee_id, date);
            }
        }
    }

    /// Removes an attended day, as a retroactive correction would.
    pub fn unmark_attended(&self, employee_id: &str, date: NaiveDate) {
        let mut attended = self.attended.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(days) = attended.get_mut(employee_id) {
            days.remove(&date);
        }
    }
}

impl AttendanceStore for InMemoryAttendanceStore {
    fn count_attended_days(
        &self,
        employee_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> LeaveResult<u32> {
        if end < start {
            return Err(LeaveError::InvalidPeriod { start, end });
        }

        let attended = self.attended.lock().unwrap_or_else(|e| e.into_inner());
        let count = attended
            .get(employee_id)
            .map(|days| days.range(start..=end).count())
            .unwrap_or(0);
        Ok(count as u32)
    }
}

/// In-memory [`LedgerStore`]: an append-only entry list per employee.
#[derive(Debug, Default)]
pub struct InMemoryLedgerStore {
    entries: Mutex<Vec<LeaveLedgerEntry>>,
}

impl InMemoryLedgerStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl LedgerStore for InMemoryLedgerStore {
    fn insert(&self, entry: LeaveLedgerEntry) -> LeaveResult<()> {
        if entry.days == 0 {
            return Err(LeaveError::LedgerStore {
                message: "entry days must be positive".to_string(),
            });
        }
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.push(entry);
        Ok(())
    }

    fn entries(&self, employee_id: &str) -> LeaveResult<Vec<LeaveLedgerEntry>> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        Ok(entries
            .iter()
            .filter(|e| e.employee_id == employee_id)
            .cloned()
            .collect())
    }

    fn cohort_entries(
        &self,
        employee_id: &str,
        grant_date: NaiveDate,
    ) -> LeaveResult<Vec<LeaveLedgerEntry>> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        Ok(entries
            .iter()
            .filter(|e| e.employee_id == employee_id && e.grant_date == grant_date)
            .cloned()
            .collect())
    }

    fn reduce_granted_days(
        &self,
        employee_id: &str,
        grant_date: NaiveDate,
        amount: u32,
    ) -> LeaveResult<u32> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());

        let mut remaining = amount;
        let mut removed = 0;
        for entry in entries.iter_mut().filter(|e| {
            e.employee_id == employee_id && e.grant_date == grant_date && e.kind == EntryKind::Grant
        }) {
            if remaining == 0 {
                break;
            }
            let reducible = entry.days.min(remaining);
            entry.days -= reducible;
            remaining -= reducible;
            removed += reducible;
        }

        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn employee(id: &str) -> Employee {
        Employee {
            id: id.to_string(),
            hire_date: ymd(2023, 1, 1),
            weekly_work_days: 5,
            active: true,
            grant_schedule: vec![],
            cached_balance: 0,
        }
    }

    fn grant(employee_id: &str, days: u32, grant_date: NaiveDate) -> LeaveLedgerEntry {
        LeaveLedgerEntry::new(
            employee_id,
            EntryKind::Grant,
            days,
            grant_date,
            ymd(2025, 7, 1),
            None,
            "",
        )
    }

    #[test]
    fn test_employee_get_after_upsert() {
        let store = InMemoryEmployeeStore::new();
        store.upsert(employee("emp_001"));

        let fetched = store.get("emp_001").unwrap();
        assert_eq!(fetched.hire_date, ymd(2023, 1, 1));
    }

    #[test]
    fn test_employee_get_unknown_fails() {
        let store = InMemoryEmployeeStore::new();
        assert!(matches!(
            store.get("ghost"),
            Err(LeaveError::EmployeeLookup { .. })
        ));
    }

    #[test]
    fn test_active_employees_excludes_inactive() {
        let store = InMemoryEmployeeStore::new();
        store.upsert(employee("emp_001"));
        let mut inactive = employee("emp_002");
        inactive.active = false;
        store.upsert(inactive);

        let active = store.active_employees().unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, "emp_001");
    }

    #[test]
    fn test_set_cached_balance_updates_record() {
        let store = InMemoryEmployeeStore::new();
        store.upsert(employee("emp_001"));
        store.set_cached_balance("emp_001", 12).unwrap();
        assert_eq!(store.get("emp_001").unwrap().cached_balance, 12);
    }

    #[test]
    fn test_attendance_counts_only_days_in_range() {
        let store = InMemoryAttendanceStore::new();
        store.mark_attended("emp_001", ymd(2023, 1, 2));
        store.mark_attended("emp_001", ymd(2023, 1, 3));
        store.mark_attended("emp_001", ymd(2023, 2, 1));

        let count = store
            .count_attended_days("emp_001", ymd(2023, 1, 1), ymd(2023, 1, 31))
            .unwrap();
        assert_eq!(count, 2);
    }

    #[test]
    fn test_attendance_marking_is_idempotent_per_day() {
        let store = InMemoryAttendanceStore::new();
        store.mark_attended("emp_001", ymd(2023, 1, 2));
        store.mark_attended("emp_001", ymd(2023, 1, 2));

        let count = store
            .count_attended_days("emp_001", ymd(2023, 1, 1), ymd(2023, 1, 31))
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_attendance_run_marks_consecutive_days() {
        let store = InMemoryAttendanceStore::new();
        store.mark_attended_run("emp_001", ymd(2023, 1, 1), 110);

        let count = store
            .count_attended_days("emp_001", ymd(2023, 1, 1), ymd(2023, 6, 30))
            .unwrap();
        assert_eq!(count, 110);
    }

    #[test]
    fn test_unmark_attended_removes_the_day() {
        let store = InMemoryAttendanceStore::new();
        store.mark_attended("emp_001", ymd(2023, 1, 2));
        store.unmark_attended("emp_001", ymd(2023, 1, 2));

        let count = store
            .count_attended_days("emp_001", ymd(2023, 1, 1), ymd(2023, 1, 31))
            .unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn test_ledger_rejects_zero_day_entries() {
        let store = InMemoryLedgerStore::new();
        let result = store.insert(grant("emp_001", 0, ymd(2023, 7, 1)));
        assert!(matches!(result, Err(LeaveError::LedgerStore { .. })));
    }

    #[test]
    fn test_cohort_entries_filters_by_grant_date() {
        let store = InMemoryLedgerStore::new();
        store.insert(grant("emp_001", 10, ymd(2023, 7, 1))).unwrap();
        store.insert(grant("emp_001", 11, ymd(2024, 7, 1))).unwrap();
        store.insert(grant("emp_002", 10, ymd(2023, 7, 1))).unwrap();

        let cohort = store.cohort_entries("emp_001", ymd(2023, 7, 1)).unwrap();
        assert_eq!(cohort.len(), 1);
        assert_eq!(cohort[0].days, 10);
    }

    #[test]
    fn test_reduce_granted_days_is_bounded() {
        let store = InMemoryLedgerStore::new();
        store.insert(grant("emp_001", 10, ymd(2023, 7, 1))).unwrap();

        let removed = store
            .reduce_granted_days("emp_001", ymd(2023, 7, 1), 15)
            .unwrap();
        assert_eq!(removed, 10);

        let cohort = store.cohort_entries("emp_001", ymd(2023, 7, 1)).unwrap();
        assert_eq!(cohort[0].days, 0);
    }

    #[test]
    fn test_reduce_granted_days_consumes_oldest_first() {
        let store = InMemoryLedgerStore::new();
        store.insert(grant("emp_001", 4, ymd(2023, 7, 1))).unwrap();
        store.insert(grant("emp_001", 6, ymd(2023, 7, 1))).unwrap();

        let removed = store
            .reduce_granted_days("emp_001", ymd(2023, 7, 1), 5)
            .unwrap();
        assert_eq!(removed, 5);

        let cohort = store.cohort_entries("emp_001", ymd(2023, 7, 1)).unwrap();
        assert_eq!(cohort[0].days, 0);
        assert_eq!(cohort[1].days, 5);
    }
}
