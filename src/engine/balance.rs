//! Balance reconstruction and cache synchronization.
//!
//! The ledger is authoritative; the balance on the employee record is a
//! cache. [`BalanceManager::sync`] is the only writer of that cache, and it
//! always writes the full ledger-derived value, so the two can never drift
//! without it being a bug in the ledger itself.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{debug, error};

use crate::error::{LeaveError, LeaveResult};
use crate::models::{BalanceSnapshot, CohortBalance, EntryKind, ExpirationNotice};
use crate::store::{EmployeeStore, LedgerStore, sum_days};

/// Days before expiry at which a cohort shows up in the reminder list.
pub const EXPIRY_REMINDER_WINDOW_DAYS: i64 = 30;

/// Reconstructs balances from the ledger and maintains the employee cache.
#[derive(Clone)]
pub struct BalanceManager {
    employees: Arc<dyn EmployeeStore>,
    ledger: Arc<dyn LedgerStore>,
}

impl BalanceManager {
    /// Creates a manager over the employee and ledger stores.
    pub fn new(employees: Arc<dyn EmployeeStore>, ledger: Arc<dyn LedgerStore>) -> Self {
        Self { employees, ledger }
    }

    /// Computes the current balance from the full ledger.
    ///
    /// # Errors
    ///
    /// Returns [`LeaveError::DataIntegrity`] when the derived balance is
    /// negative. The bounded mutation paths make that impossible; seeing it
    /// means the ledger was corrupted outside the engine, and it must be
    /// surfaced rather than clamped.
    pub fn current_balance(&self, employee_id: &str) -> LeaveResult<u32> {
        let entries = self.ledger.entries(employee_id)?;

        let balance = i64::from(sum_days(&entries, EntryKind::Grant))
            - i64::from(sum_days(&entries, EntryKind::Use))
            - i64::from(sum_days(&entries, EntryKind::Expire))
            - i64::from(sum_days(&entries, EntryKind::Cancel));

        if balance < 0 {
            error!(employee_id, balance, "ledger-derived balance is negative");
            return Err(LeaveError::DataIntegrity {
                employee_id: employee_id.to_string(),
                balance,
            });
        }

        Ok(balance as u32)
    }

    /// Builds the per-cohort balance detail for an employee.
    ///
    /// Entries sharing a grant date are merged into one cohort. Cohorts
    /// with remaining days and at most [`EXPIRY_REMINDER_WINDOW_DAYS`] days
    /// until expiry are listed as upcoming expirations.
    pub fn detailed_balance(
        &self,
        employee_id: &str,
        today: NaiveDate,
    ) -> LeaveResult<BalanceSnapshot> {
        let entries = self.ledger.entries(employee_id)?;

        let mut by_cohort: BTreeMap<NaiveDate, Vec<_>> = BTreeMap::new();
        for entry in entries {
            by_cohort.entry(entry.grant_date).or_default().push(entry);
        }

        let mut cohorts = Vec::new();
        let mut total_balance = 0;
        for (grant_date, cohort_entries) in by_cohort {
            let granted = sum_days(&cohort_entries, EntryKind::Grant);
            if granted == 0 {
                // Nothing was ever granted under this key (e.g. a cohort
                // fully shrunk during seeding); skip it in the detail view.
                continue;
            }
            let used = sum_days(&cohort_entries, EntryKind::Use);
            let expired = sum_days(&cohort_entries, EntryKind::Expire);
            let cancelled = sum_days(&cohort_entries, EntryKind::Cancel);
            let remaining = granted.saturating_sub(used + expired + cancelled);

            let expiry_date = cohort_entries
                .iter()
                .find(|e| e.kind == EntryKind::Grant)
                .map(|e| e.expiry_date)
                .unwrap_or(grant_date);

            total_balance += remaining;
            cohorts.push(CohortBalance {
                grant_date,
                granted_days: granted,
                used_days: used,
                expired_days: expired,
                cancelled_days: cancelled,
                remaining_days: remaining,
                expiry_date,
                days_until_expiry: (expiry_date - today).num_days(),
            });
        }

        let upcoming_expirations = cohorts
            .iter()
            .filter(|c| c.remaining_days > 0 && c.days_until_expiry <= EXPIRY_REMINDER_WINDOW_DAYS)
            .map(|c| ExpirationNotice {
                grant_date: c.grant_date,
                expiry_date: c.expiry_date,
                remaining_days: c.remaining_days,
                days_until_expiry: c.days_until_expiry,
            })
            .collect();

        Ok(BalanceSnapshot {
            total_balance,
            cohorts,
            upcoming_expirations,
        })
    }

    /// Recomputes the balance and writes it to the employee cache.
    ///
    /// Must run after every ledger mutation; this is the only place the
    /// cached field is written.
    pub fn sync(&self, employee_id: &str) -> LeaveResult<u32> {
        let balance = self.current_balance(employee_id)?;
        self.employees.set_cached_balance(employee_id, balance)?;
        debug!(employee_id, balance, "synced cached balance");
        Ok(balance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Employee, LeaveLedgerEntry};
    use crate::store::{InMemoryEmployeeStore, InMemoryLedgerStore};

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn setup() -> (
        Arc<InMemoryEmployeeStore>,
        Arc<InMemoryLedgerStore>,
        BalanceManager,
    ) {
        let employees = Arc::new(InMemoryEmployeeStore::new());
        employees.upsert(Employee {
            id: "emp_001".to_string(),
            hire_date: ymd(2023, 1, 1),
            weekly_work_days: 5,
            active: true,
            grant_schedule: vec![],
            cached_balance: 0,
        });
        let ledger = Arc::new(InMemoryLedgerStore::new());
        let manager = BalanceManager::new(employees.clone(), ledger.clone());
        (employees, ledger, manager)
    }

    fn entry(
        kind: EntryKind,
        days: u32,
        grant_date: NaiveDate,
        occurred_on: Option<NaiveDate>,
    ) -> LeaveLedgerEntry {
        LeaveLedgerEntry::new(
            "emp_001",
            kind,
            days,
            grant_date,
            grant_date.checked_add_months(chrono::Months::new(24)).unwrap(),
            occurred_on,
            "",
        )
    }

    #[test]
    fn test_balance_of_empty_ledger_is_zero() {
        let (_, _, manager) = setup();
        assert_eq!(manager.current_balance("emp_001").unwrap(), 0);
    }

    #[test]
    fn test_balance_sums_all_entry_kinds() {
        let (_, ledger, manager) = setup();
        let cohort = ymd(2023, 7, 1);
        ledger.insert(entry(EntryKind::Grant, 10, cohort, None)).unwrap();
        ledger
            .insert(entry(EntryKind::Use, 3, cohort, Some(ymd(2023, 8, 1))))
            .unwrap();
        ledger
            .insert(entry(EntryKind::Cancel, 2, cohort, Some(ymd(2023, 9, 1))))
            .unwrap();
        ledger
            .insert(entry(EntryKind::Expire, 1, cohort, Some(ymd(2025, 7, 1))))
            .unwrap();

        assert_eq!(manager.current_balance("emp_001").unwrap(), 4);
    }

    #[test]
    fn test_negative_balance_surfaces_data_integrity_error() {
        let (_, ledger, manager) = setup();
        let cohort = ymd(2023, 7, 1);
        ledger.insert(entry(EntryKind::Grant, 5, cohort, None)).unwrap();
        ledger
            .insert(entry(EntryKind::Use, 8, cohort, Some(ymd(2023, 8, 1))))
            .unwrap();

        match manager.current_balance("emp_001") {
            Err(LeaveError::DataIntegrity {
                employee_id,
                balance,
            }) => {
                assert_eq!(employee_id, "emp_001");
                assert_eq!(balance, -3);
            }
            other => panic!("Expected DataIntegrity, got {:?}", other),
        }
    }

    #[test]
    fn test_sync_writes_the_cached_balance() {
        let (employees, ledger, manager) = setup();
        ledger
            .insert(entry(EntryKind::Grant, 10, ymd(2023, 7, 1), None))
            .unwrap();

        let synced = manager.sync("emp_001").unwrap();
        assert_eq!(synced, 10);
        assert_eq!(employees.get("emp_001").unwrap().cached_balance, 10);
    }

    #[test]
    fn test_detailed_balance_merges_same_day_grants() {
        let (_, ledger, manager) = setup();
        let cohort = ymd(2023, 7, 1);
        ledger.insert(entry(EntryKind::Grant, 6, cohort, None)).unwrap();
        ledger.insert(entry(EntryKind::Grant, 4, cohort, None)).unwrap();
        ledger
            .insert(entry(EntryKind::Use, 3, cohort, Some(ymd(2023, 8, 1))))
            .unwrap();

        let snapshot = manager.detailed_balance("emp_001", ymd(2023, 9, 1)).unwrap();
        assert_eq!(snapshot.cohorts.len(), 1);
        assert_eq!(snapshot.cohorts[0].granted_days, 10);
        assert_eq!(snapshot.cohorts[0].used_days, 3);
        assert_eq!(snapshot.cohorts[0].remaining_days, 7);
        assert_eq!(snapshot.total_balance, 7);
    }

    #[test]
    fn test_detailed_balance_orders_cohorts_by_grant_date() {
        let (_, ledger, manager) = setup();
        ledger
            .insert(entry(EntryKind::Grant, 11, ymd(2024, 7, 1), None))
            .unwrap();
        ledger
            .insert(entry(EntryKind::Grant, 10, ymd(2023, 7, 1), None))
            .unwrap();

        let snapshot = manager.detailed_balance("emp_001", ymd(2024, 8, 1)).unwrap();
        assert_eq!(snapshot.cohorts[0].grant_date, ymd(2023, 7, 1));
        assert_eq!(snapshot.cohorts[1].grant_date, ymd(2024, 7, 1));
        assert_eq!(snapshot.total_balance, 21);
    }

    #[test]
    fn test_upcoming_expirations_respect_the_window() {
        let (_, ledger, manager) = setup();
        // Expires 2025-07-01; 2025-06-10 is 21 days out.
        ledger
            .insert(entry(EntryKind::Grant, 10, ymd(2023, 7, 1), None))
            .unwrap();
        // Expires 2026-07-01; far outside the window.
        ledger
            .insert(entry(EntryKind::Grant, 11, ymd(2024, 7, 1), None))
            .unwrap();

        let snapshot = manager.detailed_balance("emp_001", ymd(2025, 6, 10)).unwrap();
        assert_eq!(snapshot.upcoming_expirations.len(), 1);
        assert_eq!(
            snapshot.upcoming_expirations[0].grant_date,
            ymd(2023, 7, 1)
        );
        assert_eq!(snapshot.upcoming_expirations[0].days_until_expiry, 21);
    }

    #[test]
    fn test_fully_consumed_cohort_is_not_an_upcoming_expiration() {
        let (_, ledger, manager) = setup();
        let cohort = ymd(2023, 7, 1);
        ledger.insert(entry(EntryKind::Grant, 10, cohort, None)).unwrap();
        ledger
            .insert(entry(EntryKind::Use, 10, cohort, Some(ymd(2024, 1, 1))))
            .unwrap();

        let snapshot = manager.detailed_balance("emp_001", ymd(2025, 6, 10)).unwrap();
        assert!(snapshot.upcoming_expirations.is_empty());
    }
}
