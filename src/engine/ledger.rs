//! Append-only ledger mutations.
//!
//! Every business event lands here as a new entry keyed by its grant
//! cohort. After each write the cached balance is re-synced from the
//! ledger, so callers observe the new balance immediately.

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{info, warn};

use crate::engine::balance::BalanceManager;
use crate::error::{LeaveError, LeaveResult};
use crate::models::{
    CancellationResult, EntryKind, GrantJudgment, LeaveLedgerEntry,
};
use crate::store::{LedgerStore, cohort_remaining, sum_days};

/// Appends grant, use, cancel and expire entries to the ledger.
#[derive(Clone)]
pub struct LedgerProcessor {
    ledger: Arc<dyn LedgerStore>,
    balance: BalanceManager,
}

impl LedgerProcessor {
    /// Creates a processor over the ledger store.
    pub fn new(ledger: Arc<dyn LedgerStore>, balance: BalanceManager) -> Self {
        Self { ledger, balance }
    }

    /// Records the grant decided by a judgment.
    ///
    /// Ineligible and zero-day judgments record nothing and return `None`.
    /// The cohort key is the judgment date, and the expiry comes from the
    /// judgment so the entry and the decision can never disagree.
    pub fn apply_grant(
        &self,
        judgment: &GrantJudgment,
    ) -> LeaveResult<Option<LeaveLedgerEntry>> {
        if !judgment.eligible || judgment.grant_days == 0 {
            return Ok(None);
        }

        let entry = LeaveLedgerEntry::new(
            &judgment.employee_id,
            EntryKind::Grant,
            judgment.grant_days,
            judgment.judgment_date,
            judgment.expiry_date,
            None,
            &format!("cycle {} grant", judgment.cycle),
        );
        self.ledger.insert(entry.clone())?;
        let balance = self.balance.sync(&judgment.employee_id)?;
        info!(
            employee_id = %judgment.employee_id,
            cycle = judgment.cycle,
            days = judgment.grant_days,
            balance,
            "recorded leave grant"
        );
        Ok(Some(entry))
    }

    /// Records leave taken against a specific grant cohort.
    ///
    /// # Errors
    ///
    /// Returns [`LeaveError::GrantNotFound`] when no grant exists under
    /// `grant_date`, and [`LeaveError::InsufficientBalance`] when the
    /// cohort cannot cover `days`.
    pub fn record_use(
        &self,
        employee_id: &str,
        grant_date: NaiveDate,
        days: u32,
        used_on: NaiveDate,
        note: &str,
    ) -> LeaveResult<LeaveLedgerEntry> {
        let cohort = self.ledger.cohort_entries(employee_id, grant_date)?;
        if sum_days(&cohort, EntryKind::Grant) == 0 {
            return Err(LeaveError::GrantNotFound {
                employee_id: employee_id.to_string(),
                grant_date,
            });
        }

        let available = cohort_remaining(&cohort);
        if days > available {
            return Err(LeaveError::InsufficientBalance {
                employee_id: employee_id.to_string(),
                grant_date,
                requested: days,
                available,
            });
        }

        let expiry_date = cohort
            .iter()
            .find(|e| e.kind == EntryKind::Grant)
            .map(|e| e.expiry_date)
            .unwrap_or(grant_date);
        let entry = LeaveLedgerEntry::new(
            employee_id,
            EntryKind::Use,
            days,
            grant_date,
            expiry_date,
            Some(used_on),
            note,
        );
        self.ledger.insert(entry.clone())?;
        self.balance.sync(employee_id)?;
        Ok(entry)
    }

    /// Cancels up to `days` from a grant cohort by appending a cancel entry.
    ///
    /// The cancellation is bounded by what the cohort still holds, so a
    /// request larger than the remainder is satisfied partially rather
    /// than rejected. The history already written stays intact.
    pub fn cancel(
        &self,
        employee_id: &str,
        grant_date: NaiveDate,
        days: u32,
        cancelled_on: NaiveDate,
        reason: &str,
    ) -> LeaveResult<CancellationResult> {
        let cohort = self.ledger.cohort_entries(employee_id, grant_date)?;
        if sum_days(&cohort, EntryKind::Grant) == 0 {
            return Err(LeaveError::GrantNotFound {
                employee_id: employee_id.to_string(),
                grant_date,
            });
        }

        let available = cohort_remaining(&cohort);
        let actual = days.min(available);
        if actual > 0 {
            let expiry_date = cohort
                .iter()
                .find(|e| e.kind == EntryKind::Grant)
                .map(|e| e.expiry_date)
                .unwrap_or(grant_date);
            self.ledger.insert(LeaveLedgerEntry::new(
                employee_id,
                EntryKind::Cancel,
                actual,
                grant_date,
                expiry_date,
                Some(cancelled_on),
                reason,
            ))?;
        }
        let new_total_balance = self.balance.sync(employee_id)?;

        if actual < days {
            warn!(
                employee_id,
                %grant_date,
                requested = days,
                actual,
                "cancellation larger than cohort remainder, applied partially"
            );
        }
        Ok(CancellationResult {
            requested: days,
            actual,
            was_partial: actual < days,
            new_total_balance,
        })
    }

    /// Expires every cohort whose expiry date has passed as of `as_of`.
    ///
    /// One expire entry is written per cohort, covering its remaining
    /// days. Cohorts already expired to zero produce nothing, so running
    /// the sweep twice on the same day is a no-op.
    pub fn process_expiration(
        &self,
        employee_id: &str,
        as_of: NaiveDate,
    ) -> LeaveResult<Vec<LeaveLedgerEntry>> {
        let entries = self.ledger.entries(employee_id)?;

        let mut cohort_keys: Vec<NaiveDate> = entries
            .iter()
            .filter(|e| e.kind == EntryKind::Grant && e.expiry_date <= as_of)
            .map(|e| e.grant_date)
            .collect();
        cohort_keys.sort_unstable();
        cohort_keys.dedup();

        let mut written = Vec::new();
        for grant_date in cohort_keys {
            let cohort: Vec<_> = entries
                .iter()
                .filter(|e| e.grant_date == grant_date)
                .cloned()
                .collect();
            let remaining = cohort_remaining(&cohort);
            if remaining == 0 {
                continue;
            }
            let expiry_date = cohort
                .iter()
                .find(|e| e.kind == EntryKind::Grant)
                .map(|e| e.expiry_date)
                .unwrap_or(grant_date);
            let entry = LeaveLedgerEntry::new(
                employee_id,
                EntryKind::Expire,
                remaining,
                grant_date,
                expiry_date,
                Some(as_of),
                "two-year validity elapsed",
            );
            self.ledger.insert(entry.clone())?;
            info!(
                employee_id,
                %grant_date,
                days = remaining,
                "expired leave cohort"
            );
            written.push(entry);
        }

        if !written.is_empty() {
            self.balance.sync(employee_id)?;
        }
        Ok(written)
    }

    /// Shrinks a cohort's granted days in place, bounded by its remainder.
    ///
    /// This is a seeding correction for migrated data, not a business
    /// event; normal revocations go through [`LedgerProcessor::cancel`].
    pub fn reduce_grant(
        &self,
        employee_id: &str,
        grant_date: NaiveDate,
        days: u32,
    ) -> LeaveResult<u32> {
        let cohort = self.ledger.cohort_entries(employee_id, grant_date)?;
        if sum_days(&cohort, EntryKind::Grant) == 0 {
            return Err(LeaveError::GrantNotFound {
                employee_id: employee_id.to_string(),
                grant_date,
            });
        }
        let bounded = days.min(cohort_remaining(&cohort));
        let reduced = self
            .ledger
            .reduce_granted_days(employee_id, grant_date, bounded)?;
        self.balance.sync(employee_id)?;
        Ok(reduced)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    use crate::models::Employee;
    use crate::store::{EmployeeStore, InMemoryEmployeeStore, InMemoryLedgerStore};

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn setup() -> (Arc<InMemoryLedgerStore>, Arc<InMemoryEmployeeStore>, LedgerProcessor) {
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
        let balance = BalanceManager::new(employees.clone(), ledger.clone());
        let processor = LedgerProcessor::new(ledger.clone(), balance);
        (ledger, employees, processor)
    }

    fn eligible_judgment(days: u32) -> GrantJudgment {
        GrantJudgment {
            employee_id: "emp_001".to_string(),
            cycle: 1,
            judgment_date: ymd(2023, 7, 1),
            period_start: ymd(2023, 1, 1),
            period_end: ymd(2023, 6, 30),
            required_work_days: 129,
            attended_days: 120,
            attendance_rate: Decimal::new(93, 2),
            eligible: true,
            grant_days: days,
            expiry_date: ymd(2025, 7, 1),
            reason: "attendance requirement met".to_string(),
        }
    }

    #[test]
    fn test_apply_grant_writes_entry_and_syncs_cache() {
        let (_, employees, processor) = setup();
        let entry = processor.apply_grant(&eligible_judgment(10)).unwrap().unwrap();

        assert_eq!(entry.kind, EntryKind::Grant);
        assert_eq!(entry.days, 10);
        assert_eq!(entry.grant_date, ymd(2023, 7, 1));
        assert_eq!(entry.expiry_date, ymd(2025, 7, 1));
        assert_eq!(employees.get("emp_001").unwrap().cached_balance, 10);
    }

    #[test]
    fn test_apply_grant_skips_ineligible_judgment() {
        let (ledger, _, processor) = setup();
        let mut judgment = eligible_judgment(10);
        judgment.eligible = false;
        judgment.grant_days = 0;

        assert!(processor.apply_grant(&judgment).unwrap().is_none());
        assert!(ledger.entries("emp_001").unwrap().is_empty());
    }

    #[test]
    fn test_record_use_against_unknown_cohort_fails() {
        let (_, _, processor) = setup();
        let result =
            processor.record_use("emp_001", ymd(2023, 7, 1), 1, ymd(2023, 8, 1), "leave taken");
        assert!(matches!(result, Err(LeaveError::GrantNotFound { .. })));
    }

    #[test]
    fn test_record_use_beyond_remainder_fails() {
        let (_, _, processor) = setup();
        processor.apply_grant(&eligible_judgment(10)).unwrap();
        processor
            .record_use("emp_001", ymd(2023, 7, 1), 7, ymd(2023, 8, 1), "leave taken")
            .unwrap();

        let overdraw =
            processor.record_use("emp_001", ymd(2023, 7, 1), 4, ymd(2023, 9, 1), "leave taken");
        match overdraw {
            Err(LeaveError::InsufficientBalance {
                requested,
                available,
                ..
            }) => {
                assert_eq!(requested, 4);
                assert_eq!(available, 3);
            }
            other => panic!("Expected InsufficientBalance, got {:?}", other),
        }
    }

    #[test]
    fn test_cancel_is_bounded_by_cohort_remainder() {
        let (_, _, processor) = setup();
        processor.apply_grant(&eligible_judgment(10)).unwrap();
        processor
            .record_use("emp_001", ymd(2023, 7, 1), 7, ymd(2023, 8, 1), "leave taken")
            .unwrap();

        let result = processor
            .cancel("emp_001", ymd(2023, 7, 1), 10, ymd(2023, 9, 1), "revoked")
            .unwrap();
        assert_eq!(result.requested, 10);
        assert_eq!(result.actual, 3);
        assert!(result.was_partial);
        assert_eq!(result.new_total_balance, 0);
    }

    #[test]
    fn test_cancel_of_empty_cohort_writes_nothing() {
        let (ledger, _, processor) = setup();
        processor.apply_grant(&eligible_judgment(5)).unwrap();
        processor
            .record_use("emp_001", ymd(2023, 7, 1), 5, ymd(2023, 8, 1), "leave taken")
            .unwrap();

        let result = processor
            .cancel("emp_001", ymd(2023, 7, 1), 2, ymd(2023, 9, 1), "revoked")
            .unwrap();
        assert_eq!(result.actual, 0);
        assert!(result.was_partial);
        // Only the grant and the use are on the ledger.
        assert_eq!(ledger.entries("emp_001").unwrap().len(), 2);
    }

    #[test]
    fn test_expiration_sweeps_only_elapsed_cohorts() {
        let (_, _, processor) = setup();
        processor.apply_grant(&eligible_judgment(10)).unwrap();
        let mut later = eligible_judgment(11);
        later.cycle = 2;
        later.judgment_date = ymd(2024, 7, 1);
        later.expiry_date = ymd(2026, 7, 1);
        processor.apply_grant(&later).unwrap();
        processor
            .record_use("emp_001", ymd(2023, 7, 1), 4, ymd(2024, 1, 1), "leave taken")
            .unwrap();

        let written = processor.process_expiration("emp_001", ymd(2025, 7, 1)).unwrap();
        assert_eq!(written.len(), 1);
        assert_eq!(written[0].grant_date, ymd(2023, 7, 1));
        assert_eq!(written[0].days, 6);
        assert_eq!(written[0].occurred_on, Some(ymd(2025, 7, 1)));
    }

    #[test]
    fn test_expiration_is_idempotent() {
        let (ledger, _, processor) = setup();
        processor.apply_grant(&eligible_judgment(10)).unwrap();

        let first = processor.process_expiration("emp_001", ymd(2025, 7, 1)).unwrap();
        assert_eq!(first.len(), 1);
        let second = processor.process_expiration("emp_001", ymd(2025, 7, 2)).unwrap();
        assert!(second.is_empty());
        assert_eq!(ledger.entries("emp_001").unwrap().len(), 2);
    }

    #[test]
    fn test_reduce_grant_is_bounded_and_syncs() {
        let (_, employees, processor) = setup();
        processor.apply_grant(&eligible_judgment(10)).unwrap();
        processor
            .record_use("emp_001", ymd(2023, 7, 1), 6, ymd(2023, 8, 1), "leave taken")
            .unwrap();

        let reduced = processor.reduce_grant("emp_001", ymd(2023, 7, 1), 9).unwrap();
        assert_eq!(reduced, 4);
        assert_eq!(employees.get("emp_001").unwrap().cached_balance, 0);
    }
}
