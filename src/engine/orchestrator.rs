//! Batch and reactive entry points.

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{info, warn};

use crate::calculation::{grant_date, grant_schedule, judgment_period};
use crate::config::EntitlementConfig;
use crate::engine::attendance::AttendanceAggregator;
use crate::engine::balance::BalanceManager;
use crate::engine::judge::EligibilityJudge;
use crate::engine::ledger::LedgerProcessor;
use crate::error::LeaveResult;
use crate::models::{
    BalanceSnapshot, BatchError, BatchReport, CancellationResult, Employee, EntryKind,
    GrantJudgment, LeaveLedgerEntry, NextGrantInfo,
};
use crate::store::{
    AttendanceStore, EmployeeLockMap, EmployeeStore, LedgerStore, sum_days,
};

use super::MAX_TRACKED_CYCLES;

/// Drives the daily grant batch and reactive re-judgment.
///
/// All mutations go through a per-employee lock, so a batch run and a
/// reactive re-judgment for the same employee serialize instead of
/// interleaving their ledger writes.
pub struct Orchestrator {
    employees: Arc<dyn EmployeeStore>,
    ledger: Arc<dyn LedgerStore>,
    locks: Arc<EmployeeLockMap>,
    judge: EligibilityJudge,
    processor: LedgerProcessor,
    balance: BalanceManager,
    reactive_enabled: bool,
}

impl Orchestrator {
    /// Wires the engine together over the three stores.
    ///
    /// `reactive_enabled` gates [`Orchestrator::on_attendance_changed`];
    /// disable it when attendance data is being backfilled in bulk and a
    /// single batch run afterwards should settle everything.
    pub fn new(
        employees: Arc<dyn EmployeeStore>,
        attendance: Arc<dyn AttendanceStore>,
        ledger: Arc<dyn LedgerStore>,
        config: EntitlementConfig,
        reactive_enabled: bool,
    ) -> Self {
        let aggregator = AttendanceAggregator::new(attendance, Arc::clone(&ledger));
        let balance = BalanceManager::new(Arc::clone(&employees), Arc::clone(&ledger));
        let judge = EligibilityJudge::new(aggregator, config);
        let processor = LedgerProcessor::new(Arc::clone(&ledger), balance.clone());
        Self {
            employees,
            ledger,
            locks: Arc::new(EmployeeLockMap::new()),
            judge,
            processor,
            balance,
            reactive_enabled,
        }
    }

    /// Runs the daily batch for every active employee.
    ///
    /// Each employee is judged when `as_of` is one of their grant dates,
    /// and their cohorts are swept for expiry regardless. A failure for
    /// one employee is recorded in the report and never aborts the run.
    pub fn run_daily(&self, as_of: NaiveDate) -> LeaveResult<BatchReport> {
        let employees = self.employees.active_employees()?;
        let mut report = BatchReport::new(as_of);
        for employee in &employees {
            self.process_employee(employee, as_of, &mut report);
        }
        info!(
            %as_of,
            processed = report.processed,
            granted = report.granted,
            rejected = report.rejected,
            expired_cohorts = report.expired_cohorts,
            errors = report.errors.len(),
            "daily batch finished"
        );
        Ok(report)
    }

    /// Runs the daily batch fanned out over `workers` scoped threads.
    ///
    /// Employees are chunked, each worker builds a partial report, and the
    /// partials are merged. Per-employee locks make this equivalent to the
    /// sequential run up to ordering.
    pub fn run_daily_parallel(&self, as_of: NaiveDate, workers: usize) -> LeaveResult<BatchReport> {
        let employees = self.employees.active_employees()?;
        let workers = workers.max(1);
        if employees.len() <= 1 || workers == 1 {
            let mut report = BatchReport::new(as_of);
            for employee in &employees {
                self.process_employee(employee, as_of, &mut report);
            }
            return Ok(report);
        }

        let chunk_size = employees.len().div_ceil(workers);
        let mut report = BatchReport::new(as_of);
        let partials = std::thread::scope(|scope| {
            let handles: Vec<_> = employees
                .chunks(chunk_size)
                .map(|chunk| {
                    scope.spawn(move || {
                        let mut partial = BatchReport::new(as_of);
                        for employee in chunk {
                            self.process_employee(employee, as_of, &mut partial);
                        }
                        partial
                    })
                })
                .collect();
            handles
                .into_iter()
                .map(|h| h.join().unwrap_or_else(|_| BatchReport::new(as_of)))
                .collect::<Vec<_>>()
        });
        for partial in partials {
            report.merge(partial);
        }
        Ok(report)
    }

    fn process_employee(&self, employee: &Employee, as_of: NaiveDate, report: &mut BatchReport) {
        let outcome = self.locks.with_employee(&employee.id, || {
            self.process_employee_locked(employee, as_of)
        });
        match outcome {
            Ok((judgment, expired)) => {
                report.expired_cohorts += expired;
                if let Some(judgment) = judgment {
                    report.processed += 1;
                    if judgment.eligible {
                        report.granted += 1;
                    } else {
                        report.rejected += 1;
                    }
                    report.judgments.push(judgment);
                }
            }
            Err(err) => {
                warn!(employee_id = %employee.id, error = %err, "batch skipped employee");
                report.errors.push(BatchError {
                    employee_id: employee.id.clone(),
                    message: err.to_string(),
                });
            }
        }
    }

    /// Judges the employee if `as_of` is a grant date, then sweeps expiry.
    fn process_employee_locked(
        &self,
        employee: &Employee,
        as_of: NaiveDate,
    ) -> LeaveResult<(Option<GrantJudgment>, u32)> {
        let judgment = match self.cycle_for_date(employee, as_of)? {
            Some(cycle) => {
                let cohort = self.ledger.cohort_entries(&employee.id, as_of)?;
                if sum_days(&cohort, EntryKind::Grant) > 0 {
                    // Already decided, e.g. the batch ran twice today.
                    None
                } else {
                    let judgment = self.judge.judge(employee, cycle)?;
                    self.processor.apply_grant(&judgment)?;
                    Some(judgment)
                }
            }
            None => None,
        };

        let expired = self.processor.process_expiration(&employee.id, as_of)?;
        Ok((judgment, expired.len() as u32))
    }

    fn cycle_for_date(&self, employee: &Employee, date: NaiveDate) -> LeaveResult<Option<u32>> {
        for cycle in 1..=MAX_TRACKED_CYCLES {
            let grant = grant_date(employee.hire_date, cycle)?;
            if grant == date {
                return Ok(Some(cycle));
            }
            if grant > date {
                break;
            }
        }
        Ok(None)
    }

    /// Re-judges the cycle whose judgment period covers a changed
    /// attendance date and reconciles the ledger with the new outcome.
    ///
    /// Only already-decided cycles (grant date at or before `today`) are
    /// touched; a change inside the current, still-open period simply
    /// waits for its batch day. Returns the judgments that were re-made.
    pub fn on_attendance_changed(
        &self,
        employee_id: &str,
        affected_date: NaiveDate,
        today: NaiveDate,
    ) -> LeaveResult<Vec<GrantJudgment>> {
        if !self.reactive_enabled {
            return Ok(Vec::new());
        }
        let employee = self.employees.get(employee_id)?;
        self.locks.with_employee(employee_id, || {
            self.rejudge_locked(&employee, affected_date, today)
        })
    }

    fn rejudge_locked(
        &self,
        employee: &Employee,
        affected_date: NaiveDate,
        today: NaiveDate,
    ) -> LeaveResult<Vec<GrantJudgment>> {
        let mut rejudged = Vec::new();
        // Periods partition the timeline after hire, so at most one cycle
        // can cover the affected date.
        for cycle in (1..=MAX_TRACKED_CYCLES).rev() {
            let decision_date = grant_date(employee.hire_date, cycle)?;
            if decision_date > today {
                continue;
            }
            let (start, end) = judgment_period(employee.hire_date, cycle)?;
            if affected_date < start || affected_date > end {
                continue;
            }

            let judgment = self.judge.judge(employee, cycle)?;
            self.reconcile(&judgment, today)?;
            rejudged.push(judgment);
            break;
        }
        Ok(rejudged)
    }

    /// Brings a cohort's decided days in line with a fresh judgment.
    ///
    /// The decided figure is grants minus cancellations within the cohort.
    /// A shortfall is topped up with a grant entry for the difference; an
    /// excess is cancelled, bounded by what is still unconsumed so days
    /// already taken stay taken.
    fn reconcile(&self, judgment: &GrantJudgment, today: NaiveDate) -> LeaveResult<()> {
        let cohort = self
            .ledger
            .cohort_entries(&judgment.employee_id, judgment.judgment_date)?;
        let decided = sum_days(&cohort, EntryKind::Grant)
            .saturating_sub(sum_days(&cohort, EntryKind::Cancel));
        let target = if judgment.eligible { judgment.grant_days } else { 0 };

        if target > decided {
            let mut delta = judgment.clone();
            delta.grant_days = target - decided;
            self.processor.apply_grant(&delta)?;
            info!(
                employee_id = %judgment.employee_id,
                cycle = judgment.cycle,
                added = target - decided,
                "re-judgment increased a grant"
            );
        } else if target < decided {
            let reason = if target == 0 {
                "revoked by re-judgment"
            } else {
                "re-judgment adjustment"
            };
            let result = self.processor.cancel(
                &judgment.employee_id,
                judgment.judgment_date,
                decided - target,
                today,
                reason,
            )?;
            info!(
                employee_id = %judgment.employee_id,
                cycle = judgment.cycle,
                removed = result.actual,
                "re-judgment reduced a grant"
            );
        }
        Ok(())
    }

    /// Recomputes and caches the grant-date schedule for an employee.
    ///
    /// Call after a hire-date correction.
    pub fn refresh_grant_schedule(&self, employee_id: &str) -> LeaveResult<Vec<NaiveDate>> {
        let employee = self.employees.get(employee_id)?;
        let schedule = grant_schedule(employee.hire_date, MAX_TRACKED_CYCLES)?;
        self.employees
            .set_grant_schedule(employee_id, schedule.clone())?;
        Ok(schedule)
    }

    /// Judges one cycle without writing anything, for inspection.
    pub fn judge(&self, employee_id: &str, cycle: u32) -> LeaveResult<GrantJudgment> {
        let employee = self.employees.get(employee_id)?;
        self.judge.judge(&employee, cycle)
    }

    /// Forward-looking grant information for an employee.
    pub fn next_grant_info(
        &self,
        employee_id: &str,
        reference_date: NaiveDate,
    ) -> LeaveResult<Option<NextGrantInfo>> {
        let employee = self.employees.get(employee_id)?;
        self.judge.next_grant_info(&employee, reference_date)
    }

    /// Per-cohort balance detail for an employee.
    pub fn detailed_balance(
        &self,
        employee_id: &str,
        today: NaiveDate,
    ) -> LeaveResult<BalanceSnapshot> {
        self.balance.detailed_balance(employee_id, today)
    }

    /// Records leave taken, under the employee lock.
    pub fn record_use(
        &self,
        employee_id: &str,
        grant_date: NaiveDate,
        days: u32,
        used_on: NaiveDate,
        note: &str,
    ) -> LeaveResult<LeaveLedgerEntry> {
        self.locks.with_employee(employee_id, || {
            self.processor
                .record_use(employee_id, grant_date, days, used_on, note)
        })
    }

    /// Cancels days from a cohort, under the employee lock.
    pub fn cancel(
        &self,
        employee_id: &str,
        grant_date: NaiveDate,
        days: u32,
        cancelled_on: NaiveDate,
        reason: &str,
    ) -> LeaveResult<CancellationResult> {
        self.locks.with_employee(employee_id, || {
            self.processor
                .cancel(employee_id, grant_date, days, cancelled_on, reason)
        })
    }

    /// Direct access to the ledger processor, for seeding and corrections.
    pub fn processor(&self) -> &LedgerProcessor {
        &self.processor
    }

    /// Direct access to the balance manager.
    pub fn balances(&self) -> &BalanceManager {
        &self.balance
    }
}
