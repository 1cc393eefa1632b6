//! Eligibility judgment for one grant cycle.
//!
//! The judge combines the schedule, the aggregated attendance and the
//! entitlement table into a [`GrantJudgment`]. It never mutates state;
//! ineligibility is a judgment, not an error.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use tracing::debug;

use crate::calculation::{
    attendance_rate, entitlement_days, expiry_date, grant_date, judgment_period, meets_threshold,
    required_work_days,
};
use crate::config::EntitlementConfig;
use crate::error::LeaveResult;
use crate::models::{Employee, GrantJudgment, NextGrantInfo};

use super::MAX_TRACKED_CYCLES;
use super::attendance::AttendanceAggregator;

/// Judges grant-cycle eligibility for employees.
#[derive(Clone)]
pub struct EligibilityJudge {
    aggregator: AttendanceAggregator,
    config: EntitlementConfig,
}

impl EligibilityJudge {
    /// Creates a judge over an attendance aggregator and a table config.
    pub fn new(aggregator: AttendanceAggregator, config: EntitlementConfig) -> Self {
        Self { aggregator, config }
    }

    /// Returns the entitlement configuration the judge applies.
    pub fn config(&self) -> &EntitlementConfig {
        &self.config
    }

    /// Judges one grant cycle for an employee.
    ///
    /// A period with zero scheduled work days is an explicit ineligible
    /// judgment, not an error; errors are reserved for invalid cycles and
    /// collaborator failures.
    pub fn judge(&self, employee: &Employee, cycle: u32) -> LeaveResult<GrantJudgment> {
        let (period_start, period_end) = judgment_period(employee.hire_date, cycle)?;
        let judgment_date = grant_date(employee.hire_date, cycle)?;
        let expiry = expiry_date(judgment_date)?;

        let required = required_work_days(period_start, period_end, employee.weekly_work_days)?;
        if required == 0 {
            return Ok(GrantJudgment {
                employee_id: employee.id.clone(),
                cycle,
                judgment_date,
                period_start,
                period_end,
                required_work_days: 0,
                attended_days: 0,
                attendance_rate: Decimal::ZERO,
                eligible: false,
                grant_days: 0,
                expiry_date: expiry,
                reason: "zero scheduled work days in judgment period".to_string(),
            });
        }

        let attended = self
            .aggregator
            .attended_days(&employee.id, period_start, period_end)?;
        let rate = attendance_rate(attended, required);
        let eligible = meets_threshold(rate, self.config.threshold());

        let (grant_days, reason) = if eligible {
            (
                entitlement_days(&self.config, cycle, employee.weekly_work_days)?,
                "attendance requirement met".to_string(),
            )
        } else {
            (
                0,
                format!(
                    "attendance rate below the {} threshold",
                    self.config.threshold()
                ),
            )
        };

        debug!(
            employee_id = %employee.id,
            cycle,
            attended,
            required,
            %rate,
            eligible,
            grant_days,
            "judged grant cycle"
        );

        Ok(GrantJudgment {
            employee_id: employee.id.clone(),
            cycle,
            judgment_date,
            period_start,
            period_end,
            required_work_days: required,
            attended_days: attended,
            attendance_rate: rate,
            eligible,
            grant_days,
            expiry_date: expiry,
            reason,
        })
    }

    /// Computes forward-looking grant information for employee display.
    ///
    /// Returns `None` when no tracked cycle lies after the reference date.
    /// The required-attendance figure here uses a ceiling on the threshold
    /// product; it is display guidance, not the eligibility test.
    pub fn next_grant_info(
        &self,
        employee: &Employee,
        reference_date: NaiveDate,
    ) -> LeaveResult<Option<NextGrantInfo>> {
        let mut next_cycle = None;
        for cycle in 1..=MAX_TRACKED_CYCLES {
            if grant_date(employee.hire_date, cycle)? > reference_date {
                next_cycle = Some(cycle);
                break;
            }
        }
        let Some(cycle) = next_cycle else {
            return Ok(None);
        };

        let next_grant_date = grant_date(employee.hire_date, cycle)?;
        let (period_start, period_end) = judgment_period(employee.hire_date, cycle)?;

        let current_attendance_days = if reference_date < period_start {
            0
        } else {
            self.aggregator.attended_days(
                &employee.id,
                period_start,
                period_end.min(reference_date),
            )?
        };

        let required = required_work_days(period_start, period_end, employee.weekly_work_days)?;
        let required_attendance_days = (Decimal::from(required) * self.config.threshold())
            .ceil()
            .to_u32()
            .unwrap_or(required);

        Ok(Some(NextGrantInfo {
            next_grant_date,
            cycle,
            days_until_grant: (next_grant_date - reference_date).num_days(),
            current_attendance_days,
            required_attendance_days,
            remaining_attendance_needed: required_attendance_days
                .saturating_sub(current_attendance_days),
            expected_grant_days: entitlement_days(&self.config, cycle, employee.weekly_work_days)?,
        }))
    }
}
