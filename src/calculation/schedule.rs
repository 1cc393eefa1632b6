//! Grant-schedule date arithmetic.
//!
//! This module computes the deterministic sequence of grant dates, judgment
//! periods and expiry dates for an employee from their hire date. All date
//! additions are in calendar months; a day-of-month that does not exist in
//! the target month clamps to that month's last day (e.g. Aug 31 + 6 months
//! lands on Feb 28, or Feb 29 in a leap year).

use chrono::{Days, Months, NaiveDate};

use crate::error::{LeaveError, LeaveResult};

/// Months between the hire date and the first grant.
pub const MONTHS_TO_FIRST_GRANT: u32 = 6;

/// Months a granted cohort stays usable before it expires.
pub const EXPIRY_MONTHS: u32 = 24;

/// Computes the grant date for the given cycle.
///
/// Cycle 1 is the hire date plus six calendar months; cycle N is one year
/// later per additional cycle. The offset is applied as a single
/// month-addition from the hire date, so the hire day-of-month is preserved
/// until the final clamp (hire 2000-08-29 puts cycle 8 on 2008-02-29, not on
/// the 28th a chained year-addition from a clamped cycle 1 would produce).
///
/// # Errors
///
/// Returns [`LeaveError::InvalidCycle`] when `cycle` is zero.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use leave_engine::calculation::grant_date;
///
/// let hire = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
/// let first = grant_date(hire, 1).unwrap();
/// assert_eq!(first, NaiveDate::from_ymd_opt(2023, 7, 1).unwrap());
/// ```
pub fn grant_date(hire_date: NaiveDate, cycle: u32) -> LeaveResult<NaiveDate> {
    if cycle < 1 {
        return Err(LeaveError::InvalidCycle { cycle });
    }

    let months = MONTHS_TO_FIRST_GRANT + 12 * (cycle - 1);
    hire_date
        .checked_add_months(Months::new(months))
        .ok_or(LeaveError::InvalidCycle { cycle })
}

/// Computes the judgment period for the given cycle.
///
/// Attendance over this period decides the cycle's eligibility. Cycle 1
/// spans from the hire date to the day before the first grant date; cycle N
/// spans from the previous grant date to the day before grant date N.
///
/// # Errors
///
/// Returns [`LeaveError::InvalidCycle`] when `cycle` is zero.
pub fn judgment_period(hire_date: NaiveDate, cycle: u32) -> LeaveResult<(NaiveDate, NaiveDate)> {
    if cycle < 1 {
        return Err(LeaveError::InvalidCycle { cycle });
    }

    let start = if cycle == 1 {
        hire_date
    } else {
        grant_date(hire_date, cycle - 1)?
    };

    let end = grant_date(hire_date, cycle)?
        .checked_sub_days(Days::new(1))
        .ok_or(LeaveError::InvalidCycle { cycle })?;

    Ok((start, end))
}

/// Computes the expiry date for a cohort granted on `grant_date`.
///
/// The cohort expires two years after the grant, month-end clamped.
pub fn expiry_date(grant_date: NaiveDate) -> LeaveResult<NaiveDate> {
    grant_date
        .checked_add_months(Months::new(EXPIRY_MONTHS))
        .ok_or(LeaveError::InvalidPeriod {
            start: grant_date,
            end: grant_date,
        })
}

/// Computes the first `cycles` grant dates for an employee.
///
/// Used to refresh the denormalized grant-schedule cache on the employee
/// record whenever the hire date changes.
pub fn grant_schedule(hire_date: NaiveDate, cycles: u32) -> LeaveResult<Vec<NaiveDate>> {
    (1..=cycles).map(|n| grant_date(hire_date, n)).collect()
}
