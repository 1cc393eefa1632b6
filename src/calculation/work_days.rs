//! Required-work-day calculation.
//!
//! Scheduled work days over a judgment period are prorated from the weekly
//! contracted work-day count: `(days_in_period / 7) * weekly_work_days`,
//! truncated. The arithmetic is done as `(days * weekly) / 7` in integers,
//! which is the exact floor of that expression.

use chrono::NaiveDate;

use crate::error::{LeaveError, LeaveResult};

/// Computes the scheduled work days in `[start, end]` (both inclusive).
///
/// # Errors
///
/// Returns [`LeaveError::InvalidPeriod`] when `end` precedes `start` and
/// [`LeaveError::InvalidWeeklyWorkDays`] when `weekly_work_days` exceeds 7.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use leave_engine::calculation::required_work_days;
///
/// let start = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
/// let end = NaiveDate::from_ymd_opt(2023, 6, 30).unwrap();
/// // 181 days at 5 days/week: (181 * 5) / 7 = 129
/// assert_eq!(required_work_days(start, end, 5).unwrap(), 129);
/// ```
pub fn required_work_days(
    start: NaiveDate,
    end: NaiveDate,
    weekly_work_days: u8,
) -> LeaveResult<u32> {
    if weekly_work_days > 7 {
        return Err(LeaveError::InvalidWeeklyWorkDays {
            days: weekly_work_days,
        });
    }
    if end < start {
        return Err(LeaveError::InvalidPeriod { start, end });
    }

    let period_days = (end - start).num_days() + 1;
    let work_days = period_days * i64::from(weekly_work_days) / 7;

    Ok(work_days as u32)
}
