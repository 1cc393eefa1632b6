//! Statutory entitlement-table lookup.
//!
//! Granted days are a function of the grant cycle (tenure) and the weekly
//! contracted work-day count. Employees working five or more days a week use
//! the full-time row; one to four days use the reduced-schedule rows; from
//! the seventh cycle onward every row caps at its statutory maximum.

use crate::config::EntitlementConfig;
use crate::error::{LeaveError, LeaveResult};

/// Looks up the statutory grant days for a cycle and weekly work-day count.
///
/// A weekly work-day count of zero yields zero days (such an employee is
/// never eligible); a count above five is capped at the five-day row, which
/// is the last row the statute defines.
///
/// # Errors
///
/// Returns [`LeaveError::InvalidCycle`] for cycle zero and
/// [`LeaveError::InvalidWeeklyWorkDays`] for counts above seven.
///
/// # Example
///
/// ```
/// use leave_engine::calculation::entitlement_days;
/// use leave_engine::config::EntitlementConfig;
///
/// let config = EntitlementConfig::statutory();
/// assert_eq!(entitlement_days(&config, 1, 5).unwrap(), 10);
/// assert_eq!(entitlement_days(&config, 7, 5).unwrap(), 20);
/// ```
pub fn entitlement_days(
    config: &EntitlementConfig,
    cycle: u32,
    weekly_work_days: u8,
) -> LeaveResult<u32> {
    if cycle < 1 {
        return Err(LeaveError::InvalidCycle { cycle });
    }
    if weekly_work_days > 7 {
        return Err(LeaveError::InvalidWeeklyWorkDays {
            days: weekly_work_days,
        });
    }
    if weekly_work_days == 0 {
        return Ok(0);
    }

    let row_key = weekly_work_days.min(5);
    let Some(row) = config.row(row_key) else {
        return Ok(0);
    };

    if cycle as usize > row.by_cycle.len() {
        return Ok(row.cap);
    }

    Ok(row.by_cycle[(cycle - 1) as usize])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_time_row_cycles_one_to_six() {
        let config = EntitlementConfig::statutory();
        let expected = [10, 11, 12, 14, 16, 18];
        for (i, days) in expected.iter().enumerate() {
            let cycle = (i + 1) as u32;
            assert_eq!(entitlement_days(&config, cycle, 5).unwrap(), *days);
        }
    }

    #[test]
    fn test_full_time_caps_at_twenty_from_cycle_seven() {
        let config = EntitlementConfig::statutory();
        assert_eq!(entitlement_days(&config, 7, 5).unwrap(), 20);
        assert_eq!(entitlement_days(&config, 12, 5).unwrap(), 20);
        assert_eq!(entitlement_days(&config, 30, 5).unwrap(), 20);
    }

    #[test]
    fn test_six_and_seven_day_weeks_use_full_time_row() {
        let config = EntitlementConfig::statutory();
        assert_eq!(entitlement_days(&config, 1, 6).unwrap(), 10);
        assert_eq!(entitlement_days(&config, 1, 7).unwrap(), 10);
        assert_eq!(entitlement_days(&config, 7, 6).unwrap(), 20);
    }

    #[test]
    fn test_four_day_week_row() {
        let config = EntitlementConfig::statutory();
        let expected = [7, 8, 9, 10, 12, 13, 15];
        for (i, days) in expected.iter().enumerate() {
            let cycle = (i + 1) as u32;
            assert_eq!(entitlement_days(&config, cycle, 4).unwrap(), *days);
        }
    }

    #[test]
    fn test_three_day_week_row() {
        let config = EntitlementConfig::statutory();
        let expected = [5, 6, 6, 8, 9, 10, 11];
        for (i, days) in expected.iter().enumerate() {
            let cycle = (i + 1) as u32;
            assert_eq!(entitlement_days(&config, cycle, 3).unwrap(), *days);
        }
    }

    #[test]
    fn test_two_day_week_row() {
        let config = EntitlementConfig::statutory();
        let expected = [3, 4, 4, 5, 6, 6, 7];
        for (i, days) in expected.iter().enumerate() {
            let cycle = (i + 1) as u32;
            assert_eq!(entitlement_days(&config, cycle, 2).unwrap(), *days);
        }
    }

    #[test]
    fn test_one_day_week_row() {
        let config = EntitlementConfig::statutory();
        let expected = [1, 2, 2, 2, 3, 3, 3];
        for (i, days) in expected.iter().enumerate() {
            let cycle = (i + 1) as u32;
            assert_eq!(entitlement_days(&config, cycle, 1).unwrap(), *days);
        }
    }

    #[test]
    fn test_zero_weekly_work_days_grants_nothing() {
        let config = EntitlementConfig::statutory();
        assert_eq!(entitlement_days(&config, 1, 0).unwrap(), 0);
        assert_eq!(entitlement_days(&config, 10, 0).unwrap(), 0);
    }

    #[test]
    fn test_cycle_zero_is_invalid() {
        let config = EntitlementConfig::statutory();
        assert!(matches!(
            entitlement_days(&config, 0, 5),
            Err(LeaveError::InvalidCycle { cycle: 0 })
        ));
    }

    #[test]
    fn test_weekly_work_days_above_seven_is_invalid() {
        let config = EntitlementConfig::statutory();
        assert!(matches!(
            entitlement_days(&config, 1, 8),
            Err(LeaveError::InvalidWeeklyWorkDays { days: 8 })
        ));
    }
}
