//! Attendance-rate arithmetic.
//!
//! The rate is `attended_days / required_work_days` as an exact decimal; the
//! statutory threshold comparison is inclusive (a rate of exactly 0.80 is
//! eligible). `Decimal` keeps the boundary exact where a float comparison
//! could drift.

use rust_decimal::Decimal;

/// Computes the attendance rate for a judgment period.
///
/// Returns zero when `required_work_days` is zero; the judge treats such a
/// period as ineligible before the rate ever matters.
///
/// # Example
///
/// ```
/// use rust_decimal::Decimal;
/// use leave_engine::calculation::attendance_rate;
///
/// assert_eq!(attendance_rate(104, 130), Decimal::new(8, 1));
/// ```
pub fn attendance_rate(attended_days: u32, required_work_days: u32) -> Decimal {
    if required_work_days == 0 {
        return Decimal::ZERO;
    }

    Decimal::from(attended_days) / Decimal::from(required_work_days)
}

/// Returns true when `rate` meets the threshold. Inclusive comparison.
pub fn meets_threshold(rate: Decimal, threshold: Decimal) -> bool {
    rate >= threshold
}
