//! Judgment value objects.
//!
//! A [`GrantJudgment`] is the full output of judging one grant cycle. It is
//! never persisted: the ledger records only the grants that result from
//! eligible judgments.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The outcome of judging one grant cycle for one employee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrantJudgment {
    /// The employee the judgment is for.
    pub employee_id: String,
    /// The 1-based grant cycle number.
    pub cycle: u32,
    /// The judgment date: the grant date of the cycle, the day after the
    /// judgment period ends. Doubles as the cohort key when granted.
    pub judgment_date: NaiveDate,
    /// Start of the judgment period.
    pub period_start: NaiveDate,
    /// End of the judgment period (inclusive).
    pub period_end: NaiveDate,
    /// Scheduled work days over the period.
    pub required_work_days: u32,
    /// Attended days over the period (work sessions plus leave used).
    pub attended_days: u32,
    /// Attendance rate, `attended / required`.
    pub attendance_rate: Decimal,
    /// Whether the cycle grants leave.
    pub eligible: bool,
    /// Days granted when eligible, zero otherwise.
    pub grant_days: u32,
    /// Expiry date of the cohort this judgment would create.
    pub expiry_date: NaiveDate,
    /// Human-readable judgment reason.
    pub reason: String,
}

/// Forward-looking grant information for employee-facing display.
///
/// The `required_attendance_days` figure uses a ceiling on the threshold
/// product; it is display guidance only, the authoritative eligibility test
/// stays the real-valued rate comparison in the judge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NextGrantInfo {
    /// The next grant date at or after the reference date.
    pub next_grant_date: NaiveDate,
    /// The cycle number of that grant.
    pub cycle: u32,
    /// Days from the reference date until the grant date.
    pub days_until_grant: i64,
    /// Attended days accumulated so far in the open judgment period.
    pub current_attendance_days: u32,
    /// Attended days needed to meet the threshold over the whole period.
    pub required_attendance_days: u32,
    /// How many more attended days are still needed (0 when already met).
    pub remaining_attendance_needed: u32,
    /// The days that would be granted if the threshold is met.
    pub expected_grant_days: u32,
}
