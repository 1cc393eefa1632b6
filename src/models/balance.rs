//! Balance snapshot models.
//!
//! These are read models derived from the ledger: the per-cohort breakdown,
//! cohorts nearing expiry, and the outcome of a bounded cancellation.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Per-cohort balance detail, merged over entries sharing one grant date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CohortBalance {
    /// The cohort key.
    pub grant_date: NaiveDate,
    /// Total days granted to the cohort.
    pub granted_days: u32,
    /// Days used from the cohort.
    pub used_days: u32,
    /// Days expired from the cohort.
    pub expired_days: u32,
    /// Days cancelled from the cohort.
    pub cancelled_days: u32,
    /// Days still available: granted - used - expired - cancelled.
    pub remaining_days: u32,
    /// When the cohort expires.
    pub expiry_date: NaiveDate,
    /// Days from the snapshot date until expiry (negative once past).
    pub days_until_expiry: i64,
}

/// A cohort whose remaining days lapse within the reminder window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpirationNotice {
    /// The cohort key.
    pub grant_date: NaiveDate,
    /// When the cohort expires.
    pub expiry_date: NaiveDate,
    /// Days that will lapse unless used.
    pub remaining_days: u32,
    /// Days from the snapshot date until expiry.
    pub days_until_expiry: i64,
}

/// A full balance snapshot for one employee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceSnapshot {
    /// Total remaining days across all cohorts.
    pub total_balance: u32,
    /// Per-cohort detail, ascending by grant date.
    pub cohorts: Vec<CohortBalance>,
    /// Cohorts with remaining days expiring within 30 days.
    pub upcoming_expirations: Vec<ExpirationNotice>,
}

/// The outcome of a bounded (possibly partial) cancellation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CancellationResult {
    /// Days the caller asked to cancel.
    pub requested: u32,
    /// Days actually cancelled, bounded by the cohort's remainder.
    pub actual: u32,
    /// True when fewer days were cancelled than requested.
    pub was_partial: bool,
    /// The employee's total balance after the cancellation.
    pub new_total_balance: u32,
}
