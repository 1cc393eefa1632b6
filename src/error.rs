//! Error types for the paid-leave engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur during leave processing.
//!
//! Eligibility itself is never an error: an employee who fails the
//! attendance-rate test receives an ineligible [`crate::models::GrantJudgment`],
//! not an `Err`. Errors are reserved for programmer-error inputs, collaborator
//! failures and data-integrity violations.

use chrono::NaiveDate;
use thiserror::Error;

/// The main error type for the paid-leave engine.
///
/// # Example
///
/// ```
/// use leave_engine::error::LeaveError;
///
/// let error = LeaveError::InvalidCycle { cycle: 0 };
/// assert_eq!(error.to_string(), "Grant cycle must be 1 or greater: 0");
/// ```
#[derive(Debug, Error)]
pub enum LeaveError {
    /// A grant cycle below 1 was requested. Programmer error, fail fast.
    #[error("Grant cycle must be 1 or greater: {cycle}")]
    InvalidCycle {
        /// The offending cycle number.
        cycle: u32,
    },

    /// A weekly work-day count outside 0..=7 was supplied.
    #[error("Weekly work days must be between 0 and 7: {days}")]
    InvalidWeeklyWorkDays {
        /// The offending weekly work-day count.
        days: u8,
    },

    /// A date range whose end precedes its start.
    #[error("Period end {end} precedes period start {start}")]
    InvalidPeriod {
        /// The start of the range.
        start: NaiveDate,
        /// The end of the range.
        end: NaiveDate,
    },

    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParse {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// No grant entry exists for the requested cohort.
    #[error("No grant recorded for employee '{employee_id}' on {grant_date}")]
    GrantNotFound {
        /// The employee the cohort belongs to.
        employee_id: String,
        /// The cohort key (grant date) that was not found.
        grant_date: NaiveDate,
    },

    /// A leave-use request exceeds the cohort's remaining days.
    #[error(
        "Employee '{employee_id}' has {available} day(s) left in the {grant_date} cohort, \
         {requested} requested"
    )]
    InsufficientBalance {
        /// The employee the cohort belongs to.
        employee_id: String,
        /// The cohort key (grant date).
        grant_date: NaiveDate,
        /// The number of days requested.
        requested: u32,
        /// The number of days still available.
        available: u32,
    },

    /// The ledger-derived balance went negative. This is a data-integrity
    /// bug to surface, never a state to silently clamp.
    #[error("Ledger-derived balance for employee '{employee_id}' is negative: {balance}")]
    DataIntegrity {
        /// The employee whose ledger is inconsistent.
        employee_id: String,
        /// The negative derived balance.
        balance: i64,
    },

    /// The employee collaborator could not supply a record.
    #[error("Employee lookup failed for '{employee_id}': {message}")]
    EmployeeLookup {
        /// The employee id that was requested.
        employee_id: String,
        /// A description of the lookup failure.
        message: String,
    },

    /// The attendance collaborator could not supply a day count.
    #[error("Attendance read failed for '{employee_id}': {message}")]
    AttendanceRead {
        /// The employee the read was for.
        employee_id: String,
        /// A description of the read failure.
        message: String,
    },

    /// The ledger store rejected an operation.
    #[error("Ledger store error: {message}")]
    LedgerStore {
        /// A description of the store failure.
        message: String,
    },
}

/// A type alias for Results that return LeaveError.
pub type LeaveResult<T> = Result<T, LeaveError>;
