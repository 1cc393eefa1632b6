//! Leave-ledger entry model.
//!
//! The ledger is the single source of truth for leave balances. Entries are
//! append-only: a revoked grant is recorded by a `Cancel` entry, a lapsed
//! cohort by an `Expire` entry, never by deleting the original `Grant`.
//! The one sanctioned in-place mutation is the bounded grant-day shrink the
//! store exposes for seeding corrections.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The kind of a ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    /// Days granted to a cohort by an eligible judgment.
    Grant,
    /// Days taken as leave, consuming the cohort.
    Use,
    /// A grant (or part of one) revoked by re-judgment.
    Cancel,
    /// The unused remainder of a cohort lapsing at its expiry date.
    Expire,
}

impl std::fmt::Display for EntryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntryKind::Grant => write!(f, "grant"),
            EntryKind::Use => write!(f, "use"),
            EntryKind::Cancel => write!(f, "cancel"),
            EntryKind::Expire => write!(f, "expire"),
        }
    }
}

/// A single immutable entry in an employee's leave ledger.
///
/// Every entry belongs to a cohort, identified by `grant_date`: the grant
/// date of the cycle the days originate from. For any cohort the invariant
/// `grant - use - expire - cancel >= 0` holds at all times; the engine
/// enforces it through bounded operations rather than rejecting requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveLedgerEntry {
    /// Unique identifier for the entry.
    pub id: Uuid,
    /// The employee this entry belongs to.
    pub employee_id: String,
    /// The kind of entry.
    pub kind: EntryKind,
    /// Number of days, always positive.
    pub days: u32,
    /// Cohort key: the grant date of the originating grant cycle.
    pub grant_date: NaiveDate,
    /// The cohort's expiry date (grant date plus two years, clamped).
    pub expiry_date: NaiveDate,
    /// The used date for `Use`; the processing date for `Cancel`/`Expire`;
    /// `None` for `Grant`.
    pub occurred_on: Option<NaiveDate>,
    /// Free-form note: the judgment reason, a cancellation reason, etc.
    pub note: String,
    /// When the entry was appended.
    pub created_at: DateTime<Utc>,
}

impl LeaveLedgerEntry {
    /// Creates a new entry with a fresh id, stamped now.
    pub fn new(
        employee_id: impl Into<String>,
        kind: EntryKind,
        days: u32,
        grant_date: NaiveDate,
        expiry_date: NaiveDate,
        occurred_on: Option<NaiveDate>,
        note: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            employee_id: employee_id.into(),
            kind,
            days,
            grant_date,
            expiry_date,
            occurred_on,
            note: note.into(),
            created_at: Utc::now(),
        }
    }
}
