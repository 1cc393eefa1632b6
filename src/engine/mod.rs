//! The leave engine.
//!
//! Layered over the stores: the [`AttendanceAggregator`] counts attendance,
//! the [`EligibilityJudge`] turns attendance into grant judgments, the
//! [`LedgerProcessor`] writes ledger entries, the [`BalanceManager`] derives
//! balances from them, and the [`Orchestrator`] drives the daily batch and
//! reactive re-judgment on top of all four.

mod attendance;
mod balance;
mod judge;
mod ledger;
mod orchestrator;

pub use attendance::AttendanceAggregator;
pub use balance::{BalanceManager, EXPIRY_REMINDER_WINDOW_DAYS};
pub use judge::EligibilityJudge;
pub use ledger::LedgerProcessor;
pub use orchestrator::Orchestrator;

/// How many grant cycles the engine scans from the hire date.
///
/// Twenty annual cycles cover a continuous career comfortably; anything
/// beyond sits on the cap row of the entitlement table anyway.
pub const MAX_TRACKED_CYCLES: u32 = 20;
