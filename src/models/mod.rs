//! Core data models for the paid-leave engine.
//!
//! This module contains all the domain models used throughout the engine.

mod balance;
mod employee;
mod judgment;
mod ledger;
mod report;

pub use balance::{BalanceSnapshot, CancellationResult, CohortBalance, ExpirationNotice};
pub use employee::Employee;
pub use judgment::{GrantJudgment, NextGrantInfo};
pub use ledger::{EntryKind, LeaveLedgerEntry};
pub use report::{BatchError, BatchReport};
