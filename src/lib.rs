//! Statutory Paid-Leave Accrual and Balance Engine
//!
//! This crate computes statutory paid-leave entitlement for employees based on
//! tenure, weekly contracted work days and attendance rate, and maintains a
//! running leave balance in an append-only ledger that survives use,
//! cancellation and time-based expiration.
//!
//! The engine is transport-agnostic: HTTP handlers, cron triggers and admin
//! screens are external callers of [`engine::Orchestrator`].

#![warn(missing_docs)]

pub mod calculation;
pub mod config;
pub mod engine;
pub mod error;
pub mod models;
pub mod store;
