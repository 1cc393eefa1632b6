//! Pure calculation logic for the paid-leave engine.
//!
//! This module contains the stateless arithmetic the engine is built on:
//! grant-schedule date computation, required-work-day proration, statutory
//! entitlement-table lookup, and attendance-rate threshold checks. Nothing
//! here touches a store; the stateful orchestration lives in
//! [`crate::engine`].

mod attendance;
mod entitlement;
mod schedule;
mod work_days;

pub use attendance::{attendance_rate, meets_threshold};
pub use entitlement::entitlement_days;
pub use schedule::{
    EXPIRY_MONTHS, MONTHS_TO_FIRST_GRANT, expiry_date, grant_date, grant_schedule, judgment_period,
};
pub use work_days::required_work_days;
