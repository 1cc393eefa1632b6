//! Configuration for the paid-leave engine.
//!
//! The statutory entitlement tables, their metadata and the attendance-rate
//! threshold are loaded from YAML via [`ConfigLoader`], or taken from the
//! compiled-in [`EntitlementConfig::statutory`] default.

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{EntitlementConfig, EntitlementRow, PolicyMetadata};
