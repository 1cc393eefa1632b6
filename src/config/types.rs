//! Configuration types for the paid-leave engine.
//!
//! The statutory entitlement tables and the attendance-rate threshold are
//! data, not code: they ship as YAML under `config/statutory/` and load into
//! an [`EntitlementConfig`]. A compiled-in [`EntitlementConfig::statutory`]
//! default carries the same values for embedders that do not want to manage
//! config files.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Identifies the statutory rule set a configuration encodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyMetadata {
    /// Short machine-readable code for the rule set.
    pub code: String,
    /// Human-readable name of the statute or policy.
    pub name: String,
    /// Version string, typically the effective date.
    pub version: String,
}

/// One row of the entitlement table, keyed by weekly work days.
///
/// `by_cycle` holds the granted days for cycles 1..=6; every later cycle
/// receives `cap`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitlementRow {
    /// Granted days for cycles 1 through `by_cycle.len()`.
    pub by_cycle: Vec<u32>,
    /// Granted days for every cycle past the end of `by_cycle`.
    pub cap: u32,
}

/// The full entitlement configuration: tables plus the eligibility threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntitlementConfig {
    metadata: PolicyMetadata,
    threshold: Decimal,
    rows: BTreeMap<u8, EntitlementRow>,
}

impl EntitlementConfig {
    /// Creates a configuration from its parts.
    pub fn new(
        metadata: PolicyMetadata,
        threshold: Decimal,
        rows: BTreeMap<u8, EntitlementRow>,
    ) -> Self {
        Self {
            metadata,
            threshold,
            rows,
        }
    }

    /// The compiled-in statutory default: 80% attendance threshold and the
    /// standard full-time and reduced-schedule tables.
    pub fn statutory() -> Self {
        let mut rows = BTreeMap::new();
        rows.insert(
            5,
            EntitlementRow {
                by_cycle: vec![10, 11, 12, 14, 16, 18],
                cap: 20,
            },
        );
        rows.insert(
            4,
            EntitlementRow {
                by_cycle: vec![7, 8, 9, 10, 12, 13],
                cap: 15,
            },
        );
        rows.insert(
            3,
            EntitlementRow {
                by_cycle: vec![5, 6, 6, 8, 9, 10],
                cap: 11,
            },
        );
        rows.insert(
            2,
            EntitlementRow {
                by_cycle: vec![3, 4, 4, 5, 6, 6],
                cap: 7,
            },
        );
        rows.insert(
            1,
            EntitlementRow {
                by_cycle: vec![1, 2, 2, 2, 3, 3],
                cap: 3,
            },
        );

        Self {
            metadata: PolicyMetadata {
                code: "annual_paid_leave".to_string(),
                name: "Annual Paid Leave (Labor Standards Act, Article 39)".to_string(),
                version: "built-in".to_string(),
            },
            threshold: Decimal::new(80, 2),
            rows,
        }
    }

    /// Returns the configuration metadata.
    pub fn metadata(&self) -> &PolicyMetadata {
        &self.metadata
    }

    /// Returns the attendance-rate threshold (e.g. 0.80).
    pub fn threshold(&self) -> Decimal {
        self.threshold
    }

    /// Returns the table row for a weekly work-day count, if one exists.
    pub fn row(&self, weekly_work_days: u8) -> Option<&EntitlementRow> {
        self.rows.get(&weekly_work_days)
    }

    /// Returns all table rows keyed by weekly work days.
    pub fn rows(&self) -> &BTreeMap<u8, EntitlementRow> {
        &self.rows
    }
}
