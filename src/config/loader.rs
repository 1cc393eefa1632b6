//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading entitlement
//! configuration from YAML files.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::error::{LeaveError, LeaveResult};

use super::types::{EntitlementConfig, EntitlementRow, PolicyMetadata};

#[derive(Debug, Deserialize)]
struct PolicyFile {
    code: String,
    name: String,
    version: String,
    threshold: Decimal,
}

#[derive(Debug, Deserialize)]
struct TablesFile {
    rows: BTreeMap<u8, EntitlementRow>,
}

/// Loads and provides access to entitlement configuration.
///
/// # Directory Structure
///
/// ```text
/// config/statutory/
/// ├── policy.yaml   # Rule-set metadata and eligibility threshold
/// └── tables.yaml   # Entitlement rows keyed by weekly work days
/// ```
///
/// # Example
///
/// ```no_run
/// use leave_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/statutory").unwrap();
/// println!("Policy: {}", loader.metadata().name);
/// println!("Cycle 1, 5-day week: {} days", loader.grant_days(1, 5).unwrap());
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: EntitlementConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// # Errors
    ///
    /// Returns [`LeaveError::ConfigNotFound`] when a required file is
    /// missing and [`LeaveError::ConfigParse`] when a file contains invalid
    /// YAML or fails validation.
    pub fn load<P: AsRef<Path>>(path: P) -> LeaveResult<Self> {
        let path = path.as_ref();

        let policy: PolicyFile = Self::load_yaml(&path.join("policy.yaml"))?;
        let tables: TablesFile = Self::load_yaml(&path.join("tables.yaml"))?;

        if tables.rows.is_empty() {
            return Err(LeaveError::ConfigParse {
                path: path.join("tables.yaml").display().to_string(),
                message: "no entitlement rows defined".to_string(),
            });
        }
        for (weekly, row) in &tables.rows {
            if row.by_cycle.is_empty() {
                return Err(LeaveError::ConfigParse {
                    path: path.join("tables.yaml").display().to_string(),
                    message: format!("row {} has no per-cycle values", weekly),
                });
            }
        }

        let metadata = PolicyMetadata {
            code: policy.code,
            name: policy.name,
            version: policy.version,
        };

        Ok(Self {
            config: EntitlementConfig::new(metadata, policy.threshold, tables.rows),
        })
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> LeaveResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| LeaveError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| LeaveError::ConfigParse {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Returns the underlying entitlement configuration.
    pub fn config(&self) -> &EntitlementConfig {
        &self.config
    }

    /// Returns the rule-set metadata.
    pub fn metadata(&self) -> &PolicyMetadata {
        self.config.metadata()
    }

    /// Gets the granted days for a cycle and weekly work-day count.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use leave_engine::config::ConfigLoader;
    ///
    /// let loader = ConfigLoader::load("./config/statutory")?;
    /// assert_eq!(loader.grant_days(1, 5)?, 10);
    /// # Ok::<(), leave_engine::error::LeaveError>(())
    /// ```
    pub fn grant_days(&self, cycle: u32, weekly_work_days: u8) -> LeaveResult<u32> {
        crate::calculation::entitlement_days(&self.config, cycle, weekly_work_days)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_path() -> &'static str {
        "./config/statutory"
    }

    #[test]
    fn test_load_valid_configuration() {
        let result = ConfigLoader::load(config_path());
        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());

        let loader = result.unwrap();
        assert_eq!(loader.metadata().code, "annual_paid_leave");
    }

    #[test]
    fn test_loaded_tables_match_builtin_statutory_default() {
        let loader = ConfigLoader::load(config_path()).unwrap();
        let builtin = EntitlementConfig::statutory();

        assert_eq!(loader.config().threshold(), builtin.threshold());
        assert_eq!(loader.config().rows(), builtin.rows());
    }

    #[test]
    fn test_grant_days_for_full_time_first_cycle() {
        let loader = ConfigLoader::load(config_path()).unwrap();
        assert_eq!(loader.grant_days(1, 5).unwrap(), 10);
    }

    #[test]
    fn test_grant_days_caps_from_cycle_seven() {
        let loader = ConfigLoader::load(config_path()).unwrap();
        assert_eq!(loader.grant_days(7, 5).unwrap(), 20);
        assert_eq!(loader.grant_days(9, 2).unwrap(), 7);
    }

    #[test]
    fn test_load_missing_directory_returns_error() {
        let result = ConfigLoader::load("/nonexistent/path");
        assert!(result.is_err());

        match result {
            Err(LeaveError::ConfigNotFound { path }) => {
                assert!(path.contains("policy.yaml"));
            }
            _ => panic!("Expected ConfigNotFound error"),
        }
    }
}
