//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading deduction
//! configurations from YAML files.

use std::fs;
use std::path::Path;

use crate::error::{EngineError, EngineResult};

use super::types::{DeductionConfig, FeeDiscountConfig, ScheduleMetadata, StatutoryConfig};

/// Loads and provides access to a deduction configuration.
///
/// The `ConfigLoader` reads YAML configuration files from a versioned
/// directory and validates them before handing out a [`DeductionConfig`].
///
/// # Directory Structure
///
/// ```text
/// config/ke2024/
/// ├── schedule.yaml        # Schedule metadata
/// ├── statutory.yaml       # NSSF tiers, NHIF bands, tax bands, relief, levy
/// └── fee_deductions.yaml  # Child discount tiers and the salary cap
/// ```
///
/// # Example
///
/// ```no_run
/// use payroll_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/ke2024").unwrap();
/// println!("Schedule: {}", loader.config().schedule().name);
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: DeductionConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the configuration directory (e.g., "./config/ke2024")
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` instance on success, or an error if:
    /// - Any required file is missing (`ConfigNotFound`)
    /// - Any file contains invalid YAML (`ConfigParseError`)
    /// - Any table violates a range or ordering invariant (`InvalidConfig`)
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let schedule_path = path.join("schedule.yaml");
        let metadata = Self::load_yaml::<ScheduleMetadata>(&schedule_path)?;

        let statutory_path = path.join("statutory.yaml");
        let statutory = Self::load_yaml::<StatutoryConfig>(&statutory_path)?;

        let fee_path = path.join("fee_deductions.yaml");
        let fee_discounts = Self::load_yaml::<FeeDiscountConfig>(&fee_path)?;

        let config = DeductionConfig::new(metadata, statutory, fee_discounts)?;

        Ok(Self { config })
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Returns the loaded and validated configuration.
    pub fn config(&self) -> &DeductionConfig {
        &self.config
    }
}
