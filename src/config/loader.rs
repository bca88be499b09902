//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading payroll
//! configurations from YAML files.

use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use tracing::debug;

use crate::error::{EngineError, EngineResult};

use super::types::{
    ContributionsConfig, DeductionSchedule, PayrollConfig, PolicyConfig, TaxTable,
};

/// Loads and provides access to payroll configuration.
///
/// The `ConfigLoader` reads YAML configuration files from a directory
/// and provides methods to query policy, contribution rates and tax tables.
///
/// # Directory Structure
///
/// ```text
/// config/standard/
/// ├── policy.yaml          # Overtime, night differential, payout policies
/// ├── contributions.yaml   # Housing fund, health and social insurance rates
/// └── tax_tables/
///     └── 2023-01-01.yaml  # Income tax brackets effective from this date
/// ```
///
/// # Example
///
/// ```no_run
/// use payroll_engine::config::ConfigLoader;
/// use chrono::NaiveDate;
///
/// let loader = ConfigLoader::load("./config/standard").unwrap();
/// println!("Policy: {}", loader.policy().name);
///
/// let date = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
/// let table = loader.tax_table_for(date).unwrap();
/// println!("{} tax brackets", table.brackets.len());
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: PayrollConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` instance on success, or an error if:
    /// - Any required file is missing (`ConfigNotFound`)
    /// - Any file contains invalid YAML or misses a field (`ConfigParseError`)
    /// - The values are unusable, e.g. descending tax brackets (`InvalidConfig`)
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let policy = Self::load_yaml::<PolicyConfig>(&path.join("policy.yaml"))?;
        let contributions = Self::load_yaml::<ContributionsConfig>(&path.join("contributions.yaml"))?;
        let tax_tables = Self::load_tax_tables(&path.join("tax_tables"))?;

        let config = PayrollConfig::new(policy, contributions, tax_tables)?;
        debug!(
            path = %path.display(),
            policy = %config.policy().name,
            tax_tables = config.tax_tables().len(),
            "Loaded payroll configuration"
        );

        Ok(Self { config })
    }

    /// Wraps an already-built configuration.
    pub fn from_config(config: PayrollConfig) -> Self {
        Self { config }
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

    /// Loads all tax tables from the tax_tables directory.
    fn load_tax_tables(tables_dir: &Path) -> EngineResult<Vec<TaxTable>> {
        let tables_dir_str = tables_dir.display().to_string();

        let entries = fs::read_dir(tables_dir).map_err(|_| EngineError::ConfigNotFound {
            path: tables_dir_str.clone(),
        })?;

        let mut tables = Vec::new();

        for entry in entries {
            let entry = entry.map_err(|_| EngineError::ConfigNotFound {
                path: tables_dir_str.clone(),
            })?;

            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "yaml") {
                tables.push(Self::load_yaml::<TaxTable>(&path)?);
            }
        }

        if tables.is_empty() {
            return Err(EngineError::ConfigNotFound {
                path: format!("{} (no tax tables found)", tables_dir_str),
            });
        }

        Ok(tables)
    }

    /// Returns the underlying payroll configuration.
    pub fn config(&self) -> &PayrollConfig {
        &self.config
    }

    /// Returns the payroll policy.
    pub fn policy(&self) -> &PolicyConfig {
        self.config.policy()
    }

    /// Returns the most recent tax table effective on or before `date`.
    pub fn tax_table_for(&self, date: NaiveDate) -> EngineResult<&TaxTable> {
        self.config.tax_table_for(date)
    }

    /// Returns the deduction schedule in force on `date`.
    pub fn deduction_schedule(&self, date: NaiveDate) -> EngineResult<DeductionSchedule<'_>> {
        self.config.deduction_schedule(date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{IncomeTaxPolicy, TimestampPolicy};
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn config_path() -> &'static str {
        "./config/standard"
    }

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_load_valid_configuration() {
        let result = ConfigLoader::load(config_path());
        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());
    }

    #[test]
    fn test_policy_loaded_correctly() {
        let loader = ConfigLoader::load(config_path()).unwrap();
        let policy = loader.policy();
        assert_eq!(policy.regular_minutes_per_day, 480);
        assert_eq!(policy.max_session_minutes, 1440);
        assert_eq!(policy.overtime_multiplier, dec("1.25"));
        assert_eq!(policy.working_days_per_month, dec("22"));
        assert_eq!(policy.hours_per_day, dec("8"));
        assert_eq!(policy.night_differential.rate, dec("0.10"));
        assert_eq!(policy.night_differential.start_hour, 22);
        assert_eq!(policy.night_differential.end_hour, 6);
        assert_eq!(policy.income_tax_policy, IncomeTaxPolicy::Withhold);
        assert_eq!(policy.timestamp_on_update, TimestampPolicy::Refresh);
    }

    #[test]
    fn test_contributions_loaded_correctly() {
        let loader = ConfigLoader::load(config_path()).unwrap();
        let contributions = loader.config().contributions();
        assert_eq!(contributions.housing_fund.rate, dec("0.02"));
        assert_eq!(contributions.housing_fund.ceiling, dec("100"));
        assert_eq!(contributions.health_insurance.rate, dec("0.05"));
        assert_eq!(contributions.health_insurance.employee_share, dec("0.5"));
        assert_eq!(contributions.social_insurance.rate, dec("0.045"));
    }

    #[test]
    fn test_tax_table_loaded_correctly() {
        let loader = ConfigLoader::load(config_path()).unwrap();
        let table = loader
            .tax_table_for(NaiveDate::from_ymd_opt(2026, 1, 1).unwrap())
            .unwrap();
        assert_eq!(table.brackets.len(), 6);
        assert_eq!(table.brackets[0].lower, Decimal::ZERO);
        assert_eq!(table.brackets[1].lower, dec("20833"));
        assert_eq!(table.brackets[1].rate, dec("0.15"));
    }

    #[test]
    fn test_shipped_config_matches_in_code_copy() {
        let loader = ConfigLoader::load(config_path()).unwrap();
        let expected = crate::config::types::standard_config();
        assert_eq!(
            loader.config().tax_tables()[0].brackets,
            expected.tax_tables()[0].brackets
        );
        assert_eq!(
            loader.policy().overtime_multiplier,
            expected.policy().overtime_multiplier
        );
    }

    #[test]
    fn test_load_missing_directory_returns_error() {
        let result = ConfigLoader::load("./config/does-not-exist");
        match result {
            Err(EngineError::ConfigNotFound { path }) => {
                assert!(path.contains("policy.yaml"));
            }
            other => panic!("Expected ConfigNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_deduction_schedule_before_first_table() {
        let loader = ConfigLoader::load(config_path()).unwrap();
        let result = loader.deduction_schedule(NaiveDate::from_ymd_opt(2019, 12, 31).unwrap());
        assert!(matches!(result, Err(EngineError::TaxTableNotFound { .. })));
    }
}
