//! Configuration loading and management for the Payroll Computation Engine.
//!
//! This module provides functionality to load payroll configurations from YAML
//! files: the payroll policy, statutory contribution rates and effective-dated
//! income tax tables.
//!
//! # Example
//!
//! ```no_run
//! use payroll_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/standard").unwrap();
//! println!("Loaded policy: {}", config.policy().name);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    ContributionsConfig, DeductionSchedule, HealthInsuranceConfig, HousingFundConfig,
    IncomeTaxPolicy, MIN_TAX_BRACKETS, NightDifferentialConfig, PayrollConfig, PolicyConfig,
    SocialInsuranceConfig, TaxBracket, TaxTable, TimestampPolicy,
};

#[cfg(test)]
pub(crate) use types::standard_config;
