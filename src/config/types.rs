//! Configuration types for payroll computation.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Minimum number of brackets an income tax table must define.
pub const MIN_TAX_BRACKETS: usize = 4;

/// What happens to computed income tax when a payslip is paid out.
///
/// Income tax is always computed. Some organisations remit it outside the
/// semi-monthly payout; for them the withheld amount is zeroed on the
/// payslip and the run records that it did so.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncomeTaxPolicy {
    /// Withhold the computed income tax.
    Withhold,
    /// Compute income tax but withhold nothing at payout.
    ZeroAtPayout,
}

/// What happens to `generated_at` when an existing payslip is overwritten.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimestampPolicy {
    /// Keep the timestamp of the original generation.
    Preserve,
    /// Stamp the payslip with the time of the latest finalize.
    Refresh,
}

/// The night window and its premium.
#[derive(Debug, Clone, Deserialize)]
pub struct NightDifferentialConfig {
    /// Premium as a fraction of the hourly rate (e.g. 0.10).
    pub rate: Decimal,
    /// First hour of the window (e.g. 22).
    pub start_hour: u32,
    /// Hour at which the window closes, exclusive (e.g. 6).
    pub end_hour: u32,
}

impl NightDifferentialConfig {
    /// Returns true if an hour-step starting at `hour` lies inside the window.
    ///
    /// Windows wrap past midnight when `start_hour > end_hour`.
    pub fn contains_hour(&self, hour: u32) -> bool {
        if self.start_hour > self.end_hour {
            hour >= self.start_hour || hour < self.end_hour
        } else {
            hour >= self.start_hour && hour < self.end_hour
        }
    }
}

/// Payroll policy from policy.yaml.
#[derive(Debug, Clone, Deserialize)]
pub struct PolicyConfig {
    /// Human-readable name of the policy.
    pub name: String,
    /// Working days per month used to derive hourly rates from salaries.
    pub working_days_per_month: Decimal,
    /// Working hours per day used to derive hourly rates from salaries.
    pub hours_per_day: Decimal,
    /// Worked minutes per session paid as regular time.
    pub regular_minutes_per_day: i64,
    /// Longest session accepted, by span and by worked minutes.
    #[serde(default = "default_max_session_minutes")]
    pub max_session_minutes: i64,
    /// Overtime multiplier applied to the hourly rate (e.g. 1.25).
    pub overtime_multiplier: Decimal,
    /// Night-differential window and premium.
    pub night_differential: NightDifferentialConfig,
    /// Whether income tax is withheld at payout.
    pub income_tax_policy: IncomeTaxPolicy,
    /// What an update does to the generation timestamp.
    pub timestamp_on_update: TimestampPolicy,
}

fn default_max_session_minutes() -> i64 {
    24 * 60
}

/// Housing-fund contribution: a percentage capped at a ceiling.
#[derive(Debug, Clone, Deserialize)]
pub struct HousingFundConfig {
    /// Contribution rate (e.g. 0.02).
    pub rate: Decimal,
    /// Maximum contribution per month in major units.
    pub ceiling: Decimal,
}

/// Health-insurance premium and the employee's share of it.
#[derive(Debug, Clone, Deserialize)]
pub struct HealthInsuranceConfig {
    /// Premium rate (e.g. 0.05).
    pub rate: Decimal,
    /// Fraction of the premium paid by the employee (e.g. 0.5).
    pub employee_share: Decimal,
}

/// Social-insurance contribution, uncapped.
#[derive(Debug, Clone, Deserialize)]
pub struct SocialInsuranceConfig {
    /// Contribution rate (e.g. 0.045).
    pub rate: Decimal,
}

/// Statutory contribution rates from contributions.yaml.
#[derive(Debug, Clone, Deserialize)]
pub struct ContributionsConfig {
    /// Housing fund.
    pub housing_fund: HousingFundConfig,
    /// Health insurance.
    pub health_insurance: HealthInsuranceConfig,
    /// Social insurance.
    pub social_insurance: SocialInsuranceConfig,
}

/// One bracket of a progressive tax table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TaxBracket {
    /// Lower bound of the bracket in major units; income above it is taxed at `rate`.
    pub lower: Decimal,
    /// Marginal rate for income inside the bracket.
    pub rate: Decimal,
}

/// An income tax table effective from a date, from tax_tables/*.yaml.
#[derive(Debug, Clone, Deserialize)]
pub struct TaxTable {
    /// The date from which the table applies.
    pub effective_date: NaiveDate,
    /// Brackets in ascending order of lower bound.
    pub brackets: Vec<TaxBracket>,
}

impl TaxTable {
    /// Checks the table is usable as a progressive schedule.
    pub fn validate(&self) -> EngineResult<()> {
        let invalid = |message: String| EngineError::InvalidConfig {
            message: format!("tax table {}: {}", self.effective_date, message),
        };

        if self.brackets.len() < MIN_TAX_BRACKETS {
            return Err(invalid(format!(
                "needs at least {} brackets, found {}",
                MIN_TAX_BRACKETS,
                self.brackets.len()
            )));
        }
        if self.brackets[0].lower != Decimal::ZERO {
            return Err(invalid("first bracket must start at zero".to_string()));
        }
        for pair in self.brackets.windows(2) {
            if pair[1].lower <= pair[0].lower {
                return Err(invalid(format!(
                    "bracket bounds must ascend, {} follows {}",
                    pair[1].lower, pair[0].lower
                )));
            }
        }
        if let Some(bracket) = self
            .brackets
            .iter()
            .find(|b| b.rate < Decimal::ZERO || b.rate > Decimal::ONE)
        {
            return Err(invalid(format!("rate {} is outside [0, 1]", bracket.rate)));
        }
        Ok(())
    }
}

/// Everything the statutory deduction calculator needs for one period.
#[derive(Debug, Clone, Copy)]
pub struct DeductionSchedule<'a> {
    /// Contribution rates.
    pub contributions: &'a ContributionsConfig,
    /// The tax table in force.
    pub tax_table: &'a TaxTable,
}

/// The complete payroll configuration loaded from YAML files.
#[derive(Debug, Clone)]
pub struct PayrollConfig {
    policy: PolicyConfig,
    contributions: ContributionsConfig,
    /// Sorted oldest first.
    tax_tables: Vec<TaxTable>,
}

impl PayrollConfig {
    /// Creates a PayrollConfig from its component parts, validating them.
    pub fn new(
        policy: PolicyConfig,
        contributions: ContributionsConfig,
        tax_tables: Vec<TaxTable>,
    ) -> EngineResult<Self> {
        validate_policy(&policy)?;
        validate_contributions(&contributions)?;
        if tax_tables.is_empty() {
            return Err(EngineError::InvalidConfig {
                message: "at least one tax table is required".to_string(),
            });
        }
        for table in &tax_tables {
            table.validate()?;
        }

        let mut sorted_tables = tax_tables;
        sorted_tables.sort_by(|a, b| a.effective_date.cmp(&b.effective_date));
        Ok(Self {
            policy,
            contributions,
            tax_tables: sorted_tables,
        })
    }

    /// Returns the payroll policy.
    pub fn policy(&self) -> &PolicyConfig {
        &self.policy
    }

    /// Returns the statutory contribution rates.
    pub fn contributions(&self) -> &ContributionsConfig {
        &self.contributions
    }

    /// Returns all tax tables, oldest first.
    pub fn tax_tables(&self) -> &[TaxTable] {
        &self.tax_tables
    }

    /// Returns the most recent tax table effective on or before `date`.
    pub fn tax_table_for(&self, date: NaiveDate) -> EngineResult<&TaxTable> {
        self.tax_tables
            .iter()
            .rev()
            .find(|t| t.effective_date <= date)
            .ok_or(EngineError::TaxTableNotFound { date })
    }

    /// Returns the deduction schedule in force on `date`.
    pub fn deduction_schedule(&self, date: NaiveDate) -> EngineResult<DeductionSchedule<'_>> {
        Ok(DeductionSchedule {
            contributions: &self.contributions,
            tax_table: self.tax_table_for(date)?,
        })
    }
}

fn validate_fraction(name: &str, value: Decimal) -> EngineResult<()> {
    if value < Decimal::ZERO || value > Decimal::ONE {
        return Err(EngineError::InvalidConfig {
            message: format!("{} must be within [0, 1], got {}", name, value),
        });
    }
    Ok(())
}

fn validate_policy(policy: &PolicyConfig) -> EngineResult<()> {
    let invalid = |message: &str| EngineError::InvalidConfig {
        message: message.to_string(),
    };

    if policy.working_days_per_month <= Decimal::ZERO || policy.hours_per_day <= Decimal::ZERO {
        return Err(invalid(
            "working_days_per_month and hours_per_day must be positive",
        ));
    }
    if policy.regular_minutes_per_day <= 0 {
        return Err(invalid("regular_minutes_per_day must be positive"));
    }
    if policy.max_session_minutes < policy.regular_minutes_per_day {
        return Err(invalid(
            "max_session_minutes must be at least regular_minutes_per_day",
        ));
    }
    if policy.overtime_multiplier < Decimal::ONE {
        return Err(invalid("overtime_multiplier must be at least 1"));
    }
    let night = &policy.night_differential;
    if night.start_hour > 23 || night.end_hour > 23 {
        return Err(invalid("night differential hours must be within 0-23"));
    }
    validate_fraction("night_differential.rate", night.rate)
}

fn validate_contributions(contributions: &ContributionsConfig) -> EngineResult<()> {
    validate_fraction("housing_fund.rate", contributions.housing_fund.rate)?;
    validate_fraction("health_insurance.rate", contributions.health_insurance.rate)?;
    validate_fraction(
        "health_insurance.employee_share",
        contributions.health_insurance.employee_share,
    )?;
    validate_fraction("social_insurance.rate", contributions.social_insurance.rate)?;
    if contributions.housing_fund.ceiling < Decimal::ZERO {
        return Err(EngineError::InvalidConfig {
            message: "housing_fund.ceiling must not be negative".to_string(),
        });
    }
    Ok(())
}

/// An in-code copy of `config/standard` for unit tests.
#[cfg(test)]
pub(crate) fn standard_config() -> PayrollConfig {
    use std::str::FromStr;

    let dec = |s: &str| Decimal::from_str(s).unwrap();
    let bracket = |lower: &str, rate: &str| TaxBracket {
        lower: dec(lower),
        rate: dec(rate),
    };

    PayrollConfig::new(
        PolicyConfig {
            name: "Standard semi-monthly payroll".to_string(),
            working_days_per_month: dec("22"),
            hours_per_day: dec("8"),
            regular_minutes_per_day: 480,
            max_session_minutes: 1440,
            overtime_multiplier: dec("1.25"),
            night_differential: NightDifferentialConfig {
                rate: dec("0.10"),
                start_hour: 22,
                end_hour: 6,
            },
            income_tax_policy: IncomeTaxPolicy::Withhold,
            timestamp_on_update: TimestampPolicy::Refresh,
        },
        ContributionsConfig {
            housing_fund: HousingFundConfig {
                rate: dec("0.02"),
                ceiling: dec("100"),
            },
            health_insurance: HealthInsuranceConfig {
                rate: dec("0.05"),
                employee_share: dec("0.5"),
            },
            social_insurance: SocialInsuranceConfig { rate: dec("0.045") },
        },
        vec![TaxTable {
            effective_date: NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
            brackets: vec![
                bracket("0", "0"),
                bracket("20833", "0.15"),
                bracket("33333", "0.20"),
                bracket("66667", "0.25"),
                bracket("166667", "0.30"),
                bracket("666667", "0.35"),
            ],
        }],
    )
    .unwrap()
}
