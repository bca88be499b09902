//! Statutory deduction calculation.
//!
//! Maps a gross-pay basis to social insurance, health insurance, housing fund
//! and income tax. The four contributions are independent pure functions of
//! the basis; none reads shared state.

use rust_decimal::Decimal;

use crate::config::{
    DeductionSchedule, HealthInsuranceConfig, HousingFundConfig, SocialInsuranceConfig,
};
use crate::error::{EngineError, EngineResult};
use crate::models::{AuditStep, DeductionSet, Money};

use super::income_tax::progressive_income_tax;

/// The result of computing statutory deductions, with its audit step.
#[derive(Debug, Clone)]
pub struct DeductionResult {
    /// The computed deductions; `other` is always zero.
    pub deductions: DeductionSet,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Housing-fund contribution: `min(gross * rate, ceiling)`.
pub fn housing_fund_contribution(
    gross: Decimal,
    config: &HousingFundConfig,
) -> EngineResult<Decimal> {
    Ok(product("housing_fund", gross, config.rate)?.min(config.ceiling))
}

/// Employee share of the health-insurance premium: `gross * rate * share`.
pub fn health_insurance_contribution(
    gross: Decimal,
    config: &HealthInsuranceConfig,
) -> EngineResult<Decimal> {
    let premium = product("health_insurance", gross, config.rate)?;
    product("health_insurance", premium, config.employee_share)
}

/// Social-insurance contribution: `gross * rate`, uncapped.
pub fn social_insurance_contribution(
    gross: Decimal,
    config: &SocialInsuranceConfig,
) -> EngineResult<Decimal> {
    product("social_insurance", gross, config.rate)
}

fn product(contribution: &str, amount: Decimal, rate: Decimal) -> EngineResult<Decimal> {
    amount.checked_mul(rate).ok_or_else(|| {
        EngineError::invariant(format!(
            "{} contribution {} x {} is out of range",
            contribution, amount, rate
        ))
    })
}

/// Computes every statutory deduction on `basis`.
///
/// Each field is rounded half-up to the cent.
///
/// # Errors
///
/// `InvalidInput` if `basis` is negative.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::compute_deductions;
/// use payroll_engine::config::ConfigLoader;
/// use payroll_engine::models::Money;
/// use chrono::NaiveDate;
///
/// let loader = ConfigLoader::load("./config/standard").unwrap();
/// let schedule = loader
///     .deduction_schedule(NaiveDate::from_ymd_opt(2026, 1, 1).unwrap())
///     .unwrap();
///
/// let result = compute_deductions(Money::from_minor(1_000_000), &schedule, 1).unwrap();
/// assert_eq!(result.deductions.housing_fund, Money::from_minor(10_000));
/// assert_eq!(result.deductions.health_insurance, Money::from_minor(25_000));
/// assert_eq!(result.deductions.social_insurance, Money::from_minor(45_000));
/// assert_eq!(result.deductions.income_tax, Money::ZERO);
/// ```
pub fn compute_deductions(
    basis: Money,
    schedule: &DeductionSchedule<'_>,
    step_number: u32,
) -> EngineResult<DeductionResult> {
    if basis.is_negative() {
        return Err(EngineError::invalid_input(
            "gross_pay_basis",
            format!("must not be negative, got {}", basis),
        ));
    }

    let gross = basis.to_major();
    let contributions = schedule.contributions;

    let deductions = DeductionSet {
        social_insurance: Money::from_major(social_insurance_contribution(
            gross,
            &contributions.social_insurance,
        )?)?,
        health_insurance: Money::from_major(health_insurance_contribution(
            gross,
            &contributions.health_insurance,
        )?)?,
        housing_fund: Money::from_major(housing_fund_contribution(
            gross,
            &contributions.housing_fund,
        )?)?,
        income_tax: Money::from_major(progressive_income_tax(gross, schedule.tax_table))?,
        other: Money::ZERO,
    };

    let housing_capped = product("housing_fund", gross, contributions.housing_fund.rate)?
        > contributions.housing_fund.ceiling;

    let audit_step = AuditStep {
        step_number,
        rule_id: "statutory_deductions".to_string(),
        rule_name: "Statutory Deductions".to_string(),
        input: serde_json::json!({
            "gross_pay_basis": basis.minor_units(),
            "tax_table": schedule.tax_table.effective_date.to_string()
        }),
        output: deductions.audit_json(),
        reasoning: if housing_capped {
            format!(
                "Deductions on basis {}; housing fund capped at {}",
                basis,
                contributions.housing_fund.ceiling.normalize()
            )
        } else {
            format!("Deductions on basis {}", basis)
        },
    };

    Ok(DeductionResult {
        deductions,
        audit_step,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::standard_config;
    use chrono::NaiveDate;

    fn deductions(basis_minor: i64) -> EngineResult<DeductionResult> {
        let config = standard_config();
        let schedule = config
            .deduction_schedule(NaiveDate::from_ymd_opt(2026, 1, 1).unwrap())
            .unwrap();
        compute_deductions(Money::from_minor(basis_minor), &schedule, 1)
    }

    // ==========================================================================
    // DED-001: 10,000 basis
    // ==========================================================================
    #[test]
    fn test_ded_001_ten_thousand() {
        let d = deductions(1_000_000).unwrap().deductions;
        assert_eq!(d.social_insurance, Money::from_minor(45_000));
        assert_eq!(d.health_insurance, Money::from_minor(25_000));
        assert_eq!(d.housing_fund, Money::from_minor(10_000));
        assert_eq!(d.income_tax, Money::ZERO);
        assert_eq!(d.other, Money::ZERO);
    }

    // ==========================================================================
    // DED-002: housing fund below the ceiling
    // ==========================================================================
    #[test]
    fn test_ded_002_housing_fund_below_ceiling() {
        // 3,000 * 2% = 60
        let result = deductions(300_000).unwrap();
        assert_eq!(result.deductions.housing_fund, Money::from_minor(6_000));
        assert!(!result.audit_step.reasoning.contains("capped"));
    }

    // ==========================================================================
    // DED-003: housing fund capped
    // ==========================================================================
    #[test]
    fn test_ded_003_housing_fund_capped() {
        let result = deductions(2_200_000).unwrap();
        assert_eq!(result.deductions.housing_fund, Money::from_minor(10_000));
        assert!(result.audit_step.reasoning.contains("capped at 100"));
    }

    // ==========================================================================
    // DED-004: full month on 22,000 includes income tax
    // ==========================================================================
    #[test]
    fn test_ded_004_twenty_two_thousand() {
        let d = deductions(2_200_000).unwrap().deductions;
        assert_eq!(d.social_insurance, Money::from_minor(99_000));
        assert_eq!(d.health_insurance, Money::from_minor(55_000));
        assert_eq!(d.income_tax, Money::from_minor(17_505));
    }

    #[test]
    fn test_health_insurance_rounds_half_up() {
        // 0.01 * 0.05 * 0.5 = 0.00025 -> 0.00; 0.20 * 0.025 = 0.005 -> 0.01
        assert_eq!(
            deductions(1).unwrap().deductions.health_insurance,
            Money::ZERO
        );
        assert_eq!(
            deductions(20).unwrap().deductions.health_insurance,
            Money::from_minor(1)
        );
    }

    #[test]
    fn test_zero_basis_yields_zero_set() {
        assert_eq!(deductions(0).unwrap().deductions, DeductionSet::zero());
    }

    #[test]
    fn test_negative_basis_rejected() {
        assert!(matches!(
            deductions(-1),
            Err(EngineError::InvalidInput { ref field, .. }) if field == "gross_pay_basis"
        ));
    }

    #[test]
    fn test_deductions_are_idempotent() {
        let first = deductions(1_234_567).unwrap();
        let second = deductions(1_234_567).unwrap();
        assert_eq!(first.deductions, second.deductions);
        assert_eq!(first.audit_step, second.audit_step);
    }

    #[test]
    fn test_contribution_functions_are_independent() {
        let config = standard_config();
        let c = config.contributions();
        let gross = Decimal::from(10_000);
        assert_eq!(
            housing_fund_contribution(gross, &c.housing_fund).unwrap(),
            Decimal::from(100)
        );
        assert_eq!(
            health_insurance_contribution(gross, &c.health_insurance).unwrap(),
            Decimal::from(250)
        );
        assert_eq!(
            social_insurance_contribution(gross, &c.social_insurance).unwrap(),
            Decimal::from(450)
        );
    }

    #[test]
    fn test_contribution_overflow_is_an_error() {
        let config = SocialInsuranceConfig {
            rate: Decimal::from(1_000),
        };
        assert!(matches!(
            social_insurance_contribution(Decimal::MAX, &config),
            Err(EngineError::InvariantViolation { .. })
        ));
    }

    #[test]
    fn test_largest_basis_does_not_overflow() {
        assert!(deductions(i64::MAX).is_ok());
    }
}
