//! Pay component calculation.
//!
//! Converts an [`HourBreakdown`] and an hourly rate into earnings line items.
//! Each amount is rounded to the cent exactly once, here.

use rust_decimal::Decimal;

use crate::config::PolicyConfig;
use crate::error::{EngineError, EngineResult};
use crate::models::{AuditStep, HourBreakdown, Money, PayComponents};

/// The result of computing pay components, with its audit step.
#[derive(Debug, Clone)]
pub struct EarningsResult {
    /// The computed components; bonus and other allowances are zero.
    pub components: PayComponents,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Computes basic, overtime and night-differential pay.
///
/// - `basic_pay = regular_hours * rate`
/// - `overtime_pay = overtime_hours * rate * overtime_multiplier`
/// - `night_diff_pay = night_diff_hours * rate * night_differential.rate`
///
/// # Errors
///
/// `InvalidInput` if the rate or any hour total is negative, or if a
/// product of hours and rate is too large to represent.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::compute_pay;
/// use payroll_engine::config::ConfigLoader;
/// use payroll_engine::models::{HourBreakdown, Money};
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let loader = ConfigLoader::load("./config/standard").unwrap();
/// let breakdown = HourBreakdown {
///     regular_hours: Decimal::from_str("7.005").unwrap(),
///     overtime_hours: Decimal::ZERO,
///     night_diff_hours: 0,
/// };
/// let rate = Decimal::from_str("58.75").unwrap();
///
/// let result = compute_pay(&breakdown, rate, loader.policy(), 1).unwrap();
/// assert_eq!(result.components.basic_pay, Money::from_minor(41154));
/// ```
pub fn compute_pay(
    breakdown: &HourBreakdown,
    hourly_rate: Decimal,
    policy: &PolicyConfig,
    step_number: u32,
) -> EngineResult<EarningsResult> {
    if hourly_rate < Decimal::ZERO {
        return Err(EngineError::invalid_input(
            "hourly_rate",
            format!("must not be negative, got {}", hourly_rate),
        ));
    }
    if breakdown.regular_hours < Decimal::ZERO {
        return Err(EngineError::invalid_input(
            "regular_hours",
            format!("must not be negative, got {}", breakdown.regular_hours),
        ));
    }
    if breakdown.overtime_hours < Decimal::ZERO {
        return Err(EngineError::invalid_input(
            "overtime_hours",
            format!("must not be negative, got {}", breakdown.overtime_hours),
        ));
    }

    let night_hours = Decimal::from(breakdown.night_diff_hours);
    let overtime_rate = checked_product(hourly_rate, policy.overtime_multiplier)?;
    let night_premium_rate = checked_product(hourly_rate, policy.night_differential.rate)?;

    let components = PayComponents {
        basic_pay: pay_amount(breakdown.regular_hours, hourly_rate)?,
        overtime_pay: pay_amount(breakdown.overtime_hours, overtime_rate)?,
        night_diff_pay: pay_amount(night_hours, night_premium_rate)?,
        bonus: Money::ZERO,
        other_allowances: Money::ZERO,
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "pay_components".to_string(),
        rule_name: "Pay Component Calculation".to_string(),
        input: serde_json::json!({
            "regular_hours": breakdown.regular_hours.to_string(),
            "overtime_hours": breakdown.overtime_hours.to_string(),
            "night_diff_hours": breakdown.night_diff_hours,
            "hourly_rate": hourly_rate.normalize().to_string(),
            "overtime_multiplier": policy.overtime_multiplier.normalize().to_string(),
            "night_differential_rate": policy.night_differential.rate.normalize().to_string()
        }),
        output: components.audit_json(),
        reasoning: format!(
            "{} regular h at {}, {} overtime h at {}, {} night h premium at {}",
            breakdown.regular_hours.normalize(),
            hourly_rate.normalize(),
            breakdown.overtime_hours.normalize(),
            overtime_rate.normalize(),
            breakdown.night_diff_hours,
            night_premium_rate.normalize()
        ),
    };

    Ok(EarningsResult {
        components,
        audit_step,
    })
}

fn checked_product(hourly_rate: Decimal, factor: Decimal) -> EngineResult<Decimal> {
    hourly_rate.checked_mul(factor).ok_or_else(|| {
        EngineError::invalid_input(
            "hourly_rate",
            format!("{} x {} is out of range", hourly_rate, factor),
        )
    })
}

fn pay_amount(hours: Decimal, rate: Decimal) -> EngineResult<Money> {
    let amount = checked_product(rate, hours)?;
    Money::from_major(amount).map_err(|_| {
        EngineError::invalid_input(
            "hourly_rate",
            format!("{} h at {} is out of range for minor units", hours, rate),
        )
    })
}
