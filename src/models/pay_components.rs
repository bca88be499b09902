//! Earnings models: hour totals, pay components and manual adjustments.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

use super::Money;

/// Hour totals for one employee over one pay period.
///
/// Derived on every aggregation; never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HourBreakdown {
    /// Whole regular hours.
    pub regular_hours: Decimal,
    /// Overtime hours, to two decimal places.
    pub overtime_hours: Decimal,
    /// Count of hour-steps started inside the night window.
    pub night_diff_hours: u32,
}

impl HourBreakdown {
    /// A breakdown with no hours at all.
    pub const fn zero() -> Self {
        Self {
            regular_hours: Decimal::ZERO,
            overtime_hours: Decimal::ZERO,
            night_diff_hours: 0,
        }
    }
}

/// Earnings line items for a payslip.
///
/// Legacy field names (`allowances`, `otherAllowances`) are accepted when
/// deserializing and mapped onto `other_allowances`.
///
/// # Example
///
/// ```
/// use payroll_engine::models::{Money, PayComponents};
///
/// let components = PayComponents {
///     basic_pay: Money::from_minor(100_000),
///     overtime_pay: Money::from_minor(2_500),
///     night_diff_pay: Money::from_minor(800),
///     bonus: Money::ZERO,
///     other_allowances: Money::from_minor(1_000),
/// };
/// assert_eq!(components.gross().unwrap(), Money::from_minor(104_300));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayComponents {
    /// Pay for regular hours.
    pub basic_pay: Money,
    /// Pay for overtime hours.
    pub overtime_pay: Money,
    /// Night-differential premium.
    pub night_diff_pay: Money,
    /// Bonus granted for the period.
    pub bonus: Money,
    /// Any other allowances.
    #[serde(alias = "allowances", alias = "otherAllowances")]
    pub other_allowances: Money,
}

impl PayComponents {
    /// Gross pay: the sum of every component.
    ///
    /// # Errors
    ///
    /// `InvariantViolation` if the sum overflows.
    pub fn gross(&self) -> EngineResult<Money> {
        Money::checked_sum(self.fields().into_iter().map(|(_, amount)| amount))
    }

    /// Minor-unit amounts keyed by field name, for audit payloads.
    pub fn audit_json(&self) -> serde_json::Value {
        serde_json::json!({
            "basic_pay": self.basic_pay.minor_units(),
            "overtime_pay": self.overtime_pay.minor_units(),
            "night_diff_pay": self.night_diff_pay.minor_units(),
            "bonus": self.bonus.minor_units(),
            "other_allowances": self.other_allowances.minor_units()
        })
    }

    /// Returns a copy with the caller's bonus and allowances applied.
    ///
    /// Adjustments replace the zero defaults left by the pay calculator.
    pub fn with_adjustments(mut self, adjustments: &PayAdjustments) -> EngineResult<Self> {
        adjustments.validate()?;
        self.bonus = adjustments.bonus;
        self.other_allowances = adjustments.other_allowances;
        Ok(self)
    }

    /// Names the first negative component, if any.
    pub fn first_negative_field(&self) -> Option<&'static str> {
        self.fields()
            .into_iter()
            .find(|(_, amount)| amount.is_negative())
            .map(|(name, _)| name)
    }

    fn fields(&self) -> [(&'static str, Money); 5] {
        [
            ("basic_pay", self.basic_pay),
            ("overtime_pay", self.overtime_pay),
            ("night_diff_pay", self.night_diff_pay),
            ("bonus", self.bonus),
            ("other_allowances", self.other_allowances),
        ]
    }
}

/// Manual adjustments entered by the payroll officer for one period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayAdjustments {
    /// Bonus for the period.
    pub bonus: Money,
    /// Other allowances for the period.
    #[serde(alias = "allowances", alias = "otherAllowances")]
    pub other_allowances: Money,
    /// Manual deductions, added to the `other` deduction field.
    #[serde(alias = "otherDeductions")]
    pub other_deductions: Money,
}

impl PayAdjustments {
    /// No adjustments.
    pub const NONE: PayAdjustments = PayAdjustments {
        bonus: Money::ZERO,
        other_allowances: Money::ZERO,
        other_deductions: Money::ZERO,
    };

    /// Rejects negative adjustment amounts.
    pub fn validate(&self) -> EngineResult<()> {
        for (field, amount) in [
            ("bonus", self.bonus),
            ("other_allowances", self.other_allowances),
            ("other_deductions", self.other_deductions),
        ] {
            if amount.is_negative() {
                return Err(EngineError::invalid_input(
                    field,
                    format!("adjustment must not be negative, got {}", amount),
                ));
            }
        }
        Ok(())
    }
}
