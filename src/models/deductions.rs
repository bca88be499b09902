//! Deduction models.

use serde::{Deserialize, Serialize};

use crate::error::EngineResult;

use super::Money;

/// Withholdings for one payslip.
///
/// Legacy field names used by older payroll screens (`sss`, `philhealth`,
/// `pagibig`, `tax`, `others`) are accepted when deserializing.
///
/// # Example
///
/// ```
/// use payroll_engine::models::{DeductionSet, Money};
///
/// let deductions = DeductionSet {
///     social_insurance: Money::from_minor(45_000),
///     health_insurance: Money::from_minor(25_000),
///     housing_fund: Money::from_minor(10_000),
///     income_tax: Money::ZERO,
///     other: Money::ZERO,
/// };
/// assert_eq!(deductions.total().unwrap(), Money::from_minor(80_000));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeductionSet {
    /// Social-insurance contribution.
    #[serde(alias = "sss")]
    pub social_insurance: Money,
    /// Health-insurance contribution, employee share.
    #[serde(alias = "philhealth")]
    pub health_insurance: Money,
    /// Housing-fund contribution.
    #[serde(alias = "pagibig")]
    pub housing_fund: Money,
    /// Income tax withheld.
    #[serde(alias = "tax")]
    pub income_tax: Money,
    /// Manual deductions.
    #[serde(alias = "others")]
    pub other: Money,
}

impl DeductionSet {
    /// A set with every field explicitly zero.
    pub const fn zero() -> Self {
        Self {
            social_insurance: Money::ZERO,
            health_insurance: Money::ZERO,
            housing_fund: Money::ZERO,
            income_tax: Money::ZERO,
            other: Money::ZERO,
        }
    }

    /// Sum of every field.
    ///
    /// # Errors
    ///
    /// `InvariantViolation` if the sum overflows.
    pub fn total(&self) -> EngineResult<Money> {
        Money::checked_sum(self.fields().into_iter().map(|(_, amount)| amount))
    }

    /// Field-wise `max(0, self - withheld)`.
    pub fn remaining_after(&self, withheld: &DeductionSet) -> DeductionSet {
        DeductionSet {
            social_insurance: self.social_insurance.saturating_sub(withheld.social_insurance),
            health_insurance: self.health_insurance.saturating_sub(withheld.health_insurance),
            housing_fund: self.housing_fund.saturating_sub(withheld.housing_fund),
            income_tax: self.income_tax.saturating_sub(withheld.income_tax),
            other: self.other.saturating_sub(withheld.other),
        }
    }

    /// Field-wise sum.
    pub fn combined_with(&self, other: &DeductionSet) -> EngineResult<DeductionSet> {
        Ok(DeductionSet {
            social_insurance: self.social_insurance.checked_add(other.social_insurance)?,
            health_insurance: self.health_insurance.checked_add(other.health_insurance)?,
            housing_fund: self.housing_fund.checked_add(other.housing_fund)?,
            income_tax: self.income_tax.checked_add(other.income_tax)?,
            other: self.other.checked_add(other.other)?,
        })
    }

    /// Minor-unit amounts keyed by field name, for audit payloads.
    pub fn audit_json(&self) -> serde_json::Value {
        serde_json::json!({
            "social_insurance": self.social_insurance.minor_units(),
            "health_insurance": self.health_insurance.minor_units(),
            "housing_fund": self.housing_fund.minor_units(),
            "income_tax": self.income_tax.minor_units(),
            "other": self.other.minor_units()
        })
    }

    /// Names the first negative field, if any.
    pub fn first_negative_field(&self) -> Option<&'static str> {
        self.fields()
            .into_iter()
            .find(|(_, amount)| amount.is_negative())
            .map(|(name, _)| name)
    }

    fn fields(&self) -> [(&'static str, Money); 5] {
        [
            ("social_insurance", self.social_insurance),
            ("health_insurance", self.health_insurance),
            ("housing_fund", self.housing_fund),
            ("income_tax", self.income_tax),
            ("other", self.other),
        ]
    }
}
