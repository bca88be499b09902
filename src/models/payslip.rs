//! The persisted payslip and its ledger key.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{DeductionSet, HalfPeriod, Money, PayComponents, PayPeriod};

/// Unique key of a payslip in the ledger.
///
/// # Example
///
/// ```
/// use payroll_engine::models::{HalfPeriod, PayPeriod, PayslipKey};
///
/// let period = PayPeriod::new(1, 2026, HalfPeriod::Second).unwrap();
/// let key = PayslipKey::for_period("emp_001", &period);
/// assert_eq!(key.to_string(), "emp_001/2026-01/2");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PayslipKey {
    /// The employee paid.
    pub employee_id: String,
    /// Calendar month, 1-12.
    pub month: u32,
    /// Calendar year.
    pub year: i32,
    /// Half of the month.
    pub period: HalfPeriod,
}

impl PayslipKey {
    /// Builds the key for an employee and pay period.
    pub fn for_period(employee_id: impl Into<String>, period: &PayPeriod) -> Self {
        Self {
            employee_id: employee_id.into(),
            month: period.month(),
            year: period.year(),
            period: period.half(),
        }
    }

    /// The key of the same employee and month for another half.
    pub fn with_half(&self, period: HalfPeriod) -> Self {
        Self {
            period,
            ..self.clone()
        }
    }
}

impl fmt::Display for PayslipKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}-{:02}/{}",
            self.employee_id, self.year, self.month, self.period
        )
    }
}

/// A finalized payslip.
///
/// Invariant: `net_pay == max(0, gross_pay - deductions.total())`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payslip {
    /// Ledger identifier, stable across updates.
    pub id: Uuid,
    /// The employee paid.
    pub employee_id: String,
    /// Calendar month, 1-12.
    pub month: u32,
    /// Calendar year.
    pub year: i32,
    /// Half of the month.
    pub period: HalfPeriod,
    /// Basic salary shown on the payslip.
    pub basic_salary: Money,
    /// Earnings line items.
    pub components: PayComponents,
    /// Withholdings.
    pub deductions: DeductionSet,
    /// Sum of all components.
    pub gross_pay: Money,
    /// Gross minus deductions, floored at zero.
    pub net_pay: Money,
    /// When the payslip was generated.
    pub generated_at: DateTime<Utc>,
}

impl Payslip {
    /// The ledger key of this payslip.
    pub fn key(&self) -> PayslipKey {
        PayslipKey {
            employee_id: self.employee_id.clone(),
            month: self.month,
            year: self.year,
            period: self.period,
        }
    }
}

/// Whether an assembled payslip was newly created or replaced an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WriteAction {
    /// A new payslip was inserted.
    Created,
    /// An existing payslip was overwritten.
    Updated,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_half_keeps_employee_and_month() {
        let period = PayPeriod::new(6, 2026, HalfPeriod::Second).unwrap();
        let key = PayslipKey::for_period("emp_007", &period);
        let first = key.with_half(HalfPeriod::First);
        assert_eq!(first.employee_id, "emp_007");
        assert_eq!(first.month, 6);
        assert_eq!(first.period, HalfPeriod::First);
        assert_ne!(first, key);
    }

    #[test]
    fn test_write_action_serialization() {
        assert_eq!(
            serde_json::to_string(&WriteAction::Created).unwrap(),
            "\"created\""
        );
        assert_eq!(
            serde_json::to_string(&WriteAction::Updated).unwrap(),
            "\"updated\""
        );
    }

    #[test]
    fn test_payslip_key_round_trip() {
        let payslip = Payslip {
            id: Uuid::new_v4(),
            employee_id: "emp_001".to_string(),
            month: 1,
            year: 2026,
            period: HalfPeriod::First,
            basic_salary: Money::ZERO,
            components: PayComponents {
                basic_pay: Money::ZERO,
                overtime_pay: Money::ZERO,
                night_diff_pay: Money::ZERO,
                bonus: Money::ZERO,
                other_allowances: Money::ZERO,
            },
            deductions: DeductionSet::zero(),
            gross_pay: Money::ZERO,
            net_pay: Money::ZERO,
            generated_at: Utc::now(),
        };
        let period = PayPeriod::new(1, 2026, HalfPeriod::First).unwrap();
        assert_eq!(payslip.key(), PayslipKey::for_period("emp_001", &period));
    }
}
