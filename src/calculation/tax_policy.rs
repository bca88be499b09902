//! Income-tax payout policy.

use crate::config::IncomeTaxPolicy;
use crate::models::{AuditStep, AuditWarning, DeductionSet, Money};

/// The result of applying the income-tax payout policy.
#[derive(Debug, Clone)]
pub struct TaxPolicyResult {
    /// Deductions after the policy was applied.
    pub deductions: DeductionSet,
    /// Income tax that was computed but not withheld.
    pub waived_income_tax: Money,
    /// The audit step recording the policy decision.
    pub audit_step: AuditStep,
    /// Raised when a non-zero income tax was waived.
    pub warning: Option<AuditWarning>,
}

/// Applies the organisation's income-tax payout policy to `deductions`.
///
/// `Withhold` leaves the set untouched; `ZeroAtPayout` zeroes income tax.
pub fn apply_income_tax_policy(
    deductions: DeductionSet,
    policy: IncomeTaxPolicy,
    step_number: u32,
) -> TaxPolicyResult {
    let (applied, waived) = match policy {
        IncomeTaxPolicy::Withhold => (deductions, Money::ZERO),
        IncomeTaxPolicy::ZeroAtPayout => (
            DeductionSet {
                income_tax: Money::ZERO,
                ..deductions
            },
            deductions.income_tax,
        ),
    };

    let warning = (waived != Money::ZERO).then(|| {
        AuditWarning::new(
            "INCOME_TAX_WAIVED",
            format!("Income tax of {} computed but not withheld at payout", waived),
            "medium",
        )
    });

    let audit_step = AuditStep {
        step_number,
        rule_id: "income_tax_policy".to_string(),
        rule_name: "Income Tax Payout Policy".to_string(),
        input: serde_json::json!({
            "policy": policy,
            "income_tax": deductions.income_tax.minor_units()
        }),
        output: serde_json::json!({
            "income_tax": applied.income_tax.minor_units(),
            "waived_income_tax": waived.minor_units()
        }),
        reasoning: match policy {
            IncomeTaxPolicy::Withhold => "Income tax withheld as computed".to_string(),
            IncomeTaxPolicy::ZeroAtPayout => format!("Income tax of {} zeroed at payout", waived),
        },
    };

    TaxPolicyResult {
        deductions: applied,
        waived_income_tax: waived,
        audit_step,
        warning,
    }
}
