//! Half-month deduction reconciliation.
//!
//! Statutory deductions are defined on monthly income. The first half of a
//! month withholds on its own gross; the second half recomputes the full
//! month on the combined gross and withholds only what the first half did
//! not, so the two payslips add up to the monthly figure.

use serde::{Deserialize, Serialize};

use crate::config::DeductionSchedule;
use crate::error::EngineResult;
use crate::models::{AuditStep, AuditWarning, DeductionSet, HalfPeriod, Money, Payslip};

use super::statutory_deductions::compute_deductions;

/// What the first half of the month already earned and withheld.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriorHalf {
    /// Gross pay of the first-half payslip.
    pub gross: Money,
    /// Deductions withheld on the first-half payslip.
    pub deductions: DeductionSet,
}

impl PriorHalf {
    /// Takes the prior half from a stored first-half payslip.
    pub fn from_payslip(payslip: &Payslip) -> Self {
        Self {
            gross: payslip.gross_pay,
            deductions: payslip.deductions,
        }
    }
}

/// The result of reconciling deductions for one half-month.
#[derive(Debug, Clone)]
pub struct ReconciliationResult {
    /// Deductions to withhold on this payslip; `other` is always zero.
    pub deductions: DeductionSet,
    /// The gross-pay basis the statutory deductions were computed on.
    pub basis: Money,
    /// The full-month set, for second-half periods.
    pub full_month: Option<DeductionSet>,
    /// Audit steps, in order.
    pub audit_steps: Vec<AuditStep>,
    /// Warnings raised while reconciling.
    pub warnings: Vec<AuditWarning>,
}

/// Computes the deductions owed for the current half-month.
///
/// - First half: deductions on `current_half_gross`. A supplied `prior` is
///   ignored and reported as a warning.
/// - Second half: deductions on `current_half_gross + prior.gross`, minus
///   what `prior` already withheld, each field clamped at zero. A missing
///   prior half counts as zero gross and zero deductions.
///
/// Records two audit steps, numbered from `step_number`.
///
/// # Errors
///
/// `InvalidInput` if the basis is negative.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::{reconcile_deductions, PriorHalf};
/// use payroll_engine::config::ConfigLoader;
/// use payroll_engine::models::{DeductionSet, HalfPeriod, Money};
/// use chrono::NaiveDate;
///
/// let loader = ConfigLoader::load("./config/standard").unwrap();
/// let schedule = loader
///     .deduction_schedule(NaiveDate::from_ymd_opt(2026, 1, 16).unwrap())
///     .unwrap();
///
/// let prior = PriorHalf {
///     gross: Money::from_minor(1_000_000),
///     deductions: DeductionSet {
///         social_insurance: Money::from_minor(45_000),
///         health_insurance: Money::from_minor(25_000),
///         housing_fund: Money::from_minor(10_000),
///         income_tax: Money::ZERO,
///         other: Money::ZERO,
///     },
/// };
///
/// let result = reconcile_deductions(
///     Money::from_minor(1_200_000),
///     HalfPeriod::Second,
///     Some(&prior),
///     &schedule,
///     1,
/// )
/// .unwrap();
///
/// assert_eq!(result.basis, Money::from_minor(2_200_000));
/// assert_eq!(result.deductions.housing_fund, Money::ZERO);
/// assert_eq!(result.deductions.income_tax, Money::from_minor(17_505));
/// ```
pub fn reconcile_deductions(
    current_half_gross: Money,
    half: HalfPeriod,
    prior: Option<&PriorHalf>,
    schedule: &DeductionSchedule<'_>,
    step_number: u32,
) -> EngineResult<ReconciliationResult> {
    let mut warnings = Vec::new();

    match half {
        HalfPeriod::First => {
            if prior.is_some() {
                warnings.push(AuditWarning::new(
                    "PRIOR_HALF_IGNORED",
                    "A prior half was supplied for a first-half period and was ignored",
                    "low",
                ));
            }

            let computed = compute_deductions(current_half_gross, schedule, step_number)?;
            let audit_step = AuditStep {
                step_number: step_number + 1,
                rule_id: "period_reconciliation".to_string(),
                rule_name: "Period Reconciliation".to_string(),
                input: serde_json::json!({
                    "period": half,
                    "current_half_gross": current_half_gross.minor_units()
                }),
                output: computed.deductions.audit_json(),
                reasoning: "First half withholds on its own gross".to_string(),
            };

            Ok(ReconciliationResult {
                deductions: computed.deductions,
                basis: current_half_gross,
                full_month: None,
                audit_steps: vec![computed.audit_step, audit_step],
                warnings,
            })
        }
        HalfPeriod::Second => {
            let prior = prior.copied().unwrap_or(PriorHalf {
                gross: Money::ZERO,
                deductions: DeductionSet::zero(),
            });
            let basis = current_half_gross.checked_add(prior.gross)?;

            let computed = compute_deductions(basis, schedule, step_number)?;
            let full_month = computed.deductions;
            let deductions = full_month.remaining_after(&prior.deductions);

            let audit_step = AuditStep {
                step_number: step_number + 1,
                rule_id: "period_reconciliation".to_string(),
                rule_name: "Period Reconciliation".to_string(),
                input: serde_json::json!({
                    "period": half,
                    "current_half_gross": current_half_gross.minor_units(),
                    "prior_half_gross": prior.gross.minor_units(),
                    "prior_half_deductions": prior.deductions.audit_json()
                }),
                output: deductions.audit_json(),
                reasoning: format!(
                    "Full month on {} is {}; {} already withheld, {} remaining",
                    basis,
                    full_month.total()?,
                    prior.deductions.total()?,
                    deductions.total()?
                ),
            };

            Ok(ReconciliationResult {
                deductions,
                basis,
                full_month: Some(full_month),
                audit_steps: vec![computed.audit_step, audit_step],
                warnings,
            })
        }
    }
}
