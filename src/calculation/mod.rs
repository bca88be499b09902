//! Calculation stages for the Payroll Computation Engine.
//!
//! Every stage is a pure function of its inputs and returns its result
//! together with an [`AuditStep`](crate::models::AuditStep). In pipeline
//! order: attendance aggregation (with night-differential counting), pay
//! components, statutory deductions (with progressive income tax), half-month
//! reconciliation, and the income-tax payout policy.

mod attendance_aggregation;
mod earnings;
mod income_tax;
mod night_differential;
mod period_reconciliation;
mod statutory_deductions;
mod tax_policy;

pub use attendance_aggregation::{AggregationResult, aggregate_attendance};
pub use earnings::{EarningsResult, compute_pay};
pub use income_tax::progressive_income_tax;
pub use night_differential::{first_hour_boundary, night_hour_steps};
pub use period_reconciliation::{PriorHalf, ReconciliationResult, reconcile_deductions};
pub use statutory_deductions::{
    DeductionResult, compute_deductions, health_insurance_contribution,
    housing_fund_contribution, social_insurance_contribution,
};
pub use tax_policy::{TaxPolicyResult, apply_income_tax_policy};
