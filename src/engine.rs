//! The payroll orchestrator.
//!
//! [`PayrollEngine`] runs the calculation stages in order for one employee
//! and half-month, on demand, and hands the result to the ledger. It keeps
//! no state between runs other than the ledger itself.

use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;
use tracing::{info, warn};

use crate::calculation::{
    PriorHalf, aggregate_attendance, apply_income_tax_policy, compute_pay, reconcile_deductions,
};
use crate::config::ConfigLoader;
use crate::error::{EngineError, EngineResult};
use crate::ledger::{PayslipAssembler, PayslipDraft, PayslipStore};
use crate::models::{
    AttendanceRecord, AttendanceSource, AuditTrace, AuditWarning, Employee, HalfPeriod,
    HourBreakdown, Money, PayAdjustments, PayPeriod, Payslip, PayslipKey, WriteAction,
};

/// One employee's finalize request for one half-month.
#[derive(Debug, Clone)]
pub struct FinalizeRequest {
    /// The employee being paid.
    pub employee: Employee,
    /// The half-month being finalized.
    pub period: PayPeriod,
    /// Attendance records; only the employee's records inside the period count.
    pub attendance: Vec<AttendanceRecord>,
    /// Manual bonus, allowances and deductions.
    pub adjustments: PayAdjustments,
    /// Basic salary to print on the payslip instead of the computed basic pay.
    pub basic_salary_override: Option<Money>,
}

/// The result of a finalize.
#[derive(Debug, Clone, Serialize)]
pub struct PayrollRun {
    /// Whether the payslip was created or overwritten.
    pub action: WriteAction,
    /// The payslip as stored.
    pub payslip: Payslip,
    /// The aggregated hours the payslip was computed from.
    pub hours: HourBreakdown,
    /// Every decision made along the way.
    pub audit_trace: AuditTrace,
}

/// The outcome of one entry of a batch.
#[derive(Debug)]
pub struct BatchEntry {
    /// The key the entry was finalizing.
    pub key: PayslipKey,
    /// The run, or why it failed.
    pub outcome: EngineResult<PayrollRun>,
}

/// Runs the payroll pipeline against a configuration and a payslip store.
pub struct PayrollEngine {
    config: ConfigLoader,
    assembler: PayslipAssembler,
}

impl PayrollEngine {
    /// Creates an engine writing payslips to `store`.
    pub fn new(config: ConfigLoader, store: Arc<dyn PayslipStore>) -> Self {
        let timestamp_policy = config.policy().timestamp_on_update;
        Self {
            config,
            assembler: PayslipAssembler::new(store, timestamp_policy),
        }
    }

    /// The loaded configuration.
    pub fn config(&self) -> &ConfigLoader {
        &self.config
    }

    /// Finalizes the payslip for the request's employee and period.
    ///
    /// Stages, in order: select the period's records, aggregate hours,
    /// compute pay, apply adjustments, reconcile deductions against the
    /// first half (second half only), apply the income-tax payout policy, add
    /// manual deductions, assemble and persist.
    ///
    /// # Errors
    ///
    /// Any stage's error. Nothing is persisted unless every stage succeeds.
    pub fn finalize(&self, request: &FinalizeRequest) -> EngineResult<PayrollRun> {
        let records = request
            .period
            .select_records(&request.employee.id, &request.attendance);
        self.run(
            &request.employee,
            &request.period,
            &records,
            &request.adjustments,
            request.basic_salary_override,
        )
    }

    /// Finalizes a payslip reading attendance from `source`.
    pub fn finalize_with_source(
        &self,
        source: &dyn AttendanceSource,
        employee: &Employee,
        period: &PayPeriod,
        adjustments: &PayAdjustments,
        basic_salary_override: Option<Money>,
    ) -> EngineResult<PayrollRun> {
        let fetched = source.records_for(&employee.id, period.start_date(), period.end_date())?;
        let records = period.select_records(&employee.id, &fetched);
        self.run(employee, period, &records, adjustments, basic_salary_override)
    }

    /// Finalizes each request in order; a failure affects only its own entry.
    ///
    /// First halves should precede second halves of the same month so the
    /// second half can reconcile against them.
    pub fn finalize_batch(&self, requests: &[FinalizeRequest]) -> Vec<BatchEntry> {
        requests
            .iter()
            .map(|request| BatchEntry {
                key: PayslipKey::for_period(request.employee.id.clone(), &request.period),
                outcome: self.finalize(request),
            })
            .collect()
    }

    /// Looks up a stored payslip.
    ///
    /// # Errors
    ///
    /// `PayslipNotFound` if none was finalized for `key`.
    pub fn payslip(&self, key: &PayslipKey) -> EngineResult<Payslip> {
        self.assembler
            .store()
            .find(key)?
            .ok_or_else(|| EngineError::PayslipNotFound {
                key: key.to_string(),
            })
    }

    /// Every stored payslip of `employee_id`, oldest first.
    pub fn payslips_for(&self, employee_id: &str) -> EngineResult<Vec<Payslip>> {
        self.assembler.store().list_for_employee(employee_id)
    }

    fn run(
        &self,
        employee: &Employee,
        period: &PayPeriod,
        records: &[AttendanceRecord],
        adjustments: &PayAdjustments,
        basic_salary_override: Option<Money>,
    ) -> EngineResult<PayrollRun> {
        let start_time = Instant::now();
        let policy = self.config.policy();
        let key = PayslipKey::for_period(employee.id.clone(), period);
        let mut trace = AuditTrace::default();

        let aggregation =
            aggregate_attendance(&employee.id, records, policy, trace.next_step_number())?;
        if aggregation.open_sessions > 0 {
            trace.warnings.push(AuditWarning::new(
                "OPEN_SESSIONS_IGNORED",
                format!(
                    "{} sessions without a clock-out were not paid",
                    aggregation.open_sessions
                ),
                "medium",
            ));
        }
        let hours = aggregation.breakdown;
        trace.steps.push(aggregation.audit_step);

        let hourly_rate = employee.hourly_rate(policy.working_days_per_month, policy.hours_per_day)?;
        let earnings = compute_pay(&hours, hourly_rate, policy, trace.next_step_number())?;
        trace.steps.push(earnings.audit_step);
        let components = earnings.components.with_adjustments(adjustments)?;

        let prior = match period.half() {
            HalfPeriod::First => None,
            HalfPeriod::Second => {
                let prior = self
                    .assembler
                    .store()
                    .find(&key.with_half(HalfPeriod::First))?
                    .map(|payslip| PriorHalf::from_payslip(&payslip));
                if prior.is_none() {
                    trace.warnings.push(AuditWarning::new(
                        "PRIOR_HALF_MISSING",
                        "No first-half payslip; reconciling against zero",
                        "low",
                    ));
                }
                prior
            }
        };

        let schedule = self.config.deduction_schedule(period.start_date())?;
        let reconciliation = reconcile_deductions(
            components.gross()?,
            period.half(),
            prior.as_ref(),
            &schedule,
            trace.next_step_number(),
        )?;
        trace.steps.extend(reconciliation.audit_steps);
        trace.warnings.extend(reconciliation.warnings);

        let tax_policy = apply_income_tax_policy(
            reconciliation.deductions,
            policy.income_tax_policy,
            trace.next_step_number(),
        );
        trace.steps.push(tax_policy.audit_step);
        trace.warnings.extend(tax_policy.warning);

        let mut deductions = tax_policy.deductions;
        deductions.other = deductions.other.checked_add(adjustments.other_deductions)?;

        let draft = PayslipDraft {
            key: key.clone(),
            basic_salary_override,
            components,
            deductions,
        };
        let assembled = match self.assembler.assemble(&draft, trace.next_step_number()) {
            Ok(assembled) => assembled,
            Err(err) => {
                warn!(key = %key, error = %err, "Payslip assembly failed");
                return Err(err);
            }
        };
        trace.steps.push(assembled.audit_step);
        trace.duration_us = u64::try_from(start_time.elapsed().as_micros()).unwrap_or(u64::MAX);

        info!(
            employee_id = %employee.id,
            period = %period,
            action = ?assembled.action,
            gross_pay = %assembled.payslip.gross_pay,
            net_pay = %assembled.payslip.net_pay,
            duration_us = trace.duration_us,
            "Payslip finalized"
        );

        Ok(PayrollRun {
            action: assembled.action,
            payslip: assembled.payslip,
            hours,
            audit_trace: trace,
        })
    }
}
