//! Payslip assembly.
//!
//! The assembler totals earnings and deductions, enforces the payslip
//! invariants and writes the result to the ledger, creating a payslip the
//! first time a key is finalized and overwriting it afterwards.

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tracing::debug;
use uuid::Uuid;

use crate::config::TimestampPolicy;
use crate::error::{EngineError, EngineResult};
use crate::models::{AuditStep, DeductionSet, Money, PayComponents, Payslip, PayslipKey, WriteAction};

use super::key_lock::KeyLocks;
use super::store::PayslipStore;

/// Everything needed to assemble one payslip.
#[derive(Debug, Clone, Serialize)]
pub struct PayslipDraft {
    /// The ledger key.
    pub key: PayslipKey,
    /// Basic salary to print instead of the computed basic pay.
    pub basic_salary_override: Option<Money>,
    /// Final earnings, adjustments included.
    pub components: PayComponents,
    /// Final deductions, manual deductions included.
    pub deductions: DeductionSet,
}

/// An assembled and persisted payslip.
#[derive(Debug, Clone)]
pub struct AssembleOutcome {
    /// The payslip as stored.
    pub payslip: Payslip,
    /// Whether the payslip was created or overwritten.
    pub action: WriteAction,
    /// The audit step recording the assembly.
    pub audit_step: AuditStep,
}

/// Gross and net pay for a draft.
///
/// `net = max(0, gross - total deductions)`.
///
/// # Errors
///
/// `InvariantViolation` if any component or deduction is negative, or if
/// either sum overflows.
pub fn payslip_totals(
    components: &PayComponents,
    deductions: &DeductionSet,
) -> EngineResult<(Money, Money)> {
    if let Some(field) = components.first_negative_field() {
        return Err(EngineError::invariant(format!(
            "pay component {} is negative",
            field
        )));
    }
    if let Some(field) = deductions.first_negative_field() {
        return Err(EngineError::invariant(format!(
            "deduction {} is negative",
            field
        )));
    }

    let gross = components.gross()?;
    let net = gross.saturating_sub(deductions.total()?);
    Ok((gross, net))
}

/// Writes payslips to a [`PayslipStore`], one key at a time.
pub struct PayslipAssembler {
    store: Arc<dyn PayslipStore>,
    locks: KeyLocks,
    timestamp_policy: TimestampPolicy,
}

impl PayslipAssembler {
    /// Creates an assembler writing to `store`.
    pub fn new(store: Arc<dyn PayslipStore>, timestamp_policy: TimestampPolicy) -> Self {
        Self {
            store,
            locks: KeyLocks::new(),
            timestamp_policy,
        }
    }

    /// The store this assembler writes to.
    pub fn store(&self) -> &Arc<dyn PayslipStore> {
        &self.store
    }

    /// Assembles `draft` and persists it.
    ///
    /// An existing payslip for the key is replaced in full, keeping its id;
    /// its timestamp follows the configured [`TimestampPolicy`]. Otherwise a
    /// new payslip with a fresh id is created. Nothing is written when an
    /// invariant fails.
    ///
    /// # Errors
    ///
    /// - `InvariantViolation` for negative components or deductions
    /// - `ConcurrentUpdate` if the key is already being finalized
    pub fn assemble(&self, draft: &PayslipDraft, step_number: u32) -> EngineResult<AssembleOutcome> {
        let (gross_pay, net_pay) = payslip_totals(&draft.components, &draft.deductions)?;

        let _lease = self.locks.try_acquire(&draft.key)?;
        let existing = self.store.find(&draft.key)?;
        let now = Utc::now();

        let (id, generated_at, action) = match &existing {
            Some(previous) => {
                let generated_at = match self.timestamp_policy {
                    TimestampPolicy::Preserve => previous.generated_at,
                    TimestampPolicy::Refresh => now,
                };
                (previous.id, generated_at, WriteAction::Updated)
            }
            None => (Uuid::new_v4(), now, WriteAction::Created),
        };

        let payslip = Payslip {
            id,
            employee_id: draft.key.employee_id.clone(),
            month: draft.key.month,
            year: draft.key.year,
            period: draft.key.period,
            basic_salary: draft
                .basic_salary_override
                .unwrap_or(draft.components.basic_pay),
            components: draft.components,
            deductions: draft.deductions,
            gross_pay,
            net_pay,
            generated_at,
        };

        match action {
            WriteAction::Created => self.store.insert(payslip.clone())?,
            WriteAction::Updated => self.store.replace(payslip.clone())?,
        }
        debug!(key = %draft.key, action = ?action, "Payslip written");

        let total_deductions = draft.deductions.total()?;
        let audit_step = AuditStep {
            step_number,
            rule_id: "payslip_assembly".to_string(),
            rule_name: "Payslip Assembly".to_string(),
            input: serde_json::json!({
                "key": draft.key.to_string(),
                "basic_salary_override": draft.basic_salary_override.map(Money::minor_units),
                "gross_pay": gross_pay.minor_units(),
                "total_deductions": total_deductions.minor_units()
            }),
            output: serde_json::json!({
                "payslip_id": payslip.id,
                "action": action,
                "gross_pay": gross_pay.minor_units(),
                "total_deductions": total_deductions.minor_units(),
                "net_pay": net_pay.minor_units()
            }),
            reasoning: if gross_pay < total_deductions {
                format!(
                    "Deductions {} exceed gross {}; net pay floored at 0",
                    total_deductions, gross_pay
                )
            } else {
                format!("Net pay {} = gross {} - deductions {}", net_pay, gross_pay, total_deductions)
            },
        };

        Ok(AssembleOutcome {
            payslip,
            action,
            audit_step,
        })
    }
}
