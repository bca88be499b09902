//! Audit trail models.
//!
//! Every payroll run records the decisions made by each stage so a payslip
//! can be explained after the fact.

use serde::{Deserialize, Serialize};

/// A single step in the audit trace recording a calculation decision.
///
/// Each step captures the input, output, and reasoning for a rule application.
///
/// # Example
///
/// ```
/// use payroll_engine::models::AuditStep;
///
/// let step = AuditStep {
///     step_number: 1,
///     rule_id: "attendance_aggregation".to_string(),
///     rule_name: "Attendance Aggregation".to_string(),
///     input: serde_json::json!({"records": 10}),
///     output: serde_json::json!({"regular_hours": "80"}),
///     reasoning: "10 closed sessions aggregated".to_string(),
/// };
/// assert_eq!(step.step_number, 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The sequential step number.
    pub step_number: u32,
    /// The unique identifier of the rule that was applied.
    pub rule_id: String,
    /// The human-readable name of the rule.
    pub rule_name: String,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
}

/// A warning generated during a payroll run.
///
/// Warnings do not stop the run but deserve a payroll officer's attention.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditWarning {
    /// A code identifying the type of warning.
    pub code: String,
    /// A human-readable description of the warning.
    pub message: String,
    /// The severity level ("low", "medium", "high").
    pub severity: String,
}

impl AuditWarning {
    /// Creates a warning.
    pub fn new(
        code: impl Into<String>,
        message: impl Into<String>,
        severity: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            severity: severity.into(),
        }
    }
}

/// The complete audit trace for a payroll run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditTrace {
    /// The sequence of calculation steps.
    pub steps: Vec<AuditStep>,
    /// Any warnings generated during the run.
    pub warnings: Vec<AuditWarning>,
    /// The total run duration in microseconds.
    pub duration_us: u64,
}

impl AuditTrace {
    /// The number the next recorded step should carry.
    pub fn next_step_number(&self) -> u32 {
        self.steps.len() as u32 + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_step_number_follows_recorded_steps() {
        let mut trace = AuditTrace::default();
        assert_eq!(trace.next_step_number(), 1);
        trace.steps.push(AuditStep {
            step_number: 1,
            rule_id: "r".to_string(),
            rule_name: "R".to_string(),
            input: serde_json::json!({}),
            output: serde_json::json!({}),
            reasoning: String::new(),
        });
        assert_eq!(trace.next_step_number(), 2);
    }

    #[test]
    fn test_warning_serialization() {
        let warning = AuditWarning::new("OPEN_SESSION_IGNORED", "1 open session", "medium");
        let json = serde_json::to_string(&warning).unwrap();
        assert!(json.contains("\"code\":\"OPEN_SESSION_IGNORED\""));
        assert!(json.contains("\"severity\":\"medium\""));
    }
}
