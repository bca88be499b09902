//! Attendance aggregation functionality.
//!
//! This module reduces the closed attendance sessions of one employee over
//! one pay period into regular, overtime and night-differential hour totals.
//! Records must already be bucketed into the period by the caller (see
//! [`PayPeriod::select_records`](crate::models::PayPeriod::select_records)).

use chrono::NaiveDateTime;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::config::PolicyConfig;
use crate::error::{EngineError, EngineResult};
use crate::models::{AttendanceRecord, AuditStep, HourBreakdown};

use super::night_differential::night_hour_steps;

const MINUTES_PER_HOUR: i64 = 60;

/// The result of aggregating attendance, with its audit step.
#[derive(Debug, Clone)]
pub struct AggregationResult {
    /// The hour totals.
    pub breakdown: HourBreakdown,
    /// Closed sessions that contributed hours.
    pub closed_sessions: usize,
    /// Open sessions that were ignored.
    pub open_sessions: usize,
    /// The audit step recording this aggregation.
    pub audit_step: AuditStep,
}

/// Aggregates attendance records into an [`HourBreakdown`].
///
/// For each closed session, worked minutes up to the policy's
/// `regular_minutes_per_day` are regular and the remainder is overtime.
/// Night-differential steps are counted over the raw session interval,
/// independently of that split. Open sessions contribute nothing.
///
/// Regular hours are the floor of total regular minutes over 60; overtime
/// hours are total overtime minutes over 60, rounded half-up to 2 places.
///
/// # Errors
///
/// `InvalidInput` if a record belongs to another employee, is malformed,
/// runs longer than the policy's `max_session_minutes`, or if the records
/// are non-empty but every session is still open.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::aggregate_attendance;
/// use payroll_engine::config::ConfigLoader;
/// use payroll_engine::models::AttendanceRecord;
/// use chrono::NaiveDateTime;
/// use rust_decimal::Decimal;
///
/// let loader = ConfigLoader::load("./config/standard").unwrap();
/// let at = |s: &str| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M").unwrap();
/// let record = AttendanceRecord {
///     id: None,
///     employee_id: "emp_001".to_string(),
///     clock_in: at("2026-01-05 08:00"),
///     clock_out: Some(at("2026-01-05 16:20")),
///     break_minutes: 0,
///     total_worked_minutes: Some(500),
/// };
///
/// let result = aggregate_attendance("emp_001", &[record], loader.policy(), 1).unwrap();
/// assert_eq!(result.breakdown.regular_hours, Decimal::from(8));
/// assert_eq!(result.breakdown.overtime_hours, Decimal::new(33, 2));
/// ```
pub fn aggregate_attendance(
    employee_id: &str,
    records: &[AttendanceRecord],
    policy: &PolicyConfig,
    step_number: u32,
) -> EngineResult<AggregationResult> {
    let mut regular_minutes: i64 = 0;
    let mut overtime_minutes: i64 = 0;
    let mut night_diff_hours: u32 = 0;
    let mut closed_sessions = 0;
    let mut open_sessions = 0;

    for record in records {
        if record.employee_id != employee_id {
            return Err(EngineError::invalid_input(
                "records",
                format!(
                    "record {} belongs to {}, not {}",
                    record.label(),
                    record.employee_id,
                    employee_id
                ),
            ));
        }

        let (Some(worked), Some(clock_out)) = (record.worked_minutes()?, record.clock_out) else {
            open_sessions += 1;
            continue;
        };

        check_session_length(record, worked, clock_out, policy)?;

        closed_sessions += 1;
        if worked > policy.regular_minutes_per_day {
            regular_minutes += policy.regular_minutes_per_day;
            overtime_minutes += worked - policy.regular_minutes_per_day;
        } else {
            regular_minutes += worked;
        }

        night_diff_hours += night_hour_steps(record.clock_in, clock_out, &policy.night_differential);
    }

    if !records.is_empty() && closed_sessions == 0 {
        return Err(EngineError::invalid_input(
            "records",
            format!(
                "all {} sessions for {} are still open",
                open_sessions, employee_id
            ),
        ));
    }

    let breakdown = HourBreakdown {
        regular_hours: Decimal::from(regular_minutes / MINUTES_PER_HOUR),
        overtime_hours: (Decimal::from(overtime_minutes) / Decimal::from(MINUTES_PER_HOUR))
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero),
        night_diff_hours,
    };

    let reasoning = if open_sessions > 0 {
        format!(
            "{} closed sessions aggregated, {} open sessions ignored",
            closed_sessions, open_sessions
        )
    } else {
        format!("{} closed sessions aggregated", closed_sessions)
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "attendance_aggregation".to_string(),
        rule_name: "Attendance Aggregation".to_string(),
        input: serde_json::json!({
            "employee_id": employee_id,
            "records": records.len(),
            "regular_minutes_per_day": policy.regular_minutes_per_day
        }),
        output: serde_json::json!({
            "regular_minutes": regular_minutes,
            "overtime_minutes": overtime_minutes,
            "regular_hours": breakdown.regular_hours.to_string(),
            "overtime_hours": breakdown.overtime_hours.to_string(),
            "night_diff_hours": breakdown.night_diff_hours
        }),
        reasoning,
    };

    Ok(AggregationResult {
        breakdown,
        closed_sessions,
        open_sessions,
        audit_step,
    })
}

fn check_session_length(
    record: &AttendanceRecord,
    worked: i64,
    clock_out: NaiveDateTime,
    policy: &PolicyConfig,
) -> EngineResult<()> {
    let span = (clock_out - record.clock_in).num_minutes();
    for (field, minutes) in [("clock_out", span), ("total_worked_minutes", worked)] {
        if minutes > policy.max_session_minutes {
            return Err(EngineError::invalid_input(
                field,
                format!(
                    "record {} runs {} minutes, over the {} minute limit",
                    record.label(),
                    minutes,
                    policy.max_session_minutes
                ),
            ));
        }
    }
    Ok(())
}
