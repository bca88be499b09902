//! Request types for the Payroll Computation Engine API.

use serde::{Deserialize, Serialize};

use crate::engine::FinalizeRequest;
use crate::error::EngineResult;
use crate::models::{AttendanceRecord, Employee, HalfPeriod, Money, PayAdjustments, PayPeriod};

/// Request body for the `POST /payroll/finalize` endpoint.
///
/// Adjustment fields accept the legacy spellings (`allowances`,
/// `otherAllowances`, `otherDeductions`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinalizePayrollRequest {
    /// The employee being paid.
    pub employee: Employee,
    /// Month, 1-12.
    pub month: u32,
    /// Calendar year.
    pub year: i32,
    /// Half-month: 1 or 2.
    pub period: HalfPeriod,
    /// Attendance records for the employee; records outside the period are ignored.
    #[serde(default)]
    pub attendance: Vec<AttendanceRecord>,
    /// Manual bonus, allowances and deductions.
    #[serde(default)]
    pub adjustments: Option<PayAdjustments>,
    /// Basic salary to print instead of the computed basic pay.
    #[serde(default)]
    pub basic_salary_override: Option<Money>,
}

impl FinalizePayrollRequest {
    /// Converts the body into an engine request, validating the period.
    pub fn into_finalize_request(self) -> EngineResult<FinalizeRequest> {
        Ok(FinalizeRequest {
            period: PayPeriod::new(self.month, self.year, self.period)?,
            employee: self.employee,
            attendance: self.attendance,
            adjustments: self.adjustments.unwrap_or(PayAdjustments::NONE),
            basic_salary_override: self.basic_salary_override,
        })
    }
}
