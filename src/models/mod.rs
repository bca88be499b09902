//! Core data models for the Payroll Computation Engine.
//!
//! This module contains all the domain models used throughout the engine.

mod attendance;
mod audit;
mod deductions;
mod employee;
mod money;
mod pay_components;
mod pay_period;
mod payslip;

pub use attendance::{AttendanceRecord, AttendanceSource};
pub use audit::{AuditStep, AuditTrace, AuditWarning};
pub use deductions::DeductionSet;
pub use employee::{Compensation, Employee};
pub use money::Money;
pub use pay_components::{HourBreakdown, PayAdjustments, PayComponents};
pub use pay_period::{HalfPeriod, PayPeriod};
pub use payslip::{Payslip, PayslipKey, WriteAction};
