//! Payroll Computation Engine
//!
//! This crate turns raw clock-in/clock-out attendance into finalized,
//! auditable semi-monthly payslips: hour aggregation with night-differential
//! counting, pay components, statutory deductions with a progressive income
//! tax, half-month reconciliation, and a payslip ledger with create-or-update
//! semantics per (employee, month, year, half).

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod engine;
pub mod error;
pub mod ledger;
pub mod models;
