//! HTTP API module for the Payroll Computation Engine.
//!
//! This module provides the REST endpoints for finalizing payslips and
//! looking up finalized payslips.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::FinalizePayrollRequest;
pub use response::{ApiError, ApiErrorResponse};
pub use state::AppState;
