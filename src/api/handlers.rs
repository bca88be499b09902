//! HTTP request handlers for the Payroll Computation Engine API.
//!
//! This module contains the handler functions for all API endpoints.

use axum::{
    Json, Router,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tracing::{info, warn};
use uuid::Uuid;

use crate::models::{HalfPeriod, PayslipKey, WriteAction};

use super::request::FinalizePayrollRequest;
use super::response::{ApiError, ApiErrorResponse};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/payroll/finalize", post(finalize_handler))
        .route(
            "/payslips/:employee_id/:year/:month/:period",
            get(get_payslip_handler),
        )
        .with_state(state)
}

/// Handler for POST /payroll/finalize.
///
/// Responds 201 when the payslip was created and 200 when it was updated.
async fn finalize_handler(
    State(state): State<AppState>,
    payload: Result<Json<FinalizePayrollRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing finalize request");

    let body = match payload {
        Ok(Json(body)) => body,
        Err(rejection) => {
            let error = match rejection {
                JsonRejection::JsonDataError(err) => {
                    let body_text = err.body_text();
                    warn!(
                        correlation_id = %correlation_id,
                        error = %body_text,
                        "JSON data error"
                    );
                    ApiError::invalid_input(body_text)
                }
                JsonRejection::JsonSyntaxError(err) => {
                    warn!(
                        correlation_id = %correlation_id,
                        error = %err,
                        "JSON syntax error"
                    );
                    ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
                }
                JsonRejection::MissingJsonContentType(_) => {
                    ApiError::malformed_json("Content-Type must be application/json")
                }
                _ => ApiError::malformed_json("Failed to parse request body"),
            };
            return ApiErrorResponse::bad_request(error).into_response();
        }
    };

    let request = match body.into_finalize_request() {
        Ok(request) => request,
        Err(err) => {
            warn!(correlation_id = %correlation_id, error = %err, "Invalid finalize request");
            return ApiErrorResponse::from(err).into_response();
        }
    };

    match state.engine().finalize(&request) {
        Ok(run) => {
            info!(
                correlation_id = %correlation_id,
                employee_id = %run.payslip.employee_id,
                period = %request.period,
                action = ?run.action,
                net_pay = %run.payslip.net_pay,
                "Finalize completed"
            );
            let status = match run.action {
                WriteAction::Created => StatusCode::CREATED,
                WriteAction::Updated => StatusCode::OK,
            };
            (status, Json(run)).into_response()
        }
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                employee_id = %request.employee.id,
                error = %err,
                "Finalize failed"
            );
            ApiErrorResponse::from(err).into_response()
        }
    }
}

/// Handler for GET /payslips/:employee_id/:year/:month/:period.
async fn get_payslip_handler(
    State(state): State<AppState>,
    path: Result<Path<(String, i32, u32, u8)>, PathRejection>,
) -> Response {
    let Path((employee_id, year, month, period)) = match path {
        Ok(path) => path,
        Err(rejection) => {
            return ApiErrorResponse::bad_request(ApiError::invalid_input(rejection.body_text()))
                .into_response();
        }
    };

    let period = match HalfPeriod::try_from(period) {
        Ok(period) => period,
        Err(err) => return ApiErrorResponse::from(err).into_response(),
    };

    let key = PayslipKey {
        employee_id,
        month,
        year,
        period,
    };

    match state.engine().payslip(&key) {
        Ok(payslip) => (StatusCode::OK, Json(payslip)).into_response(),
        Err(err) => {
            info!(key = %key, error = %err, "Payslip lookup failed");
            ApiErrorResponse::from(err).into_response()
        }
    }
}
