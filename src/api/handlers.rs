//! HTTP request handlers for the Payroll Computation Engine API.
//!
//! This module contains the handler functions for all API endpoints.

use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::IntoResponse,
    routing::{get, post},
};
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::compute_payroll;
use crate::models::{Dependent, PayrollPeriod, StaffPayProfile};

use super::request::ComputePayrollRequest;
use super::response::{ApiError, ApiErrorResponse};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/payroll/compute", post(compute_handler))
        .route("/payroll/:id/submit", post(submit_handler))
        .route("/payroll/:id/commit", post(commit_handler))
        .route("/payroll/:id/cancel", post(cancel_handler))
        .route(
            "/payroll/by-period/:staff_id/:year/:month",
            get(get_by_period_handler),
        )
        .with_state(state)
}

/// Handler for POST /payroll/compute.
///
/// Computes a payroll preview; with `persist: true` the draft is also saved
/// so it can be submitted and committed later.
async fn compute_handler(
    State(state): State<AppState>,
    payload: Result<Json<ComputePayrollRequest>, JsonRejection>,
) -> impl IntoResponse {
    // Generate correlation ID for request tracking
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing payroll computation request");

    // Handle JSON parsing errors
    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => {
            let error = match rejection {
                JsonRejection::JsonDataError(err) => {
                    // Get the body text which contains the detailed error from serde
                    let body_text = err.body_text();
                    warn!(
                        correlation_id = %correlation_id,
                        error = %body_text,
                        "JSON data error"
                    );
                    // Check if it's a missing field error
                    if body_text.contains("missing field") {
                        ApiError::new("VALIDATION_ERROR", body_text)
                    } else {
                        ApiError::malformed_json(body_text)
                    }
                }
                JsonRejection::JsonSyntaxError(err) => {
                    warn!(
                        correlation_id = %correlation_id,
                        error = %err,
                        "JSON syntax error"
                    );
                    ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
                }
                JsonRejection::MissingJsonContentType(_) => ApiError::new(
                    "MISSING_CONTENT_TYPE",
                    "Content-Type must be application/json",
                ),
                _ => ApiError::malformed_json("Failed to parse request body"),
            };
            return (
                StatusCode::BAD_REQUEST,
                [(header::CONTENT_TYPE, "application/json")],
                Json(error),
            )
                .into_response();
        }
    };

    // Convert request types to domain types
    let profile: StaffPayProfile = request.staff.into();
    let dependents: Vec<Dependent> = request.dependents.into_iter().map(Into::into).collect();
    let period: PayrollPeriod = request.period.into();

    let computed = compute_payroll(
        &profile,
        &dependents,
        request.other_deductions,
        state.config().config(),
        period,
    );

    let result = match computed {
        Ok(result) => result,
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "Payroll computation failed"
            );
            let api_error: ApiErrorResponse = err.into();
            return api_error.into_response();
        }
    };

    let result = if request.persist {
        match state.commits().save_draft(result) {
            Ok(saved) => saved,
            Err(err) => {
                warn!(
                    correlation_id = %correlation_id,
                    error = %err,
                    "Draft persistence failed"
                );
                let api_error: ApiErrorResponse = err.into();
                return api_error.into_response();
            }
        }
    } else {
        result
    };

    info!(
        correlation_id = %correlation_id,
        payroll_id = %result.payroll_id,
        staff_id = %result.staff_id,
        net_salary = %result.net_salary,
        persisted = request.persist,
        "Payroll computed"
    );
    (StatusCode::OK, Json(result)).into_response()
}

/// Handler for POST /payroll/{id}/submit.
async fn submit_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    match state.commits().submit(id) {
        Ok(result) => (StatusCode::OK, Json(result)).into_response(),
        Err(err) => {
            warn!(payroll_id = %id, error = %err, "Submit failed");
            ApiErrorResponse::from(err).into_response()
        }
    }
}

/// Handler for POST /payroll/{id}/commit.
async fn commit_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    match state.commits().commit(id) {
        Ok(result) => (StatusCode::OK, Json(result)).into_response(),
        Err(err) => {
            warn!(payroll_id = %id, error = %err, "Commit failed");
            ApiErrorResponse::from(err).into_response()
        }
    }
}

/// Handler for POST /payroll/{id}/cancel.
async fn cancel_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    match state.commits().cancel(id) {
        Ok(result) => (StatusCode::OK, Json(result)).into_response(),
        Err(err) => {
            warn!(payroll_id = %id, error = %err, "Cancel failed");
            ApiErrorResponse::from(err).into_response()
        }
    }
}

/// Handler for GET /payroll/by-period/{staff_id}/{year}/{month}.
async fn get_by_period_handler(
    State(state): State<AppState>,
    Path((staff_id, year, month)): Path<(String, i32, u32)>,
) -> impl IntoResponse {
    let period = PayrollPeriod { month, year };
    if let Err(err) = period.validate() {
        return ApiErrorResponse::from(err).into_response();
    }

    match state.commits().get_by_period(&staff_id, period) {
        Ok(Some(result)) => (StatusCode::OK, Json(result)).into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(ApiError::new(
                "PAYROLL_NOT_FOUND",
                format!("No payroll for staff '{}' in {}", staff_id, period),
            )),
        )
            .into_response(),
        Err(err) => ApiErrorResponse::from(err).into_response(),
    }
}
