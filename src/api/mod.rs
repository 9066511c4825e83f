//! HTTP API module for the Payroll Computation Engine.
//!
//! This module provides the REST endpoints for the two-phase payroll flow:
//! compute (pure preview, optionally saved as a draft) and the lifecycle
//! operations submit, commit, and cancel. Confirmation decisions belong to
//! the caller; the engine never gates a side effect on a dialog.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::ComputePayrollRequest;
pub use response::ApiError;
pub use state::AppState;
