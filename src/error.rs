//! Error types for the Payroll Computation Engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur during payroll computation and
//! commit.

use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

use crate::models::PayrollStatus;

/// The main error type for the Payroll Computation Engine.
///
/// All operations in the engine return this error type, making it easy
/// to handle errors consistently throughout the application.
///
/// # Example
///
/// ```
/// use payroll_engine::error::EngineError;
///
/// let error = EngineError::ConfigNotFound {
///     path: "/missing/file.yaml".to_string(),
/// };
/// assert_eq!(error.to_string(), "Configuration file not found: /missing/file.yaml");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// Configuration parsed but violated a range or ordering invariant.
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// A description of the violated invariant.
        message: String,
    },

    /// A staff pay profile was invalid or contained inconsistent data.
    #[error("Invalid pay profile field '{field}': {message}")]
    InvalidProfile {
        /// The field that was invalid.
        field: String,
        /// A description of what made the field invalid.
        message: String,
    },

    /// A dependent record was invalid or contained inconsistent data.
    #[error("Invalid dependent '{student_id}': {message}")]
    InvalidDependent {
        /// The student ID of the invalid dependent.
        student_id: String,
        /// A description of what made the dependent invalid.
        message: String,
    },

    /// A payroll period was outside the calendar.
    #[error("Invalid payroll period: month {month} is not in 1-12")]
    InvalidPeriod {
        /// The out-of-range month.
        month: u32,
    },

    /// Total deductions exceeded gross salary; net pay is never clamped.
    #[error("Total deductions {total_deductions} exceed gross salary {gross}")]
    InsufficientGrossSalary {
        /// The gross salary for the period.
        gross: Decimal,
        /// The sum of all deductions.
        total_deductions: Decimal,
    },

    /// No payroll record exists with the given ID.
    #[error("Payroll record not found: {id}")]
    PayrollNotFound {
        /// The payroll ID that was not found.
        id: Uuid,
    },

    /// A non-draft payroll record already exists for the staff member and period.
    #[error("Payroll already exists for staff '{staff_id}' in {year}-{month:02}")]
    DuplicatePeriod {
        /// The staff member.
        staff_id: String,
        /// The payroll month.
        month: u32,
        /// The payroll year.
        year: i32,
    },

    /// A lifecycle transition was requested that the state machine forbids.
    #[error("Payroll {id} cannot move from {from:?} to {to:?}")]
    InvalidTransition {
        /// The payroll ID.
        id: Uuid,
        /// The current status.
        from: PayrollStatus,
        /// The requested status.
        to: PayrollStatus,
    },

    /// Commit was attempted on a record that can never become paid again.
    #[error("Payroll {id} is {status:?}; reload before retrying")]
    AlreadyPaid {
        /// The payroll ID.
        id: Uuid,
        /// The status found on the record.
        status: PayrollStatus,
    },

    /// The downstream fee ledger rejected a credit during commit.
    #[error("Fee ledger posting failed for student '{student_id}': {message}")]
    LedgerPostingFailure {
        /// The student whose credit failed.
        student_id: String,
        /// A description of the downstream failure.
        message: String,
    },
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
