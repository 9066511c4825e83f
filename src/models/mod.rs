//! Core data models for the Payroll Computation Engine.
//!
//! This module contains all the domain models used throughout the engine.

mod dependent;
mod payroll_result;
mod period;
mod staff;

pub use dependent::Dependent;
pub(crate) use dependent::validate_dependents;
pub use payroll_result::{
    AuditStep, AuditTrace, ChildDeduction, PayrollResult, PayrollStatus,
};
pub use period::PayrollPeriod;
pub use staff::{Allowances, StaffPayProfile};
