//! Request types for the Payroll Computation Engine API.
//!
//! This module defines the JSON request structures for the payroll
//! endpoints. Amounts arrive as typed decimals and are range-checked by the
//! engine before any computation; malformed numbers are rejected at parse
//! time rather than silently defaulted.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{Allowances, Dependent, PayrollPeriod, StaffPayProfile};

/// Request body for the `/payroll/compute` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputePayrollRequest {
    /// The staff member's salary composition.
    pub staff: StaffPayProfileRequest,
    /// School-enrolled children linked to the staff member.
    #[serde(default)]
    pub dependents: Vec<DependentRequest>,
    /// Manual deductions for the period (loans, advances, and the like).
    #[serde(default)]
    pub other_deductions: Decimal,
    /// The payroll cycle being computed.
    pub period: PayrollPeriodRequest,
    /// When true, the computed draft is saved to the payroll store so it
    /// can be submitted and committed later. Defaults to a pure preview.
    #[serde(default)]
    pub persist: bool,
}

/// Staff pay profile in a compute request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaffPayProfileRequest {
    /// Unique identifier for the staff member.
    pub staff_id: String,
    /// Basic monthly salary before allowances.
    pub basic_salary: Decimal,
    /// Allowance components added to the basic salary.
    #[serde(default)]
    pub allowances: AllowancesRequest,
}

/// Allowance components in a compute request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AllowancesRequest {
    /// House allowance.
    #[serde(default)]
    pub house: Decimal,
    /// Transport allowance.
    #[serde(default)]
    pub transport: Decimal,
    /// Any other recurring allowance.
    #[serde(default)]
    pub other: Decimal,
}

/// Dependent information in a compute request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DependentRequest {
    /// Unique identifier for the student.
    pub student_id: String,
    /// Rank among the staff member's children (1 = earliest-linked child).
    pub child_order: u32,
    /// Outstanding fee balance for the current term.
    pub term_fee_balance: Decimal,
    /// Whether salary deduction is enabled for this child.
    #[serde(default = "default_deduction_enabled")]
    pub deduction_enabled: bool,
}

fn default_deduction_enabled() -> bool {
    true
}

/// Payroll period in a compute request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayrollPeriodRequest {
    /// The payroll month (1-12).
    pub month: u32,
    /// The payroll year.
    pub year: i32,
}

impl From<StaffPayProfileRequest> for StaffPayProfile {
    fn from(req: StaffPayProfileRequest) -> Self {
        StaffPayProfile {
            staff_id: req.staff_id,
            basic_salary: req.basic_salary,
            allowances: Allowances {
                house: req.allowances.house,
                transport: req.allowances.transport,
                other: req.allowances.other,
            },
        }
    }
}

impl From<DependentRequest> for Dependent {
    fn from(req: DependentRequest) -> Self {
        Dependent {
            student_id: req.student_id,
            child_order: req.child_order,
            term_fee_balance: req.term_fee_balance,
            deduction_enabled: req.deduction_enabled,
        }
    }
}

impl From<PayrollPeriodRequest> for PayrollPeriod {
    fn from(req: PayrollPeriodRequest) -> Self {
        PayrollPeriod {
            month: req.month,
            year: req.year,
        }
    }
}
