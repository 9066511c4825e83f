//! Payroll result models for the Payroll Computation Engine.
//!
//! This module contains the [`PayrollResult`] type and its associated
//! structures that capture all outputs from a payroll computation, including
//! the statutory deductions, per-child fee deductions, totals, lifecycle
//! status, and the audit trace.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::PayrollPeriod;

/// Lifecycle status of a payroll record.
///
/// A record is created in `Draft` by the computation (re-computable,
/// discarded freely), moved to `Pending` on submission, and to `Paid`
/// exactly once by the commit service. `Cancelled` is terminal and
/// reversible only by computing a new draft for the same period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayrollStatus {
    /// Freshly computed, no side effects, may be recomputed or discarded.
    Draft,
    /// Submitted for payment; the only state commit accepts.
    Pending,
    /// Paid out and ledger credits posted; terminal and immutable.
    Paid,
    /// Abandoned before payment; terminal.
    Cancelled,
}

/// One child's share of the fee deduction for a payroll cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChildDeduction {
    /// The student the deduction is for.
    pub student_id: String,
    /// Rank among the staff member's children (drives the discount tier).
    pub child_order: u32,
    /// Discount percentage applied to the term fee balance.
    pub discount_percent: Decimal,
    /// Amount of fees waived by the discount.
    pub discount_amount: Decimal,
    /// Fee balance remaining after the discount.
    pub net_fee: Decimal,
    /// Amount actually deducted from salary this cycle.
    pub deducted_amount: Decimal,
}

/// A single step in the audit trace recording a computation decision.
///
/// Each step captures the input, output, and reasoning for a rule
/// application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The sequential step number.
    pub step_number: u32,
    /// The unique identifier of the rule that was applied.
    pub rule_id: String,
    /// The human-readable name of the rule.
    pub rule_name: String,
    /// Reference to the statute or policy behind this rule.
    pub statute_ref: String,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
}

/// The complete audit trace for a payroll computation.
///
/// Records every decision made during the computation for transparency and
/// compliance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditTrace {
    /// The sequence of computation steps.
    pub steps: Vec<AuditStep>,
    /// The total computation duration in microseconds.
    pub duration_us: u64,
}

/// The complete result of a payroll computation.
///
/// This struct captures all outputs from the payroll engine: the gross
/// salary, each statutory deduction, the per-child fee deductions with the
/// cap flag, the totals, and an audit trace. The invariant
/// `net_salary = gross_salary - total_deductions` holds for every record the
/// engine produces.
///
/// # Example
///
/// ```
/// use payroll_engine::models::{AuditTrace, PayrollPeriod, PayrollResult, PayrollStatus};
/// use chrono::Utc;
/// use rust_decimal::Decimal;
/// use uuid::Uuid;
///
/// let result = PayrollResult {
///     payroll_id: Uuid::new_v4(),
///     staff_id: "stf_001".to_string(),
///     period: PayrollPeriod { month: 3, year: 2024 },
///     computed_at: Utc::now(),
///     engine_version: "1.0.0".to_string(),
///     gross_salary: Decimal::ZERO,
///     nssf: Decimal::ZERO,
///     nhif: Decimal::ZERO,
///     paye: Decimal::ZERO,
///     housing_levy: Decimal::ZERO,
///     children_deductions: vec![],
///     capped: false,
///     other_deductions: Decimal::ZERO,
///     total_deductions: Decimal::ZERO,
///     net_salary: Decimal::ZERO,
///     status: PayrollStatus::Draft,
///     audit_trace: AuditTrace { steps: vec![], duration_us: 0 },
/// };
/// assert_eq!(result.status, PayrollStatus::Draft);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollResult {
    /// Unique identifier for this payroll record.
    pub payroll_id: Uuid,
    /// The staff member the payroll is for.
    pub staff_id: String,
    /// The payroll cycle.
    pub period: PayrollPeriod,
    /// When the computation was performed.
    pub computed_at: DateTime<Utc>,
    /// The version of the engine that performed the computation.
    pub engine_version: String,
    /// Basic salary plus all allowances.
    pub gross_salary: Decimal,
    /// Social-security contribution (two-tier).
    pub nssf: Decimal,
    /// Medical-insurance contribution (banded).
    pub nhif: Decimal,
    /// Income tax net of personal relief.
    pub paye: Decimal,
    /// Housing levy (flat percentage of gross).
    pub housing_levy: Decimal,
    /// Per-child fee deductions, ordered by child_order.
    pub children_deductions: Vec<ChildDeduction>,
    /// Whether the salary-percentage cap scaled the fee deductions down.
    pub capped: bool,
    /// Manual deductions supplied by the caller.
    pub other_deductions: Decimal,
    /// Sum of every deduction in this record.
    pub total_deductions: Decimal,
    /// Gross salary minus total deductions.
    pub net_salary: Decimal,
    /// Lifecycle status.
    pub status: PayrollStatus,
    /// Complete audit trace of computation decisions.
    pub audit_trace: AuditTrace,
}

impl PayrollResult {
    /// Returns the sum of all per-child deducted amounts.
    pub fn children_total(&self) -> Decimal {
        self.children_deductions
            .iter()
            .map(|c| c.deducted_amount)
            .sum()
    }
}
