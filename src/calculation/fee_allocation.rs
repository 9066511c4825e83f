//! Dependent fee deduction allocation.
//!
//! Each enabled dependent gets a discount tier from its child order, and the
//! discounted net fee becomes the desired salary deduction. When the desired
//! total exceeds the salary-percentage cap, every enabled dependent's amount
//! is scaled proportionally. Proportional scaling keeps the outcome
//! independent of child order, which is an administrative artifact rather
//! than a fairness signal.

use rust_decimal::Decimal;

use crate::config::FeeDiscountConfig;
use crate::models::{AuditStep, ChildDeduction, Dependent};

/// The result of allocating fee deductions across dependents.
#[derive(Debug, Clone)]
pub struct FeeAllocation {
    /// Per-dependent deduction records, ordered by child order.
    pub children: Vec<ChildDeduction>,
    /// Whether the salary cap scaled the amounts down.
    pub capped: bool,
    /// The audit step recording this allocation.
    pub audit_step: AuditStep,
}

impl FeeAllocation {
    /// Returns the sum of all deducted amounts.
    pub fn total_deducted(&self) -> Decimal {
        self.children.iter().map(|c| c.deducted_amount).sum()
    }
}

/// Allocates fee deductions across a staff member's dependents.
///
/// Dependents are processed in child-order rank. For each dependent the
/// tier discount is applied to the term fee balance to obtain the net fee,
/// which is the desired deduction. Disabled dependents keep their
/// informational discount figures but always deduct zero and never enter
/// the cap denominator. If the enabled total exceeds
/// `max_salary_deduction_percent` of gross, every enabled amount is scaled
/// by `cap / desired_total` and `capped` is set.
///
/// Amounts are full precision; rounding happens once at the end of the
/// payroll computation.
pub fn allocate_dependent_fees(
    dependents: &[Dependent],
    gross: Decimal,
    config: &FeeDiscountConfig,
    step_number: u32,
) -> FeeAllocation {
    let mut ordered: Vec<&Dependent> = dependents.iter().collect();
    ordered.sort_by_key(|d| d.child_order);

    let mut children: Vec<ChildDeduction> = ordered
        .iter()
        .map(|dependent| {
            let discount_percent = config.discount_percent_for(dependent.child_order);
            let discount_amount =
                dependent.term_fee_balance * discount_percent / Decimal::ONE_HUNDRED;
            let net_fee = dependent.term_fee_balance - discount_amount;

            ChildDeduction {
                student_id: dependent.student_id.clone(),
                child_order: dependent.child_order,
                discount_percent,
                discount_amount,
                net_fee,
                deducted_amount: if dependent.deduction_enabled {
                    net_fee
                } else {
                    Decimal::ZERO
                },
            }
        })
        .collect();

    let desired_total: Decimal = children.iter().map(|c| c.deducted_amount).sum();
    let cap = config.max_salary_deduction_percent / Decimal::ONE_HUNDRED * gross;

    let capped = desired_total > cap;
    if capped && desired_total > Decimal::ZERO {
        for child in &mut children {
            child.deducted_amount = child.deducted_amount * cap / desired_total;
        }
    }

    let allocated_total: Decimal = children.iter().map(|c| c.deducted_amount).sum();

    let reasoning = if capped {
        format!(
            "Desired total {} exceeds cap {} ({}% of gross {}); amounts scaled proportionally",
            desired_total.normalize(),
            cap.normalize(),
            config.max_salary_deduction_percent.normalize(),
            gross.normalize()
        )
    } else {
        format!(
            "Desired total {} is within cap {}; amounts allocated in full",
            desired_total.normalize(),
            cap.normalize()
        )
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "dependent_fee_allocation".to_string(),
        rule_name: "Dependent Fee Allocation".to_string(),
        statute_ref: "Staff children fee policy".to_string(),
        input: serde_json::json!({
            "gross": gross.normalize().to_string(),
            "cap_percent": config.max_salary_deduction_percent.normalize().to_string(),
            "dependents": dependents.len()
        }),
        output: serde_json::json!({
            "cap": cap.normalize().to_string(),
            "desired_total": desired_total.normalize().to_string(),
            "allocated_total": allocated_total.normalize().to_string(),
            "capped": capped
        }),
        reasoning,
    };

    FeeAllocation {
        children,
        capped,
        audit_step,
    }
}
