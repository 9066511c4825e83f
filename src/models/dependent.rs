//! Dependent model.
//!
//! A dependent is a school-enrolled child linked to a staff member for fee
//! deduction. The list is ordered by `child_order`, which determines the
//! discount tier, not insertion time.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// A school-enrolled child linked to a staff member.
///
/// # Example
///
/// ```
/// use payroll_engine::models::Dependent;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let dependent = Dependent {
///     student_id: "stu_010".to_string(),
///     child_order: 1,
///     term_fee_balance: Decimal::from_str("20000").unwrap(),
///     deduction_enabled: true,
/// };
/// assert!(dependent.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependent {
    /// Unique identifier for the student.
    pub student_id: String,
    /// Rank among the staff member's children (1 = earliest-linked child).
    pub child_order: u32,
    /// Outstanding fee balance for the current term.
    pub term_fee_balance: Decimal,
    /// Whether salary deduction is enabled for this child.
    pub deduction_enabled: bool,
}

impl Dependent {
    /// Validates the dependent's range invariants.
    pub fn validate(&self) -> EngineResult<()> {
        if self.student_id.trim().is_empty() {
            return Err(EngineError::InvalidDependent {
                student_id: self.student_id.clone(),
                message: "student_id must not be empty".to_string(),
            });
        }
        if self.child_order == 0 {
            return Err(EngineError::InvalidDependent {
                student_id: self.student_id.clone(),
                message: "child_order must be at least 1".to_string(),
            });
        }
        if self.term_fee_balance < Decimal::ZERO {
            return Err(EngineError::InvalidDependent {
                student_id: self.student_id.clone(),
                message: "term_fee_balance cannot be negative".to_string(),
            });
        }
        Ok(())
    }
}

/// Validates a dependents list as a whole: each record individually, plus
/// uniqueness of `child_order` across the list.
pub(crate) fn validate_dependents(dependents: &[Dependent]) -> EngineResult<()> {
    let mut seen_orders = std::collections::HashSet::new();
    for dependent in dependents {
        dependent.validate()?;
        if !seen_orders.insert(dependent.child_order) {
            return Err(EngineError::InvalidDependent {
                student_id: dependent.student_id.clone(),
                message: format!("duplicate child_order {}", dependent.child_order),
            });
        }
    }
    Ok(())
}
