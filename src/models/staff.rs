//! Staff pay profile model.
//!
//! This module defines the [`StaffPayProfile`] struct describing a staff
//! member's salary composition. The profile is owned by the staff directory;
//! the payroll engine only reads it.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// The monthly allowance components of a staff member's pay.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Allowances {
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

impl Allowances {
    /// Returns the sum of all allowance components.
    pub fn total(&self) -> Decimal {
        self.house + self.transport + self.other
    }
}

/// Represents a staff member's salary composition for one payroll cycle.
///
/// # Example
///
/// ```
/// use payroll_engine::models::{Allowances, StaffPayProfile};
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let profile = StaffPayProfile {
///     staff_id: "stf_001".to_string(),
///     basic_salary: Decimal::from_str("40000").unwrap(),
///     allowances: Allowances {
///         house: Decimal::from_str("7000").unwrap(),
///         transport: Decimal::from_str("3000").unwrap(),
///         other: Decimal::ZERO,
///     },
/// };
/// assert_eq!(profile.gross_salary(), Decimal::from_str("50000").unwrap());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffPayProfile {
    /// Unique identifier for the staff member.
    pub staff_id: String,
    /// Basic monthly salary before allowances.
    pub basic_salary: Decimal,
    /// Allowance components added to the basic salary.
    #[serde(default)]
    pub allowances: Allowances,
}

impl StaffPayProfile {
    /// Returns the gross salary: basic salary plus all allowances.
    pub fn gross_salary(&self) -> Decimal {
        self.basic_salary + self.allowances.total()
    }

    /// Validates the profile's range invariants.
    ///
    /// The staff ID must be non-empty and every amount must be non-negative.
    /// Amounts are never silently defaulted; out-of-range input is rejected
    /// here, before any computation runs.
    pub fn validate(&self) -> EngineResult<()> {
        if self.staff_id.trim().is_empty() {
            return Err(EngineError::InvalidProfile {
                field: "staff_id".to_string(),
                message: "must not be empty".to_string(),
            });
        }
        if self.basic_salary < Decimal::ZERO {
            return Err(EngineError::InvalidProfile {
                field: "basic_salary".to_string(),
                message: "cannot be negative".to_string(),
            });
        }
        for (field, amount) in [
            ("allowances.house", self.allowances.house),
            ("allowances.transport", self.allowances.transport),
            ("allowances.other", self.allowances.other),
        ] {
            if amount < Decimal::ZERO {
                return Err(EngineError::InvalidProfile {
                    field: field.to_string(),
                    message: "cannot be negative".to_string(),
                });
            }
        }
        Ok(())
    }
}
