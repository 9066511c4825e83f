//! Payroll period model.
//!
//! A [`PayrollPeriod`] identifies one payroll cycle. The pair
//! `(staff_id, period)` is unique in the payroll store.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{EngineError, EngineResult};

/// A calendar month identifying one payroll cycle.
///
/// # Example
///
/// ```
/// use payroll_engine::models::PayrollPeriod;
///
/// let period = PayrollPeriod { month: 3, year: 2024 };
/// assert!(period.validate().is_ok());
/// assert_eq!(period.to_string(), "2024-03");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PayrollPeriod {
    /// The payroll month (1-12).
    pub month: u32,
    /// The payroll year.
    pub year: i32,
}

impl PayrollPeriod {
    /// Validates that the month is within the calendar.
    pub fn validate(&self) -> EngineResult<()> {
        if !(1..=12).contains(&self.month) {
            return Err(EngineError::InvalidPeriod { month: self.month });
        }
        Ok(())
    }
}

impl fmt::Display for PayrollPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{:02}", self.year, self.month)
    }
}
