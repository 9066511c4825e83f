//! Calculation logic for the Payroll Computation Engine.
//!
//! This module contains all the calculation functions for determining net
//! pay, including the two-tier social-security contribution, the banded
//! medical-insurance lookup, progressive income tax net of personal relief,
//! the flat housing levy, the capped tier-discounted dependent fee
//! allocation, and the payroll orchestrator that combines them.

mod compute;
mod fee_allocation;
mod housing_levy;
mod nhif;
mod nssf;
mod paye;
mod rounding;
mod statutory;

pub use compute::compute_payroll;
pub use fee_allocation::{FeeAllocation, allocate_dependent_fees};
pub use housing_levy::{HousingLevyResult, calculate_housing_levy};
pub use nhif::{NhifResult, calculate_nhif};
pub use nssf::{NssfResult, calculate_nssf};
pub use paye::{PayeResult, calculate_paye};
pub use rounding::round_currency;
pub use statutory::{StatutoryDeductions, calculate_statutory_deductions};
