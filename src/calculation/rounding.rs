//! Currency rounding.
//!
//! All calculation functions work at full `Decimal` precision; rounding to
//! two decimal places happens exactly once, when [`compute_payroll`]
//! assembles the final result. Nothing rounds mid-formula.
//!
//! [`compute_payroll`]: crate::calculation::compute_payroll

use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds a monetary amount to two decimal places, half away from zero.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::round_currency;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let exact = Decimal::from_str("7894.736842105263157894736842").unwrap();
/// assert_eq!(round_currency(exact), Decimal::from_str("7894.74").unwrap());
/// ```
pub fn round_currency(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}
