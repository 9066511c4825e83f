//! Housing levy calculation.
//!
//! The housing levy is a flat percentage of gross salary. It is applied
//! before relief, never reduced by relief, and not tiered.

use rust_decimal::Decimal;

use crate::models::AuditStep;

/// The result of a housing levy calculation, including the amount and audit step.
#[derive(Debug, Clone)]
pub struct HousingLevyResult {
    /// The levy amount.
    pub amount: Decimal,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Calculates the housing levy on a gross salary.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::calculate_housing_levy;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let result = calculate_housing_levy(
///     Decimal::from_str("50000").unwrap(),
///     Decimal::from_str("0.015").unwrap(),
///     1,
/// );
/// assert_eq!(result.amount, Decimal::from_str("750").unwrap());
/// ```
pub fn calculate_housing_levy(gross: Decimal, rate: Decimal, step_number: u32) -> HousingLevyResult {
    let amount = gross * rate;

    let audit_step = AuditStep {
        step_number,
        rule_id: "housing_levy".to_string(),
        rule_name: "Housing Levy".to_string(),
        statute_ref: "Affordable Housing Act 2024".to_string(),
        input: serde_json::json!({
            "gross": gross.normalize().to_string(),
            "rate": rate.normalize().to_string()
        }),
        output: serde_json::json!({
            "amount": amount.normalize().to_string()
        }),
        reasoning: format!(
            "{} x {} = {}",
            gross.normalize(),
            rate.normalize(),
            amount.normalize()
        ),
    };

    HousingLevyResult { amount, audit_step }
}
