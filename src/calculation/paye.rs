//! Progressive income tax calculation.
//!
//! PAYE applies marginal rates to taxable income (gross less the
//! social-security contribution) across ascending bands, then subtracts a
//! fixed personal relief. The result never goes below zero.

use rust_decimal::Decimal;

use crate::config::TaxBand;
use crate::models::AuditStep;

/// The result of a PAYE calculation, including the amount and audit step.
#[derive(Debug, Clone)]
pub struct PayeResult {
    /// The tax payable after personal relief, clamped to zero.
    pub amount: Decimal,
    /// The banded tax before personal relief.
    pub gross_tax: Decimal,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Calculates progressive income tax on taxable income.
///
/// Each band taxes the portion of income between the previous band's upper
/// bound and its own; the open-ended top band taxes the remainder. The fixed
/// `personal_relief` is subtracted once at the end and the result is clamped
/// to zero, so low incomes owe nothing. No rounding happens here.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::calculate_paye;
/// use payroll_engine::config::TaxBand;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let dec = |s: &str| Decimal::from_str(s).unwrap();
/// let bands = vec![
///     TaxBand { upper_bound: Some(dec("24000")), rate: dec("0.10") },
///     TaxBand { upper_bound: Some(dec("32333")), rate: dec("0.25") },
///     TaxBand { upper_bound: None, rate: dec("0.30") },
/// ];
///
/// let result = calculate_paye(dec("47840"), &bands, dec("2400"), 1);
/// assert_eq!(result.amount, dec("6735.35"));
/// ```
pub fn calculate_paye(
    taxable: Decimal,
    bands: &[TaxBand],
    personal_relief: Decimal,
    step_number: u32,
) -> PayeResult {
    let mut gross_tax = Decimal::ZERO;
    let mut remaining = taxable.max(Decimal::ZERO);
    let mut prev_upper = Decimal::ZERO;

    for band in bands {
        if remaining <= Decimal::ZERO {
            break;
        }
        let taxed_here = match band.upper_bound {
            Some(upper) => remaining.min(upper - prev_upper),
            None => remaining,
        };
        gross_tax += taxed_here * band.rate;
        remaining -= taxed_here;
        if let Some(upper) = band.upper_bound {
            prev_upper = upper;
        }
    }

    let amount = (gross_tax - personal_relief).max(Decimal::ZERO);

    let reasoning = if amount == Decimal::ZERO {
        format!(
            "Banded tax {} does not exceed personal relief {}; no tax due",
            gross_tax.normalize(),
            personal_relief.normalize()
        )
    } else {
        format!(
            "Banded tax {} less personal relief {} = {}",
            gross_tax.normalize(),
            personal_relief.normalize(),
            amount.normalize()
        )
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "paye_income_tax".to_string(),
        rule_name: "PAYE Income Tax".to_string(),
        statute_ref: "Income Tax Act, Third Schedule".to_string(),
        input: serde_json::json!({
            "taxable": taxable.normalize().to_string(),
            "personal_relief": personal_relief.normalize().to_string(),
            "bands": bands.len()
        }),
        output: serde_json::json!({
            "gross_tax": gross_tax.normalize().to_string(),
            "amount": amount.normalize().to_string()
        }),
        reasoning,
    };

    PayeResult {
        amount,
        gross_tax,
        audit_step,
    }
}
