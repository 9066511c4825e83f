//! Medical-insurance contribution lookup.
//!
//! The NHIF contribution is a stepped lookup over a fixed ascending table of
//! bands. The table is a versioned business constant reproduced verbatim in
//! configuration, not a formula.

use rust_decimal::Decimal;

use crate::config::NhifBand;
use crate::models::AuditStep;

/// The result of an NHIF lookup, including the amount and audit step.
#[derive(Debug, Clone)]
pub struct NhifResult {
    /// The contribution for the matched band.
    pub amount: Decimal,
    /// The audit step recording this lookup.
    pub audit_step: AuditStep,
}

/// Looks up the medical-insurance contribution for a gross salary.
///
/// Selects the first band whose inclusive upper bound is at or above the
/// gross; the open-ended top band catches everything else. The loader
/// guarantees the table is non-empty and ascending.
pub fn calculate_nhif(gross: Decimal, bands: &[NhifBand], step_number: u32) -> NhifResult {
    let matched = bands
        .iter()
        .find(|band| band.upper_bound.is_none_or(|upper| gross <= upper))
        .or_else(|| bands.last());

    let (amount, band_label) = match matched {
        Some(band) => (
            band.contribution,
            band.upper_bound
                .map(|u| format!("<= {}", u.normalize()))
                .unwrap_or_else(|| "top band".to_string()),
        ),
        // Unreachable with a validated config; an empty table contributes nothing.
        None => (Decimal::ZERO, "no band".to_string()),
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "nhif_contribution".to_string(),
        rule_name: "NHIF Contribution".to_string(),
        statute_ref: "NHIF Standard Contribution Rates".to_string(),
        input: serde_json::json!({
            "gross": gross.normalize().to_string(),
            "bands": bands.len()
        }),
        output: serde_json::json!({
            "band": band_label,
            "amount": amount.normalize().to_string()
        }),
        reasoning: format!(
            "Gross {} falls in band {}, contribution {}",
            gross.normalize(),
            band_label,
            amount.normalize()
        ),
    };

    NhifResult { amount, audit_step }
}
