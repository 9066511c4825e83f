//! Social-security contribution calculation.
//!
//! This module computes the two-tier NSSF contribution. Tier I covers
//! pensionable pay up to the tier I ceiling; tier II covers the portion
//! between the two ceilings. The contribution is flat for any gross at or
//! above the tier II ceiling, a property the tests pin down exactly.

use rust_decimal::Decimal;

use crate::config::NssfConfig;
use crate::models::AuditStep;

/// The result of an NSSF calculation, including the amount and audit step.
#[derive(Debug, Clone)]
pub struct NssfResult {
    /// The total contribution across both tiers.
    pub amount: Decimal,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Calculates the two-tier social-security contribution for a gross salary.
///
/// `tier1 = min(gross, tier1_ceiling) × rate` and
/// `tier2 = min(max(gross − tier1_ceiling, 0), tier2_width) × rate`.
/// The result is returned at full precision; rounding happens once at the
/// end of the payroll computation.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::calculate_nssf;
/// use payroll_engine::config::NssfConfig;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let config = NssfConfig {
///     tier1_ceiling: Decimal::from_str("7000").unwrap(),
///     tier2_ceiling: Decimal::from_str("36000").unwrap(),
///     rate: Decimal::from_str("0.06").unwrap(),
/// };
///
/// let result = calculate_nssf(Decimal::from_str("50000").unwrap(), &config, 1);
/// assert_eq!(result.amount, Decimal::from_str("2160").unwrap());
/// ```
pub fn calculate_nssf(gross: Decimal, config: &NssfConfig, step_number: u32) -> NssfResult {
    let tier1_pensionable = gross.min(config.tier1_ceiling);
    let tier2_pensionable = (gross - config.tier1_ceiling)
        .max(Decimal::ZERO)
        .min(config.tier2_width());

    let tier1 = tier1_pensionable * config.rate;
    let tier2 = tier2_pensionable * config.rate;
    let amount = tier1 + tier2;

    let reasoning = if gross >= config.tier2_ceiling {
        format!(
            "Gross {} is at or above the tier II ceiling {}; contribution is flat at {}",
            gross.normalize(),
            config.tier2_ceiling.normalize(),
            amount.normalize()
        )
    } else {
        format!(
            "Tier I on {} plus tier II on {} at rate {} = {}",
            tier1_pensionable.normalize(),
            tier2_pensionable.normalize(),
            config.rate.normalize(),
            amount.normalize()
        )
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "nssf_contribution".to_string(),
        rule_name: "NSSF Contribution".to_string(),
        statute_ref: "NSSF Act 2013, Third Schedule".to_string(),
        input: serde_json::json!({
            "gross": gross.normalize().to_string(),
            "tier1_ceiling": config.tier1_ceiling.normalize().to_string(),
            "tier2_ceiling": config.tier2_ceiling.normalize().to_string(),
            "rate": config.rate.normalize().to_string()
        }),
        output: serde_json::json!({
            "tier1": tier1.normalize().to_string(),
            "tier2": tier2.normalize().to_string(),
            "amount": amount.normalize().to_string()
        }),
        reasoning,
    };

    NssfResult { amount, audit_step }
}
