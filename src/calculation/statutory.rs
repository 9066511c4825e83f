//! Combined statutory deduction calculation.
//!
//! Runs the four statutory rules in their fixed order: NSSF first (its
//! contribution reduces taxable income for PAYE), then NHIF, PAYE, and the
//! housing levy. Pure function of gross salary and configuration.

use rust_decimal::Decimal;

use crate::config::StatutoryConfig;
use crate::models::AuditStep;

use super::housing_levy::calculate_housing_levy;
use super::nhif::calculate_nhif;
use super::nssf::calculate_nssf;
use super::paye::calculate_paye;

/// All four statutory deductions for one gross salary.
#[derive(Debug, Clone)]
pub struct StatutoryDeductions {
    /// Social-security contribution.
    pub nssf: Decimal,
    /// Medical-insurance contribution.
    pub nhif: Decimal,
    /// Income tax net of personal relief.
    pub paye: Decimal,
    /// Housing levy.
    pub housing_levy: Decimal,
    /// Audit steps for the four rules, in application order.
    pub audit_steps: Vec<AuditStep>,
}

impl StatutoryDeductions {
    /// Returns the sum of all four statutory deductions.
    pub fn total(&self) -> Decimal {
        self.nssf + self.nhif + self.paye + self.housing_levy
    }
}

/// Calculates all statutory deductions for a gross salary.
///
/// PAYE is computed on `gross - nssf`; the other three rules take the gross
/// directly. Audit steps are numbered consecutively from `start_step`.
pub fn calculate_statutory_deductions(
    gross: Decimal,
    config: &StatutoryConfig,
    start_step: u32,
) -> StatutoryDeductions {
    let nssf = calculate_nssf(gross, &config.nssf, start_step);
    let nhif = calculate_nhif(gross, &config.nhif_bands, start_step + 1);
    let paye = calculate_paye(
        gross - nssf.amount,
        &config.tax_bands,
        config.personal_relief,
        start_step + 2,
    );
    let housing_levy = calculate_housing_levy(gross, config.housing_levy_rate, start_step + 3);

    StatutoryDeductions {
        nssf: nssf.amount,
        nhif: nhif.amount,
        paye: paye.amount,
        housing_levy: housing_levy.amount,
        audit_steps: vec![
            nssf.audit_step,
            nhif.audit_step,
            paye.audit_step,
            housing_levy.audit_step,
        ],
    }
}
