//! Payroll computation orchestrator.
//!
//! Combines the statutory rules and the dependent fee allocation with the
//! caller's manual deductions into a full [`PayrollResult`]. The computation
//! is pure: the same inputs always produce the same breakdown, so callers
//! can re-preview freely before committing.

use std::time::Instant;

use chrono::Utc;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::config::DeductionConfig;
use crate::error::{EngineError, EngineResult};
use crate::models::{
    AuditTrace, Dependent, PayrollPeriod, PayrollResult, PayrollStatus, StaffPayProfile,
};

use super::fee_allocation::allocate_dependent_fees;
use super::rounding::round_currency;
use super::statutory::calculate_statutory_deductions;

/// Computes a draft payroll record for one staff member and period.
///
/// Steps: validate every input, sum gross salary, run the statutory rules,
/// allocate dependent fee deductions under the salary cap, then total up.
/// Every monetary output is rounded to two decimal places exactly once,
/// here, and the totals are recomputed from the rounded parts so that
/// `net_salary = gross_salary - total_deductions` holds to the cent.
///
/// # Errors
///
/// - [`EngineError::InvalidProfile`] / [`EngineError::InvalidDependent`] /
///   [`EngineError::InvalidPeriod`] when an input violates its range
///   invariants; nothing is computed.
/// - [`EngineError::InsufficientGrossSalary`] when the deductions exceed the
///   gross salary. Net pay is never silently clamped; the caller must reduce
///   manual deductions, disable dependent deductions, or escalate.
///
/// # Example
///
/// ```no_run
/// use payroll_engine::calculation::compute_payroll;
/// use payroll_engine::config::ConfigLoader;
/// use payroll_engine::models::{Allowances, PayrollPeriod, StaffPayProfile};
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let loader = ConfigLoader::load("./config/ke2024")?;
/// let profile = StaffPayProfile {
///     staff_id: "stf_001".to_string(),
///     basic_salary: Decimal::from_str("40000").unwrap(),
///     allowances: Allowances::default(),
/// };
///
/// let result = compute_payroll(
///     &profile,
///     &[],
///     Decimal::ZERO,
///     loader.config(),
///     PayrollPeriod { month: 3, year: 2024 },
/// )?;
/// assert_eq!(result.net_salary, result.gross_salary - result.total_deductions);
/// # Ok::<(), payroll_engine::error::EngineError>(())
/// ```
pub fn compute_payroll(
    profile: &StaffPayProfile,
    dependents: &[Dependent],
    other_deductions: Decimal,
    config: &DeductionConfig,
    period: PayrollPeriod,
) -> EngineResult<PayrollResult> {
    let start_time = Instant::now();

    period.validate()?;
    profile.validate()?;
    crate::models::validate_dependents(dependents)?;
    if other_deductions < Decimal::ZERO {
        return Err(EngineError::InvalidProfile {
            field: "other_deductions".to_string(),
            message: "cannot be negative".to_string(),
        });
    }

    let gross = profile.gross_salary();

    let statutory = calculate_statutory_deductions(gross, config.statutory(), 1);
    let next_step = statutory.audit_steps.len() as u32 + 1;
    let allocation = allocate_dependent_fees(dependents, gross, config.fee_discounts(), next_step);

    // Single rounding pass; totals are rebuilt from the rounded parts.
    let nssf = round_currency(statutory.nssf);
    let nhif = round_currency(statutory.nhif);
    let paye = round_currency(statutory.paye);
    let housing_levy = round_currency(statutory.housing_levy);
    let other_deductions = round_currency(other_deductions);

    let mut children_deductions = allocation.children;
    for child in &mut children_deductions {
        child.discount_amount = round_currency(child.discount_amount);
        child.net_fee = round_currency(child.net_fee);
        child.deducted_amount = round_currency(child.deducted_amount);
    }
    let children_total: Decimal = children_deductions
        .iter()
        .map(|c| c.deducted_amount)
        .sum();

    let total_deductions =
        nssf + nhif + paye + housing_levy + children_total + other_deductions;

    if total_deductions > gross {
        return Err(EngineError::InsufficientGrossSalary {
            gross,
            total_deductions,
        });
    }

    let net_salary = gross - total_deductions;

    let mut audit_steps = statutory.audit_steps;
    audit_steps.push(allocation.audit_step);

    Ok(PayrollResult {
        payroll_id: Uuid::new_v4(),
        staff_id: profile.staff_id.clone(),
        period,
        computed_at: Utc::now(),
        engine_version: env!("CARGO_PKG_VERSION").to_string(),
        gross_salary: round_currency(gross),
        nssf,
        nhif,
        paye,
        housing_levy,
        children_deductions,
        capped: allocation.capped,
        other_deductions,
        total_deductions,
        net_salary,
        status: PayrollStatus::Draft,
        audit_trace: AuditTrace {
            steps: audit_steps,
            duration_us: start_time.elapsed().as_micros() as u64,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigLoader;
    use std::str::FromStr;

    use crate::models::Allowances;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn load_config() -> DeductionConfig {
        ConfigLoader::load("./config/ke2024")
            .expect("Failed to load config")
            .config()
            .clone()
    }

    fn test_period() -> PayrollPeriod {
        PayrollPeriod { month: 3, year: 2024 }
    }

    fn create_test_profile() -> StaffPayProfile {
        StaffPayProfile {
            staff_id: "stf_001".to_string(),
            basic_salary: dec("40000"),
            allowances: Allowances {
                house: dec("7000"),
                transport: dec("3000"),
                other: Decimal::ZERO,
            },
        }
    }

    fn create_dependent(student_id: &str, child_order: u32, balance: &str) -> Dependent {
        Dependent {
            student_id: student_id.to_string(),
            child_order,
            term_fee_balance: dec(balance),
            deduction_enabled: true,
        }
    }

    /// CP-001: scenario A - gross 50000, no dependents
    #[test]
    fn test_scenario_a_no_dependents() {
        let config = load_config();
        let profile = create_test_profile();

        let result =
            compute_payroll(&profile, &[], Decimal::ZERO, &config, test_period()).unwrap();

        assert_eq!(result.gross_salary, dec("50000.00"));
        assert_eq!(result.nssf, dec("2160.00"));
        assert_eq!(result.nhif, dec("1200.00"));
        assert_eq!(result.paye, dec("6735.35"));
        assert_eq!(result.housing_levy, dec("750.00"));
        assert!(result.children_deductions.is_empty());
        assert!(!result.capped);
        assert_eq!(result.total_deductions, dec("10845.35"));
        assert_eq!(result.net_salary, dec("39154.65"));
        assert_eq!(result.status, PayrollStatus::Draft);
    }

    /// CP-002: scenario B - two dependents hit the 30% cap
    #[test]
    fn test_scenario_b_capped_dependents() {
        let config = load_config();
        let profile = create_test_profile();
        let dependents = vec![
            create_dependent("stu_001", 1, "20000"),
            create_dependent("stu_002", 2, "15000"),
        ];

        let result =
            compute_payroll(&profile, &dependents, Decimal::ZERO, &config, test_period()).unwrap();

        assert!(result.capped);
        assert_eq!(result.children_deductions[0].net_fee, dec("10000.00"));
        assert_eq!(result.children_deductions[1].net_fee, dec("9000.00"));
        assert_eq!(
            result.children_deductions[0].deducted_amount,
            dec("7894.74")
        );
        assert_eq!(
            result.children_deductions[1].deducted_amount,
            dec("7105.26")
        );
        assert_eq!(result.children_total(), dec("15000.00"));
        assert_eq!(
            result.net_salary,
            result.gross_salary - result.total_deductions
        );
    }

    /// CP-003: scenario C - disabled dependent contributes zero
    #[test]
    fn test_scenario_c_disabled_dependent() {
        let config = load_config();
        let profile = create_test_profile();
        let mut disabled = create_dependent("stu_002", 2, "30000");
        disabled.deduction_enabled = false;
        let dependents = vec![create_dependent("stu_001", 1, "20000"), disabled];

        let result =
            compute_payroll(&profile, &dependents, Decimal::ZERO, &config, test_period()).unwrap();

        // enabled desired = 10000 <= cap 15000, so no capping
        assert!(!result.capped);
        assert_eq!(result.children_deductions[0].deducted_amount, dec("10000.00"));
        assert_eq!(result.children_deductions[1].deducted_amount, Decimal::ZERO);
    }

    /// CP-004: scenario D - manual deductions exceed gross
    #[test]
    fn test_scenario_d_insufficient_gross() {
        let config = load_config();
        let profile = create_test_profile();

        let result = compute_payroll(
            &profile,
            &[],
            dec("45000"),
            &config,
            test_period(),
        );

        match result.unwrap_err() {
            EngineError::InsufficientGrossSalary {
                gross,
                total_deductions,
            } => {
                assert_eq!(gross, dec("50000"));
                assert_eq!(total_deductions, dec("55845.35"));
            }
            other => panic!("Expected InsufficientGrossSalary, got {:?}", other),
        }
    }

    /// CP-005: same inputs produce the same breakdown
    #[test]
    fn test_deterministic_breakdown() {
        let config = load_config();
        let profile = create_test_profile();
        let dependents = vec![create_dependent("stu_001", 1, "20000")];

        let first =
            compute_payroll(&profile, &dependents, dec("500"), &config, test_period()).unwrap();
        let second =
            compute_payroll(&profile, &dependents, dec("500"), &config, test_period()).unwrap();

        assert_eq!(first.gross_salary, second.gross_salary);
        assert_eq!(first.total_deductions, second.total_deductions);
        assert_eq!(first.net_salary, second.net_salary);
        assert_eq!(first.children_deductions, second.children_deductions);
        // Identity differs per computation; the breakdown does not.
        assert_ne!(first.payroll_id, second.payroll_id);
    }

    /// CP-006: validation failures reject before computing
    #[test]
    fn test_validation_rejects_bad_inputs() {
        let config = load_config();
        let mut profile = create_test_profile();
        profile.basic_salary = dec("-1");

        let result = compute_payroll(&profile, &[], Decimal::ZERO, &config, test_period());
        assert!(matches!(
            result.unwrap_err(),
            EngineError::InvalidProfile { .. }
        ));

        let profile = create_test_profile();
        let dependents = vec![
            create_dependent("stu_001", 1, "1000"),
            create_dependent("stu_002", 1, "1000"),
        ];
        let result = compute_payroll(&profile, &dependents, Decimal::ZERO, &config, test_period());
        assert!(matches!(
            result.unwrap_err(),
            EngineError::InvalidDependent { .. }
        ));

        let profile = create_test_profile();
        let result = compute_payroll(
            &profile,
            &[],
            Decimal::ZERO,
            &config,
            PayrollPeriod { month: 13, year: 2024 },
        );
        assert!(matches!(
            result.unwrap_err(),
            EngineError::InvalidPeriod { month: 13 }
        ));

        let profile = create_test_profile();
        let result = compute_payroll(&profile, &[], dec("-10"), &config, test_period());
        assert!(matches!(
            result.unwrap_err(),
            EngineError::InvalidProfile { .. }
        ));
    }

    /// CP-007: audit trace covers every rule
    #[test]
    fn test_audit_trace_covers_every_rule() {
        let config = load_config();
        let profile = create_test_profile();
        let dependents = vec![create_dependent("stu_001", 1, "20000")];

        let result =
            compute_payroll(&profile, &dependents, Decimal::ZERO, &config, test_period()).unwrap();

        let rule_ids: Vec<&str> = result
            .audit_trace
            .steps
            .iter()
            .map(|s| s.rule_id.as_str())
            .collect();
        assert_eq!(
            rule_ids,
            vec![
                "nssf_contribution",
                "nhif_contribution",
                "paye_income_tax",
                "housing_levy",
                "dependent_fee_allocation"
            ]
        );
        let numbers: Vec<u32> = result
            .audit_trace
            .steps
            .iter()
            .map(|s| s.step_number)
            .collect();
        assert_eq!(numbers, vec![1, 2, 3, 4, 5]);
    }

    /// CP-008: zero-salary profile with no deductions nets zero
    #[test]
    fn test_zero_salary_profile() {
        let config = load_config();
        let profile = StaffPayProfile {
            staff_id: "stf_002".to_string(),
            basic_salary: Decimal::ZERO,
            allowances: Allowances::default(),
        };

        // NHIF's lowest band still charges 150 on zero gross, so computation
        // must fail rather than clamp.
        let result = compute_payroll(&profile, &[], Decimal::ZERO, &config, test_period());
        assert!(matches!(
            result.unwrap_err(),
            EngineError::InsufficientGrossSalary { .. }
        ));
    }
}
