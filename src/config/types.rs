//! Configuration types for payroll deduction rules.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files.

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::error::{EngineError, EngineResult};

/// Metadata about the deduction schedule.
#[derive(Debug, Clone, Deserialize)]
pub struct ScheduleMetadata {
    /// The human-readable name of the schedule.
    pub name: String,
    /// The version or effective date of the schedule.
    pub version: String,
    /// The currency all amounts are denominated in.
    pub currency: String,
    /// URL to the official schedule documentation.
    pub source_url: String,
}

/// Two-tier social-security contribution parameters.
///
/// Tier I covers pensionable pay up to `tier1_ceiling`; tier II covers the
/// portion between `tier1_ceiling` and `tier2_ceiling`. The contribution is
/// flat for any gross at or above `tier2_ceiling`.
#[derive(Debug, Clone, Deserialize)]
pub struct NssfConfig {
    /// Upper bound of tier I pensionable pay.
    pub tier1_ceiling: Decimal,
    /// Upper bound of tier II pensionable pay.
    pub tier2_ceiling: Decimal,
    /// Contribution rate applied to both tiers.
    pub rate: Decimal,
}

impl NssfConfig {
    /// Width of the tier II band.
    pub fn tier2_width(&self) -> Decimal {
        self.tier2_ceiling - self.tier1_ceiling
    }
}

/// One band of the medical-insurance contribution table.
///
/// `upper_bound` is inclusive; `None` marks the open-ended top band.
#[derive(Debug, Clone, Deserialize)]
pub struct NhifBand {
    /// Inclusive gross-salary upper bound, or `None` for the top band.
    pub upper_bound: Option<Decimal>,
    /// The flat contribution for this band.
    pub contribution: Decimal,
}

/// One band of the progressive income-tax table.
///
/// Bands are cumulative upper bounds on taxable income; `None` marks the
/// open-ended top band.
#[derive(Debug, Clone, Deserialize)]
pub struct TaxBand {
    /// Cumulative taxable-income upper bound, or `None` for the top band.
    pub upper_bound: Option<Decimal>,
    /// Marginal rate applied within this band.
    pub rate: Decimal,
}

/// The statutory deduction tables loaded from `statutory.yaml`.
#[derive(Debug, Clone, Deserialize)]
pub struct StatutoryConfig {
    /// Social-security contribution parameters.
    pub nssf: NssfConfig,
    /// Medical-insurance contribution bands, ascending.
    pub nhif_bands: Vec<NhifBand>,
    /// Income-tax bands, ascending.
    pub tax_bands: Vec<TaxBand>,
    /// Fixed monthly personal relief subtracted from income tax.
    pub personal_relief: Decimal,
    /// Flat housing levy rate applied to gross salary.
    pub housing_levy_rate: Decimal,
}

/// Fee-discount policy for staff children, loaded from `fee_deductions.yaml`.
#[derive(Debug, Clone, Deserialize)]
pub struct FeeDiscountConfig {
    /// Discount percentage for the first child.
    pub first_child: Decimal,
    /// Discount percentage for the second child.
    pub second_child: Decimal,
    /// Discount percentage for the third and subsequent children.
    pub third_child_plus: Decimal,
    /// Maximum fraction of gross salary (as a percentage) deductible for
    /// children's fees in one period.
    pub max_salary_deduction_percent: Decimal,
}

impl FeeDiscountConfig {
    /// Returns the discount percentage for a child's rank.
    ///
    /// # Example
    ///
    /// ```
    /// use payroll_engine::config::FeeDiscountConfig;
    /// use rust_decimal::Decimal;
    ///
    /// let discounts = FeeDiscountConfig {
    ///     first_child: Decimal::new(50, 0),
    ///     second_child: Decimal::new(40, 0),
    ///     third_child_plus: Decimal::new(30, 0),
    ///     max_salary_deduction_percent: Decimal::new(30, 0),
    /// };
    /// assert_eq!(discounts.discount_percent_for(1), Decimal::new(50, 0));
    /// assert_eq!(discounts.discount_percent_for(5), Decimal::new(30, 0));
    /// ```
    pub fn discount_percent_for(&self, child_order: u32) -> Decimal {
        match child_order {
            1 => self.first_child,
            2 => self.second_child,
            _ => self.third_child_plus,
        }
    }
}

/// The complete deduction configuration for one payroll cycle.
///
/// Loaded once per computation and never mutated mid-computation. The same
/// engine instance can serve multiple schools or periods by supplying
/// different `DeductionConfig` values.
#[derive(Debug, Clone)]
pub struct DeductionConfig {
    /// Schedule metadata.
    metadata: ScheduleMetadata,
    /// Statutory deduction tables.
    statutory: StatutoryConfig,
    /// Fee-discount policy.
    fee_discounts: FeeDiscountConfig,
}

impl DeductionConfig {
    /// Creates a new DeductionConfig from its component parts, rejecting any
    /// part that violates a range or ordering invariant.
    pub fn new(
        metadata: ScheduleMetadata,
        statutory: StatutoryConfig,
        fee_discounts: FeeDiscountConfig,
    ) -> EngineResult<Self> {
        let config = Self {
            metadata,
            statutory,
            fee_discounts,
        };
        config.validate()?;
        Ok(config)
    }

    /// Returns the schedule metadata.
    pub fn schedule(&self) -> &ScheduleMetadata {
        &self.metadata
    }

    /// Returns the statutory deduction tables.
    pub fn statutory(&self) -> &StatutoryConfig {
        &self.statutory
    }

    /// Returns the fee-discount policy.
    pub fn fee_discounts(&self) -> &FeeDiscountConfig {
        &self.fee_discounts
    }

    fn validate(&self) -> EngineResult<()> {
        let statutory = &self.statutory;

        if statutory.nssf.tier1_ceiling <= Decimal::ZERO
            || statutory.nssf.tier2_ceiling <= statutory.nssf.tier1_ceiling
        {
            return Err(EngineError::InvalidConfig {
                message: "nssf tier ceilings must satisfy 0 < tier1 < tier2".to_string(),
            });
        }
        Self::check_rate("nssf.rate", statutory.nssf.rate)?;
        Self::check_rate("housing_levy_rate", statutory.housing_levy_rate)?;
        if statutory.personal_relief < Decimal::ZERO {
            return Err(EngineError::InvalidConfig {
                message: "personal_relief cannot be negative".to_string(),
            });
        }

        Self::check_bands(
            "nhif_bands",
            statutory.nhif_bands.iter().map(|b| b.upper_bound),
        )?;
        let mut prev_contribution = Decimal::ZERO;
        for band in &statutory.nhif_bands {
            if band.contribution < prev_contribution {
                return Err(EngineError::InvalidConfig {
                    message: "nhif_bands contributions must be non-decreasing".to_string(),
                });
            }
            prev_contribution = band.contribution;
        }

        Self::check_bands(
            "tax_bands",
            statutory.tax_bands.iter().map(|b| b.upper_bound),
        )?;
        for band in &statutory.tax_bands {
            Self::check_rate("tax_bands.rate", band.rate)?;
        }

        for (field, percent) in [
            ("first_child", self.fee_discounts.first_child),
            ("second_child", self.fee_discounts.second_child),
            ("third_child_plus", self.fee_discounts.third_child_plus),
            (
                "max_salary_deduction_percent",
                self.fee_discounts.max_salary_deduction_percent,
            ),
        ] {
            if percent < Decimal::ZERO || percent > Decimal::ONE_HUNDRED {
                return Err(EngineError::InvalidConfig {
                    message: format!("{field} must be between 0 and 100"),
                });
            }
        }

        Ok(())
    }

    fn check_rate(field: &str, rate: Decimal) -> EngineResult<()> {
        if rate < Decimal::ZERO || rate > Decimal::ONE {
            return Err(EngineError::InvalidConfig {
                message: format!("{field} must be a fraction between 0 and 1"),
            });
        }
        Ok(())
    }

    /// Bands must be non-empty, strictly ascending, with at most one
    /// open-ended band and only in the last position.
    fn check_bands(
        field: &str,
        bounds: impl Iterator<Item = Option<Decimal>>,
    ) -> EngineResult<()> {
        let mut prev: Option<Decimal> = None;
        let mut saw_open_end = false;
        let mut count = 0usize;
        for bound in bounds {
            count += 1;
            if saw_open_end {
                return Err(EngineError::InvalidConfig {
                    message: format!("{field}: open-ended band must be last"),
                });
            }
            match bound {
                Some(upper) => {
                    if let Some(p) = prev {
                        if upper <= p {
                            return Err(EngineError::InvalidConfig {
                                message: format!("{field} must be strictly ascending"),
                            });
                        }
                    }
                    prev = Some(upper);
                }
                None => saw_open_end = true,
            }
        }
        if count == 0 {
            return Err(EngineError::InvalidConfig {
                message: format!("{field} must not be empty"),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn test_metadata() -> ScheduleMetadata {
        ScheduleMetadata {
            name: "Test schedule".to_string(),
            version: "2024-01".to_string(),
            currency: "KES".to_string(),
            source_url: "https://example.com".to_string(),
        }
    }

    fn test_statutory() -> StatutoryConfig {
        StatutoryConfig {
            nssf: NssfConfig {
                tier1_ceiling: dec("7000"),
                tier2_ceiling: dec("36000"),
                rate: dec("0.06"),
            },
            nhif_bands: vec![
                NhifBand {
                    upper_bound: Some(dec("5999")),
                    contribution: dec("150"),
                },
                NhifBand {
                    upper_bound: Some(dec("7999")),
                    contribution: dec("300"),
                },
                NhifBand {
                    upper_bound: None,
                    contribution: dec("1700"),
                },
            ],
            tax_bands: vec![
                TaxBand {
                    upper_bound: Some(dec("24000")),
                    rate: dec("0.10"),
                },
                TaxBand {
                    upper_bound: Some(dec("32333")),
                    rate: dec("0.25"),
                },
                TaxBand {
                    upper_bound: None,
                    rate: dec("0.30"),
                },
            ],
            personal_relief: dec("2400"),
            housing_levy_rate: dec("0.015"),
        }
    }

    fn test_fee_discounts() -> FeeDiscountConfig {
        FeeDiscountConfig {
            first_child: dec("50"),
            second_child: dec("40"),
            third_child_plus: dec("30"),
            max_salary_deduction_percent: dec("30"),
        }
    }

    /// CF-001: valid configuration accepted
    #[test]
    fn test_valid_configuration_accepted() {
        let config = DeductionConfig::new(test_metadata(), test_statutory(), test_fee_discounts());
        assert!(config.is_ok());
    }

    /// CF-002: discount above 100 percent rejected
    #[test]
    fn test_discount_above_100_rejected() {
        let mut discounts = test_fee_discounts();
        discounts.first_child = dec("101");

        let result = DeductionConfig::new(test_metadata(), test_statutory(), discounts);
        match result.unwrap_err() {
            EngineError::InvalidConfig { message } => {
                assert!(message.contains("first_child"));
            }
            other => panic!("Expected InvalidConfig, got {:?}", other),
        }
    }

    /// CF-003: non-ascending nhif bands rejected
    #[test]
    fn test_non_ascending_nhif_bands_rejected() {
        let mut statutory = test_statutory();
        statutory.nhif_bands[1].upper_bound = Some(dec("4000"));

        let result = DeductionConfig::new(test_metadata(), statutory, test_fee_discounts());
        match result.unwrap_err() {
            EngineError::InvalidConfig { message } => {
                assert!(message.contains("ascending"));
            }
            other => panic!("Expected InvalidConfig, got {:?}", other),
        }
    }

    /// CF-004: open-ended band before the last rejected
    #[test]
    fn test_open_ended_band_must_be_last() {
        let mut statutory = test_statutory();
        statutory.tax_bands[0].upper_bound = None;

        let result = DeductionConfig::new(test_metadata(), statutory, test_fee_discounts());
        assert!(result.is_err());
    }

    /// CF-005: empty band table rejected
    #[test]
    fn test_empty_band_table_rejected() {
        let mut statutory = test_statutory();
        statutory.nhif_bands.clear();

        let result = DeductionConfig::new(test_metadata(), statutory, test_fee_discounts());
        assert!(result.is_err());
    }

    /// CF-006: decreasing nhif contributions rejected
    #[test]
    fn test_decreasing_nhif_contributions_rejected() {
        let mut statutory = test_statutory();
        statutory.nhif_bands[1].contribution = dec("100");

        let result = DeductionConfig::new(test_metadata(), statutory, test_fee_discounts());
        match result.unwrap_err() {
            EngineError::InvalidConfig { message } => {
                assert!(message.contains("non-decreasing"));
            }
            other => panic!("Expected InvalidConfig, got {:?}", other),
        }
    }

    /// CF-007: rate above 1 rejected
    #[test]
    fn test_rate_above_one_rejected() {
        let mut statutory = test_statutory();
        statutory.nssf.rate = dec("1.5");

        let result = DeductionConfig::new(test_metadata(), statutory, test_fee_discounts());
        assert!(result.is_err());
    }

    /// CF-008: inverted tier ceilings rejected
    #[test]
    fn test_inverted_tier_ceilings_rejected() {
        let mut statutory = test_statutory();
        statutory.nssf.tier2_ceiling = dec("5000");

        let result = DeductionConfig::new(test_metadata(), statutory, test_fee_discounts());
        assert!(result.is_err());
    }

    #[test]
    fn test_tier2_width() {
        let nssf = NssfConfig {
            tier1_ceiling: dec("7000"),
            tier2_ceiling: dec("36000"),
            rate: dec("0.06"),
        };
        assert_eq!(nssf.tier2_width(), dec("29000"));
    }

    #[test]
    fn test_discount_percent_for_each_tier() {
        let discounts = test_fee_discounts();
        assert_eq!(discounts.discount_percent_for(1), dec("50"));
        assert_eq!(discounts.discount_percent_for(2), dec("40"));
        assert_eq!(discounts.discount_percent_for(3), dec("30"));
        assert_eq!(discounts.discount_percent_for(7), dec("30"));
    }
}
