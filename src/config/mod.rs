//! Configuration for the Payroll Computation Engine.
//!
//! Statutory tables (NSSF tiers, NHIF bands, tax bands, personal relief,
//! housing levy) and fee-discount policy are versioned configuration, not
//! code: regulatory rate changes land as new YAML files, never as code
//! changes. Configuration is always passed to the engine as an explicit
//! value; nothing is read from ambient or global state.

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    DeductionConfig, FeeDiscountConfig, NhifBand, NssfConfig, ScheduleMetadata, StatutoryConfig,
    TaxBand,
};
