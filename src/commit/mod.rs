//! Payroll commit lifecycle.
//!
//! A computed [`PayrollResult`] starts as a draft, is submitted to pending,
//! and is committed to paid exactly once; committing atomically posts one
//! fee-ledger credit per non-zero child deduction. The payroll store and fee
//! ledger are external collaborators reached through the [`PayrollStore`]
//! and [`FeeLedger`] ports; in-memory adapters back the default state and
//! the tests.
//!
//! [`PayrollResult`]: crate::models::PayrollResult

mod ledger;
mod service;
mod store;

pub use ledger::{FeeLedger, InMemoryFeeLedger, LedgerReference, PostedCredit};
pub use service::PayrollCommitService;
pub use store::{InMemoryPayrollStore, PayrollStore};
