//! Application state for the Payroll Computation Engine API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::Arc;

use crate::commit::{FeeLedger, InMemoryFeeLedger, InMemoryPayrollStore, PayrollCommitService, PayrollStore};
use crate::config::ConfigLoader;

/// Shared application state.
///
/// Contains the loaded deduction configuration and the commit service with
/// its store and ledger ports.
#[derive(Clone)]
pub struct AppState {
    config: Arc<ConfigLoader>,
    commits: Arc<PayrollCommitService>,
}

impl AppState {
    /// Creates application state backed by in-memory store and ledger.
    pub fn new(config: ConfigLoader) -> Self {
        Self::with_ports(
            config,
            Arc::new(InMemoryPayrollStore::new()),
            Arc::new(InMemoryFeeLedger::new()),
        )
    }

    /// Creates application state over explicit store and ledger ports.
    pub fn with_ports(
        config: ConfigLoader,
        store: Arc<dyn PayrollStore>,
        ledger: Arc<dyn FeeLedger>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            commits: Arc::new(PayrollCommitService::new(store, ledger)),
        }
    }

    /// Returns a reference to the configuration loader.
    pub fn config(&self) -> &ConfigLoader {
        &self.config
    }

    /// Returns a reference to the commit service.
    pub fn commits(&self) -> &PayrollCommitService {
        &self.commits
    }
}
