//! Payroll store port and in-memory adapter.
//!
//! The payroll store is an external collaborator holding payroll records
//! across their lifecycle. The engine needs saving of drafts, loading by id,
//! a compare-and-swap status transition, and lookup by staff and period.

use std::collections::HashMap;
use std::sync::Mutex;

use uuid::Uuid;

use crate::error::{EngineError, EngineResult};
use crate::models::{PayrollPeriod, PayrollResult, PayrollStatus};

use super::ledger::lock_ignore_poison;

/// Port to the external payroll record store.
pub trait PayrollStore: Send + Sync {
    /// Persists a freshly computed draft.
    ///
    /// `(staff_id, period)` is unique among live records: an existing draft
    /// for the same staff member and period is replaced (recompute flow),
    /// while a pending or paid record for the period rejects the save with
    /// [`EngineError::DuplicatePeriod`]. Cancelled records do not block a
    /// new draft.
    fn save_draft(&self, result: PayrollResult) -> EngineResult<PayrollResult>;

    /// Loads a record by its id.
    fn load(&self, id: Uuid) -> EngineResult<PayrollResult>;

    /// Transitions a record's status from `from` to `to`, atomically.
    ///
    /// Fails with [`EngineError::InvalidTransition`] (carrying the actual
    /// current status) when the record is not in `from`; this is the
    /// compare-and-swap that keeps concurrent writers from double-paying.
    fn update_status(
        &self,
        id: Uuid,
        from: PayrollStatus,
        to: PayrollStatus,
    ) -> EngineResult<PayrollResult>;

    /// Returns the live (non-cancelled) record for a staff member and
    /// period, if any.
    fn get_by_period(
        &self,
        staff_id: &str,
        period: PayrollPeriod,
    ) -> EngineResult<Option<PayrollResult>>;
}

/// In-memory payroll store used by tests and the default application state.
#[derive(Debug, Default)]
pub struct InMemoryPayrollStore {
    records: Mutex<HashMap<Uuid, PayrollResult>>,
}

impl InMemoryPayrollStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of records held, including cancelled ones.
    pub fn record_count(&self) -> usize {
        lock_ignore_poison(&self.records).len()
    }
}

impl PayrollStore for InMemoryPayrollStore {
    fn save_draft(&self, result: PayrollResult) -> EngineResult<PayrollResult> {
        let mut records = lock_ignore_poison(&self.records);

        let mut replaced_draft: Option<Uuid> = None;
        for record in records.values() {
            if record.staff_id == result.staff_id && record.period == result.period {
                match record.status {
                    PayrollStatus::Draft => replaced_draft = Some(record.payroll_id),
                    PayrollStatus::Pending | PayrollStatus::Paid => {
                        return Err(EngineError::DuplicatePeriod {
                            staff_id: result.staff_id.clone(),
                            month: result.period.month,
                            year: result.period.year,
                        });
                    }
                    PayrollStatus::Cancelled => {}
                }
            }
        }
        if let Some(id) = replaced_draft {
            records.remove(&id);
        }

        records.insert(result.payroll_id, result.clone());
        Ok(result)
    }

    fn load(&self, id: Uuid) -> EngineResult<PayrollResult> {
        lock_ignore_poison(&self.records)
            .get(&id)
            .cloned()
            .ok_or(EngineError::PayrollNotFound { id })
    }

    fn update_status(
        &self,
        id: Uuid,
        from: PayrollStatus,
        to: PayrollStatus,
    ) -> EngineResult<PayrollResult> {
        let mut records = lock_ignore_poison(&self.records);
        let record = records
            .get_mut(&id)
            .ok_or(EngineError::PayrollNotFound { id })?;

        if record.status != from {
            return Err(EngineError::InvalidTransition {
                id,
                from: record.status,
                to,
            });
        }
        record.status = to;
        Ok(record.clone())
    }

    fn get_by_period(
        &self,
        staff_id: &str,
        period: PayrollPeriod,
    ) -> EngineResult<Option<PayrollResult>> {
        let records = lock_ignore_poison(&self.records);
        Ok(records
            .values()
            .find(|r| {
                r.staff_id == staff_id
                    && r.period == period
                    && r.status != PayrollStatus::Cancelled
            })
            .cloned())
    }
}
