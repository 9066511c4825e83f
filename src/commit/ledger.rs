//! Fee ledger port and in-memory adapter.
//!
//! The fee ledger is an external collaborator that records fee payments
//! against student accounts. The engine only needs two operations: posting a
//! credit under a dedupe key, and revoking a credit posted earlier in a
//! failed commit attempt. Posting the same reference twice must be a no-op,
//! which is what makes commit retries safe.

use std::collections::HashMap;
use std::sync::Mutex;

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};

/// A stable reference identifying one credit: the dedupe key is
/// `(payroll_id, student_id)`, so a retried commit can never double-post.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LedgerReference {
    /// The payroll record the credit originates from.
    pub payroll_id: Uuid,
    /// The student account being credited.
    pub student_id: String,
}

impl LedgerReference {
    /// Returns the dedupe key for this reference.
    pub fn dedupe_key(&self) -> String {
        format!("{}:{}", self.payroll_id, self.student_id)
    }
}

/// A credit held by the in-memory ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostedCredit {
    /// The student account credited.
    pub student_id: String,
    /// The credited amount.
    pub amount: Decimal,
}

/// Port to the external fee ledger service.
pub trait FeeLedger: Send + Sync {
    /// Posts a fee credit for a student.
    ///
    /// Implementations must apply the credit idempotently by
    /// [`LedgerReference::dedupe_key`]: posting an already-posted reference
    /// succeeds without crediting again.
    fn post_credit(
        &self,
        student_id: &str,
        amount: Decimal,
        reference: &LedgerReference,
    ) -> EngineResult<()>;

    /// Removes a credit posted under `reference`, if present.
    ///
    /// Used to unwind the postings of a commit attempt that failed part-way.
    fn revoke_credit(&self, reference: &LedgerReference) -> EngineResult<()>;
}

/// In-memory fee ledger used by tests and the default application state.
///
/// Supports injecting a posting failure for a chosen student so the commit
/// rollback path can be exercised.
#[derive(Debug, Default)]
pub struct InMemoryFeeLedger {
    credits: Mutex<HashMap<String, PostedCredit>>,
    failing_student: Mutex<Option<String>>,
}

impl InMemoryFeeLedger {
    /// Creates an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every posting for `student_id` fail until cleared.
    pub fn set_failing_student(&self, student_id: Option<&str>) {
        *lock_ignore_poison(&self.failing_student) = student_id.map(str::to_string);
    }

    /// Returns all credits currently held, keyed by dedupe key.
    pub fn credits(&self) -> HashMap<String, PostedCredit> {
        lock_ignore_poison(&self.credits).clone()
    }

    /// Returns the number of credits currently held.
    pub fn credit_count(&self) -> usize {
        lock_ignore_poison(&self.credits).len()
    }
}

impl FeeLedger for InMemoryFeeLedger {
    fn post_credit(
        &self,
        student_id: &str,
        amount: Decimal,
        reference: &LedgerReference,
    ) -> EngineResult<()> {
        if lock_ignore_poison(&self.failing_student).as_deref() == Some(student_id) {
            return Err(EngineError::LedgerPostingFailure {
                student_id: student_id.to_string(),
                message: "ledger unavailable".to_string(),
            });
        }

        let mut credits = lock_ignore_poison(&self.credits);
        // Idempotent by dedupe key: a replayed posting changes nothing.
        credits
            .entry(reference.dedupe_key())
            .or_insert_with(|| PostedCredit {
                student_id: student_id.to_string(),
                amount,
            });
        Ok(())
    }

    fn revoke_credit(&self, reference: &LedgerReference) -> EngineResult<()> {
        lock_ignore_poison(&self.credits).remove(&reference.dedupe_key());
        Ok(())
    }
}

/// Recovers the inner value from a poisoned mutex; the in-memory adapters
/// hold no invariants that a panicked holder could break mid-update.
pub(crate) fn lock_ignore_poison<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
