//! Payroll commit state machine.
//!
//! Drives the lifecycle `Draft -> Pending -> Paid`, with
//! `Draft|Pending -> Cancelled` as the only other transition. Paying a
//! record posts one fee-ledger credit per non-zero child deduction inside
//! one atomic unit of work: if any posting fails, the status write and the
//! attempt's postings are rolled back and the whole commit reports failed.
//! Re-committing an already-paid record is a no-op success, so callers may
//! retry after a timeout without risking double-posting.

use std::sync::{Arc, Mutex};

use tracing::{info, warn};
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};
use crate::models::{PayrollPeriod, PayrollResult, PayrollStatus};

use super::ledger::{FeeLedger, LedgerReference, lock_ignore_poison};
use super::store::PayrollStore;

/// Coordinates payroll lifecycle transitions against the store and ledger.
///
/// Computation never touches this service; it exists so the caller can
/// preview a draft as many times as needed and take the side effects in a
/// separate, explicit step.
pub struct PayrollCommitService {
    store: Arc<dyn PayrollStore>,
    ledger: Arc<dyn FeeLedger>,
    /// Serializes commits; two concurrent commits for the same record must
    /// not interleave between the status write and the ledger postings.
    commit_lock: Mutex<()>,
}

impl PayrollCommitService {
    /// Creates a service over the given store and ledger ports.
    pub fn new(store: Arc<dyn PayrollStore>, ledger: Arc<dyn FeeLedger>) -> Self {
        Self {
            store,
            ledger,
            commit_lock: Mutex::new(()),
        }
    }

    /// Persists a computed draft.
    ///
    /// Only drafts can be saved; the computation always produces drafts, so
    /// anything else indicates a caller bug and is rejected.
    pub fn save_draft(&self, result: PayrollResult) -> EngineResult<PayrollResult> {
        if result.status != PayrollStatus::Draft {
            return Err(EngineError::InvalidTransition {
                id: result.payroll_id,
                from: result.status,
                to: PayrollStatus::Draft,
            });
        }
        let saved = self.store.save_draft(result)?;
        info!(payroll_id = %saved.payroll_id, staff_id = %saved.staff_id, "Draft saved");
        Ok(saved)
    }

    /// Submits a draft for payment: `Draft -> Pending`.
    pub fn submit(&self, payroll_id: Uuid) -> EngineResult<PayrollResult> {
        let submitted =
            self.store
                .update_status(payroll_id, PayrollStatus::Draft, PayrollStatus::Pending)?;
        info!(payroll_id = %payroll_id, "Payroll submitted for payment");
        Ok(submitted)
    }

    /// Commits a pending payroll: `Pending -> Paid` plus ledger postings.
    ///
    /// Within one atomic unit of work the record's status becomes `Paid` and
    /// every non-zero child deduction is posted to the fee ledger, keyed by
    /// `(payroll_id, student_id)`. A ledger failure rolls everything back
    /// and surfaces [`EngineError::LedgerPostingFailure`]; the record stays
    /// `Pending` and the commit is safe to retry.
    ///
    /// Committing an already-`Paid` record returns it unchanged: a caller
    /// that timed out between the status write and the response can retry
    /// blindly. Committing a `Cancelled` record fails with
    /// [`EngineError::AlreadyPaid`]; the record can never become paid and
    /// the caller should reload rather than retry.
    pub fn commit(&self, payroll_id: Uuid) -> EngineResult<PayrollResult> {
        let _guard = lock_ignore_poison(&self.commit_lock);

        let record = self.store.load(payroll_id)?;
        match record.status {
            PayrollStatus::Paid => {
                info!(payroll_id = %payroll_id, "Commit retry on paid record; no-op");
                return Ok(record);
            }
            PayrollStatus::Cancelled => {
                return Err(EngineError::AlreadyPaid {
                    id: payroll_id,
                    status: PayrollStatus::Cancelled,
                });
            }
            PayrollStatus::Draft => {
                return Err(EngineError::InvalidTransition {
                    id: payroll_id,
                    from: PayrollStatus::Draft,
                    to: PayrollStatus::Paid,
                });
            }
            PayrollStatus::Pending => {}
        }

        let paid =
            self.store
                .update_status(payroll_id, PayrollStatus::Pending, PayrollStatus::Paid)?;

        let mut posted: Vec<LedgerReference> = Vec::new();
        for child in paid
            .children_deductions
            .iter()
            .filter(|c| c.deducted_amount > rust_decimal::Decimal::ZERO)
        {
            let reference = LedgerReference {
                payroll_id,
                student_id: child.student_id.clone(),
            };
            match self
                .ledger
                .post_credit(&child.student_id, child.deducted_amount, &reference)
            {
                Ok(()) => posted.push(reference),
                Err(posting_error) => {
                    warn!(
                        payroll_id = %payroll_id,
                        student_id = %child.student_id,
                        error = %posting_error,
                        "Ledger posting failed; rolling back commit"
                    );
                    self.rollback(payroll_id, &posted)?;
                    return Err(posting_error);
                }
            }
        }

        info!(
            payroll_id = %payroll_id,
            credits = posted.len(),
            net_salary = %paid.net_salary,
            "Payroll committed"
        );
        Ok(paid)
    }

    /// Cancels a draft or pending payroll: `Draft|Pending -> Cancelled`.
    ///
    /// Cancellation is terminal; the only way back is computing a fresh
    /// draft for the same period.
    pub fn cancel(&self, payroll_id: Uuid) -> EngineResult<PayrollResult> {
        let record = self.store.load(payroll_id)?;
        match record.status {
            PayrollStatus::Draft | PayrollStatus::Pending => {
                let cancelled = self.store.update_status(
                    payroll_id,
                    record.status,
                    PayrollStatus::Cancelled,
                )?;
                info!(payroll_id = %payroll_id, "Payroll cancelled");
                Ok(cancelled)
            }
            status => Err(EngineError::InvalidTransition {
                id: payroll_id,
                from: status,
                to: PayrollStatus::Cancelled,
            }),
        }
    }

    /// Returns the live payroll record for a staff member and period.
    pub fn get_by_period(
        &self,
        staff_id: &str,
        period: PayrollPeriod,
    ) -> EngineResult<Option<PayrollResult>> {
        self.store.get_by_period(staff_id, period)
    }

    /// Unwinds a failed commit attempt: removes the attempt's postings and
    /// restores the record to `Pending`.
    fn rollback(&self, payroll_id: Uuid, posted: &[LedgerReference]) -> EngineResult<()> {
        for reference in posted {
            self.ledger.revoke_credit(reference)?;
        }
        self.store
            .update_status(payroll_id, PayrollStatus::Paid, PayrollStatus::Pending)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    use crate::commit::{InMemoryFeeLedger, InMemoryPayrollStore};
    use crate::models::{AuditTrace, ChildDeduction};

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    struct Harness {
        store: Arc<InMemoryPayrollStore>,
        ledger: Arc<InMemoryFeeLedger>,
        service: PayrollCommitService,
    }

    fn create_harness() -> Harness {
        let store = Arc::new(InMemoryPayrollStore::new());
        let ledger = Arc::new(InMemoryFeeLedger::new());
        let service = PayrollCommitService::new(store.clone(), ledger.clone());
        Harness {
            store,
            ledger,
            service,
        }
    }

    fn create_child(student_id: &str, deducted: &str) -> ChildDeduction {
        ChildDeduction {
            student_id: student_id.to_string(),
            child_order: 1,
            discount_percent: dec("50"),
            discount_amount: dec("10000"),
            net_fee: dec("10000"),
            deducted_amount: dec(deducted),
        }
    }

    fn create_draft(children: Vec<ChildDeduction>) -> PayrollResult {
        let children_total: Decimal = children.iter().map(|c| c.deducted_amount).sum();
        PayrollResult {
            payroll_id: Uuid::new_v4(),
            staff_id: "stf_001".to_string(),
            period: PayrollPeriod { month: 3, year: 2024 },
            computed_at: Utc::now(),
            engine_version: "test".to_string(),
            gross_salary: dec("50000"),
            nssf: dec("2160"),
            nhif: dec("1200"),
            paye: dec("6735.35"),
            housing_levy: dec("750"),
            children_deductions: children,
            capped: false,
            other_deductions: Decimal::ZERO,
            total_deductions: dec("10845.35") + children_total,
            net_salary: dec("39154.65") - children_total,
            status: PayrollStatus::Draft,
            audit_trace: AuditTrace {
                steps: vec![],
                duration_us: 0,
            },
        }
    }

    /// CS-001: full happy path posts one credit per child
    #[test]
    fn test_commit_posts_one_credit_per_child() {
        let h = create_harness();
        let draft = create_draft(vec![
            create_child("stu_001", "7894.74"),
            create_child("stu_002", "7105.26"),
        ]);
        let id = draft.payroll_id;

        h.service.save_draft(draft).unwrap();
        h.service.submit(id).unwrap();
        let paid = h.service.commit(id).unwrap();

        assert_eq!(paid.status, PayrollStatus::Paid);
        assert_eq!(h.ledger.credit_count(), 2);
    }

    /// CS-002: committing twice posts exactly once (idempotence)
    #[test]
    fn test_commit_is_idempotent() {
        let h = create_harness();
        let draft = create_draft(vec![create_child("stu_001", "5000")]);
        let id = draft.payroll_id;

        h.service.save_draft(draft).unwrap();
        h.service.submit(id).unwrap();

        let first = h.service.commit(id).unwrap();
        let second = h.service.commit(id).unwrap();

        assert_eq!(first.status, PayrollStatus::Paid);
        assert_eq!(second.status, PayrollStatus::Paid);
        assert_eq!(h.ledger.credit_count(), 1);
    }

    /// CS-003: zero deductions post nothing
    #[test]
    fn test_zero_deductions_post_nothing() {
        let h = create_harness();
        let draft = create_draft(vec![create_child("stu_001", "0")]);
        let id = draft.payroll_id;

        h.service.save_draft(draft).unwrap();
        h.service.submit(id).unwrap();
        h.service.commit(id).unwrap();

        assert_eq!(h.ledger.credit_count(), 0);
    }

    /// CS-004: ledger failure rolls back status and postings
    #[test]
    fn test_ledger_failure_rolls_back() {
        let h = create_harness();
        let draft = create_draft(vec![
            create_child("stu_001", "7894.74"),
            create_child("stu_002", "7105.26"),
        ]);
        let id = draft.payroll_id;

        h.service.save_draft(draft).unwrap();
        h.service.submit(id).unwrap();

        // The second posting fails after the first succeeded.
        h.ledger.set_failing_student(Some("stu_002"));
        let err = h.service.commit(id).unwrap_err();
        assert!(matches!(err, EngineError::LedgerPostingFailure { .. }));

        // Status is back to pending, no stray credits remain.
        assert_eq!(h.store.load(id).unwrap().status, PayrollStatus::Pending);
        assert_eq!(h.ledger.credit_count(), 0);

        // Retrying after the ledger recovers completes the commit.
        h.ledger.set_failing_student(None);
        let paid = h.service.commit(id).unwrap();
        assert_eq!(paid.status, PayrollStatus::Paid);
        assert_eq!(h.ledger.credit_count(), 2);
    }

    /// CS-005: commit on a draft is an invalid transition
    #[test]
    fn test_commit_on_draft_rejected() {
        let h = create_harness();
        let draft = create_draft(vec![]);
        let id = draft.payroll_id;
        h.service.save_draft(draft).unwrap();

        let err = h.service.commit(id).unwrap_err();
        assert!(matches!(
            err,
            EngineError::InvalidTransition {
                from: PayrollStatus::Draft,
                ..
            }
        ));
    }

    /// CS-006: commit on a cancelled record is AlreadyPaid
    #[test]
    fn test_commit_on_cancelled_rejected() {
        let h = create_harness();
        let draft = create_draft(vec![]);
        let id = draft.payroll_id;
        h.service.save_draft(draft).unwrap();
        h.service.cancel(id).unwrap();

        let err = h.service.commit(id).unwrap_err();
        assert!(matches!(
            err,
            EngineError::AlreadyPaid {
                status: PayrollStatus::Cancelled,
                ..
            }
        ));
    }

    /// CS-007: cancel works from draft and pending, not from paid
    #[test]
    fn test_cancel_transitions() {
        let h = create_harness();

        let draft = create_draft(vec![]);
        let draft_id = draft.payroll_id;
        h.service.save_draft(draft).unwrap();
        assert_eq!(
            h.service.cancel(draft_id).unwrap().status,
            PayrollStatus::Cancelled
        );

        let second = create_draft(vec![]);
        let second_id = second.payroll_id;
        h.service.save_draft(second).unwrap();
        h.service.submit(second_id).unwrap();
        assert_eq!(
            h.service.cancel(second_id).unwrap().status,
            PayrollStatus::Cancelled
        );

        let third = create_draft(vec![]);
        let third_id = third.payroll_id;
        h.service.save_draft(third).unwrap();
        h.service.submit(third_id).unwrap();
        h.service.commit(third_id).unwrap();
        assert!(h.service.cancel(third_id).is_err());
    }

    /// CS-008: cancelling then recomputing a fresh draft is allowed
    #[test]
    fn test_cancel_then_new_draft() {
        let h = create_harness();
        let draft = create_draft(vec![]);
        let id = draft.payroll_id;
        h.service.save_draft(draft).unwrap();
        h.service.submit(id).unwrap();
        h.service.cancel(id).unwrap();

        let fresh = create_draft(vec![]);
        assert!(h.service.save_draft(fresh).is_ok());
    }

    /// CS-009: submitting twice is rejected by the CAS
    #[test]
    fn test_double_submit_rejected() {
        let h = create_harness();
        let draft = create_draft(vec![]);
        let id = draft.payroll_id;
        h.service.save_draft(draft).unwrap();
        h.service.submit(id).unwrap();

        let err = h.service.submit(id).unwrap_err();
        assert!(matches!(
            err,
            EngineError::InvalidTransition {
                from: PayrollStatus::Pending,
                ..
            }
        ));
    }

    /// CS-010: concurrent commits serialize and post once
    #[test]
    fn test_concurrent_commits_post_once() {
        let h = create_harness();
        let draft = create_draft(vec![create_child("stu_001", "5000")]);
        let id = draft.payroll_id;
        h.service.save_draft(draft).unwrap();
        h.service.submit(id).unwrap();

        let service = Arc::new(h.service);
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let service = service.clone();
                std::thread::spawn(move || service.commit(id))
            })
            .collect();

        for handle in handles {
            let result = handle.join().expect("thread panicked");
            assert_eq!(result.unwrap().status, PayrollStatus::Paid);
        }
        assert_eq!(h.ledger.credit_count(), 1);
    }

    /// CS-011: saving a non-draft record is rejected
    #[test]
    fn test_save_non_draft_rejected() {
        let h = create_harness();
        let mut record = create_draft(vec![]);
        record.status = PayrollStatus::Pending;

        assert!(h.service.save_draft(record).is_err());
    }
}
