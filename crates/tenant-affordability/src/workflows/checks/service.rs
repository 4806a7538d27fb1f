use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{debug, info, warn};

use super::domain::{ApplicantStatus, CheckId, CheckRecord};
use super::repository::{CheckRepository, RepositoryError};
use crate::workflows::affordability::{Account, AffordabilityEngine, Transaction};

/// Drives a check through its lifecycle and stores the report the engine produces for it.
pub struct AffordabilityCheckService<R> {
    repository: Arc<R>,
    engine: Arc<AffordabilityEngine>,
    sequence: AtomicU64,
}

impl<R> AffordabilityCheckService<R>
where
    R: CheckRepository + 'static,
{
    pub fn new(repository: Arc<R>, engine: Arc<AffordabilityEngine>) -> Self {
        Self {
            repository,
            engine,
            sequence: AtomicU64::new(1),
        }
    }

    pub fn engine(&self) -> &AffordabilityEngine {
        &self.engine
    }

    fn next_check_id(&self) -> CheckId {
        let id = self.sequence.fetch_add(1, Ordering::Relaxed);
        CheckId(format!("chk-{id:06}"))
    }

    /// Register a new applicant check in the pending state.
    pub fn open(&self, applicant_name: &str) -> Result<CheckRecord, CheckServiceError> {
        let applicant_name = applicant_name.trim();
        if applicant_name.is_empty() {
            return Err(CheckServiceError::MissingApplicantName);
        }

        let record = CheckRecord::pending(self.next_check_id(), applicant_name);
        let stored = self.repository.insert(record)?;
        info!(check_id = %stored.check_id, "affordability check opened");
        Ok(stored)
    }

    /// Mark that bank data collection has started. Repeating it while in progress is a no-op.
    pub fn begin(&self, check_id: &CheckId) -> Result<CheckRecord, CheckServiceError> {
        let record = self.transition(check_id, ApplicantStatus::InProgress, |record| {
            record.status = ApplicantStatus::InProgress;
        })?;
        info!(%check_id, status = record.status.label(), "affordability check started");
        Ok(record)
    }

    /// Score the supplied bank data and close the check with its report.
    pub fn complete(
        &self,
        check_id: &CheckId,
        transactions: &[Transaction],
        accounts: &[Account],
        now: NaiveDate,
    ) -> Result<CheckRecord, CheckServiceError> {
        let current = self.load(check_id)?;
        ensure_open(&current, ApplicantStatus::Complete)?;

        let report = self.engine.compute(transactions, accounts, now);
        let record = self.transition(check_id, ApplicantStatus::Complete, |record| {
            record.status = ApplicantStatus::Complete;
            record.report = Some(report.clone());
            record.completed_on = Some(now);
            record.failure_reason = None;
        })?;
        info!(
            %check_id,
            red_flags = report.red_flags().count(),
            summary = %report.summary(),
            "affordability check completed"
        );
        Ok(record)
    }

    /// Close the check without a report, e.g. when the bank connection could not be made.
    pub fn fail(&self, check_id: &CheckId, reason: &str) -> Result<CheckRecord, CheckServiceError> {
        let reason = match reason.trim() {
            "" => "unspecified",
            trimmed => trimmed,
        };
        let record = self.transition(check_id, ApplicantStatus::Failed, |record| {
            record.status = ApplicantStatus::Failed;
            record.failure_reason = Some(reason.to_string());
        })?;
        warn!(%check_id, reason = ?record.failure_reason, "affordability check failed");
        Ok(record)
    }

    /// Checks in id order, optionally only those in `status`.
    pub fn list(
        &self,
        status: Option<ApplicantStatus>,
    ) -> Result<Vec<CheckRecord>, CheckServiceError> {
        Ok(self.repository.list(status)?)
    }

    pub fn get(&self, check_id: &CheckId) -> Result<CheckRecord, CheckServiceError> {
        self.load(check_id)
    }

    fn load(&self, check_id: &CheckId) -> Result<CheckRecord, CheckServiceError> {
        let record = self
            .repository
            .fetch(check_id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(record)
    }

    /// Apply `change` to the freshest copy of the record and store it only if its status is
    /// still the one that was read. A lost race is retried against the new state.
    fn transition<F>(
        &self,
        check_id: &CheckId,
        to: ApplicantStatus,
        change: F,
    ) -> Result<CheckRecord, CheckServiceError>
    where
        F: Fn(&mut CheckRecord),
    {
        for _ in 0..MAX_TRANSITION_ATTEMPTS {
            let mut record = self.load(check_id)?;
            ensure_open(&record, to)?;
            if record.status == to {
                return Ok(record);
            }

            let expected = record.status;
            change(&mut record);
            match self.repository.update_if_status(expected, record.clone()) {
                Ok(()) => return Ok(record),
                Err(RepositoryError::StatusChanged { current }) => {
                    debug!(
                        %check_id,
                        expected = expected.label(),
                        current = current.label(),
                        "check changed underneath transition; retrying"
                    );
                }
                Err(err) => return Err(err.into()),
            }
        }

        Err(CheckServiceError::Contended {
            check_id: check_id.0.clone(),
        })
    }
}

const MAX_TRANSITION_ATTEMPTS: usize = 3;

fn ensure_open(record: &CheckRecord, to: ApplicantStatus) -> Result<(), CheckServiceError> {
    if record.status.is_terminal() {
        warn!(
            check_id = %record.check_id,
            from = record.status.label(),
            to = to.label(),
            "rejected affordability check transition"
        );
        return Err(CheckServiceError::InvalidTransition {
            check_id: record.check_id.0.clone(),
            from: record.status,
            to,
        });
    }
    Ok(())
}

#[derive(Debug, thiserror::Error)]
pub enum CheckServiceError {
    #[error("applicant name must not be empty")]
    MissingApplicantName,
    #[error("check {check_id} cannot move from {from} to {to}")]
    InvalidTransition {
        check_id: String,
        from: ApplicantStatus,
        to: ApplicantStatus,
    },
    #[error("check {check_id} kept changing while it was being updated")]
    Contended { check_id: String },
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
