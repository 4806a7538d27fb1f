use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::NaiveDate;
use serde_json::Value;

use crate::workflows::affordability::{Account, AffordabilityEngine, Transaction};
use crate::workflows::checks::domain::{ApplicantStatus, CheckId, CheckRecord};
use crate::workflows::checks::repository::{CheckRepository, RepositoryError};
use crate::workflows::checks::{check_router, AffordabilityCheckService};

pub(super) fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

pub(super) fn evaluated_on() -> NaiveDate {
    date(2025, 6, 15)
}

/// Three monthly salaries with a savings transfer after each and one payday loan.
pub(super) fn bank_data() -> (Vec<Transaction>, Vec<Account>) {
    let mut transactions = Vec::new();
    for month in 3..=5 {
        transactions.push(
            Transaction::new(date(2025, month, 1), "ACME PAYROLL", 2000.0).on_account("acc-1"),
        );
        transactions.push(
            Transaction::new(date(2025, month, 2), "Move to vault", -400.0).on_account("acc-1"),
        );
    }
    transactions.push(
        Transaction::new(date(2025, 5, 20), "Provident Financial", -75.0).on_account("acc-1"),
    );
    (transactions, vec![Account::new("acc-1", 1500.0)])
}

pub(super) fn build_service() -> (
    AffordabilityCheckService<MemoryRepository>,
    Arc<MemoryRepository>,
) {
    let repository = Arc::new(MemoryRepository::default());
    let service =
        AffordabilityCheckService::new(repository.clone(), Arc::new(AffordabilityEngine::default()));
    (service, repository)
}

pub(super) fn check_router_with_service(
    service: AffordabilityCheckService<MemoryRepository>,
) -> axum::Router {
    check_router(Arc::new(service))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    pub(super) records: Arc<Mutex<HashMap<CheckId, CheckRecord>>>,
}

impl MemoryRepository {
    pub(super) fn stored(&self, id: &CheckId) -> Option<CheckRecord> {
        self.records
            .lock()
            .expect("repository mutex poisoned")
            .get(id)
            .cloned()
    }
}

impl CheckRepository for MemoryRepository {
    fn insert(&self, record: CheckRecord) -> Result<CheckRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&record.check_id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.check_id.clone(), record.clone());
        Ok(record)
    }

    fn update_if_status(
        &self,
        expected: ApplicantStatus,
        record: CheckRecord,
    ) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        let stored = guard
            .get_mut(&record.check_id)
            .ok_or(RepositoryError::NotFound)?;
        if stored.status != expected {
            return Err(RepositoryError::StatusChanged {
                current: stored.status,
            });
        }
        *stored = record;
        Ok(())
    }

    fn fetch(&self, id: &CheckId) -> Result<Option<CheckRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn list(&self, status: Option<ApplicantStatus>) -> Result<Vec<CheckRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        let mut records: Vec<CheckRecord> = guard
            .values()
            .filter(|record| status.map_or(true, |status| record.status == status))
            .cloned()
            .collect();
        records.sort_by(|a, b| a.check_id.0.cmp(&b.check_id.0));
        Ok(records)
    }
}

/// Answers fetches with queued outdated copies of a record, as if a concurrent writer had
/// moved the check after they were read. Behaves like [`MemoryRepository`] once drained.
#[derive(Default, Clone)]
pub(super) struct StaleSnapshotRepository {
    pub(super) inner: MemoryRepository,
    snapshots: Arc<Mutex<VecDeque<CheckRecord>>>,
}

impl StaleSnapshotRepository {
    pub(super) fn serve_once(&self, snapshot: CheckRecord) {
        self.snapshots
            .lock()
            .expect("snapshot mutex poisoned")
            .push_back(snapshot);
    }
}

impl CheckRepository for StaleSnapshotRepository {
    fn insert(&self, record: CheckRecord) -> Result<CheckRecord, RepositoryError> {
        self.inner.insert(record)
    }

    fn update_if_status(
        &self,
        expected: ApplicantStatus,
        record: CheckRecord,
    ) -> Result<(), RepositoryError> {
        self.inner.update_if_status(expected, record)
    }

    fn fetch(&self, id: &CheckId) -> Result<Option<CheckRecord>, RepositoryError> {
        let stale = self
            .snapshots
            .lock()
            .expect("snapshot mutex poisoned")
            .pop_front();
        match stale {
            Some(record) if &record.check_id == id => Ok(Some(record)),
            _ => self.inner.fetch(id),
        }
    }

    fn list(&self, status: Option<ApplicantStatus>) -> Result<Vec<CheckRecord>, RepositoryError> {
        self.inner.list(status)
    }
}

pub(super) struct ConflictRepository;

impl CheckRepository for ConflictRepository {
    fn insert(&self, _record: CheckRecord) -> Result<CheckRecord, RepositoryError> {
        Err(RepositoryError::Conflict)
    }

    fn update_if_status(
        &self,
        _expected: ApplicantStatus,
        _record: CheckRecord,
    ) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("read only".to_string()))
    }

    fn fetch(&self, _id: &CheckId) -> Result<Option<CheckRecord>, RepositoryError> {
        Ok(None)
    }

    fn list(&self, _status: Option<ApplicantStatus>) -> Result<Vec<CheckRecord>, RepositoryError> {
        Ok(Vec::new())
    }
}

pub(super) struct UnavailableRepository;

impl CheckRepository for UnavailableRepository {
    fn insert(&self, _record: CheckRecord) -> Result<CheckRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update_if_status(
        &self,
        _expected: ApplicantStatus,
        _record: CheckRecord,
    ) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &CheckId) -> Result<Option<CheckRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn list(&self, _status: Option<ApplicantStatus>) -> Result<Vec<CheckRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}
