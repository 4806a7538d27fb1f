use metrics_exporter_prometheus::PrometheusHandle;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard};
use tenant_affordability::error::AppError;
use tenant_affordability::workflows::affordability::{Account, AffordabilityEngine, Transaction};
use tenant_affordability::workflows::checks::{
    ApplicantStatus, CheckId, CheckRecord, CheckRepository, RepositoryError,
};
use tenant_affordability::workflows::import::TransactionCsvImporter;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) engine: Arc<AffordabilityEngine>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryCheckRepository {
    records: Arc<Mutex<HashMap<CheckId, CheckRecord>>>,
}

impl InMemoryCheckRepository {
    fn records(&self) -> Result<MutexGuard<'_, HashMap<CheckId, CheckRecord>>, RepositoryError> {
        self.records
            .lock()
            .map_err(|_| RepositoryError::Unavailable("check store lock poisoned".to_string()))
    }
}

impl CheckRepository for InMemoryCheckRepository {
    fn insert(&self, record: CheckRecord) -> Result<CheckRecord, RepositoryError> {
        let mut guard = self.records()?;
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
        let mut guard = self.records()?;
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
        Ok(self.records()?.get(id).cloned())
    }

    fn list(&self, status: Option<ApplicantStatus>) -> Result<Vec<CheckRecord>, RepositoryError> {
        let guard = self.records()?;
        let mut records: Vec<CheckRecord> = guard
            .values()
            .filter(|record| status.map_or(true, |status| record.status == status))
            .cloned()
            .collect();
        records.sort_by(|a, b| a.check_id.0.cmp(&b.check_id.0));
        Ok(records)
    }
}

/// Load transactions from a CSV export, or a JSON array when the file ends in `.json`.
pub(crate) fn load_transactions(path: &Path) -> Result<Vec<Transaction>, AppError> {
    if has_json_extension(path) {
        return read_json(path);
    }
    Ok(TransactionCsvImporter::from_path(path)?)
}

pub(crate) fn load_accounts(path: &Path) -> Result<Vec<Account>, AppError> {
    read_json(path)
}

fn has_json_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("json"))
        .unwrap_or(false)
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, AppError> {
    let raw = std::fs::read_to_string(path)?;
    serde_json::from_str(&raw).map_err(|err| {
        AppError::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!("{}: {err}", path.display()),
        ))
    })
}
