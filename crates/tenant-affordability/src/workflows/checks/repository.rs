use super::domain::{ApplicantStatus, CheckId, CheckRecord};

/// Storage abstraction so the service can run against any backing store.
pub trait CheckRepository: Send + Sync {
    fn insert(&self, record: CheckRecord) -> Result<CheckRecord, RepositoryError>;

    /// Replace the stored record only while its status still equals `expected`. Implementations
    /// must perform the comparison and the write as one atomic step and answer
    /// [`RepositoryError::StatusChanged`] when another writer got there first.
    fn update_if_status(
        &self,
        expected: ApplicantStatus,
        record: CheckRecord,
    ) -> Result<(), RepositoryError>;

    fn fetch(&self, id: &CheckId) -> Result<Option<CheckRecord>, RepositoryError>;

    /// Every stored check, optionally narrowed to one status, ordered by check id.
    fn list(&self, status: Option<ApplicantStatus>) -> Result<Vec<CheckRecord>, RepositoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("record status changed to {current}")]
    StatusChanged { current: ApplicantStatus },
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
