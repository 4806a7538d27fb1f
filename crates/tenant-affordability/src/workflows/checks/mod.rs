//! Affordability check lifecycle: open a check for an applicant, attach their bank data, and
//! keep the resulting report alongside the check's status.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{ApplicantStatus, CheckId, CheckRecord, CheckStatusView, CheckSummary};
pub use repository::{CheckRepository, RepositoryError};
pub use router::check_router;
pub use service::{AffordabilityCheckService, CheckServiceError};
