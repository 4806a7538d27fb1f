use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::workflows::affordability::AffordabilityReport;

/// Identifier wrapper for affordability checks.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CheckId(pub String);

impl fmt::Display for CheckId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicantStatus {
    Pending,
    InProgress,
    Complete,
    Failed,
}

impl ApplicantStatus {
    pub const fn label(self) -> &'static str {
        match self {
            ApplicantStatus::Pending => "pending",
            ApplicantStatus::InProgress => "in_progress",
            ApplicantStatus::Complete => "complete",
            ApplicantStatus::Failed => "failed",
        }
    }

    /// Complete and failed checks accept no further transitions.
    pub const fn is_terminal(self) -> bool {
        matches!(self, ApplicantStatus::Complete | ApplicantStatus::Failed)
    }
}

impl fmt::Display for ApplicantStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckRecord {
    pub check_id: CheckId,
    pub applicant_name: String,
    pub status: ApplicantStatus,
    pub report: Option<AffordabilityReport>,
    pub completed_on: Option<NaiveDate>,
    pub failure_reason: Option<String>,
}

impl CheckRecord {
    pub fn pending(check_id: CheckId, applicant_name: impl Into<String>) -> Self {
        Self {
            check_id,
            applicant_name: applicant_name.into(),
            status: ApplicantStatus::Pending,
            report: None,
            completed_on: None,
            failure_reason: None,
        }
    }

    pub fn status_view(&self) -> CheckStatusView {
        CheckStatusView {
            check_id: self.check_id.clone(),
            applicant_name: self.applicant_name.clone(),
            status: self.status.label(),
            completed_on: self.completed_on,
            failure_reason: self.failure_reason.clone(),
            report: self.report.clone(),
        }
    }

    pub fn summary(&self) -> CheckSummary {
        CheckSummary {
            check_id: self.check_id.clone(),
            applicant_name: self.applicant_name.clone(),
            status: self.status.label(),
        }
    }
}

/// Shape returned by the HTTP routes.
#[derive(Debug, Clone, Serialize)]
pub struct CheckStatusView {
    pub check_id: CheckId,
    pub applicant_name: String,
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_on: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure_reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<AffordabilityReport>,
}

/// One row of the check listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckSummary {
    pub check_id: CheckId,
    pub applicant_name: String,
    pub status: &'static str,
}
