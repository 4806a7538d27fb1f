//! Deterministic affordability scoring over an already-fetched batch of bank data.
//!
//! Every windowed computation takes an explicit `now`; nothing in this module reads the clock,
//! touches I/O, or holds shared state, so a single [`AffordabilityEngine`] can score any number
//! of applicants concurrently.

mod amount;
mod classifier;
pub mod composite;
mod config;
pub mod domain;
mod flags;
mod metrics;
mod report;

#[cfg(test)]
mod tests;

pub use amount::{deserialize_amount, normalize_amount};
pub use classifier::TransactionClassifier;
pub use config::{KeywordConfig, ScoringConfig, ScoringThresholds};
pub use domain::{Account, Classification, ClassifiedTransaction, Transaction};
pub use flags::{Flag, FlagCategory, FlagEvidence, FlagSeverity, FlagType};
pub use metrics::{CushionEstimate, IncomeAnalysis, MonthEndBalance};
pub use report::{AffordabilityEngine, AffordabilityReport, ReportBreakdown};
