use chrono::NaiveDate;

use crate::workflows::affordability::{
    AffordabilityEngine, ScoringConfig, ScoringThresholds, Transaction, TransactionClassifier,
};

pub(super) fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

/// Evaluation date shared by the scenarios below.
pub(super) fn now() -> NaiveDate {
    date(2025, 6, 15)
}

pub(super) fn tx(year: i32, month: u32, day: u32, description: &str, amount: f64) -> Transaction {
    Transaction::new(date(year, month, day), description, amount)
}

pub(super) fn engine() -> AffordabilityEngine {
    AffordabilityEngine::new(ScoringConfig::default())
}

pub(super) fn classifier() -> TransactionClassifier {
    TransactionClassifier::default()
}

pub(super) fn thresholds() -> ScoringThresholds {
    ScoringThresholds::default()
}

/// $2000 on the 1st of March, April and May: 6000 over 61 days, 2994.10 per month.
pub(super) fn monthly_salaries() -> Vec<Transaction> {
    vec![
        tx(2025, 3, 1, "ACME PAYROLL", 2000.0),
        tx(2025, 4, 1, "ACME PAYROLL", 2000.0),
        tx(2025, 5, 1, "ACME PAYROLL", 2000.0),
    ]
}

pub(super) const SALARY_AVERAGE: f64 = 2994.1;

pub(super) fn assert_two_decimals(value: f64) {
    assert!(value.is_finite(), "{value} is not finite");
    let rounded = (value * 100.0).round() / 100.0;
    assert!(
        (rounded - value).abs() < 1e-9,
        "{value} has more than two decimals"
    );
}
