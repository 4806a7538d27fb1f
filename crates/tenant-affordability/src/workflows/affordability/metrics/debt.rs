use chrono::NaiveDate;

use super::stats::{round2, within_window};
use crate::workflows::affordability::classifier::TransactionClassifier;
use crate::workflows::affordability::config::ScoringThresholds;
use crate::workflows::affordability::domain::Transaction;

/// Enhanced DTI: average monthly debt service over the debt window as a percentage of income.
/// Not clamped above 100.
pub(crate) fn debt_to_income_ratio(
    transactions: &[Transaction],
    classifier: &TransactionClassifier,
    thresholds: &ScoringThresholds,
    average_monthly_income: f64,
    now: NaiveDate,
) -> f64 {
    if average_monthly_income <= 0.0 || thresholds.debt_window_months == 0 {
        return 0.0;
    }

    let debt_payments: Vec<f64> = transactions
        .iter()
        .filter(|t| within_window(t.made_on, now, thresholds.debt_window_months))
        .filter(|t| classifier.is_debt(t))
        .map(|t| t.amount.abs())
        .collect();

    if debt_payments.is_empty() {
        return 0.0;
    }

    let monthly_debt = debt_payments.iter().sum::<f64>() / thresholds.debt_window_months as f64;
    round2(monthly_debt / average_monthly_income * 100.0)
}
