use std::collections::BTreeSet;

use chrono::{Duration, NaiveDate};

use super::stats::{months_between, round2};
use crate::workflows::affordability::classifier::TransactionClassifier;
use crate::workflows::affordability::config::ScoringThresholds;
use crate::workflows::affordability::domain::Transaction;

/// Money leaving the account within a few days after each pay date, excluding bills and debt
/// service, as a percentage of average monthly income.
pub(crate) fn behavioral_savings_rate(
    transactions: &[Transaction],
    income_transactions: &[&Transaction],
    classifier: &TransactionClassifier,
    thresholds: &ScoringThresholds,
    average_monthly_income: f64,
) -> f64 {
    if average_monthly_income <= 0.0 {
        return 0.0;
    }

    let income_dates: BTreeSet<NaiveDate> =
        income_transactions.iter().map(|t| t.made_on).collect();
    let (Some(&first), Some(&last)) = (income_dates.first(), income_dates.last()) else {
        return 0.0;
    };

    let mut candidates: Vec<&Transaction> = transactions
        .iter()
        .filter(|t| classifier.is_savings_candidate(t))
        .collect();
    candidates.sort_by_key(|t| t.made_on);

    let window = Duration::days(thresholds.savings_window_days.max(0));
    let total_savings: f64 = income_dates
        .iter()
        .map(|&paid_on| {
            let window_end = paid_on.checked_add_signed(window).unwrap_or(NaiveDate::MAX);
            let start = candidates.partition_point(|t| t.made_on <= paid_on);
            candidates[start..]
                .iter()
                .take_while(|t| t.made_on <= window_end)
                .map(|t| t.amount.abs())
                .sum::<f64>()
        })
        .sum();

    // Inclusive of the first pay month.
    let months = months_between(first, last, thresholds.days_per_month) + 1.0;
    let monthly_savings = total_savings / months;
    round2(monthly_savings / average_monthly_income * 100.0)
}
