use chrono::NaiveDate;

use super::stats::{mean, months_between, round2, sample_std_dev, within_window};
use crate::workflows::affordability::classifier::TransactionClassifier;
use crate::workflows::affordability::config::ScoringThresholds;
use crate::workflows::affordability::domain::Transaction;

/// Income stability metrics plus the income events they were derived from.
#[derive(Debug, Clone, PartialEq)]
pub struct IncomeAnalysis<'a> {
    pub stability_score: f64,
    pub average_monthly_income: f64,
    /// Income transactions in the trailing window, oldest first.
    pub income_transactions: Vec<&'a Transaction>,
}

impl IncomeAnalysis<'_> {
    pub fn first_income_on(&self) -> Option<NaiveDate> {
        self.income_transactions.first().map(|t| t.made_on)
    }

    pub fn last_income_on(&self) -> Option<NaiveDate> {
        self.income_transactions.last().map(|t| t.made_on)
    }
}

pub(crate) fn analyze_income<'a>(
    transactions: &'a [Transaction],
    classifier: &TransactionClassifier,
    thresholds: &ScoringThresholds,
    now: NaiveDate,
) -> IncomeAnalysis<'a> {
    let mut income_transactions: Vec<&Transaction> = transactions
        .iter()
        .filter(|t| within_window(t.made_on, now, thresholds.income_window_months))
        .filter(|t| classifier.is_income(t))
        .collect();
    income_transactions.sort_by_key(|t| t.made_on);

    if income_transactions.len() < 2 {
        return IncomeAnalysis {
            stability_score: 0.0,
            average_monthly_income: 0.0,
            income_transactions,
        };
    }

    let amounts: Vec<f64> = income_transactions.iter().map(|t| t.amount).collect();
    let mean_income = mean(&amounts);
    let coefficient_of_variation = if mean_income > 0.0 {
        sample_std_dev(&amounts) / mean_income
    } else {
        1.0
    };
    let amount_stability = 1.0 - coefficient_of_variation.min(1.0);

    let gaps: Vec<f64> = income_transactions
        .windows(2)
        .map(|pair| (pair[1].made_on - pair[0].made_on).num_days() as f64)
        .collect();
    let frequency_stability = if thresholds.frequency_reference_days > 0.0 {
        (1.0 - sample_std_dev(&gaps) / thresholds.frequency_reference_days).max(0.0)
    } else {
        0.0
    };

    let raw_score = (amount_stability * thresholds.amount_stability_weight
        + frequency_stability * thresholds.frequency_stability_weight)
        * 100.0;
    let stability_score = round2(raw_score.clamp(0.0, 100.0));

    let total_income: f64 = amounts.iter().sum();
    let (first, last) = (
        income_transactions[0].made_on,
        income_transactions[income_transactions.len() - 1].made_on,
    );
    let months = months_between(first, last, thresholds.days_per_month);
    let average_monthly_income = if months > 0.0 {
        total_income / months
    } else {
        total_income
    };
    let average_monthly_income = round2(average_monthly_income).max(0.0);

    IncomeAnalysis {
        stability_score,
        average_monthly_income,
        income_transactions,
    }
}
