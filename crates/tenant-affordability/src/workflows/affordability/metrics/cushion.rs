use std::collections::HashMap;

use chrono::NaiveDate;
use serde::Serialize;

use super::stats::{month_end_boundaries, round2, within_window};
use crate::workflows::affordability::classifier::TransactionClassifier;
use crate::workflows::affordability::config::ScoringThresholds;
use crate::workflows::affordability::domain::{Account, Transaction};

/// Reconstructed total balance across all accounts at a month end.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthEndBalance {
    pub month_end: NaiveDate,
    pub balance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CushionEstimate {
    pub monthly_burn_rate: f64,
    pub baseline_buffer: f64,
    /// Most recent month end first.
    pub month_end_balances: Vec<MonthEndBalance>,
    pub cushion_months: f64,
}

pub(crate) fn estimate_cushion(
    transactions: &[Transaction],
    accounts: &[Account],
    classifier: &TransactionClassifier,
    thresholds: &ScoringThresholds,
    now: NaiveDate,
) -> CushionEstimate {
    let window_months = thresholds.cushion_window_months;
    let burn_total: f64 = transactions
        .iter()
        .filter(|t| within_window(t.made_on, now, window_months))
        .filter(|t| classifier.is_essential_burn(t))
        .map(|t| t.amount.abs())
        .sum();
    let monthly_burn_rate = if window_months == 0 {
        0.0
    } else {
        burn_total / window_months as f64
    };

    let boundaries = month_end_boundaries(now, window_months);
    let month_end_balances = reconstruct_month_ends(transactions, accounts, &boundaries, now);
    let baseline_buffer = if month_end_balances.is_empty() {
        0.0
    } else {
        month_end_balances.iter().map(|entry| entry.balance).sum::<f64>()
            / month_end_balances.len() as f64
    };

    let cushion_months = if monthly_burn_rate > 0.0 {
        round2(baseline_buffer / monthly_burn_rate)
    } else {
        0.0
    };

    CushionEstimate {
        monthly_burn_rate: round2(monthly_burn_rate),
        baseline_buffer: round2(baseline_buffer),
        month_end_balances: month_end_balances
            .into_iter()
            .map(|entry| MonthEndBalance {
                balance: round2(entry.balance),
                ..entry
            })
            .collect(),
        cushion_months,
    }
}

/// Replays each account backwards from its current balance, reversing every transaction dated
/// after a boundary. One pass per account over its transactions sorted newest first.
fn reconstruct_month_ends(
    transactions: &[Transaction],
    accounts: &[Account],
    boundaries: &[NaiveDate],
    now: NaiveDate,
) -> Vec<MonthEndBalance> {
    let Some(&oldest_boundary) = boundaries.last() else {
        return Vec::new();
    };

    let mut by_account: HashMap<&str, Vec<&Transaction>> = HashMap::new();
    for transaction in transactions {
        if transaction.made_on <= oldest_boundary || transaction.made_on > now {
            continue;
        }
        if let Some(account_id) = transaction.account_id.as_deref() {
            by_account.entry(account_id).or_default().push(transaction);
        }
    }
    for entries in by_account.values_mut() {
        entries.sort_by(|a, b| b.made_on.cmp(&a.made_on));
    }

    let mut totals = vec![0.0_f64; boundaries.len()];
    for account in accounts {
        let history = by_account
            .get(account.id.as_str())
            .map(Vec::as_slice)
            .unwrap_or(&[]);
        let mut replay = history.iter().peekable();
        let mut balance = account.current_balance;

        for (slot, boundary) in boundaries.iter().enumerate() {
            while let Some(transaction) = replay.next_if(|t| t.made_on > *boundary) {
                balance -= transaction.amount;
            }
            totals[slot] += balance;
        }
    }

    boundaries
        .iter()
        .zip(totals)
        .map(|(&month_end, balance)| MonthEndBalance { month_end, balance })
        .collect()
}
