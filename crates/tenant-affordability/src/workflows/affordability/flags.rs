use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use super::classifier::TransactionClassifier;
use super::config::ScoringThresholds;
use super::domain::Transaction;
use super::metrics::stats::{round2, within_window};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FlagType {
    ConsistentSavings,
    PaydayLoanUsage,
    HighGamblingSpend,
    FrequentOverdrafts,
}

impl FlagType {
    pub const fn code(self) -> &'static str {
        match self {
            FlagType::ConsistentSavings => "CONSISTENT_SAVINGS",
            FlagType::PaydayLoanUsage => "PAYDAY_LOAN_USAGE",
            FlagType::HighGamblingSpend => "HIGH_GAMBLING_SPEND",
            FlagType::FrequentOverdrafts => "FREQUENT_OVERDRAFTS",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlagSeverity {
    Low,
    Medium,
    High,
    Positive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlagCategory {
    Red,
    Green,
}

/// Transaction excerpt backing a flag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlagEvidence {
    pub date: NaiveDate,
    pub description: String,
    pub amount: f64,
}

impl From<&Transaction> for FlagEvidence {
    fn from(transaction: &Transaction) -> Self {
        Self {
            date: transaction.made_on,
            description: transaction.description.clone(),
            amount: round2(transaction.amount),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flag {
    #[serde(rename = "type")]
    pub flag_type: FlagType,
    pub severity: FlagSeverity,
    pub category: FlagCategory,
    pub description: String,
    pub evidence: Vec<FlagEvidence>,
}

impl Flag {
    pub fn is_red(&self) -> bool {
        self.category == FlagCategory::Red
    }
}

pub(crate) fn generate_flags(
    transactions: &[Transaction],
    classifier: &TransactionClassifier,
    thresholds: &ScoringThresholds,
    average_monthly_income: f64,
    savings_rate: f64,
    now: NaiveDate,
) -> Vec<Flag> {
    let mut flags = Vec::new();

    if savings_rate > thresholds.consistent_savings_rate_pct {
        flags.push(Flag {
            flag_type: FlagType::ConsistentSavings,
            severity: FlagSeverity::Positive,
            category: FlagCategory::Green,
            description: format!(
                "Moves {savings_rate:.2}% of monthly income out shortly after each pay date"
            ),
            evidence: Vec::new(),
        });
    }

    flags.extend(payday_loan_flag(transactions, classifier));
    flags.extend(gambling_flag(
        transactions,
        classifier,
        thresholds,
        average_monthly_income,
    ));
    flags.extend(overdraft_flag(transactions, classifier, thresholds, now));

    flags
}

fn payday_loan_flag(transactions: &[Transaction], classifier: &TransactionClassifier) -> Option<Flag> {
    let matches = sorted_evidence(
        transactions
            .iter()
            .filter(|t| classifier.is_payday_lender(t)),
    );
    if matches.is_empty() {
        return None;
    }

    Some(Flag {
        flag_type: FlagType::PaydayLoanUsage,
        severity: FlagSeverity::High,
        category: FlagCategory::Red,
        description: format!(
            "{} transaction(s) with payday or high-cost lenders",
            matches.len()
        ),
        evidence: matches,
    })
}

fn gambling_flag(
    transactions: &[Transaction],
    classifier: &TransactionClassifier,
    thresholds: &ScoringThresholds,
    average_monthly_income: f64,
) -> Option<Flag> {
    let mut by_month: BTreeMap<(i32, u32), Vec<&Transaction>> = BTreeMap::new();
    for transaction in transactions
        .iter()
        .filter(|t| t.is_outflow() && classifier.is_gambling(t))
    {
        let key = (transaction.made_on.year(), transaction.made_on.month());
        by_month.entry(key).or_default().push(transaction);
    }

    let limit = average_monthly_income * thresholds.gambling_income_share_pct / 100.0;
    let ((year, month), spend, entries) = by_month.into_iter().find_map(|(key, entries)| {
        let spend: f64 = entries.iter().map(|t| t.amount.abs()).sum();
        (spend > limit).then_some((key, spend, entries))
    })?;

    Some(Flag {
        flag_type: FlagType::HighGamblingSpend,
        severity: FlagSeverity::High,
        category: FlagCategory::Red,
        description: format!(
            "Gambling spend of {spend:.2} in {year}-{month:02} exceeds {:.0}% of monthly income",
            thresholds.gambling_income_share_pct
        ),
        evidence: sorted_evidence(entries.into_iter()),
    })
}

fn overdraft_flag(
    transactions: &[Transaction],
    classifier: &TransactionClassifier,
    thresholds: &ScoringThresholds,
    now: NaiveDate,
) -> Option<Flag> {
    let matches = sorted_evidence(
        transactions
            .iter()
            .filter(|t| within_window(t.made_on, now, thresholds.overdraft_window_months))
            .filter(|t| classifier.is_overdraft(t)),
    );
    if matches.len() <= thresholds.max_overdrafts {
        return None;
    }

    Some(Flag {
        flag_type: FlagType::FrequentOverdrafts,
        severity: FlagSeverity::Medium,
        category: FlagCategory::Red,
        description: format!(
            "{} overdraft or penalty charges in the last {} months",
            matches.len(),
            thresholds.overdraft_window_months
        ),
        evidence: matches,
    })
}

fn sorted_evidence<'a>(matches: impl Iterator<Item = &'a Transaction>) -> Vec<FlagEvidence> {
    let mut evidence: Vec<FlagEvidence> = matches.map(FlagEvidence::from).collect();
    evidence.sort_by_key(|entry| entry.date);
    evidence
}
