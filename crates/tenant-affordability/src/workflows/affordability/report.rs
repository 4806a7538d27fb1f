use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::classifier::TransactionClassifier;
use super::config::{ScoringConfig, ScoringThresholds};
use super::domain::{Account, ClassifiedTransaction, Transaction};
use super::flags::{generate_flags, Flag};
use super::metrics::{
    analyze_income, behavioral_savings_rate, debt_to_income_ratio, estimate_cushion,
    CushionEstimate,
};

/// Affordability metrics for one applicant at one point in time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AffordabilityReport {
    pub income_stability_score: f64,
    pub average_monthly_income: f64,
    pub enhanced_dti_ratio: f64,
    pub behavioral_savings_rate: f64,
    pub financial_cushion_months: f64,
    pub flags: Vec<Flag>,
}

impl AffordabilityReport {
    pub fn empty() -> Self {
        Self {
            income_stability_score: 0.0,
            average_monthly_income: 0.0,
            enhanced_dti_ratio: 0.0,
            behavioral_savings_rate: 0.0,
            financial_cushion_months: 0.0,
            flags: Vec::new(),
        }
    }

    pub fn red_flags(&self) -> impl Iterator<Item = &Flag> {
        self.flags.iter().filter(|flag| flag.is_red())
    }

    pub fn summary(&self) -> String {
        let red = self.red_flags().count();
        format!(
            "stability {:.2}/100, income {:.2}/month, DTI {:.2}%, savings {:.2}%, cushion {:.2} months, {} red flag(s)",
            self.income_stability_score,
            self.average_monthly_income,
            self.enhanced_dti_ratio,
            self.behavioral_savings_rate,
            self.financial_cushion_months,
            red
        )
    }
}

/// The report together with the intermediate figures it was built from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportBreakdown {
    pub report: AffordabilityReport,
    pub income_transaction_count: usize,
    pub first_income_on: Option<NaiveDate>,
    pub last_income_on: Option<NaiveDate>,
    pub cushion: CushionEstimate,
}

/// Stateless scorer holding the classifier and thresholds it was configured with.
#[derive(Debug, Clone)]
pub struct AffordabilityEngine {
    classifier: TransactionClassifier,
    thresholds: ScoringThresholds,
}

impl AffordabilityEngine {
    pub fn new(config: ScoringConfig) -> Self {
        Self {
            classifier: TransactionClassifier::new(&config.keywords),
            thresholds: config.thresholds,
        }
    }

    pub fn classifier(&self) -> &TransactionClassifier {
        &self.classifier
    }

    pub fn compute(
        &self,
        transactions: &[Transaction],
        accounts: &[Account],
        now: NaiveDate,
    ) -> AffordabilityReport {
        self.assess(transactions, accounts, now).report
    }

    pub fn assess(
        &self,
        transactions: &[Transaction],
        accounts: &[Account],
        now: NaiveDate,
    ) -> ReportBreakdown {
        let income = analyze_income(transactions, &self.classifier, &self.thresholds, now);
        let enhanced_dti_ratio = debt_to_income_ratio(
            transactions,
            &self.classifier,
            &self.thresholds,
            income.average_monthly_income,
            now,
        );
        let behavioral_savings_rate = behavioral_savings_rate(
            transactions,
            &income.income_transactions,
            &self.classifier,
            &self.thresholds,
            income.average_monthly_income,
        );
        let cushion = estimate_cushion(
            transactions,
            accounts,
            &self.classifier,
            &self.thresholds,
            now,
        );
        let flags = generate_flags(
            transactions,
            &self.classifier,
            &self.thresholds,
            income.average_monthly_income,
            behavioral_savings_rate,
            now,
        );

        let report = AffordabilityReport {
            income_stability_score: income.stability_score,
            average_monthly_income: income.average_monthly_income,
            enhanced_dti_ratio,
            behavioral_savings_rate,
            financial_cushion_months: cushion.cushion_months,
            flags,
        };

        debug!(
            %now,
            transactions = transactions.len(),
            accounts = accounts.len(),
            income_events = income.income_transactions.len(),
            flags = report.flags.len(),
            "affordability report computed"
        );

        ReportBreakdown {
            income_transaction_count: income.income_transactions.len(),
            first_income_on: income.first_income_on(),
            last_income_on: income.last_income_on(),
            report,
            cushion,
        }
    }

    pub fn classify(&self, transactions: &[Transaction]) -> Vec<ClassifiedTransaction> {
        self.classifier.classify_all(transactions)
    }
}

impl Default for AffordabilityEngine {
    fn default() -> Self {
        Self::new(ScoringConfig::default())
    }
}
