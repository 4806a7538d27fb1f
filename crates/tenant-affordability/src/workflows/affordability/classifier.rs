use super::config::KeywordConfig;
use super::domain::{Classification, ClassifiedTransaction, Transaction};

/// Immutable keyword matcher built once from a [`KeywordConfig`].
#[derive(Debug, Clone)]
pub struct TransactionClassifier {
    income_keywords: Vec<String>,
    income_categories: Vec<String>,
    debt_keywords: Vec<String>,
    financial_institutions: Vec<String>,
    essential_burn_keywords: Vec<String>,
    payday_lenders: Vec<String>,
    gambling_merchants: Vec<String>,
    overdraft_keywords: Vec<String>,
}

impl TransactionClassifier {
    pub fn new(keywords: &KeywordConfig) -> Self {
        Self {
            income_keywords: lowered(&keywords.income_keywords),
            income_categories: lowered(&keywords.income_categories),
            debt_keywords: lowered(&keywords.debt_keywords),
            financial_institutions: lowered(&keywords.financial_institutions),
            essential_burn_keywords: lowered(&keywords.essential_burn_keywords),
            payday_lenders: lowered(&keywords.payday_lenders),
            gambling_merchants: lowered(&keywords.gambling_merchants),
            overdraft_keywords: lowered(&keywords.overdraft_keywords),
        }
    }

    pub fn is_income(&self, transaction: &Transaction) -> bool {
        if !transaction.is_inflow() {
            return false;
        }

        let category_match = transaction
            .category
            .as_deref()
            .map(|category| {
                let category = category.trim().to_lowercase();
                self.income_categories.iter().any(|known| *known == category)
            })
            .unwrap_or(false);

        category_match || contains_any(&transaction.description, &self.income_keywords)
    }

    pub fn is_debt(&self, transaction: &Transaction) -> bool {
        transaction.is_outflow() && self.describes_debt(&transaction.description)
    }

    pub fn is_essential_burn(&self, transaction: &Transaction) -> bool {
        transaction.is_outflow()
            && contains_any(&transaction.description, &self.essential_burn_keywords)
    }

    /// Outflows that are neither debt service nor living costs.
    pub fn is_savings_candidate(&self, transaction: &Transaction) -> bool {
        transaction.is_outflow()
            && !self.describes_debt(&transaction.description)
            && !contains_any(&transaction.description, &self.essential_burn_keywords)
    }

    pub fn is_payday_lender(&self, transaction: &Transaction) -> bool {
        contains_any(&transaction.description, &self.payday_lenders)
    }

    pub fn is_gambling(&self, transaction: &Transaction) -> bool {
        contains_any(&transaction.description, &self.gambling_merchants)
    }

    pub fn is_overdraft(&self, transaction: &Transaction) -> bool {
        contains_any(&transaction.description, &self.overdraft_keywords)
    }

    pub fn classify(&self, transaction: &Transaction) -> Classification {
        if self.is_income(transaction) {
            Classification::Income
        } else if self.is_debt(transaction) {
            Classification::Debt
        } else if self.is_essential_burn(transaction) {
            Classification::EssentialBurn
        } else {
            Classification::Unclassified
        }
    }

    pub fn classify_all(&self, transactions: &[Transaction]) -> Vec<ClassifiedTransaction> {
        transactions
            .iter()
            .map(|transaction| ClassifiedTransaction {
                transaction: transaction.clone(),
                classification: self.classify(transaction),
            })
            .collect()
    }

    fn describes_debt(&self, description: &str) -> bool {
        contains_any(description, &self.debt_keywords)
            || contains_any(description, &self.financial_institutions)
    }
}

impl Default for TransactionClassifier {
    fn default() -> Self {
        Self::new(&KeywordConfig::default())
    }
}

fn lowered(values: &[String]) -> Vec<String> {
    values
        .iter()
        .map(|value| value.trim().to_lowercase())
        .filter(|value| !value.is_empty())
        .collect()
}

fn contains_any(description: &str, needles: &[String]) -> bool {
    if needles.is_empty() || description.is_empty() {
        return false;
    }
    let haystack = description.to_lowercase();
    needles.iter().any(|needle| haystack.contains(needle.as_str()))
}
