use serde::{Deserialize, Serialize};

/// Keyword lists and thresholds driving classification and the flag rules.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub keywords: KeywordConfig,
    pub thresholds: ScoringThresholds,
}

/// Case-insensitive substring lists. Entries are lowercased when a classifier is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeywordConfig {
    pub income_keywords: Vec<String>,
    pub income_categories: Vec<String>,
    pub debt_keywords: Vec<String>,
    pub financial_institutions: Vec<String>,
    pub essential_burn_keywords: Vec<String>,
    pub payday_lenders: Vec<String>,
    pub gambling_merchants: Vec<String>,
    pub overdraft_keywords: Vec<String>,
}

impl Default for KeywordConfig {
    fn default() -> Self {
        Self {
            income_keywords: owned(&[
                "salariu",
                "salary",
                "payroll",
                "wages",
                "virament",
                "incasare",
                "venituri",
                "plata",
                "transfer",
                "dividende",
                "dividend",
                "bonus",
                "comision",
                "onorariu",
                "chirie",
                "alocatie",
                "pensii",
                "pension",
                "indemnizatie",
                "subventie",
                "benefit",
            ]),
            income_categories: owned(&[
                "salary",
                "income",
                "wages",
                "pension",
                "government benefits",
            ]),
            debt_keywords: owned(&[
                "rata",
                "rate",
                "credit",
                "imprumut",
                "leasing",
                "rambursare",
                "rambursari",
                "dobanda",
                "dobanzi",
                "finantare",
                "finantari",
                "ipoteca",
                "ipoteci",
                "loan",
                "mortgage",
                "repayment",
                "installment",
            ]),
            financial_institutions: owned(&[
                "bcr",
                "brd",
                "banca transilvania",
                "ing bank",
                "raiffeisen bank",
                "cec bank",
                "unicredit bank",
                "ocean credit",
                "icredit romania",
                "viva credit ifn",
                "provident",
            ]),
            essential_burn_keywords: owned(&[
                "rent",
                "chirie",
                "utilit",
                "electric",
                "water",
                "enel",
                "engie",
                "e.on",
                "grocer",
                "supermarket",
                "kaufland",
                "lidl",
                "carrefour",
                "mega image",
                "insurance",
                "asigurare",
                "transit",
                "metrorex",
                "transport",
            ]),
            payday_lenders: owned(&[
                "provident",
                "ferratum",
                "viva credit",
                "icredit",
                "ocean credit",
                "credius",
                "wonga",
                "quickquid",
                "cashnetusa",
                "speedy cash",
                "check into cash",
                "advance america",
                "moneymart",
            ]),
            gambling_merchants: owned(&[
                "superbet",
                "betano",
                "casa pariurilor",
                "maxbet",
                "fortuna",
                "netbet",
                "unibet",
                "bet365",
                "betfair",
                "pokerstars",
                "william hill",
                "paddy power",
                "draftkings",
                "fanduel",
                "casino",
                "loteria romana",
            ]),
            overdraft_keywords: owned(&[
                "overdraft",
                "descoperit de cont",
                "insufficient funds",
                "returned item",
                "unpaid item",
                "nsf fee",
                "penalty",
                "penalitate",
                "late fee",
            ]),
        }
    }
}

/// Window lengths and rule thresholds. Defaults are the documented scoring contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringThresholds {
    pub income_window_months: u32,
    pub debt_window_months: u32,
    pub cushion_window_months: u32,
    pub overdraft_window_months: u32,
    pub savings_window_days: i64,
    pub days_per_month: f64,
    pub frequency_reference_days: f64,
    pub amount_stability_weight: f64,
    pub frequency_stability_weight: f64,
    pub consistent_savings_rate_pct: f64,
    pub gambling_income_share_pct: f64,
    pub max_overdrafts: usize,
}

impl Default for ScoringThresholds {
    fn default() -> Self {
        Self {
            income_window_months: 12,
            debt_window_months: 3,
            cushion_window_months: 6,
            overdraft_window_months: 3,
            savings_window_days: 3,
            days_per_month: 30.44,
            frequency_reference_days: 7.0,
            amount_stability_weight: 0.7,
            frequency_stability_weight: 0.3,
            consistent_savings_rate_pct: 10.0,
            gambling_income_share_pct: 10.0,
            max_overdrafts: 2,
        }
    }
}

fn owned(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}
