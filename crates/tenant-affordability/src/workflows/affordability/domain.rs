use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::amount::deserialize_amount;

/// Bank transaction supplied by the upstream aggregator adapter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub made_on: NaiveDate,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub description: String,
    #[serde(default, deserialize_with = "deserialize_amount")]
    pub amount: f64,
    #[serde(
        default,
        deserialize_with = "optional_identifier",
        skip_serializing_if = "Option::is_none"
    )]
    pub category: Option<String>,
    #[serde(
        default,
        deserialize_with = "optional_identifier",
        skip_serializing_if = "Option::is_none"
    )]
    pub account_id: Option<String>,
}

impl Transaction {
    pub fn new(made_on: NaiveDate, description: impl Into<String>, amount: f64) -> Self {
        Self {
            made_on,
            description: description.into(),
            amount,
            category: None,
            account_id: None,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn on_account(mut self, account_id: impl Into<String>) -> Self {
        self.account_id = Some(account_id.into());
        self
    }

    pub fn is_inflow(&self) -> bool {
        self.amount > 0.0
    }

    pub fn is_outflow(&self) -> bool {
        self.amount < 0.0
    }
}

/// Account balance snapshot taken at evaluation time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    #[serde(deserialize_with = "identifier")]
    pub id: String,
    #[serde(alias = "balance", default, deserialize_with = "deserialize_amount")]
    pub current_balance: f64,
}

impl Account {
    pub fn new(id: impl Into<String>, current_balance: f64) -> Self {
        Self {
            id: id.into(),
            current_balance,
        }
    }
}

/// Display tag for a transaction. Calculators run their own filters instead of relying on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    Income,
    Debt,
    EssentialBurn,
    Unclassified,
}

impl Classification {
    pub const fn label(self) -> &'static str {
        match self {
            Classification::Income => "income",
            Classification::Debt => "debt",
            Classification::EssentialBurn => "essential_burn",
            Classification::Unclassified => "unclassified",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassifiedTransaction {
    #[serde(flatten)]
    pub transaction: Transaction,
    pub classification: Classification,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn identifier<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    optional_identifier(deserializer)?
        .ok_or_else(|| serde::de::Error::custom("expected a string or numeric identifier"))
}

/// Providers disagree on whether ids and category codes are strings or numbers.
fn optional_identifier<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    let text = match value {
        Some(Value::String(text)) => Some(text),
        Some(Value::Number(number)) => Some(number.to_string()),
        _ => None,
    };
    Ok(text.filter(|text| !text.trim().is_empty()))
}
