use chrono::{DateTime, NaiveDate};
use csv::StringRecord;
use serde_json::Value;

use super::TransactionImportError;
use crate::workflows::affordability::{normalize_amount, Transaction};

/// Column positions resolved from the header row.
#[derive(Debug, Clone, Copy)]
pub(super) struct ColumnLayout {
    date: usize,
    description: usize,
    amount: usize,
    category: Option<usize>,
    account: Option<usize>,
}

impl ColumnLayout {
    pub(super) fn from_headers(headers: &StringRecord) -> Result<Self, TransactionImportError> {
        let position = |name: &str| {
            headers
                .iter()
                .position(|header| normalize_header(header) == name)
        };

        Ok(Self {
            date: position("date").ok_or(TransactionImportError::MissingColumn("Date"))?,
            description: position("description")
                .ok_or(TransactionImportError::MissingColumn("Description"))?,
            amount: position("amount").ok_or(TransactionImportError::MissingColumn("Amount"))?,
            category: position("category"),
            account: position("account"),
        })
    }

    pub(super) fn transaction(
        &self,
        record: &StringRecord,
        line: u64,
    ) -> Result<Transaction, TransactionImportError> {
        let raw_date = cell(record, self.date).unwrap_or_default();
        let made_on = parse_date(raw_date).ok_or_else(|| TransactionImportError::InvalidDate {
            line,
            value: raw_date.to_string(),
        })?;

        let description = cell(record, self.description).unwrap_or_default();
        let amount = cell(record, self.amount)
            .map(|raw| normalize_amount(&Value::String(raw.to_string())))
            .unwrap_or(0.0);

        let mut transaction = Transaction::new(made_on, description, amount);
        if let Some(category) = self.category.and_then(|index| cell(record, index)) {
            transaction = transaction.with_category(category);
        }
        if let Some(account) = self.account.and_then(|index| cell(record, index)) {
            transaction = transaction.on_account(account);
        }
        Ok(transaction)
    }
}

fn cell(record: &StringRecord, index: usize) -> Option<&str> {
    record
        .get(index)
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

fn normalize_header(value: &str) -> String {
    value
        .replace('\u{feff}', "")
        .trim()
        .to_ascii_lowercase()
}

pub(super) fn parse_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Some(date);
    }

    DateTime::parse_from_rfc3339(trimmed)
        .ok()
        .map(|dt| dt.date_naive())
}
