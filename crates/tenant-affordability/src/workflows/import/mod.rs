//! Adapters turning bank exports into engine input.

mod parser;

use std::io::Read;
use std::path::Path;

use tracing::debug;

use crate::workflows::affordability::Transaction;

use parser::ColumnLayout;

#[derive(Debug)]
pub enum TransactionImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    MissingColumn(&'static str),
    InvalidDate { line: u64, value: String },
}

impl std::fmt::Display for TransactionImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransactionImportError::Io(err) => {
                write!(f, "failed to read transaction export: {}", err)
            }
            TransactionImportError::Csv(err) => write!(f, "invalid transaction CSV data: {}", err),
            TransactionImportError::MissingColumn(column) => {
                write!(f, "transaction export is missing the '{}' column", column)
            }
            TransactionImportError::InvalidDate { line, value } => {
                write!(f, "line {}: '{}' is not a valid date", line, value)
            }
        }
    }
}

impl std::error::Error for TransactionImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TransactionImportError::Io(err) => Some(err),
            TransactionImportError::Csv(err) => Some(err),
            TransactionImportError::MissingColumn(_)
            | TransactionImportError::InvalidDate { .. } => None,
        }
    }
}

impl From<std::io::Error> for TransactionImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for TransactionImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// Reads `Date, Description, Amount[, Category][, Account]` exports.
pub struct TransactionCsvImporter;

impl TransactionCsvImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<Transaction>, TransactionImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<Transaction>, TransactionImportError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(reader);

        let layout = ColumnLayout::from_headers(csv_reader.headers()?)?;
        let mut transactions = Vec::new();

        for record in csv_reader.records() {
            let record = record?;
            if record.iter().all(|field| field.trim().is_empty()) {
                continue;
            }
            let line = record.position().map(|position| position.line()).unwrap_or(0);
            transactions.push(layout.transaction(&record, line)?);
        }

        debug!(rows = transactions.len(), "transaction export parsed");
        Ok(transactions)
    }
}
