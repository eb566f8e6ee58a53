//! CSV rendering of the transaction history.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use chrono::NaiveDate;
use thiserror::Error;

use tally_domain::{Totals, Transaction};

use crate::input::DATE_FORMAT;

const HEADER: [&str; 6] = [
    "Date",
    "Type",
    "Amount",
    "Person",
    "Category",
    "Previous Balance",
];
const MISSING: &str = "N/A";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("No transactions to export")]
    Empty,
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Formats transactions as CSV with the opening balance on the first row.
pub struct ExportFormatter;

impl ExportFormatter {
    /// Renders `transactions` in storage order.
    ///
    /// `balance` is the current balance; the "Previous Balance" column carries
    /// the balance before any listed transaction, on the first row only.
    pub fn to_csv(transactions: &[Transaction], balance: f64) -> Result<String, ExportError> {
        if transactions.is_empty() {
            return Err(ExportError::Empty);
        }
        let previous = balance - Totals::from_transactions(transactions).net();

        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(HEADER)?;
        for (index, txn) in transactions.iter().enumerate() {
            let previous_cell = if index == 0 {
                previous.to_string()
            } else {
                String::new()
            };
            writer.write_record([
                txn.date.format(DATE_FORMAT).to_string(),
                txn.kind.as_str().to_string(),
                txn.amount.to_string(),
                txn.person.clone().unwrap_or_else(|| MISSING.to_string()),
                txn.category.clone().unwrap_or_else(|| MISSING.to_string()),
                previous_cell,
            ])?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|err| ExportError::Io(err.into_error()))?;
        String::from_utf8(bytes).map_err(|err| ExportError::Io(io::Error::new(io::ErrorKind::InvalidData, err)))
    }

    /// Name of the export file produced on `date`.
    pub fn export_file_name(date: NaiveDate) -> String {
        format!("transactions_{}.csv", date.format(DATE_FORMAT))
    }

    /// Writes the CSV into `dir` (created when missing) and returns the file path.
    pub fn write_csv(
        dir: &Path,
        date: NaiveDate,
        transactions: &[Transaction],
        balance: f64,
    ) -> Result<PathBuf, ExportError> {
        let contents = Self::to_csv(transactions, balance)?;
        fs::create_dir_all(dir)?;
        let path = dir.join(Self::export_file_name(date));
        fs::write(&path, contents)?;
        tracing::info!(path = %path.display(), rows = transactions.len(), "transactions exported");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tally_domain::TransactionKind;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    #[test]
    fn previous_balance_appears_on_first_row_only() {
        let txns = vec![
            Transaction::new(TransactionKind::Credit, 200.0, day(1)).with_person("Alice"),
            Transaction::new(TransactionKind::Debit, 150.5, day(2)).with_category("Rent"),
        ];
        let csv = ExportFormatter::to_csv(&txns, 1049.5).unwrap();
        let lines: Vec<_> = csv.lines().collect();
        assert_eq!(lines[0], "Date,Type,Amount,Person,Category,Previous Balance");
        assert_eq!(lines[1], "2024-01-01,credit,200,Alice,N/A,1000");
        assert_eq!(lines[2], "2024-01-02,debit,150.5,N/A,Rent,");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn fields_with_commas_are_quoted() {
        let txns = vec![Transaction::new(TransactionKind::Debit, 5.0, day(3))
            .with_person("Smith, J")];
        let csv = ExportFormatter::to_csv(&txns, 0.0).unwrap();
        assert!(csv.contains("\"Smith, J\""));
    }

    #[test]
    fn empty_history_is_rejected() {
        let err = ExportFormatter::to_csv(&[], 10.0).expect_err("nothing to export");
        assert!(matches!(err, ExportError::Empty));
        assert_eq!(err.to_string(), "No transactions to export");
    }

    #[test]
    fn write_csv_uses_dated_file_name() {
        let dir = tempfile::tempdir().unwrap();
        let txns = vec![Transaction::new(TransactionKind::Credit, 1.0, day(1))];
        let path = ExportFormatter::write_csv(dir.path(), day(9), &txns, 1.0).unwrap();
        assert_eq!(path.file_name().unwrap(), "transactions_2024-01-09.csv");
        let written = std::fs::read_to_string(path).unwrap();
        assert!(written.starts_with("Date,Type"));
    }
}
