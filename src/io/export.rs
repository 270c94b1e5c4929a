use std::io::Write;

use anyhow::Result;
use serde::Serialize;

use crate::application::{AppError, LedgerService};
use crate::domain::{Amount, Expense, ExpenseId};

/// Column order of the CSV export.
pub const CSV_HEADER: [&str; 5] = ["id", "date", "category", "amount", "note"];

#[derive(Serialize)]
struct CsvRow<'a> {
    id: ExpenseId,
    date: &'a str,
    category: &'a str,
    amount: Amount,
    note: &'a str,
}

impl<'a> From<&'a Expense> for CsvRow<'a> {
    fn from(expense: &'a Expense) -> Self {
        Self {
            id: expense.id,
            date: &expense.date,
            category: &expense.category,
            amount: expense.amount,
            note: &expense.note,
        }
    }
}

/// Exporter for converting ledger data to various formats
pub struct Exporter<'a> {
    service: &'a LedgerService,
}

impl<'a> Exporter<'a> {
    pub fn new(service: &'a LedgerService) -> Self {
        Self { service }
    }

    /// Export every expense to CSV, in storage order. Returns the row count.
    pub async fn export_csv<W: Write>(&self, writer: W) -> Result<usize, AppError> {
        let expenses = self.service.list_expenses().await?;
        if expenses.is_empty() {
            return Err(AppError::NothingToExport("no expenses recorded".to_string()));
        }

        Ok(write_csv(&expenses, writer)?)
    }

    /// Copy the stored JSON document verbatim. Returns the number of bytes written.
    pub async fn export_json<W: Write>(&self, mut writer: W) -> Result<usize, AppError> {
        let repo = self.service.repository();
        let document = repo.raw_document().await?.ok_or_else(|| {
            AppError::NothingToExport(format!("no expense file at {}", repo.path().display()))
        })?;

        writer.write_all(&document).map_err(anyhow::Error::from)?;
        writer.flush().map_err(anyhow::Error::from)?;
        Ok(document.len())
    }
}

/// Write expenses as CSV: header row, then one row per expense.
pub fn write_csv<W: Write>(expenses: &[Expense], writer: W) -> Result<usize> {
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);

    csv_writer.write_record(CSV_HEADER)?;

    let mut count = 0;
    for expense in expenses {
        csv_writer.serialize(CsvRow::from(expense))?;
        count += 1;
    }

    csv_writer.flush()?;
    Ok(count)
}
