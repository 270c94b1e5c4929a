use thiserror::Error;

use crate::domain::ExpenseId;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Expense not found: {0}")]
    ExpenseNotFound(ExpenseId),

    #[error("Nothing to export: {0}")]
    NothingToExport(String),

    #[error("Storage error: {0}")]
    Storage(#[from] anyhow::Error),
}
