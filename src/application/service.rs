use std::path::PathBuf;

use chrono::Utc;
use tokio::sync::Mutex;

use crate::domain::{
    Expense, ExpenseId, next_id, normalize_category, parse_amount, resolve_date,
    sorted_by_date_desc, today,
};
use crate::storage::Repository;

use super::{AppError, Overview, SummaryReport};

/// Application service providing high-level operations for the expense ledger.
/// This is the primary interface for any client (CLI, web handlers, etc.).
///
/// Every mutation loads the full list, changes it in memory and saves it
/// back while holding `write_lock`, so two writers in the same process
/// cannot overwrite each other's changes.
pub struct LedgerService {
    repo: Repository,
    write_lock: Mutex<()>,
}

impl LedgerService {
    /// Create a new ledger service with the given repository.
    pub fn new(repo: Repository) -> Self {
        Self {
            repo,
            write_lock: Mutex::new(()),
        }
    }

    /// Open the expense store at the given path. The file is created on first save.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self::new(Repository::new(path))
    }

    pub fn repository(&self) -> &Repository {
        &self.repo
    }

    // ========================
    // Queries
    // ========================

    /// Every expense in storage order.
    pub async fn list_expenses(&self) -> Result<Vec<Expense>, AppError> {
        Ok(self.repo.load().await?)
    }

    /// Every expense, newest first.
    pub async fn list_expenses_by_date(&self) -> Result<Vec<Expense>, AppError> {
        let expenses = self.repo.load().await?;
        Ok(sorted_by_date_desc(&expenses))
    }

    /// Get a single expense by id.
    pub async fn get_expense(&self, id: ExpenseId) -> Result<Expense, AppError> {
        self.repo
            .load()
            .await?
            .into_iter()
            .find(|e| e.id == id)
            .ok_or(AppError::ExpenseNotFound(id))
    }

    /// The `limit` newest expenses with totals over the whole ledger.
    pub async fn overview(&self, limit: usize) -> Result<Overview, AppError> {
        let expenses = self.repo.load().await?;
        Ok(Overview::build(&expenses, limit))
    }

    /// Overall, per-category and monthly totals.
    pub async fn summary(&self) -> Result<SummaryReport, AppError> {
        let expenses = self.repo.load().await?;
        Ok(SummaryReport::build(&expenses))
    }

    // ========================
    // Mutations
    // ========================

    /// Record a new expense from raw user input.
    ///
    /// A blank category becomes "Other"; a missing or empty date becomes today.
    pub async fn add_expense(
        &self,
        amount: &str,
        category: &str,
        date: Option<&str>,
        note: &str,
    ) -> Result<Expense, AppError> {
        let amount = parse_amount(amount).map_err(|e| AppError::InvalidAmount(e.to_string()))?;
        let category = normalize_category(category);
        let date = resolve_date(date, today);
        let note = note.trim();

        let _guard = self.write_lock.lock().await;
        let mut expenses = self.repo.load().await?;

        let id = next_id(&expenses, Utc::now().timestamp_millis());
        let expense = Expense::new(id, amount, category, date).with_note(note);
        expenses.push(expense.clone());
        self.repo.save(&expenses).await?;

        tracing::info!(
            id = expense.id,
            amount = expense.amount,
            category = %expense.category,
            "expense added"
        );
        Ok(expense)
    }

    /// Overwrite an existing expense from raw user input.
    ///
    /// The id never changes. A missing or empty date keeps the stored date.
    pub async fn edit_expense(
        &self,
        id: ExpenseId,
        amount: &str,
        category: &str,
        date: Option<&str>,
        note: &str,
    ) -> Result<Expense, AppError> {
        let _guard = self.write_lock.lock().await;
        let mut expenses = self.repo.load().await?;

        let expense = expenses
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or(AppError::ExpenseNotFound(id))?;

        let amount = parse_amount(amount).map_err(|e| AppError::InvalidAmount(e.to_string()))?;
        let category = normalize_category(category);
        let date = resolve_date(date, || expense.date.clone());

        expense.amount = amount;
        expense.category = category;
        expense.date = date;
        expense.note = note.trim().to_string();
        let updated = expense.clone();

        self.repo.save(&expenses).await?;

        tracing::info!(id, "expense updated");
        Ok(updated)
    }

    /// Permanently remove an expense, returning what was removed.
    pub async fn delete_expense(&self, id: ExpenseId) -> Result<Expense, AppError> {
        let _guard = self.write_lock.lock().await;
        let mut expenses = self.repo.load().await?;

        let removed = expenses
            .iter()
            .find(|e| e.id == id)
            .cloned()
            .ok_or(AppError::ExpenseNotFound(id))?;
        expenses.retain(|e| e.id != id);

        self.repo.save(&expenses).await?;

        tracing::info!(id, "expense deleted");
        Ok(removed)
    }
}
