// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use std::path::PathBuf;

use anyhow::Result;
use spesa::application::LedgerService;
use spesa::domain::Expense;
use spesa::storage::Repository;
use tempfile::TempDir;

/// Helper to create a test service over a temporary expense file
pub fn test_service() -> Result<(LedgerService, TempDir)> {
    let temp_dir = TempDir::new()?;
    let service = LedgerService::open(store_path(&temp_dir));
    Ok((service, temp_dir))
}

/// Path of the expense file inside a test directory
pub fn store_path(temp_dir: &TempDir) -> PathBuf {
    temp_dir.path().join("expenses.json")
}

/// Raw bytes of the expense file, if any
pub fn read_store(temp_dir: &TempDir) -> Option<Vec<u8>> {
    std::fs::read(store_path(temp_dir)).ok()
}

/// Test fixture: a small ledger written straight to disk
pub struct SampleLedger;

impl SampleLedger {
    pub fn expenses() -> Vec<Expense> {
        vec![
            Expense::new(1, 10.0, "Food", "2024-01-05").with_note("groceries"),
            Expense::new(2, 5.0, "Food", "2024-02-01"),
            Expense::new(3, 800.0, "Rent", "2024-02-01").with_note("february"),
            Expense::new(4, 2.5, "Transport", "2024-01-20"),
        ]
    }

    /// Write the sample expenses to the service's store
    pub async fn seed(service: &LedgerService) -> Result<Vec<Expense>> {
        let expenses = Self::expenses();
        service.repository().save(&expenses).await?;
        Ok(expenses)
    }

    /// Write the sample expenses through a standalone repository
    pub async fn seed_at(temp_dir: &TempDir) -> Result<Vec<Expense>> {
        let expenses = Self::expenses();
        Repository::new(store_path(temp_dir)).save(&expenses).await?;
        Ok(expenses)
    }
}
