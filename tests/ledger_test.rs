mod common;

use std::sync::Arc;

use anyhow::Result;
use common::{SampleLedger, read_store, test_service};
use spesa::application::AppError;
use spesa::domain::{ExpenseId, today};

#[tokio::test]
async fn test_add_to_empty_ledger() -> Result<()> {
    let (service, _temp) = test_service()?;

    let expense = service.add_expense("42.50", "food", Some(""), "lunch").await?;

    let expenses = service.list_expenses().await?;
    assert_eq!(expenses.len(), 1);
    assert_eq!(expenses[0], expense);
    assert_eq!(expense.category, "Food");
    assert_eq!(expense.amount, 42.5);
    assert_eq!(expense.date, today());
    assert_eq!(expense.note, "lunch");
    assert!(expense.id > 0);

    Ok(())
}

#[tokio::test]
async fn test_add_normalizes_input() -> Result<()> {
    let (service, _temp) = test_service()?;

    let expense = service
        .add_expense(" 7 ", "   ", Some("2024-03-10"), "  bus ticket  ")
        .await?;

    assert_eq!(expense.amount, 7.0);
    assert_eq!(expense.category, "Other");
    assert_eq!(expense.date, "2024-03-10");
    assert_eq!(expense.note, "bus ticket");

    let expense = service.add_expense("3", "coffee", None, "").await?;
    assert_eq!(expense.category, "Coffee");
    assert_eq!(expense.date, today());
    assert_eq!(expense.note, "");

    Ok(())
}

#[tokio::test]
async fn test_add_grows_ledger_by_one_with_fresh_id() -> Result<()> {
    let (service, _temp) = test_service()?;
    let existing = SampleLedger::seed(&service).await?;

    let expense = service.add_expense("12", "books", None, "").await?;

    let expenses = service.list_expenses().await?;
    assert_eq!(expenses.len(), existing.len() + 1);
    assert!(existing.iter().all(|e| e.id != expense.id));

    Ok(())
}

#[tokio::test]
async fn test_rapid_adds_get_unique_ids() -> Result<()> {
    let (service, _temp) = test_service()?;

    let mut ids = Vec::new();
    for i in 0..50 {
        let expense = service.add_expense(&i.to_string(), "food", None, "").await?;
        ids.push(expense.id);
    }

    let mut unique = ids.clone();
    unique.sort();
    unique.dedup();
    assert_eq!(unique.len(), 50);
    assert_eq!(service.list_expenses().await?.len(), 50);

    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_adds_are_not_lost() -> Result<()> {
    let (service, _temp) = test_service()?;
    let service = Arc::new(service);

    let mut handles = Vec::new();
    for i in 0..20 {
        let service = Arc::clone(&service);
        handles.push(tokio::spawn(async move {
            service.add_expense(&format!("{}.5", i), "food", None, "").await
        }));
    }
    for handle in handles {
        handle.await??;
    }

    let expenses = service.list_expenses().await?;
    assert_eq!(expenses.len(), 20);

    let mut ids: Vec<ExpenseId> = expenses.iter().map(|e| e.id).collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 20);

    Ok(())
}

#[tokio::test]
async fn test_add_invalid_amount_leaves_store_untouched() -> Result<()> {
    let (service, temp) = test_service()?;
    SampleLedger::seed(&service).await?;
    let before = read_store(&temp);

    for bad in ["abc", "", "12,50", "inf", "nan"] {
        let result = service.add_expense(bad, "food", None, "").await;
        assert!(
            matches!(result, Err(AppError::InvalidAmount(_))),
            "amount {bad:?} should be rejected"
        );
    }

    assert_eq!(read_store(&temp), before);

    Ok(())
}

#[tokio::test]
async fn test_add_invalid_amount_on_missing_store_creates_nothing() -> Result<()> {
    let (service, temp) = test_service()?;

    let result = service.add_expense("lots", "food", None, "").await;

    assert!(matches!(result, Err(AppError::InvalidAmount(_))));
    assert!(read_store(&temp).is_none());

    Ok(())
}

#[tokio::test]
async fn test_edit_overwrites_fields_and_keeps_id() -> Result<()> {
    let (service, _temp) = test_service()?;
    SampleLedger::seed(&service).await?;

    let updated = service
        .edit_expense(1, "11.25", "dining", Some("2024-01-06"), " dinner ")
        .await?;

    assert_eq!(updated.id, 1);
    assert_eq!(updated.amount, 11.25);
    assert_eq!(updated.category, "Dining");
    assert_eq!(updated.date, "2024-01-06");
    assert_eq!(updated.note, "dinner");
    assert_eq!(service.get_expense(1).await?, updated);
    assert_eq!(service.list_expenses().await?.len(), 4);

    Ok(())
}

#[tokio::test]
async fn test_edit_without_date_keeps_existing_date() -> Result<()> {
    let (service, _temp) = test_service()?;
    SampleLedger::seed(&service).await?;

    let updated = service.edit_expense(3, "750", "rent", None, "").await?;
    assert_eq!(updated.date, "2024-02-01");

    let updated = service.edit_expense(3, "760", "rent", Some(""), "").await?;
    assert_eq!(updated.date, "2024-02-01");
    assert_eq!(updated.amount, 760.0);
    assert_eq!(updated.note, "");

    Ok(())
}

#[tokio::test]
async fn test_edit_unknown_id_is_not_found() -> Result<()> {
    let (service, temp) = test_service()?;
    SampleLedger::seed(&service).await?;
    let before = read_store(&temp);

    let result = service.edit_expense(99, "1", "food", None, "").await;

    assert!(matches!(result, Err(AppError::ExpenseNotFound(99))));
    assert_eq!(read_store(&temp), before);

    Ok(())
}

#[tokio::test]
async fn test_edit_unknown_id_reports_not_found_before_bad_amount() -> Result<()> {
    let (service, _temp) = test_service()?;
    SampleLedger::seed(&service).await?;

    let result = service.edit_expense(99, "abc", "food", None, "").await;

    assert!(matches!(result, Err(AppError::ExpenseNotFound(99))));

    Ok(())
}

#[tokio::test]
async fn test_edit_invalid_amount_leaves_store_untouched() -> Result<()> {
    let (service, temp) = test_service()?;
    SampleLedger::seed(&service).await?;
    let before = read_store(&temp);

    let result = service.edit_expense(2, "five", "food", None, "").await;

    assert!(matches!(result, Err(AppError::InvalidAmount(_))));
    assert_eq!(read_store(&temp), before);

    Ok(())
}

#[tokio::test]
async fn test_delete_removes_only_matching_expense() -> Result<()> {
    let (service, _temp) = test_service()?;
    let seeded = SampleLedger::seed(&service).await?;

    let removed = service.delete_expense(2).await?;
    assert_eq!(removed, seeded[1]);

    let remaining = service.list_expenses().await?;
    let expected: Vec<_> = seeded.into_iter().filter(|e| e.id != 2).collect();
    assert_eq!(remaining, expected);

    Ok(())
}

#[tokio::test]
async fn test_delete_unknown_id_is_not_found() -> Result<()> {
    let (service, temp) = test_service()?;
    SampleLedger::seed(&service).await?;
    let before = read_store(&temp);

    let result = service.delete_expense(42).await;

    assert!(matches!(result, Err(AppError::ExpenseNotFound(42))));
    assert_eq!(read_store(&temp), before);

    Ok(())
}

#[tokio::test]
async fn test_delete_on_missing_store_does_not_create_file() -> Result<()> {
    let (service, temp) = test_service()?;

    let result = service.delete_expense(1).await;

    assert!(matches!(result, Err(AppError::ExpenseNotFound(1))));
    assert!(read_store(&temp).is_none());

    Ok(())
}

#[tokio::test]
async fn test_get_expense() -> Result<()> {
    let (service, _temp) = test_service()?;
    let seeded = SampleLedger::seed(&service).await?;

    assert_eq!(service.get_expense(3).await?, seeded[2]);
    assert!(matches!(
        service.get_expense(7).await,
        Err(AppError::ExpenseNotFound(7))
    ));

    Ok(())
}
