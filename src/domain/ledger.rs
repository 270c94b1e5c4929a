use std::cmp::Ordering;
use std::collections::BTreeMap;

use super::{Amount, Expense, ExpenseId, month_key};

/// Sum of all amounts. Zero for an empty ledger.
pub fn total(expenses: &[Expense]) -> Amount {
    expenses.iter().map(|e| e.amount).sum()
}

/// Sum of amounts per category, one entry per distinct category.
pub fn totals_by_category(expenses: &[Expense]) -> BTreeMap<String, Amount> {
    let mut totals: BTreeMap<String, Amount> = BTreeMap::new();

    for expense in expenses {
        *totals.entry(expense.category.clone()).or_insert(0.0) += expense.amount;
    }

    totals
}

/// Sum of amounts per `YYYY-MM` month, newest month first.
pub fn monthly_totals(expenses: &[Expense]) -> Vec<(String, Amount)> {
    let mut totals: BTreeMap<&str, Amount> = BTreeMap::new();

    for expense in expenses {
        *totals.entry(month_key(&expense.date)).or_insert(0.0) += expense.amount;
    }

    totals
        .into_iter()
        .rev()
        .map(|(month, amount)| (month.to_string(), amount))
        .collect()
}

/// Newest first: date descending, then id descending for the same date.
fn by_date_desc(a: &Expense, b: &Expense) -> Ordering {
    b.date.cmp(&a.date).then_with(|| b.id.cmp(&a.id))
}

/// Every expense, newest first.
pub fn sorted_by_date_desc(expenses: &[Expense]) -> Vec<Expense> {
    let mut sorted = expenses.to_vec();
    sorted.sort_by(by_date_desc);
    sorted
}

/// The `n` newest expenses. Returns fewer when the ledger is smaller.
pub fn most_recent(expenses: &[Expense], n: usize) -> Vec<Expense> {
    let mut sorted = sorted_by_date_desc(expenses);
    sorted.truncate(n);
    sorted
}

/// Pick an id for a new expense.
///
/// Ids are millisecond timestamps, bumped past the highest existing id so
/// two expenses created in the same millisecond still get distinct ids.
pub fn next_id(expenses: &[Expense], now_millis: i64) -> ExpenseId {
    match expenses.iter().map(|e| e.id).max() {
        Some(max) if max >= now_millis => max + 1,
        _ => now_millis,
    }
}
