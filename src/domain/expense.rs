use chrono::Local;
use serde::{Deserialize, Serialize};

use super::Amount;

pub type ExpenseId = i64;

/// Category used when the user leaves the field blank.
pub const DEFAULT_CATEGORY: &str = "Other";

/// Date format used for every stored expense date.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A single expense entry.
///
/// Field order matches the on-disk document: `id`, `amount`, `category`,
/// `date`, `note`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    /// Unique within the ledger, assigned at creation and never reassigned
    pub id: ExpenseId,
    pub amount: Amount,
    /// Normalized, never empty
    pub category: String,
    /// ISO calendar date (YYYY-MM-DD), stored as text
    pub date: String,
    #[serde(default)]
    pub note: String,
}

impl Expense {
    pub fn new(
        id: ExpenseId,
        amount: Amount,
        category: impl Into<String>,
        date: impl Into<String>,
    ) -> Self {
        Self {
            id,
            amount,
            category: category.into(),
            date: date.into(),
            note: String::new(),
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = note.into();
        self
    }

    /// The `YYYY-MM` prefix of the date. Shorter dates yield whatever is there.
    pub fn month(&self) -> &str {
        month_key(&self.date)
    }
}

/// Trim and capitalize a free-text category, falling back to "Other".
/// Only the first character changes case: "food" -> "Food", "eBay" -> "EBay".
pub fn normalize_category(input: &str) -> String {
    let trimmed = input.trim();
    let mut chars = trimmed.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => DEFAULT_CATEGORY.to_string(),
    }
}

/// Pick the date to store: the given text when non-empty, the fallback otherwise.
pub fn resolve_date(input: Option<&str>, fallback: impl FnOnce() -> String) -> String {
    match input {
        Some(date) if !date.is_empty() => date.to_string(),
        _ => fallback(),
    }
}

/// Today's date in the local timezone.
pub fn today() -> String {
    Local::now().format(DATE_FORMAT).to_string()
}

/// First seven characters of a date (the `YYYY-MM` part), char-boundary safe.
pub fn month_key(date: &str) -> &str {
    match date.char_indices().nth(7) {
        Some((idx, _)) => &date[..idx],
        None => date,
    }
}
