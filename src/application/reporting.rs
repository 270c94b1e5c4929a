use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::{
    Amount, Expense, monthly_totals, most_recent, total, totals_by_category,
};

/// How many expenses the overview shows by default.
pub const DEFAULT_RECENT_LIMIT: usize = 10;

/// Landing view: the newest expenses plus running totals over everything.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Overview {
    pub recent: Vec<Expense>,
    pub total: Amount,
    pub by_category: BTreeMap<String, Amount>,
}

impl Overview {
    pub fn build(expenses: &[Expense], limit: usize) -> Self {
        Self {
            recent: most_recent(expenses, limit),
            total: total(expenses),
            by_category: totals_by_category(expenses),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthTotal {
    pub month: String,
    pub total: Amount,
}

/// Summary view: overall, per-category and per-month totals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryReport {
    pub total: Amount,
    pub by_category: BTreeMap<String, Amount>,
    /// Newest month first
    pub monthly: Vec<MonthTotal>,
}

impl SummaryReport {
    pub fn build(expenses: &[Expense]) -> Self {
        Self {
            total: total(expenses),
            by_category: totals_by_category(expenses),
            monthly: monthly_totals(expenses)
                .into_iter()
                .map(|(month, total)| MonthTotal { month, total })
                .collect(),
        }
    }
}
