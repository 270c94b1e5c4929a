mod repository;

pub use repository::*;

/// Default location of the expense document.
pub const DEFAULT_STORE_PATH: &str = "expenses.json";
