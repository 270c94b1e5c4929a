// Application layer - use cases over the expense store.
// Every client (CLI today) goes through LedgerService rather than the
// repository so writes stay serialized.

pub mod error;
pub mod reporting;
pub mod service;

pub use error::*;
pub use reporting::*;
pub use service::*;
