pub mod budget;
pub mod error;
pub mod filter;
pub mod money;
pub mod period;
pub mod transaction;

pub use budget::BudgetGoals;
pub use error::CoreError;
pub use filter::TransactionFilter;
pub use money::Money;
pub use period::{DateRange, YearMonth};
pub use transaction::{CategorizedTransaction, Flow, Transaction};
