use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum CoreError {
    #[error("Invalid flow '{0}' (expected 'Debit' or 'Credit')")]
    InvalidFlow(String),
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Budget for {category} must not be negative (got {limit})")]
    NegativeBudget { category: String, limit: String },
}
