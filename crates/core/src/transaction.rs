use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;
use crate::money::Money;

/// Direction of a ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Flow {
    Debit,
    Credit,
}

impl Flow {
    pub fn is_debit(self) -> bool {
        matches!(self, Flow::Debit)
    }
}

impl fmt::Display for Flow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Flow::Debit => write!(f, "Debit"),
            Flow::Credit => write!(f, "Credit"),
        }
    }
}

impl FromStr for Flow {
    type Err = CoreError;

    /// Only the exact words `Debit` and `Credit` are accepted, surrounding
    /// whitespace aside.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Debit" => Ok(Flow::Debit),
            "Credit" => Ok(Flow::Credit),
            other => Err(CoreError::InvalidFlow(other.to_string())),
        }
    }
}

/// One cleaned ledger entry as handed over by ingestion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub date: NaiveDate,
    pub details: String,
    /// Non-negative magnitude; direction lives in `flow`.
    pub amount: Money,
    pub flow: Flow,
}

impl Transaction {
    pub fn new(date: NaiveDate, details: impl Into<String>, amount: Money, flow: Flow) -> Self {
        Transaction {
            date,
            details: details.into(),
            amount,
            flow,
        }
    }

    pub fn is_debit(&self) -> bool {
        self.flow.is_debit()
    }
}

/// A transaction together with the category it was assigned.
///
/// The category is fixed at construction and there is no setter, so a row is
/// categorized exactly once.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorizedTransaction {
    #[serde(flatten)]
    transaction: Transaction,
    category: String,
}

impl CategorizedTransaction {
    pub fn new(transaction: Transaction, category: impl Into<String>) -> Self {
        CategorizedTransaction {
            transaction,
            category: category.into(),
        }
    }

    pub fn transaction(&self) -> &Transaction {
        &self.transaction
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn date(&self) -> NaiveDate {
        self.transaction.date
    }

    pub fn details(&self) -> &str {
        &self.transaction.details
    }

    pub fn amount(&self) -> Money {
        self.transaction.amount
    }

    pub fn flow(&self) -> Flow {
        self.transaction.flow
    }

    pub fn is_debit(&self) -> bool {
        self.transaction.is_debit()
    }

    pub fn into_parts(self) -> (Transaction, String) {
        (self.transaction, self.category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn flow_parses_exact_words_after_trim() {
        assert_eq!("Debit".parse::<Flow>().unwrap(), Flow::Debit);
        assert_eq!("  Credit ".parse::<Flow>().unwrap(), Flow::Credit);
    }

    #[test]
    fn flow_rejects_other_spellings() {
        assert!(matches!("debit".parse::<Flow>(), Err(CoreError::InvalidFlow(_))));
        assert!("DR".parse::<Flow>().is_err());
        assert!("".parse::<Flow>().is_err());
    }

    #[test]
    fn flow_display_round_trips() {
        assert_eq!(Flow::Debit.to_string().parse::<Flow>().unwrap(), Flow::Debit);
        assert_eq!(Flow::Credit.to_string(), "Credit");
    }

    #[test]
    fn categorized_accessors() {
        let tx = Transaction::new(
            date(2024, 11, 1),
            "Swiggy Order - Pizza Palace",
            Money::from_cents(62_000),
            Flow::Debit,
        );
        let c = CategorizedTransaction::new(tx.clone(), "Food & Dining");
        assert_eq!(c.category(), "Food & Dining");
        assert_eq!(c.amount(), Money::from_cents(62_000));
        assert!(c.is_debit());
        assert_eq!(c.transaction(), &tx);

        let (back, category) = c.into_parts();
        assert_eq!(back, tx);
        assert_eq!(category, "Food & Dining");
    }

    #[test]
    fn categorized_serializes_flat() {
        let c = CategorizedTransaction::new(
            Transaction::new(date(2024, 1, 2), "Salary", Money::from_cents(100), Flow::Credit),
            "Income",
        );
        let json = serde_json::to_value(&c).unwrap();
        assert_eq!(json["details"], "Salary");
        assert_eq!(json["flow"], "Credit");
        assert_eq!(json["category"], "Income");
    }
}
