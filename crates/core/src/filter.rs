use std::collections::BTreeSet;

use crate::period::DateRange;
use crate::transaction::CategorizedTransaction;

/// Date range and category selection applied before analysis.
///
/// An unset criterion lets every row through.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionFilter {
    pub range: Option<DateRange>,
    pub categories: Option<BTreeSet<String>>,
}

impl TransactionFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_range(mut self, range: DateRange) -> Self {
        self.range = Some(range);
        self
    }

    pub fn with_categories<I, S>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categories = Some(categories.into_iter().map(Into::into).collect());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.range.is_none() && self.categories.is_none()
    }

    pub fn matches(&self, tx: &CategorizedTransaction) -> bool {
        if let Some(range) = self.range {
            if !range.contains(tx.date()) {
                return false;
            }
        }
        match &self.categories {
            Some(selected) => selected.contains(tx.category()),
            None => true,
        }
    }

    pub fn apply(&self, rows: &[CategorizedTransaction]) -> Vec<CategorizedTransaction> {
        rows.iter().filter(|tx| self.matches(tx)).cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Flow, Money, Transaction};
    use chrono::NaiveDate;

    fn row(day: u32, category: &str) -> CategorizedTransaction {
        CategorizedTransaction::new(
            Transaction::new(
                NaiveDate::from_ymd_opt(2024, 11, day).unwrap(),
                "x",
                Money::from_cents(100),
                Flow::Debit,
            ),
            category,
        )
    }

    #[test]
    fn empty_filter_keeps_everything() {
        let rows = vec![row(1, "Food"), row(2, "Travel")];
        let filter = TransactionFilter::new();
        assert!(filter.is_empty());
        assert_eq!(filter.apply(&rows).len(), 2);
    }

    #[test]
    fn range_is_inclusive() {
        let rows = vec![row(1, "Food"), row(10, "Food"), row(20, "Food")];
        let filter = TransactionFilter::new().with_range(DateRange::new(
            NaiveDate::from_ymd_opt(2024, 11, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 11, 10).unwrap(),
        ));
        let kept = filter.apply(&rows);
        assert_eq!(kept.len(), 2);
        assert_eq!(kept[1].date(), NaiveDate::from_ymd_opt(2024, 11, 10).unwrap());
    }

    #[test]
    fn category_selection() {
        let rows = vec![row(1, "Food"), row(2, "Travel"), row(3, "Other")];
        let filter = TransactionFilter::new().with_categories(["Food", "Other"]);
        let kept: Vec<_> = filter.apply(&rows).iter().map(|t| t.category().to_string()).collect();
        assert_eq!(kept, vec!["Food", "Other"]);
    }
}
