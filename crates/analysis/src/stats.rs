use chrono::{Datelike, NaiveDate, Weekday};
use serde::Serialize;
use std::cmp::Reverse;
use std::collections::BTreeMap;

use finwise_core::{CategorizedTransaction, Money, YearMonth};

const WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Debit totals for one category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorySummary {
    pub category: String,
    pub total: Money,
    pub count: usize,
    pub average: Money,
}

fn debits(rows: &[CategorizedTransaction]) -> impl Iterator<Item = &CategorizedTransaction> {
    rows.iter().filter(|tx| tx.is_debit())
}

/// Debit spend per category, largest total first (ties by name).
pub fn category_breakdown(rows: &[CategorizedTransaction]) -> Vec<CategorySummary> {
    let mut groups: BTreeMap<&str, (Money, usize)> = BTreeMap::new();
    for tx in debits(rows) {
        let entry = groups.entry(tx.category()).or_insert((Money::zero(), 0));
        entry.0 = entry.0 + tx.amount();
        entry.1 += 1;
    }

    let mut summary: Vec<_> = groups
        .into_iter()
        .map(|(category, (total, count))| CategorySummary {
            category: category.to_string(),
            total,
            count,
            average: total.per(count).unwrap_or_default(),
        })
        .collect();
    // Stable sort keeps name order among equal totals.
    summary.sort_by_key(|s| Reverse(s.total));
    summary
}

/// Debit spend per calendar day, oldest first.
pub fn daily_totals(rows: &[CategorizedTransaction]) -> Vec<(NaiveDate, Money)> {
    let mut days: BTreeMap<NaiveDate, Money> = BTreeMap::new();
    for tx in debits(rows) {
        let total = days.entry(tx.date()).or_default();
        *total = *total + tx.amount();
    }
    days.into_iter().collect()
}

/// Debit spend per calendar month, oldest first.
pub fn monthly_totals(rows: &[CategorizedTransaction]) -> BTreeMap<YearMonth, Money> {
    let mut months: BTreeMap<YearMonth, Money> = BTreeMap::new();
    for tx in debits(rows) {
        let total = months.entry(YearMonth::of(tx.date())).or_default();
        *total = *total + tx.amount();
    }
    months
}

/// Weekday with the highest cumulative debit spend. On a tie the earlier day
/// of the week (Monday first) wins.
pub fn busiest_weekday(rows: &[CategorizedTransaction]) -> Option<(Weekday, Money)> {
    let mut totals = [Money::zero(); 7];
    let mut seen = false;
    for tx in debits(rows) {
        let idx = tx.date().weekday().num_days_from_monday() as usize;
        totals[idx] = totals[idx] + tx.amount();
        seen = true;
    }
    if !seen {
        return None;
    }

    totals
        .iter()
        .enumerate()
        .max_by_key(|(idx, total)| (**total, Reverse(*idx)))
        .map(|(idx, total)| (WEEK[idx], *total))
}

#[cfg(test)]
mod tests {
    use super::*;
    use finwise_core::{Flow, Transaction};

    fn tx(date: (i32, u32, u32), category: &str, units: i64, flow: Flow) -> CategorizedTransaction {
        CategorizedTransaction::new(
            Transaction::new(
                NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
                "row",
                Money::from_cents(units * 100),
                flow,
            ),
            category,
        )
    }

    #[test]
    fn breakdown_sorted_by_total() {
        let rows = vec![
            tx((2024, 11, 1), "Food", 300, Flow::Debit),
            tx((2024, 11, 2), "Food", 100, Flow::Debit),
            tx((2024, 11, 3), "Travel", 5000, Flow::Debit),
            tx((2024, 11, 4), "Income", 90000, Flow::Credit),
        ];
        let breakdown = category_breakdown(&rows);
        assert_eq!(breakdown.len(), 2);
        assert_eq!(breakdown[0].category, "Travel");
        assert_eq!(breakdown[1].category, "Food");
        assert_eq!(breakdown[1].count, 2);
        assert_eq!(breakdown[1].total, Money::from_cents(40_000));
        assert_eq!(breakdown[1].average, Money::from_cents(20_000));
    }

    #[test]
    fn breakdown_ties_keep_name_order() {
        let rows = vec![
            tx((2024, 11, 1), "Zoo", 100, Flow::Debit),
            tx((2024, 11, 1), "Art", 100, Flow::Debit),
        ];
        let names: Vec<_> = category_breakdown(&rows).into_iter().map(|s| s.category).collect();
        assert_eq!(names, vec!["Art", "Zoo"]);
    }

    #[test]
    fn daily_and_monthly_totals_skip_credits() {
        let rows = vec![
            tx((2024, 11, 30), "Food", 100, Flow::Debit),
            tx((2024, 11, 30), "Food", 50, Flow::Debit),
            tx((2024, 12, 1), "Food", 70, Flow::Debit),
            tx((2024, 12, 1), "Income", 1000, Flow::Credit),
        ];
        let daily = daily_totals(&rows);
        assert_eq!(daily.len(), 2);
        assert_eq!(daily[0].1, Money::from_cents(15_000));
        assert_eq!(daily[1].1, Money::from_cents(7_000));

        let monthly = monthly_totals(&rows);
        assert_eq!(monthly[&YearMonth::new(2024, 12).unwrap()], Money::from_cents(7_000));
    }

    #[test]
    fn busiest_weekday_picks_highest_total() {
        // 2024-11-02 is a Saturday, 2024-11-04 a Monday.
        let rows = vec![
            tx((2024, 11, 2), "Food", 900, Flow::Debit),
            tx((2024, 11, 4), "Food", 500, Flow::Debit),
            tx((2024, 11, 11), "Food", 300, Flow::Debit),
        ];
        assert_eq!(busiest_weekday(&rows), Some((Weekday::Sat, Money::from_cents(90_000))));
    }

    #[test]
    fn busiest_weekday_tie_prefers_earlier_day() {
        // Tuesday and Friday with equal spend.
        let rows = vec![
            tx((2024, 11, 8), "Food", 100, Flow::Debit),
            tx((2024, 11, 5), "Food", 100, Flow::Debit),
        ];
        assert_eq!(busiest_weekday(&rows).map(|(d, _)| d), Some(Weekday::Tue));
    }

    #[test]
    fn busiest_weekday_none_without_debits() {
        let rows = vec![tx((2024, 11, 8), "Income", 100, Flow::Credit)];
        assert_eq!(busiest_weekday(&rows), None);
    }
}
