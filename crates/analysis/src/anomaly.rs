//! Per-category z-score outlier detection over debit transactions.

use serde::Serialize;
use std::collections::BTreeMap;

use finwise_core::{CategorizedTransaction, Money};

pub const DEFAULT_THRESHOLD: f64 = 2.5;

/// Mean and sample standard deviation of one category's debit amounts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CategoryStats {
    pub count: usize,
    pub mean: f64,
    /// `None` when the category has a single member or every amount is
    /// identical; such categories never produce anomalies.
    pub std_dev: Option<f64>,
}

impl CategoryStats {
    fn from_amounts(amounts: &[Money]) -> Self {
        let count = amounts.len();
        let values: Vec<f64> = amounts.iter().map(|m| m.to_f64()).collect();
        let mean = values.iter().sum::<f64>() / count as f64;

        // Zero spread is decided on the exact decimals, not the f64 copies.
        let spread = amounts.iter().max() != amounts.iter().min();
        let std_dev = if count > 1 && spread {
            let variance =
                values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (count - 1) as f64;
            Some(variance.sqrt()).filter(|sd| *sd > 0.0)
        } else {
            None
        };

        CategoryStats { count, mean, std_dev }
    }

    pub fn z_score(&self, amount: Money) -> Option<f64> {
        self.std_dev.map(|sd| (amount.to_f64() - self.mean) / sd)
    }
}

/// Statistics for every category that has at least one debit.
pub fn category_stats(transactions: &[CategorizedTransaction]) -> BTreeMap<&str, CategoryStats> {
    let mut amounts: BTreeMap<&str, Vec<Money>> = BTreeMap::new();
    for tx in transactions.iter().filter(|tx| tx.is_debit()) {
        amounts.entry(tx.category()).or_default().push(tx.amount());
    }
    amounts
        .into_iter()
        .map(|(category, values)| (category, CategoryStats::from_amounts(&values)))
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    High,
    Low,
}

/// A flagged debit and why it was flagged.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnomalyRecord<'a> {
    pub transaction: &'a CategorizedTransaction,
    pub z_score: f64,
    pub reason: String,
}

impl AnomalyRecord<'_> {
    pub fn direction(&self) -> Direction {
        if self.z_score > 0.0 {
            Direction::High
        } else {
            Direction::Low
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnomalyDetector {
    threshold: f64,
}

impl Default for AnomalyDetector {
    fn default() -> Self {
        Self::new(DEFAULT_THRESHOLD)
    }
}

impl AnomalyDetector {
    /// Negative or NaN thresholds are treated as zero.
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold: threshold.max(0.0),
        }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Flag debits whose |z| within their category exceeds the threshold.
    /// Output order follows the input; callers sort as they need.
    pub fn detect<'a>(&self, transactions: &'a [CategorizedTransaction]) -> Vec<AnomalyRecord<'a>> {
        let stats = category_stats(transactions);
        if stats.is_empty() {
            return Vec::new();
        }

        let anomalies: Vec<_> = transactions
            .iter()
            .filter(|tx| tx.is_debit())
            .filter_map(|tx| {
                let z_score = stats.get(tx.category())?.z_score(tx.amount())?;
                (z_score.abs() > self.threshold).then(|| AnomalyRecord {
                    transaction: tx,
                    z_score,
                    reason: reason(z_score),
                })
            })
            .collect();

        tracing::debug!(
            threshold = self.threshold,
            categories = stats.len(),
            flagged = anomalies.len(),
            "Anomaly detection finished"
        );
        anomalies
    }
}

fn reason(z_score: f64) -> String {
    let label = if z_score > 0.0 {
        "Unusually high expense"
    } else {
        "Unusually low expense"
    };
    format!("{label} (Z-score: {z_score:.2})")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use finwise_core::{Flow, Transaction};

    fn tx(day: u32, category: &str, units: i64, flow: Flow) -> CategorizedTransaction {
        CategorizedTransaction::new(
            Transaction::new(
                NaiveDate::from_ymd_opt(2024, 11, day).unwrap(),
                format!("{category} #{day}"),
                Money::from_cents(units * 100),
                flow,
            ),
            category,
        )
    }

    fn debits(category: &str, amounts: &[i64]) -> Vec<CategorizedTransaction> {
        amounts
            .iter()
            .enumerate()
            .map(|(i, a)| tx(i as u32 + 1, category, *a, Flow::Debit))
            .collect()
    }

    #[test]
    fn stats_use_sample_standard_deviation() {
        let rows = debits("Food", &[100, 100, 100, 500]);
        let stats = category_stats(&rows);
        let food = stats["Food"];
        assert_eq!(food.count, 4);
        assert!((food.mean - 200.0).abs() < 1e-9);
        assert!((food.std_dev.unwrap() - 200.0).abs() < 1e-9);
        assert!((food.z_score(Money::from_cents(50_000)).unwrap() - 1.5).abs() < 1e-9);
        assert!((food.z_score(Money::from_cents(10_000)).unwrap() + 0.5).abs() < 1e-9);
    }

    #[test]
    fn default_threshold_flags_nothing_in_mild_spread() {
        let rows = debits("Food", &[100, 100, 100, 500]);
        assert!(AnomalyDetector::default().detect(&rows).is_empty());
    }

    #[test]
    fn lower_threshold_flags_only_the_spike() {
        let rows = debits("Food", &[100, 100, 100, 500]);
        let found = AnomalyDetector::new(1.0).detect(&rows);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].transaction.amount(), Money::from_cents(50_000));
        assert_eq!(found[0].direction(), Direction::High);
        assert_eq!(found[0].reason, "Unusually high expense (Z-score: 1.50)");
    }

    #[test]
    fn unusually_low_expense() {
        let rows = debits("Rent", &[1000, 1000, 1000, 1000, 1000, 10]);
        let found = AnomalyDetector::new(2.0).detect(&rows);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].direction(), Direction::Low);
        assert_eq!(found[0].reason, "Unusually low expense (Z-score: -2.04)");
    }

    #[test]
    fn zero_variance_category_never_flags() {
        let mut rows = debits("Subscriptions", &[649, 649, 649, 649]);
        rows.extend(debits("Food", &[10, 10, 10, 10, 10, 10, 10, 10, 10, 500]));
        let found = AnomalyDetector::new(0.0).detect(&rows);
        assert!(found.iter().all(|a| a.transaction.category() == "Food"));
        assert!(category_stats(&rows)["Subscriptions"].std_dev.is_none());
    }

    #[test]
    fn single_member_category_is_ineligible() {
        let rows = debits("Travel", &[25_000]);
        assert!(category_stats(&rows)["Travel"].std_dev.is_none());
        assert!(AnomalyDetector::new(0.0).detect(&rows).is_empty());
    }

    #[test]
    fn credits_are_ignored() {
        let mut rows = debits("Food", &[10, 10, 10, 10, 10, 10, 10, 10, 10, 10]);
        rows.push(tx(20, "Food", 100_000, Flow::Credit));
        assert!(AnomalyDetector::new(0.0).detect(&rows).is_empty());
    }

    #[test]
    fn no_debits_is_empty_not_error() {
        let rows = vec![tx(1, "Income", 80_000, Flow::Credit)];
        assert!(AnomalyDetector::default().detect(&rows).is_empty());
        assert!(AnomalyDetector::default().detect(&[]).is_empty());
    }

    #[test]
    fn categories_are_scored_independently() {
        // 500 is ordinary for Travel but extreme for Food.
        let mut rows = debits("Travel", &[400, 500, 600, 450, 550]);
        rows.extend(debits("Food", &[20, 25, 22, 18, 21, 24, 19, 23, 20, 500]));
        let found = AnomalyDetector::default().detect(&rows);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].transaction.category(), "Food");
    }

    #[test]
    fn raising_threshold_never_adds_anomalies() {
        let mut rows = debits("Food", &[20, 25, 22, 18, 21, 24, 19, 23, 20, 500, 1]);
        rows.extend(debits("Shopping", &[800, 2500, 1200, 15000, 900, 3000]));
        let thresholds = [0.0, 0.5, 1.0, 1.5, 2.0, 2.5, 3.0, 5.0];
        let counts: Vec<usize> = thresholds
            .iter()
            .map(|t| AnomalyDetector::new(*t).detect(&rows).len())
            .collect();
        assert!(counts.windows(2).all(|w| w[0] >= w[1]), "counts: {counts:?}");
    }

    #[test]
    fn negative_threshold_is_clamped() {
        assert_eq!(AnomalyDetector::new(-1.0).threshold(), 0.0);
        assert_eq!(AnomalyDetector::new(f64::NAN).threshold(), 0.0);
    }
}
