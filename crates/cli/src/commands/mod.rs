//! CLI command implementations
//!
//! - `categorize` - classify a statement, print or export it
//! - `analyze` - anomaly listing and category/day breakdown
//! - `report` - the full insight report

pub mod analyze;
pub mod categorize;
pub mod report;

pub use analyze::{cmd_anomalies, cmd_breakdown};
pub use categorize::cmd_categorize;
pub use report::cmd_report;

use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;

use finwise_core::{CategorizedTransaction, DateRange, TransactionFilter};
use finwise_import::{import_statement, Classifier, RuleStore};

use crate::cli::FilterArgs;

/// Shorten `s` to at most `max` characters, marking the cut with "...".
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}

pub fn build_filter(args: &FilterArgs) -> Result<TransactionFilter> {
    let mut filter = TransactionFilter::new();

    if args.from.is_some() || args.to.is_some() {
        let start = args.from.unwrap_or(NaiveDate::MIN);
        let end = args.to.unwrap_or(NaiveDate::MAX);
        if start > end {
            bail!("--from {start} is after --to {end}");
        }
        filter = filter.with_range(DateRange::new(start, end));
    }
    if !args.categories.is_empty() {
        filter = filter.with_categories(args.categories.iter().cloned());
    }

    Ok(filter)
}

pub fn load_classifier(rules: Option<&Path>) -> Result<Classifier> {
    let store = match rules {
        Some(path) => RuleStore::load(path)
            .with_context(|| format!("Failed to load rules from {}", path.display()))?,
        None => RuleStore::default_rules().context("Failed to compile built-in rules")?,
    };
    Ok(Classifier::new(Arc::new(store)))
}

/// Import, classify and filter a statement.
pub fn load_rows(
    file: &Path,
    classifier: &Classifier,
    filter: &TransactionFilter,
) -> Result<Vec<CategorizedTransaction>> {
    let statement = import_statement(file)
        .with_context(|| format!("Failed to import {}", file.display()))?;

    if !statement.dropped.is_empty() {
        eprintln!(
            "⚠️  Skipped {} invalid row(s) in {}",
            statement.dropped.len(),
            file.display()
        );
        for row in &statement.dropped {
            eprintln!("   line {}: {}", row.line, row.reason);
        }
    }

    let rows = classifier.categorize_all(statement.transactions);
    if filter.is_empty() {
        Ok(rows)
    } else {
        Ok(filter.apply(&rows))
    }
}
