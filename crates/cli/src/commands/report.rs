use std::path::Path;

use anyhow::{Context, Result};

use finwise_analysis::{AnomalyDetector, InsightAggregator};
use finwise_core::TransactionFilter;
use finwise_import::Classifier;

use super::load_rows;
use crate::config::Settings;

pub fn cmd_report(
    file: &Path,
    json: bool,
    classifier: &Classifier,
    filter: &TransactionFilter,
    settings: &Settings,
) -> Result<()> {
    let rows = load_rows(file, classifier, filter)?;
    if rows.is_empty() {
        println!("No transactions match the selected filters.");
        return Ok(());
    }

    let mut anomalies = AnomalyDetector::new(settings.threshold).detect(&rows);
    anomalies.sort_by_key(|a| a.transaction.date());

    let insights = InsightAggregator::new(settings.currency_symbol.as_str()).summarize(
        &rows,
        &settings.budgets,
        &anomalies,
    );

    if json {
        let out = serde_json::to_string_pretty(&insights).context("serialize report")?;
        println!("{out}");
    } else {
        println!();
        print!("{insights}");
    }

    Ok(())
}
