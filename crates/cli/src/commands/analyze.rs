use std::path::Path;

use anyhow::{Context, Result};

use finwise_analysis::{category_breakdown, daily_totals, AnomalyDetector};
use finwise_core::TransactionFilter;
use finwise_import::Classifier;

use super::{load_rows, truncate};
use crate::config::Settings;

pub fn cmd_anomalies(
    file: &Path,
    json: bool,
    classifier: &Classifier,
    filter: &TransactionFilter,
    settings: &Settings,
) -> Result<()> {
    let rows = load_rows(file, classifier, filter)?;
    let detector = AnomalyDetector::new(settings.threshold);

    let mut anomalies = detector.detect(&rows);
    anomalies.sort_by_key(|a| a.transaction.date());

    if json {
        let out = serde_json::to_string_pretty(&anomalies).context("serialize anomalies")?;
        println!("{out}");
        return Ok(());
    }

    if anomalies.is_empty() {
        println!(
            "No significant spending anomalies detected (threshold {:.2}).",
            detector.threshold()
        );
        return Ok(());
    }

    println!();
    println!(
        "🚨 Anomalies ({} flagged, threshold {:.2})",
        anomalies.len(),
        detector.threshold()
    );
    println!("   ─────────────────────────────────────────────────────────────────────────");
    for a in &anomalies {
        let tx = a.transaction;
        println!(
            "   {} │ {:>14} │ {:<30} │ {:<20} │ {}",
            tx.date(),
            tx.amount().display_with(&settings.currency_symbol).to_string(),
            truncate(tx.details(), 30),
            truncate(tx.category(), 20),
            a.reason
        );
    }

    Ok(())
}

pub fn cmd_breakdown(
    file: &Path,
    classifier: &Classifier,
    filter: &TransactionFilter,
    settings: &Settings,
) -> Result<()> {
    let rows = load_rows(file, classifier, filter)?;
    let breakdown = category_breakdown(&rows);

    if breakdown.is_empty() {
        println!("No expense data available for the selected filters.");
        return Ok(());
    }

    let money = |m: finwise_core::Money| m.display_with(&settings.currency_symbol).to_string();

    println!();
    println!("📊 Category Breakdown");
    println!("   ─────────────────────────────────────────────────────────────");
    println!("   {:<24} │ {:>14} │ {:>5} │ {:>14}", "Category", "Total", "Count", "Average");
    for s in &breakdown {
        println!(
            "   {:<24} │ {:>14} │ {:>5} │ {:>14}",
            truncate(&s.category, 24),
            money(s.total),
            s.count,
            money(s.average)
        );
    }

    println!();
    println!("📅 Daily Spending");
    println!("   ─────────────────────────────");
    for (day, total) in daily_totals(&rows) {
        println!("   {} │ {:>14}", day, money(total));
    }

    Ok(())
}
