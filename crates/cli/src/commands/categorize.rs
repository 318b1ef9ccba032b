use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use anyhow::{Context, Result};

use finwise_core::TransactionFilter;
use finwise_import::{write_categorized_csv, Classifier};

use super::{load_rows, truncate};
use crate::config::Settings;

pub fn cmd_categorize(
    file: &Path,
    out: Option<&Path>,
    classifier: &Classifier,
    filter: &TransactionFilter,
    settings: &Settings,
) -> Result<()> {
    let rows = load_rows(file, classifier, filter)?;

    if let Some(out) = out {
        let writer = BufWriter::new(
            File::create(out).with_context(|| format!("Failed to create {}", out.display()))?,
        );
        write_categorized_csv(writer, &rows)
            .with_context(|| format!("Failed to write {}", out.display()))?;
        println!("✅ Wrote {} categorized transactions to {}", rows.len(), out.display());
        return Ok(());
    }

    if rows.is_empty() {
        println!("No transactions match the selected filters.");
        return Ok(());
    }

    println!();
    println!("🏷️  Categorized Transactions ({})", rows.len());
    println!("   ─────────────────────────────────────────────────────────────────────────");
    for row in &rows {
        println!(
            "   {} │ {:>14} │ {:<6} │ {:<40} │ {}",
            row.date(),
            row.amount().display_with(&settings.currency_symbol).to_string(),
            row.flow().to_string(),
            truncate(row.details(), 40),
            row.category()
        );
    }

    Ok(())
}
