use serde::Serialize;
use std::io::Write;

use finwise_core::{CategorizedTransaction, Flow};

use crate::statement::ImportError;

const HEADER: [&str; 5] = ["Date", "Details", "Amount", "Debit/Credit", "Category"];

#[derive(Serialize)]
struct ExportRow<'a> {
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Details")]
    details: &'a str,
    #[serde(rename = "Amount")]
    amount: String,
    #[serde(rename = "Debit/Credit")]
    flow: Flow,
    #[serde(rename = "Category")]
    category: &'a str,
}

/// Write categorized rows as CSV in the same column layout the importer
/// reads, plus a trailing `Category` column.
pub fn write_categorized_csv<W: Write>(
    writer: W,
    rows: &[CategorizedTransaction],
) -> Result<(), ImportError> {
    let mut out = csv::WriterBuilder::new().has_headers(false).from_writer(writer);
    out.write_record(HEADER)?;
    for row in rows {
        out.serialize(ExportRow {
            date: row.date().format("%Y-%m-%d").to_string(),
            details: row.details(),
            amount: format!("{:.2}", row.amount().as_decimal()),
            flow: row.flow(),
            category: row.category(),
        })?;
    }
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::statement::read_statement;
    use chrono::NaiveDate;
    use finwise_core::{Money, Transaction};

    fn row(details: &str, cents: i64, flow: Flow, category: &str) -> CategorizedTransaction {
        CategorizedTransaction::new(
            Transaction::new(
                NaiveDate::from_ymd_opt(2024, 11, 5).unwrap(),
                details,
                Money::from_cents(cents),
                flow,
            ),
            category,
        )
    }

    #[test]
    fn writes_header_and_rows() {
        let rows = vec![
            row("Zara Store Purchase", 450_000, Flow::Debit, "Shopping"),
            row("Salary, November", 8_000_000, Flow::Credit, "Income"),
        ];
        let mut buf = Vec::new();
        write_categorized_csv(&mut buf, &rows).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<_> = text.lines().collect();

        assert_eq!(lines[0], "Date,Details,Amount,Debit/Credit,Category");
        assert_eq!(lines[1], "2024-11-05,Zara Store Purchase,4500.00,Debit,Shopping");
        assert_eq!(lines[2], "2024-11-05,\"Salary, November\",80000.00,Credit,Income");
    }

    #[test]
    fn empty_export_still_has_header() {
        let mut buf = Vec::new();
        write_categorized_csv(&mut buf, &[]).unwrap();
        assert_eq!(String::from_utf8(buf.clone()).unwrap(), "Date,Details,Amount,Debit/Credit,Category\n");

        // Headers are intact, so the failure is "no rows" rather than a missing column.
        assert!(matches!(
            read_statement(buf.as_slice()),
            Err(ImportError::NoValidRows { dropped: 0 })
        ));
    }

    #[test]
    fn exported_file_reimports() {
        let rows = vec![row("Uber Ride", 32_000, Flow::Debit, "Transportation")];
        let mut buf = Vec::new();
        write_categorized_csv(&mut buf, &rows).unwrap();

        let statement = read_statement(buf.as_slice()).unwrap();
        assert_eq!(statement.transactions, vec![rows[0].transaction().clone()]);
    }
}
