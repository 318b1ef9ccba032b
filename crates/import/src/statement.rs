use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

use finwise_core::{Flow, Money, Transaction};

pub const DATE_COLUMN: &str = "Date";
pub const DETAILS_COLUMN: &str = "Details";
pub const AMOUNT_COLUMN: &str = "Amount";
pub const FLOW_COLUMN: &str = "Debit/Credit";

/// Accepted date encodings, tried in order.
const DATE_FORMATS: [&str; 2] = ["%d %b %Y", "%Y-%m-%d"];
const CURRENCY_SYMBOLS: [char; 4] = ['₹', '$', '€', '£'];

#[derive(Error, Debug)]
pub enum ImportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Missing required column: {0}")]
    MissingColumn(String),
    #[error("No valid transactions remaining after cleaning ({dropped} rows dropped)")]
    NoValidRows { dropped: usize },
}

/// Why a row was left out of the cleaned statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropReason {
    InvalidAmount(String),
    InvalidDate(String),
    InvalidFlow(String),
    MissingDetails,
}

impl fmt::Display for DropReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DropReason::InvalidAmount(v) => {
                write!(f, "amount '{v}' is not a non-negative number within range")
            }
            DropReason::InvalidDate(v) => {
                write!(f, "date '{v}' is not in 'DD Mon YYYY' or 'YYYY-MM-DD' format")
            }
            DropReason::InvalidFlow(v) => {
                write!(f, "'{v}' is not a valid Debit/Credit value (expected 'Debit' or 'Credit')")
            }
            DropReason::MissingDetails => write!(f, "details are empty"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DroppedRow {
    /// 1-based line in the source file.
    pub line: u64,
    pub reason: DropReason,
}

/// Cleaned rows plus the ones that were rejected.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Statement {
    pub transactions: Vec<Transaction>,
    pub dropped: Vec<DroppedRow>,
}

struct Columns {
    date: usize,
    details: usize,
    amount: usize,
    flow: usize,
}

impl Columns {
    fn locate(headers: &csv::StringRecord) -> Result<Self, ImportError> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim() == name)
                .ok_or_else(|| ImportError::MissingColumn(name.to_string()))
        };
        Ok(Columns {
            date: find(DATE_COLUMN)?,
            details: find(DETAILS_COLUMN)?,
            amount: find(AMOUNT_COLUMN)?,
            flow: find(FLOW_COLUMN)?,
        })
    }
}

pub fn import_statement(path: &Path) -> Result<Statement, ImportError> {
    let file = File::open(path)?;
    let statement = read_statement(file)?;
    tracing::info!(
        path = %path.display(),
        rows = statement.transactions.len(),
        dropped = statement.dropped.len(),
        "Imported statement"
    );
    Ok(statement)
}

/// Parse a `Date, Details, Amount, Debit/Credit` CSV. Bad rows are dropped
/// and reported; a missing column or an empty result is an error.
pub fn read_statement<R: Read>(data: R) -> Result<Statement, ImportError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(data);

    let columns = Columns::locate(reader.headers()?)?;
    let mut statement = Statement::default();

    for result in reader.records() {
        let record = result?;
        if record.iter().all(|field| field.trim().is_empty()) {
            continue;
        }
        let line = record.position().map(|p| p.line()).unwrap_or_default();

        match parse_row(&record, &columns) {
            Ok(tx) => statement.transactions.push(tx),
            Err(reason) => {
                tracing::warn!(line, %reason, "Dropping statement row");
                statement.dropped.push(DroppedRow { line, reason });
            }
        }
    }

    if statement.transactions.is_empty() {
        return Err(ImportError::NoValidRows {
            dropped: statement.dropped.len(),
        });
    }

    Ok(statement)
}

fn parse_row(record: &csv::StringRecord, columns: &Columns) -> Result<Transaction, DropReason> {
    let field = move |idx: usize| record.get(idx).unwrap_or_default().trim();

    let amount = parse_amount(field(columns.amount))?;
    let date = parse_date(field(columns.date))?;
    let flow = Flow::from_str(field(columns.flow))
        .map_err(|_| DropReason::InvalidFlow(field(columns.flow).to_string()))?;
    let details = field(columns.details);
    if details.is_empty() {
        return Err(DropReason::MissingDetails);
    }

    Ok(Transaction::new(date, details, amount, flow))
}

fn parse_date(s: &str) -> Result<NaiveDate, DropReason> {
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .ok_or_else(|| DropReason::InvalidDate(s.to_string()))
}

/// Strips thousands separators and currency symbols before parsing.
fn parse_amount(s: &str) -> Result<Money, DropReason> {
    let cleaned: String = s
        .chars()
        .filter(|c| *c != ',' && !c.is_whitespace() && !CURRENCY_SYMBOLS.contains(c))
        .collect();
    match Decimal::from_str(&cleaned) {
        Ok(dec) if !dec.is_sign_negative() || dec.is_zero() => {
            let money = Money::from_decimal(dec);
            if money.within_limit() {
                Ok(money)
            } else {
                Err(DropReason::InvalidAmount(s.to_string()))
            }
        }
        _ => Err(DropReason::InvalidAmount(s.to_string())),
    }
}
