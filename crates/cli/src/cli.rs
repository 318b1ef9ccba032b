//! CLI argument definitions using clap
//!
//! The command implementations live in the `commands` module.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

/// Finwise - categorize a bank statement and explain where the money went
#[derive(Parser)]
#[command(name = "finwise")]
#[command(about = "Rule-based transaction categorizer and spending analyzer", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Config file (defaults to ./finwise.toml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Category rule file (.toml or .json), overrides the config file
    #[arg(long, global = true)]
    pub rules: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Categorize every transaction in a statement
    Categorize {
        /// Statement CSV (Date, Details, Amount, Debit/Credit)
        file: PathBuf,

        /// Write the categorized rows to this CSV instead of printing them
        #[arg(short, long)]
        out: Option<PathBuf>,

        #[command(flatten)]
        filter: FilterArgs,
    },

    /// List unusually large or small expenses
    Anomalies {
        file: PathBuf,

        /// Z-score a debit must exceed (in absolute value) to be flagged
        #[arg(short, long)]
        threshold: Option<f64>,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Spending per category and per day
    Breakdown {
        file: PathBuf,

        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Full insight report
    Report {
        file: PathBuf,

        /// Monthly budget limits per category (.toml or .json)
        #[arg(short, long)]
        budgets: Option<PathBuf>,

        /// Z-score threshold used for the anomaly section
        #[arg(short, long)]
        threshold: Option<f64>,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        filter: FilterArgs,
    },
}

#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// Only keep transactions on or after this date (YYYY-MM-DD)
    #[arg(long)]
    pub from: Option<NaiveDate>,

    /// Only keep transactions on or before this date (YYYY-MM-DD)
    #[arg(long)]
    pub to: Option<NaiveDate>,

    /// Only keep these categories (repeatable)
    #[arg(short, long = "category")]
    pub categories: Vec<String>,
}
