//! Finwise CLI - categorize bank statements and summarize spending
//!
//! Usage:
//!   finwise categorize statement.csv [--out categorized.csv]
//!   finwise anomalies statement.csv [--threshold 2.5] [--json]
//!   finwise breakdown statement.csv [--from 2024-11-01] [--category Groceries]
//!   finwise report statement.csv [--budgets budgets.toml]

mod cli;
mod commands;
mod config;


use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;
use config::{Config, Overrides};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr).compact())
        .init();

    let config = Config::load(cli.config.as_deref())?;
    let mut overrides = Overrides {
        rules: cli.rules,
        ..Overrides::default()
    };

    match cli.command {
        Commands::Categorize { file, out, filter } => {
            let settings = config.resolve(overrides)?;
            let classifier = commands::load_classifier(settings.rules.as_deref())?;
            let filter = commands::build_filter(&filter)?;
            commands::cmd_categorize(&file, out.as_deref(), &classifier, &filter, &settings)
        }
        Commands::Anomalies {
            file,
            threshold,
            json,
            filter,
        } => {
            overrides.threshold = threshold;
            let settings = config.resolve(overrides)?;
            let classifier = commands::load_classifier(settings.rules.as_deref())?;
            let filter = commands::build_filter(&filter)?;
            commands::cmd_anomalies(&file, json, &classifier, &filter, &settings)
        }
        Commands::Breakdown { file, filter } => {
            let settings = config.resolve(overrides)?;
            let classifier = commands::load_classifier(settings.rules.as_deref())?;
            let filter = commands::build_filter(&filter)?;
            commands::cmd_breakdown(&file, &classifier, &filter, &settings)
        }
        Commands::Report {
            file,
            budgets,
            threshold,
            json,
            filter,
        } => {
            overrides.budgets = budgets;
            overrides.threshold = threshold;
            let settings = config.resolve(overrides)?;
            let classifier = commands::load_classifier(settings.rules.as_deref())?;
            let filter = commands::build_filter(&filter)?;
            commands::cmd_report(&file, json, &classifier, &filter, &settings)
        }
    }
}
