//! `finwise.toml` loading and flag overrides.
//!
//! ```toml
//! rules = "rules.toml"
//! threshold = 2.5
//! currency_symbol = "₹"
//!
//! [budgets]
//! "Food & Dining" = 5000
//! ```
//!
//! `budgets` may also be a path to a TOML or JSON file. Relative paths are
//! resolved against the directory holding the config file.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use finwise_analysis::DEFAULT_THRESHOLD;
use finwise_core::BudgetGoals;

pub const CONFIG_FILE: &str = "finwise.toml";
pub const DEFAULT_CURRENCY: &str = "₹";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub rules: Option<PathBuf>,
    pub budgets: Option<BudgetSource>,
    pub threshold: Option<f64>,
    pub currency_symbol: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BudgetSource {
    File(PathBuf),
    Inline(BudgetGoals),
}

/// Everything a command needs once the config file and flags are merged.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub rules: Option<PathBuf>,
    pub budgets: BudgetGoals,
    pub threshold: f64,
    pub currency_symbol: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            rules: None,
            budgets: BudgetGoals::new(),
            threshold: DEFAULT_THRESHOLD,
            currency_symbol: DEFAULT_CURRENCY.to_string(),
        }
    }
}

/// Flag values that take precedence over the config file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub rules: Option<PathBuf>,
    pub budgets: Option<PathBuf>,
    pub threshold: Option<f64>,
}

impl Config {
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("parse finwise.toml")
    }

    /// An explicit path must exist; otherwise `./finwise.toml` is used when
    /// present and defaults when not.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => {
                let p = PathBuf::from(CONFIG_FILE);
                if !p.exists() {
                    return Ok(Config::default());
                }
                p
            }
        };

        let s = fs::read_to_string(&path).with_context(|| format!("read {}", path.display()))?;
        let config = Self::parse(&s).with_context(|| format!("load {}", path.display()))?;
        tracing::debug!(path = %path.display(), "Loaded config");

        let base = path.parent().unwrap_or_else(|| Path::new(""));
        Ok(config.relative_to(base))
    }

    fn relative_to(mut self, base: &Path) -> Self {
        self.rules = self.rules.map(|p| base.join(p));
        if let Some(BudgetSource::File(p)) = self.budgets {
            self.budgets = Some(BudgetSource::File(base.join(p)));
        }
        self
    }

    pub fn resolve(self, overrides: Overrides) -> Result<Settings> {
        let budgets = match (overrides.budgets, self.budgets) {
            (Some(path), _) | (None, Some(BudgetSource::File(path))) => load_budgets(&path)?,
            (None, Some(BudgetSource::Inline(goals))) => goals,
            (None, None) => BudgetGoals::new(),
        };

        let threshold = overrides
            .threshold
            .or(self.threshold)
            .unwrap_or(DEFAULT_THRESHOLD);
        if threshold.is_nan() || threshold < 0.0 {
            bail!("threshold must be a non-negative number (got {threshold})");
        }

        Ok(Settings {
            rules: overrides.rules.or(self.rules),
            budgets,
            threshold,
            currency_symbol: self
                .currency_symbol
                .unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
        })
    }
}

/// Read a `category = limit` table from a `.toml` or `.json` file.
pub fn load_budgets(path: &Path) -> Result<BudgetGoals> {
    let s = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let goals = match path.extension().and_then(|e| e.to_str()) {
        Some("json") => serde_json::from_str(&s)
            .with_context(|| format!("parse budgets {}", path.display()))?,
        _ => toml::from_str(&s).with_context(|| format!("parse budgets {}", path.display()))?,
    };
    Ok(goals)
}
