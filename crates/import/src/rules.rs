//! Ordered category rules and the first-match classifier built on them.
//!
//! A rule file maps category names to regular expressions. Order matters: a
//! debit is assigned to the first category (in file order) with a matching
//! pattern. The reserved `Income` category is only consulted for credits, and
//! every credit ends up as `Income` whether or not a pattern matched.

use regex::{Regex, RegexBuilder};
use serde::de::{Deserializer, MapAccess, SeqAccess, Visitor};
use serde::Deserialize;
use std::collections::HashSet;
use std::fmt;
use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock};
use thiserror::Error;

use finwise_core::{CategorizedTransaction, Flow, Money, Transaction};

/// Reserved category for credits.
pub const INCOME: &str = "Income";
/// Fallback for debits no rule matched.
pub const OTHER: &str = "Other";

const DEFAULT_RULES: &str = include_str!("../rules/default.toml");

#[derive(Debug, Error)]
pub enum RuleError {
    #[error("Invalid pattern '{pattern}' in category '{category}': {source}")]
    InvalidPattern {
        category: String,
        pattern: String,
        #[source]
        source: regex::Error,
    },
    #[error("Category '{0}' is defined more than once")]
    DuplicateCategory(String),
    #[error("Failed to parse TOML rules: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Failed to parse JSON rules: {0}")]
    Json(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Unsupported rule file '{0}' (expected .toml or .json)")]
    UnsupportedFormat(String),
}

/// Uncompiled rule table, entries in document order.
///
/// Deserializes from either a map (`{"Food": ["swiggy"]}`) or a list of
/// `{name, patterns}` entries. Map order is taken from the document itself,
/// never from a hash map.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleTable(pub Vec<(String, Vec<String>)>);

#[derive(Deserialize)]
struct RuleEntry {
    name: String,
    patterns: Vec<String>,
}

struct RuleTableVisitor;

impl<'de> Visitor<'de> for RuleTableVisitor {
    type Value = RuleTable;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map of category names to pattern lists, or a list of {name, patterns}")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<RuleTable, A::Error> {
        let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
        while let Some((name, patterns)) = map.next_entry::<String, Vec<String>>()? {
            entries.push((name, patterns));
        }
        Ok(RuleTable(entries))
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<RuleTable, A::Error> {
        let mut entries = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(entry) = seq.next_element::<RuleEntry>()? {
            entries.push((entry.name, entry.patterns));
        }
        Ok(RuleTable(entries))
    }
}

impl<'de> Deserialize<'de> for RuleTable {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(RuleTableVisitor)
    }
}

/// One category with its precompiled, case-insensitive patterns.
#[derive(Debug, Clone)]
pub struct CategoryRules {
    name: String,
    patterns: Vec<Regex>,
}

impl CategoryRules {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn patterns(&self) -> &[Regex] {
        &self.patterns
    }

    /// Patterns are tried in order and the search stops at the first hit.
    pub fn matches(&self, text: &str) -> bool {
        self.patterns.iter().any(|re| re.is_match(text))
    }
}

/// Immutable, ordered category → patterns table.
#[derive(Debug, Clone, Default)]
pub struct RuleStore {
    categories: Vec<CategoryRules>,
}

impl RuleStore {
    pub fn compile(table: RuleTable) -> Result<Self, RuleError> {
        let mut seen = HashSet::new();
        let mut categories = Vec::with_capacity(table.0.len());

        for (name, raw_patterns) in table.0 {
            if !seen.insert(name.clone()) {
                return Err(RuleError::DuplicateCategory(name));
            }
            let patterns = raw_patterns
                .into_iter()
                .map(|pattern| {
                    RegexBuilder::new(&pattern)
                        .case_insensitive(true)
                        .build()
                        .map_err(|source| RuleError::InvalidPattern {
                            category: name.clone(),
                            pattern,
                            source,
                        })
                })
                .collect::<Result<Vec<_>, _>>()?;
            categories.push(CategoryRules { name, patterns });
        }

        Ok(Self { categories })
    }

    pub fn from_toml(content: &str) -> Result<Self, RuleError> {
        let table: RuleTable = toml::from_str(content)?;
        Self::compile(table)
    }

    pub fn from_json(content: &str) -> Result<Self, RuleError> {
        let table: RuleTable = serde_json::from_str(content)?;
        Self::compile(table)
    }

    /// Load a `.toml` or `.json` rule file.
    pub fn load(path: &Path) -> Result<Self, RuleError> {
        let content = std::fs::read_to_string(path)?;
        let store = match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => Self::from_toml(&content)?,
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::from_json(&content)?,
            _ => return Err(RuleError::UnsupportedFormat(path.display().to_string())),
        };
        tracing::info!(
            path = %path.display(),
            categories = store.len(),
            patterns = store.pattern_count(),
            "Loaded category rules"
        );
        Ok(store)
    }

    /// The bundled rule table.
    pub fn default_rules() -> Result<Self, RuleError> {
        Self::from_toml(DEFAULT_RULES)
    }

    pub fn categories(&self) -> &[CategoryRules] {
        &self.categories
    }

    pub fn category(&self, name: &str) -> Option<&CategoryRules> {
        self.categories.iter().find(|c| c.name == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.categories.iter().map(|c| c.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    pub fn pattern_count(&self) -> usize {
        self.categories.iter().map(|c| c.patterns.len()).sum()
    }
}

/// Assigns a category to a transaction from a fixed rule table.
#[derive(Debug, Clone)]
pub struct Classifier {
    rules: Arc<RuleStore>,
}

impl Classifier {
    pub fn new(rules: Arc<RuleStore>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &RuleStore {
        &self.rules
    }

    /// Category for one transaction. Never fails; the amount does not
    /// influence the result.
    pub fn classify(&self, details: &str, _amount: Money, flow: Flow) -> &str {
        let has_text = !details.is_empty();

        match flow {
            Flow::Credit => {
                let matched = has_text
                    && self
                        .rules
                        .category(INCOME)
                        .is_some_and(|income| income.matches(details));
                tracing::trace!(details, matched, "credit classified as income");
                INCOME
            }
            Flow::Debit => {
                if !has_text {
                    return OTHER;
                }
                self.rules
                    .categories
                    .iter()
                    .filter(|c| c.name != INCOME)
                    .find(|c| c.matches(details))
                    .map(|c| c.name.as_str())
                    .unwrap_or(OTHER)
            }
        }
    }

    pub fn categorize(&self, tx: Transaction) -> CategorizedTransaction {
        let category = self.classify(&tx.details, tx.amount, tx.flow).to_string();
        CategorizedTransaction::new(tx, category)
    }

    pub fn categorize_all<I>(&self, transactions: I) -> Vec<CategorizedTransaction>
    where
        I: IntoIterator<Item = Transaction>,
    {
        let rows: Vec<_> = transactions.into_iter().map(|tx| self.categorize(tx)).collect();
        let uncategorized = rows.iter().filter(|r| r.category() == OTHER).count();
        tracing::info!(rows = rows.len(), uncategorized, "Categorized transactions");
        rows
    }
}

/// Holder for the live rule table that can be swapped while readers run.
///
/// Readers take an `Arc` snapshot; a reload replaces the whole table at once,
/// so a classification sees either the old table or the new one.
#[derive(Debug, Default)]
pub struct SharedRules {
    current: RwLock<Arc<RuleStore>>,
}

impl SharedRules {
    pub fn new(store: RuleStore) -> Self {
        Self {
            current: RwLock::new(Arc::new(store)),
        }
    }

    pub fn snapshot(&self) -> Arc<RuleStore> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn classifier(&self) -> Classifier {
        Classifier::new(self.snapshot())
    }

    /// Install `store`, returning the table it replaced.
    pub fn reload(&self, store: RuleStore) -> Arc<RuleStore> {
        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        std::mem::replace(&mut *guard, Arc::new(store))
    }

    /// Compile `path` and swap it in. On error the current table stays.
    pub fn reload_from(&self, path: &Path) -> Result<(), RuleError> {
        let store = RuleStore::load(path)?;
        self.reload(store);
        Ok(())
    }
}
