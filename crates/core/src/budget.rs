use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::CoreError;
use crate::money::Money;

/// Monthly spending limits per category, owned by the caller.
///
/// A limit of zero means "no budget" and is skipped by the report.
/// Deserialized tables go through [`BudgetGoals::set`], so they obey the
/// same rules as limits set in code.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<String, Money>", into = "BTreeMap<String, Money>")]
pub struct BudgetGoals(BTreeMap<String, Money>);

impl BudgetGoals {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, category: impl Into<String>, limit: Money) -> Result<(), CoreError> {
        let category = category.into();
        if limit.is_negative() {
            return Err(CoreError::NegativeBudget {
                category,
                limit: limit.to_string(),
            });
        }
        self.0.insert(category, Money::from_decimal(limit.as_decimal()));
        Ok(())
    }

    pub fn get(&self, category: &str) -> Option<Money> {
        self.0.get(category).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Money)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Categories with a limit above zero, in name order.
    pub fn active(&self) -> impl Iterator<Item = (&str, Money)> {
        self.iter().filter(|(_, limit)| *limit > Money::zero())
    }

    /// Reset every limit to zero, keeping the category keys.
    pub fn clear(&mut self) {
        for limit in self.0.values_mut() {
            *limit = Money::zero();
        }
    }
}

impl TryFrom<BTreeMap<String, Money>> for BudgetGoals {
    type Error = CoreError;

    fn try_from(limits: BTreeMap<String, Money>) -> Result<Self, Self::Error> {
        let mut goals = BudgetGoals::new();
        for (category, limit) in limits {
            goals.set(category, limit)?;
        }
        Ok(goals)
    }
}

impl From<BudgetGoals> for BTreeMap<String, Money> {
    fn from(goals: BudgetGoals) -> Self {
        goals.0
    }
}

impl FromIterator<(String, Money)> for BudgetGoals {
    fn from_iter<I: IntoIterator<Item = (String, Money)>>(iter: I) -> Self {
        BudgetGoals(iter.into_iter().collect())
    }
}
