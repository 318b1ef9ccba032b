//! Narrative summary of a categorized batch.
//!
//! Sections are produced in a fixed order: totals, top categories, average
//! expense, budget adherence, anomalies, busiest weekday and month-over-month
//! change. Without any debit only the totals and a notice are produced.

use chrono::{NaiveDate, Weekday};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

use finwise_core::{BudgetGoals, CategorizedTransaction, Money, YearMonth};

use crate::anomaly::AnomalyRecord;
use crate::stats::{busiest_weekday, category_breakdown, monthly_totals};

/// How many anomalies are spelled out before the rest are summarised.
const ANOMALY_DETAIL_LIMIT: usize = 3;
/// Leader plus up to two runners-up.
const TOP_CATEGORY_LIMIT: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    Totals,
    TopCategories,
    AverageExpense,
    BudgetAdherence,
    Anomalies,
    SpendingDay,
    MonthOverMonth,
    NoExpenseData,
}

impl SectionKind {
    pub fn title(self) -> &'static str {
        match self {
            SectionKind::Totals => "Overall Financial Snapshot",
            SectionKind::TopCategories => "Spending Habits",
            SectionKind::AverageExpense => "Average Expense",
            SectionKind::BudgetAdherence => "Budget Adherence",
            SectionKind::Anomalies => "Anomaly Detection",
            SectionKind::SpendingDay => "Behavioral Insights",
            SectionKind::MonthOverMonth => "Monthly Trend",
            SectionKind::NoExpenseData => "Spending Insights",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InsightSection {
    pub kind: SectionKind,
    pub lines: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Insights {
    pub sections: Vec<InsightSection>,
}

impl Insights {
    pub fn section(&self, kind: SectionKind) -> Option<&InsightSection> {
        self.sections.iter().find(|s| s.kind == kind)
    }

    /// Every finding in report order.
    pub fn findings(&self) -> Vec<String> {
        self.sections.iter().flat_map(|s| s.lines.iter().cloned()).collect()
    }
}

impl fmt::Display for Insights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, section) in self.sections.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            writeln!(f, "{}:", section.kind.title())?;
            for line in &section.lines {
                writeln!(f, "- {line}")?;
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsightAggregator {
    currency_symbol: String,
}

impl Default for InsightAggregator {
    fn default() -> Self {
        Self::new("₹")
    }
}

impl InsightAggregator {
    pub fn new(currency_symbol: impl Into<String>) -> Self {
        Self {
            currency_symbol: currency_symbol.into(),
        }
    }

    fn money(&self, amount: Money) -> String {
        amount.display_with(&self.currency_symbol).to_string()
    }

    /// Build the report for an already filtered batch. `anomalies` are shown
    /// in the order given.
    pub fn summarize(
        &self,
        transactions: &[CategorizedTransaction],
        budgets: &BudgetGoals,
        anomalies: &[AnomalyRecord<'_>],
    ) -> Insights {
        let mut sections = vec![self.totals(transactions)];

        let has_debits = transactions.iter().any(|tx| tx.is_debit());
        if !has_debits {
            sections.push(InsightSection {
                kind: SectionKind::NoExpenseData,
                lines: vec![
                    "No expense data available: there are no debit transactions to analyze."
                        .to_string(),
                ],
            });
            return Insights { sections };
        }

        sections.push(self.top_categories(transactions));
        sections.extend(self.average_expense(transactions));
        sections.push(self.budget_adherence(transactions, budgets));
        sections.push(self.anomaly_summary(anomalies));
        sections.extend(self.spending_day(transactions));
        sections.extend(self.month_over_month(transactions));

        tracing::debug!(sections = sections.len(), "Built insight report");
        Insights { sections }
    }

    fn totals(&self, transactions: &[CategorizedTransaction]) -> InsightSection {
        let (debits, credits) = transactions.iter().fold(
            (Money::zero(), Money::zero()),
            |(d, c), tx| {
                if tx.is_debit() {
                    (d + tx.amount(), c)
                } else {
                    (d, c + tx.amount())
                }
            },
        );
        let net = credits - debits;

        InsightSection {
            kind: SectionKind::Totals,
            lines: vec![
                format!("Your total expenses amount to {}.", self.money(debits)),
                format!("Your total income/credits amount to {}.", self.money(credits)),
                format!("Your net financial flow is {}.", self.money(net)),
            ],
        }
    }

    fn top_categories(&self, transactions: &[CategorizedTransaction]) -> InsightSection {
        let breakdown = category_breakdown(transactions);
        let mut lines = Vec::new();

        if let Some((leader, rest)) = breakdown.split_first() {
            lines.push(format!(
                "Your largest spending area is {}, accounting for {}.",
                leader.category,
                self.money(leader.total)
            ));
            let others: Vec<String> = rest
                .iter()
                .take(TOP_CATEGORY_LIMIT - 1)
                .map(|s| format!("{} ({})", s.category, self.money(s.total)))
                .collect();
            if !others.is_empty() {
                lines.push(format!(
                    "Other significant expenses include: {}.",
                    others.join(", ")
                ));
            }
        }

        InsightSection {
            kind: SectionKind::TopCategories,
            lines,
        }
    }

    fn average_expense(&self, transactions: &[CategorizedTransaction]) -> Option<InsightSection> {
        let (total, count) = transactions
            .iter()
            .filter(|tx| tx.is_debit())
            .fold((Money::zero(), 0usize), |(sum, n), tx| (sum + tx.amount(), n + 1));
        let average = total.per(count)?;

        Some(InsightSection {
            kind: SectionKind::AverageExpense,
            lines: vec![format!(
                "The average amount per expense transaction is {}.",
                self.money(average)
            )],
        })
    }

    /// Budgets are checked against the month of the latest transaction in
    /// the batch, not the calendar month today.
    fn budget_adherence(
        &self,
        transactions: &[CategorizedTransaction],
        budgets: &BudgetGoals,
    ) -> InsightSection {
        let current_month = latest_date(transactions).map(YearMonth::of);

        let mut spent: BTreeMap<&str, Money> = BTreeMap::new();
        if let Some(month) = current_month {
            for tx in transactions
                .iter()
                .filter(|tx| tx.is_debit() && month.contains(tx.date()))
            {
                let total = spent.entry(tx.category()).or_default();
                *total = *total + tx.amount();
            }
        }

        let lines = if spent.is_empty() || budgets.is_empty() {
            vec!["No budget goals set or no data for the current period.".to_string()]
        } else {
            let lines: Vec<String> = budgets
                .active()
                .map(|(category, limit)| {
                    let used = spent.get(category).copied().unwrap_or_default();
                    if used > limit {
                        format!(
                            "You've exceeded your {category} budget ({}) by {}.",
                            self.money(limit),
                            self.money(used - limit)
                        )
                    } else {
                        format!(
                            "You have {} remaining in your {category} budget (out of {}).",
                            self.money(limit - used),
                            self.money(limit)
                        )
                    }
                })
                .collect();
            if lines.is_empty() {
                vec!["No active budget goals for the current month's categories.".to_string()]
            } else {
                lines
            }
        };

        InsightSection {
            kind: SectionKind::BudgetAdherence,
            lines,
        }
    }

    fn anomaly_summary(&self, anomalies: &[AnomalyRecord<'_>]) -> InsightSection {
        let lines = if anomalies.is_empty() {
            vec!["No significant spending anomalies detected.".to_string()]
        } else {
            let mut lines = vec![format!(
                "Detected {} potential anomalies in your spending.",
                anomalies.len()
            )];
            lines.extend(anomalies.iter().take(ANOMALY_DETAIL_LIMIT).map(|a| {
                let tx = a.transaction;
                format!(
                    "On {}, a {} transaction for '{}' in '{}' was flagged as: {}.",
                    tx.date().format("%Y-%m-%d"),
                    self.money(tx.amount()),
                    tx.details(),
                    tx.category(),
                    a.reason
                )
            }));
            if anomalies.len() > ANOMALY_DETAIL_LIMIT {
                lines.push(format!(
                    "And {} more anomalies.",
                    anomalies.len() - ANOMALY_DETAIL_LIMIT
                ));
            }
            lines
        };

        InsightSection {
            kind: SectionKind::Anomalies,
            lines,
        }
    }

    fn spending_day(&self, transactions: &[CategorizedTransaction]) -> Option<InsightSection> {
        let (day, _) = busiest_weekday(transactions)?;
        Some(InsightSection {
            kind: SectionKind::SpendingDay,
            lines: vec![format!("You tend to spend most on {}s.", weekday_name(day))],
        })
    }

    /// Compares the two most recent months that have any debit.
    fn month_over_month(&self, transactions: &[CategorizedTransaction]) -> Option<InsightSection> {
        let months = monthly_totals(transactions);
        let mut recent = months.iter().rev();
        let (latest, latest_total) = recent.next()?;
        let (previous, previous_total) = recent.next()?;

        let line = if latest_total > previous_total {
            format!(
                "Your spending in {latest} increased by {} compared to {previous}.",
                self.money(*latest_total - *previous_total)
            )
        } else if latest_total < previous_total {
            format!(
                "Your spending in {latest} decreased by {} compared to {previous}.",
                self.money(*previous_total - *latest_total)
            )
        } else {
            format!("Your spending remained consistent in {latest} compared to {previous}.")
        };

        Some(InsightSection {
            kind: SectionKind::MonthOverMonth,
            lines: vec![line],
        })
    }
}

fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Latest transaction date in the batch, if any.
pub fn latest_date(transactions: &[CategorizedTransaction]) -> Option<NaiveDate> {
    transactions.iter().map(|tx| tx.date()).max()
}
