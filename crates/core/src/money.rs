use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Sub};
use std::str::FromStr;

use crate::error::CoreError;

/// A currency-agnostic amount, always held at two decimal places.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    pub fn from_cents(cents: i64) -> Self {
        Money(Decimal::new(cents, 2))
    }

    pub fn from_decimal(decimal: Decimal) -> Self {
        Money(decimal.round_dp(2))
    }

    /// Largest magnitude accepted from a statement, in whole units.
    pub const LIMIT: i64 = 1_000_000_000_000_000;

    /// Whether `|self|` is at most [`Money::LIMIT`].
    pub fn within_limit(self) -> bool {
        self.0.abs() <= Decimal::from(Self::LIMIT)
    }

    pub fn zero() -> Self {
        Money(Decimal::ZERO)
    }

    pub fn is_zero(self) -> bool {
        self.0.is_zero()
    }

    pub fn is_negative(self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    pub fn as_decimal(self) -> Decimal {
        self.0
    }

    pub fn abs(self) -> Self {
        Money(self.0.abs())
    }

    /// Lossy conversion used by the statistics code.
    pub fn to_f64(self) -> f64 {
        self.0.to_f64().unwrap_or_default()
    }

    /// Mean of `count` equal shares of this amount, `None` when `count` is zero.
    pub fn per(self, count: usize) -> Option<Money> {
        if count == 0 {
            return None;
        }
        self.0
            .checked_div(Decimal::from(count as u64))
            .map(Money::from_decimal)
    }

    /// Display prefixed with a currency symbol, e.g. `₹1,234.50`.
    pub fn display_with(self, symbol: &str) -> WithSymbol<'_> {
        WithSymbol { money: self, symbol }
    }
}

pub struct WithSymbol<'a> {
    money: Money,
    symbol: &'a str,
}

impl fmt::Display for WithSymbol<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.money.is_negative() { "-" } else { "" };
        write!(f, "{sign}{}{}", self.symbol, grouped(self.money.abs().0))
    }
}

/// Formats an absolute decimal with thousands separators and two decimals.
fn grouped(value: Decimal) -> String {
    let plain = format!("{value:.2}");
    let (int_part, frac_part) = plain.split_once('.').unwrap_or((plain.as_str(), "00"));

    let mut out = String::with_capacity(plain.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out.push('.');
    out.push_str(frac_part);
    out
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_with(""))
    }
}

impl FromStr for Money {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Decimal::from_str(s.trim())
            .map(Money::from_decimal)
            .map_err(|_| CoreError::InvalidAmount(s.to_string()))
    }
}

// Totals saturate at the `Decimal` bounds rather than panicking.
impl Add for Money {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Money(self.0.saturating_add(rhs.0))
    }
}

impl Sub for Money {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Money(self.0.saturating_sub(rhs.0))
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |a, b| a + b)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}
