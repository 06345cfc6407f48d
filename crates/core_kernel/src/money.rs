//! Money types with precise decimal arithmetic
//!
//! Wages, withholdings and contributions are all US dollar amounts. This
//! module keeps them in `rust_decimal` so quarterly splits and contribution
//! calculations never pick up floating-point drift.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Sub};
use thiserror::Error;

/// Number of decimal places used for dollar amounts
const CENT_PLACES: u32 = 2;

/// Errors from splitting amounts
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MoneyError {
    #[error("Cannot allocate {amount} into {parts} parts")]
    InvalidAllocation { amount: String, parts: u32 },
}

/// A US dollar amount
///
/// Amounts are stored with up to 4 decimal places so that rate calculations
/// can be rounded once, at the end, with `round_to_cents`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money {
    amount: Decimal,
}

impl Money {
    pub fn new(amount: Decimal) -> Self {
        Self {
            amount: amount.round_dp(4),
        }
    }

    /// Creates Money from a whole number of cents
    pub fn from_cents(cents: i64) -> Self {
        Self::new(Decimal::new(cents, CENT_PLACES))
    }

    /// Creates Money from a whole number of dollars
    pub fn from_dollars(dollars: i64) -> Self {
        Self::new(Decimal::new(dollars, 0))
    }

    pub fn zero() -> Self {
        Self { amount: dec!(0) }
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn is_zero(&self) -> bool {
        self.amount.is_zero()
    }

    /// Strictly greater than zero
    pub fn is_positive(&self) -> bool {
        self.amount.is_sign_positive() && !self.amount.is_zero()
    }

    pub fn is_negative(&self) -> bool {
        self.amount.is_sign_negative() && !self.amount.is_zero()
    }

    /// Rounds to whole cents
    pub fn round_to_cents(&self) -> Self {
        Self {
            amount: self.amount.round_dp(CENT_PLACES),
        }
    }

    /// Returns the amount as a whole number of cents
    pub fn to_cents(&self) -> i64 {
        (self.amount.round_dp(CENT_PLACES) * dec!(100))
            .to_i64()
            .unwrap_or_default()
    }

    /// Splits into `n` whole-cent parts that sum exactly to the original
    ///
    /// Leftover cents go to the first parts, so splitting annual wages over
    /// four quarters never loses or invents a cent.
    pub fn allocate(&self, n: u32) -> Result<Vec<Money>, MoneyError> {
        if n == 0 {
            return Err(MoneyError::InvalidAllocation {
                amount: self.to_string(),
                parts: n,
            });
        }

        let total_cents = self.to_cents() as i128;
        let base = total_cents / n as i128;
        let remainder = (total_cents % n as i128) as u32;

        let mut allocations = Vec::with_capacity(n as usize);
        for i in 0..n {
            let cents = if i < remainder { base + 1 } else { base };
            allocations.push(Money::from_cents(cents as i64));
        }

        Ok(allocations)
    }
}

impl Default for Money {
    fn default() -> Self {
        Self::zero()
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${:.2}", self.amount)
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self::new(self.amount + other.amount)
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self::new(self.amount - other.amount)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + *m)
    }
}

/// Share of wages owed as a leave contribution
///
/// Stored as a fraction; built from the percentage the DOR publishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rate(Decimal);

impl Rate {
    /// `from_percentage(dec!(0.34))` is 0.34%
    pub fn from_percentage(percentage: Decimal) -> Self {
        Self(percentage / dec!(100))
    }

    pub fn as_percentage(&self) -> Decimal {
        self.0 * dec!(100)
    }

    /// The contribution on `wages`, rounded to cents
    pub fn apply(&self, wages: &Money) -> Money {
        Money::new(wages.amount * self.0).round_to_cents()
    }
}

impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.as_percentage().round_dp(4).normalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_money_from_cents() {
        let m = Money::from_cents(10050);
        assert_eq!(m.amount(), dec!(100.50));
        assert_eq!(m.to_cents(), 10050);
    }

    #[test]
    fn test_money_allocation() {
        let m = Money::new(dec!(100.00));
        let parts = m.allocate(3).unwrap();

        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0].amount(), dec!(33.34));
        let total: Money = parts.into_iter().sum();
        assert_eq!(total, m);
    }

    #[test]
    fn test_rate_application_rounds_to_cents() {
        let rate = Rate::from_percentage(dec!(0.34));
        let wages = Money::new(dec!(12345.67));

        assert_eq!(rate.apply(&wages).amount(), dec!(41.98));
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::new(dec!(5)).to_string(), "$5.00");
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn money_allocation_sum_equals_original(
            cents in 0i64..1_000_000_000i64,
            parts in 1u32..100u32
        ) {
            let money = Money::from_cents(cents);
            let allocations = money.allocate(parts).unwrap();

            let total: Decimal = allocations.iter().map(|m| m.amount()).sum();
            prop_assert_eq!(total, money.amount());
        }

        #[test]
        fn cents_round_trip(cents in -1_000_000_000i64..1_000_000_000i64) {
            prop_assert_eq!(Money::from_cents(cents).to_cents(), cents);
        }
    }
}
