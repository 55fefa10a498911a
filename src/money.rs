//! Fixed-point money and exact-decimal interest rates
//!
//! Every simulator works in whole cents. Rates stay as `Decimal` fractions so
//! that interest accrual is reproducible across runs and platforms.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};

/// A signed amount of money in cents
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Money = Money(0);
    pub const MAX: Money = Money(i64::MAX);

    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    pub const fn cents(self) -> i64 {
        self.0
    }

    /// Convert decimal currency units, rounding half-to-even to the cent.
    ///
    /// Returns `None` when the amount does not fit in an `i64` of cents.
    pub fn from_units(units: Decimal) -> Option<Self> {
        Self::round_units(units, RoundingStrategy::MidpointNearestEven)
    }

    /// Convert decimal currency units, rounding half away from zero.
    pub fn from_units_half_up(units: Decimal) -> Option<Self> {
        Self::round_units(units, RoundingStrategy::MidpointAwayFromZero)
    }

    fn round_units(units: Decimal, strategy: RoundingStrategy) -> Option<Self> {
        let cents = units.checked_mul(dec!(100))?;
        cents.round_dp_with_strategy(0, strategy).to_i64().map(Money)
    }

    /// Amount in currency units with two decimal places
    pub fn to_units(self) -> Decimal {
        Decimal::new(self.0, 2)
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    pub fn is_positive(self) -> bool {
        self.0 > 0
    }

    pub fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Clamp negative amounts to zero
    pub fn non_negative(self) -> Self {
        Money(self.0.max(0))
    }

    pub fn checked_add(self, other: Money) -> Option<Money> {
        self.0.checked_add(other.0).map(Money)
    }

    pub fn checked_sub(self, other: Money) -> Option<Money> {
        self.0.checked_sub(other.0).map(Money)
    }

    pub fn saturating_add(self, other: Money) -> Money {
        Money(self.0.saturating_add(other.0))
    }

    /// Mean of a sum of `count` amounts, rounded half-to-even to the cent
    pub fn mean(total_cents: i128, count: usize) -> Money {
        if count == 0 {
            return Money::ZERO;
        }
        let mean = Decimal::from_i128_with_scale(total_cents, 0) / Decimal::from(count as u64);
        Money(
            mean.round_dp_with_strategy(0, RoundingStrategy::MidpointNearestEven)
                .to_i64()
                .unwrap_or(i64::MAX),
        )
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money(self.0 + rhs.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Money) {
        self.0 += rhs.0;
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, rhs: Money) -> Money {
        Money(self.0 - rhs.0)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, rhs: Money) {
        self.0 -= rhs.0;
    }
}

impl Neg for Money {
    type Output = Money;

    fn neg(self) -> Money {
        Money(-self.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, |acc, m| acc + m)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let rendered = format!("{}{}.{:02}", sign, abs / 100, abs % 100);
        f.pad(&rendered)
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        Serialize::serialize(&self.to_units(), serializer)
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let units: Decimal = Deserialize::deserialize(deserializer)?;
        Money::from_units(units)
            .ok_or_else(|| serde::de::Error::custom(format!("amount {} out of range", units)))
    }
}

/// An annual interest rate as an exact decimal fraction (6.5% is `0.065`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Rate(Decimal);

impl Rate {
    pub const ZERO: Rate = Rate(Decimal::ZERO);

    pub fn from_fraction(fraction: Decimal) -> Self {
        Rate(fraction)
    }

    /// Whole-number percentage (6.5 means 6.5%)
    pub fn from_percent(percent: Decimal) -> Self {
        Rate(percent / Decimal::ONE_HUNDRED)
    }

    pub fn annual(self) -> Decimal {
        self.0
    }

    pub fn as_percent(self) -> Decimal {
        self.0 * Decimal::ONE_HUNDRED
    }

    pub fn is_zero(self) -> bool {
        self.0.is_zero()
    }

    pub fn monthly(self) -> MonthlyRate {
        MonthlyRate(self.0 / dec!(12))
    }
}

impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.as_percent().normalize())
    }
}

/// Periodic rate applied once per simulated month
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthlyRate(Decimal);

impl MonthlyRate {
    pub fn value(self) -> Decimal {
        self.0
    }

    pub fn is_zero(self) -> bool {
        self.0.is_zero()
    }

    /// Interest on `balance` for one month, rounded half-to-even to the cent.
    ///
    /// Returns `None` if the result does not fit in `Money`.
    pub fn checked_interest_on(self, balance: Money) -> Option<Money> {
        if balance.cents() <= 0 || self.0.is_zero() {
            return Some(Money::ZERO);
        }
        Decimal::from(balance.cents())
            .checked_mul(self.0)?
            .round_dp_with_strategy(0, RoundingStrategy::MidpointNearestEven)
            .to_i64()
            .map(Money::from_cents)
    }

    /// Interest on `balance` for one month, saturating at `Money::MAX`
    pub fn interest_on(self, balance: Money) -> Money {
        self.checked_interest_on(balance).unwrap_or(Money::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_units_rounds_half_even() {
        assert_eq!(Money::from_units(dec!(10.005)), Some(Money::from_cents(1000)));
        assert_eq!(Money::from_units(dec!(10.015)), Some(Money::from_cents(1002)));
        assert_eq!(Money::from_units_half_up(dec!(10.005)), Some(Money::from_cents(1001)));
        assert_eq!(Money::from_units(dec!(1896.20)), Some(Money::from_cents(189_620)));
    }

    #[test]
    fn test_from_units_overflow() {
        assert_eq!(Money::from_units(Decimal::MAX), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_cents(189_620).to_string(), "1896.20");
        assert_eq!(Money::from_cents(-5).to_string(), "-0.05");
        assert_eq!(Money::ZERO.to_string(), "0.00");
        assert_eq!(format!("{:>8}", Money::from_cents(101)), "    1.01");
    }

    #[test]
    fn test_monthly_interest() {
        let monthly = Rate::from_percent(dec!(6.5)).monthly();
        // 300,000.00 * 0.065 / 12 = 1,625.00
        assert_eq!(monthly.interest_on(Money::from_cents(30_000_000)), Money::from_cents(162_500));
        assert_eq!(monthly.interest_on(Money::ZERO), Money::ZERO);
        assert_eq!(Rate::ZERO.monthly().interest_on(Money::from_cents(100)), Money::ZERO);
    }

    #[test]
    fn test_interest_overflow_is_detected() {
        let monthly = Rate::from_percent(dec!(100)).monthly();
        assert!(monthly.checked_interest_on(Money::MAX).is_some());
        let huge = Rate::from_fraction(dec!(24)).monthly();
        assert_eq!(huge.checked_interest_on(Money::MAX), None);
        assert_eq!(huge.interest_on(Money::MAX), Money::MAX);
    }

    #[test]
    fn test_mean_rounds() {
        assert_eq!(Money::mean(10, 4), Money::from_cents(2)); // 2.5 -> 2
        assert_eq!(Money::mean(14, 4), Money::from_cents(4)); // 3.5 -> 4
        assert_eq!(Money::mean(0, 0), Money::ZERO);
    }

    #[test]
    fn test_money_serializes_as_decimal_string() {
        assert_eq!(serde_json::to_string(&Money::from_cents(189_620)).unwrap(), "\"1896.20\"");
        assert_eq!(serde_json::to_string(&Money::from_cents(-505)).unwrap(), "\"-5.05\"");

        let parsed: Money = serde_json::from_str("\"1896.20\"").unwrap();
        assert_eq!(parsed, Money::from_cents(189_620));
        let parsed: Money = serde_json::from_str("250").unwrap();
        assert_eq!(parsed, Money::from_cents(25_000));
        let amounts = vec![Money::ZERO, Money::from_cents(1), Money::from_cents(-30_000_000)];
        let back: Vec<Money> = serde_json::from_str(&serde_json::to_string(&amounts).unwrap()).unwrap();
        assert_eq!(back, amounts);

        assert!(serde_json::from_str::<Money>("\"100000000000000000000\"").is_err());
    }

    #[test]
    fn test_rate_display() {
        assert_eq!(Rate::from_percent(dec!(6.5)).to_string(), "6.5%");
    }
}
