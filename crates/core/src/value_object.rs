//! Value object trait: equality by value, not identity.
//!
//! Value objects have **no identity**; two value objects with the same values
//! are equal. `Money` is the one every Northwind read model shares.

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// Marker trait for value objects.
///
/// Value objects are immutable and compared by value. To "modify" one, build a
/// new one.
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}

/// Non-negative monetary amount in the smallest currency unit (cents).
///
/// Store values arrive as decimals; they are rounded to the nearest cent once,
/// at the boundary, so every aggregate downstream is exact integer arithmetic.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(u64);

impl ValueObject for Money {}

impl Money {
    pub const ZERO: Money = Money(0);

    pub fn from_cents(cents: u64) -> Self {
        Self(cents)
    }

    /// Convert a decimal amount (e.g. `18.5`) into cents, rounding half away
    /// from zero.
    pub fn from_decimal(amount: f64) -> DomainResult<Self> {
        if !amount.is_finite() {
            return Err(DomainError::validation(format!(
                "amount must be a finite number (got {amount})"
            )));
        }
        if amount < 0.0 {
            return Err(DomainError::validation(format!(
                "amount must be non-negative (got {amount})"
            )));
        }
        Ok(Self((amount * 100.0).round() as u64))
    }

    pub fn cents(self) -> u64 {
        self.0
    }

    pub fn as_decimal(self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Whole currency units, fractional part truncated.
    pub fn whole_units(self) -> i64 {
        (self.0 / 100) as i64
    }

    /// `self × quantity`, saturating at `u64::MAX` cents.
    pub fn times(self, quantity: u32) -> Self {
        Self(self.0.saturating_mul(u64::from(quantity)))
    }

    /// Scale by a non-negative factor, rounding to the nearest cent.
    pub fn scaled(self, factor: f64) -> Self {
        let scaled = (self.0 as f64 * factor.max(0.0)).round();
        Self(scaled as u64)
    }

    pub fn saturating_sub(self, other: Money) -> Self {
        Self(self.0.saturating_sub(other.0))
    }
}

impl core::ops::Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money(self.0.saturating_add(rhs.0))
    }
}

impl core::iter::Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::ZERO, |acc, m| acc + m)
    }
}

impl<'a> core::iter::Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

/// Renders as a currency amount with thousands separators, e.g. `$1,234.50`.
impl core::fmt::Display for Money {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let units = (self.0 / 100).to_string();
        let cents = self.0 % 100;

        let mut grouped = String::with_capacity(units.len() + units.len() / 3);
        for (i, ch) in units.chars().enumerate() {
            if i > 0 && (units.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(ch);
        }

        write!(f, "${grouped}.{cents:02}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn from_decimal_rounds_to_nearest_cent() {
        assert_eq!(Money::from_decimal(18.0).unwrap().cents(), 1800);
        assert_eq!(Money::from_decimal(19.999).unwrap().cents(), 2000);
        assert_eq!(Money::from_decimal(0.125).unwrap().cents(), 13);
    }

    #[test]
    fn from_decimal_rejects_negative_and_nan() {
        assert!(matches!(
            Money::from_decimal(-0.01),
            Err(DomainError::Validation(_))
        ));
        assert!(matches!(
            Money::from_decimal(f64::NAN),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn display_groups_thousands() {
        assert_eq!(Money::from_cents(0).to_string(), "$0.00");
        assert_eq!(Money::from_cents(1850).to_string(), "$18.50");
        assert_eq!(Money::from_cents(26_350).to_string(), "$263.50");
        assert_eq!(Money::from_cents(123_456_789).to_string(), "$1,234,567.89");
    }

    #[test]
    fn whole_units_truncates() {
        assert_eq!(Money::from_cents(1999).whole_units(), 19);
        assert_eq!(Money::from_cents(99).whole_units(), 0);
    }

    #[test]
    fn times_and_scaled() {
        let price = Money::from_cents(1400);
        assert_eq!(price.times(12), Money::from_cents(16_800));
        assert_eq!(price.times(12).scaled(0.85), Money::from_cents(14_280));
        assert_eq!(price.scaled(-1.0), Money::ZERO);
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: summing amounts equals summing their cents.
        #[test]
        fn sum_matches_cent_arithmetic(cents in prop::collection::vec(0u64..10_000_000u64, 0..20)) {
            let total: Money = cents.iter().copied().map(Money::from_cents).sum();
            prop_assert_eq!(total.cents(), cents.iter().sum::<u64>());
        }
    }
}
