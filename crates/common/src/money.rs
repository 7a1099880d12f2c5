//! Exact-decimal money.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A money amount backed by an exact decimal.
///
/// Prices, line totals and order totals all use this type so that percentage
/// discounts never lose cents to binary floating point.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    /// Creates a money amount from a decimal value.
    pub fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Creates a money amount from whole currency units (e.g. `25` → 25.00).
    pub fn from_major(units: i64) -> Self {
        Self(Decimal::from(units))
    }

    /// Creates a money amount from minor units and a scale,
    /// e.g. `Money::with_scale(120000, 2)` → 1200.00.
    pub fn with_scale(num: i64, scale: u32) -> Self {
        Self(Decimal::new(num, scale))
    }

    /// Returns zero money.
    pub fn zero() -> Self {
        Self(Decimal::ZERO)
    }

    /// Returns the underlying decimal amount.
    pub fn amount(&self) -> Decimal {
        self.0
    }

    /// Returns true if the amount is zero.
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Multiplies by a quantity.
    pub fn multiply(&self, quantity: u32) -> Money {
        Self(self.0 * Decimal::from(quantity))
    }

    /// Subtracts `percentage` percent (0–100) from the amount.
    pub fn apply_discount(&self, percentage: Decimal) -> Money {
        Self(self.0 - self.0 * percentage / Decimal::from(100))
    }
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.round_dp(2))
    }
}

impl std::ops::Add for Money {
    type Output = Money;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl std::ops::Sub for Money {
    type Output = Money;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl std::ops::AddAssign for Money {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_major_and_with_scale_agree() {
        assert_eq!(Money::from_major(1200), Money::with_scale(120000, 2));
    }

    #[test]
    fn multiply_scales_by_quantity() {
        let price = Money::with_scale(2500, 2); // 25.00
        assert_eq!(price.multiply(3), Money::with_scale(7500, 2));
    }

    #[test]
    fn apply_discount_is_exact() {
        // 2400.00 at 10% off -> 2160.00, to the cent.
        let gross = Money::with_scale(240000, 2);
        let net = gross.apply_discount(Decimal::from(10));
        assert_eq!(net, Money::with_scale(216000, 2));
    }

    #[test]
    fn zero_percent_discount_is_identity() {
        let gross = Money::with_scale(9999, 2);
        assert_eq!(gross.apply_discount(Decimal::ZERO), gross);
    }

    #[test]
    fn sum_accumulates() {
        let total: Money = [
            Money::with_scale(216000, 2),
            Money::with_scale(2250, 2),
        ]
        .into_iter()
        .sum();
        assert_eq!(total, Money::with_scale(218250, 2));
    }

    #[test]
    fn display_rounds_to_cents() {
        assert_eq!(Money::with_scale(123450, 2).to_string(), "1234.50");
    }

    #[test]
    fn serialization_roundtrip() {
        let money = Money::with_scale(218250, 2);
        let json = serde_json::to_string(&money).unwrap();
        let deserialized: Money = serde_json::from_str(&json).unwrap();
        assert_eq!(money, deserialized);
    }
}
