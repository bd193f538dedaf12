//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In binary floating point:                                              │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  A 10% discount on $0.45 is $0.405. Whether that prints as $0.40 or    │
//! │  $0.41 must never depend on how a float happened to round.              │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents + explicit rounding                        │
//! │    45 cents × 9000 bps / 10000 = 40.5 cents → 41 cents                  │
//! │    (half away from zero, applied exactly once)                          │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use tally_core::money::Money;
//! use tally_core::DiscountRate;
//!
//! let unit_price = Money::from_cents(1000); // $10.00
//! let gross = unit_price.checked_multiply_quantity(4).unwrap(); // $40.00
//! let total = gross.apply_discount(DiscountRate::from_bps(1000)); // 10% off
//! assert_eq!(total.cents(), 3600);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::discount::DiscountRate;

/// Basis points in one whole (100%).
const BPS_SCALE: i128 = 10_000;

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in the smallest currency unit (cents).
///
/// ## Design Decisions
/// - **i64 (signed)**: arithmetic stays closed under subtraction
/// - **Single field tuple struct**: Zero-cost abstraction over i64
/// - **Derives**: Full serde support for JSON serialization
///
/// ## Where Money is Used
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                                                                         │
/// │  SaleItem.unit_price ──► × quantity ──► gross                           │
/// │                                           │                             │
/// │                                           ▼                             │
/// │                              apply_discount(tier) ──► SaleItem.total    │
/// │                                                           │             │
/// │                          Σ non-cancelled items ◄──────────┘             │
/// │                                   │                                     │
/// │                                   ▼                                     │
/// │                               Sale.total                                │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use tally_core::money::Money;
    ///
    /// let price = Money::from_cents(1099); // Represents $10.99
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Returns the value in cents (smallest currency unit).
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit (dollars) portion.
    #[inline]
    pub const fn dollars(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit (cents) portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Multiplies money by a quantity, or `None` if the result does not fit
    /// in an `i64` of cents.
    ///
    /// ## Example
    /// ```rust
    /// use tally_core::money::Money;
    ///
    /// let unit_price = Money::from_cents(299); // $2.99
    /// assert_eq!(unit_price.checked_multiply_quantity(3), Some(Money::from_cents(897)));
    /// assert_eq!(Money::from_cents(i64::MAX).checked_multiply_quantity(2), None);
    /// ```
    #[inline]
    pub const fn checked_multiply_quantity(&self, qty: i64) -> Option<Self> {
        match self.0.checked_mul(qty) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }

    /// Adds two amounts, or `None` on overflow.
    #[inline]
    pub const fn checked_add(&self, other: Money) -> Option<Self> {
        match self.0.checked_add(other.0) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }

    /// Sums amounts, stopping with `None` at the first overflow.
    ///
    /// ## Example
    /// ```rust
    /// use tally_core::money::Money;
    ///
    /// let totals = [Money::from_cents(2000), Money::from_cents(3600)];
    /// assert_eq!(Money::checked_sum(totals), Some(Money::from_cents(5600)));
    /// ```
    pub fn checked_sum<I>(amounts: I) -> Option<Money>
    where
        I: IntoIterator<Item = Money>,
    {
        amounts
            .into_iter()
            .try_fold(Money::zero(), |acc, amount| acc.checked_add(amount))
    }

    /// Applies a percentage discount and returns the discounted amount,
    /// rounded to whole cents half away from zero.
    ///
    /// ## Rounding
    /// ```text
    /// ┌─────────────────────────────────────────────────────────────────────┐
    /// │  ROUND HALF AWAY FROM ZERO (applied to the discounted amount)       │
    /// │                                                                     │
    /// │   40.4 cents → 40      40.5 cents → 41      40.6 cents → 41        │
    /// │  -40.4 cents → -40    -40.5 cents → -41                            │
    /// │                                                                     │
    /// │  NOT bankers rounding (40.5 → 40), NOT truncation.                  │
    /// │                                                                     │
    /// │  The discounted amount is rounded once. Rounding the discount       │
    /// │  first and subtracting gives a different cent on ties:              │
    /// │    45 - round(4.5) = 40   vs   round(45 × 0.9) = round(40.5) = 41   │
    /// └─────────────────────────────────────────────────────────────────────┘
    /// ```
    ///
    /// ## Example
    /// ```rust
    /// use tally_core::money::Money;
    /// use tally_core::DiscountRate;
    ///
    /// let gross = Money::from_cents(45);
    /// let total = gross.apply_discount(DiscountRate::from_bps(1000));
    /// assert_eq!(total.cents(), 41);
    /// ```
    pub fn apply_discount(&self, rate: DiscountRate) -> Money {
        // i128 keeps cents × bps exact for any i64 amount
        let numerator = self.0 as i128 * (BPS_SCALE - rate.bps() as i128);
        Money::from_cents(div_round_half_away_from_zero(numerator, BPS_SCALE) as i64)
    }
}

/// Integer division rounding half away from zero. `divisor` must be positive.
fn div_round_half_away_from_zero(numerator: i128, divisor: i128) -> i128 {
    let quotient = numerator / divisor;
    let remainder = numerator % divisor;

    if remainder.abs() * 2 >= divisor {
        quotient + numerator.signum()
    } else {
        quotient
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display implementation shows money in a human-readable format.
///
/// ## Note
/// This is for logs and debugging, not localized display.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(
            f,
            "{}${}.{:02}",
            sign,
            self.dollars().abs(),
            self.cents_part()
        )
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents() {
        let money = Money::from_cents(1099);
        assert_eq!(money.cents(), 1099);
        assert_eq!(money.dollars(), 10);
        assert_eq!(money.cents_part(), 99);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_cents(1099)), "$10.99");
        assert_eq!(format!("{}", Money::from_cents(500)), "$5.00");
        assert_eq!(format!("{}", Money::from_cents(-550)), "-$5.50");
        assert_eq!(format!("{}", Money::from_cents(0)), "$0.00");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!(a.checked_add(b), Some(Money::from_cents(1500)));
        assert_eq!(Money::from_cents(i64::MAX).checked_add(b), None);
    }

    #[test]
    fn test_checked_sum() {
        let totals = vec![Money::from_cents(2000), Money::from_cents(3600)];
        assert_eq!(Money::checked_sum(totals), Some(Money::from_cents(5600)));
        assert_eq!(Money::checked_sum(Vec::new()), Some(Money::zero()));
    }

    #[test]
    fn test_checked_sum_overflow_is_none() {
        let totals = [Money::from_cents(i64::MAX), Money::from_cents(1)];
        assert_eq!(Money::checked_sum(totals), None);
    }

    #[test]
    fn test_apply_discount_exact() {
        let gross = Money::from_cents(4000);
        assert_eq!(gross.apply_discount(DiscountRate::from_bps(1000)).cents(), 3600);
        assert_eq!(gross.apply_discount(DiscountRate::from_bps(2000)).cents(), 3200);
        assert_eq!(gross.apply_discount(DiscountRate::zero()).cents(), 4000);
    }

    /// 45 × 0.9 = 40.5 → 41. Rounding the discount (4.5 → 5) first would give 40.
    #[test]
    fn test_apply_discount_rounds_tie_away_from_zero() {
        let gross = Money::from_cents(45);
        assert_eq!(gross.apply_discount(DiscountRate::from_bps(1000)).cents(), 41);

        let negative = Money::from_cents(-45);
        assert_eq!(negative.apply_discount(DiscountRate::from_bps(1000)).cents(), -41);
    }

    #[test]
    fn test_apply_discount_below_half_rounds_down() {
        // 13 × 0.8 = 10.4 → 10
        let gross = Money::from_cents(13);
        assert_eq!(gross.apply_discount(DiscountRate::from_bps(2000)).cents(), 10);

        // 17 × 0.8 = 13.6 → 14
        let gross = Money::from_cents(17);
        assert_eq!(gross.apply_discount(DiscountRate::from_bps(2000)).cents(), 14);
    }

    #[test]
    fn test_zero_and_checks() {
        let zero = Money::zero();
        assert!(zero.is_zero());
        assert!(!zero.is_positive());
        assert!(!zero.is_negative());

        assert!(Money::from_cents(100).is_positive());
        assert!(Money::from_cents(-100).is_negative());
    }

    #[test]
    fn test_checked_multiply_quantity() {
        let unit_price = Money::from_cents(299);
        assert_eq!(unit_price.checked_multiply_quantity(3), Some(Money::from_cents(897)));
        assert_eq!(Money::from_cents(i64::MAX / 10).checked_multiply_quantity(20), None);
    }

    #[test]
    fn test_apply_discount_at_i64_limit() {
        let gross = Money::from_cents(i64::MAX);
        let total = gross.apply_discount(DiscountRate::TWENTY_PERCENT);
        assert!(total.is_positive());
        assert!(total < gross);
    }

    #[test]
    fn test_serde_is_plain_cents() {
        let json = serde_json::to_string(&Money::from_cents(3600)).unwrap();
        assert_eq!(json, "3600");
        let back: Money = serde_json::from_str("3600").unwrap();
        assert_eq!(back, Money::from_cents(3600));
    }
}
