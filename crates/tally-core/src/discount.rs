//! # Discount Tiers
//!
//! Quantity-based discount policy for sale items.
//!
//! ## Tier Table
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Quantity Discount Tiers                             │
//! │                                                                         │
//! │   Quantity      Discount        Rate (bps)                              │
//! │   ─────────     ────────        ──────────                              │
//! │   ≤ 0           rejected        -                                       │
//! │   1 – 3         0%              0                                       │
//! │   4 – 9         10%             1000                                    │
//! │   10 – 20       20%             2000                                    │
//! │   > 20          rejected        -                                       │
//! │                                                                         │
//! │   Boundaries belong to the higher tier: 4 → 10%, 10 → 20%               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{CoreError, CoreResult};
use crate::MAX_ITEM_QUANTITY;

// =============================================================================
// Discount Rate
// =============================================================================

/// Discount rate represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000, so 1000 bps = 10%.
/// Integer rates keep the total calculation exact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DiscountRate(u32);

impl DiscountRate {
    /// 10% off.
    pub const TEN_PERCENT: DiscountRate = DiscountRate(1000);

    /// 20% off.
    pub const TWENTY_PERCENT: DiscountRate = DiscountRate(2000);

    /// Creates a discount rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        DiscountRate(bps)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// No discount.
    #[inline]
    pub const fn zero() -> Self {
        DiscountRate(0)
    }

    /// Checks if the rate is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl Default for DiscountRate {
    fn default() -> Self {
        DiscountRate::zero()
    }
}

impl fmt::Display for DiscountRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.0 / 100;
        let frac = self.0 % 100;
        if frac == 0 {
            write!(f, "{}%", whole)
        } else {
            write!(f, "{}.{:02}%", whole, frac)
        }
    }
}

// =============================================================================
// Tier Lookup
// =============================================================================

/// Smallest quantity that earns 10% off.
pub const TEN_PERCENT_MIN_QUANTITY: i64 = 4;

/// Smallest quantity that earns 20% off.
pub const TWENTY_PERCENT_MIN_QUANTITY: i64 = 10;

/// Returns the discount rate for a line quantity.
///
/// ## Errors
/// - `CoreError::QuantityNotPositive` for quantity ≤ 0
/// - `CoreError::QuantityTooLarge` for quantity > 20
///
/// ## Example
/// ```rust
/// use tally_core::discount::{discount_for_quantity, DiscountRate};
///
/// assert_eq!(discount_for_quantity(3).unwrap(), DiscountRate::zero());
/// assert_eq!(discount_for_quantity(4).unwrap(), DiscountRate::TEN_PERCENT);
/// assert_eq!(discount_for_quantity(10).unwrap(), DiscountRate::TWENTY_PERCENT);
/// assert!(discount_for_quantity(21).is_err());
/// ```
pub fn discount_for_quantity(quantity: i64) -> CoreResult<DiscountRate> {
    ensure_quantity_in_range(quantity)?;

    let rate = if quantity >= TWENTY_PERCENT_MIN_QUANTITY {
        DiscountRate::TWENTY_PERCENT
    } else if quantity >= TEN_PERCENT_MIN_QUANTITY {
        DiscountRate::TEN_PERCENT
    } else {
        DiscountRate::zero()
    };

    Ok(rate)
}

/// Rejects quantities outside `1..=MAX_ITEM_QUANTITY`.
pub fn ensure_quantity_in_range(quantity: i64) -> CoreResult<()> {
    if quantity <= 0 {
        return Err(CoreError::QuantityNotPositive { requested: quantity });
    }
    ensure_quantity_within_limit(quantity)
}

/// Rejects quantities above `MAX_ITEM_QUANTITY`. Never clamps.
pub fn ensure_quantity_within_limit(quantity: i64) -> CoreResult<()> {
    if quantity > MAX_ITEM_QUANTITY {
        return Err(CoreError::QuantityTooLarge {
            requested: quantity,
            max: MAX_ITEM_QUANTITY,
        });
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_tier_boundaries() {
        assert_eq!(discount_for_quantity(1).unwrap(), DiscountRate::zero());
        assert_eq!(discount_for_quantity(3).unwrap(), DiscountRate::zero());
        assert_eq!(discount_for_quantity(4).unwrap(), DiscountRate::TEN_PERCENT);
        assert_eq!(discount_for_quantity(9).unwrap(), DiscountRate::TEN_PERCENT);
        assert_eq!(discount_for_quantity(10).unwrap(), DiscountRate::TWENTY_PERCENT);
        assert_eq!(discount_for_quantity(20).unwrap(), DiscountRate::TWENTY_PERCENT);
    }

    #[test]
    fn test_out_of_range_quantities_rejected() {
        assert!(matches!(
            discount_for_quantity(0),
            Err(CoreError::QuantityNotPositive { requested: 0 })
        ));
        assert!(matches!(
            discount_for_quantity(-3),
            Err(CoreError::QuantityNotPositive { requested: -3 })
        ));
        assert!(matches!(
            discount_for_quantity(21),
            Err(CoreError::QuantityTooLarge { requested: 21, max: 20 })
        ));
    }

    #[test]
    fn test_display() {
        assert_eq!(DiscountRate::zero().to_string(), "0%");
        assert_eq!(DiscountRate::TEN_PERCENT.to_string(), "10%");
        assert_eq!(DiscountRate::from_bps(1250).to_string(), "12.50%");
    }

    proptest! {
        #[test]
        fn prop_rate_never_decreases_with_quantity(q in 1i64..20) {
            let lower = discount_for_quantity(q).unwrap();
            let higher = discount_for_quantity(q + 1).unwrap();
            prop_assert!(higher >= lower);
        }

        #[test]
        fn prop_above_limit_always_rejected(q in 21i64..10_000) {
            prop_assert!(discount_for_quantity(q).is_err());
        }
    }
}
