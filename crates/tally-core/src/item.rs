//! # Sale Item
//!
//! One priced line within a sale, with its quantity discount and line total.
//!
//! ## Derived Fields
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  SaleItem                                                               │
//! │                                                                         │
//! │  set at creation        derived                                         │
//! │  ───────────────        ───────                                         │
//! │  product_id             discount  = tier(quantity)                      │
//! │  product_name           total     = round(price × qty × (1 - discount)) │
//! │  unit_price                         or 0 once cancelled                 │
//! │  quantity                                                               │
//! │                                                                         │
//! │  Derived fields have no setters. They change only through               │
//! │  apply_discount_and_compute_total() and cancel().                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::discount::{discount_for_quantity, DiscountRate};
use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{SaleItemId, SaleItemInput};

/// A line item owned by a [`Sale`](crate::sale::Sale).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaleItem {
    id: SaleItemId,
    product_id: String,
    product_name: String,
    unit_price: Money,
    quantity: i64,
    discount: DiscountRate,
    total: Money,
    is_cancelled: bool,
}

impl SaleItem {
    /// Creates an item and computes its discount and total immediately.
    ///
    /// ## Errors
    /// - `QuantityNotPositive` for quantity ≤ 0
    /// - `QuantityTooLarge` for quantity > 20
    /// - `NegativeUnitPrice` for a unit price below zero
    /// - `AmountOverflow` when price × quantity does not fit in `i64` cents
    ///
    /// ## Example
    /// ```rust
    /// use tally_core::{Money, SaleItem};
    ///
    /// let item = SaleItem::new("P1", "Product 1", Money::from_cents(1000), 4).unwrap();
    /// assert_eq!(item.total().cents(), 3600); // 40.00 less 10%
    /// ```
    pub fn new(
        product_id: impl Into<String>,
        product_name: impl Into<String>,
        unit_price: Money,
        quantity: i64,
    ) -> CoreResult<Self> {
        Self::build(
            SaleItemId::new(),
            product_id.into(),
            product_name.into(),
            unit_price,
            quantity,
        )
    }

    /// Creates an item from command input.
    pub fn from_input(input: &SaleItemInput) -> CoreResult<Self> {
        Self::new(
            input.product_id.clone(),
            input.product_name.clone(),
            input.unit_price,
            input.quantity,
        )
    }

    /// Rebuilds a stored item.
    ///
    /// Discount and total are re-derived from price and quantity rather than
    /// read back from storage; a cancelled item comes back with total zero.
    pub fn restore(
        id: SaleItemId,
        product_id: impl Into<String>,
        product_name: impl Into<String>,
        unit_price: Money,
        quantity: i64,
        is_cancelled: bool,
    ) -> CoreResult<Self> {
        let mut item = Self::build(id, product_id.into(), product_name.into(), unit_price, quantity)?;
        if is_cancelled {
            item.cancel();
        }
        Ok(item)
    }

    fn build(
        id: SaleItemId,
        product_id: String,
        product_name: String,
        unit_price: Money,
        quantity: i64,
    ) -> CoreResult<Self> {
        if unit_price.is_negative() {
            return Err(CoreError::NegativeUnitPrice {
                cents: unit_price.cents(),
            });
        }

        let mut item = SaleItem {
            id,
            product_id,
            product_name,
            unit_price,
            quantity,
            discount: DiscountRate::zero(),
            total: Money::zero(),
            is_cancelled: false,
        };
        item.apply_discount_and_compute_total()?;
        Ok(item)
    }

    /// Recomputes `discount` and `total` from the current price and quantity.
    ///
    /// Idempotent. A cancelled item keeps a zero total.
    pub fn apply_discount_and_compute_total(&mut self) -> CoreResult<()> {
        let discount = discount_for_quantity(self.quantity)?;
        let gross = self.gross()?;
        self.discount = discount;
        self.total = if self.is_cancelled {
            Money::zero()
        } else {
            gross.apply_discount(discount)
        };
        Ok(())
    }

    /// Marks the item cancelled and zeroes its total.
    ///
    /// Quantity, price and discount stay as a record of what was sold.
    /// Cancelling twice is a no-op.
    pub fn cancel(&mut self) {
        self.is_cancelled = true;
        self.total = Money::zero();
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn id(&self) -> SaleItemId {
        self.id
    }

    pub fn product_id(&self) -> &str {
        &self.product_id
    }

    pub fn product_name(&self) -> &str {
        &self.product_name
    }

    pub fn unit_price(&self) -> Money {
        self.unit_price
    }

    pub fn quantity(&self) -> i64 {
        self.quantity
    }

    pub fn discount(&self) -> DiscountRate {
        self.discount
    }

    pub fn total(&self) -> Money {
        self.total
    }

    pub fn is_cancelled(&self) -> bool {
        self.is_cancelled
    }

    /// Price × quantity before discount.
    pub fn gross(&self) -> CoreResult<Money> {
        self.unit_price
            .checked_multiply_quantity(self.quantity)
            .ok_or(CoreError::AmountOverflow)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn item(price_cents: i64, quantity: i64) -> SaleItem {
        SaleItem::new("P1", "Product 1", Money::from_cents(price_cents), quantity).unwrap()
    }

    #[test]
    fn test_quantity_below_four_has_no_discount() {
        let item = item(1000, 1);
        assert_eq!(item.discount(), DiscountRate::zero());
        assert_eq!(item.total(), Money::from_cents(1000));
    }

    #[test]
    fn test_quantity_four_applies_ten_percent() {
        let item = item(1000, 4);
        assert_eq!(item.discount(), DiscountRate::TEN_PERCENT);
        assert_eq!(item.total(), Money::from_cents(3600));
    }

    #[test]
    fn test_quantity_ten_applies_twenty_percent() {
        let item = item(500, 10);
        assert_eq!(item.discount(), DiscountRate::TWENTY_PERCENT);
        assert_eq!(item.total(), Money::from_cents(4000));
    }

    #[test]
    fn test_quantity_twenty_one_rejected_not_clamped() {
        let err = SaleItem::new("P1", "Product 1", Money::from_cents(500), 21).unwrap_err();
        assert_eq!(
            err,
            CoreError::QuantityTooLarge {
                requested: 21,
                max: 20
            }
        );
    }

    #[test]
    fn test_zero_and_negative_quantity_rejected() {
        assert!(matches!(
            SaleItem::new("P1", "Product 1", Money::from_cents(500), 0),
            Err(CoreError::QuantityNotPositive { requested: 0 })
        ));
        assert!(matches!(
            SaleItem::new("P1", "Product 1", Money::from_cents(500), -2),
            Err(CoreError::QuantityNotPositive { requested: -2 })
        ));
    }

    #[test]
    fn test_negative_unit_price_rejected() {
        assert!(matches!(
            SaleItem::new("P1", "Product 1", Money::from_cents(-1), 1),
            Err(CoreError::NegativeUnitPrice { cents: -1 })
        ));
    }

    #[test]
    fn test_line_total_beyond_i64_rejected() {
        let result = SaleItem::new("P1", "Product 1", Money::from_cents(i64::MAX / 10), 20);
        assert_eq!(result, Err(CoreError::AmountOverflow));
    }

    #[test]
    fn test_largest_representable_line_accepted() {
        let item = item(i64::MAX / 20, 20);
        assert_eq!(item.gross(), Ok(Money::from_cents(i64::MAX / 20 * 20)));
        assert!(item.total().is_positive());
    }

    #[test]
    fn test_free_item_allowed() {
        let item = item(0, 5);
        assert_eq!(item.total(), Money::zero());
    }

    #[test]
    fn test_rounding_tie_goes_away_from_zero() {
        // 0.05 × 9 = 0.45, less 10% = 0.405 → 0.41
        let item = item(5, 9);
        assert_eq!(item.total(), Money::from_cents(41));
    }

    #[test]
    fn test_recompute_is_idempotent() {
        let mut item = item(333, 7);
        let before = item.clone();
        item.apply_discount_and_compute_total().unwrap();
        item.apply_discount_and_compute_total().unwrap();
        assert_eq!(item, before);
    }

    #[test]
    fn test_cancel_zeroes_total_and_keeps_record() {
        let mut item = item(1000, 4);
        item.cancel();

        assert!(item.is_cancelled());
        assert_eq!(item.total(), Money::zero());
        assert_eq!(item.quantity(), 4);
        assert_eq!(item.unit_price(), Money::from_cents(1000));
        assert_eq!(item.discount(), DiscountRate::TEN_PERCENT);
    }

    #[test]
    fn test_cancel_twice_is_noop() {
        let mut item = item(1000, 2);
        item.cancel();
        let once = item.clone();
        item.cancel();
        assert_eq!(item, once);
    }

    #[test]
    fn test_recompute_keeps_cancelled_total_at_zero() {
        let mut item = item(1000, 12);
        item.cancel();
        item.apply_discount_and_compute_total().unwrap();
        assert_eq!(item.total(), Money::zero());
        assert_eq!(item.discount(), DiscountRate::TWENTY_PERCENT);
    }

    #[test]
    fn test_restore_rederives_totals() {
        let id = SaleItemId::new();
        let restored =
            SaleItem::restore(id, "P9", "Widget", Money::from_cents(1000), 10, false).unwrap();
        assert_eq!(restored.id(), id);
        assert_eq!(restored.total(), Money::from_cents(8000));

        let cancelled =
            SaleItem::restore(id, "P9", "Widget", Money::from_cents(1000), 10, true).unwrap();
        assert!(cancelled.is_cancelled());
        assert_eq!(cancelled.total(), Money::zero());
    }

    #[test]
    fn test_restore_rejects_corrupt_quantity() {
        assert!(SaleItem::restore(SaleItemId::new(), "P", "N", Money::zero(), 50, false).is_err());
    }

    proptest! {
        #[test]
        fn prop_no_discount_tier(price in 0i64..1_000_000, q in 1i64..=3) {
            let item = item(price, q);
            prop_assert_eq!(item.total().cents(), price * q);
        }

        #[test]
        fn prop_ten_percent_tier(price in 0i64..1_000_000, q in 4i64..=9) {
            let item = item(price, q);
            // cents × 90 / 100, half away from zero (all values non-negative)
            let expected = (price * q * 90 + 50) / 100;
            prop_assert_eq!(item.total().cents(), expected);
        }

        #[test]
        fn prop_twenty_percent_tier(price in 0i64..1_000_000, q in 10i64..=20) {
            let item = item(price, q);
            let expected = (price * q * 80 + 50) / 100;
            prop_assert_eq!(item.total().cents(), expected);
        }
    }
}
