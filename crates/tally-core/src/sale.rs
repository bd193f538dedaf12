//! # Sale Aggregate
//!
//! The consistency boundary for one sale and its line items.
//!
//! ## Aggregate Shape
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                            Sale                                         │
//! │  id · sale_number · date · customer_id · branch_id · is_cancelled       │
//! │                                                                         │
//! │  items ──┬── SaleItem (P1, qty 4,  10%)   total  36.00                  │
//! │          ├── SaleItem (P2, qty 12, 20%)   total  96.00                  │
//! │          └── SaleItem (P3, qty 1, cancelled) total 0.00                 │
//! │                                                                         │
//! │  total = Σ total of non-cancelled items                  = 132.00       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariant
//! After every public mutation returns `Ok`, `total` equals the sum of the
//! non-cancelled item totals. A mutation that returns `Err` leaves the sale
//! exactly as it was.
//!
//! ## Cancelled Sales
//! The aggregate does not block mutations on a cancelled sale. Whether that is
//! allowed is decided by the service layer (see `tally-service`).

use chrono::{DateTime, Utc};
use std::collections::HashSet;

use crate::discount::ensure_quantity_within_limit;
use crate::error::{CoreError, CoreResult};
use crate::item::SaleItem;
use crate::money::Money;
use crate::types::{SaleId, SaleItemId};

/// A sale transaction with its owned line items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sale {
    id: SaleId,
    sale_number: String,
    date: DateTime<Utc>,
    customer_id: String,
    branch_id: String,
    is_cancelled: bool,
    total: Money,
    items: Vec<SaleItem>,
}

impl Sale {
    /// Creates an empty, non-cancelled sale with a fresh id.
    ///
    /// ## Example
    /// ```rust
    /// use chrono::Utc;
    /// use tally_core::{Money, Sale, SaleItem};
    ///
    /// let mut sale = Sale::new("S-0001", Utc::now(), "CUST-1", "BR-1");
    /// sale.add_item(SaleItem::new("P1", "Product 1", Money::from_cents(1000), 4).unwrap())
    ///     .unwrap();
    /// assert_eq!(sale.total().cents(), 3600);
    /// ```
    pub fn new(
        sale_number: impl Into<String>,
        date: DateTime<Utc>,
        customer_id: impl Into<String>,
        branch_id: impl Into<String>,
    ) -> Self {
        Sale {
            id: SaleId::new(),
            sale_number: sale_number.into(),
            date,
            customer_id: customer_id.into(),
            branch_id: branch_id.into(),
            is_cancelled: false,
            total: Money::zero(),
            items: Vec::new(),
        }
    }

    /// Rebuilds a stored sale.
    ///
    /// The total is recomputed from the items. Fails with `DuplicateItem`
    /// if two stored items share an id and with `AmountOverflow` if the
    /// items cannot be totalled.
    #[allow(clippy::too_many_arguments)]
    pub fn restore(
        id: SaleId,
        sale_number: impl Into<String>,
        date: DateTime<Utc>,
        customer_id: impl Into<String>,
        branch_id: impl Into<String>,
        is_cancelled: bool,
        items: Vec<SaleItem>,
    ) -> CoreResult<Self> {
        ensure_unique_ids(&items)?;
        let total = active_total(&items)?;

        Ok(Sale {
            id,
            sale_number: sale_number.into(),
            date,
            customer_id: customer_id.into(),
            branch_id: branch_id.into(),
            is_cancelled,
            total,
            items,
        })
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Adds an item, computes its discount and total, and refreshes the sale total.
    ///
    /// ## Errors
    /// - `QuantityTooLarge` if the item somehow carries more than 20 units
    /// - `DuplicateItem` if an item with the same id is already present
    /// - `AmountOverflow` if the new sale total does not fit
    pub fn add_item(&mut self, mut item: SaleItem) -> CoreResult<SaleItemId> {
        ensure_quantity_within_limit(item.quantity())?;

        if self.contains_item(item.id()) {
            return Err(CoreError::DuplicateItem(item.id()));
        }

        item.apply_discount_and_compute_total()?;
        let total = active_total(self.items.iter().chain(std::iter::once(&item)))?;

        let id = item.id();
        self.items.push(item);
        self.total = total;
        Ok(id)
    }

    /// Removes an item entirely and returns it.
    pub fn remove_item(&mut self, item_id: SaleItemId) -> CoreResult<SaleItem> {
        let index = self.index_of(item_id)?;
        let total = active_total(self.items_except(index))?;

        let removed = self.items.remove(index);
        self.total = total;
        Ok(removed)
    }

    /// Cancels one item. The item stays in the sale with a zero total.
    ///
    /// Cancelling an already-cancelled item succeeds and changes nothing.
    pub fn cancel_item(&mut self, item_id: SaleItemId) -> CoreResult<()> {
        let index = self.index_of(item_id)?;
        // a cancelled item contributes nothing, same as leaving it out
        let total = active_total(self.items_except(index))?;

        self.items[index].cancel();
        self.total = total;
        Ok(())
    }

    /// Marks the whole sale cancelled.
    ///
    /// Items and total are left untouched. Idempotent.
    pub fn cancel_sale(&mut self) {
        self.is_cancelled = true;
    }

    /// Recomputes `total` as the sum of non-cancelled item totals.
    ///
    /// On `AmountOverflow` the stored total is left as it was.
    pub fn recalculate_total(&mut self) -> CoreResult<()> {
        self.total = active_total(&self.items)?;
        Ok(())
    }

    /// Replaces the whole item collection.
    ///
    /// Every item is checked before anything changes, so either all items
    /// are installed or the sale is left as it was.
    pub fn replace_items<I>(&mut self, items: I) -> CoreResult<()>
    where
        I: IntoIterator<Item = SaleItem>,
    {
        let mut items: Vec<SaleItem> = items.into_iter().collect();

        for item in &items {
            ensure_quantity_within_limit(item.quantity())?;
        }
        ensure_unique_ids(&items)?;
        for item in &mut items {
            item.apply_discount_and_compute_total()?;
        }
        let total = active_total(&items)?;

        self.items = items;
        self.total = total;
        Ok(())
    }

    /// Moves the sale to a new date.
    pub fn set_date(&mut self, date: DateTime<Utc>) {
        self.date = date;
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn id(&self) -> SaleId {
        self.id
    }

    pub fn sale_number(&self) -> &str {
        &self.sale_number
    }

    pub fn date(&self) -> DateTime<Utc> {
        self.date
    }

    pub fn customer_id(&self) -> &str {
        &self.customer_id
    }

    pub fn branch_id(&self) -> &str {
        &self.branch_id
    }

    pub fn is_cancelled(&self) -> bool {
        self.is_cancelled
    }

    pub fn total(&self) -> Money {
        self.total
    }

    /// All items in insertion order, cancelled ones included.
    pub fn items(&self) -> &[SaleItem] {
        &self.items
    }

    pub fn item(&self, item_id: SaleItemId) -> Option<&SaleItem> {
        self.items.iter().find(|item| item.id() == item_id)
    }

    pub fn contains_item(&self, item_id: SaleItemId) -> bool {
        self.item(item_id).is_some()
    }

    /// Items that still count toward the total.
    pub fn active_items(&self) -> impl Iterator<Item = &SaleItem> {
        self.items.iter().filter(|item| !item.is_cancelled())
    }

    fn index_of(&self, item_id: SaleItemId) -> CoreResult<usize> {
        self.items
            .iter()
            .position(|item| item.id() == item_id)
            .ok_or(CoreError::ItemNotFound(item_id))
    }

    fn items_except(&self, index: usize) -> impl Iterator<Item = &SaleItem> {
        self.items
            .iter()
            .enumerate()
            .filter(move |(i, _)| *i != index)
            .map(|(_, item)| item)
    }
}

impl Default for Sale {
    /// An empty sale dated now, with blank references.
    fn default() -> Self {
        Sale::new(String::new(), Utc::now(), String::new(), String::new())
    }
}

/// Sum of the non-cancelled item totals.
fn active_total<'a, I>(items: I) -> CoreResult<Money>
where
    I: IntoIterator<Item = &'a SaleItem>,
{
    Money::checked_sum(
        items
            .into_iter()
            .filter(|item| !item.is_cancelled())
            .map(SaleItem::total),
    )
    .ok_or(CoreError::AmountOverflow)
}

fn ensure_unique_ids(items: &[SaleItem]) -> CoreResult<()> {
    let mut seen = HashSet::with_capacity(items.len());
    for item in items {
        if !seen.insert(item.id()) {
            return Err(CoreError::DuplicateItem(item.id()));
        }
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
