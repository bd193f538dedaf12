//! # Sales Service
//!
//! Command and query handlers for sales.
//!
//! ## Command Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Command Handling                                     │
//! │                                                                         │
//! │  CreateSale / UpdateSale / cancel / remove                             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  1. validate input          (tally_core::validation)                   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  2. load sale               (SaleStore)    → NotFound                  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  3. refuse if cancelled     (update, cancel_item, remove_item)         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  4. mutate the aggregate    (Sale keeps totals consistent)             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  5. save                    (SaleStore, one transaction)               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  6. publish event           (EventPublisher, failures only logged)     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Nothing is published unless the save succeeded.

use chrono::Utc;
use tracing::{debug, info};
use uuid::Uuid;

use tally_core::validation::{validate_new_sale, validate_sale_update};
use tally_core::{
    CoreError, CoreResult, Page, PageRequest, Sale, SaleEvent, SaleId, SaleItem, SaleItemId,
    SaleItemInput,
};
use tally_db::{Database, SaleStore, SqliteSaleStore};

use crate::commands::{CreateSale, UpdateSale};
use crate::config::ServiceConfig;
use crate::error::{ServiceError, ServiceResult};
use crate::publisher::{EventPublisher, TracingEventPublisher};
use crate::views::SaleView;

/// Generates a sale number: the 32 hex digits of a fresh UUID.
pub fn generate_sale_number() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Sale handlers over a store and a publisher.
#[derive(Debug, Clone)]
pub struct SalesService<S, P> {
    store: S,
    publisher: P,
}

impl SalesService<SqliteSaleStore, TracingEventPublisher> {
    /// Opens the configured database and wires the SQLite store with the
    /// tracing publisher.
    pub async fn connect(config: &ServiceConfig) -> ServiceResult<Self> {
        let db = Database::new(config.db_config()).await?;
        Ok(SalesService::new(db.sales(), TracingEventPublisher::new()))
    }
}

impl<S, P> SalesService<S, P>
where
    S: SaleStore,
    P: EventPublisher,
{
    pub fn new(store: S, publisher: P) -> Self {
        SalesService { store, publisher }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn publisher(&self) -> &P {
        &self.publisher
    }

    // =========================================================================
    // Commands
    // =========================================================================

    /// Records a new sale and publishes `SaleCreated`.
    pub async fn create_sale(&self, cmd: CreateSale) -> ServiceResult<SaleId> {
        validate_new_sale(
            &cmd.customer_id,
            &cmd.branch_id,
            cmd.sale_number.as_deref(),
            &cmd.items,
        )?;

        let sale_number = match cmd.sale_number.as_deref().map(str::trim) {
            Some(number) if !number.is_empty() => number.to_string(),
            _ => generate_sale_number(),
        };

        let mut sale = Sale::new(
            sale_number,
            cmd.date.unwrap_or_else(Utc::now),
            cmd.customer_id.trim(),
            cmd.branch_id.trim(),
        );
        for item in build_items(&cmd.items)? {
            sale.add_item(item)?;
        }

        self.store.save(&sale).await?;

        info!(
            sale_id = %sale.id(),
            sale_number = %sale.sale_number(),
            items = sale.items().len(),
            total = %sale.total(),
            "Sale created"
        );

        self.publisher.publish(&SaleEvent::created(&sale)).await;
        Ok(sale.id())
    }

    /// Replaces a sale's items and publishes `SaleModified`.
    ///
    /// ## Errors
    /// - `NotFound` for an unknown sale
    /// - `SaleCancelled` if the sale was cancelled
    /// - `Core` if an item breaks a rule; the stored sale is untouched
    pub async fn update_sale(&self, cmd: UpdateSale) -> ServiceResult<SaleId> {
        validate_sale_update(&cmd.items)?;

        let mut sale = self.load_open(cmd.sale_id).await?;
        sale.replace_items(build_items(&cmd.items)?)?;
        if let Some(date) = cmd.date {
            sale.set_date(date);
        }

        self.store.save(&sale).await?;

        info!(
            sale_id = %sale.id(),
            items = sale.items().len(),
            total = %sale.total(),
            "Sale updated"
        );

        self.publisher.publish(&SaleEvent::modified(&sale)).await;
        Ok(sale.id())
    }

    /// Cancels a whole sale and publishes `SaleCancelled`.
    ///
    /// Cancelling an already-cancelled sale succeeds without saving or
    /// publishing anything.
    pub async fn cancel_sale(&self, sale_id: SaleId) -> ServiceResult<()> {
        let mut sale = self.load(sale_id).await?;

        if sale.is_cancelled() {
            debug!(sale_id = %sale_id, "Sale already cancelled");
            return Ok(());
        }

        sale.cancel_sale();
        self.store.save(&sale).await?;

        info!(sale_id = %sale_id, sale_number = %sale.sale_number(), "Sale cancelled");

        self.publisher.publish(&SaleEvent::cancelled(&sale)).await;
        Ok(())
    }

    /// Cancels one item and publishes `ItemCancelled` with the new total.
    ///
    /// Cancelling an already-cancelled item succeeds without saving or
    /// publishing anything.
    pub async fn cancel_item(&self, sale_id: SaleId, item_id: SaleItemId) -> ServiceResult<()> {
        let mut sale = self.load_open(sale_id).await?;

        let already_cancelled = sale
            .item(item_id)
            .map(SaleItem::is_cancelled)
            .ok_or(CoreError::ItemNotFound(item_id))?;
        if already_cancelled {
            debug!(sale_id = %sale_id, item_id = %item_id, "Item already cancelled");
            return Ok(());
        }

        sale.cancel_item(item_id)?;
        self.store.save(&sale).await?;

        info!(
            sale_id = %sale_id,
            item_id = %item_id,
            total = %sale.total(),
            "Sale item cancelled"
        );

        self.publisher
            .publish(&SaleEvent::item_cancelled(&sale, item_id))
            .await;
        Ok(())
    }

    /// Removes one item entirely and publishes `SaleModified`.
    pub async fn remove_item(&self, sale_id: SaleId, item_id: SaleItemId) -> ServiceResult<()> {
        let mut sale = self.load_open(sale_id).await?;

        let removed = sale.remove_item(item_id)?;
        self.store.save(&sale).await?;

        info!(
            sale_id = %sale_id,
            item_id = %item_id,
            product_id = %removed.product_id(),
            total = %sale.total(),
            "Sale item removed"
        );

        self.publisher.publish(&SaleEvent::modified(&sale)).await;
        Ok(())
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Returns one sale with all of its items.
    pub async fn get_sale(&self, sale_id: SaleId) -> ServiceResult<SaleView> {
        let sale = self.load(sale_id).await?;
        Ok(SaleView::from(&sale))
    }

    /// Returns one page of sales ordered by date, oldest first.
    pub async fn list_sales(&self, request: PageRequest) -> ServiceResult<Page<SaleView>> {
        let mut sales = self.store.list().await?;
        sales.sort_by_key(|sale| (sale.date(), sale.id()));

        let page = Page::paginate(sales, request).map(SaleView::from);

        debug!(
            page = page.current_page,
            total_items = page.total_items,
            total_pages = page.total_pages,
            "Listed sales"
        );
        Ok(page)
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    async fn load(&self, sale_id: SaleId) -> ServiceResult<Sale> {
        self.store
            .load(sale_id)
            .await?
            .ok_or(ServiceError::NotFound(sale_id))
    }

    /// Loads a sale that may still be changed.
    async fn load_open(&self, sale_id: SaleId) -> ServiceResult<Sale> {
        let sale = self.load(sale_id).await?;
        if sale.is_cancelled() {
            return Err(ServiceError::SaleCancelled(sale_id));
        }
        Ok(sale)
    }
}

fn build_items(inputs: &[SaleItemInput]) -> CoreResult<Vec<SaleItem>> {
    inputs.iter().map(SaleItem::from_input).collect()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::publisher::RecordingEventPublisher;
    use chrono::{DateTime, Duration};
    use tally_core::{Money, ValidationError};
    use tally_db::{DbConfig, InMemorySaleStore};

    type TestService = SalesService<InMemorySaleStore, RecordingEventPublisher>;

    fn service() -> TestService {
        SalesService::new(InMemorySaleStore::new(), RecordingEventPublisher::new())
    }

    fn line(product: &str, price_cents: i64, quantity: i64) -> SaleItemInput {
        SaleItemInput::new(
            product,
            format!("Product {}", product),
            Money::from_cents(price_cents),
            quantity,
        )
    }

    async fn create(service: &TestService, items: Vec<SaleItemInput>) -> SaleId {
        service
            .create_sale(CreateSale::new("CUST-1", "BR-1", items))
            .await
            .unwrap()
    }

    // -------------------------------------------------------------------------
    // create_sale
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_create_sale_applies_discounts_and_publishes() {
        let service = service();
        let id = create(&service, vec![line("P1", 1000, 4), line("P2", 500, 10)]).await;

        let view = service.get_sale(id).await.unwrap();
        assert_eq!(view.total, Money::from_cents(7600));
        assert_eq!(view.items.len(), 2);
        assert_eq!(view.customer_id, "CUST-1");
        assert!(!view.is_cancelled);

        let events = service.publisher().events().await;
        assert_eq!(events.len(), 1);
        match &events[0] {
            SaleEvent::SaleCreated {
                sale_id,
                sale_number,
                total,
                ..
            } => {
                assert_eq!(*sale_id, id);
                assert_eq!(sale_number, &view.sale_number);
                assert_eq!(*total, Money::from_cents(7600));
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_create_sale_generates_sale_number_when_blank() {
        let service = service();
        let id = service
            .create_sale(CreateSale::new("C", "B", vec![line("P1", 100, 1)]).with_sale_number("  "))
            .await
            .unwrap();

        let number = service.get_sale(id).await.unwrap().sale_number;
        assert_eq!(number.len(), 32);
        assert!(number.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[tokio::test]
    async fn test_create_sale_keeps_given_number_and_date() {
        let service = service();
        let date = DateTime::parse_from_rfc3339("2024-03-01T10:00:00Z")
            .unwrap()
            .with_timezone(&Utc);

        let id = service
            .create_sale(
                CreateSale::new("C", "B", vec![line("P1", 100, 1)])
                    .with_sale_number("S-2024-0001")
                    .with_date(date),
            )
            .await
            .unwrap();

        let view = service.get_sale(id).await.unwrap();
        assert_eq!(view.sale_number, "S-2024-0001");
        assert_eq!(view.date, date);
    }

    #[tokio::test]
    async fn test_create_sale_rejects_invalid_input_without_side_effects() {
        let service = service();

        let err = service
            .create_sale(CreateSale::new("", "B", vec![line("P1", 100, 1)]))
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::ValidationError);

        let err = service
            .create_sale(CreateSale::new("C", "B", Vec::new()))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Core(CoreError::Validation(ValidationError::Empty { .. }))
        ));

        let err = service
            .create_sale(CreateSale::new("C", "B", vec![line("P1", 100, 21)]))
            .await
            .unwrap_err();
        assert!(err.is_client_error());

        assert!(service.store().is_empty().await);
        assert!(service.publisher().events().await.is_empty());
    }

    #[tokio::test]
    async fn test_create_sale_with_unrepresentable_total_is_rejected() {
        let service = service();

        let err = service
            .create_sale(CreateSale::new(
                "C",
                "B",
                vec![line("P1", i64::MAX / 10, 20)],
            ))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Core(CoreError::AmountOverflow)));
        assert!(err.is_client_error());

        let big = i64::MAX / 2 + 1;
        let err = service
            .create_sale(CreateSale::new(
                "C",
                "B",
                vec![line("P1", big, 1), line("P2", big, 1)],
            ))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Core(CoreError::AmountOverflow)));

        assert!(service.store().is_empty().await);
        assert!(service.publisher().events().await.is_empty());
    }

    // -------------------------------------------------------------------------
    // update_sale
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_update_sale_replaces_items() {
        let service = service();
        let id = create(&service, vec![line("OLD", 9999, 1)]).await;

        service
            .update_sale(UpdateSale::new(id, vec![line("P1", 1000, 2), line("P2", 1000, 4)]))
            .await
            .unwrap();

        let view = service.get_sale(id).await.unwrap();
        assert_eq!(view.total, Money::from_cents(5600));
        assert!(view.items.iter().all(|i| i.product_id != "OLD"));
        assert_eq!(
            service.publisher().event_types().await,
            vec!["sale_created", "sale_modified"]
        );
    }

    #[tokio::test]
    async fn test_update_sale_with_empty_items_clears_total() {
        let service = service();
        let id = create(&service, vec![line("P1", 1000, 1)]).await;

        service.update_sale(UpdateSale::new(id, Vec::new())).await.unwrap();

        let view = service.get_sale(id).await.unwrap();
        assert!(view.items.is_empty());
        assert_eq!(view.total, Money::zero());
    }

    #[tokio::test]
    async fn test_update_sale_moves_date() {
        let service = service();
        let id = create(&service, vec![line("P1", 1000, 1)]).await;
        let date = Utc::now() - Duration::days(3);

        service
            .update_sale(UpdateSale::new(id, vec![line("P1", 1000, 1)]).with_date(date))
            .await
            .unwrap();

        assert_eq!(service.get_sale(id).await.unwrap().date, date);
    }

    #[tokio::test]
    async fn test_update_rejected_batch_leaves_sale_intact() {
        let service = service();
        let id = create(&service, vec![line("P1", 1000, 4)]).await;
        let before = service.get_sale(id).await.unwrap();

        let err = service
            .update_sale(UpdateSale::new(id, vec![line("P2", 100, 1), line("P3", 100, 25)]))
            .await
            .unwrap_err();

        assert!(err.is_client_error());
        assert_eq!(service.get_sale(id).await.unwrap(), before);
        assert_eq!(service.publisher().events().await.len(), 1);
    }

    #[tokio::test]
    async fn test_update_unknown_sale_is_not_found() {
        let service = service();
        let missing = SaleId::new();

        let err = service
            .update_sale(UpdateSale::new(missing, vec![line("P1", 100, 1)]))
            .await
            .unwrap_err();

        assert!(matches!(err, ServiceError::NotFound(id) if id == missing));
    }

    // -------------------------------------------------------------------------
    // Cancellation
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_cancel_sale_keeps_total_and_publishes_once() {
        let service = service();
        let id = create(&service, vec![line("P1", 1000, 4)]).await;

        service.cancel_sale(id).await.unwrap();
        service.cancel_sale(id).await.unwrap();

        let view = service.get_sale(id).await.unwrap();
        assert!(view.is_cancelled);
        assert_eq!(view.total, Money::from_cents(3600));
        assert_eq!(
            service.publisher().event_types().await,
            vec!["sale_created", "sale_cancelled"]
        );
    }

    #[tokio::test]
    async fn test_cancelled_sale_refuses_changes() {
        let service = service();
        let id = create(&service, vec![line("P1", 1000, 1)]).await;
        let item_id = service.get_sale(id).await.unwrap().items[0].id;
        service.cancel_sale(id).await.unwrap();

        let err = service
            .update_sale(UpdateSale::new(id, vec![line("P2", 100, 1)]))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::SaleCancelled(_)));

        let err = service.cancel_item(id, item_id).await.unwrap_err();
        assert!(matches!(err, ServiceError::SaleCancelled(_)));

        let err = service.remove_item(id, item_id).await.unwrap_err();
        assert!(matches!(err, ServiceError::SaleCancelled(_)));
    }

    #[tokio::test]
    async fn test_cancel_item_updates_total() {
        let service = service();
        let id = create(&service, vec![line("P1", 1000, 1), line("P2", 1000, 1)]).await;
        let first = service.get_sale(id).await.unwrap().items[0].id;

        service.cancel_item(id, first).await.unwrap();
        service.cancel_item(id, first).await.unwrap();

        let view = service.get_sale(id).await.unwrap();
        assert_eq!(view.total, Money::from_cents(1000));
        assert_eq!(view.items.len(), 2);
        assert!(view.items[0].is_cancelled);
        assert_eq!(view.items[0].total, Money::zero());

        let events = service.publisher().events().await;
        assert_eq!(events.len(), 2);
        assert_eq!(
            events[1],
            SaleEvent::ItemCancelled {
                sale_id: id,
                item_id: first,
                total: Money::from_cents(1000),
            }
        );
    }

    #[tokio::test]
    async fn test_cancel_unknown_item() {
        let service = service();
        let id = create(&service, vec![line("P1", 1000, 1)]).await;
        let missing = SaleItemId::new();

        let err = service.cancel_item(id, missing).await.unwrap_err();
        assert!(matches!(err, ServiceError::Core(CoreError::ItemNotFound(i)) if i == missing));
        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_remove_item() {
        let service = service();
        let id = create(&service, vec![line("P1", 1000, 1), line("P2", 500, 4)]).await;
        let first = service.get_sale(id).await.unwrap().items[0].id;

        service.remove_item(id, first).await.unwrap();

        let view = service.get_sale(id).await.unwrap();
        assert_eq!(view.items.len(), 1);
        assert_eq!(view.total, Money::from_cents(1800));
        assert_eq!(
            service.publisher().event_types().await,
            vec!["sale_created", "sale_modified"]
        );
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_get_unknown_sale() {
        let service = service();
        let err = service.get_sale(SaleId::new()).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_list_sales_pages_by_date() {
        let service = service();
        let base = Utc::now();

        let mut ids = Vec::new();
        for offset in [5, 1, 3, 2, 4] {
            let id = service
                .create_sale(
                    CreateSale::new("C", "B", vec![line("P", 100, 1)])
                        .with_sale_number(format!("S-{offset}"))
                        .with_date(base + Duration::minutes(offset)),
                )
                .await
                .unwrap();
            ids.push(id);
        }

        let page = service.list_sales(PageRequest::new(1, 2)).await.unwrap();
        let numbers: Vec<_> = page.data.iter().map(|s| s.sale_number.as_str()).collect();
        assert_eq!(numbers, vec!["S-1", "S-2"]);
        assert_eq!(page.total_items, 5);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.current_page, 1);

        let last = service.list_sales(PageRequest::new(3, 2)).await.unwrap();
        assert_eq!(last.data.len(), 1);
        assert_eq!(last.data[0].sale_number, "S-5");

        let normalized = service.list_sales(PageRequest { page: 0, size: 0 }).await.unwrap();
        assert_eq!(normalized.current_page, 1);
        assert_eq!(normalized.data.len(), 1);
        assert_eq!(normalized.total_pages, 5);
    }

    #[tokio::test]
    async fn test_list_sales_breaks_date_ties_by_id() {
        let service = service();
        let date = Utc::now();

        let mut ids = Vec::new();
        for _ in 0..4 {
            ids.push(
                service
                    .create_sale(
                        CreateSale::new("C", "B", vec![line("P", 100, 1)]).with_date(date),
                    )
                    .await
                    .unwrap(),
            );
        }
        ids.sort();

        let page = service.list_sales(PageRequest::new(1, 10)).await.unwrap();
        let listed: Vec<_> = page.data.iter().map(|s| s.id).collect();
        assert_eq!(listed, ids);
    }

    // -------------------------------------------------------------------------
    // SQLite-backed flow
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_full_flow_on_sqlite() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let service = SalesService::new(db.sales(), RecordingEventPublisher::new());

        let id = service
            .create_sale(CreateSale::new(
                "CUST-1",
                "BR-1",
                vec![line("P1", 1000, 2), line("P2", 1000, 4)],
            ))
            .await
            .unwrap();
        assert_eq!(service.get_sale(id).await.unwrap().total, Money::from_cents(5600));

        let second = service.get_sale(id).await.unwrap().items[1].id;
        service.cancel_item(id, second).await.unwrap();
        assert_eq!(service.get_sale(id).await.unwrap().total, Money::from_cents(2000));

        service.cancel_sale(id).await.unwrap();
        let view = service.get_sale(id).await.unwrap();
        assert!(view.is_cancelled);
        assert_eq!(view.total, Money::from_cents(2000));

        let page = service.list_sales(PageRequest::default()).await.unwrap();
        assert_eq!(page.total_items, 1);
        assert_eq!(
            service.publisher().event_types().await,
            vec!["sale_created", "item_cancelled", "sale_cancelled"]
        );
    }

    #[tokio::test]
    async fn test_connect_with_config() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = ServiceConfig::default();
        config.database.path = dir.path().join("sales.db");

        let service = SalesService::connect(&config).await.unwrap();
        let id = service
            .create_sale(CreateSale::new("C", "B", vec![line("P1", 250, 3)]))
            .await
            .unwrap();

        assert_eq!(service.get_sale(id).await.unwrap().total, Money::from_cents(750));
    }
}
