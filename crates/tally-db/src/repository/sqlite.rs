//! # SQLite Sale Store
//!
//! Stores sales in the `sales` and `sale_items` tables.
//!
//! ## Save Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       save(&sale)                                       │
//! │                                                                         │
//! │  BEGIN                                                                 │
//! │   ├── INSERT INTO sales ... ON CONFLICT(id) DO UPDATE                  │
//! │   ├── DELETE FROM sale_items WHERE sale_id = ?                         │
//! │   └── INSERT INTO sale_items ... (one row per item, with position)     │
//! │  COMMIT                                                                │
//! │                                                                         │
//! │  Any failure rolls the whole sale back (tx dropped without commit).    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Load Flow
//! Rows are mapped back with `SaleItem::restore` and `Sale::restore`, which
//! recompute discounts and totals. A row those reject is `DbError::Corrupt`.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::{debug, warn};
use uuid::Uuid;

use tally_core::{Money, Sale, SaleId, SaleItem, SaleItemId};

use super::SaleStore;
use crate::error::{DbError, DbResult};

// =============================================================================
// Row Types
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct SaleRow {
    id: String,
    sale_number: String,
    date: DateTime<Utc>,
    customer_id: String,
    branch_id: String,
    is_cancelled: bool,
    total_cents: i64,
}

#[derive(Debug, sqlx::FromRow)]
struct SaleItemRow {
    id: String,
    sale_id: String,
    product_id: String,
    product_name: String,
    unit_price_cents: i64,
    quantity: i64,
    is_cancelled: bool,
}

const SALE_COLUMNS: &str =
    "id, sale_number, date, customer_id, branch_id, is_cancelled, total_cents";

const ITEM_COLUMNS: &str =
    "id, sale_id, product_id, product_name, unit_price_cents, quantity, is_cancelled";

// =============================================================================
// Store
// =============================================================================

/// `SaleStore` backed by a SQLite pool.
#[derive(Debug, Clone)]
pub struct SqliteSaleStore {
    pool: SqlitePool,
}

impl SqliteSaleStore {
    /// Creates a store over an existing pool. The schema must be migrated.
    pub fn new(pool: SqlitePool) -> Self {
        SqliteSaleStore { pool }
    }

    async fn fetch_items(&self, sale_id: &str) -> DbResult<Vec<SaleItemRow>> {
        let sql = format!(
            "SELECT {ITEM_COLUMNS} FROM sale_items WHERE sale_id = ? ORDER BY position"
        );
        let rows = sqlx::query_as::<_, SaleItemRow>(&sql)
            .bind(sale_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }
}

impl SaleStore for SqliteSaleStore {
    async fn load(&self, id: SaleId) -> DbResult<Option<Sale>> {
        let sql = format!("SELECT {SALE_COLUMNS} FROM sales WHERE id = ?");
        let row = sqlx::query_as::<_, SaleRow>(&sql)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        let Some(row) = row else {
            debug!(sale_id = %id, "Sale not in database");
            return Ok(None);
        };

        let items = self.fetch_items(&row.id).await?;
        restore_sale(row, items).map(Some)
    }

    async fn save(&self, sale: &Sale) -> DbResult<()> {
        let sale_id = sale.id().to_string();
        let now = Utc::now();

        debug!(
            sale_id = %sale_id,
            sale_number = %sale.sale_number(),
            items = sale.items().len(),
            total = %sale.total(),
            "Saving sale"
        );

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO sales (
                id, sale_number, date, customer_id, branch_id,
                is_cancelled, total_cents, created_at, updated_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                sale_number  = excluded.sale_number,
                date         = excluded.date,
                customer_id  = excluded.customer_id,
                branch_id    = excluded.branch_id,
                is_cancelled = excluded.is_cancelled,
                total_cents  = excluded.total_cents,
                updated_at   = excluded.updated_at
            "#,
        )
        .bind(&sale_id)
        .bind(sale.sale_number())
        .bind(sale.date())
        .bind(sale.customer_id())
        .bind(sale.branch_id())
        .bind(sale.is_cancelled())
        .bind(sale.total().cents())
        .bind(now)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM sale_items WHERE sale_id = ?")
            .bind(&sale_id)
            .execute(&mut *tx)
            .await?;

        for (position, item) in sale.items().iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO sale_items (
                    id, sale_id, position, product_id, product_name,
                    unit_price_cents, quantity, discount_bps, total_cents, is_cancelled
                )
                VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(item.id().to_string())
            .bind(&sale_id)
            .bind(i64::try_from(position).unwrap_or(i64::MAX))
            .bind(item.product_id())
            .bind(item.product_name())
            .bind(item.unit_price().cents())
            .bind(item.quantity())
            .bind(i64::from(item.discount().bps()))
            .bind(item.total().cents())
            .bind(item.is_cancelled())
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    async fn list(&self) -> DbResult<Vec<Sale>> {
        let sql = format!("SELECT {SALE_COLUMNS} FROM sales");
        let sale_rows = sqlx::query_as::<_, SaleRow>(&sql)
            .fetch_all(&self.pool)
            .await?;

        let sql = format!("SELECT {ITEM_COLUMNS} FROM sale_items ORDER BY sale_id, position");
        let item_rows = sqlx::query_as::<_, SaleItemRow>(&sql)
            .fetch_all(&self.pool)
            .await?;

        let mut items_by_sale: HashMap<String, Vec<SaleItemRow>> = HashMap::new();
        for row in item_rows {
            items_by_sale.entry(row.sale_id.clone()).or_default().push(row);
        }

        let mut sales = sale_rows
            .into_iter()
            .map(|row| {
                let items = items_by_sale.remove(&row.id).unwrap_or_default();
                restore_sale(row, items)
            })
            .collect::<DbResult<Vec<_>>>()?;

        // Text dates don't sort reliably across offsets and precisions
        sales.sort_by_key(|sale| (sale.date(), sale.id()));

        debug!(count = sales.len(), "Listed sales");
        Ok(sales)
    }

    async fn delete(&self, id: SaleId) -> DbResult<bool> {
        let result = sqlx::query("DELETE FROM sales WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        let deleted = result.rows_affected() > 0;
        debug!(sale_id = %id, deleted, "Deleted sale");
        Ok(deleted)
    }
}

// =============================================================================
// Rehydration
// =============================================================================

fn parse_id(entity: &str, raw: &str) -> DbResult<Uuid> {
    Uuid::parse_str(raw).map_err(|e| DbError::corrupt(entity, raw, e))
}

fn restore_item(row: SaleItemRow) -> DbResult<SaleItem> {
    let id = SaleItemId::from_uuid(parse_id("sale_item", &row.id)?);

    SaleItem::restore(
        id,
        row.product_id,
        row.product_name,
        Money::from_cents(row.unit_price_cents),
        row.quantity,
        row.is_cancelled,
    )
    .map_err(|e| DbError::corrupt("sale_item", &row.id, e))
}

fn restore_sale(row: SaleRow, item_rows: Vec<SaleItemRow>) -> DbResult<Sale> {
    let id = SaleId::from_uuid(parse_id("sale", &row.id)?);

    let items = item_rows
        .into_iter()
        .map(restore_item)
        .collect::<DbResult<Vec<_>>>()?;

    let sale = Sale::restore(
        id,
        row.sale_number,
        row.date,
        row.customer_id,
        row.branch_id,
        row.is_cancelled,
        items,
    )
    .map_err(|e| DbError::corrupt("sale", &row.id, e))?;

    if sale.total().cents() != row.total_cents {
        warn!(
            sale_id = %sale.id(),
            stored = row.total_cents,
            recomputed = sale.total().cents(),
            "Stored sale total disagrees with its items, using recomputed total"
        );
    }

    Ok(sale)
}

// =============================================================================
// Unit Tests
// =============================================================================
