//! # In-Memory Sale Store
//!
//! A `SaleStore` kept in a map, for tests and for embedding without SQLite.
//! Sales are stored by value; callers always get clones.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::debug;

use tally_core::{Sale, SaleId};

use super::SaleStore;
use crate::error::DbResult;

/// Map-backed store. Clones share the same map.
#[derive(Debug, Clone, Default)]
pub struct InMemorySaleStore {
    sales: Arc<RwLock<HashMap<SaleId, Sale>>>,
}

impl InMemorySaleStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored sales.
    pub async fn len(&self) -> usize {
        self.sales.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sales.read().await.is_empty()
    }
}

impl SaleStore for InMemorySaleStore {
    async fn load(&self, id: SaleId) -> DbResult<Option<Sale>> {
        Ok(self.sales.read().await.get(&id).cloned())
    }

    async fn save(&self, sale: &Sale) -> DbResult<()> {
        debug!(sale_id = %sale.id(), items = sale.items().len(), "Saving sale in memory");
        self.sales.write().await.insert(sale.id(), sale.clone());
        Ok(())
    }

    async fn list(&self) -> DbResult<Vec<Sale>> {
        let mut sales: Vec<Sale> = self.sales.read().await.values().cloned().collect();
        sales.sort_by_key(|sale| (sale.date(), sale.id()));
        Ok(sales)
    }

    async fn delete(&self, id: SaleId) -> DbResult<bool> {
        Ok(self.sales.write().await.remove(&id).is_some())
    }
}
