//! # Event Publishing
//!
//! Delivery of [`SaleEvent`]s after a change is saved.
//!
//! ## Delivery Rules
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  SalesService                                                          │
//! │       │ save(&sale) ✓                                                   │
//! │       ▼                                                                 │
//! │  publisher.publish(&event)                                             │
//! │       │                                                                 │
//! │       ├── delivered     → done                                          │
//! │       └── failed        → logged here, the command still succeeds       │
//! │                                                                         │
//! │  Publishing returns nothing, so a failure can't reach the caller.       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::future::Future;
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{info, warn};

use tally_core::SaleEvent;

/// Sink for sale events.
pub trait EventPublisher: Send + Sync {
    /// Delivers one event. Implementations log their own failures.
    fn publish(&self, event: &SaleEvent) -> impl Future<Output = ()> + Send;
}

// =============================================================================
// Tracing Publisher
// =============================================================================

/// Writes each event as a JSON payload to the log at info level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingEventPublisher;

impl TracingEventPublisher {
    pub fn new() -> Self {
        TracingEventPublisher
    }
}

impl EventPublisher for TracingEventPublisher {
    async fn publish(&self, event: &SaleEvent) {
        match serde_json::to_string(event) {
            Ok(payload) => info!(
                event_type = event.event_type(),
                sale_id = %event.sale_id(),
                payload = %payload,
                "Sale event published"
            ),
            Err(e) => warn!(
                event_type = event.event_type(),
                sale_id = %event.sale_id(),
                error = %e,
                "Failed to serialize sale event"
            ),
        }
    }
}

// =============================================================================
// Recording Publisher
// =============================================================================

/// Keeps published events in memory. Clones share the same buffer.
#[derive(Debug, Clone, Default)]
pub struct RecordingEventPublisher {
    events: Arc<Mutex<Vec<SaleEvent>>>,
}

impl RecordingEventPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything published so far, oldest first.
    pub async fn events(&self) -> Vec<SaleEvent> {
        self.events.lock().await.clone()
    }

    /// Event type names in publish order.
    pub async fn event_types(&self) -> Vec<&'static str> {
        self.events
            .lock()
            .await
            .iter()
            .map(SaleEvent::event_type)
            .collect()
    }

    pub async fn clear(&self) {
        self.events.lock().await.clear();
    }
}

impl EventPublisher for RecordingEventPublisher {
    async fn publish(&self, event: &SaleEvent) {
        self.events.lock().await.push(event.clone());
    }
}
