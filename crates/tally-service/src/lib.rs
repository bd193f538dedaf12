//! # tally-service: Sale Command and Query Handlers
//!
//! The application layer: validates requests, drives the `Sale` aggregate,
//! saves through a [`SaleStore`](tally_db::SaleStore) and publishes
//! [`SaleEvent`](tally_core::SaleEvent)s.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       tally-service                                     │
//! │                                                                         │
//! │  ┌──────────────┐   ┌─────────────────────────┐   ┌─────────────────┐  │
//! │  │ CreateSale   │──►│     SalesService<S, P>   │──►│ EventPublisher  │  │
//! │  │ UpdateSale   │   │                         │   │  Tracing / Rec. │  │
//! │  │ ids          │   │  validate → load →      │   └─────────────────┘  │
//! │  └──────────────┘   │  mutate → save →        │                        │
//! │                     │  publish                │   ┌─────────────────┐  │
//! │  ┌──────────────┐   │                         │──►│ SaleStore       │  │
//! │  │ SaleView     │◄──│  get_sale / list_sales  │   │  SQLite / mem   │  │
//! │  │ Page<_>      │   └─────────────────────────┘   └─────────────────┘  │
//! │  └──────────────┘                                                       │
//! │                                                                         │
//! │  ServiceConfig (TOML + TALLY_* env)     init_tracing (EnvFilter)        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust,ignore
//! use tally_service::{init_tracing, CreateSale, SalesService, ServiceConfig};
//!
//! let config = ServiceConfig::load(None)?;
//! init_tracing(&config.logging);
//!
//! let service = SalesService::connect(&config).await?;
//! let id = service.create_sale(CreateSale::new("CUST-1", "BR-1", items)).await?;
//! ```

pub mod commands;
pub mod config;
pub mod error;
pub mod publisher;
pub mod service;
pub mod telemetry;
pub mod views;

pub use commands::{CreateSale, UpdateSale};
pub use config::{DatabaseSettings, LoggingSettings, ServiceConfig};
pub use error::{ErrorCode, ServiceError, ServiceResult};
pub use publisher::{EventPublisher, RecordingEventPublisher, TracingEventPublisher};
pub use service::{generate_sale_number, SalesService};
pub use telemetry::init_tracing;
pub use views::{SaleItemView, SaleView};
