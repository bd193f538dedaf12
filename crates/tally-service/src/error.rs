//! # Service Error Types
//!
//! What callers of the sale handlers see.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Service Error Categories                          │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │  Client errors  │  │  Lookup         │  │  Failures               │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  Core (domain   │  │  NotFound       │  │  Db                     │ │
//! │  │   rule or       │  │                 │  │  Config                 │ │
//! │  │   validation)   │  │                 │  │  Core (contract kind)   │ │
//! │  │  SaleCancelled  │  │                 │  │                         │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use thiserror::Error;

use tally_core::{CoreError, ErrorKind, SaleId, ValidationError};
use tally_db::DbError;

/// Result type alias for service operations.
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Errors returned by [`SalesService`](crate::SalesService) and configuration loading.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The Sale aggregate or input validation refused the request.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Storage failed.
    #[error("Storage error: {0}")]
    Db(#[from] DbError),

    /// No sale with this id.
    #[error("Sale not found: {0}")]
    NotFound(SaleId),

    /// The sale is cancelled and can no longer be changed.
    #[error("Sale {0} is cancelled")]
    SaleCancelled(SaleId),

    /// Configuration could not be read, parsed or validated.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<ValidationError> for ServiceError {
    fn from(err: ValidationError) -> Self {
        ServiceError::Core(CoreError::Validation(err))
    }
}

impl From<toml::de::Error> for ServiceError {
    fn from(err: toml::de::Error) -> Self {
        ServiceError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for ServiceError {
    fn from(err: toml::ser::Error) -> Self {
        ServiceError::Config(err.to_string())
    }
}

impl From<std::io::Error> for ServiceError {
    fn from(err: std::io::Error) -> Self {
        ServiceError::Config(err.to_string())
    }
}

/// Machine-readable error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Resource not found (404)
    NotFound,
    /// Input validation failed (400)
    ValidationError,
    /// Business rule refused the change (422)
    BusinessLogic,
    /// Database operation failed (500)
    DatabaseError,
    /// Bad configuration (500)
    Configuration,
    /// Programming error in the calling layer (500)
    Internal,
}

impl ServiceError {
    /// Whether the caller can fix this by changing the request.
    pub fn is_client_error(&self) -> bool {
        match self {
            ServiceError::Core(err) => err.is_domain_rule(),
            ServiceError::NotFound(_) | ServiceError::SaleCancelled(_) => true,
            ServiceError::Db(_) | ServiceError::Config(_) => false,
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            ServiceError::Core(CoreError::Validation(_)) => ErrorCode::ValidationError,
            ServiceError::Core(CoreError::ItemNotFound(_)) => ErrorCode::NotFound,
            ServiceError::Core(err) => match err.kind() {
                ErrorKind::DomainRule => ErrorCode::BusinessLogic,
                ErrorKind::Contract => ErrorCode::Internal,
            },
            ServiceError::NotFound(_) => ErrorCode::NotFound,
            ServiceError::SaleCancelled(_) => ErrorCode::BusinessLogic,
            ServiceError::Db(_) => ErrorCode::DatabaseError,
            ServiceError::Config(_) => ErrorCode::Configuration,
        }
    }
}
