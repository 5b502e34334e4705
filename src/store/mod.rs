//! Result store
//!
//! Persists lookup requests, cached provider results and audit entries.
//! `PgStore` backs production; `MemoryStore` is used when no database is
//! configured and in tests.

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{
    AuditLogEntry, LookupRequest, LookupResult, NewAuditLogEntry, NewLookupRequest,
    NewLookupResult,
};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("duplicate {0}")]
    Duplicate(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("{0} not found")]
    NotFound(String),
}

impl StoreError {
    pub fn is_duplicate(&self) -> bool {
        matches!(self, StoreError::Duplicate(_))
    }
}

#[async_trait]
pub trait ResultStore: Send + Sync {
    /// Insert a request row, generating an id if none was supplied
    async fn create_request(&self, data: NewLookupRequest) -> Result<LookupRequest, StoreError>;

    /// Insert a result row; a second row for the same (request, provider) is `Duplicate`
    async fn create_result(&self, data: NewLookupResult) -> Result<LookupResult, StoreError>;

    async fn create_audit_entry(&self, data: NewAuditLogEntry) -> Result<AuditLogEntry, StoreError>;

    async fn find_request(&self, id: Uuid) -> Result<Option<LookupRequest>, StoreError>;

    /// Result rows of one request ordered by provider code
    async fn results_for_request(&self, request_id: Uuid) -> Result<Vec<LookupResult>, StoreError>;
}
