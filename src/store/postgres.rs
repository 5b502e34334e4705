//! PostgreSQL store

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::{ResultStore, StoreError};
use crate::models::{
    AuditLogEntry, LookupRequest, LookupResult, NewAuditLogEntry, NewLookupRequest,
    NewLookupResult,
};

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Unique violations become `Duplicate`, everything else stays a database error
fn map_insert_error(err: sqlx::Error, what: &str) -> StoreError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => StoreError::Duplicate(what.to_string()),
        _ => StoreError::Database(err),
    }
}

#[async_trait]
impl ResultStore for PgStore {
    async fn create_request(&self, data: NewLookupRequest) -> Result<LookupRequest, StoreError> {
        LookupRequest::create(&self.pool, data)
            .await
            .map_err(|e| map_insert_error(e, "lookup request"))
    }

    async fn create_result(&self, data: NewLookupResult) -> Result<LookupResult, StoreError> {
        let what = format!("result for provider {}", data.provider_code);
        LookupResult::create(&self.pool, data)
            .await
            .map_err(|e| map_insert_error(e, &what))
    }

    async fn create_audit_entry(&self, data: NewAuditLogEntry) -> Result<AuditLogEntry, StoreError> {
        Ok(AuditLogEntry::create(&self.pool, data).await?)
    }

    async fn find_request(&self, id: Uuid) -> Result<Option<LookupRequest>, StoreError> {
        Ok(LookupRequest::find_by_id(&self.pool, id).await?)
    }

    async fn results_for_request(&self, request_id: Uuid) -> Result<Vec<LookupResult>, StoreError> {
        Ok(LookupResult::list_by_request(&self.pool, request_id).await?)
    }
}
