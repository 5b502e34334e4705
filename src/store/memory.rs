//! In-memory store

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use uuid::Uuid;

use super::{ResultStore, StoreError};
use crate::models::{
    AuditLogEntry, LookupRequest, LookupResult, NewAuditLogEntry, NewLookupRequest,
    NewLookupResult,
};

#[derive(Default)]
struct Tables {
    requests: HashMap<Uuid, LookupRequest>,
    results: Vec<LookupResult>,
    audit: Vec<AuditLogEntry>,
}

/// Same contract as the Postgres store, including the foreign-key and
/// (request, provider) uniqueness rules. Nothing is ever evicted.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every audit entry, oldest first
    pub fn audit_entries(&self) -> Vec<AuditLogEntry> {
        self.tables.read().audit.clone()
    }

    pub fn result_count(&self) -> usize {
        self.tables.read().results.len()
    }
}

#[async_trait]
impl ResultStore for MemoryStore {
    async fn create_request(&self, data: NewLookupRequest) -> Result<LookupRequest, StoreError> {
        let request = LookupRequest {
            id: data.request_id.unwrap_or_else(Uuid::new_v4),
            indicator_type: data.indicator_type.as_str().to_string(),
            indicator_value: data.indicator_value,
            created_at: Utc::now(),
        };

        let mut tables = self.tables.write();
        if tables.requests.contains_key(&request.id) {
            return Err(StoreError::Duplicate(format!("lookup request {}", request.id)));
        }
        tables.requests.insert(request.id, request.clone());
        Ok(request)
    }

    async fn create_result(&self, data: NewLookupResult) -> Result<LookupResult, StoreError> {
        let mut tables = self.tables.write();

        if !tables.requests.contains_key(&data.request_id) {
            return Err(StoreError::NotFound(format!("lookup request {}", data.request_id)));
        }
        let exists = tables
            .results
            .iter()
            .any(|r| r.request_id == data.request_id && r.provider_code == data.provider_code);
        if exists {
            return Err(StoreError::Duplicate(format!("result for provider {}", data.provider_code)));
        }

        let result = LookupResult {
            id: tables.results.len() as i64 + 1,
            request_id: data.request_id,
            provider_code: data.provider_code,
            raw_response: data.raw_response,
            cached_at: Utc::now(),
            ttl_seconds: data.ttl_seconds,
        };
        tables.results.push(result.clone());
        Ok(result)
    }

    async fn create_audit_entry(&self, data: NewAuditLogEntry) -> Result<AuditLogEntry, StoreError> {
        let mut tables = self.tables.write();
        let entry = AuditLogEntry {
            id: tables.audit.len() as i64 + 1,
            request_id: data.request_id,
            action: data.action,
            resource_type: data.resource_type,
            resource_id: data.resource_id,
            ip_hash: data.ip_hash,
            created_at: Utc::now(),
        };
        tables.audit.push(entry.clone());
        Ok(entry)
    }

    async fn find_request(&self, id: Uuid) -> Result<Option<LookupRequest>, StoreError> {
        Ok(self.tables.read().requests.get(&id).cloned())
    }

    async fn results_for_request(&self, request_id: Uuid) -> Result<Vec<LookupResult>, StoreError> {
        let mut results: Vec<LookupResult> = self
            .tables
            .read()
            .results
            .iter()
            .filter(|r| r.request_id == request_id)
            .cloned()
            .collect();
        results.sort_by(|a, b| a.provider_code.cmp(&b.provider_code));
        Ok(results)
    }
}
