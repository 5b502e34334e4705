//! Audit log model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use sqlx::{FromRow, PgPool};
use std::net::IpAddr;
use uuid::Uuid;

pub const ACTION_LOOKUP: &str = "lookup";
pub const RESOURCE_LOOKUP_REQUEST: &str = "lookup_request";

/// Append-only audit record. Never holds the indicator value or a raw payload.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AuditLogEntry {
    pub id: i64,
    pub request_id: Option<Uuid>,
    pub action: String,
    pub resource_type: String,
    pub resource_id: String,
    pub ip_hash: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewAuditLogEntry {
    pub request_id: Option<Uuid>,
    pub action: String,
    pub resource_type: String,
    pub resource_id: String,
    pub ip_hash: Option<String>,
}

impl NewAuditLogEntry {
    /// Entry written once per completed lookup
    pub fn lookup(request_id: Uuid, client_ip: Option<IpAddr>) -> Self {
        Self {
            request_id: Some(request_id),
            action: ACTION_LOOKUP.to_string(),
            resource_type: RESOURCE_LOOKUP_REQUEST.to_string(),
            resource_id: request_id.to_string(),
            ip_hash: client_ip.map(hash_ip),
        }
    }
}

/// SHA-256 hex of the client address; the address itself is never stored
pub fn hash_ip(ip: IpAddr) -> String {
    let mut hasher = Sha256::new();
    hasher.update(ip.to_string().as_bytes());
    format!("{:x}", hasher.finalize())
}

impl AuditLogEntry {
    pub async fn create(pool: &PgPool, data: NewAuditLogEntry) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, AuditLogEntry>(
            r#"
            INSERT INTO audit_logs (request_id, action, resource_type, resource_id, ip_hash)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#
        )
        .bind(data.request_id)
        .bind(&data.action)
        .bind(&data.resource_type)
        .bind(&data.resource_id)
        .bind(&data.ip_hash)
        .fetch_one(pool)
        .await
    }
}
