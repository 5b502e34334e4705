//! Lookup request / result models

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use std::collections::BTreeMap;
use uuid::Uuid;
use validator::Validate;

use super::IndicatorType;
use crate::providers::ProviderResult;

/// Body of `POST /api/v1/lookup`
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct LookupRequestDto {
    pub indicator_type: IndicatorType,
    #[validate(length(min = 1, max = 2048, message = "indicator_value must be 1-2048 characters"))]
    pub indicator_value: String,
    /// Optional allow-list of provider codes; empty means every capable provider
    #[serde(default)]
    pub providers: Option<Vec<String>>,
}

impl LookupRequestDto {
    pub fn new(indicator_type: IndicatorType, indicator_value: impl Into<String>) -> Self {
        Self {
            indicator_type,
            indicator_value: indicator_value.into(),
            providers: None,
        }
    }

    pub fn with_providers<I, S>(mut self, providers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.providers = Some(providers.into_iter().map(Into::into).collect());
        self
    }

    /// The allow-list, if one was given and it is non-empty
    pub fn allow_list(&self) -> Option<&[String]> {
        self.providers.as_deref().filter(|p| !p.is_empty())
    }
}

/// Aggregated response of one lookup, keyed by provider code
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LookupResponse {
    pub request_id: Uuid,
    pub indicator_type: IndicatorType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub indicator_value: Option<String>,
    pub results: BTreeMap<String, ProviderResult>,
}

/// Stored lookup request (one per orchestration)
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct LookupRequest {
    pub id: Uuid,
    pub indicator_type: String,
    pub indicator_value: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewLookupRequest {
    /// Generated when absent
    pub request_id: Option<Uuid>,
    pub indicator_type: IndicatorType,
    pub indicator_value: String,
}

/// Cached raw provider response tied to a lookup request
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct LookupResult {
    pub id: i64,
    pub request_id: Uuid,
    pub provider_code: String,
    pub raw_response: serde_json::Value,
    pub cached_at: DateTime<Utc>,
    pub ttl_seconds: i32,
}

#[derive(Debug, Clone)]
pub struct NewLookupResult {
    pub request_id: Uuid,
    pub provider_code: String,
    pub raw_response: serde_json::Value,
    pub ttl_seconds: i32,
}

/// `GET /api/v1/lookup/:request_id`
#[derive(Debug, Serialize, Deserialize)]
pub struct LookupHistory {
    pub request_id: Uuid,
    pub indicator_type: String,
    pub indicator_value: String,
    pub created_at: DateTime<Utc>,
    pub results: Vec<CachedResult>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CachedResult {
    pub provider_code: String,
    pub data: serde_json::Value,
    pub cached_at: DateTime<Utc>,
    pub ttl_seconds: i32,
    pub expires_at: DateTime<Utc>,
    pub fresh: bool,
}

impl LookupRequest {
    pub async fn create(pool: &PgPool, data: NewLookupRequest) -> Result<Self, sqlx::Error> {
        let id = data.request_id.unwrap_or_else(Uuid::new_v4);

        sqlx::query_as::<_, LookupRequest>(
            r#"
            INSERT INTO lookup_requests (id, indicator_type, indicator_value)
            VALUES ($1, $2, $3)
            RETURNING *
            "#
        )
        .bind(id)
        .bind(data.indicator_type.as_str())
        .bind(&data.indicator_value)
        .fetch_one(pool)
        .await
    }

    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, LookupRequest>("SELECT * FROM lookup_requests WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}

impl LookupResult {
    pub async fn create(pool: &PgPool, data: NewLookupResult) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, LookupResult>(
            r#"
            INSERT INTO lookup_results (request_id, provider_code, raw_response, ttl_seconds)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#
        )
        .bind(data.request_id)
        .bind(&data.provider_code)
        .bind(&data.raw_response)
        .bind(data.ttl_seconds)
        .fetch_one(pool)
        .await
    }

    pub async fn list_by_request(pool: &PgPool, request_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, LookupResult>(
            "SELECT * FROM lookup_results WHERE request_id = $1 ORDER BY provider_code"
        )
        .bind(request_id)
        .fetch_all(pool)
        .await
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.cached_at + Duration::seconds(i64::from(self.ttl_seconds))
    }

    /// Whether the cached payload is still within its TTL at `now`
    pub fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at()
    }

    pub fn to_cached(&self, now: DateTime<Utc>) -> CachedResult {
        CachedResult {
            provider_code: self.provider_code.clone(),
            data: self.raw_response.clone(),
            cached_at: self.cached_at,
            ttl_seconds: self.ttl_seconds,
            expires_at: self.expires_at(),
            fresh: self.is_fresh(now),
        }
    }
}

impl LookupHistory {
    pub fn new(request: LookupRequest, results: &[LookupResult], now: DateTime<Utc>) -> Self {
        Self {
            request_id: request.id,
            indicator_type: request.indicator_type,
            indicator_value: request.indicator_value,
            created_at: request.created_at,
            results: results.iter().map(|r| r.to_cached(now)).collect(),
        }
    }
}
