//! Lookup orchestration
//!
//! One lookup selects the adapters for the indicator type, records the
//! request, runs every adapter concurrently under one shared deadline and
//! collects the outcomes keyed by provider code. Successful payloads are
//! cached as each adapter completes; an audit entry closes the lookup.
//!
//! Only the request insert can fail a lookup. Everything after it is
//! best-effort and never changes the response.

use std::collections::BTreeMap;
use std::net::IpAddr;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::task::JoinSet;
use tokio::time::Instant;
use uuid::Uuid;

use crate::middleware::redact::redact;
use crate::models::{
    IndicatorType, LookupRequestDto, LookupResponse, NewAuditLogEntry, NewLookupRequest,
    NewLookupResult,
};
use crate::providers::{ProviderAdapter, ProviderError, ProviderResult};
use crate::registry::Registry;
use crate::store::{ResultStore, StoreError};

pub const DEADLINE_EXCEEDED: &str = "deadline exceeded";
pub const TASK_FAILED: &str = "provider task failed";

pub struct LookupService {
    registry: Arc<Registry>,
    store: Arc<dyn ResultStore>,
    cache_ttl_seconds: i32,
    timeout: Duration,
}

impl LookupService {
    pub fn new(
        registry: Arc<Registry>,
        store: Arc<dyn ResultStore>,
        cache_ttl_seconds: i32,
        timeout: Duration,
    ) -> Self {
        Self {
            registry,
            store,
            cache_ttl_seconds,
            timeout,
        }
    }

    /// Adapters for the type, narrowed to the allow-list when one is given
    pub fn select(
        &self,
        indicator_type: IndicatorType,
        allow_list: Option<&[String]>,
    ) -> Vec<Arc<dyn ProviderAdapter>> {
        let candidates = self.registry.adapters_for_type(indicator_type);
        match allow_list {
            Some(codes) => candidates
                .into_iter()
                .filter(|a| codes.iter().any(|c| c == a.code()))
                .collect(),
            None => candidates,
        }
    }

    pub async fn lookup(
        &self,
        dto: &LookupRequestDto,
        client_ip: Option<IpAddr>,
    ) -> Result<LookupResponse, StoreError> {
        let indicator_type = dto.indicator_type;
        let adapters = self.select(indicator_type, dto.allow_list());

        let request = self
            .store
            .create_request(NewLookupRequest {
                request_id: None,
                indicator_type,
                indicator_value: dto.indicator_value.clone(),
            })
            .await?;

        tracing::info!(
            "Lookup {} for {} {} dispatched to {} providers",
            request.id,
            indicator_type,
            redact(&dto.indicator_value),
            adapters.len()
        );

        let results = self.dispatch(request.id, indicator_type, &dto.indicator_value, adapters).await;

        if let Err(e) = self
            .store
            .create_audit_entry(NewAuditLogEntry::lookup(request.id, client_ip))
            .await
        {
            tracing::warn!("Failed to write audit entry for lookup {}: {}", request.id, e);
        }

        let succeeded = results.values().filter(|r| r.success).count();
        tracing::info!(
            "Lookup {} completed: {}/{} providers succeeded",
            request.id,
            succeeded,
            results.len()
        );

        Ok(LookupResponse {
            request_id: request.id,
            indicator_type,
            indicator_value: Some(dto.indicator_value.clone()),
            results,
        })
    }

    /// Run every adapter concurrently and wait for all of them
    async fn dispatch(
        &self,
        request_id: Uuid,
        indicator_type: IndicatorType,
        value: &str,
        adapters: Vec<Arc<dyn ProviderAdapter>>,
    ) -> BTreeMap<String, ProviderResult> {
        let collected = Arc::new(Mutex::new(BTreeMap::new()));
        let deadline = Instant::now() + self.timeout;
        let value: Arc<str> = Arc::from(value);
        let codes: Vec<String> = adapters.iter().map(|a| a.code().to_string()).collect();

        // Dropping the set aborts whatever is still running
        let mut tasks = JoinSet::new();
        for adapter in adapters {
            let store = Arc::clone(&self.store);
            let collected = Arc::clone(&collected);
            let value = Arc::clone(&value);
            let ttl_seconds = self.cache_ttl_seconds;

            tasks.spawn(async move {
                let code = adapter.code().to_string();
                let result = call_with_deadline(adapter.as_ref(), indicator_type, &value, deadline).await;

                if result.is_persistable() {
                    persist_result(store.as_ref(), request_id, &code, &result, ttl_seconds).await;
                }
                collected.lock().insert(code, result);
            });
        }

        while let Some(joined) = tasks.join_next().await {
            if let Err(e) = joined {
                tracing::error!("Provider task for lookup {} failed: {}", request_id, e);
            }
        }

        let mut results = std::mem::take(&mut *collected.lock());
        // A task that panicked never reported back
        for code in codes {
            results
                .entry(code)
                .or_insert_with_key(|code| ProviderResult::failure(code, TASK_FAILED));
        }
        results
    }

    /// Invoke one adapter directly, bypassing type selection.
    ///
    /// Provider-level failures come back as `Ok`; only errors the adapter
    /// could not classify are returned as `Err`.
    pub async fn lookup_single(
        &self,
        adapter: &dyn ProviderAdapter,
        indicator_type: IndicatorType,
        value: &str,
    ) -> Result<ProviderResult, ProviderError> {
        match tokio::time::timeout(self.timeout, adapter.lookup(indicator_type, value)).await {
            Ok(outcome) => outcome,
            Err(_) => Ok(ProviderResult::failure(adapter.code(), DEADLINE_EXCEEDED)),
        }
    }
}

async fn call_with_deadline(
    adapter: &dyn ProviderAdapter,
    indicator_type: IndicatorType,
    value: &str,
    deadline: Instant,
) -> ProviderResult {
    let code = adapter.code();
    match tokio::time::timeout_at(deadline, adapter.lookup(indicator_type, value)).await {
        Ok(Ok(result)) => result,
        Ok(Err(e)) => {
            tracing::warn!("Provider {} returned an error: {}", code, e);
            e.into_result(code)
        }
        Err(_) => {
            tracing::warn!("Provider {} did not finish before the lookup deadline", code);
            ProviderResult::failure(code, DEADLINE_EXCEEDED)
        }
    }
}

async fn persist_result(
    store: &dyn ResultStore,
    request_id: Uuid,
    code: &str,
    result: &ProviderResult,
    ttl_seconds: i32,
) {
    let Some(data) = result.data.clone() else {
        return;
    };

    let row = NewLookupResult {
        request_id,
        provider_code: code.to_string(),
        raw_response: data,
        ttl_seconds,
    };

    match store.create_result(row).await {
        Ok(_) => tracing::debug!("Cached {} result for lookup {}", code, request_id),
        Err(e) if e.is_duplicate() => {
            tracing::warn!("Result for {} already cached on lookup {}", code, request_id)
        }
        Err(e) => tracing::error!("Failed to cache {} result for lookup {}: {}", code, request_id, e),
    }
}
