//! Provider handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;

use crate::middleware::redact::redact;
use crate::models::IndicatorType;
use crate::providers::ProviderResult;
use crate::{AppError, AppResult, AppState};

#[derive(Debug, Serialize)]
pub struct ProviderInfo {
    pub code: String,
    pub supported_types: Vec<IndicatorType>,
    pub configured: bool,
}

/// Registered providers, in registration order
pub async fn list(State(state): State<AppState>) -> Json<Vec<ProviderInfo>> {
    let providers = state
        .registry
        .iter()
        .map(|adapter| ProviderInfo {
            code: adapter.code().to_string(),
            supported_types: adapter.supported_types().to_vec(),
            configured: adapter.is_configured(),
        })
        .collect();

    Json(providers)
}

/// Call one provider directly. Provider-level failures are still a 200;
/// an error the adapter could not classify is a 500 carrying the folded result.
pub async fn lookup(
    State(state): State<AppState>,
    Path((code, indicator_type, value)): Path<(String, String, String)>,
) -> AppResult<(StatusCode, Json<ProviderResult>)> {
    if [&code, &indicator_type, &value].iter().any(|s| s.trim().is_empty()) {
        return Err(AppError::BadRequest(
            "provider code, indicator type and value are required".to_string(),
        ));
    }

    let adapter = state
        .registry
        .adapter_by_code(&code)
        .ok_or_else(|| AppError::NotFound(format!("Provider '{}' not found", code)))?;

    let indicator_type: IndicatorType = indicator_type
        .parse()
        .map_err(|e: crate::models::InvalidIndicatorType| AppError::BadRequest(e.to_string()))?;

    tracing::info!("Single lookup on {} for {} {}", code, indicator_type, redact(&value));

    match state.lookup.lookup_single(adapter.as_ref(), indicator_type, &value).await {
        Ok(result) => Ok((StatusCode::OK, Json(result))),
        Err(e) => {
            tracing::error!("Provider {} failed: {}", code, e);
            Ok((StatusCode::INTERNAL_SERVER_ERROR, Json(e.into_result(&code))))
        }
    }
}
