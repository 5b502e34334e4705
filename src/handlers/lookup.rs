//! Lookup handlers

use std::net::SocketAddr;

use axum::{
    extract::{rejection::JsonRejection, ConnectInfo, Path, State},
    Json,
};
use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use crate::models::{LookupHistory, LookupRequestDto, LookupResponse};
use crate::{AppError, AppResult, AppState};

/// Fan an indicator out to every capable provider
pub async fn create(
    State(state): State<AppState>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    payload: Result<Json<LookupRequestDto>, JsonRejection>,
) -> AppResult<Json<LookupResponse>> {
    let Json(dto) = payload?;
    dto.validate()?;

    let client_ip = connect_info.map(|ConnectInfo(addr)| addr.ip());
    let response = state.lookup.lookup(&dto, client_ip).await?;

    Ok(Json(response))
}

/// Stored request with its cached provider results
pub async fn history(
    State(state): State<AppState>,
    Path(request_id): Path<String>,
) -> AppResult<Json<LookupHistory>> {
    let id = Uuid::parse_str(&request_id)
        .map_err(|_| AppError::BadRequest(format!("invalid request id '{}'", request_id)))?;

    let request = state
        .store
        .find_request(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Lookup request not found".to_string()))?;

    let results = state.store.results_for_request(id).await?;

    Ok(Json(LookupHistory::new(request, &results, Utc::now())))
}
