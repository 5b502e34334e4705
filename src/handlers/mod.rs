//! HTTP handlers

pub mod health;
pub mod lookup;
pub mod providers;

use axum::http::Uri;

use crate::AppError;

const PROVIDER_ROUTE_PREFIX: &str = "/api/v1/providers/";

/// Unmatched routes. A single-provider path with an empty segment never
/// matches its route, so it is reported as a bad request instead.
pub async fn fallback(uri: Uri) -> AppError {
    if let Some(rest) = uri.path().strip_prefix(PROVIDER_ROUTE_PREFIX) {
        if rest.split('/').count() == 3 {
            return AppError::BadRequest(
                "provider code, indicator type and value are required".to_string(),
            );
        }
    }

    AppError::NotFound(format!("No route for {}", uri.path()))
}
