//! Hermes threat-intelligence lookup service
//!
//! Accepts a security indicator (IP, domain, URL, hash or email), fans the
//! lookup out to every capable third-party provider and returns the raw
//! per-provider outcomes. Successful payloads are cached with a TTL.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                         HERMES                               │
//! ├──────────────────────────────────────────────────────────────┤
//! │  ┌───────────┐   ┌────────────────┐   ┌───────────────────┐  │
//! │  │  API      │──▶│ LookupService  │──▶│ Registry          │  │
//! │  │  (Axum)   │   │ (fan-out/join) │   │ (16 adapters)     │  │
//! │  └───────────┘   └───────┬────────┘   └─────────┬─────────┘  │
//! │                          ▼                      ▼            │
//! │                  ┌───────────────┐     third-party APIs      │
//! │                  │ ResultStore   │                           │
//! │                  │ (Pg / memory) │                           │
//! │                  └───────────────┘                           │
//! └──────────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod providers;
pub mod registry;
pub mod services;
pub mod store;

use std::any::Any;
use std::sync::Arc;

use axum::{
    body::Body,
    extract::MatchedPath,
    http::Request,
    middleware as axum_middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use tower_http::{
    catch_panic::CatchPanicLayer,
    compression::CompressionLayer,
    cors::{self, CorsLayer},
    trace::TraceLayer,
};

pub use error::{AppError, AppResult};

use config::Config;
use registry::Registry;
use services::LookupService;
use store::ResultStore;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub registry: Arc<Registry>,
    pub store: Arc<dyn ResultStore>,
    pub lookup: Arc<LookupService>,
}

impl AppState {
    pub fn new(config: Config, registry: Arc<Registry>, store: Arc<dyn ResultStore>) -> Self {
        let lookup = LookupService::new(
            Arc::clone(&registry),
            Arc::clone(&store),
            config.cache_ttl_seconds,
            std::time::Duration::from_secs(config.lookup_timeout_secs),
        );

        Self {
            config,
            registry,
            store,
            lookup: Arc::new(lookup),
        }
    }
}

/// Create the main router with all routes
pub fn create_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/ping", get(handlers::health::ping))
        .route("/lookup", post(handlers::lookup::create))
        .route("/lookup/:request_id", get(handlers::lookup::history))
        .route("/providers", get(handlers::providers::list))
        .route(
            "/providers/:code/:indicator_type/:value",
            get(handlers::providers::lookup),
        );

    // Spans carry the route template, never the raw URI
    let trace = TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
        let route = request
            .extensions()
            .get::<MatchedPath>()
            .map(MatchedPath::as_str)
            .unwrap_or("unmatched");

        tracing::info_span!("http_request", method = %request.method(), route)
    });

    Router::new()
        .route("/health", get(handlers::health::check))
        .nest("/api/v1", api_routes)
        .fallback(handlers::fallback)
        .layer(axum_middleware::from_fn(middleware::request_log::log_request_body))
        .layer(CompressionLayer::new())
        .layer(trace)
        .layer(
            CorsLayer::new()
                .allow_origin(cors::Any)
                .allow_methods(cors::Any)
                .allow_headers(cors::Any),
        )
        .layer(CatchPanicLayer::custom(handle_panic))
        .with_state(state)
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");

    AppError::Internal(format!("handler panicked: {}", detail)).into_response()
}
