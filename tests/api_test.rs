//! HTTP API tests driving the router with `oneshot`

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use hermes_lookup::{
    config::Config,
    create_router,
    models::{
        AuditLogEntry, IndicatorType, LookupRequest, LookupResult, NewAuditLogEntry,
        NewLookupRequest, NewLookupResult,
    },
    providers::mock::{MockAdapter, MockBehavior},
    providers::{ssllabs::SslLabs, ProviderAdapter},
    registry::Registry,
    store::{MemoryStore, ResultStore, StoreError},
    AppState,
};

struct TestApp {
    router: Router,
    store: Arc<MemoryStore>,
}

fn test_app(adapters: Vec<Arc<dyn ProviderAdapter>>) -> TestApp {
    let store = Arc::new(MemoryStore::new());
    let registry = Arc::new(Registry::new(adapters).unwrap());
    let state = AppState::new(Config::default(), registry, store.clone());

    TestApp {
        router: create_router(state),
        store,
    }
}

/// One configured and one unconfigured IP adapter, plus an email-only one
fn default_adapters() -> Vec<Arc<dyn ProviderAdapter>> {
    vec![
        Arc::new(MockAdapter::new("alpha", &[IndicatorType::Ip])
            .with_behavior(MockBehavior::Succeed(json!({"asn": 15169})))),
        Arc::new(MockAdapter::new("beta", &[IndicatorType::Ip]).unconfigured()),
        Arc::new(MockAdapter::new("gamma", &[IndicatorType::Email])),
    ]
}

async fn send(router: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn post_json(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn test_health_and_ping() {
    let app = test_app(default_adapters());

    let (status, body) = send(app.router.clone(), get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");

    let (status, body) = send(app.router, get("/api/v1/ping")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"message": "pong"}));
}

#[tokio::test]
async fn test_lookup_configured_and_unconfigured() {
    let app = test_app(default_adapters());

    let (status, body) = send(
        app.router,
        post_json("/api/v1/lookup", r#"{"indicator_type":"ip","indicator_value":"8.8.8.8"}"#),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(Uuid::parse_str(body["request_id"].as_str().unwrap()).is_ok());
    assert_eq!(body["indicator_type"], "ip");

    let results = body["results"].as_object().unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results["alpha"]["success"], true);
    assert_eq!(results["alpha"]["data"], json!({"asn": 15169}));
    assert_eq!(results["beta"]["success"], false);
    assert_eq!(results["beta"]["error"], "not configured");
    assert!(results["beta"].get("data").is_none());

    assert_eq!(app.store.result_count(), 1);
    assert_eq!(app.store.audit_entries().len(), 1);
}

#[tokio::test]
async fn test_lookup_missing_value_is_bad_request() {
    let app = test_app(default_adapters());

    let (status, body) = send(app.router, post_json("/api/v1/lookup", r#"{"indicator_type":"ip"}"#)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("indicator_value"));
    assert_eq!(app.store.audit_entries().len(), 0);
}

#[tokio::test]
async fn test_lookup_invalid_type_and_empty_value() {
    let app = test_app(default_adapters());

    let (status, body) = send(
        app.router.clone(),
        post_json("/api/v1/lookup", r#"{"indicator_type":"cve","indicator_value":"CVE-2024-1"}"#),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].is_string());

    let (status, body) = send(
        app.router,
        post_json("/api/v1/lookup", r#"{"indicator_type":"ip","indicator_value":""}"#),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("indicator_value"));
}

#[tokio::test]
async fn test_lookup_allow_list() {
    let app = test_app(default_adapters());

    let (status, body) = send(
        app.router.clone(),
        post_json(
            "/api/v1/lookup",
            r#"{"indicator_type":"ip","indicator_value":"8.8.8.8","providers":["beta","gamma"]}"#,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let keys: Vec<&String> = body["results"].as_object().unwrap().keys().collect();
    assert_eq!(keys, vec!["beta"]);

    let (status, body) = send(
        app.router.clone(),
        post_json(
            "/api/v1/lookup",
            r#"{"indicator_type":"ip","indicator_value":"8.8.8.8","providers":["nope"]}"#,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["results"], json!({}));

    // empty list means no restriction
    let (_, body) = send(
        app.router,
        post_json(
            "/api/v1/lookup",
            r#"{"indicator_type":"ip","indicator_value":"8.8.8.8","providers":[]}"#,
        ),
    )
    .await;
    assert_eq!(body["results"].as_object().unwrap().len(), 2);
}

#[tokio::test]
async fn test_lookup_isolates_provider_errors() {
    let app = test_app(vec![
        Arc::new(MockAdapter::new("down", &[IndicatorType::Domain])
            .with_behavior(MockBehavior::Error("connection reset".to_string()))),
        Arc::new(MockAdapter::new("up", &[IndicatorType::Domain])),
    ]);

    let (status, body) = send(
        app.router,
        post_json("/api/v1/lookup", r#"{"indicator_type":"domain","indicator_value":"example.com"}"#),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["results"]["down"]["success"], false);
    assert!(body["results"]["down"]["error"].as_str().unwrap().contains("connection reset"));
    assert_eq!(body["results"]["up"]["success"], true);
    assert_eq!(app.store.result_count(), 1);
}

#[tokio::test]
async fn test_lookup_history() {
    let app = test_app(default_adapters());

    let (_, body) = send(
        app.router.clone(),
        post_json("/api/v1/lookup", r#"{"indicator_type":"ip","indicator_value":"8.8.8.8"}"#),
    )
    .await;
    let request_id = body["request_id"].as_str().unwrap().to_string();

    let (status, history) = send(app.router.clone(), get(&format!("/api/v1/lookup/{}", request_id))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(history["indicator_value"], "8.8.8.8");
    let results = history["results"].as_array().unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["provider_code"], "alpha");
    assert_eq!(results[0]["ttl_seconds"], 3600);
    assert_eq!(results[0]["fresh"], true);

    let (status, _) = send(app.router.clone(), get(&format!("/api/v1/lookup/{}", Uuid::new_v4()))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(app.router, get("/api/v1/lookup/not-a-uuid")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_provider_list() {
    let app = test_app(default_adapters());

    let (status, body) = send(app.router, get("/api/v1/providers")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([
            {"code": "alpha", "supported_types": ["ip"], "configured": true},
            {"code": "beta", "supported_types": ["ip"], "configured": false},
            {"code": "gamma", "supported_types": ["email"], "configured": true}
        ])
    );
}

#[tokio::test]
async fn test_single_provider_unknown_code() {
    let app = test_app(default_adapters());
    let (status, body) = send(app.router, get("/api/v1/providers/unknown-code/ip/8.8.8.8")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_single_provider_bad_segments() {
    let app = test_app(default_adapters());

    let (status, _) = send(app.router.clone(), get("/api/v1/providers/alpha/ip/%20")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(app.router.clone(), get("/api/v1/providers/alpha//8.8.8.8")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(app.router, get("/api/v1/providers/alpha/ipv6/8.8.8.8")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_single_provider_outcomes() {
    let app = test_app(vec![
        Arc::new(MockAdapter::new("alpha", &[IndicatorType::Ip])),
        Arc::new(MockAdapter::new("beta", &[IndicatorType::Ip]).unconfigured()),
        Arc::new(MockAdapter::new("broken", &[IndicatorType::Ip])
            .with_behavior(MockBehavior::Error("tls handshake failed".to_string()))),
    ]);

    let (status, body) = send(app.router.clone(), get("/api/v1/providers/alpha/ip/8.8.8.8")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["value"], "8.8.8.8");

    // bypasses type filtering: the adapter itself reports the mismatch
    let (status, body) = send(app.router.clone(), get("/api/v1/providers/alpha/email/a@example.com")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["error"], "unsupported type: email");

    let (status, body) = send(app.router.clone(), get("/api/v1/providers/beta/ip/8.8.8.8")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["error"], "not configured");

    let (status, body) = send(app.router, get("/api/v1/providers/broken/ip/8.8.8.8")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["provider_code"], "broken");
    assert_eq!(body["success"], false);

    // nothing persisted by single-provider calls
    assert_eq!(app.store.result_count(), 0);
}

#[tokio::test]
async fn test_single_provider_empty_success_body_is_ok() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/analyze"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let ssllabs = SslLabs::new(reqwest::Client::new()).with_base_url(server.uri());
    let app = test_app(vec![Arc::new(ssllabs)]);

    let (status, body) = send(app.router, get("/api/v1/providers/ssllabs/domain/example.com")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"], json!({}));
    assert!(body.get("error").is_none());
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let app = test_app(default_adapters());
    let (status, body) = send(app.router, get("/api/v2/lookup")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["status"], 404);
}

/// Store whose request insert always fails
struct FailingStore;

#[async_trait]
impl ResultStore for FailingStore {
    async fn create_request(&self, _data: NewLookupRequest) -> Result<LookupRequest, StoreError> {
        Err(StoreError::Database(sqlx::Error::PoolTimedOut))
    }

    async fn create_result(&self, _data: NewLookupResult) -> Result<LookupResult, StoreError> {
        unreachable!("no result can be written without a request")
    }

    async fn create_audit_entry(&self, _data: NewAuditLogEntry) -> Result<AuditLogEntry, StoreError> {
        unreachable!("no audit entry for an aborted lookup")
    }

    async fn find_request(&self, _id: Uuid) -> Result<Option<LookupRequest>, StoreError> {
        Ok(None)
    }

    async fn results_for_request(&self, _request_id: Uuid) -> Result<Vec<LookupResult>, StoreError> {
        Ok(Vec::new())
    }
}

#[tokio::test]
async fn test_request_creation_failure_is_internal_error() {
    let adapter = Arc::new(MockAdapter::new("alpha", &[IndicatorType::Ip]));
    let registry = Arc::new(Registry::new(vec![adapter.clone() as Arc<dyn ProviderAdapter>]).unwrap());
    let state = AppState::new(Config::default(), registry, Arc::new(FailingStore));

    let (status, body) = send(
        create_router(state),
        post_json("/api/v1/lookup", r#"{"indicator_type":"ip","indicator_value":"8.8.8.8"}"#),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["code"], "INTERNAL_ERROR");
    assert_eq!(body["message"], "internal server error");
    // aborted before dispatch
    assert_eq!(adapter.calls(), 0);
}
