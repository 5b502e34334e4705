//! Shared HTTP plumbing for provider adapters

use reqwest::header::ACCEPT;
use reqwest::{RequestBuilder, StatusCode};
use serde_json::Value;
use url::Url;

use super::{ProviderError, ProviderResult};

pub const USER_AGENT: &str = concat!("hermes-lookup/", env!("CARGO_PKG_VERSION"));

/// Client shared by every adapter of a registry
pub fn build_client() -> reqwest::Client {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .build()
        .unwrap_or_default()
}

/// Append percent-encoded path segments to a base URL
pub fn endpoint(base: &str, segments: &[&str]) -> Result<Url, ProviderError> {
    let mut url = Url::parse(base).map_err(|e| ProviderError::InvalidRequest(e.to_string()))?;
    url.path_segments_mut()
        .map_err(|_| ProviderError::InvalidRequest(format!("{} cannot be a base URL", base)))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// Status plus best-effort decoded JSON body
#[derive(Debug)]
pub struct Reply {
    pub status: StatusCode,
    body: Result<Value, String>,
}

/// Send a request and read the whole body. Only transport failures are errors.
pub async fn send(request: RequestBuilder) -> Result<Reply, ProviderError> {
    let response = request
        .header(ACCEPT, "application/json")
        .send()
        .await
        .map_err(|e| ProviderError::Transport(e.without_url()))?;

    let status = response.status();
    let bytes = response
        .bytes()
        .await
        .map_err(|e| ProviderError::Transport(e.without_url()))?;

    let body = if bytes.is_empty() {
        Err("empty body".to_string())
    } else {
        serde_json::from_slice(&bytes).map_err(|e| e.to_string())
    };

    Ok(Reply { status, body })
}

impl Reply {
    pub fn new(status: StatusCode, body: Option<Value>) -> Self {
        Self {
            status,
            body: body.ok_or_else(|| "empty body".to_string()),
        }
    }

    pub fn body(&self) -> Option<&Value> {
        self.body.as_ref().ok()
    }

    /// Standard mapping: any 2xx is a success, anything else a failure
    pub fn into_result(self, code: &str) -> ProviderResult {
        self.into_result_with(code, |body| body)
    }

    /// Same as [`Reply::into_result`], reshaping a decoded success payload.
    /// A 2xx without a JSON body succeeds with an empty object.
    pub fn into_result_with<F>(self, code: &str, reshape: F) -> ProviderResult
    where
        F: FnOnce(Value) -> Value,
    {
        if !self.status.is_success() {
            return self.http_failure(code);
        }

        match self.body {
            Ok(body) => ProviderResult::success(code, reshape(body)),
            Err(message) => {
                tracing::debug!(
                    "{} answered HTTP {} without JSON: {}",
                    code,
                    self.status.as_u16(),
                    message
                );
                ProviderResult::success(code, Value::Null)
            }
        }
    }

    /// `HTTP <code>` failure with whatever body could be decoded
    pub fn http_failure(self, code: &str) -> ProviderResult {
        ProviderResult::failure_with_data(
            code,
            format!("HTTP {}", self.status.as_u16()),
            self.body.ok(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_endpoint_escapes_segments() {
        let url = endpoint("https://example.test/api/v3/", &["domains", "a b/c"]).unwrap();
        assert_eq!(url.as_str(), "https://example.test/api/v3/domains/a%20b%2Fc");
    }

    #[test]
    fn test_endpoint_keeps_trailing_slash() {
        let url = endpoint("https://example.test/api/v1", &["scan", ""]).unwrap();
        assert_eq!(url.as_str(), "https://example.test/api/v1/scan/");
    }

    #[test]
    fn test_endpoint_rejects_bad_base() {
        assert!(matches!(
            endpoint("not a url", &["x"]),
            Err(ProviderError::InvalidRequest(_))
        ));
    }

    #[test]
    fn test_non_2xx_keeps_body() {
        let reply = Reply::new(StatusCode::TOO_MANY_REQUESTS, Some(json!({"errors": ["quota"]})));
        let result = reply.into_result("abuseipdb");

        assert!(!result.success);
        assert_eq!(result.error.as_deref(), Some("HTTP 429"));
        assert_eq!(result.data, Some(json!({"errors": ["quota"]})));
    }

    #[test]
    fn test_non_2xx_without_json_body() {
        let result = Reply::new(StatusCode::BAD_GATEWAY, None).into_result("nvd");
        assert_eq!(result.error.as_deref(), Some("HTTP 502"));
        assert!(result.data.is_none());
    }

    #[test]
    fn test_2xx_without_body_is_empty_success() {
        let result = Reply::new(StatusCode::NO_CONTENT, None).into_result("ssllabs");

        assert!(result.success);
        assert!(result.error.is_none());
        assert_eq!(result.data, Some(json!({})));
        assert!(result.is_persistable());
    }

    #[test]
    fn test_2xx_without_body_skips_reshape() {
        let result = Reply::new(StatusCode::OK, None)
            .into_result_with("hibp", |b| json!({ "breaches": b }));
        assert_eq!(result.data, Some(json!({})));
    }

    #[test]
    fn test_reshape_applies_only_on_success() {
        let ok = Reply::new(StatusCode::OK, Some(json!({"data": {"score": 3}})))
            .into_result_with("abuseipdb", |b| b["data"].clone());
        assert_eq!(ok.data, Some(json!({"score": 3})));
    }
}
