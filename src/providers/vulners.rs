//! Vulners adapter (CVE search)

use async_trait::async_trait;
use serde_json::json;

use super::http::{self, endpoint};
use super::{reject_unsupported, ProviderAdapter, ProviderError, ProviderResult};
use crate::models::IndicatorType;

pub const CODE: &str = "vulners";
const BASE_URL: &str = "https://vulners.com/api/v3";
const SUPPORTED: &[IndicatorType] = &[IndicatorType::Hash];

pub struct Vulners {
    api_key: Option<String>,
    base_url: String,
    http: reqwest::Client,
}

impl Vulners {
    pub fn new(api_key: Option<String>, http: reqwest::Client) -> Self {
        Self {
            api_key,
            base_url: BASE_URL.to_string(),
            http,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

/// Lucene query matching documents that reference the CVE id
pub fn cve_query(value: &str) -> String {
    format!("cvelist:{}", value)
}

#[async_trait]
impl ProviderAdapter for Vulners {
    fn code(&self) -> &str {
        CODE
    }

    fn supported_types(&self) -> &[IndicatorType] {
        SUPPORTED
    }

    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    async fn lookup(
        &self,
        indicator_type: IndicatorType,
        value: &str,
    ) -> Result<ProviderResult, ProviderError> {
        let Some(api_key) = self.api_key.as_deref() else {
            return Ok(ProviderResult::not_configured(CODE));
        };
        if let Some(rejected) = reject_unsupported(self, indicator_type) {
            return Ok(rejected);
        }

        let url = endpoint(&self.base_url, &["search", "lucene", ""])?;
        let request = self
            .http
            .post(url)
            .header("X-Api-Key", api_key)
            .json(&json!({ "query": cve_query(value) }));

        Ok(http::send(request).await?.into_result(CODE))
    }
}
