//! urlscan.io adapter
//!
//! URLs are submitted for a scan (submit only, no polling for the verdict).
//! Domains go through the search API.

use async_trait::async_trait;
use serde_json::json;

use super::http::{self, endpoint};
use super::{ProviderAdapter, ProviderError, ProviderResult};
use crate::models::IndicatorType;

pub const CODE: &str = "urlscan";
const BASE_URL: &str = "https://urlscan.io/api/v1";
const SUPPORTED: &[IndicatorType] = &[IndicatorType::Url, IndicatorType::Domain];

pub struct UrlScan {
    api_key: Option<String>,
    base_url: String,
    http: reqwest::Client,
}

impl UrlScan {
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

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.api_key.as_deref() {
            Some(key) => request.header("API-Key", key),
            None => request,
        }
    }

    async fn submit_scan(&self, target: &str) -> Result<ProviderResult, ProviderError> {
        // Anonymous submissions can only be public
        let visibility = if self.api_key.is_some() { "private" } else { "public" };
        let url = endpoint(&self.base_url, &["scan", ""])?;
        let request = self
            .authorize(self.http.post(url))
            .json(&json!({ "url": target, "visibility": visibility }));

        Ok(http::send(request).await?.into_result(CODE))
    }

    async fn search_domain(&self, domain: &str) -> Result<ProviderResult, ProviderError> {
        let url = endpoint(&self.base_url, &["search", ""])?;
        let query = format!("domain:{}", domain);
        let request = self.authorize(self.http.get(url).query(&[("q", query.as_str())]));

        Ok(http::send(request).await?.into_result(CODE))
    }
}

#[async_trait]
impl ProviderAdapter for UrlScan {
    fn code(&self) -> &str {
        CODE
    }

    fn supported_types(&self) -> &[IndicatorType] {
        SUPPORTED
    }

    async fn lookup(
        &self,
        indicator_type: IndicatorType,
        value: &str,
    ) -> Result<ProviderResult, ProviderError> {
        match indicator_type {
            IndicatorType::Url => self.submit_scan(value).await,
            IndicatorType::Domain => self.search_domain(value).await,
            other => Ok(ProviderResult::unsupported(CODE, other)),
        }
    }
}
