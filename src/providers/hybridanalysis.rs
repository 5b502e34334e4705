//! Hybrid Analysis (Falcon Sandbox) adapter

use async_trait::async_trait;
use reqwest::header::USER_AGENT;

use super::http::{self, endpoint};
use super::{reject_unsupported, ProviderAdapter, ProviderError, ProviderResult};
use crate::models::IndicatorType;

pub const CODE: &str = "hybridanalysis";
const BASE_URL: &str = "https://hybrid-analysis.com/api/v2";
const SUPPORTED: &[IndicatorType] = &[IndicatorType::Hash, IndicatorType::Url];
// The API rejects requests without this agent string
const FALCON_AGENT: &str = "Falcon";

pub struct HybridAnalysis {
    api_key: Option<String>,
    base_url: String,
    http: reqwest::Client,
}

impl HybridAnalysis {
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

#[async_trait]
impl ProviderAdapter for HybridAnalysis {
    fn code(&self) -> &str {
        CODE
    }

    fn supported_types(&self) -> &[IndicatorType] {
        SUPPORTED
    }

    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    /// Both hashes and URLs go through the hash search; no sandbox submission
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

        let url = endpoint(&self.base_url, &["search", "hash"])?;
        let request = self
            .http
            .get(url)
            .query(&[("hash", value)])
            .header("api-key", api_key)
            .header(USER_AGENT, FALCON_AGENT);

        Ok(http::send(request).await?.into_result(CODE))
    }
}
