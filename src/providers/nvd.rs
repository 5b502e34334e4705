//! NVD (National Vulnerability Database) adapter
//!
//! CVE identifiers travel as the `hash` indicator type and are sent as a
//! keyword search.

use async_trait::async_trait;

use super::http::{self, endpoint};
use super::{reject_unsupported, ProviderAdapter, ProviderError, ProviderResult};
use crate::models::IndicatorType;

pub const CODE: &str = "nvd";
const BASE_URL: &str = "https://services.nvd.nist.gov/rest/json/cves/2.0";
const SUPPORTED: &[IndicatorType] = &[IndicatorType::Hash];
const RESULTS_PER_PAGE: &str = "10";

pub struct Nvd {
    api_key: Option<String>,
    base_url: String,
    http: reqwest::Client,
}

impl Nvd {
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
impl ProviderAdapter for Nvd {
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
        if let Some(rejected) = reject_unsupported(self, indicator_type) {
            return Ok(rejected);
        }

        let url = endpoint(&self.base_url, &[])?;
        let mut request = self
            .http
            .get(url)
            .query(&[("keywordSearch", value), ("resultsPerPage", RESULTS_PER_PAGE)]);
        if let Some(api_key) = self.api_key.as_deref() {
            request = request.header("apiKey", api_key);
        }

        Ok(http::send(request).await?.into_result(CODE))
    }
}
