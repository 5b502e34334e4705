//! Pulsedive adapter (IOC enrichment)

use async_trait::async_trait;

use super::http::{self, endpoint};
use super::{reject_unsupported, ProviderAdapter, ProviderError, ProviderResult};
use crate::models::IndicatorType;

pub const CODE: &str = "pulsedive";
const BASE_URL: &str = "https://pulsedive.com/api";
const SUPPORTED: &[IndicatorType] = &[IndicatorType::Ip, IndicatorType::Domain, IndicatorType::Url];

pub struct Pulsedive {
    api_key: Option<String>,
    base_url: String,
    http: reqwest::Client,
}

impl Pulsedive {
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
impl ProviderAdapter for Pulsedive {
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

        // Same endpoint for every supported type
        let url = endpoint(&self.base_url, &["indicators", ""])?;
        let request = self
            .http
            .get(url)
            .query(&[("indicator", value)])
            .bearer_auth(api_key);

        Ok(http::send(request).await?.into_result(CODE))
    }
}
