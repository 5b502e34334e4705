//! BinaryEdge adapter (host exposure and subdomains)

use async_trait::async_trait;

use super::http::{self, endpoint};
use super::{ProviderAdapter, ProviderError, ProviderResult};
use crate::models::IndicatorType;

pub const CODE: &str = "binaryedge";
const BASE_URL: &str = "https://api.binaryedge.io/v2";
const SUPPORTED: &[IndicatorType] = &[IndicatorType::Ip, IndicatorType::Domain];

pub struct BinaryEdge {
    api_key: Option<String>,
    base_url: String,
    http: reqwest::Client,
}

impl BinaryEdge {
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
impl ProviderAdapter for BinaryEdge {
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

        let url = match indicator_type {
            IndicatorType::Ip => endpoint(&self.base_url, &["query", "ip", value])?,
            IndicatorType::Domain => {
                endpoint(&self.base_url, &["query", "domains", "subdomain", value])?
            }
            other => return Ok(ProviderResult::unsupported(CODE, other)),
        };

        let request = self.http.get(url).header("X-Key", api_key);
        Ok(http::send(request).await?.into_result(CODE))
    }
}
