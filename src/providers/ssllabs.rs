//! Qualys SSL Labs adapter (keyless)
//!
//! A single `analyze` call. The first call for a host usually reports an
//! in-progress assessment; polling until READY is left to the caller.

use async_trait::async_trait;

use super::http::{self, endpoint};
use super::{reject_unsupported, ProviderAdapter, ProviderError, ProviderResult};
use crate::models::IndicatorType;

pub const CODE: &str = "ssllabs";
const BASE_URL: &str = "https://api.ssllabs.com/api/v3";
const SUPPORTED: &[IndicatorType] = &[IndicatorType::Domain];

pub struct SslLabs {
    base_url: String,
    http: reqwest::Client,
}

impl SslLabs {
    pub fn new(http: reqwest::Client) -> Self {
        Self {
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
impl ProviderAdapter for SslLabs {
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

        let url = endpoint(&self.base_url, &["analyze"])?;
        let request = self.http.get(url).query(&[("host", value)]);

        Ok(http::send(request).await?.into_result(CODE))
    }
}
