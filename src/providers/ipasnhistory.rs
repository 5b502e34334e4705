//! CIRCL IP ASN History adapter (keyless)

use async_trait::async_trait;

use super::http::{self, endpoint};
use super::{reject_unsupported, ProviderAdapter, ProviderError, ProviderResult};
use crate::models::IndicatorType;

pub const CODE: &str = "ipasnhistory";
const BASE_URL: &str = "https://bgpranking-ng.circl.lu";
const SUPPORTED: &[IndicatorType] = &[IndicatorType::Ip];

pub struct IpAsnHistory {
    base_url: String,
    http: reqwest::Client,
}

impl IpAsnHistory {
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
impl ProviderAdapter for IpAsnHistory {
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

        let url = endpoint(&self.base_url, &["ipasn_history", ""])?;
        let request = self.http.get(url).query(&[("ip", value)]);

        Ok(http::send(request).await?.into_result(CODE))
    }
}
