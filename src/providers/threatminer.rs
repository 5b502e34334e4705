//! ThreatMiner adapter (keyless)

use async_trait::async_trait;

use super::http::{self, endpoint};
use super::{ProviderAdapter, ProviderError, ProviderResult};
use crate::models::IndicatorType;

pub const CODE: &str = "threatminer";
const BASE_URL: &str = "https://api.threatminer.org/v2";
const SUPPORTED: &[IndicatorType] = &[IndicatorType::Ip, IndicatorType::Domain];
/// Report type 1 = WHOIS
const REPORT_WHOIS: &str = "1";

pub struct ThreatMiner {
    base_url: String,
    http: reqwest::Client,
}

impl ThreatMiner {
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
impl ProviderAdapter for ThreatMiner {
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
        let script = match indicator_type {
            IndicatorType::Ip => "host.php",
            IndicatorType::Domain => "domain.php",
            other => return Ok(ProviderResult::unsupported(CODE, other)),
        };

        let url = endpoint(&self.base_url, &[script])?;
        let request = self.http.get(url).query(&[("q", value), ("rt", REPORT_WHOIS)]);

        Ok(http::send(request).await?.into_result(CODE))
    }
}
