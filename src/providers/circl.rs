//! CIRCL CVE Search adapter (keyless)

use async_trait::async_trait;

use super::http::{self, endpoint};
use super::{reject_unsupported, ProviderAdapter, ProviderError, ProviderResult};
use crate::models::IndicatorType;

pub const CODE: &str = "circl_cve";
const BASE_URL: &str = "https://cve.circl.lu/api";
const SUPPORTED: &[IndicatorType] = &[IndicatorType::Hash];

/// Looks up a CVE id (e.g. `CVE-2024-1234`) passed as a `hash` indicator
pub struct CirclCve {
    base_url: String,
    http: reqwest::Client,
}

impl CirclCve {
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
impl ProviderAdapter for CirclCve {
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
        let cve_id = value.trim();
        if cve_id.is_empty() {
            return Ok(ProviderResult::failure(CODE, "empty CVE id"));
        }

        let url = endpoint(&self.base_url, &["cve", cve_id])?;
        Ok(http::send(self.http.get(url)).await?.into_result(CODE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_blank_cve_id() {
        let adapter = CirclCve::new(reqwest::Client::new()).with_base_url("http://127.0.0.1:9");
        let result = adapter.lookup(IndicatorType::Hash, "  ").await.unwrap();

        assert!(!result.success);
        assert_eq!(result.error.as_deref(), Some("empty CVE id"));
    }

    #[test]
    fn test_keyless_is_configured() {
        let adapter = CirclCve::new(reqwest::Client::new());
        assert!(adapter.is_configured());
    }
}
