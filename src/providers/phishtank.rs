//! PhishTank adapter (URL phishing check)

use async_trait::async_trait;

use super::http::{self, endpoint};
use super::{reject_unsupported, ProviderAdapter, ProviderError, ProviderResult};
use crate::models::IndicatorType;

pub const CODE: &str = "phishtank";
const BASE_URL: &str = "https://checkurl.phishtank.com";
const SUPPORTED: &[IndicatorType] = &[IndicatorType::Url];

/// App key is optional; it only raises the quota
pub struct PhishTank {
    app_key: Option<String>,
    base_url: String,
    http: reqwest::Client,
}

impl PhishTank {
    pub fn new(app_key: Option<String>, http: reqwest::Client) -> Self {
        Self {
            app_key,
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
impl ProviderAdapter for PhishTank {
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

        let mut form = vec![("url", value), ("format", "json")];
        if let Some(app_key) = self.app_key.as_deref() {
            form.push(("app_key", app_key));
        }

        let url = endpoint(&self.base_url, &["checkurl", ""])?;
        let request = self.http.post(url).form(&form);

        Ok(http::send(request).await?.into_result(CODE))
    }
}
