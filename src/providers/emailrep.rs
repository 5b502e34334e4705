//! EmailRep adapter (email reputation)

use async_trait::async_trait;

use super::http::{self, endpoint};
use super::{reject_unsupported, ProviderAdapter, ProviderError, ProviderResult};
use crate::models::IndicatorType;

pub const CODE: &str = "emailrep";
const BASE_URL: &str = "https://emailrep.io";
const SUPPORTED: &[IndicatorType] = &[IndicatorType::Email];

/// Works without a key at a lower rate limit
pub struct EmailRep {
    api_key: Option<String>,
    base_url: String,
    http: reqwest::Client,
}

impl EmailRep {
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
impl ProviderAdapter for EmailRep {
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

        let url = endpoint(&self.base_url, &[value])?;
        let mut request = self.http.get(url);
        if let Some(api_key) = self.api_key.as_deref() {
            request = request.header("Key", api_key);
        }

        Ok(http::send(request).await?.into_result(CODE))
    }
}
