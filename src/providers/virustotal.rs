//! VirusTotal v3 adapter
//!
//! Maps every indicator type except email onto the matching v3 object
//! collection. URLs are addressed by their unpadded URL-safe base64 id.

use async_trait::async_trait;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;

use super::http::{self, endpoint};
use super::{reject_unsupported, ProviderAdapter, ProviderError, ProviderResult};
use crate::models::IndicatorType;

pub const CODE: &str = "virustotal";
const BASE_URL: &str = "https://www.virustotal.com/api/v3";
const SUPPORTED: &[IndicatorType] = &[
    IndicatorType::Ip,
    IndicatorType::Domain,
    IndicatorType::Url,
    IndicatorType::Hash,
];

pub struct VirusTotal {
    api_key: Option<String>,
    base_url: String,
    http: reqwest::Client,
}

impl VirusTotal {
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

/// VirusTotal URL identifier
pub fn url_id(url: &str) -> String {
    URL_SAFE_NO_PAD.encode(url.as_bytes())
}

/// (collection, object id) for an indicator
fn object_path(indicator_type: IndicatorType, value: &str) -> Option<(&'static str, String)> {
    match indicator_type {
        IndicatorType::Ip => Some(("ip_addresses", value.to_string())),
        IndicatorType::Domain => Some(("domains", value.to_string())),
        IndicatorType::Url => Some(("urls", url_id(value))),
        IndicatorType::Hash => Some(("files", value.to_string())),
        IndicatorType::Email => None,
    }
}

#[async_trait]
impl ProviderAdapter for VirusTotal {
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
        let Some((collection, id)) = object_path(indicator_type, value) else {
            return Ok(ProviderResult::unsupported(CODE, indicator_type));
        };

        let url = endpoint(&self.base_url, &[collection, &id])?;
        let request = self.http.get(url).header("x-apikey", api_key);

        Ok(http::send(request).await?.into_result(CODE))
    }
}
