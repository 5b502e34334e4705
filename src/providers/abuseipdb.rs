//! AbuseIPDB adapter (IP abuse reports)

use async_trait::async_trait;
use serde_json::{json, Value};

use super::http::{self, endpoint};
use super::{reject_unsupported, ProviderAdapter, ProviderError, ProviderResult};
use crate::models::IndicatorType;

pub const CODE: &str = "abuseipdb";
const BASE_URL: &str = "https://api.abuseipdb.com/api/v2";
const SUPPORTED: &[IndicatorType] = &[IndicatorType::Ip];
const MAX_AGE_DAYS: &str = "90";

pub struct AbuseIpDb {
    api_key: Option<String>,
    base_url: String,
    http: reqwest::Client,
}

impl AbuseIpDb {
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
impl ProviderAdapter for AbuseIpDb {
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

        let url = endpoint(&self.base_url, &["check"])?;
        let request = self
            .http
            .get(url)
            .query(&[("ipAddress", value), ("maxAgeInDays", MAX_AGE_DAYS)])
            .header("Key", api_key);

        let reply = http::send(request).await?;
        if !reply.status.is_success() {
            let error = format!("HTTP {}", reply.status.as_u16());
            let response = reply.body().cloned().unwrap_or(Value::Null);
            return Ok(ProviderResult::failure_with_data(
                CODE,
                error,
                Some(json!({ "response": response })),
            ));
        }

        // Only the `data` envelope member is kept
        Ok(reply.into_result_with(CODE, |body| {
            body.get("data")
                .filter(|d| d.is_object())
                .cloned()
                .unwrap_or_else(|| json!({}))
        }))
    }
}
