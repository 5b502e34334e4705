//! Have I Been Pwned adapter (breached accounts)

use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::{json, Value};

use super::http::{self, endpoint};
use super::{reject_unsupported, ProviderAdapter, ProviderError, ProviderResult};
use crate::models::IndicatorType;

pub const CODE: &str = "hibp";
const BASE_URL: &str = "https://haveibeenpwned.com/api/v3";
const SUPPORTED: &[IndicatorType] = &[IndicatorType::Email];

pub struct Hibp {
    api_key: Option<String>,
    base_url: String,
    http: reqwest::Client,
}

impl Hibp {
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
impl ProviderAdapter for Hibp {
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

        let url = endpoint(&self.base_url, &["breachedaccount", value])?;
        let request = self
            .http
            .get(url)
            .query(&[("truncateResponse", "false")])
            .header("hibp-api-key", api_key);

        let reply = http::send(request).await?;

        // 404 means the account is in no known breach
        if reply.status == StatusCode::NOT_FOUND {
            return Ok(ProviderResult::success(CODE, json!({ "breaches": [] })));
        }
        if !reply.status.is_success() {
            let error = format!("HTTP {}", reply.status.as_u16());
            let breaches = reply.body().cloned().unwrap_or(Value::Null);
            return Ok(ProviderResult::failure_with_data(
                CODE,
                error,
                Some(json!({ "breaches": breaches })),
            ));
        }

        Ok(reply.into_result_with(CODE, |breaches| json!({ "breaches": breaches })))
    }
}
