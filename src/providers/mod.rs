//! Threat-intelligence provider adapters
//!
//! Every third-party service sits behind [`ProviderAdapter`]: a stable code,
//! the indicator types it accepts and a single-shot `lookup`. Adapters hold
//! nothing but an immutable credential and a shared HTTP client.
//!
//! # Outcome policy
//!
//! | condition                         | success | error                   | data            |
//! |-----------------------------------|---------|-------------------------|-----------------|
//! | credential required but missing   | false   | `not configured`        | -               |
//! | type not supported                | false   | `unsupported type: <t>` | -               |
//! | transport failure                 | `Err(ProviderError::Transport)`                       |
//! | non-2xx                           | false   | `HTTP <code>`           | body if JSON    |
//! | 2xx                               | true    | -                       | body, else `{}` |
//!
//! `Err` values are informational; callers fold them with
//! [`ProviderError::into_result`].

pub mod http;
pub mod mock;

pub mod abuseipdb;
pub mod binaryedge;
pub mod circl;
pub mod criminalip;
pub mod emailrep;
pub mod hibp;
pub mod hybridanalysis;
pub mod ipasnhistory;
pub mod nvd;
pub mod phishtank;
pub mod pulsedive;
pub mod ssllabs;
pub mod threatminer;
pub mod urlscan;
pub mod virustotal;
pub mod vulners;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::models::IndicatorType;

pub const NOT_CONFIGURED: &str = "not configured";

/// Uniform contract implemented by every provider client
#[async_trait]
pub trait ProviderAdapter: Send + Sync {
    /// Stable, lowercase provider code. Used as map key and in routes.
    fn code(&self) -> &str;

    /// Indicator types accepted by `lookup`; never empty
    fn supported_types(&self) -> &[IndicatorType];

    /// False when a required credential is missing
    fn is_configured(&self) -> bool {
        true
    }

    fn supports(&self, indicator_type: IndicatorType) -> bool {
        self.supported_types().contains(&indicator_type)
    }

    /// One outbound call to the provider
    async fn lookup(
        &self,
        indicator_type: IndicatorType,
        value: &str,
    ) -> Result<ProviderResult, ProviderError>;
}

/// Outcome of one adapter invocation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderResult {
    pub provider_code: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ProviderResult {
    /// Successful result. A null payload is normalized to an empty object.
    pub fn success(code: &str, data: Value) -> Self {
        let data = if data.is_null() { Value::Object(Default::default()) } else { data };
        Self {
            provider_code: code.to_string(),
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn failure(code: &str, error: impl Into<String>) -> Self {
        Self {
            provider_code: code.to_string(),
            success: false,
            data: None,
            error: Some(error.into()),
        }
    }

    /// Failure that still carries a diagnostic body from the provider
    pub fn failure_with_data(code: &str, error: impl Into<String>, data: Option<Value>) -> Self {
        Self {
            data,
            ..Self::failure(code, error)
        }
    }

    pub fn not_configured(code: &str) -> Self {
        Self::failure(code, NOT_CONFIGURED)
    }

    pub fn unsupported(code: &str, indicator_type: IndicatorType) -> Self {
        Self::failure(code, format!("unsupported type: {}", indicator_type))
    }

    /// Only successful results with a payload are written to the store
    pub fn is_persistable(&self) -> bool {
        self.success && self.data.as_ref().is_some_and(|d| !d.is_null())
    }
}

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl ProviderError {
    /// Fold into a failed result carrying the error text
    pub fn into_result(self, code: &str) -> ProviderResult {
        ProviderResult::failure(code, self.to_string())
    }
}

/// Result to return instead of calling out when the type is not accepted
pub(crate) fn reject_unsupported<A>(adapter: &A, indicator_type: IndicatorType) -> Option<ProviderResult>
where
    A: ProviderAdapter + ?Sized,
{
    if adapter.supports(indicator_type) {
        None
    } else {
        Some(ProviderResult::unsupported(adapter.code(), indicator_type))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_success_normalizes_null() {
        let result = ProviderResult::success("nvd", Value::Null);
        assert_eq!(result.data, Some(json!({})));
        assert!(result.is_persistable());
    }

    #[test]
    fn test_failure_is_not_persistable() {
        let result = ProviderResult::failure_with_data("nvd", "HTTP 500", Some(json!({"e": 1})));
        assert!(!result.success);
        assert!(!result.is_persistable());
    }

    #[test]
    fn test_serialization_omits_absent_fields() {
        let value = serde_json::to_value(ProviderResult::not_configured("hibp")).unwrap();
        assert_eq!(
            value,
            json!({"provider_code": "hibp", "success": false, "error": "not configured"})
        );

        let value = serde_json::to_value(ProviderResult::success("hibp", json!({"breaches": []}))).unwrap();
        assert!(value.get("error").is_none());
    }

    #[test]
    fn test_unsupported_message() {
        let result = ProviderResult::unsupported("hibp", IndicatorType::Ip);
        assert_eq!(result.error.as_deref(), Some("unsupported type: ip"));
    }
}
