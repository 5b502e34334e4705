//! Scriptable adapter for tests and local development

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};

use super::{ProviderAdapter, ProviderError, ProviderResult};
use crate::models::IndicatorType;

#[derive(Debug, Clone)]
pub enum MockBehavior {
    /// Return `success=true` with this payload
    Succeed(Value),
    /// Return a failed result as-is
    Fail(String),
    /// Return an `Err` carrying this message, not tied to any transport
    Error(String),
    /// Panic inside `lookup`
    Panic,
}

pub struct MockAdapter {
    code: String,
    supported: Vec<IndicatorType>,
    configured: bool,
    delay: Option<Duration>,
    behavior: MockBehavior,
    calls: AtomicUsize,
}

impl MockAdapter {
    /// Configured adapter that echoes the indicator back
    pub fn new(code: impl Into<String>, supported: &[IndicatorType]) -> Self {
        Self {
            code: code.into(),
            supported: supported.to_vec(),
            configured: true,
            delay: None,
            behavior: MockBehavior::Succeed(Value::Null),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn unconfigured(mut self) -> Self {
        self.configured = false;
        self
    }

    pub fn with_behavior(mut self, behavior: MockBehavior) -> Self {
        self.behavior = behavior;
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Number of `lookup` calls that got past the configuration check
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ProviderAdapter for MockAdapter {
    fn code(&self) -> &str {
        &self.code
    }

    fn supported_types(&self) -> &[IndicatorType] {
        &self.supported
    }

    fn is_configured(&self) -> bool {
        self.configured
    }

    async fn lookup(
        &self,
        indicator_type: IndicatorType,
        value: &str,
    ) -> Result<ProviderResult, ProviderError> {
        if !self.configured {
            return Ok(ProviderResult::not_configured(&self.code));
        }
        if !self.supports(indicator_type) {
            return Ok(ProviderResult::unsupported(&self.code, indicator_type));
        }

        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        match &self.behavior {
            MockBehavior::Succeed(Value::Null) => Ok(ProviderResult::success(
                &self.code,
                json!({ "indicator_type": indicator_type, "value": value }),
            )),
            MockBehavior::Succeed(data) => Ok(ProviderResult::success(&self.code, data.clone())),
            MockBehavior::Fail(message) => Ok(ProviderResult::failure(&self.code, message.clone())),
            MockBehavior::Error(message) => Err(ProviderError::InvalidRequest(message.clone())),
            MockBehavior::Panic => panic!("mock adapter {} panicked", self.code),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unconfigured_does_not_count_call() {
        let adapter = MockAdapter::new("mock", &[IndicatorType::Ip]).unconfigured();
        let result = adapter.lookup(IndicatorType::Ip, "1.2.3.4").await.unwrap();

        assert_eq!(result.error.as_deref(), Some("not configured"));
        assert_eq!(adapter.calls(), 0);
    }

    #[tokio::test]
    async fn test_default_echoes_indicator() {
        let adapter = MockAdapter::new("mock", &[IndicatorType::Domain]);
        let result = adapter.lookup(IndicatorType::Domain, "example.com").await.unwrap();

        assert!(result.success);
        assert_eq!(result.data.unwrap()["value"], "example.com");
        assert_eq!(adapter.calls(), 1);
    }
}
