//! Provider registry
//!
//! Built once at startup and shared behind an `Arc`. Every known adapter is
//! registered whether or not it has a credential; unconfigured adapters answer
//! `not configured` at call time.

use std::collections::HashMap;
use std::sync::Arc;

use thiserror::Error;

use crate::config::ProviderKeys;
use crate::models::IndicatorType;
use crate::providers::{
    abuseipdb::AbuseIpDb, binaryedge::BinaryEdge, circl::CirclCve, criminalip::CriminalIp,
    emailrep::EmailRep, hibp::Hibp, http, hybridanalysis::HybridAnalysis,
    ipasnhistory::IpAsnHistory, nvd::Nvd, phishtank::PhishTank, pulsedive::Pulsedive,
    ssllabs::SslLabs, threatminer::ThreatMiner, urlscan::UrlScan, virustotal::VirusTotal,
    vulners::Vulners, ProviderAdapter,
};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("duplicate provider code '{0}'")]
    DuplicateCode(String),

    #[error("provider '{0}' declares no supported indicator types")]
    NoSupportedTypes(String),
}

pub struct Registry {
    adapters: Vec<Arc<dyn ProviderAdapter>>,
    by_code: HashMap<String, usize>,
}

impl Registry {
    pub fn new(adapters: Vec<Arc<dyn ProviderAdapter>>) -> Result<Self, RegistryError> {
        let mut by_code = HashMap::with_capacity(adapters.len());

        for (index, adapter) in adapters.iter().enumerate() {
            let code = adapter.code().to_string();
            if adapter.supported_types().is_empty() {
                return Err(RegistryError::NoSupportedTypes(code));
            }
            if by_code.insert(code.clone(), index).is_some() {
                return Err(RegistryError::DuplicateCode(code));
            }
        }

        Ok(Self { adapters, by_code })
    }

    /// Every built-in adapter, in catalogue order, sharing one HTTP client
    pub fn from_config(keys: &ProviderKeys) -> Result<Self, RegistryError> {
        let client = http::build_client();
        let keys = keys.clone();

        let adapters: Vec<Arc<dyn ProviderAdapter>> = vec![
            Arc::new(AbuseIpDb::new(keys.abuseipdb, client.clone())),
            Arc::new(VirusTotal::new(keys.virustotal, client.clone())),
            Arc::new(PhishTank::new(keys.phishtank, client.clone())),
            Arc::new(UrlScan::new(keys.urlscan, client.clone())),
            Arc::new(Hibp::new(keys.hibp, client.clone())),
            Arc::new(Nvd::new(keys.nvd, client.clone())),
            Arc::new(CirclCve::new(client.clone())),
            Arc::new(BinaryEdge::new(keys.binaryedge, client.clone())),
            Arc::new(CriminalIp::new(keys.criminalip, client.clone())),
            Arc::new(Pulsedive::new(keys.pulsedive, client.clone())),
            Arc::new(EmailRep::new(keys.emailrep, client.clone())),
            Arc::new(Vulners::new(keys.vulners, client.clone())),
            Arc::new(HybridAnalysis::new(keys.hybridanalysis, client.clone())),
            Arc::new(IpAsnHistory::new(client.clone())),
            Arc::new(SslLabs::new(client.clone())),
            Arc::new(ThreatMiner::new(client)),
        ];

        Self::new(adapters)
    }

    /// Adapters accepting `indicator_type`, in registration order
    pub fn adapters_for_type(&self, indicator_type: IndicatorType) -> Vec<Arc<dyn ProviderAdapter>> {
        self.adapters
            .iter()
            .filter(|a| a.supports(indicator_type))
            .cloned()
            .collect()
    }

    pub fn adapter_by_code(&self, code: &str) -> Option<Arc<dyn ProviderAdapter>> {
        self.by_code.get(code).map(|&i| Arc::clone(&self.adapters[i]))
    }

    /// Registered codes, in registration order
    pub fn all_codes(&self) -> Vec<&str> {
        self.adapters.iter().map(|a| a.code()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn ProviderAdapter>> {
        self.adapters.iter()
    }

    pub fn len(&self) -> usize {
        self.adapters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adapters.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::mock::MockAdapter;

    fn mock(code: &str, types: &[IndicatorType]) -> Arc<dyn ProviderAdapter> {
        Arc::new(MockAdapter::new(code, types))
    }

    #[test]
    fn test_adapters_for_type_keeps_registration_order() {
        let registry = Registry::new(vec![
            mock("b", &[IndicatorType::Ip, IndicatorType::Domain]),
            mock("a", &[IndicatorType::Email]),
            mock("c", &[IndicatorType::Ip]),
        ])
        .unwrap();

        let codes: Vec<String> = registry
            .adapters_for_type(IndicatorType::Ip)
            .iter()
            .map(|a| a.code().to_string())
            .collect();
        assert_eq!(codes, vec!["b", "c"]);

        // stable across calls
        let again: Vec<String> = registry
            .adapters_for_type(IndicatorType::Ip)
            .iter()
            .map(|a| a.code().to_string())
            .collect();
        assert_eq!(codes, again);
        assert!(registry.adapters_for_type(IndicatorType::Hash).is_empty());
    }

    #[test]
    fn test_duplicate_code_is_rejected() {
        let err = Registry::new(vec![
            mock("dup", &[IndicatorType::Ip]),
            mock("dup", &[IndicatorType::Domain]),
        ])
        .err();
        assert_eq!(err, Some(RegistryError::DuplicateCode("dup".to_string())));
    }

    #[test]
    fn test_empty_supported_types_is_rejected() {
        let err = Registry::new(vec![mock("none", &[])]).err();
        assert_eq!(err, Some(RegistryError::NoSupportedTypes("none".to_string())));
    }

    #[test]
    fn test_adapter_by_code() {
        let registry = Registry::new(vec![mock("x", &[IndicatorType::Url])]).unwrap();
        assert_eq!(registry.adapter_by_code("x").map(|a| a.code().to_string()), Some("x".to_string()));
        assert!(registry.adapter_by_code("X").is_none());
    }

    #[test]
    fn test_from_config_registers_full_catalogue() {
        let registry = Registry::from_config(&ProviderKeys::default()).unwrap();

        assert_eq!(registry.len(), 16);
        assert_eq!(registry.all_codes()[0], "abuseipdb");
        assert_eq!(registry.all_codes()[15], "threatminer");
        assert!(registry.adapter_by_code("circl_cve").is_some());

        // no keys: required-key adapters report unconfigured, keyless ones do not
        assert!(!registry.adapter_by_code("abuseipdb").unwrap().is_configured());
        assert!(registry.adapter_by_code("ssllabs").unwrap().is_configured());
    }

    #[test]
    fn test_every_type_has_a_builtin_adapter() {
        let registry = Registry::from_config(&ProviderKeys::default()).unwrap();
        for t in IndicatorType::ALL {
            assert!(!registry.adapters_for_type(t).is_empty(), "no adapter for {}", t);
        }
    }
}
