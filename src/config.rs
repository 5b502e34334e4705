//! Configuration module

use std::env;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Database connection URL (unset = in-memory store)
    pub database_url: Option<String>,

    /// Maximum pooled database connections
    pub database_max_connections: u32,

    /// Server port
    pub port: u16,

    /// Default log level for the crate and tower-http
    pub log_level: String,

    /// Log output format (text, json)
    pub log_format: String,

    /// Environment (development, production)
    pub environment: String,

    /// TTL stamped on every persisted provider result
    pub cache_ttl_seconds: i32,

    /// Shared deadline for all providers dispatched by one lookup
    pub lookup_timeout_secs: u64,

    /// Provider credentials
    pub providers: ProviderKeys,
}

/// One credential per provider. `None` means the provider runs unconfigured.
#[derive(Debug, Clone, Default)]
pub struct ProviderKeys {
    pub abuseipdb: Option<String>,
    pub virustotal: Option<String>,
    pub phishtank: Option<String>,
    pub urlscan: Option<String>,
    pub hibp: Option<String>,
    pub nvd: Option<String>,
    pub binaryedge: Option<String>,
    pub criminalip: Option<String>,
    pub pulsedive: Option<String>,
    pub emailrep: Option<String>,
    pub vulners: Option<String>,
    pub hybridanalysis: Option<String>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            database_url: optional_env("DATABASE_URL"),

            database_max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                .ok()
                .and_then(|n| n.parse().ok())
                .unwrap_or(10),

            port: env::var("HTTP_PORT")
                .or_else(|_| env::var("PORT"))
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),

            log_level: env::var("LOG_LEVEL")
                .unwrap_or_else(|_| "info".to_string()),

            log_format: env::var("LOG_FORMAT")
                .unwrap_or_else(|_| "text".to_string()),

            environment: env::var("ENVIRONMENT")
                .unwrap_or_else(|_| "development".to_string()),

            cache_ttl_seconds: env::var("CACHE_TTL_SECONDS")
                .ok()
                .and_then(|t| t.parse().ok())
                .unwrap_or(3600),

            lookup_timeout_secs: env::var("LOOKUP_TIMEOUT_SECS")
                .ok()
                .and_then(|t| t.parse().ok())
                .unwrap_or(30),

            providers: ProviderKeys::from_env(),
        }
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// JSON logs are used when asked for explicitly or in production
    pub fn json_logs(&self) -> bool {
        self.log_format.eq_ignore_ascii_case("json") || self.is_production()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: None,
            database_max_connections: 10,
            port: 8080,
            log_level: "info".to_string(),
            log_format: "text".to_string(),
            environment: "development".to_string(),
            cache_ttl_seconds: 3600,
            lookup_timeout_secs: 30,
            providers: ProviderKeys::default(),
        }
    }
}

impl ProviderKeys {
    /// Read every provider credential from the environment
    pub fn from_env() -> Self {
        Self {
            abuseipdb: optional_env("ABUSEIPDB_API_KEY"),
            virustotal: optional_env("VIRUSTOTAL_API_KEY"),
            phishtank: optional_env("PHISHTANK_APP_KEY"),
            urlscan: optional_env("URLSCAN_API_KEY"),
            hibp: optional_env("HIBP_API_KEY"),
            nvd: optional_env("NVD_API_KEY"),
            binaryedge: optional_env("BINARYEDGE_API_KEY"),
            criminalip: optional_env("CRIMINALIP_API_KEY"),
            pulsedive: optional_env("PULSEDIVE_API_KEY"),
            emailrep: optional_env("EMAILREP_API_KEY"),
            vulners: optional_env("VULNERS_API_KEY"),
            hybridanalysis: optional_env("HYBRIDANALYSIS_API_KEY"),
        }
    }
}

/// Blank values count as unset
fn optional_env(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
