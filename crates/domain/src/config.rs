//! SDK configuration structures
//!
//! Loaded by `webex_infra::config::loader` from the environment or a
//! JSON/TOML file. Every field has a default so partial files are accepted.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_HTTP_TIMEOUT_SECS, DEFAULT_MAX_REDIRECTS, DEFAULT_TRACKING_ID_PREFIX,
    DEFAULT_TRUSTED_DOMAINS, DEFAULT_USER_AGENT,
};
use crate::impl_wire_name_conversions;

/// Backend deployment the SDK talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Production,
    /// Integration test deployment (`*-intb` hosts).
    Integration,
}

impl_wire_name_conversions!(Environment {
    Production => "production",
    Integration => "integration",
});

/// Root configuration for one SDK instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SdkConfig {
    pub environment: Environment,
    pub http: HttpConfig,
    pub trusted_domains: TrustedDomains,
    pub tracking_id_prefix: String,
    /// Base URL overrides keyed by service name (`hydra`, `wdm`, ...).
    pub endpoints: BTreeMap<String, String>,
}

impl Default for SdkConfig {
    fn default() -> Self {
        Self {
            environment: Environment::default(),
            http: HttpConfig::default(),
            trusted_domains: TrustedDomains::default(),
            tracking_id_prefix: DEFAULT_TRACKING_ID_PREFIX.to_string(),
            endpoints: BTreeMap::new(),
        }
    }
}

impl SdkConfig {
    pub fn endpoint_override(&self, service: &str) -> Option<&str> {
        self.endpoints.get(service).map(String::as_str)
    }

    /// Builder-style helper used by tests and embedders.
    #[must_use]
    pub fn with_endpoint(mut self, service: impl Into<String>, url: impl Into<String>) -> Self {
        self.endpoints.insert(service.into(), url.into());
        self
    }
}

/// HTTP transport settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub timeout_secs: u64,
    pub max_redirects: usize,
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS,
            max_redirects: DEFAULT_MAX_REDIRECTS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl HttpConfig {
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Allow-list of domains that may receive tracking headers.
///
/// A host is trusted when it equals a listed domain or is a subdomain of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrustedDomains(Vec<String>);

impl Default for TrustedDomains {
    fn default() -> Self {
        Self(DEFAULT_TRUSTED_DOMAINS.iter().map(|d| (*d).to_string()).collect())
    }
}

impl TrustedDomains {
    pub fn new<I, S>(domains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(domains.into_iter().map(|d| d.into().trim().to_ascii_lowercase()).collect())
    }

    pub fn contains_host(&self, host: &str) -> bool {
        let host = host.trim_end_matches('.').to_ascii_lowercase();
        self.0.iter().any(|domain| {
            host == *domain
                || (host.len() > domain.len()
                    && host.ends_with(domain.as_str())
                    && host.as_bytes()[host.len() - domain.len() - 1] == b'.')
        })
    }

    pub fn domains(&self) -> &[String] {
        &self.0
    }
}
