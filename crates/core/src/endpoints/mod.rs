//! Service endpoint directory
//!
//! Maps each backend [`Service`] to its base URL. Device-provided URLs win,
//! then configured overrides, then the environment defaults.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use webex_domain::{Environment, SdkConfig};

use crate::device::Device;

/// Backend services the SDK talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Service {
    Hydra,
    Region,
    U2c,
    Wdm,
    Kms,
    Locus,
    Conv,
    Metrics,
    CalliopeDiscovery,
}

impl Service {
    pub const ALL: [Self; 9] = [
        Self::Hydra,
        Self::Region,
        Self::U2c,
        Self::Wdm,
        Self::Kms,
        Self::Locus,
        Self::Conv,
        Self::Metrics,
        Self::CalliopeDiscovery,
    ];

    /// Name used in device service tables and config overrides.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Hydra => "hydra",
            Self::Region => "region",
            Self::U2c => "u2c",
            Self::Wdm => "wdm",
            Self::Kms => "encryption",
            Self::Locus => "locus",
            Self::Conv => "conversation",
            Self::Metrics => "metrics",
            Self::CalliopeDiscovery => "calliopeDiscovery",
        }
    }

    pub const fn default_url(&self, environment: Environment) -> &'static str {
        match (self, environment) {
            (Self::Wdm, Environment::Integration) => "https://wdm-intb.ciscospark.com/wdm/api/v1",
            (Self::Hydra, Environment::Integration) => "https://apialpha.ciscospark.com/v1",
            (Self::Kms, Environment::Integration) => {
                "https://encryption-intb.ciscospark.com/encryption/api/v1"
            }
            (Self::Conv, Environment::Integration) => {
                "https://conversation-intb.ciscospark.com/conversation/api/v1"
            }
            (Self::Region, _) => "https://ds.ciscospark.com/v1",
            (Self::U2c, _) => "https://u2c.wbx2.com/u2c/api/v1",
            (Self::Wdm, _) => "https://wdm-a.wbx2.com/wdm/api/v1",
            (Self::Hydra, _) => "https://api.ciscospark.com/v1",
            (Self::Kms, _) => "https://encryption-a.wbx2.com/encryption/api/v1",
            (Self::Conv, _) => "https://conv-a.wbx2.com/conversation/api/v1",
            (Self::Locus, _) => "https://locus-a.wbx2.com/locus/api/v1",
            (Self::Metrics, _) => "https://metrics-a.wbx2.com/metrics/api/v1",
            (Self::CalliopeDiscovery, _) => "https://calliope-a.wbx2.com/calliope/api/discovery/v1",
        }
    }
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Service {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|service| service.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("Invalid Service: {s}"))
    }
}

/// Resolved base URLs for one SDK instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceDirectory {
    environment: Environment,
    overrides: BTreeMap<Service, String>,
}

impl ServiceDirectory {
    pub fn new(environment: Environment) -> Self {
        Self { environment, overrides: BTreeMap::new() }
    }

    /// Builds the directory from config, ignoring override keys that name no
    /// known service.
    pub fn from_config(config: &SdkConfig) -> Self {
        let overrides = config
            .endpoints
            .iter()
            .filter_map(|(name, url)| match name.parse::<Service>() {
                Ok(service) => Some((service, url.trim_end_matches('/').to_string())),
                Err(error) => {
                    tracing::warn!(%error, "ignoring endpoint override");
                    None
                }
            })
            .collect();
        Self { environment: config.environment, overrides }
    }

    pub const fn environment(&self) -> Environment {
        self.environment
    }

    /// Base URL for `service`, preferring the device's own URL.
    pub fn base_url(&self, service: Service, device: Option<&Device>) -> String {
        device
            .and_then(|device| device.service_url(service.name()))
            .map(str::to_string)
            .unwrap_or_else(|| self.global_url(service))
    }

    /// Base URL for `service` without device overrides.
    pub fn global_url(&self, service: Service) -> String {
        self.overrides
            .get(&service)
            .cloned()
            .unwrap_or_else(|| service.default_url(self.environment).to_string())
    }
}

impl Default for ServiceDirectory {
    fn default() -> Self {
        Self::new(Environment::default())
    }
}
