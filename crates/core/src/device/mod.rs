//! Registered device context
//!
//! A [`Device`] is the outcome of a successful WDM registration: the device
//! record, the caller's region and the cluster URL table from U2C. Service
//! routing and identifier resolution consult it.

pub mod ports;

use std::collections::BTreeMap;

use webex_domain::constants::{
    DEFAULT_COUNTRY_CODE, DEFAULT_REGION_CODE, IDENTITY_LOOKUP_SUFFIX,
};
use webex_domain::{ClusterCatalog, DeviceModel, RegionModel, Result, WebexError};

pub use ports::DeviceStore;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Device {
    model: DeviceModel,
    region: RegionModel,
    cluster_urls: BTreeMap<String, String>,
    device_url: String,
    web_socket_url: String,
}

impl Device {
    /// Builds the context; WDM must have returned both the device URL and the
    /// web socket URL.
    pub fn new(model: DeviceModel, region: RegionModel, clusters: ClusterCatalog) -> Result<Self> {
        let (Some(device_url), Some(web_socket_url)) =
            (model.url.clone(), model.web_socket_url.clone())
        else {
            return Err(WebexError::service_failed("Missing required URLs when registering device"));
        };

        Ok(Self { model, region, cluster_urls: clusters.cluster_urls, device_url, web_socket_url })
    }

    pub fn device_url(&self) -> &str {
        &self.device_url
    }

    pub fn web_socket_url(&self) -> &str {
        &self.web_socket_url
    }

    pub fn device_identifier(&self) -> Option<&str> {
        self.model.device_identifier.as_deref()
    }

    pub fn device_settings(&self) -> Option<&str> {
        self.model.device_settings_string.as_deref()
    }

    pub fn country_code(&self) -> &str {
        self.region.country_code.as_deref().unwrap_or(DEFAULT_COUNTRY_CODE)
    }

    pub fn region_code(&self) -> &str {
        self.region.region_code.as_deref().unwrap_or(DEFAULT_REGION_CODE)
    }

    /// Device-specific URL for a service name.
    pub fn service_url(&self, service: &str) -> Option<&str> {
        self.model.service_url(service)
    }

    /// URL bound to a cluster service id such as
    /// `urn:TEAM:us-west-2_r:identityLookup`.
    pub fn cluster_url(&self, service_cluster_id: &str) -> Option<&str> {
        self.cluster_urls.get(service_cluster_id).map(String::as_str)
    }

    /// identityLookup URL of the given cluster.
    pub fn identity_cluster_url(&self, cluster: &str) -> Option<&str> {
        self.cluster_url(&format!("{cluster}:{IDENTITY_LOOKUP_SUFFIX}"))
    }

    /// Cluster owning `url`, found by matching cluster URL prefixes.
    pub fn cluster_id(&self, url: &str) -> Option<String> {
        self.cluster_urls
            .iter()
            .filter(|(_, base)| url.starts_with(base.as_str()))
            .max_by_key(|(_, base)| base.len())
            .and_then(|(key, _)| key.rfind(':').map(|index| key[..index].to_string()))
    }
}
