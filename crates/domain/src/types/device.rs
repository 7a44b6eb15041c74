//! Device registration models
//!
//! Payloads of the region, U2C catalog and WDM device endpoints.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

/// Region discovered for the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionModel {
    pub country_code: Option<String>,
    pub region_code: Option<String>,
}

/// Service name to URL links returned by `user/catalog?format=hostMap`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceHostMap {
    #[serde(default)]
    pub service_links: HashMap<String, String>,
}

/// Cluster id to base URL table built from the U2C service list.
///
/// Keys look like `urn:TEAM:us-east-2_a:identityLookup`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "ServiceListWire", into = "ServiceListWire")]
pub struct ClusterCatalog {
    pub cluster_urls: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ServiceListWire {
    #[serde(default)]
    services: Vec<ServiceEntryWire>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ServiceEntryWire {
    id: Option<String>,
    service_name: Option<String>,
    #[serde(default)]
    service_urls: Vec<ServiceUrlWire>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ServiceUrlWire {
    base_url: String,
    #[serde(default)]
    priority: i64,
}

impl From<ServiceListWire> for ClusterCatalog {
    fn from(wire: ServiceListWire) -> Self {
        let cluster_urls = wire
            .services
            .into_iter()
            .filter_map(|entry| {
                let id = entry.id?;
                let preferred = entry.service_urls.into_iter().min_by_key(|u| u.priority)?;
                Some((id, preferred.base_url))
            })
            .collect();
        Self { cluster_urls }
    }
}

impl From<ClusterCatalog> for ServiceListWire {
    fn from(catalog: ClusterCatalog) -> Self {
        let services = catalog
            .cluster_urls
            .into_iter()
            .map(|(id, base_url)| ServiceEntryWire {
                service_name: id.rsplit(':').next().map(str::to_string),
                id: Some(id),
                service_urls: vec![ServiceUrlWire { base_url, priority: 1 }],
            })
            .collect();
        Self { services }
    }
}

/// Device record returned by WDM on create/update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceModel {
    pub url: Option<String>,
    pub device_identifier: Option<String>,
    pub web_socket_url: Option<String>,
    pub device_settings_string: Option<String>,
    /// Per-device service URLs keyed `{service}ServiceUrl`.
    #[serde(default)]
    pub services: HashMap<String, String>,
    pub service_host_map: Option<ServiceHostMap>,
}

impl DeviceModel {
    /// Device-specific URL for a service name, if WDM handed one out.
    pub fn service_url(&self, service: &str) -> Option<&str> {
        self.services
            .get(&format!("{service}ServiceUrl"))
            .or_else(|| self.service_host_map.as_ref()?.service_links.get(service))
            .map(String::as_str)
    }
}

/// Local device metadata sent at registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceInfo {
    pub name: String,
    pub model: String,
    pub localized_model: String,
    pub system_name: String,
    pub system_version: String,
}

impl Default for DeviceInfo {
    fn default() -> Self {
        Self {
            name: String::new(),
            model: std::env::consts::ARCH.to_string(),
            localized_model: std::env::consts::ARCH.to_string(),
            system_name: std::env::consts::OS.to_string(),
            system_version: String::new(),
        }
    }
}
