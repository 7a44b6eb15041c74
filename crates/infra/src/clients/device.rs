//! Device registration endpoints (region, U2C catalog, WDM)

use reqwest::Method;
use tracing::instrument;
use webex_core::Service;
use webex_domain::constants::{
    DEFAULT_DEVICE_NAME, DEVICE_TTL_SECS, DEVICE_TYPE, HEADER_CATALOG_VERSION,
};
use webex_domain::{ClusterCatalog, DeviceInfo, DeviceModel, RegionModel, Result, ServiceHostMap};

use super::ClientContext;
use crate::http::{RequestParameter, ServiceRequestBuilder};

/// Everything sent to WDM when creating or refreshing a device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceRegistration {
    pub info: DeviceInfo,
    pub device_identifier: String,
    pub country_code: String,
    pub region_code: String,
}

impl DeviceRegistration {
    pub fn body(&self) -> RequestParameter {
        let name = if self.info.name.is_empty() { DEFAULT_DEVICE_NAME } else { self.info.name.as_str() };
        RequestParameter::new()
            .with("deviceName", name)
            .with("name", name)
            .with("model", self.info.model.as_str())
            .with("localizedModel", self.info.localized_model.as_str())
            .with("systemName", self.info.system_name.as_str())
            .with("systemVersion", self.info.system_version.as_str())
            .with("deviceType", DEVICE_TYPE)
            .with("deviceIdentifier", self.device_identifier.as_str())
            .with("countryCode", self.country_code.as_str())
            .with("regionCode", self.region_code.as_str())
            .with("ttl", DEVICE_TTL_SECS.to_string())
            .with("capabilities", serde_json::json!({"sdpSupported": true, "groupCallSupported": true}))
    }
}

pub struct DeviceClient {
    context: ClientContext,
}

impl DeviceClient {
    pub fn new(context: ClientContext) -> Self {
        Self { context }
    }

    fn with_catalog_header(builder: ServiceRequestBuilder) -> ServiceRequestBuilder {
        builder.header(HEADER_CATALOG_VERSION, "true")
    }

    #[instrument(skip(self))]
    pub async fn fetch_region(&self) -> Result<RegionModel> {
        self.context
            .homed(Service::Region)
            .path("region")
            .build()?
            .response_object()
            .await
            .into_result()
    }

    /// identityLookup cluster bindings from U2C.
    #[instrument(skip(self))]
    pub async fn fetch_clusters(&self) -> Result<ClusterCatalog> {
        self.context
            .homed(Service::U2c)
            .path("catalog")
            .query(
                RequestParameter::new()
                    .with("format", "serviceList")
                    .with("services", "identityLookup"),
            )
            .build()?
            .response_object()
            .await
            .into_result()
    }

    #[instrument(skip(self))]
    pub async fn fetch_hosts(&self) -> Result<ServiceHostMap> {
        self.context
            .homed(Service::U2c)
            .path("user")
            .path("catalog")
            .query(RequestParameter::new().with("format", "hostMap"))
            .build()?
            .response_object()
            .await
            .into_result()
    }

    #[instrument(skip(self, registration), fields(device_identifier = %registration.device_identifier))]
    pub async fn create(&self, wdm_url: &str, registration: &DeviceRegistration) -> Result<DeviceModel> {
        Self::with_catalog_header(self.context.endpoint(wdm_url).path("devices"))
            .method(Method::POST)
            .body(registration.body())
            .build()?
            .response_object()
            .await
            .into_result()
    }

    #[instrument(skip(self, registration), fields(device_identifier = %registration.device_identifier))]
    pub async fn update(&self, device_url: &str, registration: &DeviceRegistration) -> Result<DeviceModel> {
        Self::with_catalog_header(self.context.endpoint(device_url))
            .method(Method::PUT)
            .body(registration.body())
            .build()?
            .response_object()
            .await
            .into_result()
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, device_url: &str) -> Result<()> {
        Self::with_catalog_header(self.context.endpoint(device_url))
            .method(Method::DELETE)
            .build()?
            .response_json()
            .await
            .into_result()
            .map(|_| ())
    }
}
