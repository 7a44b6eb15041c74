//! Device registration flow
//!
//! Registration discovers the caller's region and cluster bindings, then
//! creates a WDM device or refreshes the stored one. The resulting
//! [`Device`] is published to the shared slot the clients route through.

use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, info, instrument, warn};
use webex_core::{Device, DeviceStore, Service};
use webex_domain::constants::{DEFAULT_COUNTRY_CODE, DEFAULT_REGION_CODE, LEGACY_DEVICE_PATH_MARKER};
use webex_domain::{ClusterCatalog, DeviceInfo, RegionModel, Result};

use crate::clients::device::{DeviceClient, DeviceRegistration};
use crate::clients::ClientContext;

pub struct DeviceService {
    client: DeviceClient,
    context: ClientContext,
    store: Arc<dyn DeviceStore>,
}

impl DeviceService {
    pub fn new(context: ClientContext, store: Arc<dyn DeviceStore>) -> Self {
        Self { client: DeviceClient::new(context.clone()), context, store }
    }

    pub fn client(&self) -> &DeviceClient {
        &self.client
    }

    /// Slot holding the registered device.
    pub fn device_slot(&self) -> &Arc<RwLock<Option<Device>>> {
        &self.context.device
    }

    pub fn current(&self) -> Option<Device> {
        self.context.current_device()
    }

    /// Registers this client with WDM.
    ///
    /// Region and cluster lookups are best effort; registration proceeds
    /// with defaults when they fail. A newly created device that cannot be
    /// persisted is deleted again before the store error is returned.
    #[instrument(skip(self, info))]
    pub async fn register(&self, info: &DeviceInfo) -> Result<Device> {
        let region = match self.client.fetch_region().await {
            Ok(region) => region,
            Err(error) => {
                warn!(%error, "region lookup failed, using defaults");
                RegionModel::default()
            }
        };
        let region = RegionModel {
            country_code: region.country_code.or_else(|| Some(DEFAULT_COUNTRY_CODE.to_string())),
            region_code: region.region_code.or_else(|| Some(DEFAULT_REGION_CODE.to_string())),
        };

        let clusters = match self.client.fetch_clusters().await {
            Ok(clusters) => clusters,
            Err(error) => {
                warn!(%error, "cluster lookup failed, identifiers resolve globally");
                ClusterCatalog::default()
            }
        };
        debug!(clusters = clusters.cluster_urls.len(), "service clusters");

        let registration = DeviceRegistration {
            info: info.clone(),
            device_identifier: self
                .store
                .device_identifier()
                .unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
            country_code: region.country_code.clone().unwrap_or_default(),
            region_code: region.region_code.clone().unwrap_or_default(),
        };

        let (model, created) = match self.store.device_url() {
            Some(device_url) if !device_url.contains(LEGACY_DEVICE_PATH_MARKER) => {
                debug!("updating device");
                (self.client.update(&device_url, &registration).await?, false)
            }
            _ => {
                debug!("creating new device");
                let wdm_url = match self.client.fetch_hosts().await {
                    Ok(hosts) => hosts.service_links.get(Service::Wdm.name()).cloned(),
                    Err(error) => {
                        warn!(%error, "host map lookup failed, using default WDM");
                        None
                    }
                }
                .unwrap_or_else(|| self.context.session.directory().global_url(Service::Wdm));
                (self.client.create(&wdm_url, &registration).await?, true)
            }
        };

        let device = Device::new(model, region, clusters)?;
        if let Err(error) = self.store.save(device.device_url(), device.device_identifier()) {
            // A device nobody remembers would be created again on the next attempt.
            if created {
                warn!(%error, device_url = device.device_url(), "failed to persist new device, removing it");
                if let Err(delete_error) = self.client.delete(device.device_url()).await {
                    warn!(error = %delete_error, "failed to remove unpersisted device");
                }
            }
            return Err(error);
        }
        *self.context.device.write() = Some(device.clone());

        info!(device_url = device.device_url(), "device registered");
        Ok(device)
    }

    /// Deletes the stored device from WDM and forgets it locally.
    ///
    /// Local state is cleared even when the delete call or the store fails;
    /// the first failure is returned.
    #[instrument(skip(self))]
    pub async fn deregister(&self) -> Result<()> {
        let Some(device_url) = self.store.device_url() else {
            *self.context.device.write() = None;
            return Ok(());
        };

        let deleted = self.client.delete(&device_url).await;
        if let Err(error) = &deleted {
            warn!(%error, "failed to deregister device");
        }
        *self.context.device.write() = None;
        let cleared = self.store.clear();
        if let Err(error) = &cleared {
            warn!(%error, "failed to clear device store");
        }
        deleted.and(cleared)
    }
}
