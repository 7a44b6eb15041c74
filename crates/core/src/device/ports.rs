//! Port interface for persisting the registered device
//!
//! The registration flow reuses a previously created device record when one
//! is stored, so restarts do not leak device registrations.

use webex_domain::Result;

/// Persistent slot for the registered device URL and identifier.
pub trait DeviceStore: Send + Sync {
    fn device_url(&self) -> Option<String>;

    fn device_identifier(&self) -> Option<String>;

    fn save(&self, device_url: &str, device_identifier: Option<&str>) -> Result<()>;

    fn clear(&self) -> Result<()>;
}
