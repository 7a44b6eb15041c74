//! [`DeviceStore`] implementations

use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use webex_core::DeviceStore;
use webex_domain::{Result, WebexError};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredDevice {
    device_url: Option<String>,
    device_identifier: Option<String>,
}

/// Keeps the registration for the lifetime of the process.
#[derive(Debug, Default)]
pub struct InMemoryDeviceStore {
    inner: Mutex<StoredDevice>,
}

impl InMemoryDeviceStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DeviceStore for InMemoryDeviceStore {
    fn device_url(&self) -> Option<String> {
        self.inner.lock().device_url.clone()
    }

    fn device_identifier(&self) -> Option<String> {
        self.inner.lock().device_identifier.clone()
    }

    fn save(&self, device_url: &str, device_identifier: Option<&str>) -> Result<()> {
        *self.inner.lock() = StoredDevice {
            device_url: Some(device_url.to_string()),
            device_identifier: device_identifier.map(str::to_string),
        };
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *self.inner.lock() = StoredDevice::default();
        Ok(())
    }
}

/// Persists the registration as a small JSON document so restarts reuse
/// the same WDM device.
#[derive(Debug)]
pub struct JsonFileDeviceStore {
    path: PathBuf,
    cached: Mutex<StoredDevice>,
}

impl JsonFileDeviceStore {
    /// Opens the store; a missing file is an empty store.
    ///
    /// # Errors
    /// `Config` when the file exists but cannot be read or parsed.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let cached = if path.exists() {
            let contents = std::fs::read_to_string(&path).map_err(|e| {
                WebexError::Config(format!("Failed to read device store {}: {e}", path.display()))
            })?;
            serde_json::from_str(&contents).map_err(|e| {
                WebexError::Config(format!("Invalid device store {}: {e}", path.display()))
            })?
        } else {
            StoredDevice::default()
        };
        Ok(Self { path, cached: Mutex::new(cached) })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes through a sibling temp file and renames it over the store, so
    /// readers never see a partial document.
    fn write(&self, stored: &StoredDevice) -> Result<()> {
        let contents = serde_json::to_string_pretty(stored)?;
        let write_error = |e: std::io::Error| {
            WebexError::Config(format!("Failed to write device store {}: {e}", self.path.display()))
        };

        if let Some(parent) = self.path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(write_error)?;
        }
        let temp_path = self.path.with_extension("tmp");
        std::fs::write(&temp_path, contents).map_err(write_error)?;
        std::fs::rename(&temp_path, &self.path).map_err(|e| {
            let _ = std::fs::remove_file(&temp_path);
            write_error(e)
        })
    }
}

impl DeviceStore for JsonFileDeviceStore {
    fn device_url(&self) -> Option<String> {
        self.cached.lock().device_url.clone()
    }

    fn device_identifier(&self) -> Option<String> {
        self.cached.lock().device_identifier.clone()
    }

    fn save(&self, device_url: &str, device_identifier: Option<&str>) -> Result<()> {
        let stored = StoredDevice {
            device_url: Some(device_url.to_string()),
            device_identifier: device_identifier.map(str::to_string),
        };
        self.write(&stored)?;
        *self.cached.lock() = stored;
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *self.cached.lock() = StoredDevice::default();
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(WebexError::Config(format!(
                "Failed to remove device store {}: {e}",
                self.path.display()
            ))),
        }
    }
}
