//! Device registration and persistence

pub mod service;
pub mod store;

pub use service::DeviceService;
pub use store::{InMemoryDeviceStore, JsonFileDeviceStore};
