//! Configuration loading
//!
//! Builds an [`SdkConfig`](webex_domain::SdkConfig) from environment
//! variables or a JSON/TOML file.

pub mod loader;

pub use loader::{load, load_from_env, load_from_file, probe_config_paths};
