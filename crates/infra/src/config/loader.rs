//! Configuration loader
//!
//! ## Loading Strategy
//! 1. A `.env` file in the working directory is merged into the process
//!    environment (existing variables win)
//! 2. If `WEBEX_ENVIRONMENT` is set, configuration comes from the environment
//! 3. Otherwise the first config file found by [`probe_config_paths`] is used
//!
//! ## Environment Variables
//! - `WEBEX_ENVIRONMENT`: `production` or `integration` (required)
//! - `WEBEX_HTTP_TIMEOUT_SECS`: request timeout in seconds
//! - `WEBEX_MAX_REDIRECTS`: redirect hops followed per attempt
//! - `WEBEX_USER_AGENT`: `User-Agent` header value
//! - `WEBEX_TRUSTED_DOMAINS`: comma-separated domains allowed to receive
//!   tracking headers
//! - `WEBEX_TRACKING_ID_PREFIX`: prefix of generated `TrackingID` values
//! - `WEBEX_WDM_SERVER_ADDRESS`, `WEBEX_HYDRA_SERVER_ADDRESS`: base URL
//!   overrides for the device and public API services
//!
//! ## File Locations
//! `webex.{json,toml}` then `config.{json,toml}`, first in the working
//! directory and its parent, then next to the executable.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use webex_domain::{Environment, Result, SdkConfig, TrustedDomains, WebexError};

const CONFIG_FILE_NAMES: [&str; 4] = ["webex.json", "webex.toml", "config.json", "config.toml"];

/// Environment variables that become endpoint overrides.
const ENDPOINT_VARS: [(&str, &str); 2] =
    [("WEBEX_WDM_SERVER_ADDRESS", "wdm"), ("WEBEX_HYDRA_SERVER_ADDRESS", "hydra")];

/// Load configuration from the environment, falling back to a file.
///
/// # Errors
/// Returns `WebexError::Config` when neither source yields a configuration
/// or a value cannot be parsed.
pub fn load() -> Result<SdkConfig> {
    if let Ok(path) = dotenvy::dotenv() {
        tracing::debug!(path = %path.display(), "Merged .env file into environment");
    }

    match load_from_env() {
        Ok(config) => {
            tracing::info!(environment = %config.environment, "Configuration loaded from environment variables");
            Ok(config)
        }
        Err(e) => {
            tracing::debug!(error = ?e, "Failed to load from environment, trying file");
            load_from_file(None)
        }
    }
}

/// Load configuration from `WEBEX_*` environment variables.
///
/// Only `WEBEX_ENVIRONMENT` is required; unset optional variables keep
/// their defaults.
///
/// # Errors
/// Returns `WebexError::Config` if `WEBEX_ENVIRONMENT` is missing or any
/// variable has an invalid value.
pub fn load_from_env() -> Result<SdkConfig> {
    let mut config = SdkConfig {
        environment: env_parse::<Environment>("WEBEX_ENVIRONMENT")?,
        ..SdkConfig::default()
    };

    if let Some(timeout) = env_opt("WEBEX_HTTP_TIMEOUT_SECS") {
        config.http.timeout_secs = parse_value("WEBEX_HTTP_TIMEOUT_SECS", &timeout)?;
    }
    if let Some(redirects) = env_opt("WEBEX_MAX_REDIRECTS") {
        config.http.max_redirects = parse_value("WEBEX_MAX_REDIRECTS", &redirects)?;
    }
    if let Some(user_agent) = env_opt("WEBEX_USER_AGENT") {
        config.http.user_agent = user_agent;
    }
    if let Some(domains) = env_opt("WEBEX_TRUSTED_DOMAINS") {
        config.trusted_domains =
            TrustedDomains::new(domains.split(',').map(str::trim).filter(|d| !d.is_empty()));
    }
    if let Some(prefix) = env_opt("WEBEX_TRACKING_ID_PREFIX") {
        config.tracking_id_prefix = prefix;
    }
    for (var, service) in ENDPOINT_VARS {
        if let Some(url) = env_opt(var) {
            config.endpoints.insert(service.to_string(), url);
        }
    }

    Ok(config)
}

/// Load configuration from a file
///
/// If `path` is `None`, probes the standard locations. The format is
/// detected by extension.
///
/// # Errors
/// Returns `WebexError::Config` if the file is missing, unreadable or
/// malformed.
pub fn load_from_file(path: Option<PathBuf>) -> Result<SdkConfig> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(WebexError::Config(format!("Config file not found: {}", p.display())));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            WebexError::Config("No config file found in any of the standard locations".to_string())
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| WebexError::Config(format!("Failed to read config file: {e}")))?;

    parse_config(&contents, &config_path)
}

fn parse_config(contents: &str, path: &Path) -> Result<SdkConfig> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| WebexError::Config(format!("Invalid TOML format: {e}"))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| WebexError::Config(format!("Invalid JSON format: {e}"))),
        _ => Err(WebexError::Config(format!("Unsupported config format: {extension}"))),
    }
}

/// First existing config file among the standard locations.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut dirs = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        dirs.push(cwd.join(".."));
        dirs.insert(0, cwd);
    }
    if let Some(exe_dir) = std::env::current_exe().ok().and_then(|p| p.parent().map(Path::to_path_buf)) {
        dirs.push(exe_dir);
    }

    dirs.iter()
        .flat_map(|dir| CONFIG_FILE_NAMES.iter().map(move |name| dir.join(name)))
        .find(|path| path.is_file())
}

fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn env_parse<T: FromStr>(key: &str) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    let raw = env_opt(key).ok_or_else(|| {
        WebexError::Config(format!("Missing required environment variable: {key}"))
    })?;
    parse_value(key, &raw)
}

fn parse_value<T: FromStr>(key: &str, raw: &str) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    raw.parse::<T>().map_err(|e| WebexError::Config(format!("Invalid value for {key}: {e}")))
}
