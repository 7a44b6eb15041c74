//! Integration tests for configuration loader
//!
//! Tests the end-to-end behavior of loading configuration from files and
//! building a working session from it.

use std::io::Write;

use tempfile::NamedTempFile;
use webex_core::Service;
use webex_domain::Environment;
use webex_infra::config;
use webex_infra::http::HttpSession;

fn write_config(contents: &str, extension: &str) -> std::path::PathBuf {
    let mut temp_file = NamedTempFile::new().expect("Failed to create temp file");
    temp_file.write_all(contents.as_bytes()).expect("Failed to write to temp file");

    let path = temp_file.path().with_extension(extension);
    std::fs::copy(temp_file.path(), &path).expect("Failed to copy file");
    path
}

#[test]
fn test_load_config_from_json_file() {
    let path = write_config(
        r#"{
            "environment": "integration",
            "http": {
                "timeout_secs": 15,
                "max_redirects": 4,
                "user_agent": "integration-suite/1.0"
            },
            "trusted_domains": ["example.com"],
            "tracking_id_prefix": "suite",
            "endpoints": {
                "hydra": "http://localhost:9000/v1/",
                "bogus": "http://localhost:9999"
            }
        }"#,
        "json",
    );

    let config = config::load_from_file(Some(path.clone())).expect("Failed to load JSON config");
    assert_eq!(config.environment, Environment::Integration);
    assert_eq!(config.http.max_redirects, 4);

    let session = HttpSession::from_config(&config);
    assert_eq!(session.user_agent(), "integration-suite/1.0");
    assert_eq!(session.max_redirects(), 4);
    assert!(session.next_tracking_id().starts_with("suite_"));

    let directory = session.directory();
    assert_eq!(directory.global_url(Service::Hydra), "http://localhost:9000/v1");
    assert_eq!(
        directory.global_url(Service::Wdm),
        "https://wdm-intb.ciscospark.com/wdm/api/v1"
    );

    std::fs::remove_file(path).ok();
}

#[test]
fn test_load_config_from_toml_file() {
    let path = write_config(
        r#"
environment = "production"
trusted_domains = ["wbx2.com", "internal.test"]

[endpoints]
wdm = "http://localhost:8080/wdm/api/v1"
"#,
        "toml",
    );

    let config = config::load_from_file(Some(path.clone())).expect("Failed to load TOML config");
    let session = HttpSession::from_config(&config);

    assert!(session.trusted_domains().contains_host("api.internal.test"));
    assert_eq!(session.directory().global_url(Service::Wdm), "http://localhost:8080/wdm/api/v1");
    assert_eq!(session.directory().global_url(Service::Hydra), "https://api.ciscospark.com/v1");

    std::fs::remove_file(path).ok();
}

#[test]
fn test_invalid_toml_is_a_config_error() {
    let path = write_config("environment = ", "toml");

    let err = config::load_from_file(Some(path.clone())).unwrap_err();
    assert!(matches!(err, webex_domain::WebexError::Config(msg) if msg.starts_with("Invalid TOML")));

    std::fs::remove_file(path).ok();
}
