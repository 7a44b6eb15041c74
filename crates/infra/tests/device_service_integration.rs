//! Integration tests for device registration
//!
//! **Coverage:**
//! - Fresh registration: region, cluster and host discovery, WDM create
//! - Re-registration of a stored device through WDM update
//! - Fallbacks when discovery endpoints fail
//! - Persistence failures: new directories, rollback of unsaved devices
//! - Deregistration clearing persisted and in-memory state
//! - Requests homed on the registered device afterwards

#![allow(dead_code)]

#[path = "support.rs"]
mod support;

use std::sync::Arc;

use serde_json::{json, Value};
use support::{config_for, space_id, MockAuthenticator, SPACE_UUID};
use tempfile::TempDir;
use webex_common::testing::RecordingSleeper;
use webex_core::DeviceStore;
use webex_domain::{DeviceInfo, WebexError};
use webex_infra::{InMemoryDeviceStore, JsonFileDeviceStore, Webex};
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ============================================================================
// Test Helpers
// ============================================================================

fn webex_with_store(server: &MockServer, store: Arc<dyn DeviceStore>) -> Webex {
    Webex::builder(config_for(server), Arc::new(MockAuthenticator::new("token-1")))
        .device_store(store)
        .sleeper(Arc::new(RecordingSleeper::new()))
        .build()
}

/// In-memory store whose writes can be made to fail.
#[derive(Default)]
struct FlakyStore {
    inner: InMemoryDeviceStore,
    fail_save: bool,
    fail_clear: bool,
}

impl DeviceStore for FlakyStore {
    fn device_url(&self) -> Option<String> {
        self.inner.device_url()
    }

    fn device_identifier(&self) -> Option<String> {
        self.inner.device_identifier()
    }

    fn save(&self, device_url: &str, device_identifier: Option<&str>) -> webex_domain::Result<()> {
        if self.fail_save {
            return Err(WebexError::Config("disk full".into()));
        }
        self.inner.save(device_url, device_identifier)
    }

    fn clear(&self) -> webex_domain::Result<()> {
        if self.fail_clear {
            return Err(WebexError::Config("read-only store".into()));
        }
        self.inner.clear()
    }
}

async fn mount_create(server: &MockServer, id: &str, expected: u64) {
    Mock::given(method("GET"))
        .and(path("/u2c/api/v1/user/catalog"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"serviceLinks": {}})))
        .mount(server)
        .await;
    Mock::given(method("POST"))
        .and(path("/wdm/api/v1/devices"))
        .respond_with(ResponseTemplate::new(200).set_body_json(device_body(server, id)))
        .expect(expected)
        .mount(server)
        .await;
}

fn device_info() -> DeviceInfo {
    DeviceInfo {
        name: "build-agent".into(),
        model: "x86_64".into(),
        localized_model: "x86_64".into(),
        system_name: "linux".into(),
        system_version: "6.1".into(),
    }
}

fn device_body(server: &MockServer, id: &str) -> Value {
    let base = server.uri();
    json!({
        "url": format!("{base}/wdm/api/v1/devices/{id}"),
        "deviceIdentifier": "ident-1",
        "webSocketUrl": format!("wss://mercury.example.com/v1/{id}"),
        "services": {
            "hydraServiceUrl": format!("{base}/device-hydra/v1")
        }
    })
}

async fn mount_discovery(server: &MockServer) {
    let base = server.uri();
    Mock::given(method("GET"))
        .and(path("/region-svc/region"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"countryCode": "DE", "regionCode": "EU-CENTRAL"})),
        )
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/u2c/api/v1/catalog"))
        .and(query_param("format", "serviceList"))
        .and(query_param("services", "identityLookup"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "services": [{
                "id": "urn:TEAM:us-east-2_a:identityLookup",
                "serviceName": "identityLookup",
                "serviceUrls": [
                    {"baseUrl": format!("{base}/backup/conversation/api/v1"), "priority": 5},
                    {"baseUrl": format!("{base}/cluster-a/conversation/api/v1"), "priority": 1}
                ]
            }]
        })))
        .mount(server)
        .await;
}

// ============================================================================
// Registration
// ============================================================================

#[tokio::test]
async fn fresh_registration_creates_and_persists_the_device() {
    let server = MockServer::start().await;
    mount_discovery(&server).await;
    Mock::given(method("GET"))
        .and(path("/u2c/api/v1/user/catalog"))
        .and(query_param("format", "hostMap"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "serviceLinks": {"wdm": format!("{}/wdm-host/wdm/api/v1", server.uri())}
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/wdm-host/wdm/api/v1/devices"))
        .and(header("x-catalog-version2", "true"))
        .and(header("authorization", "Bearer token-1"))
        .and(body_partial_json(json!({
            "deviceName": "build-agent",
            "deviceType": "TEAMS_SDK_IOS",
            "countryCode": "DE",
            "regionCode": "EU-CENTRAL",
            "ttl": "15552000"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(device_body(&server, "d1")))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let store_path = dir.path().join("device.json");
    let store = Arc::new(JsonFileDeviceStore::open(&store_path).unwrap());
    let webex = webex_with_store(&server, store);

    let device = webex.devices().register(&device_info()).await.unwrap();

    assert_eq!(device.device_url(), format!("{}/wdm/api/v1/devices/d1", server.uri()));
    assert_eq!(device.web_socket_url(), "wss://mercury.example.com/v1/d1");
    assert_eq!(device.country_code(), "DE");
    assert_eq!(webex.device().map(|d| d.device_url().to_string()), Some(device.device_url().to_string()));

    let reopened = JsonFileDeviceStore::open(&store_path).unwrap();
    assert_eq!(reopened.device_url().as_deref(), Some(device.device_url()));
    assert_eq!(reopened.device_identifier().as_deref(), Some("ident-1"));
}

#[tokio::test]
async fn registered_device_homes_later_requests() {
    let server = MockServer::start().await;
    mount_discovery(&server).await;
    Mock::given(method("GET"))
        .and(path("/u2c/api/v1/user/catalog"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/wdm/api/v1/devices"))
        .respond_with(ResponseTemplate::new(200).set_body_json(device_body(&server, "d2")))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/device-hydra/v1/rooms"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"items": [{"id": "r1"}]})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/cluster-a/conversation/api/v1/conversations/{SPACE_UUID}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": SPACE_UUID,
            "objectType": "conversation",
            "tags": ["ONE_ON_ONE"]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let webex = webex_with_store(&server, Arc::new(InMemoryDeviceStore::new()));
    webex.devices().register(&device_info()).await.unwrap();

    let spaces = webex.spaces().list(None, None, None, None).await.unwrap();
    assert_eq!(spaces[0].id.as_deref(), Some("r1"));

    let status = webex.spaces().get_with_read_status(&space_id()).await.unwrap();
    assert_eq!(status.space_type, Some(webex_domain::SpaceType::Direct));
}

#[tokio::test]
async fn stored_device_is_updated_in_place() {
    let server = MockServer::start().await;
    mount_discovery(&server).await;
    Mock::given(method("GET"))
        .and(path("/u2c/api/v1/user/catalog"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/wdm/api/v1/devices/existing"))
        .and(header("x-catalog-version2", "true"))
        .and(body_partial_json(json!({"deviceIdentifier": "ident-stored"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(device_body(&server, "existing")))
        .expect(1)
        .mount(&server)
        .await;

    let store = Arc::new(InMemoryDeviceStore::new());
    store
        .save(&format!("{}/wdm/api/v1/devices/existing", server.uri()), Some("ident-stored"))
        .unwrap();
    let webex = webex_with_store(&server, store.clone());

    let device = webex.devices().register(&device_info()).await.unwrap();
    assert!(device.device_url().ends_with("/devices/existing"));
    assert_eq!(store.device_identifier().as_deref(), Some("ident-1"));
}

#[tokio::test]
async fn legacy_device_url_is_replaced_by_a_new_device() {
    let server = MockServer::start().await;
    mount_discovery(&server).await;
    Mock::given(method("GET"))
        .and(path("/u2c/api/v1/user/catalog"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"serviceLinks": {}})))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/wdm/api/v1/devices"))
        .respond_with(ResponseTemplate::new(200).set_body_json(device_body(&server, "d3")))
        .expect(1)
        .mount(&server)
        .await;

    let store = Arc::new(InMemoryDeviceStore::new());
    store.save("https://wdm-a.wbx2.com/wdm/api/v1/devices/ios/old", None).unwrap();
    let webex = webex_with_store(&server, store.clone());

    webex.devices().register(&device_info()).await.unwrap();
    assert!(store.device_url().unwrap().ends_with("/devices/d3"));
}

#[tokio::test]
async fn discovery_failures_fall_back_to_defaults() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/region-svc/region"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/u2c/api/v1/catalog"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/u2c/api/v1/user/catalog"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/wdm/api/v1/devices"))
        .and(body_partial_json(json!({"countryCode": "US", "regionCode": "US-WEST"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(device_body(&server, "d4")))
        .expect(1)
        .mount(&server)
        .await;

    let webex = webex_with_store(&server, Arc::new(InMemoryDeviceStore::new()));
    let device = webex.devices().register(&device_info()).await.unwrap();

    assert_eq!(device.region_code(), "US-WEST");
    assert_eq!(device.cluster_url("urn:TEAM:us-east-2_a:identityLookup"), None);
}

#[tokio::test]
async fn registration_without_urls_fails() {
    let server = MockServer::start().await;
    mount_discovery(&server).await;
    Mock::given(method("GET"))
        .and(path("/u2c/api/v1/user/catalog"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"serviceLinks": {}})))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/wdm/api/v1/devices"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"url": format!("{}/wdm/api/v1/devices/d5", server.uri())})),
        )
        .mount(&server)
        .await;

    let store = Arc::new(InMemoryDeviceStore::new());
    let webex = webex_with_store(&server, store.clone());

    let err = webex.devices().register(&device_info()).await.unwrap_err();
    assert_eq!(err, WebexError::service_failed("Missing required URLs when registering device"));
    assert!(store.device_url().is_none());
    assert!(webex.device().is_none());
}

#[tokio::test]
async fn store_in_a_new_directory_keeps_the_device_across_registrations() {
    let server = MockServer::start().await;
    mount_discovery(&server).await;
    mount_create(&server, "d8", 1).await;
    Mock::given(method("PUT"))
        .and(path("/wdm/api/v1/devices/d8"))
        .respond_with(ResponseTemplate::new(200).set_body_json(device_body(&server, "d8")))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let store_path = dir.path().join("sdk").join("device.json");
    let store = Arc::new(JsonFileDeviceStore::open(&store_path).unwrap());
    let webex = webex_with_store(&server, store);

    let first = webex.devices().register(&device_info()).await.unwrap();
    let second = webex.devices().register(&device_info()).await.unwrap();

    assert_eq!(first.device_url(), second.device_url());
    assert!(webex.device().is_some());
    let reopened = JsonFileDeviceStore::open(&store_path).unwrap();
    assert_eq!(reopened.device_url().as_deref(), Some(first.device_url()));
}

#[tokio::test]
async fn new_device_that_cannot_be_saved_is_deleted_again() {
    let server = MockServer::start().await;
    mount_discovery(&server).await;
    mount_create(&server, "d9", 1).await;
    Mock::given(method("DELETE"))
        .and(path("/wdm/api/v1/devices/d9"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let store = Arc::new(FlakyStore { fail_save: true, ..FlakyStore::default() });
    let webex = webex_with_store(&server, store.clone());

    let err = webex.devices().register(&device_info()).await.unwrap_err();
    assert_eq!(err, WebexError::Config("disk full".into()));
    assert!(store.device_url().is_none());
    assert!(webex.device().is_none());
}

// ============================================================================
// Deregistration
// ============================================================================

#[tokio::test]
async fn deregister_deletes_and_clears() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/wdm/api/v1/devices/d6"))
        .and(header("x-catalog-version2", "true"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let store = Arc::new(JsonFileDeviceStore::open(dir.path().join("device.json")).unwrap());
    store.save(&format!("{}/wdm/api/v1/devices/d6", server.uri()), Some("ident-1")).unwrap();
    let webex = webex_with_store(&server, store.clone());

    webex.devices().deregister().await.unwrap();

    assert!(store.device_url().is_none());
    assert!(!store.path().exists());
    assert!(webex.device().is_none());
}

#[tokio::test]
async fn deregister_clears_local_state_even_when_delete_fails() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"message": "boom"})))
        .expect(1)
        .mount(&server)
        .await;

    let store = Arc::new(InMemoryDeviceStore::new());
    store.save(&format!("{}/wdm/api/v1/devices/d7", server.uri()), None).unwrap();
    let webex = webex_with_store(&server, store.clone());

    let err = webex.devices().deregister().await.unwrap_err();
    assert_eq!(err, WebexError::service_failed("boom"));
    assert!(store.device_url().is_none());
}

#[tokio::test]
async fn deregister_without_device_is_a_no_op() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(204))
        .expect(0)
        .mount(&server)
        .await;

    let webex = webex_with_store(&server, Arc::new(InMemoryDeviceStore::new()));
    webex.devices().deregister().await.unwrap();
}

#[tokio::test]
async fn deregister_forgets_the_device_when_the_store_fails() {
    let server = MockServer::start().await;
    mount_discovery(&server).await;
    mount_create(&server, "d10", 1).await;
    Mock::given(method("DELETE"))
        .and(path("/wdm/api/v1/devices/d10"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let store = Arc::new(FlakyStore { fail_clear: true, ..FlakyStore::default() });
    let webex = webex_with_store(&server, store);
    webex.devices().register(&device_info()).await.unwrap();
    assert!(webex.device().is_some());

    let err = webex.devices().deregister().await.unwrap_err();
    assert_eq!(err, WebexError::Config("read-only store".into()));
    assert!(webex.device().is_none());
}
