//! SDK constants
//!
//! Centralized location for wire-level and domain constants.

// Resource identifiers
pub const WEBEX_ID_SCHEME: &str = "ciscospark";
pub const DEFAULT_CLUSTER: &str = "urn:TEAM:us-east-2_a";
pub const DEFAULT_CLUSTER_ID: &str = "us";
pub const IDENTITY_LOOKUP_SUFFIX: &str = "identityLookup";

// Service errors
pub const DEFAULT_SERVICE_ERROR_CODE: i64 = -7000;
pub const DEFAULT_SERVICE_ERROR_REASON: &str = "Service request failed without error message";
/// Locus error codes that mean the host pin or meeting password is required.
pub const LOCUS_PIN_REQUIRED_CODES: [i64; 5] = [2_423_005, 2_423_006, 2_423_016, 2_423_017, 2_423_018];

// Retry policy
pub const MIN_RETRY_AFTER_SECS: u64 = 60;
pub const MAX_RETRY_AFTER_SECS: u64 = 3600;
pub const MAX_TOKEN_REFRESHES: u32 = 2;

// HTTP
pub const HEADER_CONTENT_TYPE: &str = "Content-Type";
pub const HEADER_USER_AGENT: &str = "User-Agent";
pub const HEADER_WEBEX_USER_AGENT: &str = "Webex-User-Agent";
pub const HEADER_TRACKING_ID: &str = "TrackingID";
pub const HEADER_REQUEST_ID: &str = "X-Request-Id";
pub const HEADER_CATALOG_VERSION: &str = "x-catalog-version2";
pub const CONTENT_TYPE_JSON: &str = "application/json";
pub const CONTENT_TYPE_FORM: &str = "application/x-www-form-urlencoded";
pub const DEFAULT_USER_AGENT: &str = concat!("webex-sdk-rust/", env!("CARGO_PKG_VERSION"));
pub const DEFAULT_TRACKING_ID_PREFIX: &str = "webex-rust-sdk";
pub const DEFAULT_TRUSTED_DOMAINS: [&str; 3] = ["wbx2.com", "ciscospark.com", "webex.com"];
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_MAX_REDIRECTS: usize = 10;

// Device registration
pub const DEVICE_TYPE: &str = "TEAMS_SDK_IOS";
pub const DEFAULT_DEVICE_NAME: &str = "notset";
pub const DEFAULT_COUNTRY_CODE: &str = "US";
pub const DEFAULT_REGION_CODE: &str = "US-WEST";
pub const DEVICE_TTL_SECS: u64 = 180 * 24 * 3600;
pub const LEGACY_DEVICE_PATH_MARKER: &str = "/devices/ios/";

// Conversation tags
pub const TAG_ONE_ON_ONE: &str = "ONE_ON_ONE";
pub const TAG_LOCKED: &str = "LOCKED";

// Conversation activity verbs
pub const VERB_POST: &str = "post";
pub const VERB_SHARE: &str = "share";
pub const VERB_DELETE: &str = "delete";
