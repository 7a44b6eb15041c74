//! Shared fixtures for the infra integration tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use webex_common::testing::RecordingSleeper;
use webex_core::Authenticator;
use webex_domain::{ResourceType, SdkConfig, TrustedDomains, WebexId};
use webex_infra::http::HttpSession;
use webex_infra::Webex;
use wiremock::MockServer;

pub const SPACE_UUID: &str = "bbceb1ad-43f1-3b58-9147-f14bb0c4d154";

/// Authenticator that serves a fixed token and a scripted list of refresh
/// results, counting every call.
#[derive(Debug, Default)]
pub struct MockAuthenticator {
    token: Option<String>,
    refreshes: Mutex<VecDeque<Option<String>>>,
    access_calls: AtomicUsize,
    refresh_calls: AtomicUsize,
}

impl MockAuthenticator {
    pub fn new(token: &str) -> Self {
        Self { token: Some(token.to_string()), ..Self::default() }
    }

    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Results handed out by successive `refresh_token` calls; once they run
    /// out, refreshes return `None`.
    pub fn with_refreshes<I: IntoIterator<Item = Option<&'static str>>>(self, refreshes: I) -> Self {
        *self.refreshes.lock() = refreshes.into_iter().map(|t| t.map(str::to_string)).collect();
        self
    }

    pub fn access_calls(&self) -> usize {
        self.access_calls.load(Ordering::SeqCst)
    }

    pub fn refresh_calls(&self) -> usize {
        self.refresh_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Authenticator for MockAuthenticator {
    async fn access_token(&self) -> Option<String> {
        self.access_calls.fetch_add(1, Ordering::SeqCst);
        self.token.clone()
    }

    async fn refresh_token(&self) -> Option<String> {
        self.refresh_calls.fetch_add(1, Ordering::SeqCst);
        self.refreshes.lock().pop_front().flatten()
    }
}

/// Config routing every service to the mock server, with the loopback
/// address trusted for tracking headers.
pub fn config_for(server: &MockServer) -> SdkConfig {
    let base = server.uri();
    SdkConfig {
        trusted_domains: TrustedDomains::new(["127.0.0.1"]),
        ..SdkConfig::default()
    }
    .with_endpoint("hydra", format!("{base}/v1"))
    .with_endpoint("region", format!("{base}/region-svc"))
    .with_endpoint("u2c", format!("{base}/u2c/api/v1"))
    .with_endpoint("wdm", format!("{base}/wdm/api/v1"))
    .with_endpoint("conversation", format!("{base}/conversation/api/v1"))
}

pub fn session_for(server: &MockServer, sleeper: &RecordingSleeper) -> Arc<HttpSession> {
    Arc::new(HttpSession::builder().config(&config_for(server)).sleeper(Arc::new(sleeper.clone())).build())
}

pub fn webex_for(server: &MockServer, authenticator: Arc<MockAuthenticator>) -> Webex {
    Webex::builder(config_for(server), authenticator).sleeper(Arc::new(RecordingSleeper::new())).build()
}

pub fn space_id() -> String {
    WebexId::hydra_format(SPACE_UUID, ResourceType::Room, None)
}
