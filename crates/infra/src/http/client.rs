//! Shared HTTP session
//!
//! One [`HttpSession`] backs every request of an SDK instance. The reqwest
//! client is built on first use and never mutated afterwards, so the session
//! can be shared through `Arc` across tasks.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use once_cell::sync::OnceCell;
use reqwest::redirect::Policy;
use reqwest::Client as ReqwestClient;
use url::Url;
use webex_common::{Sleeper, TokioSleeper};
use webex_core::ServiceDirectory;
use webex_domain::constants::{
    DEFAULT_HTTP_TIMEOUT_SECS, DEFAULT_MAX_REDIRECTS, DEFAULT_TRACKING_ID_PREFIX,
    DEFAULT_USER_AGENT,
};
use webex_domain::{Result, SdkConfig, TrustedDomains, WebexError};

use crate::errors::InfraError;

/// Connection pool, routing table and header policy for one SDK instance.
pub struct HttpSession {
    client: OnceCell<ReqwestClient>,
    timeout: Duration,
    user_agent: String,
    max_redirects: usize,
    trusted_domains: TrustedDomains,
    tracking_id_prefix: String,
    tracking_base: String,
    tracking_seq: AtomicU64,
    directory: ServiceDirectory,
    sleeper: Arc<dyn Sleeper>,
}

impl std::fmt::Debug for HttpSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpSession")
            .field("timeout", &self.timeout)
            .field("user_agent", &self.user_agent)
            .field("max_redirects", &self.max_redirects)
            .field("trusted_domains", &self.trusted_domains)
            .field("directory", &self.directory)
            .field("initialized", &self.client.get().is_some())
            .finish_non_exhaustive()
    }
}

impl HttpSession {
    /// Start building a new session.
    pub fn builder() -> HttpSessionBuilder {
        HttpSessionBuilder::default()
    }

    /// Session configured from the SDK config.
    pub fn from_config(config: &SdkConfig) -> Self {
        Self::builder().config(config).build()
    }

    /// The underlying reqwest client, built on first call.
    ///
    /// Redirects are disabled here; the executor follows them itself so it
    /// can apply the header policy per hop.
    pub fn client(&self) -> Result<&ReqwestClient> {
        self.client.get_or_try_init(|| {
            tracing::debug!(timeout_ms = self.timeout.as_millis() as u64, "building HTTP client");
            ReqwestClient::builder()
                .timeout(self.timeout)
                .redirect(Policy::none())
                .user_agent(self.user_agent.clone())
                .no_proxy()
                .build().map_err(|err| WebexError::from(InfraError::from(err)))
        })
    }

    pub fn directory(&self) -> &ServiceDirectory {
        &self.directory
    }

    pub fn trusted_domains(&self) -> &TrustedDomains {
        &self.trusted_domains
    }

    /// True when the URL's host may receive tracking headers.
    pub fn is_trusted(&self, url: &Url) -> bool {
        url.host_str().is_some_and(|host| self.trusted_domains.contains_host(host))
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    pub const fn max_redirects(&self) -> usize {
        self.max_redirects
    }

    pub fn sleeper(&self) -> &dyn Sleeper {
        self.sleeper.as_ref()
    }

    /// Next `TrackingID` value: `{prefix}_{session uuid}_{sequence}`.
    pub fn next_tracking_id(&self) -> String {
        let seq = self.tracking_seq.fetch_add(1, Ordering::Relaxed);
        format!("{}_{}_{seq}", self.tracking_id_prefix, self.tracking_base)
    }
}

/// Builder for [`HttpSession`].
#[derive(Debug)]
pub struct HttpSessionBuilder {
    timeout: Duration,
    user_agent: String,
    max_redirects: usize,
    trusted_domains: TrustedDomains,
    tracking_id_prefix: String,
    directory: ServiceDirectory,
    sleeper: Option<Arc<dyn Sleeper>>,
}

impl Default for HttpSessionBuilder {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            max_redirects: DEFAULT_MAX_REDIRECTS,
            trusted_domains: TrustedDomains::default(),
            tracking_id_prefix: DEFAULT_TRACKING_ID_PREFIX.to_string(),
            directory: ServiceDirectory::default(),
            sleeper: None,
        }
    }
}

impl HttpSessionBuilder {
    /// Apply every setting carried by the SDK config.
    pub fn config(mut self, config: &SdkConfig) -> Self {
        self.timeout = config.http.timeout();
        self.user_agent = config.http.user_agent.clone();
        self.max_redirects = config.http.max_redirects;
        self.trusted_domains = config.trusted_domains.clone();
        self.tracking_id_prefix = config.tracking_id_prefix.clone();
        self.directory = ServiceDirectory::from_config(config);
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = agent.into();
        self
    }

    pub fn max_redirects(mut self, hops: usize) -> Self {
        self.max_redirects = hops;
        self
    }

    pub fn trusted_domains(mut self, domains: TrustedDomains) -> Self {
        self.trusted_domains = domains;
        self
    }

    pub fn directory(mut self, directory: ServiceDirectory) -> Self {
        self.directory = directory;
        self
    }

    /// Sleeper used for 429 back-off; defaults to the tokio timer.
    pub fn sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = Some(sleeper);
        self
    }

    pub fn build(self) -> HttpSession {
        HttpSession {
            client: OnceCell::new(),
            timeout: self.timeout,
            user_agent: self.user_agent,
            max_redirects: self.max_redirects,
            trusted_domains: self.trusted_domains,
            tracking_id_prefix: self.tracking_id_prefix,
            tracking_base: uuid::Uuid::new_v4().to_string(),
            tracking_seq: AtomicU64::new(0),
            directory: self.directory,
            sleeper: self.sleeper.unwrap_or_else(|| Arc::new(TokioSleeper)),
        }
    }
}
