//! Entry point wiring the session, clients and device registration.

use std::sync::Arc;

use parking_lot::RwLock;
use webex_common::time::Sleeper;
use webex_core::{Authenticator, ContentCipher, Device, DeviceStore};
use webex_domain::SdkConfig;

use crate::clients::{ClientContext, MembershipClient, MessageClient, SpaceClient};
use crate::crypto::AesContentCipher;
use crate::device::{DeviceService, InMemoryDeviceStore};
use crate::http::HttpSession;

/// One SDK instance bound to a single user's credentials.
pub struct Webex {
    context: ClientContext,
    spaces: SpaceClient,
    memberships: MembershipClient,
    messages: MessageClient,
    devices: DeviceService,
}

impl Webex {
    /// Instance with an in-memory device store.
    pub fn new(config: &SdkConfig, authenticator: Arc<dyn Authenticator>) -> Self {
        Self::builder(config.clone(), authenticator).build()
    }

    pub fn builder(config: SdkConfig, authenticator: Arc<dyn Authenticator>) -> WebexBuilder {
        WebexBuilder { config, authenticator, store: None, sleeper: None, cipher: None }
    }

    pub fn spaces(&self) -> &SpaceClient {
        &self.spaces
    }

    pub fn memberships(&self) -> &MembershipClient {
        &self.memberships
    }

    pub fn messages(&self) -> &MessageClient {
        &self.messages
    }

    pub fn devices(&self) -> &DeviceService {
        &self.devices
    }

    pub fn session(&self) -> &Arc<HttpSession> {
        &self.context.session
    }

    pub fn context(&self) -> &ClientContext {
        &self.context
    }

    /// Registered device, if any.
    pub fn device(&self) -> Option<Device> {
        self.context.current_device()
    }

    pub fn device_slot(&self) -> &Arc<RwLock<Option<Device>>> {
        &self.context.device
    }
}

pub struct WebexBuilder {
    config: SdkConfig,
    authenticator: Arc<dyn Authenticator>,
    store: Option<Arc<dyn DeviceStore>>,
    sleeper: Option<Arc<dyn Sleeper>>,
    cipher: Option<Arc<dyn ContentCipher>>,
}

impl WebexBuilder {
    /// Persist device registration across runs.
    #[must_use]
    pub fn device_store(mut self, store: Arc<dyn DeviceStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Sleeper used for rate-limit waits.
    #[must_use]
    pub fn sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = Some(sleeper);
        self
    }

    /// Cipher for message text; defaults to AES-GCM with base64 keys.
    #[must_use]
    pub fn content_cipher(mut self, cipher: Arc<dyn ContentCipher>) -> Self {
        self.cipher = Some(cipher);
        self
    }

    pub fn build(self) -> Webex {
        let mut session = HttpSession::builder().config(&self.config);
        if let Some(sleeper) = self.sleeper {
            session = session.sleeper(sleeper);
        }
        let context = ClientContext::new(Arc::new(session.build()), self.authenticator);
        let store = self.store.unwrap_or_else(|| Arc::new(InMemoryDeviceStore::new()));
        let cipher = self.cipher.unwrap_or_else(|| Arc::new(AesContentCipher::default()));

        tracing::debug!(environment = %self.config.environment, "Webex instance created");

        Webex {
            spaces: SpaceClient::new(context.clone()),
            memberships: MembershipClient::new(context.clone()),
            messages: MessageClient::new(context.clone(), cipher),
            devices: DeviceService::new(context.clone(), store),
            context,
        }
    }
}
