//! Domain clients
//!
//! Thin wrappers that turn domain calls into service requests. They share
//! one [`ClientContext`]: the HTTP session, the authenticator and the slot
//! holding the registered device.

pub mod device;
pub mod membership;
pub mod message;
pub mod space;

use std::sync::Arc;

use parking_lot::RwLock;
use webex_core::{Authenticator, Device, Identifier, Service};
use webex_domain::{ResourceType, Result, WebexError, WebexId};

use crate::http::{HttpSession, RequestParameter, ServiceRequestBuilder};

pub use device::DeviceClient;
pub use membership::{MembershipClient, MembershipTarget};
pub use message::{Before, ConversationKey, MessageClient};
pub use space::SpaceClient;

/// Shared state behind every client of one SDK instance.
#[derive(Clone)]
pub struct ClientContext {
    pub session: Arc<HttpSession>,
    pub authenticator: Arc<dyn Authenticator>,
    pub device: Arc<RwLock<Option<Device>>>,
}

impl ClientContext {
    pub fn new(session: Arc<HttpSession>, authenticator: Arc<dyn Authenticator>) -> Self {
        Self { session, authenticator, device: Arc::new(RwLock::new(None)) }
    }

    pub fn current_device(&self) -> Option<Device> {
        self.device.read().clone()
    }

    /// Authenticated request against the device's URL for `service`.
    pub fn homed(&self, service: Service) -> ServiceRequestBuilder {
        let device = self.device.read();
        ServiceRequestBuilder::homed(&self.session, service, device.as_ref())
            .authenticator(Arc::clone(&self.authenticator))
    }

    /// Authenticated request against an absolute URL.
    pub fn endpoint(&self, url: &str) -> ServiceRequestBuilder {
        ServiceRequestBuilder::endpoint(&self.session, url)
            .authenticator(Arc::clone(&self.authenticator))
    }

    /// Conversation-service URL for a public room id.
    ///
    /// # Errors
    /// [`WebexError::IllegalOperation`] when the id does not decode to a room
    /// or cannot be resolved.
    pub fn conversation_url(&self, space_id: &str) -> Result<(WebexId, String)> {
        self.resolve(space_id, ResourceType::Room, "space")
    }

    /// Conversation-service URL of the activity behind a public message id.
    ///
    /// # Errors
    /// [`WebexError::IllegalOperation`] when the id is not a message id.
    pub fn activity_url(&self, message_id: &str) -> Result<(WebexId, String)> {
        self.resolve(message_id, ResourceType::Message, "message")
    }

    fn resolve(&self, token: &str, resource_type: ResourceType, label: &str) -> Result<(WebexId, String)> {
        let unresolvable = || WebexError::IllegalOperation(format!("Cannot resolve {label} id {token}"));

        let id = WebexId::decode(token)
            .filter(|id| id.belongs_to(resource_type))
            .ok_or_else(unresolvable)?;
        let identifier = Identifier::new(id.clone());
        let device = self.device.read();
        let url = identifier
            .url(device.as_ref(), self.session.directory())
            .ok_or_else(unresolvable)?;
        Ok((id, url))
    }
}

/// Query shared by the conversation read-status lookups.
pub(crate) fn read_status_query() -> RequestParameter {
    RequestParameter::new()
        .with("uuidEntryFormat", true)
        .with("personRefresh", true)
        .with("activitiesLimit", 0)
}
