//! Identifier to URL resolution
//!
//! An [`Identifier`] pairs a decoded [`WebexId`] with the conversation-service
//! URL of the resource. The URL depends on the cluster's identityLookup
//! binding in the registered device, so it is cached per device context.

use parking_lot::Mutex;
use webex_domain::{ResourceType, WebexId};

use crate::device::Device;
use crate::endpoints::{Service, ServiceDirectory};

#[derive(Debug, Clone, PartialEq, Eq)]
struct ResolvedUrl {
    /// Device URL the entry was resolved against; `None` without a device.
    context: Option<String>,
    url: String,
    pinned: bool,
}

#[derive(Debug)]
pub struct Identifier {
    id: WebexId,
    resolved: Mutex<Option<ResolvedUrl>>,
}

impl Identifier {
    pub fn new(id: WebexId) -> Self {
        Self { id, resolved: Mutex::new(None) }
    }

    /// Identifier with a known URL that is never recomputed.
    pub fn with_url(id: WebexId, url: impl Into<String>) -> Self {
        let resolved = ResolvedUrl { context: None, url: url.into(), pinned: true };
        Self { id, resolved: Mutex::new(Some(resolved)) }
    }

    /// Decodes a portable token; `None` for malformed tokens.
    pub fn decode(token: &str) -> Option<Self> {
        WebexId::decode(token).map(Self::new)
    }

    pub const fn id(&self) -> &WebexId {
        &self.id
    }

    /// Relative path of the resource collection in the conversation service.
    pub const fn path_template(resource_type: ResourceType) -> Option<&'static str> {
        match resource_type {
            ResourceType::Room => Some("conversations"),
            ResourceType::Message => Some("activities"),
            ResourceType::Team => Some("teams"),
            _ => None,
        }
    }

    /// Resolves `{base}/{path}/{uuid}` for the given device context.
    pub fn url(&self, device: Option<&Device>, directory: &ServiceDirectory) -> Option<String> {
        let path = Self::path_template(self.id.resource_type())?;
        let context = device.map(|device| device.device_url().to_string());

        let mut resolved = self.resolved.lock();
        if let Some(entry) = resolved.as_ref() {
            if entry.pinned || entry.context == context {
                return Some(entry.url.clone());
            }
        }

        let base = device
            .and_then(|device| device.identity_cluster_url(self.id.cluster()))
            .map(str::to_string)
            .unwrap_or_else(|| directory.global_url(Service::Conv));
        let url = format!("{}/{path}/{}", base.trim_end_matches('/'), self.id.uuid());

        tracing::trace!(cluster = self.id.cluster(), %url, "resolved identifier url");
        *resolved = Some(ResolvedUrl { context, url: url.clone(), pinned: false });
        Some(url)
    }

    fn cached_url(&self) -> Option<String> {
        self.resolved.lock().as_ref().map(|entry| entry.url.clone())
    }
}

impl Clone for Identifier {
    fn clone(&self) -> Self {
        Self { id: self.id.clone(), resolved: Mutex::new(self.resolved.lock().clone()) }
    }
}

impl PartialEq for Identifier {
    fn eq(&self, other: &Self) -> bool {
        if std::ptr::eq(self, other) {
            return true;
        }
        match (self.cached_url(), other.cached_url()) {
            (Some(left), Some(right)) => left == right,
            _ => self.id == other.id,
        }
    }
}

impl From<WebexId> for Identifier {
    fn from(id: WebexId) -> Self {
        Self::new(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::test_support::device_with_clusters;

    const CLUSTER: &str = "urn:TEAM:us-west-2_r";

    fn room(cluster: Option<&str>) -> Identifier {
        Identifier::new(WebexId::new(ResourceType::Room, cluster, "bbceb1ad-43f1-3b58-9147-f14bb0c4d154"))
    }

    #[test]
    fn test_resolves_against_cluster_binding() {
        let device = device_with_clusters(&[(
            "urn:TEAM:us-west-2_r:identityLookup",
            "https://conv-r.wbx2.com/conversation/api/v1",
        )]);
        let url = room(Some(CLUSTER)).url(Some(&device), &ServiceDirectory::default());
        assert_eq!(
            url.as_deref(),
            Some("https://conv-r.wbx2.com/conversation/api/v1/conversations/bbceb1ad-43f1-3b58-9147-f14bb0c4d154")
        );
    }

    #[test]
    fn test_falls_back_to_global_conversation_url() {
        let url = room(None).url(None, &ServiceDirectory::default());
        assert_eq!(
            url.as_deref(),
            Some("https://conv-a.wbx2.com/conversation/api/v1/conversations/bbceb1ad-43f1-3b58-9147-f14bb0c4d154")
        );
    }

    #[test]
    fn test_message_and_team_paths() {
        let directory = ServiceDirectory::default();
        let message = Identifier::new(WebexId::new(ResourceType::Message, None, "m1"));
        let team = Identifier::new(WebexId::new(ResourceType::Team, None, "t1"));
        assert!(message.url(None, &directory).unwrap().ends_with("/activities/m1"));
        assert!(team.url(None, &directory).unwrap().ends_with("/teams/t1"));
    }

    #[test]
    fn test_unsupported_type_is_unresolvable() {
        let person = Identifier::new(WebexId::new(ResourceType::People, None, "p1"));
        assert_eq!(person.url(None, &ServiceDirectory::default()), None);
    }

    #[test]
    fn test_cache_is_keyed_by_device_context() {
        let identifier = room(Some(CLUSTER));
        let directory = ServiceDirectory::default();

        let without_device = identifier.url(None, &directory).unwrap();
        assert!(without_device.starts_with("https://conv-a.wbx2.com"));

        let device = device_with_clusters(&[(
            "urn:TEAM:us-west-2_r:identityLookup",
            "https://conv-r.wbx2.com/conversation/api/v1",
        )]);
        let with_device = identifier.url(Some(&device), &directory).unwrap();
        assert!(with_device.starts_with("https://conv-r.wbx2.com"));
    }

    #[test]
    fn test_pinned_url_is_kept() {
        let identifier = Identifier::with_url(
            WebexId::new(ResourceType::Room, None, "r1"),
            "https://conv-z.wbx2.com/conversation/api/v1/conversations/r1",
        );
        assert_eq!(
            identifier.url(None, &ServiceDirectory::default()).as_deref(),
            Some("https://conv-z.wbx2.com/conversation/api/v1/conversations/r1")
        );
    }

    #[test]
    fn test_equality_prefers_urls() {
        let id = WebexId::new(ResourceType::Room, None, "r1");
        let a = Identifier::with_url(id.clone(), "https://a/conversations/r1");
        let b = Identifier::with_url(id.clone(), "https://b/conversations/r1");
        assert_ne!(a, b);
        assert_eq!(Identifier::new(id.clone()), a);
        assert_eq!(Identifier::new(id), Identifier::decode(&a.id().encode()).unwrap());
    }
}
