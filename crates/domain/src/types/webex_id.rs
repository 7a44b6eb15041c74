//! Portable resource identifiers
//!
//! Public Webex ids are opaque base64 tokens wrapping
//! `ciscospark://{cluster}/{TYPE}/{uuid}`. [`WebexId`] is the structured
//! form. Two ids are equal when their uuids are equal; cluster and type do
//! not take part in identity.

use std::fmt;
use std::hash::{Hash, Hasher};

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_CLUSTER, DEFAULT_CLUSTER_ID, WEBEX_ID_SCHEME};
use crate::impl_wire_name_conversions;

/// Kind of resource an identifier points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceType {
    Room,
    People,
    Message,
    Membership,
    Organization,
    Content,
    Team,
    Unknown,
}

impl_wire_name_conversions!(ResourceType {
    Room => "room",
    People => "people",
    Message => "message",
    Membership => "membership",
    Organization => "organization",
    Content => "content",
    Team => "team",
    Unknown => "unknown",
});

impl ResourceType {
    /// Uppercase form used inside encoded tokens.
    pub fn token_name(&self) -> String {
        self.as_str().to_ascii_uppercase()
    }
}

/// Structured resource identifier.
#[derive(Debug, Clone)]
pub struct WebexId {
    resource_type: ResourceType,
    cluster: String,
    uuid: String,
}

impl WebexId {
    /// Builds an id; a missing, empty or short default cluster collapses to
    /// [`DEFAULT_CLUSTER`].
    pub fn new(resource_type: ResourceType, cluster: Option<&str>, uuid: impl Into<String>) -> Self {
        let cluster = match cluster {
            None => DEFAULT_CLUSTER,
            Some(c) if c.is_empty() || c == DEFAULT_CLUSTER_ID => DEFAULT_CLUSTER,
            Some(c) => c,
        };
        Self { resource_type, cluster: cluster.to_string(), uuid: uuid.into() }
    }

    /// Parses an encoded token.
    ///
    /// Only the last three `/`-separated segments of the decoded text are
    /// read, so any scheme prefix is accepted. Returns `None` when the token
    /// is not base64, not UTF-8, has fewer than three segments or names an
    /// unknown type.
    pub fn decode(token: &str) -> Option<Self> {
        let mut padded = token.trim().to_string();
        while padded.len() % 4 != 0 {
            padded.push('=');
        }
        let bytes = BASE64.decode(padded.as_bytes()).ok()?;
        let decoded = String::from_utf8(bytes).ok()?;

        let segments: Vec<&str> = decoded.split('/').collect();
        if segments.len() < 3 {
            return None;
        }
        let tail = &segments[segments.len() - 3..];
        let resource_type = tail[1].parse::<ResourceType>().ok()?;
        Some(Self::new(resource_type, Some(tail[0]), tail[2]))
    }

    /// Encodes to the portable token form, with base64 padding stripped.
    pub fn encode(&self) -> String {
        let raw = format!(
            "{WEBEX_ID_SCHEME}://{}/{}/{}",
            self.cluster_id(),
            self.resource_type.token_name(),
            self.uuid
        );
        BASE64.encode(raw.as_bytes()).trim_end_matches('=').to_string()
    }

    /// Returns the uuid inside `token`, or `token` itself when it does not
    /// decode.
    pub fn uuid_of(token: &str) -> String {
        Self::decode(token).map_or_else(|| token.to_string(), |id| id.uuid)
    }

    /// Encodes a raw uuid as a public id of the given type.
    pub fn hydra_format(uuid: &str, resource_type: ResourceType, cluster: Option<&str>) -> String {
        Self::new(resource_type, cluster, uuid).encode()
    }

    pub const fn resource_type(&self) -> ResourceType {
        self.resource_type
    }

    /// Full cluster name, e.g. `urn:TEAM:us-east-2_a`.
    pub fn cluster(&self) -> &str {
        &self.cluster
    }

    /// Cluster as written inside tokens: the default cluster shortens to `us`.
    pub fn cluster_id(&self) -> &str {
        if self.cluster == DEFAULT_CLUSTER {
            DEFAULT_CLUSTER_ID
        } else {
            &self.cluster
        }
    }

    pub fn uuid(&self) -> &str {
        &self.uuid
    }

    pub fn belongs_to(&self, resource_type: ResourceType) -> bool {
        self.resource_type == resource_type
    }
}

impl PartialEq for WebexId {
    fn eq(&self, other: &Self) -> bool {
        self.uuid == other.uuid
    }
}

impl Eq for WebexId {}

impl Hash for WebexId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.uuid.hash(state);
    }
}

impl fmt::Display for WebexId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}
