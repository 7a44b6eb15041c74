//! Membership types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A person's relationship to a space.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "MembershipWire")]
pub struct Membership {
    pub id: Option<String>,
    pub person_id: Option<String>,
    pub person_email: Option<String>,
    pub person_display_name: Option<String>,
    pub person_org_id: Option<String>,
    pub space_id: Option<String>,
    pub is_moderator: Option<bool>,
    pub is_monitor: Option<bool>,
    pub created: Option<DateTime<Utc>>,
}

/// Wire shape; older payloads only carry `roomId`.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct MembershipWire {
    id: Option<String>,
    person_id: Option<String>,
    person_email: Option<String>,
    person_display_name: Option<String>,
    person_org_id: Option<String>,
    space_id: Option<String>,
    room_id: Option<String>,
    is_moderator: Option<bool>,
    is_monitor: Option<bool>,
    created: Option<DateTime<Utc>>,
}

impl From<MembershipWire> for Membership {
    fn from(wire: MembershipWire) -> Self {
        Self {
            id: wire.id,
            person_id: wire.person_id,
            person_email: wire.person_email,
            person_display_name: wire.person_display_name,
            person_org_id: wire.person_org_id,
            space_id: wire.space_id.or(wire.room_id),
            is_moderator: wire.is_moderator,
            is_monitor: wire.is_monitor,
            created: wire.created,
        }
    }
}

/// Membership plus the last message the member has seen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MembershipReadStatus {
    pub member: Membership,
    pub last_seen_id: Option<String>,
    pub last_seen_date: Option<DateTime<Utc>>,
}
