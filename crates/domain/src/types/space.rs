//! Space types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::impl_wire_name_conversions;

/// Kind of space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpaceType {
    /// One-to-one space between two people.
    Direct,
    Group,
}

impl_wire_name_conversions!(SpaceType {
    Direct => "direct",
    Group => "group",
});

/// Ordering for space listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpaceSortType {
    Id,
    LastActivity,
    Created,
}

impl_wire_name_conversions!(SpaceSortType {
    Id => "id",
    LastActivity => "lastactivity",
    Created => "created",
});

/// A persistent conversation container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Space {
    pub id: Option<String>,
    pub title: Option<String>,
    #[serde(rename = "type")]
    pub space_type: Option<SpaceType>,
    pub is_locked: Option<bool>,
    pub last_activity: Option<DateTime<Utc>>,
    pub created: Option<DateTime<Utc>>,
    pub team_id: Option<String>,
    pub sip_address: Option<String>,
}

/// Read status of a space for the current user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpaceReadStatus {
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub space_type: Option<SpaceType>,
    pub last_activity_date: Option<DateTime<Utc>>,
    pub last_seen_activity_date: Option<DateTime<Utc>>,
}

impl SpaceReadStatus {
    /// True when activity happened after the user last looked.
    pub fn has_unread(&self) -> bool {
        match (self.last_activity_date, self.last_seen_activity_date) {
            (Some(activity), Some(seen)) => activity > seen,
            (Some(_), None) => true,
            _ => false,
        }
    }
}
