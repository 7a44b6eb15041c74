//! Conversation service object model
//!
//! Conversation payloads are graphs of objects discriminated by an
//! `objectType` field. [`ObjectModel`] decodes the known kinds into typed
//! variants and keeps anything else as [`ObjectModel::Other`] so newer server
//! payloads still parse.

use chrono::{DateTime, Utc};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::constants::{TAG_LOCKED, TAG_ONE_ON_ONE};

/// Fields shared by every object kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectBase {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_temp_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published: Option<DateTime<Utc>>,
    /// Encrypted on the wire when the space is encrypted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// Encrypted on the wire when the space is encrypted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

/// `{"items": [...]}` envelope used for nested collections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Items<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
}

impl<T> Default for Items<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

/// Per-space properties of a conversation participant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomProperties {
    #[serde(default, deserialize_with = "string_bool::deserialize")]
    pub is_moderator: Option<bool>,
    #[serde(rename = "lastSeenActivityUUID")]
    pub last_seen_activity_uuid: Option<String>,
    pub last_seen_activity_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonModel {
    #[serde(flatten)]
    pub base: ObjectBase,
    pub email_address: Option<String>,
    #[serde(rename = "entryUUID")]
    pub entry_uuid: Option<String>,
    pub org_id: Option<String>,
    pub room_properties: Option<RoomProperties>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamModel {
    #[serde(flatten)]
    pub base: ObjectBase,
    pub team_color: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileModel {
    #[serde(flatten)]
    pub base: ObjectBase,
    pub mime_type: Option<String>,
    pub file_size: Option<u64>,
    /// Secure content reference for the encrypted blob.
    pub scr: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentModel {
    #[serde(flatten)]
    pub base: ObjectBase,
    pub content_category: Option<String>,
    pub files: Option<Items<FileModel>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationModel {
    #[serde(flatten)]
    pub base: ObjectBase,
    pub locus_url: Option<String>,
    pub default_activity_encryption_key_url: Option<String>,
    pub encryption_key_url: Option<String>,
    pub kms_resource_object_url: Option<String>,
    pub participants: Option<Items<PersonModel>>,
    pub activities: Option<Items<ObjectModel>>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub last_readable_activity_date: Option<DateTime<Utc>>,
    pub last_relevant_activity_date: Option<DateTime<Utc>>,
    pub last_seen_activity_date: Option<DateTime<Utc>>,
}

impl ConversationModel {
    pub fn is_one_on_one(&self) -> bool {
        self.tags.iter().any(|t| t == TAG_ONE_ON_ONE)
    }

    pub fn is_locked(&self) -> bool {
        self.tags.iter().any(|t| t == TAG_LOCKED)
    }

    pub fn participants(&self) -> &[PersonModel] {
        self.participants.as_ref().map_or(&[], |p| p.items.as_slice())
    }
}

/// An object decoded by its `objectType` discriminant.
#[derive(Debug, Clone, PartialEq)]
pub enum ObjectModel {
    Person(PersonModel),
    Team(TeamModel),
    Conversation(ConversationModel),
    Comment(ObjectBase),
    File(FileModel),
    Content(ContentModel),
    GroupMention(ObjectBase),
    /// Any other kind (`activity`, `locus`, `giphy`, ...).
    Other { object_type: String, base: ObjectBase },
}

impl ObjectModel {
    pub fn object_type(&self) -> &str {
        match self {
            Self::Person(_) => "person",
            Self::Team(_) => "team",
            Self::Conversation(_) => "conversation",
            Self::Comment(_) => "comment",
            Self::File(_) => "file",
            Self::Content(_) => "content",
            Self::GroupMention(_) => "groupMention",
            Self::Other { object_type, .. } => object_type,
        }
    }

    pub fn base(&self) -> &ObjectBase {
        match self {
            Self::Person(m) => &m.base,
            Self::Team(m) => &m.base,
            Self::Conversation(m) => &m.base,
            Self::Comment(b) | Self::GroupMention(b) => b,
            Self::File(m) => &m.base,
            Self::Content(m) => &m.base,
            Self::Other { base, .. } => base,
        }
    }

    pub fn base_mut(&mut self) -> &mut ObjectBase {
        match self {
            Self::Person(m) => &mut m.base,
            Self::Team(m) => &mut m.base,
            Self::Conversation(m) => &mut m.base,
            Self::Comment(b) | Self::GroupMention(b) => b,
            Self::File(m) => &mut m.base,
            Self::Content(m) => &mut m.base,
            Self::Other { base, .. } => base,
        }
    }
}

impl<'de> Deserialize<'de> for ObjectModel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        let object_type = value
            .get("objectType")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        let model = match object_type.as_str() {
            "person" => Self::Person(serde_json::from_value(value).map_err(D::Error::custom)?),
            "team" => Self::Team(serde_json::from_value(value).map_err(D::Error::custom)?),
            "conversation" => {
                Self::Conversation(serde_json::from_value(value).map_err(D::Error::custom)?)
            }
            "comment" => Self::Comment(serde_json::from_value(value).map_err(D::Error::custom)?),
            "file" => Self::File(serde_json::from_value(value).map_err(D::Error::custom)?),
            "content" => Self::Content(serde_json::from_value(value).map_err(D::Error::custom)?),
            "groupMention" => {
                Self::GroupMention(serde_json::from_value(value).map_err(D::Error::custom)?)
            }
            _ => Self::Other {
                base: serde_json::from_value(value).map_err(D::Error::custom)?,
                object_type,
            },
        };
        Ok(model)
    }
}

impl Serialize for ObjectModel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::Error as _;

        let mut value = match self {
            Self::Person(m) => serde_json::to_value(m),
            Self::Team(m) => serde_json::to_value(m),
            Self::Conversation(m) => serde_json::to_value(m),
            Self::Comment(b) | Self::GroupMention(b) => serde_json::to_value(b),
            Self::File(m) => serde_json::to_value(m),
            Self::Content(m) => serde_json::to_value(m),
            Self::Other { base, .. } => serde_json::to_value(base),
        }
        .map_err(S::Error::custom)?;

        if let Value::Object(map) = &mut value {
            map.insert("objectType".to_string(), Value::String(self.object_type().to_string()));
        }
        value.serialize(serializer)
    }
}

/// Accepts `true`, `"true"` and `"false"` (any case) for optional booleans.
mod string_bool {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<bool>, D::Error> {
        Ok(match Option::<Value>::deserialize(deserializer)? {
            Some(Value::Bool(b)) => Some(b),
            Some(Value::String(s)) => match s.to_ascii_lowercase().as_str() {
                "true" => Some(true),
                "false" => Some(false),
                _ => None,
            },
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn conversation_json() -> Value {
        serde_json::json!({
            "objectType": "conversation",
            "id": "bbceb1ad-43f1-3b58-9147-f14bb0c4d154",
            "url": "https://conv-a.wbx2.com/conversation/api/v1/conversations/bbceb1ad",
            "displayName": "encrypted-title",
            "encryptionKeyUrl": "kms://kms-cisco.wbx2.com/keys/1",
            "tags": ["ONE_ON_ONE", "MESSAGE_NOTIFICATIONS_ON"],
            "lastReadableActivityDate": "2020-05-01T10:00:00.000Z",
            "lastSeenActivityDate": "2020-05-01T09:00:00.000Z",
            "participants": {"items": [{
                "objectType": "person",
                "id": "p1",
                "entryUUID": "8f8a1d3b-aaaa-bbbb-cccc-000000000001",
                "emailAddress": "bob@example.com",
                "displayName": "Bob",
                "orgId": "org-1",
                "roomProperties": {
                    "isModerator": "true",
                    "lastSeenActivityUUID": "act-9",
                    "lastSeenActivityDate": "2020-05-01T09:00:00.000Z"
                }
            }]},
            "activities": {"items": [{"objectType": "activity", "id": "act-9", "verb": "post"}]}
        })
    }

    #[test]
    fn test_dispatches_on_object_type() {
        let model: ObjectModel = serde_json::from_value(conversation_json()).unwrap();
        let ObjectModel::Conversation(conversation) = &model else {
            panic!("expected conversation, got {model:?}");
        };

        assert!(conversation.is_one_on_one());
        assert!(!conversation.is_locked());
        assert_eq!(conversation.base.display_name.as_deref(), Some("encrypted-title"));

        let person = &conversation.participants()[0];
        assert_eq!(person.entry_uuid.as_deref(), Some("8f8a1d3b-aaaa-bbbb-cccc-000000000001"));
        let properties = person.room_properties.as_ref().unwrap();
        assert_eq!(properties.is_moderator, Some(true));
        assert_eq!(properties.last_seen_activity_uuid.as_deref(), Some("act-9"));

        let activities = &conversation.activities.as_ref().unwrap().items;
        assert_eq!(activities[0].object_type(), "activity");
        assert_eq!(activities[0].base().id.as_deref(), Some("act-9"));
    }

    #[test]
    fn test_unknown_kind_keeps_base_fields() {
        let model: ObjectModel = serde_json::from_value(serde_json::json!({
            "objectType": "microappInstance",
            "id": "x",
            "content": "hello"
        }))
        .unwrap();

        assert_eq!(model.object_type(), "microappInstance");
        assert_eq!(model.base().content.as_deref(), Some("hello"));
    }

    #[test]
    fn test_missing_object_type_is_other() {
        let model: ObjectModel = serde_json::from_value(serde_json::json!({"id": "y"})).unwrap();
        assert!(matches!(model, ObjectModel::Other { ref object_type, .. } if object_type.is_empty()));
    }

    #[test]
    fn test_serialize_writes_discriminant() {
        let model = ObjectModel::Comment(ObjectBase {
            display_name: Some("hi".into()),
            ..ObjectBase::default()
        });
        let json = serde_json::to_value(&model).unwrap();
        assert_eq!(json, serde_json::json!({"objectType": "comment", "displayName": "hi"}));
    }

    #[test]
    fn test_string_bool_variants() {
        let props: RoomProperties =
            serde_json::from_value(serde_json::json!({"isModerator": "FALSE"})).unwrap();
        assert_eq!(props.is_moderator, Some(false));

        let props: RoomProperties =
            serde_json::from_value(serde_json::json!({"isModerator": true})).unwrap();
        assert_eq!(props.is_moderator, Some(true));

        let props: RoomProperties = serde_json::from_value(serde_json::json!({})).unwrap();
        assert_eq!(props.is_moderator, None);
    }
}
