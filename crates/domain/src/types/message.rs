//! Message types
//!
//! Messages live in the conversation service as activities. An
//! [`ActivityModel`] is the wire form; [`Message`] is the public view with
//! hydra-format ids.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::{VERB_POST, VERB_SHARE};
use crate::types::object_model::{ConversationModel, ObjectModel, PersonModel};
use crate::types::space::SpaceType;
use crate::types::webex_id::{ResourceType, WebexId};

/// A conversation activity: `actor` did `verb` to `object` in `target`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityModel {
    pub id: Option<String>,
    pub verb: Option<String>,
    pub published: Option<DateTime<Utc>>,
    pub client_temp_id: Option<String>,
    pub encryption_key_url: Option<String>,
    pub actor: Option<PersonModel>,
    pub object: Option<ObjectModel>,
    pub target: Option<ObjectModel>,
}

impl ActivityModel {
    /// True for activities that surface as messages.
    pub fn is_message(&self) -> bool {
        matches!(self.verb.as_deref(), Some(VERB_POST | VERB_SHARE))
    }

    /// The conversation the activity belongs to, when the target is one.
    pub fn conversation(&self) -> Option<&ConversationModel> {
        match self.target.as_ref() {
            Some(ObjectModel::Conversation(conversation)) => Some(conversation),
            _ => None,
        }
    }

    /// Raw uuid of the target conversation.
    pub fn conversation_uuid(&self) -> Option<&str> {
        self.conversation().and_then(|conversation| conversation.base.id.as_deref())
    }
}

/// A message posted to a space.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: Option<String>,
    pub space_id: Option<String>,
    pub space_type: Option<SpaceType>,
    pub person_id: Option<String>,
    pub person_email: Option<String>,
    /// Plain text.
    pub text: Option<String>,
    /// Rich text, when the sender supplied one.
    pub html: Option<String>,
    pub created: Option<DateTime<Utc>>,
}

impl From<&ActivityModel> for Message {
    fn from(activity: &ActivityModel) -> Self {
        let hydra = |uuid: &str, resource_type| WebexId::hydra_format(uuid, resource_type, None);
        let conversation = activity.conversation();
        let object = activity.object.as_ref().map(ObjectModel::base);

        Self {
            id: activity.id.as_deref().map(|uuid| hydra(uuid, ResourceType::Message)),
            space_id: activity.conversation_uuid().map(|uuid| hydra(uuid, ResourceType::Room)),
            space_type: conversation.map(|conversation| {
                if conversation.is_one_on_one() {
                    SpaceType::Direct
                } else {
                    SpaceType::Group
                }
            }),
            person_id: activity
                .actor
                .as_ref()
                .and_then(|actor| actor.entry_uuid.as_deref())
                .map(|uuid| hydra(uuid, ResourceType::People)),
            person_email: activity.actor.as_ref().and_then(|actor| actor.email_address.clone()),
            text: object.and_then(|base| base.display_name.clone()),
            html: object.and_then(|base| base.content.clone()),
            created: activity.published,
        }
    }
}
