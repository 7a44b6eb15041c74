//! Message client (conversation service `activities`)
//!
//! Messages are read and written as conversation activities. Their text is
//! encrypted with the space key; callers hand in the key material obtained
//! from KMS and the configured [`ContentCipher`] applies it.

use std::sync::Arc;

use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::Method;
use serde_json::{json, Value};
use tracing::{debug, instrument};
use webex_core::{decrypt_activity, encrypt_object, ContentCipher, Service};
use webex_domain::constants::{VERB_DELETE, VERB_POST};
use webex_domain::{
    ActivityModel, Message, ObjectBase, ObjectModel, ResourceType, Result, WebexError, WebexId,
};

use super::ClientContext;
use crate::http::{RequestParameter, ServiceRequestBuilder};

/// Key of an encrypted space.
#[derive(Clone, PartialEq, Eq)]
pub struct ConversationKey {
    /// KMS URL of the key; sent along with new activities.
    pub url: String,
    /// Key material for the cipher.
    pub material: String,
}

impl std::fmt::Debug for ConversationKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConversationKey").field("url", &self.url).finish_non_exhaustive()
    }
}

/// Upper bound of a listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Before {
    Date(DateTime<Utc>),
    /// Only messages older than this message id.
    Message(String),
}

pub struct MessageClient {
    context: ClientContext,
    cipher: Arc<dyn ContentCipher>,
}

impl MessageClient {
    pub fn new(context: ClientContext, cipher: Arc<dyn ContentCipher>) -> Self {
        Self { context, cipher }
    }

    fn activities(&self) -> ServiceRequestBuilder {
        self.context.homed(Service::Conv).path("activities")
    }

    /// Lists up to `max` messages of a space, newest first.
    ///
    /// Activities that are not posts or shares are skipped, so this pages
    /// backwards until `max` messages are found or the history runs out.
    #[instrument(skip(self, key))]
    pub async fn list(
        &self,
        space_id: &str,
        before: Option<Before>,
        max: usize,
        key: Option<&ConversationKey>,
    ) -> Result<Vec<Message>> {
        if max == 0 {
            return Ok(Vec::new());
        }
        let space_uuid = room_uuid(space_id)?;

        let mut upper = match before {
            Some(Before::Date(date)) => Some(date),
            Some(Before::Message(message_id)) => self.fetch_activity(&message_id).await?.1.published,
            None => None,
        };

        let mut messages: Vec<ActivityModel> = Vec::new();
        loop {
            let max_date = upper.unwrap_or_else(Utc::now);
            let page: Vec<ActivityModel> = self
                .activities()
                .query(
                    RequestParameter::new()
                        .with("conversationId", space_uuid.as_str())
                        .with("limit", max)
                        .with("maxDate", max_date.to_rfc3339_opts(SecondsFormat::Millis, true)),
                )
                .key_path("items")
                .build()?
                .response_array()
                .await
                .into_result()?;

            let exhausted = page.len() < max;
            let oldest = page.last().and_then(|activity| activity.published);
            messages.extend(page.into_iter().filter(ActivityModel::is_message));
            if messages.len() >= max || exhausted {
                break;
            }
            match oldest {
                Some(date) if date < max_date => upper = Some(date),
                _ => break,
            }
        }

        debug!(count = messages.len().min(max), "listed messages");
        Ok(messages.iter().take(max).map(|activity| self.to_message(activity, key)).collect())
    }

    #[instrument(skip(self, key))]
    pub async fn get(&self, message_id: &str, key: Option<&ConversationKey>) -> Result<Message> {
        let (_, activity) = self.fetch_activity(message_id).await?;
        Ok(self.to_message(&activity, key))
    }

    /// Posts a message to a space, encrypted when a key is given.
    ///
    /// # Errors
    /// `IllegalOperation` when the text cannot be encrypted with `key`; the
    /// message is never sent in clear text alongside a key URL.
    #[instrument(skip(self, text, html, key))]
    pub async fn post(
        &self,
        space_id: &str,
        text: &str,
        html: Option<&str>,
        key: Option<&ConversationKey>,
    ) -> Result<Message> {
        let space_uuid = room_uuid(space_id)?;
        let comment = ObjectModel::Comment(ObjectBase {
            display_name: Some(text.to_string()),
            content: html.map(str::to_string),
            ..ObjectBase::default()
        });
        let object = encrypt_object(&comment, key.map(|key| key.material.as_str()), self.cipher.as_ref());
        if key.is_some() && object == comment {
            return Err(WebexError::IllegalOperation("Cannot encrypt message with the space key".into()));
        }

        let body = RequestParameter::new()
            .with("verb", VERB_POST)
            .with("object", serde_json::to_value(&object)?)
            .with("target", conversation_target(&space_uuid))
            .with("clientTempId", uuid::Uuid::new_v4().to_string())
            .with("encryptionKeyUrl", key.map(|key| key.url.as_str()));

        let activity: ActivityModel = self
            .activities()
            .method(Method::POST)
            .body(body)
            .build()?
            .response_object()
            .await
            .into_result()?;
        Ok(self.to_message(&activity, key))
    }

    /// Deletes a message by posting a `delete` activity to its space.
    #[instrument(skip(self))]
    pub async fn delete(&self, message_id: &str) -> Result<()> {
        let (id, activity) = self.fetch_activity(message_id).await?;
        let space_uuid = activity
            .conversation_uuid()
            .ok_or_else(|| WebexError::service_failed("Cannot find the space of the message"))?;

        let body = RequestParameter::new()
            .with("verb", VERB_DELETE)
            .with("object", json!({"id": id.uuid(), "objectType": "activity"}))
            .with("target", conversation_target(space_uuid));

        self.activities()
            .method(Method::POST)
            .body(body)
            .build()?
            .response_json()
            .await
            .into_result()
            .map(|_| ())
    }

    /// Loads the activity behind a message id through its identifier URL.
    async fn fetch_activity(&self, message_id: &str) -> Result<(WebexId, ActivityModel)> {
        let (id, url) = self.context.activity_url(message_id)?;
        let activity = self.context.endpoint(&url).build()?.response_object().await.into_result()?;
        Ok((id, activity))
    }

    fn to_message(&self, activity: &ActivityModel, key: Option<&ConversationKey>) -> Message {
        let material = key.map(|key| key.material.as_str());
        Message::from(&decrypt_activity(activity, material, self.cipher.as_ref()))
    }
}

fn room_uuid(space_id: &str) -> Result<String> {
    WebexId::decode(space_id)
        .filter(|id| id.belongs_to(ResourceType::Room))
        .map(|id| id.uuid().to_string())
        .ok_or_else(|| WebexError::IllegalOperation(format!("Cannot resolve space id {space_id}")))
}

fn conversation_target(uuid: &str) -> Value {
    json!({"id": uuid, "objectType": "conversation"})
}
