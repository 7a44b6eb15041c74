//! Space client (hydra `rooms`)

use reqwest::Method;
use tracing::instrument;
use webex_core::Service;
use webex_domain::{
    ConversationModel, ResourceType, Result, Space, SpaceReadStatus, SpaceSortType, SpaceType,
    WebexId,
};

use super::{read_status_query, ClientContext};
use crate::http::{RequestParameter, ServiceRequestBuilder};

pub struct SpaceClient {
    context: ClientContext,
}

impl SpaceClient {
    pub fn new(context: ClientContext) -> Self {
        Self { context }
    }

    fn rooms(&self) -> ServiceRequestBuilder {
        self.context.homed(Service::Hydra).path("rooms")
    }

    /// Lists spaces the user belongs to.
    #[instrument(skip(self))]
    pub async fn list(
        &self,
        team_id: Option<&str>,
        max: Option<u32>,
        space_type: Option<SpaceType>,
        sort_by: Option<SpaceSortType>,
    ) -> Result<Vec<Space>> {
        let query = RequestParameter::new()
            .with("teamId", team_id)
            .with("max", max)
            .with("type", space_type.map(|t| t.as_str()))
            .with("sortBy", sort_by.map(|s| s.as_str()));

        self.rooms()
            .method(Method::GET)
            .query(query)
            .key_path("items")
            .build()?
            .response_array()
            .await
            .into_result()
    }

    /// Creates a space; the caller becomes its first member.
    #[instrument(skip(self))]
    pub async fn create(&self, title: &str, team_id: Option<&str>) -> Result<Space> {
        self.rooms()
            .method(Method::POST)
            .body(RequestParameter::new().with("title", title).with("teamId", team_id))
            .build()?
            .response_object()
            .await
            .into_result()
    }

    #[instrument(skip(self))]
    pub async fn get(&self, space_id: &str) -> Result<Space> {
        self.rooms().path(space_id).build()?.response_object().await.into_result()
    }

    #[instrument(skip(self))]
    pub async fn update(&self, space_id: &str, title: &str) -> Result<Space> {
        self.rooms()
            .method(Method::PUT)
            .path(space_id)
            .body(RequestParameter::new().with("title", title))
            .build()?
            .response_object()
            .await
            .into_result()
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, space_id: &str) -> Result<()> {
        self.rooms()
            .method(Method::DELETE)
            .path(space_id)
            .build()?
            .response_json()
            .await
            .into_result()
            .map(|_| ())
    }

    /// Read status of a space, from the conversation service.
    ///
    /// # Errors
    /// `IllegalOperation` without any request when the id does not resolve.
    #[instrument(skip(self))]
    pub async fn get_with_read_status(&self, space_id: &str) -> Result<SpaceReadStatus> {
        let (id, url) = self.context.conversation_url(space_id)?;

        let conversation: ConversationModel = self
            .context
            .endpoint(&url)
            .query(read_status_query().with("includeParticipants", false))
            .build()?
            .response_object()
            .await
            .into_result()?;

        Ok(read_status(&id, &conversation))
    }
}

fn read_status(id: &WebexId, conversation: &ConversationModel) -> SpaceReadStatus {
    let space_type = if conversation.is_one_on_one() { SpaceType::Direct } else { SpaceType::Group };
    SpaceReadStatus {
        id: Some(WebexId::hydra_format(id.uuid(), ResourceType::Room, Some(id.cluster()))),
        space_type: Some(space_type),
        last_activity_date: conversation
            .last_relevant_activity_date
            .or(conversation.last_readable_activity_date),
        last_seen_activity_date: conversation.last_seen_activity_date,
    }
}
