//! Membership client (hydra `memberships`)

use reqwest::Method;
use tracing::instrument;
use webex_core::Service;
use webex_domain::{
    ConversationModel, Membership, MembershipReadStatus, PersonModel, ResourceType, Result,
    WebexId,
};

use super::{read_status_query, ClientContext};
use crate::http::{RequestParameter, ServiceRequestBuilder};

/// Who to add to a space.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MembershipTarget {
    PersonId(String),
    PersonEmail(String),
}

pub struct MembershipClient {
    context: ClientContext,
}

impl MembershipClient {
    pub fn new(context: ClientContext) -> Self {
        Self { context }
    }

    fn memberships(&self) -> ServiceRequestBuilder {
        self.context.homed(Service::Hydra).path("memberships")
    }

    /// Lists memberships, optionally narrowed to a space and a person.
    #[instrument(skip(self))]
    pub async fn list(
        &self,
        space_id: Option<&str>,
        person_id: Option<&str>,
        person_email: Option<&str>,
        max: Option<u32>,
    ) -> Result<Vec<Membership>> {
        let query = RequestParameter::new()
            .with("spaceId", space_id)
            .with("roomId", space_id)
            .with("personId", person_id)
            .with("personEmail", person_email)
            .with("max", max);

        self.memberships()
            .query(query)
            .key_path("items")
            .build()?
            .response_array()
            .await
            .into_result()
    }

    #[instrument(skip(self))]
    pub async fn create(
        &self,
        space_id: &str,
        target: MembershipTarget,
        is_moderator: bool,
    ) -> Result<Membership> {
        let body = RequestParameter::new().with("spaceId", space_id).with("roomId", space_id);
        let body = match target {
            MembershipTarget::PersonId(id) => body.with("personId", id),
            MembershipTarget::PersonEmail(email) => body.with("personEmail", email),
        };

        self.memberships()
            .method(Method::POST)
            .body(body.with("isModerator", is_moderator))
            .build()?
            .response_object()
            .await
            .into_result()
    }

    #[instrument(skip(self))]
    pub async fn get(&self, membership_id: &str) -> Result<Membership> {
        self.memberships().path(membership_id).build()?.response_object().await.into_result()
    }

    #[instrument(skip(self))]
    pub async fn update(&self, membership_id: &str, is_moderator: bool) -> Result<Membership> {
        self.memberships()
            .method(Method::PUT)
            .path(membership_id)
            .body(RequestParameter::new().with("isModerator", is_moderator))
            .build()?
            .response_object()
            .await
            .into_result()
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, membership_id: &str) -> Result<()> {
        self.memberships()
            .method(Method::DELETE)
            .path(membership_id)
            .build()?
            .response_json()
            .await
            .into_result()
            .map(|_| ())
    }

    /// Members of a space with the last message each one has seen.
    #[instrument(skip(self))]
    pub async fn list_with_read_status(&self, space_id: &str) -> Result<Vec<MembershipReadStatus>> {
        let (id, url) = self.context.conversation_url(space_id)?;

        let conversation: ConversationModel = self
            .context
            .endpoint(&url)
            .query(read_status_query().with("participantAckFilter", "all"))
            .build()?
            .response_object()
            .await
            .into_result()?;

        Ok(conversation
            .participants()
            .iter()
            .map(|person| member_read_status(&id, person))
            .collect())
    }
}

fn member_read_status(space: &WebexId, person: &PersonModel) -> MembershipReadStatus {
    let cluster = Some(space.cluster());
    let entry_uuid = person.entry_uuid.as_deref().unwrap_or_default();
    let properties = person.room_properties.clone().unwrap_or_default();

    let member = Membership {
        id: Some(WebexId::hydra_format(
            &format!("{entry_uuid}:{}", space.uuid()),
            ResourceType::Membership,
            cluster,
        )),
        person_id: person
            .entry_uuid
            .as_deref()
            .map(|uuid| WebexId::hydra_format(uuid, ResourceType::People, cluster)),
        person_email: person.email_address.clone(),
        person_display_name: person.base.display_name.clone(),
        person_org_id: person
            .org_id
            .as_deref()
            .map(|org| WebexId::hydra_format(org, ResourceType::Organization, cluster)),
        space_id: Some(WebexId::hydra_format(space.uuid(), ResourceType::Room, cluster)),
        is_moderator: properties.is_moderator,
        is_monitor: None,
        created: None,
    };

    MembershipReadStatus {
        member,
        last_seen_id: properties
            .last_seen_activity_uuid
            .as_deref()
            .map(|uuid| WebexId::hydra_format(uuid, ResourceType::Message, cluster)),
        last_seen_date: properties.last_seen_activity_date,
    }
}
