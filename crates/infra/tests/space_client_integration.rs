//! Integration tests for the space client
//!
//! Drives the hydra `rooms` endpoints and the conversation read-status
//! lookup through the `Webex` entry point against a WireMock server.

#![allow(dead_code)]

#[path = "support.rs"]
mod support;

use std::sync::Arc;

use serde_json::json;
use support::{space_id, webex_for, MockAuthenticator, SPACE_UUID};
use webex_domain::{ResourceType, SpaceSortType, SpaceType, WebexError, WebexId};
use wiremock::matchers::{body_json, header, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn auth() -> Arc<MockAuthenticator> {
    Arc::new(MockAuthenticator::new("token-1"))
}

#[tokio::test]
async fn list_sends_filters_and_unwraps_items() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/rooms"))
        .and(header("authorization", "Bearer token-1"))
        .and(query_param("teamId", "team-1"))
        .and(query_param("max", "2"))
        .and(query_param("type", "group"))
        .and(query_param("sortBy", "lastactivity"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [
                {"id": "r1", "title": "Planning", "type": "group", "isLocked": false},
                {"id": "r2", "title": "Retro", "type": "group", "created": "2020-05-01T10:00:00.000Z"}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let webex = webex_for(&server, auth());
    let spaces = webex
        .spaces()
        .list(Some("team-1"), Some(2), Some(SpaceType::Group), Some(SpaceSortType::LastActivity))
        .await
        .unwrap();

    assert_eq!(spaces.len(), 2);
    assert_eq!(spaces[0].title.as_deref(), Some("Planning"));
    assert_eq!(spaces[1].space_type, Some(SpaceType::Group));
    assert!(spaces[1].created.is_some());
}

#[tokio::test]
async fn list_without_filters_sends_no_query() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/rooms"))
        .and(query_param_is_missing("teamId"))
        .and(query_param_is_missing("max"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"items": []})))
        .expect(1)
        .mount(&server)
        .await;

    let webex = webex_for(&server, auth());
    assert!(webex.spaces().list(None, None, None, None).await.unwrap().is_empty());
}

#[tokio::test]
async fn create_update_get_and_delete() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/rooms"))
        .and(body_json(json!({"title": "Launch"})))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"id": "r9", "title": "Launch"})),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/v1/rooms/r9"))
        .and(body_json(json!({"title": "Launch v2"})))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"id": "r9", "title": "Launch v2"})),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/rooms/r9"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"id": "r9", "title": "Launch v2"})),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/v1/rooms/r9"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let webex = webex_for(&server, auth());
    let spaces = webex.spaces();

    let created = spaces.create("Launch", None).await.unwrap();
    assert_eq!(created.id.as_deref(), Some("r9"));

    let updated = spaces.update("r9", "Launch v2").await.unwrap();
    assert_eq!(updated.title.as_deref(), Some("Launch v2"));

    assert_eq!(spaces.get("r9").await.unwrap(), updated);
    spaces.delete("r9").await.unwrap();
}

#[tokio::test]
async fn service_error_message_is_surfaced() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/rooms/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "message": "The requested resource could not be found.",
            "trackingId": "ROUTER_1"
        })))
        .mount(&server)
        .await;

    let webex = webex_for(&server, auth());
    let err = webex.spaces().get("missing").await.unwrap_err();
    assert_eq!(err, WebexError::service_failed("The requested resource could not be found."));
}

#[tokio::test]
async fn read_status_comes_from_the_conversation_service() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("/conversation/api/v1/conversations/{SPACE_UUID}")))
        .and(query_param("uuidEntryFormat", "true"))
        .and(query_param("personRefresh", "true"))
        .and(query_param("activitiesLimit", "0"))
        .and(query_param("includeParticipants", "false"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": SPACE_UUID,
            "objectType": "conversation",
            "tags": ["LOCKED"],
            "lastReadableActivityDate": "2021-06-01T09:00:00.000Z",
            "lastSeenActivityDate": "2021-06-01T10:00:00.000Z"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let webex = webex_for(&server, auth());
    let status = webex.spaces().get_with_read_status(&space_id()).await.unwrap();

    assert_eq!(status.id, Some(space_id()));
    assert_eq!(status.space_type, Some(SpaceType::Group));
    assert!(status.last_activity_date.is_some());
    assert!(!status.has_unread());
}

#[tokio::test]
async fn unresolvable_space_id_fails_without_a_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let webex = webex_for(&server, auth());

    let err = webex.spaces().get_with_read_status("not-a-token").await.unwrap_err();
    assert!(matches!(err, WebexError::IllegalOperation(_)));

    let person = WebexId::hydra_format(SPACE_UUID, ResourceType::People, None);
    let err = webex.spaces().get_with_read_status(&person).await.unwrap_err();
    assert!(matches!(err, WebexError::IllegalOperation(_)));
}
