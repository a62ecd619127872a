//! User provisioning: create fails on conflicts, update upserts in
//! place.

mod common;

use common::{context, mock_oidc};
use lakekeeper_provider::{
    engine::Reconciler,
    resources::user::{UserModel, UserResource},
};
use lakekeeper_client::api::user::UserType;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_partial_json, method, path},
};

const CREATED_AT: &str = "2025-06-01T12:00:00Z";

fn user_body(
    name: &str,
    user_type: &str,
    last_updated_with: &str,
    updated_at: Option<&str>,
) -> serde_json::Value {
    serde_json::json!({
        "id": "oidc~abc",
        "name": name,
        "user-type": user_type,
        "last-updated-with": last_updated_with,
        "created-at": CREATED_AT,
        "updated-at": updated_at
    })
}

#[tokio::test]
async fn create_then_update_in_place() {
    let server = MockServer::start().await;
    mock_oidc(&server, 1).await;

    Mock::given(method("POST"))
        .and(path("/management/v1/user"))
        .and(body_partial_json(serde_json::json!({
            "id": "oidc~abc",
            "update-if-exists": false
        })))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_json(user_body("Ada", "human", "create-endpoint", None)),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/management/v1/user"))
        .and(body_partial_json(serde_json::json!({
            "id": "oidc~abc",
            "update-if-exists": true
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_body(
            "Ada L.",
            "application",
            "update-endpoint",
            Some("2025-06-02T08:00:00Z"),
        )))
        .expect(1)
        .mount(&server)
        .await;

    let ctx = context(&server);
    let resource = UserResource;

    let created = resource
        .create(
            &ctx,
            UserModel {
                id: "oidc~abc".to_string(),
                name: "Ada".to_string(),
                email: None,
                user_type: UserType::Human,
                last_updated_with: None,
                created_at: None,
                updated_at: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(created.last_updated_with.as_deref(), Some("create-endpoint"));
    assert!(created.updated_at.is_none());

    let updated = resource
        .update(
            &ctx,
            created.clone(),
            UserModel {
                name: "Ada L.".to_string(),
                user_type: UserType::Application,
                ..created.clone()
            },
        )
        .await
        .unwrap();
    // Same record: id and created_at are unchanged, updated_at now set.
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.created_at, created.created_at);
    assert!(updated.updated_at.is_some());
    assert_eq!(updated.user_type, UserType::Application);
}

#[tokio::test]
async fn invalid_user_id_never_reaches_the_server() {
    let server = MockServer::start().await;
    mock_oidc(&server, 0).await;

    let ctx = context(&server);
    let err = UserResource
        .create(
            &ctx,
            UserModel {
                id: "ldap~abc".to_string(),
                name: "Nope".to_string(),
                email: None,
                user_type: UserType::Human,
                last_updated_with: None,
                created_at: None,
                updated_at: None,
            },
        )
        .await
        .unwrap_err();
    assert!(err.to_string().contains("Invalid user ID"), "{err}");
}

#[tokio::test]
async fn deleted_user_disappears_from_state() {
    let server = MockServer::start().await;
    mock_oidc(&server, 1).await;
    Mock::given(method("GET"))
        .and(path("/management/v1/user/oidc~abc"))
        .respond_with(common::not_found("UserNotFound", "User does not exist"))
        .expect(1)
        .mount(&server)
        .await;

    let ctx = context(&server);
    let read = UserResource
        .read(
            &ctx,
            UserModel {
                id: "oidc~abc".to_string(),
                name: "Ada".to_string(),
                email: None,
                user_type: UserType::Human,
                last_updated_with: None,
                created_at: None,
                updated_at: None,
            },
        )
        .await
        .unwrap();
    assert!(read.is_none());
}
