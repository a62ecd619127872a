//! Assignment diffing issues exactly one batched update per apply.

mod common;

use common::{WAREHOUSE_ID, context, mock_oidc};
use lakekeeper_provider::{
    engine::Reconciler,
    resources::assignment::{AssignmentModel, AssignmentResource},
};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_json, method, path},
};

fn assignments_path() -> String {
    format!("/management/v1/permissions/warehouse/{WAREHOUSE_ID}/assignments")
}

fn model(tokens: &[&str]) -> AssignmentModel {
    AssignmentModel {
        id: Some(format!("{WAREHOUSE_ID}/oidc~alice")),
        object_id: Some(WAREHOUSE_ID.to_string()),
        principal_id: "oidc~alice".to_string(),
        assignments: tokens.iter().map(ToString::to_string).collect(),
    }
}

#[tokio::test]
async fn growing_the_set_writes_only_the_additions() {
    let server = MockServer::start().await;
    mock_oidc(&server, 1).await;
    Mock::given(method("POST"))
        .and(path(assignments_path()))
        .and(body_json(serde_json::json!({
            "writes": [
                {"type": "create", "user": "oidc~alice"},
                {"type": "manage_grants", "user": "oidc~alice"}
            ]
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let ctx = context(&server);
    let state = model(&["ownership"]);
    let plan = model(&["ownership", "manage_grants", "create"]);
    let updated = AssignmentResource::warehouse_user()
        .update(&ctx, state, plan)
        .await
        .unwrap();
    assert_eq!(
        updated.assignments,
        vec![
            "create".to_string(),
            "manage_grants".to_string(),
            "ownership".to_string()
        ]
    );
}

#[tokio::test]
async fn emptying_the_set_deletes_everything() {
    let server = MockServer::start().await;
    mock_oidc(&server, 1).await;
    Mock::given(method("POST"))
        .and(path(assignments_path()))
        .and(body_json(serde_json::json!({
            "deletes": [
                {"type": "create", "user": "oidc~alice"},
                {"type": "manage_grants", "user": "oidc~alice"},
                {"type": "ownership", "user": "oidc~alice"}
            ]
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let ctx = context(&server);
    let state = model(&["ownership", "manage_grants", "create"]);
    let plan = model(&[]);
    let updated = AssignmentResource::warehouse_user()
        .update(&ctx, state, plan)
        .await
        .unwrap();
    assert!(updated.assignments.is_empty());
}

#[tokio::test]
async fn identical_sets_issue_no_call() {
    let server = MockServer::start().await;
    mock_oidc(&server, 0).await;
    Mock::given(method("POST"))
        .and(path(assignments_path()))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let ctx = context(&server);
    let state = model(&["ownership", "describe"]);
    let plan = model(&["describe", "ownership"]);
    AssignmentResource::warehouse_user()
        .update(&ctx, state, plan)
        .await
        .unwrap();
}

#[tokio::test]
async fn read_filters_to_the_managed_principal() {
    let server = MockServer::start().await;
    mock_oidc(&server, 1).await;
    Mock::given(method("GET"))
        .and(path(assignments_path()))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "assignments": [
                {"type": "ownership", "user": "oidc~alice"},
                {"type": "describe", "user": "oidc~bob"},
                {"type": "select", "role": common::ROLE_ID},
                {"type": "modify", "user": "oidc~alice"}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let ctx = context(&server);
    let read = AssignmentResource::warehouse_user()
        .read(&ctx, model(&["ownership"]))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(
        read.assignments,
        vec!["modify".to_string(), "ownership".to_string()]
    );
}

#[tokio::test]
async fn create_writes_the_whole_planned_set() {
    let server = MockServer::start().await;
    mock_oidc(&server, 1).await;
    Mock::given(method("POST"))
        .and(path(assignments_path()))
        .and(body_json(serde_json::json!({
            "writes": [
                {"type": "ownership", "user": "oidc~alice"},
                {"type": "select", "user": "oidc~alice"}
            ]
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let ctx = context(&server);
    let mut plan = model(&["ownership", "select"]);
    plan.id = None;
    let created = AssignmentResource::warehouse_user()
        .create(&ctx, plan)
        .await
        .unwrap();
    assert_eq!(created.id.as_deref(), Some(&*format!("{WAREHOUSE_ID}/oidc~alice")));
}

#[tokio::test]
async fn invalid_token_is_rejected_before_any_call() {
    let server = MockServer::start().await;
    mock_oidc(&server, 0).await;

    let ctx = context(&server);
    let err = AssignmentResource::warehouse_user()
        .create(&ctx, model(&["admin"]))
        .await
        .unwrap_err();
    let rendered = err.to_string();
    assert!(rendered.contains("Invalid warehouse assignment"), "{rendered}");
}
