#![allow(dead_code)]

use lakekeeper_client::{ClientConfig, LakekeeperClient};
use lakekeeper_provider::engine::Context;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_string_contains, method, path},
};

pub const ACCESS_TOKEN: &str = "SlAV32hkKG";
pub const PROJECT_ID: &str = "00000000-0000-0000-0000-000000000000";
pub const WAREHOUSE_ID: &str = "019026f0-0000-7000-8000-00000000cafe";
pub const ROLE_ID: &str = "019026f0-0000-7000-8000-00000000beef";

/// Mount the OIDC token endpoint, expecting exactly `expected_fetches`
/// exchanges.
pub async fn mock_oidc(server: &MockServer, expected_fetches: u64) {
    Mock::given(method("POST"))
        .and(path("/token"))
        .and(body_string_contains("grant_type=client_credentials"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": ACCESS_TOKEN,
            "token_type": "Bearer",
            "expires_in": 3600
        })))
        .expect(expected_fetches)
        .mount(server)
        .await;
}

pub fn client_config(server: &MockServer) -> ClientConfig {
    ClientConfig::builder()
        .base_url(server.uri().parse().unwrap())
        .auth_url(format!("{}/token", server.uri()).parse().unwrap())
        .client_id("provider")
        .client_secret("hunter2")
        .build()
}

/// Client against the mock server, without the bootstrap-on-connect
/// step.
pub fn client(server: &MockServer) -> LakekeeperClient {
    LakekeeperClient::new(&client_config(server)).unwrap()
}

pub fn context(server: &MockServer) -> Context {
    Context::new(client(server))
}

pub fn server_info_body(bootstrapped: bool) -> serde_json::Value {
    serde_json::json!({
        "version": "0.9.3",
        "bootstrapped": bootstrapped,
        "server-id": "00000000-0000-0000-0000-000000000001",
        "default-project-id": PROJECT_ID,
        "authz-backend": "openfga",
        "aws-system-identities-enabled": false,
        "azure-system-identities-enabled": false,
        "gcp-system-identities-enabled": false,
        "queues": ["tabular_expiration", "tabular_purge"]
    })
}

pub fn error_body(code: u16, r#type: &str, message: &str) -> serde_json::Value {
    serde_json::json!({
        "error": {
            "message": message,
            "type": r#type,
            "code": code
        }
    })
}

pub fn not_found(r#type: &str, message: &str) -> ResponseTemplate {
    ResponseTemplate::new(404).set_body_json(error_body(404, r#type, message))
}
