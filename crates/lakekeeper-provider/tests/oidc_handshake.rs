//! Token-source and bootstrap behavior against a mock OIDC provider and
//! catalog.

mod common;

use common::{client_config, context, mock_oidc, server_info_body};
use lakekeeper_client::{CancellationToken, LakekeeperClient};
use lakekeeper_provider::{
    Provider, ProviderConfig,
    data_sources::server::{ServerInfoDataSource, ServerInfoModel},
    engine::{Attr, DataSource},
};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{header, method, path},
};

#[tokio::test]
async fn server_info_read_fetches_one_token_and_one_info() {
    let server = MockServer::start().await;
    mock_oidc(&server, 1).await;
    Mock::given(method("GET"))
        .and(path("/management/v1/info"))
        .and(header("authorization", "Bearer SlAV32hkKG"))
        .respond_with(ResponseTemplate::new(200).set_body_json(server_info_body(true)))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/management/v1/bootstrap"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let ctx = context(&server);
    let info = ServerInfoDataSource
        .read(&ctx, ServerInfoModel::default())
        .await
        .unwrap();

    assert_eq!(info.version.as_deref(), Some("0.9.3"));
    assert_eq!(info.bootstrapped, Some(true));
    assert_eq!(
        info.queues.unwrap(),
        vec!["tabular_expiration".to_string(), "tabular_purge".to_string()]
    );
}

#[tokio::test]
async fn bootstrap_is_skipped_when_server_reports_bootstrapped() {
    let server = MockServer::start().await;
    mock_oidc(&server, 1).await;
    Mock::given(method("GET"))
        .and(path("/management/v1/info"))
        .respond_with(ResponseTemplate::new(200).set_body_json(server_info_body(true)))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/management/v1/bootstrap"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut config = client_config(&server);
    config.initial_bootstrap = true;
    LakekeeperClient::connect(config).await.unwrap();
}

#[tokio::test]
async fn not_modified_bootstrap_response_is_success() {
    let server = MockServer::start().await;
    mock_oidc(&server, 1).await;
    Mock::given(method("GET"))
        .and(path("/management/v1/info"))
        .respond_with(ResponseTemplate::new(200).set_body_json(server_info_body(false)))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/management/v1/bootstrap"))
        .respond_with(ResponseTemplate::new(304))
        .expect(1)
        .mount(&server)
        .await;

    let mut config = client_config(&server);
    config.initial_bootstrap = true;
    LakekeeperClient::connect(config).await.unwrap();
}

#[tokio::test]
async fn provider_builds_client_from_configuration() {
    let server = MockServer::start().await;
    mock_oidc(&server, 1).await;
    Mock::given(method("GET"))
        .and(path("/management/v1/info"))
        .respond_with(ResponseTemplate::new(200).set_body_json(server_info_body(true)))
        .mount(&server)
        .await;

    let provider = Provider::new(ProviderConfig {
        endpoint: Attr::known(server.uri()),
        auth_url: Attr::known(format!("{}/token", server.uri())),
        client_id: Attr::known("provider".to_string()),
        client_secret: Attr::known("hunter2".to_string()),
        initial_bootstrap: Attr::known(false),
        ..ProviderConfig::default()
    });

    let ctx = provider.context(CancellationToken::new()).await.unwrap();
    let info = ServerInfoDataSource
        .read(&ctx, ServerInfoModel::default())
        .await
        .unwrap();
    assert_eq!(info.authz_backend.as_deref(), Some("openfga"));
}

#[tokio::test]
async fn missing_required_configuration_aborts_client_construction() {
    let provider = Provider::new(ProviderConfig::default());
    let err = provider
        .context(CancellationToken::new())
        .await
        .unwrap_err();
    let rendered = err.to_string();
    assert!(rendered.contains("auth_url"), "{rendered}");
}
