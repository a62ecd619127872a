use std::sync::Arc;

use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::{
    auth::TokenSource,
    config::ClientConfig,
    error::{ErrorModel, ErrorResponse, LakekeeperError, Result},
};

/// Header used to scope management requests to a project.
pub const X_PROJECT_ID_HEADER: &str = "x-project-id";

/// Connection pool limit per host, matching the transport defaults used
/// against the catalog.
const MAX_IDLE_CONNS_PER_HOST: usize = 100;

/// Authenticated client for the Lakekeeper management and catalog APIs.
///
/// The client is cheap to clone; clones share the HTTP connection pool
/// and the OAuth token cache. REST operations live in [`crate::api`],
/// Iceberg catalog operations behind [`LakekeeperClient::catalog_v1`].
#[derive(Debug, Clone)]
pub struct LakekeeperClient {
    http: reqwest::Client,
    base_url: String,
    token: Arc<TokenSource>,
    cancellation: CancellationToken,
}

impl LakekeeperClient {
    /// Build a client and, if `initial_bootstrap` is set, perform the
    /// one-shot idempotent server bootstrap.
    pub async fn connect(config: ClientConfig) -> Result<Self> {
        let client = Self::new(&config)?;
        if config.initial_bootstrap {
            client.ensure_bootstrapped().await?;
        }
        Ok(client)
    }

    /// Build a client without touching the network.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        validate_base_url(&config.base_url)?;
        let http = build_http(config)?;
        let token = TokenSource::new(
            http.clone(),
            config.auth_url.clone(),
            config.client_id.clone(),
            config.client_secret.clone(),
            &config.scopes,
        );

        Ok(Self {
            http,
            base_url: config.base_url.as_str().trim_end_matches('/').to_string(),
            token: Arc::new(token),
            cancellation: CancellationToken::new(),
        })
    }

    /// Returns a clone of this client whose requests abort when `token`
    /// is cancelled. Used to thread the engine's per-operation
    /// cancellation into every REST call.
    #[must_use]
    pub fn with_cancellation(&self, token: CancellationToken) -> Self {
        let mut client = self.clone();
        client.cancellation = token;
        client
    }

    pub(crate) fn url(&self, path: &str) -> String {
        debug_assert!(path.starts_with('/'));
        format!("{}{path}", self.base_url)
    }

    pub(crate) fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.http.get(self.url(path))
    }

    pub(crate) fn head(&self, path: &str) -> reqwest::RequestBuilder {
        self.http.head(self.url(path))
    }

    pub(crate) fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.http.post(self.url(path))
    }

    pub(crate) fn delete(&self, path: &str) -> reqwest::RequestBuilder {
        self.http.delete(self.url(path))
    }

    /// Attach the bearer token and execute, honoring cancellation. The
    /// cancellation branch is biased so an already-cancelled operation
    /// never touches the network.
    async fn execute(
        &self,
        operation: &str,
        builder: reqwest::RequestBuilder,
    ) -> Result<reqwest::Response> {
        let cancelled = || LakekeeperError::Cancelled {
            operation: operation.to_string(),
        };
        let token = tokio::select! {
            biased;
            () = self.cancellation.cancelled() => return Err(cancelled()),
            token = self.token.bearer_token() => token?,
        };
        tokio::select! {
            biased;
            () = self.cancellation.cancelled() => Err(cancelled()),
            response = builder.bearer_auth(token).send() => {
                response.map_err(|e| LakekeeperError::Transport {
                    operation: operation.to_string(),
                    source: e,
                })
            }
        }
    }

    /// Map a non-success response into an [`LakekeeperError::Api`],
    /// carrying the server's error payload verbatim.
    async fn check(&self, operation: &str, response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        let error = serde_json::from_str::<ErrorResponse>(&body)
            .map(|r| r.error)
            .unwrap_or_else(|_| ErrorModel::opaque(status, &body));
        Err(LakekeeperError::api(operation, status, error))
    }

    /// Execute and decode a JSON response body.
    pub(crate) async fn send_json<T: DeserializeOwned>(
        &self,
        operation: &str,
        builder: reqwest::RequestBuilder,
    ) -> Result<T> {
        let response = self.execute(operation, builder).await?;
        let response = self.check(operation, response).await?;
        response.json().await.map_err(|e| LakekeeperError::Decode {
            operation: operation.to_string(),
            source: e,
        })
    }

    /// Execute, discarding the response body.
    pub(crate) async fn send_unit(
        &self,
        operation: &str,
        builder: reqwest::RequestBuilder,
    ) -> Result<()> {
        let response = self.execute(operation, builder).await?;
        self.check(operation, response).await?;
        Ok(())
    }

    /// Execute, additionally accepting the listed non-success statuses.
    /// Returns the response status.
    pub(crate) async fn send_status(
        &self,
        operation: &str,
        builder: reqwest::RequestBuilder,
        accept: &[http::StatusCode],
    ) -> Result<http::StatusCode> {
        let response = self.execute(operation, builder).await?;
        let status = response.status();
        if accept.iter().any(|s| *s == status) {
            return Ok(status);
        }
        self.check(operation, response).await?;
        Ok(status)
    }
}

fn validate_base_url(url: &Url) -> Result<()> {
    if url.cannot_be_a_base() {
        return Err(LakekeeperError::Config(format!(
            "`{url}` cannot be used as a base URL"
        )));
    }
    Ok(())
}

fn build_http(config: &ClientConfig) -> Result<reqwest::Client> {
    let user_agent = config.user_agent.clone().unwrap_or_else(|| {
        format!(
            "{}/{}",
            env!("CARGO_PKG_NAME"),
            env!("CARGO_PKG_VERSION")
        )
    });

    let mut builder = reqwest::Client::builder()
        .timeout(config.client_timeout)
        .pool_max_idle_per_host(MAX_IDLE_CONNS_PER_HOST)
        .user_agent(user_agent);

    if config.insecure {
        // `insecure` wins when a CA bundle is also configured.
        builder = builder.danger_accept_invalid_certs(true);
    } else if let Some(path) = &config.ca_cert_file {
        let pem = std::fs::read(path).map_err(|e| {
            LakekeeperError::Config(format!("cannot read CA bundle `{}`: {e}", path.display()))
        })?;
        let certs = reqwest::Certificate::from_pem_bundle(&pem).map_err(|e| {
            LakekeeperError::Config(format!("invalid CA bundle `{}`: {e}", path.display()))
        })?;
        // The bundle becomes the sole root set.
        builder = builder.tls_built_in_root_certs(false);
        for cert in certs {
            builder = builder.add_root_certificate(cert);
        }
    }

    builder
        .build()
        .map_err(|e| LakekeeperError::Config(format!("failed to build HTTP client: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(base: &str) -> ClientConfig {
        ClientConfig::builder()
            .base_url(base.parse().unwrap())
            .auth_url("https://idp.example.com/token".parse().unwrap())
            .client_id("provider")
            .client_secret("secret")
            .build()
    }

    #[test]
    fn trailing_slash_is_normalized() {
        let client = LakekeeperClient::new(&config("https://catalog.example.com/")).unwrap();
        assert_eq!(
            client.url("/management/v1/info"),
            "https://catalog.example.com/management/v1/info"
        );
    }

    #[test]
    fn missing_ca_bundle_is_a_config_error() {
        let mut cfg = config("https://catalog.example.com");
        cfg.ca_cert_file = Some("/does/not/exist.pem".into());
        let err = LakekeeperClient::new(&cfg).unwrap_err();
        assert!(matches!(err, LakekeeperError::Config(_)), "{err}");
    }

    #[tokio::test]
    async fn cancelled_operations_never_touch_the_network() {
        let client = LakekeeperClient::new(&config("https://catalog.example.com")).unwrap();
        let token = CancellationToken::new();
        token.cancel();
        let client = client.with_cancellation(token);

        let err = client
            .send_unit("probe", client.get("/management/v1/info"))
            .await
            .unwrap_err();
        assert!(matches!(err, LakekeeperError::Cancelled { .. }), "{err}");
    }
}
