use std::time::{Duration, Instant};

use serde::Deserialize;
use tokio::sync::RwLock;
use url::Url;

use crate::error::{LakekeeperError, Result};

/// Tokens are refreshed this long before their reported expiry so that a
/// token handed out here never expires mid-request.
const EXPIRY_MARGIN: Duration = Duration::from_secs(60);

/// Lifetime assumed for tokens whose response omits `expires_in`.
const DEFAULT_TOKEN_LIFETIME: Duration = Duration::from_secs(3600);

/// OAuth2 client-credentials token source with in-memory caching.
///
/// Safe for concurrent use; concurrent callers racing on an expired token
/// may each perform an exchange, the last response wins the cache slot.
pub(crate) struct TokenSource {
    http: reqwest::Client,
    auth_url: Url,
    client_id: String,
    client_secret: String,
    scope: String,
    cached: RwLock<Option<CachedToken>>,
}

impl std::fmt::Debug for TokenSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenSource")
            .field("auth_url", &self.auth_url.as_str())
            .field("client_id", &self.client_id)
            .field("scope", &self.scope)
            .finish_non_exhaustive()
    }
}

#[derive(Clone)]
struct CachedToken {
    access_token: String,
    refresh_after: Instant,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct TokenErrorResponse {
    error: String,
    #[serde(default)]
    error_description: Option<String>,
}

impl TokenSource {
    pub(crate) fn new(
        http: reqwest::Client,
        auth_url: Url,
        client_id: String,
        client_secret: String,
        scopes: &[String],
    ) -> Self {
        Self {
            http,
            auth_url,
            client_id,
            client_secret,
            scope: scopes.join(" "),
            cached: RwLock::new(None),
        }
    }

    /// Returns a bearer token, exchanging credentials if the cached token
    /// is missing or about to expire.
    pub(crate) async fn bearer_token(&self) -> Result<String> {
        if let Some(token) = self.cached.read().await.as_ref() {
            if token.refresh_after > Instant::now() {
                return Ok(token.access_token.clone());
            }
        }

        let token = self.exchange().await?;
        let mut slot = self.cached.write().await;
        *slot = Some(token.clone());
        Ok(token.access_token)
    }

    async fn exchange(&self) -> Result<CachedToken> {
        tracing::debug!(auth_url = %self.auth_url, client_id = %self.client_id, "fetching OAuth token");
        let response = self
            .http
            .post(self.auth_url.clone())
            .form(&[
                ("grant_type", "client_credentials"),
                ("client_id", &self.client_id),
                ("client_secret", &self.client_secret),
                ("scope", &self.scope),
            ])
            .send()
            .await
            .map_err(|e| LakekeeperError::Auth(format!("token endpoint unreachable: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let detail = match serde_json::from_str::<TokenErrorResponse>(&body) {
                Ok(e) => match e.error_description {
                    Some(desc) => format!("{}: {desc}", e.error),
                    None => e.error,
                },
                Err(_) => body.trim().to_string(),
            };
            return Err(LakekeeperError::Auth(format!(
                "token endpoint returned {status}: {detail}"
            )));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| LakekeeperError::Auth(format!("malformed token response: {e}")))?;

        let lifetime = token
            .expires_in
            .map_or(DEFAULT_TOKEN_LIFETIME, Duration::from_secs);
        Ok(CachedToken {
            access_token: token.access_token,
            refresh_after: Instant::now() + lifetime.saturating_sub(EXPIRY_MARGIN),
        })
    }

    /// Drops the cached token so the next call performs a fresh exchange.
    #[cfg(test)]
    pub(crate) async fn invalidate(&self) {
        *self.cached.write().await = None;
    }
}

#[cfg(test)]
mod tests {
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{body_string_contains, method, path},
    };

    use super::*;

    fn source(server_url: &str) -> TokenSource {
        TokenSource::new(
            reqwest::Client::new(),
            format!("{server_url}/token").parse().unwrap(),
            "provider".to_string(),
            "hunter2".to_string(),
            &["lakekeeper".to_string()],
        )
    }

    #[tokio::test]
    async fn token_is_fetched_once_and_cached() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .and(body_string_contains("grant_type=client_credentials"))
            .and(body_string_contains("scope=lakekeeper"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "SlAV32hkKG",
                "token_type": "Bearer",
                "expires_in": 3600
            })))
            .expect(1)
            .mount(&server)
            .await;

        let source = source(&server.uri());
        assert_eq!(source.bearer_token().await.unwrap(), "SlAV32hkKG");
        // Second call must be served from the cache.
        assert_eq!(source.bearer_token().await.unwrap(), "SlAV32hkKG");
    }

    #[tokio::test]
    async fn expired_token_is_refreshed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                // expires_in below the refresh margin: immediately stale
                "access_token": "short-lived",
                "expires_in": 1
            })))
            .expect(2)
            .mount(&server)
            .await;

        let source = source(&server.uri());
        source.bearer_token().await.unwrap();
        source.bearer_token().await.unwrap();
    }

    #[tokio::test]
    async fn oauth_error_is_surfaced() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
                "error": "invalid_client",
                "error_description": "client secret mismatch"
            })))
            .mount(&server)
            .await;

        let source = source(&server.uri());
        let err = source.bearer_token().await.unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("invalid_client"), "{msg}");
        assert!(msg.contains("client secret mismatch"), "{msg}");
    }

    #[tokio::test]
    async fn invalidate_forces_refresh() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "tok",
                "expires_in": 3600
            })))
            .expect(2)
            .mount(&server)
            .await;

        let source = source(&server.uri());
        source.bearer_token().await.unwrap();
        source.invalidate().await;
        source.bearer_token().await.unwrap();
    }
}
