//! Provider-level configuration.
//!
//! Attributes arrive from the engine as three-state [`Attr`] values;
//! unset connection attributes fall back to `LAKEKEEPER_*` environment
//! variables before required-field validation runs.

use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Serialized},
};
use lakekeeper_client::ClientConfig;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::engine::{Attr, AttributePath, Diagnostics};

/// Environment prefix for connection fallbacks (`LAKEKEEPER_ENDPOINT`,
/// `LAKEKEEPER_AUTH_URL`, `LAKEKEEPER_CLIENT_ID`,
/// `LAKEKEEPER_CLIENT_SECRET`).
const ENV_PREFIX: &str = "LAKEKEEPER_";

/// Raw provider configuration as handed over by the engine.
#[derive(Clone, Default, veil::Redact)]
pub struct ProviderConfig {
    /// Catalog base URL. Falls back to `LAKEKEEPER_ENDPOINT`.
    pub endpoint: Attr<String>,
    /// OIDC token endpoint. Falls back to `LAKEKEEPER_AUTH_URL`.
    pub auth_url: Attr<String>,
    /// OIDC client ID. Falls back to `LAKEKEEPER_CLIENT_ID`.
    pub client_id: Attr<String>,
    /// OIDC client secret. Falls back to `LAKEKEEPER_CLIENT_SECRET`.
    #[redact]
    pub client_secret: Attr<String>,
    /// Requested scopes. Defaults to `["lakekeeper"]`.
    pub scopes: Attr<Vec<String>>,
    /// PEM file installed as the sole trusted root set.
    pub cacert_file: Attr<String>,
    /// Disable TLS verification.
    pub insecure: Attr<bool>,
    /// Bootstrap the server on first client construction. Default: true.
    pub initial_bootstrap: Attr<bool>,
    /// Per-request timeout in seconds.
    pub client_timeout_seconds: Attr<u64>,
}

/// Connection attributes readable from the environment.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct EnvFallback {
    endpoint: Option<String>,
    auth_url: Option<String>,
    client_id: Option<String>,
    client_secret: Option<String>,
}

fn env_fallback() -> EnvFallback {
    Figment::from(Serialized::defaults(EnvFallback::default()))
        .merge(Env::prefixed(ENV_PREFIX))
        .extract()
        .unwrap_or_default()
}

impl ProviderConfig {
    /// Evaluate the configuration into client options.
    ///
    /// Unknown values on any required attribute abort with a
    /// deferred-value diagnostic; unset attributes fall back to the
    /// environment before the required-field check.
    pub fn resolve(&self) -> Result<ClientConfig, Diagnostics> {
        self.resolve_with(&env_fallback())
    }

    fn resolve_with(&self, env: &EnvFallback) -> Result<ClientConfig, Diagnostics> {
        let mut diags = Diagnostics::new();

        let endpoint =
            with_fallback(&self.endpoint, env.endpoint.clone()).require("endpoint", &mut diags);
        let auth_url =
            with_fallback(&self.auth_url, env.auth_url.clone()).require("auth_url", &mut diags);
        let client_id =
            with_fallback(&self.client_id, env.client_id.clone()).require("client_id", &mut diags);
        let client_secret = with_fallback(&self.client_secret, env.client_secret.clone())
            .require("client_secret", &mut diags);

        // Plan scopes are copied into the evaluated config explicitly;
        // an unknown list defers like any required attribute would.
        let scopes = match &self.scopes {
            Attr::Unknown => {
                Attr::<Vec<String>>::Unknown.require("scopes", &mut diags);
                None
            }
            Attr::Null => Some(vec!["lakekeeper".to_string()]),
            Attr::Known(scopes) => Some(scopes.clone()),
        };

        let endpoint = endpoint.and_then(|raw| parse_url("endpoint", &raw, &mut diags));
        let auth_url = auth_url.and_then(|raw| parse_url("auth_url", &raw, &mut diags));

        if diags.has_errors() {
            return Err(diags);
        }
        let (Some(base_url), Some(auth_url), Some(client_id), Some(client_secret), Some(scopes)) =
            (endpoint, auth_url, client_id, client_secret, scopes)
        else {
            return Err(diags);
        };

        let mut config = ClientConfig::builder()
            .base_url(base_url)
            .auth_url(auth_url)
            .client_id(client_id)
            .client_secret(client_secret)
            .scopes(scopes)
            .insecure(self.insecure.as_known().copied().unwrap_or(false))
            .initial_bootstrap(self.initial_bootstrap.as_known().copied().unwrap_or(true))
            .build();
        if let Some(secs) = self.client_timeout_seconds.as_known() {
            config.client_timeout = Duration::from_secs(*secs);
        }
        config.ca_cert_file = self.cacert_file.as_known().map(Into::into);
        Ok(config)
    }
}

fn with_fallback(attr: &Attr<String>, env: Option<String>) -> Attr<String> {
    match attr {
        Attr::Null => Attr::from_option(env),
        other => other.clone(),
    }
}

fn parse_url(attribute: &str, raw: &str, diags: &mut Diagnostics) -> Option<Url> {
    match Url::parse(raw) {
        Ok(url) => Some(url),
        Err(e) => {
            diags.add_attribute_error(
                AttributePath::root(attribute),
                format!("Invalid URL in `{attribute}`"),
                format!("`{raw}` is not a valid URL: {e}"),
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_config() -> ProviderConfig {
        ProviderConfig {
            endpoint: Attr::known("https://catalog.example.com".to_string()),
            auth_url: Attr::known("https://idp.example.com/token".to_string()),
            client_id: Attr::known("provider".to_string()),
            client_secret: Attr::known("secret".to_string()),
            ..ProviderConfig::default()
        }
    }

    #[test]
    fn resolves_with_defaults() {
        let config = full_config().resolve_with(&EnvFallback::default()).unwrap();
        assert_eq!(config.scopes, vec!["lakekeeper".to_string()]);
        assert!(config.initial_bootstrap);
        assert!(!config.insecure);
    }

    #[test]
    fn missing_auth_url_is_required_error() {
        let mut config = full_config();
        config.auth_url = Attr::Null;
        let err = config.resolve_with(&EnvFallback::default()).unwrap_err();
        assert!(err.to_string().contains("auth_url"), "{err}");
    }

    #[test]
    fn env_fallback_fills_unset_attributes() {
        let mut config = full_config();
        config.auth_url = Attr::Null;
        let env = EnvFallback {
            auth_url: Some("https://fallback.example.com/token".to_string()),
            ..EnvFallback::default()
        };
        let resolved = config.resolve_with(&env).unwrap();
        assert_eq!(
            resolved.auth_url.as_str(),
            "https://fallback.example.com/token"
        );
    }

    #[test]
    fn known_value_wins_over_env() {
        let config = full_config();
        let env = EnvFallback {
            endpoint: Some("https://ignored.example.com".to_string()),
            ..EnvFallback::default()
        };
        let resolved = config.resolve_with(&env).unwrap();
        assert_eq!(resolved.base_url.host_str(), Some("catalog.example.com"));
    }

    #[test]
    fn unknown_required_attribute_defers() {
        let mut config = full_config();
        config.client_secret = Attr::Unknown;
        let err = config.resolve_with(&EnvFallback::default()).unwrap_err();
        assert!(err.to_string().contains("not yet known"), "{err}");
    }

    #[test]
    fn unknown_scopes_defer() {
        let mut config = full_config();
        config.scopes = Attr::Unknown;
        let err = config.resolve_with(&EnvFallback::default()).unwrap_err();
        assert!(err.to_string().contains("scopes"), "{err}");
    }

    #[test]
    fn invalid_endpoint_is_attribute_scoped() {
        let mut config = full_config();
        config.endpoint = Attr::known("not a url".to_string());
        let err = config.resolve_with(&EnvFallback::default()).unwrap_err();
        assert!(err.to_string().contains("endpoint"), "{err}");
    }

    #[test]
    fn env_prefix_reads_expected_variables() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("LAKEKEEPER_ENDPOINT", "https://env.example.com");
            jail.set_env("LAKEKEEPER_CLIENT_ID", "from-env");
            let env = env_fallback();
            assert_eq!(env.endpoint.as_deref(), Some("https://env.example.com"));
            assert_eq!(env.client_id.as_deref(), Some("from-env"));
            assert_eq!(env.client_secret, None);
            Ok(())
        });
    }
}
