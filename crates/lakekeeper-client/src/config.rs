use std::{path::PathBuf, time::Duration};

use typed_builder::TypedBuilder;
use url::Url;

/// Default OAuth scopes requested during the client-credentials grant.
pub(crate) const DEFAULT_SCOPES: &[&str] = &["lakekeeper"];

/// Default per-request timeout, also applied to the token exchange.
pub(crate) const DEFAULT_CLIENT_TIMEOUT: Duration = Duration::from_secs(30);

/// Connection options for [`crate::LakekeeperClient`].
///
/// `client_secret` is redacted from Debug output.
#[derive(Clone, veil::Redact, TypedBuilder)]
pub struct ClientConfig {
    /// Root URL of the catalog service, e.g. `https://lakekeeper.example.com`.
    pub base_url: Url,
    /// OIDC token endpoint used for the client-credentials grant.
    pub auth_url: Url,
    #[builder(setter(into))]
    pub client_id: String,
    #[redact]
    #[builder(setter(into))]
    pub client_secret: String,
    /// Requested scopes. Defaults to `["lakekeeper"]`.
    #[builder(default = DEFAULT_SCOPES.iter().map(ToString::to_string).collect())]
    pub scopes: Vec<String>,
    /// PEM bundle installed as the sole trusted root set.
    #[builder(default, setter(strip_option))]
    pub ca_cert_file: Option<PathBuf>,
    /// Disables TLS verification. Wins over `ca_cert_file` when both are set.
    #[builder(default)]
    pub insecure: bool,
    /// User-Agent header injected on all requests.
    #[builder(default, setter(strip_option, into))]
    pub user_agent: Option<String>,
    /// Perform a one-shot idempotent server bootstrap on construction.
    #[builder(default)]
    pub initial_bootstrap: bool,
    /// Per-request timeout, including the token exchange.
    #[builder(default = DEFAULT_CLIENT_TIMEOUT)]
    pub client_timeout: Duration,
}
