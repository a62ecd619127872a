use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

use crate::{LakekeeperClient, ProjectId, error::Result};

#[derive(Debug, Clone, Serialize, Deserialize, TypedBuilder)]
#[serde(rename_all = "kebab-case")]
pub struct BootstrapRequest {
    /// Set to true if you accept the server's terms of use.
    #[builder(setter(strip_bool))]
    pub accept_terms_of_use: bool,
    /// If set to true, the calling identity is treated as an operator
    /// (application user) and obtains a corresponding role.
    #[serde(default)]
    #[builder(setter(strip_bool))]
    pub is_operator: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[allow(clippy::struct_excessive_bools)]
pub struct ServerInfo {
    /// Version of the server.
    pub version: String,
    /// Whether the catalog has been bootstrapped.
    pub bootstrapped: bool,
    /// ID of the server.
    pub server_id: uuid::Uuid,
    /// Default Project ID. Null if not set.
    #[serde(default)]
    pub default_project_id: Option<ProjectId>,
    /// AuthZ backend in use.
    pub authz_backend: String,
    /// If AWS system identities for S3 storage profiles are enabled.
    #[serde(default)]
    pub aws_system_identities_enabled: bool,
    /// If Azure system identities for ADLS storage profiles are enabled.
    #[serde(default)]
    pub azure_system_identities_enabled: bool,
    /// If GCP system identities for GCS storage profiles are enabled.
    #[serde(default)]
    pub gcp_system_identities_enabled: bool,
    /// Task queues registered on the server.
    #[serde(default)]
    pub queues: Vec<String>,
}

impl LakekeeperClient {
    /// `GET /management/v1/info`
    pub async fn server_info(&self) -> Result<ServerInfo> {
        self.send_json("get server info", self.get("/management/v1/info"))
            .await
    }

    /// `POST /management/v1/bootstrap`
    ///
    /// A `304 Not Modified` response means the server was already
    /// bootstrapped and is treated as success.
    pub async fn bootstrap(&self, request: &BootstrapRequest) -> Result<()> {
        self.send_status(
            "bootstrap server",
            self.post("/management/v1/bootstrap").json(request),
            &[http::StatusCode::NOT_MODIFIED],
        )
        .await?;
        Ok(())
    }

    /// Bootstrap the server as an application user with admin role unless
    /// it reports itself bootstrapped already. Idempotent.
    pub async fn ensure_bootstrapped(&self) -> Result<()> {
        let info = self.server_info().await?;
        if info.bootstrapped {
            tracing::debug!(server_id = %info.server_id, "server already bootstrapped");
            return Ok(());
        }
        tracing::info!("bootstrapping server");
        self.bootstrap(
            &BootstrapRequest::builder()
                .accept_terms_of_use()
                .is_operator()
                .build(),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bootstrap_request_wire_format() {
        let request = BootstrapRequest::builder()
            .accept_terms_of_use()
            .is_operator()
            .build();
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            serde_json::json!({
                "accept-terms-of-use": true,
                "is-operator": true
            })
        );
    }

    #[test]
    fn server_info_tolerates_missing_optionals() {
        let info: ServerInfo = serde_json::from_value(serde_json::json!({
            "version": "0.9.0",
            "bootstrapped": true,
            "server-id": "00000000-0000-0000-0000-000000000001",
            "authz-backend": "allow-all"
        }))
        .unwrap();
        assert!(info.bootstrapped);
        assert!(info.default_project_id.is_none());
        assert!(info.queues.is_empty());
    }
}
