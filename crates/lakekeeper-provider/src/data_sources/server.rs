use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::engine::{Context, DataSource, Diagnostics, EngineResult};

/// Observed server information. All attributes are computed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerInfoModel {
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub bootstrapped: Option<bool>,
    #[serde(default)]
    pub server_id: Option<String>,
    #[serde(default)]
    pub default_project_id: Option<String>,
    #[serde(default)]
    pub authz_backend: Option<String>,
    #[serde(default)]
    pub aws_system_identities_enabled: Option<bool>,
    #[serde(default)]
    pub azure_system_identities_enabled: Option<bool>,
    #[serde(default)]
    pub gcp_system_identities_enabled: Option<bool>,
    #[serde(default)]
    pub queues: Option<Vec<String>>,
}

#[derive(Debug, Default)]
pub struct ServerInfoDataSource;

#[async_trait]
impl DataSource for ServerInfoDataSource {
    type Model = ServerInfoModel;

    fn type_name(&self) -> &'static str {
        "lakekeeper_server_info"
    }

    async fn read(&self, ctx: &Context, _config: Self::Model) -> EngineResult<Self::Model> {
        let info = ctx
            .client
            .server_info()
            .await
            .map_err(|e| Diagnostics::client_error("Cannot read server info", &e))?;
        Ok(ServerInfoModel {
            version: Some(info.version),
            bootstrapped: Some(info.bootstrapped),
            server_id: Some(info.server_id.to_string()),
            default_project_id: info.default_project_id.map(|p| p.to_string()),
            authz_backend: Some(info.authz_backend),
            aws_system_identities_enabled: Some(info.aws_system_identities_enabled),
            azure_system_identities_enabled: Some(info.azure_system_identities_enabled),
            gcp_system_identities_enabled: Some(info.gcp_system_identities_enabled),
            queues: Some(info.queues),
        })
    }
}
