//! Provider assembly. Every resource and data-source factory is listed
//! here explicitly; there is no registration through side effects.

use std::{collections::BTreeMap, sync::Arc};

use lakekeeper_client::{CancellationToken, LakekeeperClient, LakekeeperError};
use tokio::sync::OnceCell;

use crate::{
    config::ProviderConfig,
    data_sources::{
        access::AccessDataSource,
        assignments::AssignmentsDataSource,
        project::{DefaultProjectDataSource, ProjectDataSource},
        role::RoleDataSource,
        server::ServerInfoDataSource,
        user::{UserDataSource, WhoamiDataSource},
        warehouse::WarehouseDataSource,
    },
    engine::{Context, Diagnostics, DynDataSource, DynReconciler, EngineResult},
    resources::{
        assignment::AssignmentResource, namespace::NamespaceResource, project::ProjectResource,
        role::RoleResource, user::UserResource, warehouse::WarehouseResource,
    },
};

/// The assembled provider: configuration, a lazily-built shared client,
/// and the registries the engine host dispatches into.
pub struct Provider {
    config: ProviderConfig,
    client: OnceCell<LakekeeperClient>,
    reconcilers: BTreeMap<&'static str, Arc<dyn DynReconciler>>,
    data_sources: BTreeMap<&'static str, Arc<dyn DynDataSource>>,
}

impl std::fmt::Debug for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Provider")
            .field("config", &self.config)
            .field("resources", &self.reconcilers.keys().collect::<Vec<_>>())
            .field("data_sources", &self.data_sources.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

impl Provider {
    #[must_use]
    pub fn new(config: ProviderConfig) -> Self {
        let reconcilers: Vec<Arc<dyn DynReconciler>> = vec![
            Arc::new(ProjectResource),
            Arc::new(RoleResource),
            Arc::new(UserResource),
            Arc::new(WarehouseResource),
            Arc::new(NamespaceResource),
            Arc::new(AssignmentResource::server_user()),
            Arc::new(AssignmentResource::server_role()),
            Arc::new(AssignmentResource::project_user()),
            Arc::new(AssignmentResource::project_role()),
            Arc::new(AssignmentResource::role_user()),
            Arc::new(AssignmentResource::role_role()),
            Arc::new(AssignmentResource::warehouse_user()),
            Arc::new(AssignmentResource::warehouse_role()),
        ];
        let data_sources: Vec<Arc<dyn DynDataSource>> = vec![
            Arc::new(ServerInfoDataSource),
            Arc::new(DefaultProjectDataSource),
            Arc::new(ProjectDataSource),
            Arc::new(RoleDataSource),
            Arc::new(UserDataSource),
            Arc::new(WhoamiDataSource),
            Arc::new(WarehouseDataSource),
            Arc::new(AssignmentsDataSource::server()),
            Arc::new(AssignmentsDataSource::project()),
            Arc::new(AssignmentsDataSource::role()),
            Arc::new(AssignmentsDataSource::warehouse()),
            Arc::new(AccessDataSource::server()),
            Arc::new(AccessDataSource::project()),
            Arc::new(AccessDataSource::role()),
            Arc::new(AccessDataSource::warehouse()),
        ];

        Self {
            config,
            client: OnceCell::new(),
            reconcilers: reconcilers
                .into_iter()
                .map(|r| (r.type_name(), r))
                .collect(),
            data_sources: data_sources
                .into_iter()
                .map(|d| (d.type_name(), d))
                .collect(),
        }
    }

    #[must_use]
    pub fn reconciler(&self, type_name: &str) -> Option<Arc<dyn DynReconciler>> {
        self.reconcilers.get(type_name).cloned()
    }

    #[must_use]
    pub fn data_source(&self, type_name: &str) -> Option<Arc<dyn DynDataSource>> {
        self.data_sources.get(type_name).cloned()
    }

    pub fn resource_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.reconcilers.keys().copied()
    }

    pub fn data_source_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.data_sources.keys().copied()
    }

    /// The shared client, built (and the server optionally bootstrapped)
    /// on first use.
    pub async fn client(&self) -> Result<&LakekeeperClient, Diagnostics> {
        self.client
            .get_or_try_init(|| async {
                let config = self.config.resolve()?;
                tracing::debug!(endpoint = %config.base_url, "building Lakekeeper client");
                LakekeeperClient::connect(config).await.map_err(|e| match &e {
                    LakekeeperError::Config(_) => {
                        Diagnostics::client_error("Invalid provider configuration", &e)
                    }
                    LakekeeperError::Auth(_) => {
                        Diagnostics::client_error("Cannot authenticate against Lakekeeper", &e)
                    }
                    _ => Diagnostics::client_error("Cannot connect to Lakekeeper", &e),
                })
            })
            .await
    }

    /// Build the per-operation context, threading the engine's
    /// cancellation token into every outgoing call.
    pub async fn context(&self, cancellation: CancellationToken) -> EngineResult<Context> {
        let client = self.client().await?;
        Ok(Context::new(client.with_cancellation(cancellation)))
    }
}
