use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{
    engine::{AttributePath, Context, DataSource, Diagnostics, EngineResult},
    model::{DeleteProfileModel, StorageProfileModel},
    resources::parse_uuid,
};

/// Observed warehouse. The storage profile is reported as the server
/// sees it; credentials are never returned and stay empty here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WarehouseModel {
    /// Warehouse ID to look up.
    #[serde(default)]
    pub warehouse_id: Option<String>,
    /// Computed.
    #[serde(default)]
    pub project_id: Option<String>,
    /// Computed.
    #[serde(default)]
    pub name: Option<String>,
    /// Computed.
    #[serde(default)]
    pub active: Option<bool>,
    /// Computed.
    #[serde(default)]
    pub protected: Option<bool>,
    /// Computed.
    #[serde(default)]
    pub managed_access: Option<bool>,
    /// Computed.
    #[serde(default)]
    pub storage_profile: Option<StorageProfileModel>,
    /// Computed.
    #[serde(default)]
    pub delete_profile: Option<DeleteProfileModel>,
    /// Computed.
    #[serde(default)]
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
}

#[derive(Debug, Default)]
pub struct WarehouseDataSource;

#[async_trait]
impl DataSource for WarehouseDataSource {
    type Model = WarehouseModel;

    fn type_name(&self) -> &'static str {
        "lakekeeper_warehouse"
    }

    async fn read(&self, ctx: &Context, config: Self::Model) -> EngineResult<Self::Model> {
        let Some(raw) = config.warehouse_id.as_deref() else {
            return Err(Diagnostics::attribute_error(
                AttributePath::root("warehouse_id"),
                "Missing required attribute `warehouse_id`",
                "Set `warehouse_id` to the warehouse UUID to look up.",
            ));
        };
        let warehouse_id = parse_uuid(raw, "warehouse_id", "warehouse")?;

        let observed = ctx
            .client
            .get_warehouse(warehouse_id)
            .await
            .map_err(|e| Diagnostics::client_error("Cannot read warehouse", &e))?;
        let managed_access = ctx
            .client
            .get_warehouse_managed_access(warehouse_id)
            .await
            .map_err(|e| {
                Diagnostics::client_error("Cannot read warehouse managed access", &e)
            })?;

        Ok(WarehouseModel {
            warehouse_id: Some(observed.warehouse_id.to_string()),
            project_id: Some(observed.project_id.to_string()),
            name: Some(observed.name.clone()),
            active: Some(observed.status.is_active()),
            protected: Some(observed.protected),
            managed_access: Some(managed_access),
            storage_profile: Some(StorageProfileModel::from_observed(
                &observed.storage_profile,
                None,
            )),
            delete_profile: Some(DeleteProfileModel::from_observed(&observed.delete_profile)),
            updated_at: observed.updated_at,
        })
    }
}
