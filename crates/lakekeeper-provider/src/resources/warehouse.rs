use async_trait::async_trait;
use lakekeeper_client::{
    ProjectId, WarehouseId,
    api::warehouse::{CreateWarehouseRequest, GetWarehouseResponse},
};
use serde::{Deserialize, Serialize};

use super::{parse_project_id, parse_uuid, require_state_id};
use crate::{
    engine::{Context, Diagnostics, EngineResult, Reconciler},
    ident::{CompositeId, split_composite},
    model::{DeleteProfileModel, StorageProfileModel},
};

const CREATE_CONTEXT: &str = "Incorrect Warehouse creation request";
const UPDATE_CONTEXT: &str = "Incorrect Warehouse update request";
const IMPORT_FORMAT: &str = "{project_id}/{warehouse_id}";

/// Engine state model of a warehouse. Persisted under the composite
/// identifier `{project_id}/{warehouse_id}`.
///
/// The storage credential inside `storage_profile` is locally
/// authoritative: the server never returns it, so refreshes re-attach
/// the value from the prior state and updates always re-send it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WarehouseModel {
    /// Composite identifier. Computed.
    #[serde(default)]
    pub id: Option<String>,
    /// Server-assigned warehouse UUID. Computed.
    #[serde(default)]
    pub warehouse_id: Option<String>,
    pub project_id: String,
    pub name: String,
    /// Whether the warehouse is active. Warehouses are always created
    /// active; plan `false` to deactivate right after creation.
    #[serde(default)]
    pub active: Option<bool>,
    #[serde(default)]
    pub protected: Option<bool>,
    #[serde(default)]
    pub managed_access: Option<bool>,
    pub storage_profile: StorageProfileModel,
    #[serde(default)]
    pub delete_profile: Option<DeleteProfileModel>,
    /// Computed.
    #[serde(default)]
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
}

fn split_state_id(id: &str) -> Result<(ProjectId, WarehouseId), Diagnostics> {
    let (project, warehouse) = split_composite(id, IMPORT_FORMAT)?;
    Ok((
        parse_project_id(&project, "id")?,
        parse_uuid(&warehouse, "id", "warehouse")?,
    ))
}

fn model_from(
    observed: GetWarehouseResponse,
    managed_access: bool,
    prior_profile: Option<&StorageProfileModel>,
) -> WarehouseModel {
    WarehouseModel {
        id: Some(
            CompositeId::new2(
                observed.project_id.to_string(),
                observed.warehouse_id.to_string(),
            )
            .to_string(),
        ),
        warehouse_id: Some(observed.warehouse_id.to_string()),
        project_id: observed.project_id.to_string(),
        name: observed.name,
        active: Some(observed.status.is_active()),
        protected: Some(observed.protected),
        managed_access: Some(managed_access),
        storage_profile: StorageProfileModel::from_observed(
            &observed.storage_profile,
            prior_profile,
        ),
        delete_profile: Some(DeleteProfileModel::from_observed(&observed.delete_profile)),
        updated_at: observed.updated_at,
    }
}

/// Reconciler for warehouses.
#[derive(Debug, Default)]
pub struct WarehouseResource;

impl WarehouseResource {
    async fn refresh(
        ctx: &Context,
        warehouse_id: WarehouseId,
        prior_profile: Option<&StorageProfileModel>,
    ) -> EngineResult<WarehouseModel> {
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
        Ok(model_from(observed, managed_access, prior_profile))
    }
}

#[async_trait]
impl Reconciler for WarehouseResource {
    type Model = WarehouseModel;

    fn type_name(&self) -> &'static str {
        "lakekeeper_warehouse"
    }

    async fn create(&self, ctx: &Context, plan: Self::Model) -> EngineResult<Self::Model> {
        let project_id = parse_project_id(&plan.project_id, "project_id")?;
        let (storage_profile, storage_credential) =
            plan.storage_profile.validate(CREATE_CONTEXT)?;
        let delete_profile = plan
            .delete_profile
            .unwrap_or_default()
            .validate(CREATE_CONTEXT)?;

        let request = CreateWarehouseRequest {
            warehouse_name: plan.name.clone(),
            storage_profile,
            storage_credential: Some(storage_credential),
            delete_profile,
        };
        let created = ctx
            .client
            .create_warehouse(&project_id, &request)
            .await
            .map_err(|e| Diagnostics::client_error("Cannot create warehouse", &e))?;
        let warehouse_id = created.warehouse_id;

        // The server always creates active; follow-up calls bring the
        // warehouse to the planned shape.
        if plan.protected == Some(true) {
            ctx.client
                .set_warehouse_protection(warehouse_id, true)
                .await
                .map_err(|e| Diagnostics::client_error("Cannot protect warehouse", &e))?;
        }
        if plan.active == Some(false) {
            ctx.client
                .deactivate_warehouse(warehouse_id)
                .await
                .map_err(|e| Diagnostics::client_error("Cannot deactivate warehouse", &e))?;
        }
        if let Some(managed_access) = plan.managed_access {
            ctx.client
                .set_warehouse_managed_access(warehouse_id, managed_access)
                .await
                .map_err(|e| {
                    Diagnostics::client_error("Cannot set warehouse managed access", &e)
                })?;
        }

        Self::refresh(ctx, warehouse_id, Some(&plan.storage_profile)).await
    }

    async fn read(&self, ctx: &Context, state: Self::Model) -> EngineResult<Option<Self::Model>> {
        let id = require_state_id(state.id.as_ref(), self.type_name())?;
        let (_, warehouse_id) = split_state_id(id)?;

        let observed = match ctx.client.get_warehouse(warehouse_id).await {
            Ok(observed) => observed,
            Err(e) if e.is_not_found() => return Ok(None),
            Err(e) => return Err(Diagnostics::client_error("Cannot read warehouse", &e)),
        };
        let managed_access = ctx
            .client
            .get_warehouse_managed_access(warehouse_id)
            .await
            .map_err(|e| {
                Diagnostics::client_error("Cannot read warehouse managed access", &e)
            })?;
        Ok(Some(model_from(
            observed,
            managed_access,
            Some(&state.storage_profile),
        )))
    }

    async fn update(
        &self,
        ctx: &Context,
        state: Self::Model,
        plan: Self::Model,
    ) -> EngineResult<Self::Model> {
        let id = require_state_id(state.id.as_ref(), self.type_name())?;
        let (_, warehouse_id) = split_state_id(id)?;

        // Validate the whole plan before mutating anything.
        let (storage_profile, storage_credential) =
            plan.storage_profile.validate(UPDATE_CONTEXT)?;
        let plan_delete_profile = plan.delete_profile.unwrap_or_default();
        let state_delete_profile = state.delete_profile.unwrap_or_default();
        let wire_delete_profile = plan_delete_profile.validate(UPDATE_CONTEXT)?;

        let plan_active = plan.active.unwrap_or(true);
        if plan_active != state.active.unwrap_or(true) {
            if plan_active {
                ctx.client
                    .activate_warehouse(warehouse_id)
                    .await
                    .map_err(|e| Diagnostics::client_error("Cannot activate warehouse", &e))?;
            } else {
                ctx.client
                    .deactivate_warehouse(warehouse_id)
                    .await
                    .map_err(|e| {
                        Diagnostics::client_error("Cannot deactivate warehouse", &e)
                    })?;
            }
        }

        if plan.name != state.name {
            ctx.client
                .rename_warehouse(warehouse_id, &plan.name)
                .await
                .map_err(|e| Diagnostics::client_error("Cannot rename warehouse", &e))?;
        }

        let plan_protected = plan.protected.unwrap_or(false);
        if plan_protected != state.protected.unwrap_or(false) {
            tracing::debug!(%warehouse_id, protected = plan_protected, "changing warehouse protection");
            ctx.client
                .set_warehouse_protection(warehouse_id, plan_protected)
                .await
                .map_err(|e| {
                    Diagnostics::client_error("Cannot change warehouse protection", &e)
                })?;
        }

        if plan_delete_profile != state_delete_profile {
            ctx.client
                .update_warehouse_delete_profile(warehouse_id, wire_delete_profile)
                .await
                .map_err(|e| {
                    Diagnostics::client_error("Cannot update warehouse delete profile", &e)
                })?;
        }

        // The credential is not observable, so profile and credential
        // are re-sent on every update.
        ctx.client
            .update_warehouse_storage(warehouse_id, storage_profile, Some(storage_credential))
            .await
            .map_err(|e| {
                Diagnostics::client_error("Cannot update warehouse storage profile", &e)
            })?;

        if let Some(managed_access) = plan.managed_access {
            if state.managed_access != Some(managed_access) {
                ctx.client
                    .set_warehouse_managed_access(warehouse_id, managed_access)
                    .await
                    .map_err(|e| {
                        Diagnostics::client_error("Cannot set warehouse managed access", &e)
                    })?;
            }
        }

        Self::refresh(ctx, warehouse_id, Some(&plan.storage_profile)).await
    }

    async fn delete(&self, ctx: &Context, state: Self::Model) -> EngineResult<()> {
        let id = require_state_id(state.id.as_ref(), self.type_name())?;
        let (_, warehouse_id) = split_state_id(id)?;
        ctx.client
            .delete_warehouse(warehouse_id, true)
            .await
            .map_err(|e| Diagnostics::client_error("Cannot delete warehouse", &e))
    }

    /// Import is possible, with a caveat the server imposes: storage
    /// credentials are never echoed, so the imported state carries an
    /// empty credential and the first subsequent apply re-sends it from
    /// configuration.
    async fn import_id(&self, _ctx: &Context, id: &str) -> EngineResult<Self::Model> {
        let (project_id, warehouse_id) = split_state_id(id)?;
        Ok(WarehouseModel {
            id: Some(id.to_string()),
            warehouse_id: Some(warehouse_id.to_string()),
            project_id: project_id.to_string(),
            name: String::new(),
            active: None,
            protected: None,
            managed_access: None,
            storage_profile: StorageProfileModel::default(),
            delete_profile: None,
            updated_at: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn composite_id_round_trip() {
        let id = "00000000-0000-0000-0000-000000000000/01f0a0e0-0000-7000-8000-00000000cafe";
        let (project, warehouse) = split_state_id(id).unwrap();
        assert_eq!(
            CompositeId::new2(project.to_string(), warehouse.to_string()).to_string(),
            id
        );
    }

    #[test]
    fn bad_composite_ids_are_import_errors() {
        assert!(split_state_id("justone").is_err());
        assert!(split_state_id("p/notauuid").is_err());
    }
}
