use async_trait::async_trait;
use lakekeeper_client::{
    ProjectId, RoleId,
    api::role::{CreateRoleRequest, Role, UpdateRoleRequest},
};
use serde::{Deserialize, Serialize};

use super::{parse_project_id, parse_uuid, require_state_id};
use crate::{
    engine::{Context, Diagnostics, EngineResult, Reconciler},
    ident::{CompositeId, split_composite},
};

/// Engine state model of a role. Persisted under the composite
/// identifier `{project_id}/{role_id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleModel {
    /// Composite identifier. Computed.
    #[serde(default)]
    pub id: Option<String>,
    /// Server-assigned role UUID. Computed.
    #[serde(default)]
    pub role_id: Option<String>,
    /// Project owning the role.
    pub project_id: String,
    /// Name of the role, unique per project.
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Computed.
    #[serde(default)]
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    /// Computed.
    #[serde(default)]
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
}

fn model_from(role: Role) -> RoleModel {
    RoleModel {
        id: Some(CompositeId::new2(role.project_id.to_string(), role.id.to_string()).to_string()),
        role_id: Some(role.id.to_string()),
        project_id: role.project_id.to_string(),
        name: role.name,
        description: role.description,
        created_at: Some(role.created_at),
        updated_at: role.updated_at,
    }
}

fn split_state_id(id: &str) -> Result<(ProjectId, RoleId), Diagnostics> {
    let (project, role) = split_composite(id, "{project_id}/{role_id}")?;
    Ok((
        parse_project_id(&project, "id")?,
        parse_uuid(&role, "id", "role")?,
    ))
}

/// Reconciler for roles.
#[derive(Debug, Default)]
pub struct RoleResource;

#[async_trait]
impl Reconciler for RoleResource {
    type Model = RoleModel;

    fn type_name(&self) -> &'static str {
        "lakekeeper_role"
    }

    async fn create(&self, ctx: &Context, plan: Self::Model) -> EngineResult<Self::Model> {
        let project_id = parse_project_id(&plan.project_id, "project_id")?;
        let request = CreateRoleRequest {
            name: plan.name,
            description: plan.description,
        };

        let role = ctx
            .client
            .create_role(&project_id, &request)
            .await
            .map_err(|e| Diagnostics::client_error("Cannot create role", &e))?;
        Ok(model_from(role))
    }

    async fn read(&self, ctx: &Context, state: Self::Model) -> EngineResult<Option<Self::Model>> {
        let id = require_state_id(state.id.as_ref(), self.type_name())?;
        let (project_id, role_id) = split_state_id(id)?;

        match ctx.client.get_role(&project_id, role_id).await {
            Ok(role) => Ok(Some(model_from(role))),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(Diagnostics::client_error("Cannot read role", &e)),
        }
    }

    async fn update(
        &self,
        ctx: &Context,
        state: Self::Model,
        plan: Self::Model,
    ) -> EngineResult<Self::Model> {
        let id = require_state_id(state.id.as_ref(), self.type_name())?;
        let (project_id, role_id) = split_state_id(id)?;

        // Name and description travel in one update call.
        let request = UpdateRoleRequest {
            name: plan.name,
            description: plan.description,
        };
        let role = ctx
            .client
            .update_role(&project_id, role_id, &request)
            .await
            .map_err(|e| Diagnostics::client_error("Cannot update role", &e))?;
        Ok(model_from(role))
    }

    async fn delete(&self, ctx: &Context, state: Self::Model) -> EngineResult<()> {
        let id = require_state_id(state.id.as_ref(), self.type_name())?;
        let (project_id, role_id) = split_state_id(id)?;
        ctx.client
            .delete_role(&project_id, role_id)
            .await
            .map_err(|e| Diagnostics::client_error("Cannot delete role", &e))
    }

    async fn import_id(&self, _ctx: &Context, id: &str) -> EngineResult<Self::Model> {
        let (project_id, role_id) = split_state_id(id)?;
        Ok(RoleModel {
            id: Some(id.to_string()),
            role_id: Some(role_id.to_string()),
            project_id: project_id.to_string(),
            name: String::new(),
            description: None,
            created_at: None,
            updated_at: None,
        })
    }
}
