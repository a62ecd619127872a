use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{parse_project_id, require_state_id};
use crate::engine::{Context, Diagnostics, EngineResult, Reconciler};

/// Engine state model of a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectModel {
    /// Server-assigned project ID. Computed.
    #[serde(default)]
    pub id: Option<String>,
    /// Name of the project.
    pub name: String,
}

/// Reconciler for projects.
#[derive(Debug, Default)]
pub struct ProjectResource;

#[async_trait]
impl Reconciler for ProjectResource {
    type Model = ProjectModel;

    fn type_name(&self) -> &'static str {
        "lakekeeper_project"
    }

    async fn create(&self, ctx: &Context, plan: Self::Model) -> EngineResult<Self::Model> {
        let created = ctx
            .client
            .create_project(&plan.name)
            .await
            .map_err(|e| Diagnostics::client_error("Cannot create project", &e))?;

        let observed = ctx
            .client
            .get_project(&created.project_id)
            .await
            .map_err(|e| Diagnostics::client_error("Cannot read back created project", &e))?;

        Ok(ProjectModel {
            id: Some(observed.project_id.to_string()),
            name: observed.project_name,
        })
    }

    async fn read(&self, ctx: &Context, state: Self::Model) -> EngineResult<Option<Self::Model>> {
        let id = require_state_id(state.id.as_ref(), self.type_name())?;
        let project_id = parse_project_id(id, "id")?;

        match ctx.client.get_project(&project_id).await {
            Ok(observed) => Ok(Some(ProjectModel {
                id: Some(observed.project_id.to_string()),
                name: observed.project_name,
            })),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(Diagnostics::client_error("Cannot read project", &e)),
        }
    }

    async fn update(
        &self,
        ctx: &Context,
        state: Self::Model,
        plan: Self::Model,
    ) -> EngineResult<Self::Model> {
        let id = require_state_id(state.id.as_ref(), self.type_name())?;
        let project_id = parse_project_id(id, "id")?;

        if plan.name != state.name {
            ctx.client
                .rename_project(&project_id, &plan.name)
                .await
                .map_err(|e| Diagnostics::client_error("Cannot rename project", &e))?;
        }

        let observed = ctx
            .client
            .get_project(&project_id)
            .await
            .map_err(|e| Diagnostics::client_error("Cannot read back updated project", &e))?;
        Ok(ProjectModel {
            id: Some(observed.project_id.to_string()),
            name: observed.project_name,
        })
    }

    async fn delete(&self, ctx: &Context, state: Self::Model) -> EngineResult<()> {
        let id = require_state_id(state.id.as_ref(), self.type_name())?;
        let project_id = parse_project_id(id, "id")?;
        ctx.client
            .delete_project(&project_id)
            .await
            .map_err(|e| Diagnostics::client_error("Cannot delete project", &e))
    }

    async fn import_id(&self, _ctx: &Context, id: &str) -> EngineResult<Self::Model> {
        parse_project_id(id, "id")?;
        Ok(ProjectModel {
            id: Some(id.to_string()),
            name: String::new(),
        })
    }
}
