use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{
    engine::{AttributePath, Context, DataSource, Diagnostics, EngineResult},
    resources::{parse_project_id, parse_uuid},
};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleModel {
    /// Project to search in.
    #[serde(default)]
    pub project_id: Option<String>,
    /// Role ID; either this or `name` must be set.
    #[serde(default)]
    pub role_id: Option<String>,
    /// Role name; used for an exact-match lookup when `role_id` is
    /// absent.
    #[serde(default)]
    pub name: Option<String>,
    /// Computed.
    #[serde(default)]
    pub description: Option<String>,
    /// Computed.
    #[serde(default)]
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    /// Computed.
    #[serde(default)]
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// Looks up a role by ID or by exact name within a project.
#[derive(Debug, Default)]
pub struct RoleDataSource;

#[async_trait]
impl DataSource for RoleDataSource {
    type Model = RoleModel;

    fn type_name(&self) -> &'static str {
        "lakekeeper_role"
    }

    async fn read(&self, ctx: &Context, config: Self::Model) -> EngineResult<Self::Model> {
        let Some(project) = config.project_id.as_deref() else {
            return Err(Diagnostics::attribute_error(
                AttributePath::root("project_id"),
                "Missing required attribute `project_id`",
                "Roles are scoped to a project.",
            ));
        };
        let project_id = parse_project_id(project, "project_id")?;

        let role = match (&config.role_id, &config.name) {
            (Some(role_id), _) => {
                let role_id = parse_uuid(role_id, "role_id", "role")?;
                ctx.client
                    .get_role(&project_id, role_id)
                    .await
                    .map_err(|e| Diagnostics::client_error("Cannot read role", &e))?
            }
            (None, Some(name)) => {
                let listed = ctx
                    .client
                    .list_roles(&project_id, Some(name), None)
                    .await
                    .map_err(|e| Diagnostics::client_error("Cannot list roles", &e))?;
                listed
                    .roles
                    .into_iter()
                    .find(|r| r.name == *name)
                    .ok_or_else(|| {
                        Diagnostics::error(
                            "Role not found",
                            format!("No role named `{name}` exists in project `{project_id}`."),
                        )
                    })?
            }
            (None, None) => {
                return Err(Diagnostics::attribute_error(
                    AttributePath::root("role_id"),
                    "Missing lookup key",
                    "Set either `role_id` or `name`.",
                ));
            }
        };

        Ok(RoleModel {
            project_id: Some(role.project_id.to_string()),
            role_id: Some(role.id.to_string()),
            name: Some(role.name),
            description: role.description,
            created_at: Some(role.created_at),
            updated_at: role.updated_at,
        })
    }
}
