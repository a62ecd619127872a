use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{
    engine::{AttributePath, Context, DataSource, Diagnostics, EngineResult},
    resources::parse_project_id,
};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectModel {
    /// Project ID to look up; required for `lakekeeper_project`,
    /// computed for `lakekeeper_default_project`.
    #[serde(default)]
    pub id: Option<String>,
    /// Computed.
    #[serde(default)]
    pub name: Option<String>,
}

/// Looks up a project by ID.
#[derive(Debug, Default)]
pub struct ProjectDataSource;

#[async_trait]
impl DataSource for ProjectDataSource {
    type Model = ProjectModel;

    fn type_name(&self) -> &'static str {
        "lakekeeper_project"
    }

    async fn read(&self, ctx: &Context, config: Self::Model) -> EngineResult<Self::Model> {
        let Some(id) = config.id.as_deref() else {
            return Err(Diagnostics::attribute_error(
                AttributePath::root("id"),
                "Missing required attribute `id`",
                "Set `id` to the project ID to look up.",
            ));
        };
        let project_id = parse_project_id(id, "id")?;
        let observed = ctx
            .client
            .get_project(&project_id)
            .await
            .map_err(|e| Diagnostics::client_error("Cannot read project", &e))?;
        Ok(ProjectModel {
            id: Some(observed.project_id.to_string()),
            name: Some(observed.project_name),
        })
    }
}

/// Looks up the server's default project.
#[derive(Debug, Default)]
pub struct DefaultProjectDataSource;

#[async_trait]
impl DataSource for DefaultProjectDataSource {
    type Model = ProjectModel;

    fn type_name(&self) -> &'static str {
        "lakekeeper_default_project"
    }

    async fn read(&self, ctx: &Context, _config: Self::Model) -> EngineResult<Self::Model> {
        let observed = ctx
            .client
            .get_default_project()
            .await
            .map_err(|e| Diagnostics::client_error("Cannot read default project", &e))?;
        Ok(ProjectModel {
            id: Some(observed.project_id.to_string()),
            name: Some(observed.project_name),
        })
    }
}
