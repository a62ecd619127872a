use serde::{Deserialize, Serialize};

use crate::{LakekeeperClient, ProjectId, client::X_PROJECT_ID_HEADER, error::Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CreateProjectRequest {
    /// Name of the project to create. Does not have to be unique.
    pub project_name: String,
    /// Request a specific project ID. Assigned by the server if absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<ProjectId>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CreateProjectResponse {
    /// ID of the created project.
    pub project_id: ProjectId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct GetProjectResponse {
    /// ID of the project.
    pub project_id: ProjectId,
    /// Name of the project.
    pub project_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ListProjectsResponse {
    /// Projects visible to the caller.
    pub projects: Vec<GetProjectResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RenameProjectRequest {
    /// New name for the project.
    pub new_name: String,
}

impl LakekeeperClient {
    /// `POST /management/v1/project`
    pub async fn create_project(&self, name: &str) -> Result<CreateProjectResponse> {
        let request = CreateProjectRequest {
            project_name: name.to_string(),
            project_id: None,
        };
        self.send_json(
            "create project",
            self.post("/management/v1/project").json(&request),
        )
        .await
    }

    /// `GET /management/v1/project` scoped via the `x-project-id` header.
    pub async fn get_project(&self, id: &ProjectId) -> Result<GetProjectResponse> {
        self.send_json(
            "get project",
            self.get("/management/v1/project")
                .header(X_PROJECT_ID_HEADER, id.as_str()),
        )
        .await
    }

    /// `GET /management/v1/default-project`
    pub async fn get_default_project(&self) -> Result<GetProjectResponse> {
        self.send_json(
            "get default project",
            self.get("/management/v1/default-project"),
        )
        .await
    }

    /// `GET /management/v1/project-list`
    pub async fn list_projects(&self) -> Result<ListProjectsResponse> {
        self.send_json("list projects", self.get("/management/v1/project-list"))
            .await
    }

    /// `POST /management/v1/project/rename`
    pub async fn rename_project(&self, id: &ProjectId, new_name: &str) -> Result<()> {
        let request = RenameProjectRequest {
            new_name: new_name.to_string(),
        };
        self.send_unit(
            "rename project",
            self.post("/management/v1/project/rename")
                .header(X_PROJECT_ID_HEADER, id.as_str())
                .json(&request),
        )
        .await
    }

    /// `DELETE /management/v1/project`
    pub async fn delete_project(&self, id: &ProjectId) -> Result<()> {
        self.send_unit(
            "delete project",
            self.delete("/management/v1/project")
                .header(X_PROJECT_ID_HEADER, id.as_str()),
        )
        .await
    }
}
