use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

use crate::{
    LakekeeperClient, ProjectId, RoleId, client::X_PROJECT_ID_HEADER, error::Result,
};

#[derive(Debug, Clone, Serialize, Deserialize, TypedBuilder)]
#[serde(rename_all = "kebab-case")]
pub struct CreateRoleRequest {
    /// Name of the role to create. Must be unique within the project.
    #[builder(setter(into))]
    pub name: String,
    /// Description of the role.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[builder(default, setter(strip_option, into))]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct UpdateRoleRequest {
    /// New name of the role.
    pub name: String,
    /// New description. If not set, the description is removed.
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Role {
    /// Globally unique id of this role.
    pub id: RoleId,
    /// Name of the role.
    pub name: String,
    /// Description of the role.
    #[serde(default)]
    pub description: Option<String>,
    /// Project ID in which the role was created.
    pub project_id: ProjectId,
    /// Timestamp when the role was created.
    pub created_at: chrono::DateTime<chrono::Utc>,
    /// Timestamp when the role was last updated.
    #[serde(default)]
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ListRolesResponse {
    pub roles: Vec<Role>,
    #[serde(default, alias = "next_page_token")]
    pub next_page_token: Option<String>,
}

impl LakekeeperClient {
    /// `POST /management/v1/role` scoped via the `x-project-id` header.
    pub async fn create_role(
        &self,
        project_id: &ProjectId,
        request: &CreateRoleRequest,
    ) -> Result<Role> {
        self.send_json(
            "create role",
            self.post("/management/v1/role")
                .header(X_PROJECT_ID_HEADER, project_id.as_str())
                .json(request),
        )
        .await
    }

    /// `GET /management/v1/role/{role_id}`
    pub async fn get_role(&self, project_id: &ProjectId, role_id: RoleId) -> Result<Role> {
        self.send_json(
            "get role",
            self.get(&format!("/management/v1/role/{role_id}"))
                .header(X_PROJECT_ID_HEADER, project_id.as_str()),
        )
        .await
    }

    /// `POST /management/v1/role/{role_id}`
    pub async fn update_role(
        &self,
        project_id: &ProjectId,
        role_id: RoleId,
        request: &UpdateRoleRequest,
    ) -> Result<Role> {
        self.send_json(
            "update role",
            self.post(&format!("/management/v1/role/{role_id}"))
                .header(X_PROJECT_ID_HEADER, project_id.as_str())
                .json(request),
        )
        .await
    }

    /// `DELETE /management/v1/role/{role_id}`
    pub async fn delete_role(&self, project_id: &ProjectId, role_id: RoleId) -> Result<()> {
        self.send_unit(
            "delete role",
            self.delete(&format!("/management/v1/role/{role_id}"))
                .header(X_PROJECT_ID_HEADER, project_id.as_str()),
        )
        .await
    }

    /// `GET /management/v1/role`, optionally filtered by name.
    pub async fn list_roles(
        &self,
        project_id: &ProjectId,
        name_filter: Option<&str>,
        page_token: Option<&str>,
    ) -> Result<ListRolesResponse> {
        let mut builder = self
            .get("/management/v1/role")
            .header(X_PROJECT_ID_HEADER, project_id.as_str());
        if let Some(name) = name_filter {
            builder = builder.query(&[("name", name)]);
        }
        if let Some(token) = page_token {
            builder = builder.query(&[("pageToken", token)]);
        }
        self.send_json("list roles", builder).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_decodes_server_payload() {
        let role: Role = serde_json::from_value(serde_json::json!({
            "id": "01f0a0e0-0000-7000-8000-00000000abcd",
            "name": "data-engineers",
            "description": "ETL crew",
            "project-id": "01f0a0e0-0000-7000-8000-000000000000",
            "created-at": "2025-02-03T04:05:06Z"
        }))
        .unwrap();
        assert_eq!(role.name, "data-engineers");
        assert!(role.updated_at.is_none());
    }

    #[test]
    fn update_request_carries_explicit_null_description() {
        let request = UpdateRoleRequest {
            name: "renamed".to_string(),
            description: None,
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            serde_json::json!({"name": "renamed", "description": null})
        );
    }
}
