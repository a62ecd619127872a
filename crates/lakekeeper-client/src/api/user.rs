use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

use crate::{LakekeeperClient, UserId, error::Result};

#[derive(
    Debug,
    Clone,
    Copy,
    Eq,
    PartialEq,
    Serialize,
    Deserialize,
    strum_macros::Display,
    strum_macros::EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum UserType {
    Human,
    Application,
}

/// Which endpoint last mutated a user record. Reported by the server,
/// never sent.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize, strum_macros::Display)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum UserLastUpdatedWith {
    CreateEndpoint,
    ConfigCallCreation,
    UpdateEndpoint,
}

#[derive(Debug, Clone, Serialize, Deserialize, TypedBuilder)]
#[serde(rename_all = "kebab-case")]
pub struct ProvisionUserRequest {
    /// Identity-provider-prefixed user id (`oidc~...` / `kubernetes~...`).
    pub id: UserId,
    /// Display name of the user.
    #[builder(setter(into))]
    pub name: String,
    /// Email of the user.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[builder(default, setter(strip_option, into))]
    pub email: Option<String>,
    /// Type of the user.
    pub user_type: UserType,
    /// When true, an existing record with the same id is updated in
    /// place instead of failing with a conflict.
    #[serde(default)]
    #[builder(default)]
    pub update_if_exists: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct User {
    /// Identity-provider-prefixed user id.
    pub id: UserId,
    /// Display name of the user.
    pub name: String,
    /// Email of the user.
    #[serde(default)]
    pub email: Option<String>,
    /// Type of the user.
    pub user_type: UserType,
    /// Endpoint which last mutated this record.
    pub last_updated_with: UserLastUpdatedWith,
    /// Timestamp when the user was created.
    pub created_at: chrono::DateTime<chrono::Utc>,
    /// Timestamp when the user was last updated.
    #[serde(default)]
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ListUsersResponse {
    pub users: Vec<User>,
    #[serde(default, alias = "next_page_token")]
    pub next_page_token: Option<String>,
}

impl LakekeeperClient {
    /// `GET /management/v1/whoami`
    pub async fn whoami(&self) -> Result<User> {
        self.send_json("whoami", self.get("/management/v1/whoami"))
            .await
    }

    /// `POST /management/v1/user` — create or upsert, depending on
    /// `update_if_exists`.
    pub async fn provision_user(&self, request: &ProvisionUserRequest) -> Result<User> {
        self.send_json(
            "provision user",
            self.post("/management/v1/user").json(request),
        )
        .await
    }

    /// `GET /management/v1/user/{user_id}`
    pub async fn get_user(&self, id: &UserId) -> Result<User> {
        self.send_json(
            "get user",
            self.get(&format!(
                "/management/v1/user/{}",
                crate::catalog::encode_path_segment(id.as_str())
            )),
        )
        .await
    }

    /// `DELETE /management/v1/user/{user_id}`
    pub async fn delete_user(&self, id: &UserId) -> Result<()> {
        self.send_unit(
            "delete user",
            self.delete(&format!(
                "/management/v1/user/{}",
                crate::catalog::encode_path_segment(id.as_str())
            )),
        )
        .await
    }

    /// `GET /management/v1/user`, optionally filtered by name.
    pub async fn list_users(
        &self,
        name_filter: Option<&str>,
        page_token: Option<&str>,
    ) -> Result<ListUsersResponse> {
        let mut builder = self.get("/management/v1/user");
        if let Some(name) = name_filter {
            builder = builder.query(&[("name", name)]);
        }
        if let Some(token) = page_token {
            builder = builder.query(&[("pageToken", token)]);
        }
        self.send_json("list users", builder).await
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn provision_request_wire_format() {
        let request = ProvisionUserRequest::builder()
            .id(UserId::from_str("oidc~abc").unwrap())
            .name("Ada")
            .user_type(UserType::Human)
            .build();
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            serde_json::json!({
                "id": "oidc~abc",
                "name": "Ada",
                "user-type": "human",
                "update-if-exists": false
            })
        );
    }

    #[test]
    fn user_decodes_server_payload() {
        let user: User = serde_json::from_value(serde_json::json!({
            "id": "oidc~abc",
            "name": "Ada",
            "user-type": "application",
            "last-updated-with": "create-endpoint",
            "created-at": "2025-02-03T04:05:06Z"
        }))
        .unwrap();
        assert_eq!(user.user_type, UserType::Application);
        assert_eq!(user.last_updated_with, UserLastUpdatedWith::CreateEndpoint);
    }
}
