use std::str::FromStr;

use async_trait::async_trait;
use lakekeeper_client::{UserId, api::user::User};
use serde::{Deserialize, Serialize};

use crate::engine::{AttributePath, Context, DataSource, Diagnostics, EngineResult};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserModel {
    /// User ID to look up; required for `lakekeeper_user`, computed for
    /// `lakekeeper_whoami`.
    #[serde(default)]
    pub id: Option<String>,
    /// Computed.
    #[serde(default)]
    pub name: Option<String>,
    /// Computed.
    #[serde(default)]
    pub email: Option<String>,
    /// Computed.
    #[serde(default)]
    pub user_type: Option<String>,
    /// Computed.
    #[serde(default)]
    pub last_updated_with: Option<String>,
    /// Computed.
    #[serde(default)]
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    /// Computed.
    #[serde(default)]
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
}

fn model_from(user: User) -> UserModel {
    UserModel {
        id: Some(user.id.to_string()),
        name: Some(user.name),
        email: user.email,
        user_type: Some(user.user_type.to_string()),
        last_updated_with: Some(user.last_updated_with.to_string()),
        created_at: Some(user.created_at),
        updated_at: user.updated_at,
    }
}

/// Looks up a user by ID.
#[derive(Debug, Default)]
pub struct UserDataSource;

#[async_trait]
impl DataSource for UserDataSource {
    type Model = UserModel;

    fn type_name(&self) -> &'static str {
        "lakekeeper_user"
    }

    async fn read(&self, ctx: &Context, config: Self::Model) -> EngineResult<Self::Model> {
        let Some(raw) = config.id.as_deref() else {
            return Err(Diagnostics::attribute_error(
                AttributePath::root("id"),
                "Missing required attribute `id`",
                "Set `id` to the user ID to look up.",
            ));
        };
        let id = UserId::from_str(raw).map_err(|e| {
            Diagnostics::attribute_error(AttributePath::root("id"), "Invalid user ID", e.to_string())
        })?;
        let user = ctx
            .client
            .get_user(&id)
            .await
            .map_err(|e| Diagnostics::client_error("Cannot read user", &e))?;
        Ok(model_from(user))
    }
}

/// The identity behind the configured credentials.
#[derive(Debug, Default)]
pub struct WhoamiDataSource;

#[async_trait]
impl DataSource for WhoamiDataSource {
    type Model = UserModel;

    fn type_name(&self) -> &'static str {
        "lakekeeper_whoami"
    }

    async fn read(&self, ctx: &Context, _config: Self::Model) -> EngineResult<Self::Model> {
        let user = ctx
            .client
            .whoami()
            .await
            .map_err(|e| Diagnostics::client_error("Cannot read current user", &e))?;
        Ok(model_from(user))
    }
}
