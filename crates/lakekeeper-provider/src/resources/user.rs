use std::str::FromStr;

use async_trait::async_trait;
use lakekeeper_client::{
    UserId,
    api::user::{ProvisionUserRequest, User, UserType},
};
use serde::{Deserialize, Serialize};

use crate::engine::{AttributePath, Context, Diagnostics, EngineResult, Reconciler};

/// Engine state model of a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserModel {
    /// Identity-provider-prefixed user id, sent verbatim.
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    pub user_type: UserType,
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
        id: user.id.to_string(),
        name: user.name,
        email: user.email,
        user_type: user.user_type,
        last_updated_with: Some(user.last_updated_with.to_string()),
        created_at: Some(user.created_at),
        updated_at: user.updated_at,
    }
}

fn parse_user_id(raw: &str) -> Result<UserId, Diagnostics> {
    UserId::from_str(raw).map_err(|e| {
        Diagnostics::attribute_error(
            AttributePath::root("id"),
            "Invalid user ID",
            e.to_string(),
        )
    })
}

/// Reconciler for users. Create and update are both provision calls;
/// update flips `update-if-exists` to make the operation an upsert.
#[derive(Debug, Default)]
pub struct UserResource;

impl UserResource {
    async fn provision(
        ctx: &Context,
        plan: UserModel,
        update_if_exists: bool,
    ) -> EngineResult<UserModel> {
        let id = parse_user_id(&plan.id)?;
        let request = ProvisionUserRequest {
            id,
            name: plan.name,
            email: plan.email,
            user_type: plan.user_type,
            update_if_exists,
        };
        let user = ctx
            .client
            .provision_user(&request)
            .await
            .map_err(|e| Diagnostics::client_error("Cannot provision user", &e))?;
        Ok(model_from(user))
    }
}

#[async_trait]
impl Reconciler for UserResource {
    type Model = UserModel;

    fn type_name(&self) -> &'static str {
        "lakekeeper_user"
    }

    async fn create(&self, ctx: &Context, plan: Self::Model) -> EngineResult<Self::Model> {
        Self::provision(ctx, plan, false).await
    }

    async fn read(&self, ctx: &Context, state: Self::Model) -> EngineResult<Option<Self::Model>> {
        let id = parse_user_id(&state.id)?;
        match ctx.client.get_user(&id).await {
            Ok(user) => Ok(Some(model_from(user))),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(Diagnostics::client_error("Cannot read user", &e)),
        }
    }

    async fn update(
        &self,
        ctx: &Context,
        _state: Self::Model,
        plan: Self::Model,
    ) -> EngineResult<Self::Model> {
        Self::provision(ctx, plan, true).await
    }

    async fn delete(&self, ctx: &Context, state: Self::Model) -> EngineResult<()> {
        let id = parse_user_id(&state.id)?;
        ctx.client
            .delete_user(&id)
            .await
            .map_err(|e| Diagnostics::client_error("Cannot delete user", &e))
    }

    async fn import_id(&self, _ctx: &Context, id: &str) -> EngineResult<Self::Model> {
        parse_user_id(id)?;
        Ok(UserModel {
            id: id.to_string(),
            name: String::new(),
            email: None,
            user_type: UserType::Human,
            last_updated_with: None,
            created_at: None,
            updated_at: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_id_pattern_is_enforced() {
        assert!(parse_user_id("oidc~alice").is_ok());
        assert!(parse_user_id("kubernetes~svc").is_ok());
        let err = parse_user_id("alice").unwrap_err();
        assert!(err.to_string().contains("Invalid user ID"), "{err}");
    }
}
