use std::str::FromStr;

use async_trait::async_trait;
use lakekeeper_client::{RoleId, UserId, api::permissions::UserOrRole};
use serde::{Deserialize, Serialize};

use super::assignments::AssignmentsDataSource;
use crate::{
    engine::{AttributePath, Context, DataSource, Diagnostics, EngineResult},
    resources::assignment::ObjectKind,
};

/// Effective allowed actions of a principal on one object. Without a
/// principal, the access of the calling identity is reported.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessModel {
    /// Object ID; unused for the server data source.
    #[serde(default)]
    pub object_id: Option<String>,
    /// User principal; at most one of `user_id` / `role_id`.
    #[serde(default)]
    pub user_id: Option<String>,
    /// Role principal; at most one of `user_id` / `role_id`.
    #[serde(default)]
    pub role_id: Option<String>,
    /// Computed.
    #[serde(default)]
    pub allowed_actions: Vec<String>,
}

/// Generic allowed-actions data source over the object kind.
#[derive(Debug)]
pub struct AccessDataSource {
    type_name: &'static str,
    object: ObjectKind,
}

impl AccessDataSource {
    #[must_use]
    pub fn server() -> Self {
        Self {
            type_name: "lakekeeper_server_access",
            object: ObjectKind::Server,
        }
    }

    #[must_use]
    pub fn project() -> Self {
        Self {
            type_name: "lakekeeper_project_access",
            object: ObjectKind::Project,
        }
    }

    #[must_use]
    pub fn role() -> Self {
        Self {
            type_name: "lakekeeper_role_access",
            object: ObjectKind::Role,
        }
    }

    #[must_use]
    pub fn warehouse() -> Self {
        Self {
            type_name: "lakekeeper_warehouse_access",
            object: ObjectKind::Warehouse,
        }
    }

    fn principal(config: &AccessModel) -> Result<Option<UserOrRole>, Diagnostics> {
        match (&config.user_id, &config.role_id) {
            (Some(_), Some(_)) => Err(Diagnostics::attribute_error(
                AttributePath::root("user_id"),
                "Conflicting principal attributes",
                "Set at most one of `user_id` and `role_id`.",
            )),
            (Some(user), None) => UserId::from_str(user)
                .map(|id| Some(UserOrRole::User(id)))
                .map_err(|e| {
                    Diagnostics::attribute_error(
                        AttributePath::root("user_id"),
                        "Invalid user ID",
                        e.to_string(),
                    )
                }),
            (None, Some(role)) => RoleId::from_str(role)
                .map(|id| Some(UserOrRole::Role(id)))
                .map_err(|e| {
                    Diagnostics::attribute_error(
                        AttributePath::root("role_id"),
                        "Invalid role ID",
                        e.to_string(),
                    )
                }),
            (None, None) => Ok(None),
        }
    }
}

#[async_trait]
impl DataSource for AccessDataSource {
    type Model = AccessModel;

    fn type_name(&self) -> &'static str {
        self.type_name
    }

    async fn read(&self, ctx: &Context, config: Self::Model) -> EngineResult<Self::Model> {
        let object =
            AssignmentsDataSource::resolve_object(self.object, config.object_id.as_deref())?;
        let principal = Self::principal(&config)?;

        let mut allowed_actions = ctx
            .client
            .get_access(&object, principal.as_ref())
            .await
            .map_err(|e| {
                Diagnostics::client_error(
                    format!("Cannot read {} access", self.object.name()),
                    &e,
                )
            })?;
        allowed_actions.sort_unstable();

        Ok(AccessModel {
            allowed_actions,
            ..config
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn both_principals_conflict() {
        let config = AccessModel {
            user_id: Some("oidc~alice".to_string()),
            role_id: Some("00000000-0000-0000-0000-000000000001".to_string()),
            ..AccessModel::default()
        };
        assert!(AccessDataSource::principal(&config).is_err());
    }

    #[test]
    fn absent_principal_means_caller() {
        assert_eq!(
            AccessDataSource::principal(&AccessModel::default()).unwrap(),
            None
        );
    }
}
