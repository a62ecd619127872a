//! Permission-assignment reconcilers.
//!
//! One generic implementation covers every `(object, principal)`
//! combination; the provider instantiates it for server, project, role
//! and warehouse objects crossed with user and role principals. The
//! token set managed for one pair is authoritative over the remote set
//! for that pair and never touches tokens of other principals.

use std::str::FromStr;

use async_trait::async_trait;
use lakekeeper_client::{
    RoleId, UserId,
    api::permissions::{AssignmentEntry, AuthzObject, UserOrRole},
};
use serde::{Deserialize, Serialize};

use super::{parse_project_id, parse_uuid, require_state_id};
use crate::{
    diff::diff_assignments,
    engine::{AttributePath, Context, Diagnostics, EngineResult, Reconciler},
    ident::{CompositeId, split_composite},
};

/// Object kinds an assignment can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    Server,
    Project,
    Role,
    Warehouse,
}

impl ObjectKind {
    pub(crate) fn has_object_id(self) -> bool {
        !matches!(self, ObjectKind::Server)
    }

    pub(crate) fn name(self) -> &'static str {
        match self {
            ObjectKind::Server => "server",
            ObjectKind::Project => "project",
            ObjectKind::Role => "role",
            ObjectKind::Warehouse => "warehouse",
        }
    }

    pub(crate) fn parse(self, raw: &str) -> Result<AuthzObject, Diagnostics> {
        match self {
            ObjectKind::Server => Ok(AuthzObject::Server),
            ObjectKind::Project => Ok(AuthzObject::Project(parse_project_id(raw, "object_id")?)),
            ObjectKind::Role => Ok(AuthzObject::Role(parse_uuid(raw, "object_id", "role")?)),
            ObjectKind::Warehouse => Ok(AuthzObject::Warehouse(parse_uuid(
                raw,
                "object_id",
                "warehouse",
            )?)),
        }
    }
}

/// Principal kinds an assignment can bind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrincipalKind {
    User,
    Role,
}

impl PrincipalKind {
    fn name(self) -> &'static str {
        match self {
            PrincipalKind::User => "user",
            PrincipalKind::Role => "role",
        }
    }

    fn parse(self, raw: &str) -> Result<UserOrRole, Diagnostics> {
        match self {
            PrincipalKind::User => UserId::from_str(raw).map(UserOrRole::User).map_err(|e| {
                Diagnostics::attribute_error(
                    AttributePath::root("principal_id"),
                    "Invalid user ID",
                    e.to_string(),
                )
            }),
            PrincipalKind::Role => Ok(UserOrRole::Role(parse_uuid::<RoleId>(
                raw,
                "principal_id",
                "role",
            )?)),
        }
    }
}

/// Engine state model of one `(object, principal)` assignment set.
///
/// `object_id` is absent for server assignments. The persisted
/// identifier is `{object_id}/{principal_id}`, or just the principal for
/// the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentModel {
    /// Computed.
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object_id: Option<String>,
    pub principal_id: String,
    /// Assignment tokens managed for this pair.
    #[serde(default)]
    pub assignments: Vec<String>,
}

/// Generic reconciler over `(object kind, principal kind)`.
#[derive(Debug)]
pub struct AssignmentResource {
    type_name: &'static str,
    object: ObjectKind,
    principal: PrincipalKind,
}

macro_rules! assignment_constructor {
    ($fn_name:ident, $type_name:literal, $object:ident, $principal:ident) => {
        #[must_use]
        pub fn $fn_name() -> Self {
            Self {
                type_name: $type_name,
                object: ObjectKind::$object,
                principal: PrincipalKind::$principal,
            }
        }
    };
}

impl AssignmentResource {
    assignment_constructor!(
        server_user,
        "lakekeeper_server_user_assignment",
        Server,
        User
    );
    assignment_constructor!(
        server_role,
        "lakekeeper_server_role_assignment",
        Server,
        Role
    );
    assignment_constructor!(
        project_user,
        "lakekeeper_project_user_assignment",
        Project,
        User
    );
    assignment_constructor!(
        project_role,
        "lakekeeper_project_role_assignment",
        Project,
        Role
    );
    assignment_constructor!(role_user, "lakekeeper_role_user_assignment", Role, User);
    assignment_constructor!(role_role, "lakekeeper_role_role_assignment", Role, Role);
    assignment_constructor!(
        warehouse_user,
        "lakekeeper_warehouse_user_assignment",
        Warehouse,
        User
    );
    assignment_constructor!(
        warehouse_role,
        "lakekeeper_warehouse_role_assignment",
        Warehouse,
        Role
    );

    /// Resolve object and principal from a model, validating tokens
    /// against the object's enumeration.
    fn resolve(&self, model: &AssignmentModel) -> Result<(AuthzObject, UserOrRole), Diagnostics> {
        let object = if self.object.has_object_id() {
            let raw = model.object_id.as_deref().ok_or_else(|| {
                Diagnostics::attribute_error(
                    AttributePath::root("object_id"),
                    format!("Missing {} ID", self.object.name()),
                    format!(
                        "`object_id` is required for {} assignments.",
                        self.object.name()
                    ),
                )
            })?;
            self.object.parse(raw)?
        } else {
            AuthzObject::Server
        };
        let principal = self.principal.parse(&model.principal_id)?;

        let mut diags = Diagnostics::new();
        for token in &model.assignments {
            if !object.is_valid_token(token) {
                diags.add_attribute_error(
                    AttributePath::root("assignments"),
                    format!("Invalid {} assignment `{token}`", self.object.name()),
                    format!(
                        "Valid assignments are: {}.",
                        object.valid_tokens().join(", ")
                    ),
                );
            }
        }
        if diags.has_errors() {
            return Err(diags);
        }
        Ok((object, principal))
    }

    fn state_id(&self, model: &AssignmentModel) -> String {
        match &model.object_id {
            Some(object_id) if self.object.has_object_id() => {
                CompositeId::new2(object_id.clone(), model.principal_id.clone()).to_string()
            }
            _ => model.principal_id.clone(),
        }
    }

    fn entries(tokens: &[String], assignee: &UserOrRole) -> Vec<AssignmentEntry> {
        tokens
            .iter()
            .map(|token| AssignmentEntry {
                assignment: token.clone(),
                assignee: assignee.clone(),
            })
            .collect()
    }

    /// Remote tokens currently held by `principal` on `object`, sorted.
    async fn remote_tokens(
        &self,
        ctx: &Context,
        object: &AuthzObject,
        principal: &UserOrRole,
    ) -> Result<Option<Vec<String>>, Diagnostics> {
        let assignments = match ctx.client.get_assignments(object).await {
            Ok(assignments) => assignments,
            Err(e) if e.is_not_found() => return Ok(None),
            Err(e) => {
                return Err(Diagnostics::client_error(
                    format!("Cannot read {} assignments", self.object.name()),
                    &e,
                ));
            }
        };
        let mut tokens: Vec<String> = assignments
            .into_iter()
            .filter(|entry| entry.assignee == *principal)
            .map(|entry| entry.assignment)
            .collect();
        tokens.sort_unstable();
        tokens.dedup();
        Ok(Some(tokens))
    }
}

#[async_trait]
impl Reconciler for AssignmentResource {
    type Model = AssignmentModel;

    fn type_name(&self) -> &'static str {
        self.type_name
    }

    async fn create(&self, ctx: &Context, plan: Self::Model) -> EngineResult<Self::Model> {
        let (object, principal) = self.resolve(&plan)?;
        let writes = Self::entries(&plan.assignments, &principal);
        ctx.client
            .update_assignments(&object, writes, Vec::new())
            .await
            .map_err(|e| {
                Diagnostics::client_error(
                    format!("Cannot write {} assignments", self.object.name()),
                    &e,
                )
            })?;

        let mut assignments = plan.assignments.clone();
        assignments.sort_unstable();
        assignments.dedup();
        Ok(AssignmentModel {
            id: Some(self.state_id(&plan)),
            assignments,
            ..plan
        })
    }

    async fn read(&self, ctx: &Context, state: Self::Model) -> EngineResult<Option<Self::Model>> {
        require_state_id(state.id.as_ref(), self.type_name())?;
        let (object, principal) = self.resolve(&state)?;
        let Some(assignments) = self.remote_tokens(ctx, &object, &principal).await? else {
            return Ok(None);
        };
        Ok(Some(AssignmentModel {
            id: Some(self.state_id(&state)),
            assignments,
            ..state
        }))
    }

    async fn update(
        &self,
        ctx: &Context,
        state: Self::Model,
        plan: Self::Model,
    ) -> EngineResult<Self::Model> {
        let (object, principal) = self.resolve(&plan)?;
        let (added, removed) = diff_assignments(&state.assignments, &plan.assignments);
        if !added.is_empty() || !removed.is_empty() {
            tracing::debug!(
                object = self.object.name(),
                added = added.len(),
                removed = removed.len(),
                "reconciling assignments"
            );
            ctx.client
                .update_assignments(
                    &object,
                    Self::entries(&added, &principal),
                    Self::entries(&removed, &principal),
                )
                .await
                .map_err(|e| {
                    Diagnostics::client_error(
                        format!("Cannot update {} assignments", self.object.name()),
                        &e,
                    )
                })?;
        }

        let mut assignments = plan.assignments.clone();
        assignments.sort_unstable();
        assignments.dedup();
        Ok(AssignmentModel {
            id: Some(self.state_id(&plan)),
            assignments,
            ..plan
        })
    }

    async fn delete(&self, ctx: &Context, state: Self::Model) -> EngineResult<()> {
        let (object, principal) = self.resolve(&state)?;
        let deletes = Self::entries(&state.assignments, &principal);
        ctx.client
            .update_assignments(&object, Vec::new(), deletes)
            .await
            .map_err(|e| {
                Diagnostics::client_error(
                    format!("Cannot delete {} assignments", self.object.name()),
                    &e,
                )
            })
    }

    async fn import_id(&self, _ctx: &Context, id: &str) -> EngineResult<Self::Model> {
        let (object_id, principal_id) = if self.object.has_object_id() {
            let (object, principal) =
                split_composite(id, &format!("{{{}_id}}/{{principal_id}}", self.object.name()))?;
            (Some(object), principal)
        } else {
            (None, id.to_string())
        };

        let model = AssignmentModel {
            id: Some(id.to_string()),
            object_id,
            principal_id,
            assignments: Vec::new(),
        };
        // Surface malformed IDs at import time rather than first read.
        self.resolve(&model)?;
        Ok(model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn warehouse_model(tokens: &[&str]) -> AssignmentModel {
        AssignmentModel {
            id: None,
            object_id: Some("01f0a0e0-0000-7000-8000-00000000cafe".to_string()),
            principal_id: "oidc~alice".to_string(),
            assignments: tokens.iter().map(ToString::to_string).collect(),
        }
    }

    #[test]
    fn tokens_are_validated_against_the_object() {
        let resource = AssignmentResource::warehouse_user();
        assert!(resource.resolve(&warehouse_model(&["ownership"])).is_ok());

        let err = resource
            .resolve(&warehouse_model(&["admin"]))
            .unwrap_err();
        let rendered = err.to_string();
        assert!(rendered.contains("Invalid warehouse assignment"), "{rendered}");
        assert!(rendered.contains("manage_grants"), "{rendered}");
    }

    #[test]
    fn server_assignments_use_principal_as_id() {
        let resource = AssignmentResource::server_user();
        let model = AssignmentModel {
            id: None,
            object_id: None,
            principal_id: "oidc~alice".to_string(),
            assignments: vec!["admin".to_string()],
        };
        assert_eq!(resource.state_id(&model), "oidc~alice");
        assert!(resource.resolve(&model).is_ok());
    }

    #[test]
    fn object_scoped_assignments_use_composite_id() {
        let resource = AssignmentResource::warehouse_user();
        let model = warehouse_model(&["describe"]);
        assert_eq!(
            resource.state_id(&model),
            "01f0a0e0-0000-7000-8000-00000000cafe/oidc~alice"
        );
    }

    #[test]
    fn principal_kind_is_enforced() {
        let resource = AssignmentResource::project_role();
        let model = AssignmentModel {
            id: None,
            object_id: Some("00000000-0000-0000-0000-000000000000".to_string()),
            principal_id: "oidc~not-a-role".to_string(),
            assignments: vec![],
        };
        assert!(resource.resolve(&model).is_err());
    }

    #[test]
    fn missing_object_id_is_reported() {
        let resource = AssignmentResource::project_user();
        let model = AssignmentModel {
            id: None,
            object_id: None,
            principal_id: "oidc~alice".to_string(),
            assignments: vec![],
        };
        let err = resource.resolve(&model).unwrap_err();
        assert!(err.to_string().contains("Missing project ID"), "{err}");
    }
}
