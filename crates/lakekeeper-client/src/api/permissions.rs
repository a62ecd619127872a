//! Assignment and access endpoints under `/management/v1/permissions`.
//!
//! An assignment binds a principal (user or role) to an object through a
//! named token. On the wire an entry is `{"type": "<token>",
//! "user"|"role": "<id>"}`; write and delete batches for one object go
//! through a single update call.

use serde::{Deserialize, Serialize};
use strum::VariantArray;

use crate::{LakekeeperClient, ProjectId, RoleId, UserId, WarehouseId, error::Result};

/// Object side of an assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthzObject {
    Server,
    Project(ProjectId),
    Role(RoleId),
    Warehouse(WarehouseId),
}

impl AuthzObject {
    /// Path below `/management/v1/permissions/` addressing this object.
    #[must_use]
    pub fn path_segment(&self) -> String {
        match self {
            AuthzObject::Server => "server".to_string(),
            AuthzObject::Project(id) => format!("project/{id}"),
            AuthzObject::Role(id) => format!("role/{id}"),
            AuthzObject::Warehouse(id) => format!("warehouse/{id}"),
        }
    }

    /// Kind name used in error messages and state identifiers.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            AuthzObject::Server => "server",
            AuthzObject::Project(_) => "project",
            AuthzObject::Role(_) => "role",
            AuthzObject::Warehouse(_) => "warehouse",
        }
    }

    /// Whether `token` is a valid assignment token for this object.
    #[must_use]
    pub fn is_valid_token(&self, token: &str) -> bool {
        use std::str::FromStr as _;
        match self {
            AuthzObject::Server => ServerAssignmentType::from_str(token).is_ok(),
            AuthzObject::Project(_) => ProjectAssignmentType::from_str(token).is_ok(),
            AuthzObject::Role(_) => RoleAssignmentType::from_str(token).is_ok(),
            AuthzObject::Warehouse(_) => WarehouseAssignmentType::from_str(token).is_ok(),
        }
    }

    /// The assignment tokens this object accepts, in wire form.
    #[must_use]
    pub fn valid_tokens(&self) -> Vec<&'static str> {
        fn names<T: VariantArray + Copy + Into<&'static str>>() -> Vec<&'static str> {
            T::VARIANTS.iter().map(|v| (*v).into()).collect()
        }
        match self {
            AuthzObject::Server => names::<ServerAssignmentType>(),
            AuthzObject::Project(_) => names::<ProjectAssignmentType>(),
            AuthzObject::Role(_) => names::<RoleAssignmentType>(),
            AuthzObject::Warehouse(_) => names::<WarehouseAssignmentType>(),
        }
    }
}

/// Principal side of an assignment. Externally tagged, so it serializes
/// to `{"user": "..."}` or `{"role": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UserOrRole {
    #[serde(rename = "user")]
    User(UserId),
    #[serde(rename = "role")]
    Role(RoleId),
}

impl UserOrRole {
    #[must_use]
    pub fn id_string(&self) -> String {
        match self {
            UserOrRole::User(id) => id.to_string(),
            UserOrRole::Role(id) => id.to_string(),
        }
    }
}

/// One `(token, principal)` entry of an object's assignment set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentEntry {
    /// Assignment token, e.g. `ownership` or `project_admin`.
    #[serde(rename = "type")]
    pub assignment: String,
    #[serde(flatten)]
    pub assignee: UserOrRole,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct UpdateAssignmentsRequest {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub writes: Vec<AssignmentEntry>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub deletes: Vec<AssignmentEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct GetAssignmentsResponse {
    #[serde(default)]
    pub assignments: Vec<AssignmentEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct GetAccessResponse {
    /// Actions the principal may perform on the object, computed
    /// server-side.
    #[serde(default)]
    pub allowed_actions: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ManagedAccessResponse {
    pub managed_access: bool,
}

macro_rules! assignment_tokens {
    ($(#[$doc:meta])* $name:ident { $($variant:ident),+ $(,)? }) => {
        $(#[$doc])*
        #[derive(
            Debug,
            Clone,
            Copy,
            Eq,
            PartialEq,
            Hash,
            Serialize,
            Deserialize,
            strum_macros::Display,
            strum_macros::EnumString,
            strum_macros::IntoStaticStr,
            strum_macros::VariantArray,
        )]
        #[serde(rename_all = "snake_case")]
        #[strum(serialize_all = "snake_case")]
        pub enum $name {
            $($variant,)+
        }
    };
}

assignment_tokens!(
    /// Tokens grantable on the server itself.
    ServerAssignmentType {
        Admin,
        Operator,
    }
);

assignment_tokens!(
    /// Tokens grantable on a project.
    ProjectAssignmentType {
        ProjectAdmin,
        SecurityAdmin,
        DataAdmin,
        RoleCreator,
        Describe,
        Select,
        Create,
        Modify,
    }
);

assignment_tokens!(
    /// Tokens grantable on a role.
    RoleAssignmentType {
        Ownership,
        Assignee,
    }
);

assignment_tokens!(
    /// Tokens grantable on a warehouse.
    WarehouseAssignmentType {
        Ownership,
        PassGrants,
        ManageGrants,
        Describe,
        Select,
        Create,
        Modify,
    }
);

impl LakekeeperClient {
    /// `GET /management/v1/permissions/{object}/assignments`
    pub async fn get_assignments(&self, object: &AuthzObject) -> Result<Vec<AssignmentEntry>> {
        let response: GetAssignmentsResponse = self
            .send_json(
                &format!("get {} assignments", object.kind()),
                self.get(&format!(
                    "/management/v1/permissions/{}/assignments",
                    object.path_segment()
                )),
            )
            .await?;
        Ok(response.assignments)
    }

    /// `POST /management/v1/permissions/{object}/assignments` — atomic
    /// per-object write/delete batch. No-op when both sets are empty.
    pub async fn update_assignments(
        &self,
        object: &AuthzObject,
        writes: Vec<AssignmentEntry>,
        deletes: Vec<AssignmentEntry>,
    ) -> Result<()> {
        if writes.is_empty() && deletes.is_empty() {
            return Ok(());
        }
        self.send_unit(
            &format!("update {} assignments", object.kind()),
            self.post(&format!(
                "/management/v1/permissions/{}/assignments",
                object.path_segment()
            ))
            .json(&UpdateAssignmentsRequest { writes, deletes }),
        )
        .await
    }

    /// `GET /management/v1/permissions/{object}/access`
    ///
    /// Without a principal, the access of the calling identity is
    /// returned.
    pub async fn get_access(
        &self,
        object: &AuthzObject,
        principal: Option<&UserOrRole>,
    ) -> Result<Vec<String>> {
        let mut builder = self.get(&format!(
            "/management/v1/permissions/{}/access",
            object.path_segment()
        ));
        match principal {
            Some(UserOrRole::User(id)) => {
                builder = builder.query(&[("principalUser", id.as_str())]);
            }
            Some(UserOrRole::Role(id)) => {
                builder = builder.query(&[("principalRole", id.to_string())]);
            }
            None => {}
        }
        let response: GetAccessResponse = self
            .send_json(&format!("get {} access", object.kind()), builder)
            .await?;
        Ok(response.allowed_actions)
    }

    /// `GET /management/v1/permissions/warehouse/{id}/managed-access`
    pub async fn get_warehouse_managed_access(&self, warehouse_id: WarehouseId) -> Result<bool> {
        let response: ManagedAccessResponse = self
            .send_json(
                "get warehouse managed access",
                self.get(&format!(
                    "/management/v1/permissions/warehouse/{warehouse_id}/managed-access"
                )),
            )
            .await?;
        Ok(response.managed_access)
    }

    /// `POST /management/v1/permissions/warehouse/{id}/managed-access`
    pub async fn set_warehouse_managed_access(
        &self,
        warehouse_id: WarehouseId,
        managed_access: bool,
    ) -> Result<()> {
        self.send_unit(
            "set warehouse managed access",
            self.post(&format!(
                "/management/v1/permissions/warehouse/{warehouse_id}/managed-access"
            ))
            .json(&ManagedAccessResponse { managed_access }),
        )
        .await
    }
}
