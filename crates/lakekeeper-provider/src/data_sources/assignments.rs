use async_trait::async_trait;
use lakekeeper_client::api::permissions::{AuthzObject, UserOrRole};
use serde::{Deserialize, Serialize};

use crate::{
    engine::{AttributePath, Context, DataSource, Diagnostics, EngineResult},
    resources::assignment::ObjectKind,
};

/// One observed assignment entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentEntryModel {
    pub assignment: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

/// All assignments of one object, every principal included.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentsModel {
    /// Object ID; unused for the server data source.
    #[serde(default)]
    pub object_id: Option<String>,
    /// Computed.
    #[serde(default)]
    pub assignments: Vec<AssignmentEntryModel>,
}

/// Generic assignments data source over the object kind.
#[derive(Debug)]
pub struct AssignmentsDataSource {
    type_name: &'static str,
    object: ObjectKind,
}

impl AssignmentsDataSource {
    #[must_use]
    pub fn server() -> Self {
        Self {
            type_name: "lakekeeper_server_assignments",
            object: ObjectKind::Server,
        }
    }

    #[must_use]
    pub fn project() -> Self {
        Self {
            type_name: "lakekeeper_project_assignments",
            object: ObjectKind::Project,
        }
    }

    #[must_use]
    pub fn role() -> Self {
        Self {
            type_name: "lakekeeper_role_assignments",
            object: ObjectKind::Role,
        }
    }

    #[must_use]
    pub fn warehouse() -> Self {
        Self {
            type_name: "lakekeeper_warehouse_assignments",
            object: ObjectKind::Warehouse,
        }
    }

    pub(crate) fn resolve_object(
        object: ObjectKind,
        object_id: Option<&str>,
    ) -> Result<AuthzObject, Diagnostics> {
        if !object.has_object_id() {
            return Ok(AuthzObject::Server);
        }
        let raw = object_id.ok_or_else(|| {
            Diagnostics::attribute_error(
                AttributePath::root("object_id"),
                format!("Missing {} ID", object.name()),
                format!("`object_id` is required for {} lookups.", object.name()),
            )
        })?;
        object.parse(raw)
    }
}

#[async_trait]
impl DataSource for AssignmentsDataSource {
    type Model = AssignmentsModel;

    fn type_name(&self) -> &'static str {
        self.type_name
    }

    async fn read(&self, ctx: &Context, config: Self::Model) -> EngineResult<Self::Model> {
        let object = Self::resolve_object(self.object, config.object_id.as_deref())?;
        let assignments = ctx
            .client
            .get_assignments(&object)
            .await
            .map_err(|e| {
                Diagnostics::client_error(
                    format!("Cannot read {} assignments", self.object.name()),
                    &e,
                )
            })?;

        let mut entries: Vec<AssignmentEntryModel> = assignments
            .into_iter()
            .map(|entry| {
                let (user, role) = match entry.assignee {
                    UserOrRole::User(id) => (Some(id.to_string()), None),
                    UserOrRole::Role(id) => (None, Some(id.to_string())),
                };
                AssignmentEntryModel {
                    assignment: entry.assignment,
                    user,
                    role,
                }
            })
            .collect();
        entries.sort_unstable_by(|a, b| {
            (&a.assignment, &a.user, &a.role).cmp(&(&b.assignment, &b.user, &b.role))
        });

        Ok(AssignmentsModel {
            object_id: config.object_id,
            assignments: entries,
        })
    }
}
