//! Reconcilers for every managed object kind.

pub mod assignment;
pub mod namespace;
pub mod project;
pub mod role;
pub mod user;
pub mod warehouse;

use std::str::FromStr;

use lakekeeper_client::ProjectId;

use crate::engine::{AttributePath, Diagnostics};

/// Extract the persisted identifier from state; its absence means the
/// state snapshot predates a successful create and is unusable.
pub(crate) fn require_state_id<'a>(
    id: Option<&'a String>,
    type_name: &str,
) -> Result<&'a str, Diagnostics> {
    id.map(String::as_str).ok_or_else(|| {
        Diagnostics::error(
            format!("`{type_name}` has no identifier in state"),
            "The resource was never successfully created. Remove it from \
             state and re-apply.",
        )
    })
}

pub(crate) fn parse_project_id(raw: &str, attribute: &str) -> Result<ProjectId, Diagnostics> {
    ProjectId::from_str(raw).map_err(|e| {
        Diagnostics::attribute_error(
            AttributePath::root(attribute),
            format!("Invalid project ID in `{attribute}`"),
            e.to_string(),
        )
    })
}

pub(crate) fn parse_uuid<T>(raw: &str, attribute: &str, kind: &str) -> Result<T, Diagnostics>
where
    T: From<uuid::Uuid>,
{
    uuid::Uuid::from_str(raw).map(T::from).map_err(|_| {
        Diagnostics::attribute_error(
            AttributePath::root(attribute),
            format!("Invalid {kind} ID in `{attribute}`"),
            format!("`{raw}` is not a UUID."),
        )
    })
}
