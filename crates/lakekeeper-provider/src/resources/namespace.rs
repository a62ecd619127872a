use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{parse_project_id, require_state_id};
use crate::{
    engine::{AttributePath, Context, Diagnostics, EngineResult, Reconciler},
    ident::{CompositeId, split_composite3},
};

/// Engine state model of an Iceberg namespace. Persisted under
/// `{project_id}/{warehouse_name}/{name}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamespaceModel {
    /// Composite identifier. Computed.
    #[serde(default)]
    pub id: Option<String>,
    pub project_id: String,
    pub warehouse_name: String,
    pub name: String,
}

const IMPORT_FORMAT: &str = "{project_id}/{warehouse_name}/{namespace}";

fn validate_segments(model: &NamespaceModel) -> Result<(), Diagnostics> {
    for (attribute, value) in [
        ("warehouse_name", &model.warehouse_name),
        ("name", &model.name),
    ] {
        if value.contains('/') {
            return Err(Diagnostics::attribute_error(
                AttributePath::root(attribute),
                format!("Invalid `{attribute}`"),
                format!("`{value}` may not contain `/`."),
            ));
        }
    }
    Ok(())
}

fn composite(model: &NamespaceModel) -> String {
    CompositeId::new3(
        model.project_id.clone(),
        model.warehouse_name.clone(),
        model.name.clone(),
    )
    .to_string()
}

/// Reconciler for namespaces. Namespaces have no mutable attributes;
/// update is a no-op and read is an existence check.
#[derive(Debug, Default)]
pub struct NamespaceResource;

#[async_trait]
impl Reconciler for NamespaceResource {
    type Model = NamespaceModel;

    fn type_name(&self) -> &'static str {
        "lakekeeper_namespace"
    }

    async fn create(&self, ctx: &Context, plan: Self::Model) -> EngineResult<Self::Model> {
        validate_segments(&plan)?;
        let project_id = parse_project_id(&plan.project_id, "project_id")?;
        ctx.client
            .catalog_v1(&project_id, &plan.warehouse_name)
            .create_namespace(&plan.name)
            .await
            .map_err(|e| Diagnostics::client_error("Cannot create namespace", &e))?;

        Ok(NamespaceModel {
            id: Some(composite(&plan)),
            ..plan
        })
    }

    async fn read(&self, ctx: &Context, state: Self::Model) -> EngineResult<Option<Self::Model>> {
        let id = require_state_id(state.id.as_ref(), self.type_name())?.to_string();
        let (project, warehouse_name, name) = split_composite3(&id, IMPORT_FORMAT)?;
        let project_id = parse_project_id(&project, "id")?;

        let exists = match ctx
            .client
            .catalog_v1(&project_id, &warehouse_name)
            .namespace_exists(&name)
            .await
        {
            Ok(exists) => exists,
            // A missing warehouse means the namespace is gone with it.
            Err(e) if e.is_not_found() => false,
            Err(e) => return Err(Diagnostics::client_error("Cannot check namespace", &e)),
        };
        if !exists {
            return Ok(None);
        }

        Ok(Some(NamespaceModel {
            id: Some(id),
            project_id: project,
            warehouse_name,
            name,
        }))
    }

    async fn update(
        &self,
        _ctx: &Context,
        _state: Self::Model,
        plan: Self::Model,
    ) -> EngineResult<Self::Model> {
        // Nothing on a namespace is mutable through this provider.
        let id = composite(&plan);
        Ok(NamespaceModel {
            id: Some(id),
            ..plan
        })
    }

    async fn delete(&self, ctx: &Context, state: Self::Model) -> EngineResult<()> {
        let id = require_state_id(state.id.as_ref(), self.type_name())?;
        let (project, warehouse_name, name) = split_composite3(id, IMPORT_FORMAT)?;
        let project_id = parse_project_id(&project, "id")?;
        ctx.client
            .catalog_v1(&project_id, &warehouse_name)
            .drop_namespace(&name)
            .await
            .map_err(|e| Diagnostics::client_error("Cannot drop namespace", &e))
    }

    async fn import_id(&self, _ctx: &Context, id: &str) -> EngineResult<Self::Model> {
        let (project, warehouse_name, name) = split_composite3(id, IMPORT_FORMAT)?;
        parse_project_id(&project, "id")?;
        Ok(NamespaceModel {
            id: Some(id.to_string()),
            project_id: project,
            warehouse_name,
            name,
        })
    }
}
