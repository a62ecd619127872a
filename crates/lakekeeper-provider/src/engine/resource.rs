use async_trait::async_trait;
use lakekeeper_client::LakekeeperClient;
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;

use super::diagnostics::Diagnostics;

/// Result type of every engine-facing operation.
pub type EngineResult<T> = Result<T, Diagnostics>;

/// Per-operation context handed to reconcilers by the engine host. The
/// client already carries the operation's cancellation token.
#[derive(Debug, Clone)]
pub struct Context {
    pub client: LakekeeperClient,
}

impl Context {
    #[must_use]
    pub fn new(client: LakekeeperClient) -> Self {
        Self { client }
    }
}

/// Lifecycle handler for one managed object kind.
///
/// `read` returning `Ok(None)` removes the resource from state so the
/// engine re-plans a create; errors other than not-found must be
/// surfaced, not swallowed.
#[async_trait]
pub trait Reconciler: Send + Sync {
    type Model: Serialize + DeserializeOwned + Send + Sync;

    /// Engine-visible resource type name, e.g. `lakekeeper_warehouse`.
    fn type_name(&self) -> &'static str;

    async fn create(&self, ctx: &Context, plan: Self::Model) -> EngineResult<Self::Model>;

    async fn read(&self, ctx: &Context, state: Self::Model) -> EngineResult<Option<Self::Model>>;

    async fn update(
        &self,
        ctx: &Context,
        state: Self::Model,
        plan: Self::Model,
    ) -> EngineResult<Self::Model>;

    async fn delete(&self, ctx: &Context, state: Self::Model) -> EngineResult<()>;

    /// Resolve an import identifier into a partial model the engine then
    /// refreshes via `read`.
    async fn import_id(&self, ctx: &Context, id: &str) -> EngineResult<Self::Model> {
        let _ = (ctx, id);
        Err(Diagnostics::error(
            format!("Import is not supported for `{}`", self.type_name()),
            "This resource kind cannot be imported.",
        ))
    }
}

/// Read-only lookup for one object kind.
#[async_trait]
pub trait DataSource: Send + Sync {
    type Model: Serialize + DeserializeOwned + Send + Sync;

    /// Engine-visible data-source type name.
    fn type_name(&self) -> &'static str;

    async fn read(&self, ctx: &Context, config: Self::Model) -> EngineResult<Self::Model>;
}

/// Object-safe form of [`Reconciler`] used by the provider registry; the
/// engine host moves models across the boundary as JSON values.
#[async_trait]
pub trait DynReconciler: Send + Sync {
    fn type_name(&self) -> &'static str;
    async fn create(&self, ctx: &Context, plan: Value) -> EngineResult<Value>;
    async fn read(&self, ctx: &Context, state: Value) -> EngineResult<Option<Value>>;
    async fn update(&self, ctx: &Context, state: Value, plan: Value) -> EngineResult<Value>;
    async fn delete(&self, ctx: &Context, state: Value) -> EngineResult<()>;
    async fn import_id(&self, ctx: &Context, id: &str) -> EngineResult<Value>;
}

fn decode<M: DeserializeOwned>(what: &str, type_name: &str, value: Value) -> EngineResult<M> {
    serde_json::from_value(value).map_err(|e| {
        Diagnostics::error(
            format!("Invalid {what} for `{type_name}`"),
            e.to_string(),
        )
    })
}

fn encode<M: Serialize>(type_name: &str, model: &M) -> EngineResult<Value> {
    serde_json::to_value(model).map_err(|e| {
        Diagnostics::error(
            format!("Cannot serialize state for `{type_name}`"),
            e.to_string(),
        )
    })
}

#[async_trait]
impl<R: Reconciler> DynReconciler for R {
    fn type_name(&self) -> &'static str {
        Reconciler::type_name(self)
    }

    async fn create(&self, ctx: &Context, plan: Value) -> EngineResult<Value> {
        let plan = decode("plan", Reconciler::type_name(self), plan)?;
        let state = Reconciler::create(self, ctx, plan).await?;
        encode(Reconciler::type_name(self), &state)
    }

    async fn read(&self, ctx: &Context, state: Value) -> EngineResult<Option<Value>> {
        let state = decode("state", Reconciler::type_name(self), state)?;
        match Reconciler::read(self, ctx, state).await? {
            Some(state) => Ok(Some(encode(Reconciler::type_name(self), &state)?)),
            None => Ok(None),
        }
    }

    async fn update(&self, ctx: &Context, state: Value, plan: Value) -> EngineResult<Value> {
        let state = decode("state", Reconciler::type_name(self), state)?;
        let plan = decode("plan", Reconciler::type_name(self), plan)?;
        let state = Reconciler::update(self, ctx, state, plan).await?;
        encode(Reconciler::type_name(self), &state)
    }

    async fn delete(&self, ctx: &Context, state: Value) -> EngineResult<()> {
        let state = decode("state", Reconciler::type_name(self), state)?;
        Reconciler::delete(self, ctx, state).await
    }

    async fn import_id(&self, ctx: &Context, id: &str) -> EngineResult<Value> {
        let state = Reconciler::import_id(self, ctx, id).await?;
        encode(Reconciler::type_name(self), &state)
    }
}

/// Object-safe form of [`DataSource`].
#[async_trait]
pub trait DynDataSource: Send + Sync {
    fn type_name(&self) -> &'static str;
    async fn read(&self, ctx: &Context, config: Value) -> EngineResult<Value>;
}

#[async_trait]
impl<D: DataSource> DynDataSource for D {
    fn type_name(&self) -> &'static str {
        DataSource::type_name(self)
    }

    async fn read(&self, ctx: &Context, config: Value) -> EngineResult<Value> {
        let config = decode("configuration", DataSource::type_name(self), config)?;
        let model = DataSource::read(self, ctx, config).await?;
        encode(DataSource::type_name(self), &model)
    }
}
