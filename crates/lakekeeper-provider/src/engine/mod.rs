//! Interface between the declarative engine host and the reconcilers.
//!
//! The engine's plugin protocol itself lives outside this crate; these
//! types are the contract it drives: three-state plan values,
//! attribute-scoped diagnostics, and the reconciler / data-source
//! operation set.

mod diagnostics;
mod resource;
mod value;

pub use diagnostics::{AttributePath, Diagnostic, Diagnostics, Severity};
pub use resource::{Context, DataSource, DynDataSource, DynReconciler, EngineResult, Reconciler};
pub use value::Attr;
