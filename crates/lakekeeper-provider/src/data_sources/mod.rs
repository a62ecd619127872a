//! Read-only data sources. These produce the observed representation
//! and never participate in reconciliation.

pub mod access;
pub mod assignments;
pub mod project;
pub mod role;
pub mod server;
pub mod user;
pub mod warehouse;
