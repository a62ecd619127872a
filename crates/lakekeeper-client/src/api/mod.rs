//! Typed wrappers for the Lakekeeper management API, one module per
//! managed object kind. All request/response bodies use the server's
//! kebab-case JSON convention.

pub mod permissions;
pub mod project;
pub mod role;
pub mod server;
pub mod storage;
pub mod user;
pub mod warehouse;
