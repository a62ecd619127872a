#![warn(
    missing_debug_implementations,
    rust_2018_idioms,
    unreachable_pub,
    clippy::pedantic
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::large_enum_variant,
    clippy::missing_errors_doc
)]
#![forbid(unsafe_code)]

pub mod api;
mod auth;
mod catalog;
mod client;
mod config;
mod error;
mod identifier;

pub use catalog::CatalogV1;
pub use client::{LakekeeperClient, X_PROJECT_ID_HEADER};
pub use config::ClientConfig;
pub use error::{ErrorModel, ErrorResponse, LakekeeperError, Result};
pub use identifier::{DEFAULT_PROJECT_ID, ProjectId, RoleId, UserId, WarehouseId};
pub use tokio_util::sync::CancellationToken;
