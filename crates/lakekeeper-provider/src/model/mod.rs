//! Plan-side models for warehouse storage and delete profiles.
//!
//! The engine presents tagged unions as sibling sub-objects; the
//! one-of validators here examine the whole object, emit
//! attribute-scoped diagnostics, and produce the wire-form sum types.

mod delete_profile;
mod storage;

pub use delete_profile::{DeleteProfileKind, DeleteProfileModel};
pub use storage::{
    AdlsCredentialModel, AdlsProfileModel, AdlsSharedAccessKeyModel, AzClientCredentialsModel,
    AzureSystemIdentityModel, CloudflareR2Model, GcpSystemIdentityModel, GcsCredentialModel,
    GcsProfileModel, GcsServiceAccountKeyModel, S3AccessKeyModel, S3CredentialModel,
    S3ProfileModel, S3SystemIdentityModel, StorageProfileModel,
};
