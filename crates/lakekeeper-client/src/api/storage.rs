//! Wire representation of warehouse storage profiles, storage
//! credentials and the tabular delete profile.
//!
//! Profiles and credentials are tagged unions keyed by `type`; within a
//! family the credential is further keyed by `credential-type`. The
//! server never returns credentials on read.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum StorageProfile {
    #[serde(rename = "s3")]
    S3(S3Profile),
    Adls(AdlsProfile),
    Gcs(GcsProfile),
}

impl StorageProfile {
    /// Name of the storage family, as used in the `type` tag.
    #[must_use]
    pub fn family(&self) -> &'static str {
        match self {
            StorageProfile::S3(_) => "s3",
            StorageProfile::Adls(_) => "adls",
            StorageProfile::Gcs(_) => "gcs",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct S3Profile {
    /// Name of the S3 bucket.
    pub bucket: String,
    /// Region to use for S3 requests.
    pub region: String,
    /// Subpath in the bucket to use.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_prefix: Option<String>,
    /// Optional endpoint for S3-compatible storage.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<url::Url>,
    /// Path style access for S3 requests.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path_style_access: Option<bool>,
    /// Whether the STS credential vending endpoint is enabled.
    #[serde(default)]
    pub sts_enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct AdlsProfile {
    /// Name of the storage account.
    pub account_name: String,
    /// Name of the filesystem (container).
    pub filesystem: String,
    /// Subpath in the filesystem to use.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_prefix: Option<String>,
    /// Host of the storage account, defaults to `dfs.core.windows.net`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct GcsProfile {
    /// Name of the GCS bucket.
    pub bucket: String,
    /// Subpath in the bucket to use.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_prefix: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum StorageCredential {
    #[serde(rename = "s3")]
    S3(S3Credential),
    Az(AzCredential),
    Gcs(GcsCredential),
}

#[derive(Clone, PartialEq, veil::Redact, Serialize, Deserialize)]
#[serde(tag = "credential-type", rename_all = "kebab-case")]
pub enum S3Credential {
    #[serde(rename_all = "kebab-case")]
    AccessKey {
        aws_access_key_id: String,
        #[redact]
        aws_secret_access_key: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        external_id: Option<String>,
    },
    #[serde(rename_all = "kebab-case")]
    AwsSystemIdentity { external_id: String },
    #[serde(rename_all = "kebab-case")]
    CloudflareR2 {
        access_key_id: String,
        #[redact]
        secret_access_key: String,
        account_id: String,
        #[redact]
        token: String,
    },
}

#[derive(Clone, PartialEq, veil::Redact, Serialize, Deserialize)]
#[serde(tag = "credential-type", rename_all = "kebab-case")]
pub enum AzCredential {
    #[serde(rename_all = "kebab-case")]
    SharedAccessKey {
        #[redact]
        key: String,
    },
    #[serde(rename_all = "kebab-case")]
    ClientCredentials {
        client_id: String,
        #[redact]
        client_secret: String,
        tenant_id: String,
    },
    #[serde(rename_all = "kebab-case")]
    AzureSystemIdentity {},
}

#[derive(Clone, PartialEq, veil::Redact, Serialize, Deserialize)]
#[serde(tag = "credential-type", rename_all = "kebab-case")]
pub enum GcsCredential {
    #[serde(rename_all = "kebab-case")]
    ServiceAccountKey {
        #[redact]
        key: GcsServiceKey,
    },
    #[serde(rename_all = "kebab-case")]
    GcpSystemIdentity {},
}

/// A GCP service-account key as downloaded from the console. Field names
/// follow Google's JSON, hence snake_case.
#[derive(Clone, PartialEq, Eq, veil::Redact, Serialize, Deserialize)]
pub struct GcsServiceKey {
    pub r#type: String,
    pub project_id: String,
    pub private_key_id: String,
    #[redact]
    pub private_key: String,
    pub client_email: String,
    pub client_id: String,
    #[serde(default)]
    pub auth_uri: Option<String>,
    #[serde(default)]
    pub token_uri: Option<String>,
    #[serde(default)]
    pub auth_provider_x509_cert_url: Option<String>,
    #[serde(default)]
    pub client_x509_cert_url: Option<String>,
    #[serde(default)]
    pub universe_domain: Option<String>,
}

/// Behavior upon dropping of tabulars.
#[derive(Debug, Clone, PartialEq, Eq, Copy, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", tag = "type")]
pub enum TabularDeleteProfile {
    Hard {},
    #[serde(rename_all = "kebab-case")]
    Soft {
        #[serde(
            deserialize_with = "seconds_to_duration",
            serialize_with = "duration_to_seconds",
            alias = "expiration_seconds"
        )]
        expiration_seconds: chrono::Duration,
    },
}

fn seconds_to_duration<'de, D>(deserializer: D) -> Result<chrono::Duration, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let buf = i64::deserialize(deserializer)?;
    Ok(chrono::Duration::seconds(buf))
}

fn duration_to_seconds<S>(duration: &chrono::Duration, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_i64(duration.num_seconds())
}

impl TabularDeleteProfile {
    #[must_use]
    pub fn expiration_seconds(&self) -> Option<chrono::Duration> {
        match self {
            Self::Soft { expiration_seconds } => Some(*expiration_seconds),
            Self::Hard {} => None,
        }
    }
}

impl Default for TabularDeleteProfile {
    fn default() -> Self {
        Self::Hard {}
    }
}
