use std::{ops::Deref, str::FromStr};

use lazy_regex::regex_is_match;

use crate::error::LakekeeperError;

/// Project ID of the well-known default project.
pub const DEFAULT_PROJECT_ID: &str = "00000000-0000-0000-0000-000000000000";

/// Identifier of a project.
///
/// Project IDs are server-assigned UUIDs, but the API treats them as
/// opaque strings restricted to alphanumeric characters, hyphens and
/// underscores.
#[derive(Debug, serde::Serialize, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct ProjectId(String);

impl<'de> serde::Deserialize<'de> for ProjectId {
    fn deserialize<D>(deserializer: D) -> std::result::Result<ProjectId, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        ProjectId::try_new(s).map_err(serde::de::Error::custom)
    }
}

impl ProjectId {
    #[must_use]
    pub fn new(id: uuid::Uuid) -> Self {
        Self(id.to_string())
    }

    #[must_use]
    pub fn new_random() -> Self {
        Self(uuid::Uuid::now_v7().to_string())
    }

    #[must_use]
    pub fn default_project() -> Self {
        Self(DEFAULT_PROJECT_ID.to_string())
    }

    /// Create a new project id from a string.
    ///
    /// # Errors
    /// Returns an error if the provided string is not a valid project id.
    pub fn try_new(id: String) -> Result<Self, LakekeeperError> {
        if id.is_empty() {
            return Err(LakekeeperError::Config(
                "project IDs must not be empty".to_string(),
            ));
        }

        if id
            .chars()
            .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
        {
            Ok(Self(id))
        } else {
            Err(LakekeeperError::Config(format!(
                "project IDs may only contain alphanumeric characters, hyphens and underscores, got `{id}`"
            )))
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Deref for ProjectId {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl std::fmt::Display for ProjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ProjectId {
    type Err = LakekeeperError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ProjectId::try_new(s.to_string())
    }
}

impl From<uuid::Uuid> for ProjectId {
    fn from(uuid: uuid::Uuid) -> Self {
        Self::new(uuid)
    }
}

macro_rules! uuid_identifier {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            serde::Serialize,
            serde::Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(uuid::Uuid);

        impl $name {
            #[must_use]
            pub fn new(id: uuid::Uuid) -> Self {
                Self(id)
            }

            #[must_use]
            pub fn new_random() -> Self {
                Self(uuid::Uuid::now_v7())
            }

            #[must_use]
            pub fn as_uuid(&self) -> &uuid::Uuid {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = LakekeeperError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                uuid::Uuid::from_str(s).map(Self).map_err(|_| {
                    LakekeeperError::Config(format!(
                        concat!(stringify!($name), " must be a UUID, got `{}`"),
                        s
                    ))
                })
            }
        }

        impl From<uuid::Uuid> for $name {
            fn from(uuid: uuid::Uuid) -> Self {
                Self(uuid)
            }
        }
    };
}

uuid_identifier!(
    /// Identifier of a warehouse inside a project.
    WarehouseId
);
uuid_identifier!(
    /// Identifier of a role inside a project.
    RoleId
);

/// Identifier of a user.
///
/// User IDs carry the identity provider as a prefix: `oidc~<subject>` or
/// `kubernetes~<subject>`.
#[derive(Debug, serde::Serialize, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Create a new user id from a string.
    ///
    /// # Errors
    /// Returns an error if the id does not match `^(oidc|kubernetes)~.+`.
    pub fn try_new(id: String) -> Result<Self, LakekeeperError> {
        if regex_is_match!(r"^(oidc|kubernetes)~.+", &id) {
            Ok(Self(id))
        } else {
            Err(LakekeeperError::Config(format!(
                "user IDs must start with `oidc~` or `kubernetes~`, got `{id}`"
            )))
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<'de> serde::Deserialize<'de> for UserId {
    fn deserialize<D>(deserializer: D) -> std::result::Result<UserId, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        UserId::try_new(s).map_err(serde::de::Error::custom)
    }
}

impl Deref for UserId {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for UserId {
    type Err = LakekeeperError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        UserId::try_new(s.to_string())
    }
}
