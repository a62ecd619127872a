use lakekeeper_client::api::storage::TabularDeleteProfile;
use serde::{Deserialize, Serialize};

use crate::engine::{AttributePath, Diagnostics};

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum_macros::Display,
    strum_macros::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum DeleteProfileKind {
    Hard,
    Soft,
}

/// Plan-side delete profile with the `type`/`expiration_seconds`
/// cross-field rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteProfileModel {
    #[serde(rename = "type")]
    pub kind: DeleteProfileKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration_seconds: Option<i64>,
}

impl DeleteProfileModel {
    /// `expiration_seconds` is required iff `type` is `soft`.
    pub fn validate(&self, context: &str) -> Result<TabularDeleteProfile, Diagnostics> {
        let path = AttributePath::root("delete_profile").attribute("expiration_seconds");
        match (self.kind, self.expiration_seconds) {
            (DeleteProfileKind::Hard, None) => Ok(TabularDeleteProfile::Hard {}),
            (DeleteProfileKind::Hard, Some(_)) => Err(Diagnostics::attribute_error(
                path,
                context,
                "expiration_seconds must not be set when type is `hard`",
            )),
            (DeleteProfileKind::Soft, Some(seconds)) => Ok(TabularDeleteProfile::Soft {
                expiration_seconds: chrono::Duration::seconds(seconds),
            }),
            (DeleteProfileKind::Soft, None) => Err(Diagnostics::attribute_error(
                path,
                context,
                "expiration_seconds is required when type is `soft`",
            )),
        }
    }

    #[must_use]
    pub fn from_observed(profile: &TabularDeleteProfile) -> Self {
        match profile {
            TabularDeleteProfile::Hard {} => Self {
                kind: DeleteProfileKind::Hard,
                expiration_seconds: None,
            },
            TabularDeleteProfile::Soft { expiration_seconds } => Self {
                kind: DeleteProfileKind::Soft,
                expiration_seconds: Some(expiration_seconds.num_seconds()),
            },
        }
    }
}

impl Default for DeleteProfileModel {
    fn default() -> Self {
        Self {
            kind: DeleteProfileKind::Hard,
            expiration_seconds: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hard_forbids_expiration() {
        let model = DeleteProfileModel {
            kind: DeleteProfileKind::Hard,
            expiration_seconds: Some(10),
        };
        let err = model.validate("Incorrect Warehouse creation request");
        assert!(err.is_err());
    }

    #[test]
    fn soft_requires_expiration() {
        let model = DeleteProfileModel {
            kind: DeleteProfileKind::Soft,
            expiration_seconds: None,
        };
        assert!(model.validate("ctx").is_err());

        let model = DeleteProfileModel {
            kind: DeleteProfileKind::Soft,
            expiration_seconds: Some(3600),
        };
        let profile = model.validate("ctx").unwrap();
        assert_eq!(
            profile.expiration_seconds(),
            Some(chrono::Duration::seconds(3600))
        );
    }

    #[test]
    fn observed_round_trip() {
        for model in [
            DeleteProfileModel::default(),
            DeleteProfileModel {
                kind: DeleteProfileKind::Soft,
                expiration_seconds: Some(60),
            },
        ] {
            let wire = model.validate("ctx").unwrap();
            assert_eq!(DeleteProfileModel::from_observed(&wire), model);
        }
    }
}
