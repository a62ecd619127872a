use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// JSON wrapper for all error responses (non-2xx) returned by the server.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorModel,
}

/// JSON error payload with further details on the error, exactly as the
/// server emits it.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct ErrorModel {
    /// Human-readable error message
    pub message: String,
    /// Internal type definition of the error
    pub r#type: String,
    /// HTTP response code
    pub code: u16,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub stack: Vec<String>,
}

impl Display for ErrorModel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({}): {}", self.r#type, self.code, self.message)?;
        for detail in &self.stack {
            write!(f, "\n  {detail}")?;
        }
        Ok(())
    }
}

impl ErrorModel {
    /// Fallback model for responses whose body is not the standard error
    /// envelope (e.g. a plain-text proxy error).
    pub(crate) fn opaque(status: http::StatusCode, body: &str) -> Self {
        Self {
            message: if body.trim().is_empty() {
                status
                    .canonical_reason()
                    .unwrap_or("unknown error")
                    .to_string()
            } else {
                body.trim().to_string()
            },
            r#type: "UnexpectedResponse".to_string(),
            code: status.as_u16(),
            stack: Vec::new(),
        }
    }
}

/// Errors surfaced by [`crate::LakekeeperClient`].
///
/// Every API variant carries the name of the failing operation so callers
/// can attribute the error to a remote object without further context.
#[derive(Debug, thiserror::Error)]
pub enum LakekeeperError {
    /// The client configuration is unusable (bad URL, unreadable CA
    /// bundle, missing credentials).
    #[error("invalid client configuration: {0}")]
    Config(String),

    /// The OAuth token exchange failed.
    #[error("token exchange failed: {0}")]
    Auth(String),

    /// The server answered with a non-success status. The remote message
    /// is carried verbatim.
    #[error("{operation}: {error}")]
    Api {
        operation: String,
        status: u16,
        error: ErrorModel,
    },

    /// The request never produced a response.
    #[error("{operation}: transport error")]
    Transport {
        operation: String,
        #[source]
        source: reqwest::Error,
    },

    /// The response body could not be decoded into the expected type.
    #[error("{operation}: failed to decode response")]
    Decode {
        operation: String,
        #[source]
        source: reqwest::Error,
    },

    /// The engine cancelled the surrounding operation.
    #[error("{operation}: cancelled")]
    Cancelled { operation: String },
}

impl LakekeeperError {
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            LakekeeperError::Api { status, .. } if *status == http::StatusCode::NOT_FOUND.as_u16()
        )
    }

    #[must_use]
    pub(crate) fn api(operation: &str, status: http::StatusCode, error: ErrorModel) -> Self {
        LakekeeperError::Api {
            operation: operation.to_string(),
            status: status.as_u16(),
            error,
        }
    }
}

pub type Result<T, E = LakekeeperError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_model_round_trips_server_payload() {
        let json = serde_json::json!({"error": {
            "message": "Warehouse not found",
            "type": "WarehouseNotFound",
            "code": 404
        }});
        let resp: ErrorResponse = serde_json::from_value(json.clone()).unwrap();
        assert_eq!(resp.error.message, "Warehouse not found");
        assert_eq!(resp.error.r#type, "WarehouseNotFound");
        assert_eq!(resp.error.code, 404);
        assert_eq!(serde_json::to_value(resp).unwrap(), json);
    }

    #[test]
    fn not_found_is_distinguished() {
        let err = LakekeeperError::api(
            "get warehouse",
            http::StatusCode::NOT_FOUND,
            ErrorModel::default(),
        );
        assert!(err.is_not_found());

        let err = LakekeeperError::api(
            "get warehouse",
            http::StatusCode::FORBIDDEN,
            ErrorModel::default(),
        );
        assert!(!err.is_not_found());
    }
}
