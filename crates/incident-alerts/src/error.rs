//! Error types for the incident-alerts crate.

use thiserror::Error;

/// Errors that can occur while building or delivering an alert.
#[derive(Debug, Error)]
pub enum AlertError {
    /// Connection settings are missing or malformed.
    #[error("invalid configuration: {reason}")]
    InvalidConfig {
        /// The reason the configuration is invalid.
        reason: String,
    },

    /// The free-form metadata could not be used.
    #[error("invalid metadata: {reason}")]
    InvalidMetadata {
        /// The reason the metadata was rejected.
        reason: String,
    },

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    SerializationError(String),

    /// The request never produced a response.
    #[error("failed to send request: {reason}")]
    Transport {
        /// The underlying transport failure.
        reason: String,
    },

    /// The API answered with something other than `202 Accepted`.
    #[error("failed to send notification: {status}")]
    UnexpectedStatus {
        /// Status line text, e.g. `500 Internal Server Error`.
        status: String,
    },
}

impl From<serde_json::Error> for AlertError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError(err.to_string())
    }
}

impl From<reqwest::Error> for AlertError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport {
            reason: err.to_string(),
        }
    }
}

/// Result type for alert operations.
pub type Result<T> = std::result::Result<T, AlertError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_invalid_config() {
        let err = AlertError::InvalidConfig {
            reason: "token cannot be empty".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "invalid configuration: token cannot be empty"
        );
    }

    #[test]
    fn error_display_invalid_metadata() {
        let err = AlertError::InvalidMetadata {
            reason: "expected a JSON object".to_string(),
        };
        assert_eq!(err.to_string(), "invalid metadata: expected a JSON object");
    }

    #[test]
    fn error_display_transport() {
        let err = AlertError::Transport {
            reason: "connection refused".to_string(),
        };
        assert_eq!(err.to_string(), "failed to send request: connection refused");
    }

    #[test]
    fn error_display_unexpected_status() {
        let err = AlertError::UnexpectedStatus {
            status: "500 Internal Server Error".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "failed to send notification: 500 Internal Server Error"
        );
    }

    #[test]
    fn error_from_serde_json() {
        let json_err = serde_json::from_str::<String>("invalid json");
        assert!(json_err.is_err());
        let alert_err: AlertError = json_err.unwrap_err().into();
        assert!(matches!(alert_err, AlertError::SerializationError(_)));
    }
}
