//! Error types used throughout the SDK

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{DEFAULT_SERVICE_ERROR_CODE, DEFAULT_SERVICE_ERROR_REASON};

/// Main error type for the Webex SDK
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum WebexError {
    /// The service answered with a failure status.
    #[error("The service returned an error {code}, {reason}")]
    ServiceFailed { code: i64, reason: String },

    /// No device has been registered yet.
    #[error("unregistered")]
    Unregistered,

    /// The caller asked for something the SDK cannot do (e.g. an identifier
    /// that does not resolve to a URL).
    #[error("{0}")]
    IllegalOperation(String),

    /// The SDK is in a state that does not allow the operation.
    #[error("{0}")]
    IllegalStatus(String),

    #[error("noAuth")]
    NoAuth,

    /// The meeting host pin or meeting password is required.
    #[error("{0}")]
    RequireHostPinOrMeetingPassword(String),

    #[error("Network error: {0}")]
    Network(String),

    /// The response arrived but could not be mapped into the expected shape.
    #[error("Response serialization failed: {0}")]
    Serialization(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Request cancelled")]
    Cancelled,
}

/// Coarse classification of a [`WebexError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Transport,
    Service,
    Serialization,
    Build,
    IllegalOperation,
    Auth,
    Cancelled,
    Config,
}

impl WebexError {
    /// Service failure carrying the default error code.
    pub fn service_failed(reason: impl Into<String>) -> Self {
        Self::ServiceFailed { code: DEFAULT_SERVICE_ERROR_CODE, reason: reason.into() }
    }

    /// Service failure for a response that carried no usable message.
    pub fn service_failed_without_message() -> Self {
        Self::service_failed(DEFAULT_SERVICE_ERROR_REASON)
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ServiceFailed { .. } | Self::RequireHostPinOrMeetingPassword(_) => {
                ErrorKind::Service
            }
            Self::Network(_) => ErrorKind::Transport,
            Self::Serialization(_) => ErrorKind::Serialization,
            Self::InvalidUrl(_) => ErrorKind::Build,
            Self::IllegalOperation(_) | Self::IllegalStatus(_) | Self::Unregistered => {
                ErrorKind::IllegalOperation
            }
            Self::NoAuth => ErrorKind::Auth,
            Self::Cancelled => ErrorKind::Cancelled,
            Self::Config(_) => ErrorKind::Config,
        }
    }
}

impl From<serde_json::Error> for WebexError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Result type alias for SDK operations
pub type Result<T> = std::result::Result<T, WebexError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_failed_display() {
        let err = WebexError::service_failed("room not found");
        assert_eq!(err.to_string(), "The service returned an error -7000, room not found");
    }

    #[test]
    fn test_default_reason() {
        match WebexError::service_failed_without_message() {
            WebexError::ServiceFailed { code, reason } => {
                assert_eq!(code, -7000);
                assert_eq!(reason, "Service request failed without error message");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_kind_mapping() {
        assert_eq!(WebexError::Network("reset".into()).kind(), ErrorKind::Transport);
        assert_eq!(WebexError::InvalidUrl("::".into()).kind(), ErrorKind::Build);
        assert_eq!(
            WebexError::RequireHostPinOrMeetingPassword("pin".into()).kind(),
            ErrorKind::Service
        );
        assert_eq!(WebexError::IllegalOperation("x".into()).kind(), ErrorKind::IllegalOperation);
        assert_eq!(WebexError::Cancelled.kind(), ErrorKind::Cancelled);
    }

    #[test]
    fn test_serde_tagging() {
        let json = serde_json::to_value(WebexError::IllegalStatus("closed".into())).unwrap();
        assert_eq!(json, serde_json::json!({"type": "IllegalStatus", "message": "closed"}));

        let back: WebexError = serde_json::from_value(json).unwrap();
        assert_eq!(back, WebexError::IllegalStatus("closed".into()));
    }

    #[test]
    fn test_serde_json_error_is_serialization() {
        let err = serde_json::from_str::<u32>("nope").unwrap_err();
        assert_eq!(WebexError::from(err).kind(), ErrorKind::Serialization);
    }
}
