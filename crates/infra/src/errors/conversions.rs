//! Conversions from external infrastructure errors into domain errors.

use reqwest::Error as HttpError;
use webex_common::{CommonError, ErrorClassification, ErrorSeverity};
use webex_domain::WebexError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InfraError(pub WebexError);

impl From<InfraError> for WebexError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<WebexError> for InfraError {
    fn from(value: WebexError) -> Self {
        Self(value)
    }
}

trait IntoWebexError {
    fn into_webex(self) -> WebexError;
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → WebexError */
/* -------------------------------------------------------------------------- */

impl IntoWebexError for HttpError {
    fn into_webex(self) -> WebexError {
        if self.is_builder() {
            return WebexError::InvalidUrl(self.to_string());
        }

        if self.is_timeout() {
            return WebexError::Network("HTTP request timed out".into());
        }

        #[cfg(not(target_arch = "wasm32"))]
        if self.is_connect() {
            return WebexError::Network("HTTP connection failure".into());
        }

        if self.is_decode() || self.is_body() {
            return WebexError::Network(format!("failed to read response body: {self}"));
        }

        WebexError::Network(self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        Self(value.into_webex())
    }
}

/* -------------------------------------------------------------------------- */
/* CommonError → WebexError */
/* -------------------------------------------------------------------------- */

impl IntoWebexError for CommonError {
    fn into_webex(self) -> WebexError {
        match self {
            CommonError::Validation { field, message } => {
                WebexError::IllegalOperation(format!("invalid {field}: {message}"))
            }
            CommonError::Crypto { message } => WebexError::Serialization(message),
            CommonError::Serialization { message, format } => {
                WebexError::Serialization(format!("{format}: {message}"))
            }
        }
    }
}

impl From<CommonError> for InfraError {
    fn from(value: CommonError) -> Self {
        Self(value.into_webex())
    }
}

/* -------------------------------------------------------------------------- */
/* Classification */
/* -------------------------------------------------------------------------- */

impl ErrorClassification for InfraError {
    fn is_retryable(&self) -> bool {
        matches!(self.0, WebexError::Network(_))
    }

    fn severity(&self) -> ErrorSeverity {
        match &self.0 {
            WebexError::Cancelled => ErrorSeverity::Info,
            WebexError::ServiceFailed { .. }
            | WebexError::RequireHostPinOrMeetingPassword(_)
            | WebexError::Network(_)
            | WebexError::NoAuth => ErrorSeverity::Warning,
            WebexError::Unregistered
            | WebexError::IllegalOperation(_)
            | WebexError::IllegalStatus(_)
            | WebexError::Serialization(_)
            | WebexError::InvalidUrl(_) => ErrorSeverity::Error,
            WebexError::Config(_) => ErrorSeverity::Critical,
        }
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */
