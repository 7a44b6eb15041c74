//! Shared error vocabulary
//!
//! [`CommonError`] covers failures raised by the utilities in this crate.
//! [`ErrorClassification`] is the trait every SDK error implements so retry
//! and logging decisions can be made without matching on concrete types.
//!
//! ## Usage
//!
//! ```rust
//! use webex_common::error::{CommonError, ErrorClassification, ErrorSeverity};
//!
//! let err = CommonError::validation("key", "must be 32 bytes");
//! assert!(!err.is_retryable());
//! assert_eq!(err.severity(), ErrorSeverity::Error);
//! ```

use std::fmt;
use std::time::Duration;

use thiserror::Error;

/// Standard result type using CommonError
pub type CommonResult<T> = Result<T, CommonError>;

/// Errors raised by shared utilities.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommonError {
    #[error("Serialization error ({format}): {message}")]
    Serialization { message: String, format: String },

    #[error("Validation error for field '{field}': {message}")]
    Validation { field: String, message: String },

    /// Encryption or decryption failed.
    #[error("Crypto error: {message}")]
    Crypto { message: String },
}

impl CommonError {
    pub fn serialization_format<F: Into<String>, S: Into<String>>(format: F, message: S) -> Self {
        Self::Serialization { message: message.into(), format: format.into() }
    }

    pub fn validation<F: Into<String>, M: Into<String>>(field: F, message: M) -> Self {
        Self::Validation { field: field.into(), message: message.into() }
    }

    pub fn crypto<S: Into<String>>(message: S) -> Self {
        Self::Crypto { message: message.into() }
    }
}

impl ErrorClassification for CommonError {
    fn is_retryable(&self) -> bool {
        false
    }

    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Serialization { .. } | Self::Validation { .. } => ErrorSeverity::Error,
            Self::Crypto { .. } => ErrorSeverity::Warning,
        }
    }
}

/// Classification shared by every SDK error type.
pub trait ErrorClassification {
    /// Check if this error is retryable
    ///
    /// Retryable errors are transient: rate limiting, dropped connections,
    /// expired tokens that a refresh can fix.
    fn is_retryable(&self) -> bool;

    /// Get the error severity level
    ///
    /// Used for logging decisions.
    fn severity(&self) -> ErrorSeverity;

    /// Check if this is a critical error requiring immediate attention
    fn is_critical(&self) -> bool {
        self.severity() == ErrorSeverity::Critical
    }

    /// Get the suggested retry delay if applicable
    fn retry_after(&self) -> Option<Duration> {
        None
    }
}

/// Error severity levels for monitoring and alerting
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    /// Informational, typically for debugging
    Info,
    /// Warning, should be monitored but not critical
    Warning,
    /// Error, requires attention and action
    Error,
    /// Critical, immediate action required
    Critical,
}

impl fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => write!(f, "INFO"),
            Self::Warning => write!(f, "WARN"),
            Self::Error => write!(f, "ERROR"),
            Self::Critical => write!(f, "CRITICAL"),
        }
    }
}
