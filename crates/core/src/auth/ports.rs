//! Port interface for access token acquisition
//!
//! The SDK never performs the OAuth/JWT flows itself; embedders plug in an
//! [`Authenticator`] that hands out bearer tokens.

use async_trait::async_trait;

/// Source of bearer tokens for service requests.
#[async_trait]
pub trait Authenticator: Send + Sync {
    /// Current access token, or `None` when the user is not authorized.
    async fn access_token(&self) -> Option<String>;

    /// Obtain a fresh token after the server rejected the current one.
    ///
    /// Returning `None` means the token cannot be refreshed and the request
    /// fails without another attempt.
    async fn refresh_token(&self) -> Option<String>;
}
