//! Authenticator backed by a caller-supplied access token.

use async_trait::async_trait;
use parking_lot::RwLock;
use webex_core::Authenticator;

/// Serves a fixed bearer token, e.g. a personal access token or a bot token.
///
/// Such tokens cannot be refreshed, so a 401 ends the request.
#[derive(Default)]
pub struct StaticTokenAuthenticator {
    token: RwLock<Option<String>>,
}

impl std::fmt::Debug for StaticTokenAuthenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticTokenAuthenticator")
            .field("authorized", &self.token.read().is_some())
            .finish()
    }
}

impl StaticTokenAuthenticator {
    pub fn new(token: impl Into<String>) -> Self {
        let token: String = token.into();
        let token = (!token.trim().is_empty()).then_some(token);
        Self { token: RwLock::new(token) }
    }

    pub fn set_token(&self, token: Option<String>) {
        *self.token.write() = token;
    }

    pub fn is_authorized(&self) -> bool {
        self.token.read().is_some()
    }
}

#[async_trait]
impl Authenticator for StaticTokenAuthenticator {
    async fn access_token(&self) -> Option<String> {
        self.token.read().clone()
    }

    async fn refresh_token(&self) -> Option<String> {
        None
    }
}
