//! Retry bookkeeping for a single request
//!
//! A request retries on 429 (after the server's Retry-After delay) and on
//! 401 once a fresh token is available. The state lives on the task that
//! runs the request.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, RETRY_AFTER};
use webex_domain::constants::{MAX_RETRY_AFTER_SECS, MAX_TOKEN_REFRESHES, MIN_RETRY_AFTER_SECS};
use webex_domain::{Result, WebexError};

#[derive(Debug, Default)]
pub struct RetryState {
    pub refresh_token_count: u32,
    pub pending_delay: Duration,
    pub new_access_token: Option<String>,
}

impl RetryState {
    /// Whether another token refresh is allowed.
    pub const fn can_refresh(&self) -> bool {
        self.refresh_token_count < MAX_TOKEN_REFRESHES
    }

    pub fn store_token(&mut self, token: String) {
        self.new_access_token = Some(token);
    }

    pub fn add_delay(&mut self, delay: Duration) {
        self.pending_delay += delay;
    }

    /// Applies a stored token before a retry.
    ///
    /// `Authorization` is only replaced when the request already carries it.
    /// The refresh count advances for every consumed token so an
    /// unauthenticated request cannot refresh forever.
    pub fn adapt(&mut self, headers: &mut HeaderMap) -> Result<()> {
        let Some(token) = self.new_access_token.take() else {
            return Ok(());
        };
        if headers.contains_key(AUTHORIZATION) {
            headers.insert(AUTHORIZATION, bearer(&token)?);
        }
        self.refresh_token_count += 1;
        Ok(())
    }
}

/// `Authorization` value for a token. The token never appears in errors.
pub fn bearer(token: &str) -> Result<HeaderValue> {
    let mut value = HeaderValue::from_str(&format!("Bearer {token}"))
        .map_err(|_| WebexError::NoAuth)?;
    value.set_sensitive(true);
    Ok(value)
}

/// Delay requested by a 429 response, clamped to [60 s, 3600 s].
///
/// A missing, zero or unparseable `Retry-After` counts as the minimum.
pub fn retry_after(headers: &HeaderMap) -> Duration {
    let seconds = headers
        .get(RETRY_AFTER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse::<u64>().ok())
        .unwrap_or(MIN_RETRY_AFTER_SECS)
        .clamp(MIN_RETRY_AFTER_SECS, MAX_RETRY_AFTER_SECS);
    Duration::from_secs(seconds)
}
