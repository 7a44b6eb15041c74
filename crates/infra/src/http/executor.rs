//! Service request executor
//!
//! Runs a [`ServiceRequest`]: attaches the bearer token, follows redirects
//! under the header policy, waits out 429s, refreshes the token on 401 and
//! maps the outcome into a [`ServiceResponse`]. Every await point races the
//! request's cancellation token.

use std::future::Future;

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE, LOCATION};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::runtime::Handle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument, warn};
use url::Url;
use webex_common::{ErrorClassification, ErrorSeverity};
use webex_domain::{Result, WebexError};

use super::headers::{apply_no_cache, is_followed_redirect, redirect_headers, redirect_method};
use super::request::ServiceRequest;
use super::response::{
    array_value, json_value, object_value, service_error, string_value, HttpResponseInfo, RawBody,
    ServiceResponse,
};
use super::retry::{bearer, retry_after, RetryState};
use crate::errors::InfraError;

/// Handle to a dispatched request.
#[derive(Debug, Clone)]
pub struct RequestHandle {
    cancel: CancellationToken,
}

impl RequestHandle {
    /// Cancels the request; its handler receives [`WebexError::Cancelled`]
    /// unless it already completed.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

struct HttpReply {
    info: HttpResponseInfo,
    body: RawBody,
}

impl ServiceRequest {
    /// Runs the request with its own cancellation token.
    pub async fn execute(&self) -> ServiceResponse<RawBody> {
        self.execute_with_cancel(&self.cancel).await
    }

    /// Runs the request, stopping with [`WebexError::Cancelled`] as soon as
    /// `cancel` fires.
    #[instrument(skip_all, fields(method = %self.method, url = %self.url))]
    pub async fn execute_with_cancel(&self, cancel: &CancellationToken) -> ServiceResponse<RawBody> {
        let outcome = self.run(cancel).await;
        if let Err(error) = &outcome.result {
            log_failure(error, outcome.status());
        }
        outcome
    }

    pub async fn response_json(&self) -> ServiceResponse<Value> {
        let raw = self.execute().await;
        self.map_json(raw)
    }

    pub async fn response_object<T: DeserializeOwned>(&self) -> ServiceResponse<T> {
        self.response_json().await.and_then(object_value)
    }

    pub async fn response_array<T: DeserializeOwned>(&self) -> ServiceResponse<Vec<T>> {
        self.response_json().await.and_then(array_value)
    }

    pub async fn response_string(&self) -> ServiceResponse<String> {
        let raw = self.execute().await;
        let status = raw.status().unwrap_or(StatusCode::OK);
        raw.and_then(|body| string_value(status, &body))
    }

    /// Spawns the request on its queue (or the current runtime) and hands
    /// the JSON response to `handler` exactly once.
    pub fn dispatch<F>(self, handler: F) -> RequestHandle
    where
        F: FnOnce(ServiceResponse<Value>) + Send + 'static,
    {
        let cancel = self.cancel.child_token();
        let handle = RequestHandle { cancel: cancel.clone() };

        let runtime = match self.queue.clone().map_or_else(Handle::try_current, Ok) {
            Ok(runtime) => runtime,
            Err(err) => {
                handler(ServiceResponse::failed(WebexError::IllegalStatus(format!(
                    "no async runtime to dispatch on: {err}"
                ))));
                return handle;
            }
        };

        runtime.spawn(async move {
            let raw = self.execute_with_cancel(&cancel).await;
            handler(self.map_json(raw));
        });
        handle
    }

    fn map_json(&self, raw: ServiceResponse<RawBody>) -> ServiceResponse<Value> {
        let status = raw.status().unwrap_or(StatusCode::OK);
        let key_path = self.key_path.as_deref();
        raw.and_then(|body| json_value(status, &body, key_path))
    }

    async fn run(&self, cancel: &CancellationToken) -> ServiceResponse<RawBody> {
        let mut headers = self.headers.clone();
        apply_no_cache(&mut headers);

        debug!(state = "unauthenticated");
        if let Some(authenticator) = &self.authenticator {
            match race(cancel, authenticator.access_token()).await {
                Ok(Some(token)) => match bearer(&token) {
                    Ok(value) => {
                        headers.insert(AUTHORIZATION, value);
                        debug!(state = "token_acquired");
                    }
                    Err(err) => return ServiceResponse::failed(err),
                },
                Ok(None) => debug!("no access token available, sending unauthenticated"),
                Err(err) => return ServiceResponse::failed(err),
            }
        }

        let mut state = RetryState::default();
        let mut attempt: u32 = 0;
        loop {
            attempt += 1;
            if let Err(err) = state.adapt(&mut headers) {
                return ServiceResponse::failed(err);
            }

            let reply = match race(cancel, self.send_following_redirects(&headers, attempt)).await {
                Ok(Ok(reply)) => reply,
                Ok(Err(err)) | Err(err) => return ServiceResponse::failed(err),
            };
            let status = reply.info.status;
            debug!(attempt, state = "sent", %status, "received HTTP response");

            if status.is_success() {
                debug!(attempt, state = "success");
                return ServiceResponse::new(Some(reply.info), Ok(reply.body));
            }

            if status == StatusCode::TOO_MANY_REQUESTS {
                let delay = retry_after(&reply.info.headers);
                state.add_delay(delay);
                debug!(
                    attempt,
                    state = "retrying",
                    delay_secs = delay.as_secs(),
                    pending_secs = state.pending_delay.as_secs(),
                    "rate limited"
                );
                if let Err(err) = race(cancel, self.session.sleeper().sleep(delay)).await {
                    return ServiceResponse::new(Some(reply.info), Err(err));
                }
                continue;
            }

            if status == StatusCode::UNAUTHORIZED {
                if let Some(authenticator) = &self.authenticator {
                    if state.can_refresh() {
                        match race(cancel, authenticator.refresh_token()).await {
                            Ok(Some(token)) => {
                                state.store_token(token);
                                debug!(attempt, state = "retrying", "access token refreshed");
                                continue;
                            }
                            Ok(None) => debug!(attempt, "token refresh returned no token"),
                            Err(err) => return ServiceResponse::new(Some(reply.info), Err(err)),
                        }
                    } else {
                        debug!(refreshes = state.refresh_token_count, "token refresh limit reached");
                    }
                }
            }

            let error = service_error(status, &reply.body.0);
            return ServiceResponse::new(Some(reply.info), Err(error));
        }
    }

    async fn send_following_redirects(&self, headers: &HeaderMap, attempt: u32) -> Result<HttpReply> {
        let client = self.session.client()?;
        let max_redirects = self.session.max_redirects();

        let mut url = self.url_with_query();
        let mut method = self.method.clone();
        let mut headers = headers.clone();
        let mut body = self.encoded_body()?;
        if let Some((_, content_type)) = &body {
            if self.form {
                headers.insert(CONTENT_TYPE, HeaderValue::from_static(*content_type));
            }
        }

        for hop in 0..=max_redirects {
            let mut request = client.request(method.clone(), url.clone()).headers(headers.clone());
            if let Some((bytes, _)) = &body {
                request = request.body(bytes.clone());
            }

            debug!(attempt, hop, %method, %url, "sending HTTP request");
            let response = request.send().await.map_err(|err| WebexError::from(InfraError::from(err)))?;
            let status = response.status();

            if is_followed_redirect(status) {
                if let Some(next) = redirect_target(&url, response.headers()) {
                    if hop == max_redirects {
                        return Err(WebexError::Network(format!(
                            "too many redirects (limit {max_redirects})"
                        )));
                    }
                    let (next_method, keep_body) = redirect_method(status, &method);
                    if !keep_body {
                        body = None;
                    }
                    headers = redirect_headers(&headers, self.session.is_trusted(&next));
                    debug!(attempt, hop, %status, from = %url, to = %next, "following redirect");
                    url = next;
                    method = next_method;
                    continue;
                }
            }

            let info = HttpResponseInfo {
                status,
                headers: response.headers().clone(),
                url: response.url().clone(),
            };
            let bytes = response.bytes().await.map_err(|err| WebexError::from(InfraError::from(err)))?;
            return Ok(HttpReply { info, body: RawBody(bytes.to_vec()) });
        }

        Err(WebexError::Network(format!("too many redirects (limit {max_redirects})")))
    }
}

fn redirect_target(current: &Url, headers: &HeaderMap) -> Option<Url> {
    let location = headers.get(LOCATION)?.to_str().ok()?;
    current.join(location).ok()
}

async fn race<F: Future>(cancel: &CancellationToken, future: F) -> Result<F::Output> {
    tokio::select! {
        biased;
        () = cancel.cancelled() => Err(WebexError::Cancelled),
        output = future => Ok(output),
    }
}

fn log_failure(error: &WebexError, status: Option<StatusCode>) {
    let classified = InfraError(error.clone());
    let status = status.map(|s| s.as_u16());
    match classified.severity() {
        ErrorSeverity::Info => debug!(state = "failed", ?status, %error, "service request stopped"),
        ErrorSeverity::Warning => warn!(
            state = "failed",
            ?status,
            retryable = classified.is_retryable(),
            %error,
            "service request failed"
        ),
        ErrorSeverity::Error | ErrorSeverity::Critical => {
            tracing::error!(state = "failed", ?status, %error, "service request failed");
        }
    }
}
