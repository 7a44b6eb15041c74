//! Service request builder
//!
//! A [`ServiceRequestBuilder`] accumulates URL, headers and parameters and
//! produces an immutable [`ServiceRequest`]. Problems found while building
//! (bad URL, bad header) are held back and reported by
//! [`ServiceRequestBuilder::build`].

use std::sync::Arc;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Method;
use tokio::runtime::Handle;
use tokio_util::sync::CancellationToken;
use url::Url;
use webex_core::{Authenticator, Device, Service};
use webex_domain::constants::{
    CONTENT_TYPE_FORM, CONTENT_TYPE_JSON, HEADER_CONTENT_TYPE, HEADER_REQUEST_ID,
    HEADER_TRACKING_ID, HEADER_USER_AGENT, HEADER_WEBEX_USER_AGENT,
};
use webex_domain::{Result, WebexError};

use super::client::HttpSession;
use super::parameters::RequestParameter;

/// Fluent builder for a [`ServiceRequest`].
pub struct ServiceRequestBuilder {
    session: Arc<HttpSession>,
    url: Option<Url>,
    headers: HeaderMap,
    method: Method,
    body: Option<RequestParameter>,
    query: Option<RequestParameter>,
    key_path: Option<String>,
    queue: Option<Handle>,
    form: Option<bool>,
    authenticator: Option<Arc<dyn Authenticator>>,
    cancel: Option<CancellationToken>,
    deferred: Option<WebexError>,
}

impl ServiceRequestBuilder {
    /// Request against the device's URL for `service`, falling back to the
    /// global URL.
    pub fn homed(session: &Arc<HttpSession>, service: Service, device: Option<&Device>) -> Self {
        let base = session.directory().base_url(service, device);
        Self::endpoint(session, &base)
    }

    /// Request against the global URL for `service`.
    pub fn global(session: &Arc<HttpSession>, service: Service) -> Self {
        let base = session.directory().global_url(service);
        Self::endpoint(session, &base)
    }

    /// Request against an absolute URL.
    pub fn endpoint(session: &Arc<HttpSession>, url: &str) -> Self {
        let (url, deferred) = match Url::parse(url) {
            Ok(url) if url.cannot_be_a_base() => {
                (None, Some(WebexError::InvalidUrl(format!("{url} cannot take path segments"))))
            }
            Ok(url) => (Some(url), None),
            Err(err) => (None, Some(WebexError::InvalidUrl(format!("{url}: {err}")))),
        };

        let mut builder = Self {
            session: Arc::clone(session),
            url,
            headers: HeaderMap::new(),
            method: Method::GET,
            body: None,
            query: None,
            key_path: None,
            queue: None,
            form: None,
            authenticator: None,
            cancel: None,
            deferred,
        };
        builder.apply_default_headers();
        builder
    }

    fn apply_default_headers(&mut self) {
        let user_agent = self.session.user_agent().to_string();
        self.set_header(HEADER_CONTENT_TYPE, CONTENT_TYPE_JSON);
        self.set_header(HEADER_USER_AGENT, &user_agent);

        let trusted = self.url.as_ref().is_some_and(|url| self.session.is_trusted(url));
        if trusted {
            let tracking_id = self.session.next_tracking_id();
            self.set_header(HEADER_TRACKING_ID, &tracking_id);
            self.set_header(HEADER_WEBEX_USER_AGENT, &user_agent);
            self.set_header(HEADER_REQUEST_ID, &uuid::Uuid::new_v4().to_string());
        }
    }

    fn set_header(&mut self, name: &str, value: &str) {
        match (HeaderName::from_bytes(name.as_bytes()), HeaderValue::from_str(value)) {
            (Ok(name), Ok(value)) => {
                self.headers.insert(name, value);
            }
            _ => {
                self.deferred.get_or_insert_with(|| {
                    WebexError::IllegalOperation(format!("invalid header {name}"))
                });
            }
        }
    }

    /// Appends one path segment.
    pub fn path(mut self, segment: impl AsRef<str>) -> Self {
        if let Some(url) = self.url.as_mut() {
            if let Ok(mut segments) = url.path_segments_mut() {
                segments.pop_if_empty().push(segment.as_ref());
            }
        }
        self
    }

    pub fn method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    /// Merges headers, replacing existing values with the same name.
    pub fn headers<I, K, V>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        for (name, value) in headers {
            self.set_header(name.as_ref(), value.as_ref());
        }
        self
    }

    pub fn header(self, name: &str, value: &str) -> Self {
        self.headers([(name, value)])
    }

    pub fn body(mut self, body: RequestParameter) -> Self {
        self.body = Some(body);
        self
    }

    pub fn query(mut self, query: RequestParameter) -> Self {
        self.query = Some(query);
        self
    }

    /// Dotted path into the response JSON, e.g. `items`.
    pub fn key_path(mut self, key_path: impl Into<String>) -> Self {
        self.key_path = Some(key_path.into());
        self
    }

    /// Runtime that [`ServiceRequest::dispatch`] spawns on.
    pub fn queue(mut self, handle: Handle) -> Self {
        self.queue = Some(handle);
        self
    }

    pub fn form(mut self, form: bool) -> Self {
        self.form = Some(form);
        self
    }

    pub fn authenticator(mut self, authenticator: Arc<dyn Authenticator>) -> Self {
        self.authenticator = Some(authenticator);
        self
    }

    pub fn cancel_token(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Finalises the request.
    ///
    /// # Errors
    /// Returns the first problem recorded while building, usually
    /// [`WebexError::InvalidUrl`].
    pub fn build(self) -> Result<ServiceRequest> {
        if let Some(err) = self.deferred {
            return Err(err);
        }
        let url = self
            .url
            .ok_or_else(|| WebexError::InvalidUrl("request has no base URL".into()))?;

        let form = self.form.unwrap_or_else(|| {
            self.headers
                .get(reqwest::header::CONTENT_TYPE)
                .and_then(|value| value.to_str().ok())
                .is_some_and(|value| value.contains(CONTENT_TYPE_FORM))
        });

        Ok(ServiceRequest {
            session: self.session,
            url,
            headers: self.headers,
            method: self.method,
            body: self.body,
            query: self.query,
            key_path: self.key_path,
            queue: self.queue,
            form,
            authenticator: self.authenticator,
            cancel: self.cancel.unwrap_or_default(),
        })
    }
}

/// A fully built request. Execution lives in [`super::executor`].
pub struct ServiceRequest {
    pub(crate) session: Arc<HttpSession>,
    pub(crate) url: Url,
    pub(crate) headers: HeaderMap,
    pub(crate) method: Method,
    pub(crate) body: Option<RequestParameter>,
    pub(crate) query: Option<RequestParameter>,
    pub(crate) key_path: Option<String>,
    pub(crate) queue: Option<Handle>,
    pub(crate) form: bool,
    pub(crate) authenticator: Option<Arc<dyn Authenticator>>,
    pub(crate) cancel: CancellationToken,
}

impl std::fmt::Debug for ServiceRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceRequest")
            .field("method", &self.method)
            .field("url", &self.url.as_str())
            .field("key_path", &self.key_path)
            .field("form", &self.form)
            .field("authenticated", &self.authenticator.is_some())
            .finish_non_exhaustive()
    }
}

impl ServiceRequest {
    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> Option<&RequestParameter> {
        self.body.as_ref()
    }

    pub fn query(&self) -> Option<&RequestParameter> {
        self.query.as_ref()
    }

    pub fn key_path(&self) -> Option<&str> {
        self.key_path.as_deref()
    }

    pub const fn is_form(&self) -> bool {
        self.form
    }

    /// URL with the query parameters applied.
    pub(crate) fn url_with_query(&self) -> Url {
        let mut url = self.url.clone();
        if let Some(query) = self.query.as_ref().filter(|q| !q.is_empty()) {
            url.query_pairs_mut().extend_pairs(query.to_pairs());
        }
        url
    }

    /// Encoded body bytes and the content type they need.
    pub(crate) fn encoded_body(&self) -> Result<Option<(Vec<u8>, &'static str)>> {
        let Some(body) = self.body.as_ref() else {
            return Ok(None);
        };
        if self.form {
            Ok(Some((body.to_form().into_bytes(), CONTENT_TYPE_FORM)))
        } else {
            Ok(Some((serde_json::to_vec(&body.to_json())?, CONTENT_TYPE_JSON)))
        }
    }
}
