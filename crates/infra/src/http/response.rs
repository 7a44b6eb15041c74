//! Service responses and body mapping

use reqwest::header::HeaderMap;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde_json::Value;
use url::Url;
use webex_domain::constants::LOCUS_PIN_REQUIRED_CODES;
use webex_domain::{Result, WebexError};

/// Status line and headers of the final HTTP response.
#[derive(Debug, Clone)]
pub struct HttpResponseInfo {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub url: Url,
}

/// Outcome of a service request: the raw response when one arrived, plus
/// the mapped result.
#[derive(Debug)]
pub struct ServiceResponse<T> {
    pub response: Option<HttpResponseInfo>,
    pub result: Result<T>,
}

impl<T> ServiceResponse<T> {
    pub const fn new(response: Option<HttpResponseInfo>, result: Result<T>) -> Self {
        Self { response, result }
    }

    /// Failure before any response arrived.
    pub const fn failed(error: WebexError) -> Self {
        Self { response: None, result: Err(error) }
    }

    pub fn status(&self) -> Option<StatusCode> {
        self.response.as_ref().map(|info| info.status)
    }

    pub fn into_result(self) -> Result<T> {
        self.result
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> ServiceResponse<U> {
        ServiceResponse { response: self.response, result: self.result.map(f) }
    }

    pub fn and_then<U, F: FnOnce(T) -> Result<U>>(self, f: F) -> ServiceResponse<U> {
        ServiceResponse { response: self.response, result: self.result.and_then(f) }
    }
}

/// Raw body of a successful response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawBody(pub Vec<u8>);

impl RawBody {
    pub fn is_empty(&self) -> bool {
        self.0.iter().all(u8::is_ascii_whitespace)
    }
}

/// Parses a successful body as JSON and applies the key path.
///
/// An empty 204/205 body maps to `null`.
pub fn json_value(status: StatusCode, body: &RawBody, key_path: Option<&str>) -> Result<Value> {
    let value = if body.is_empty() && is_reset_or_no_content(status) {
        Value::Null
    } else {
        serde_json::from_slice(&body.0)?
    };

    match key_path {
        Some(path) => apply_key_path(value, path),
        None => Ok(value),
    }
}

/// Decodes a successful body as UTF-8 text; an empty 200/202/204/205 body
/// maps to `""`.
pub fn string_value(status: StatusCode, body: &RawBody) -> Result<String> {
    let empty_ok = matches!(status, StatusCode::OK | StatusCode::ACCEPTED)
        || is_reset_or_no_content(status);
    if body.0.is_empty() && empty_ok {
        return Ok(String::new());
    }
    String::from_utf8(body.0.clone())
        .map_err(|err| WebexError::Serialization(format!("response is not UTF-8: {err}")))
}

pub fn object_value<T: DeserializeOwned>(value: Value) -> Result<T> {
    Ok(serde_json::from_value(value)?)
}

/// Maps an array value; `null` maps to an empty list.
pub fn array_value<T: DeserializeOwned>(value: Value) -> Result<Vec<T>> {
    match value {
        Value::Null => Ok(Vec::new()),
        Value::Array(_) => Ok(serde_json::from_value(value)?),
        other => Err(WebexError::Serialization(format!("expected an array, got {other}"))),
    }
}

/// Walks a dotted key path such as `items` or `result.items`.
pub fn apply_key_path(value: Value, path: &str) -> Result<Value> {
    path.split('.').filter(|key| !key.is_empty()).try_fold(value, |current, key| match current {
        Value::Object(mut map) => map
            .remove(key)
            .ok_or_else(|| WebexError::Serialization(format!("missing key '{key}' in response"))),
        _ => Err(WebexError::Serialization(format!("cannot read key '{key}' from a non-object"))),
    })
}

/// Error for a non-success response.
pub fn service_error(status: StatusCode, body: &[u8]) -> WebexError {
    let parsed: Option<Value> = serde_json::from_slice(body).ok();
    let message = parsed
        .as_ref()
        .and_then(|json| json.get("message"))
        .and_then(Value::as_str)
        .filter(|message| !message.is_empty())
        .map(str::to_string);
    let error_code = parsed.as_ref().and_then(|json| json.get("errorCode")).and_then(|code| {
        code.as_i64().or_else(|| code.as_str().and_then(|s| s.trim().parse().ok()))
    });

    tracing::debug!(%status, ?error_code, "service returned failure");

    match (error_code, message) {
        (Some(code), message) if LOCUS_PIN_REQUIRED_CODES.contains(&code) => {
            WebexError::RequireHostPinOrMeetingPassword(
                message.unwrap_or_else(|| format!("error code {code}")),
            )
        }
        (_, Some(message)) => WebexError::service_failed(message),
        (_, None) => WebexError::service_failed_without_message(),
    }
}

fn is_reset_or_no_content(status: StatusCode) -> bool {
    matches!(status, StatusCode::NO_CONTENT | StatusCode::RESET_CONTENT)
}
