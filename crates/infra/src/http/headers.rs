//! Header policy for outgoing requests and redirect hops

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CACHE_CONTROL, PRAGMA};
use reqwest::{Method, StatusCode};
use webex_domain::constants::{HEADER_REQUEST_ID, HEADER_TRACKING_ID, HEADER_WEBEX_USER_AGENT};

/// Headers that only trusted hosts may see.
pub const TRACKING_HEADERS: [&str; 3] = [HEADER_TRACKING_ID, HEADER_WEBEX_USER_AGENT, HEADER_REQUEST_ID];

/// Disables caching for a request.
pub fn apply_no_cache(headers: &mut HeaderMap) {
    headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache"));
    headers.insert(PRAGMA, HeaderValue::from_static("no-cache"));
}

/// Removes the tracking headers.
pub fn strip_tracking(headers: &mut HeaderMap) {
    for name in TRACKING_HEADERS {
        if let Ok(name) = HeaderName::from_bytes(name.as_bytes()) {
            headers.remove(name);
        }
    }
}

/// Headers for the next redirect hop. The original headers, including
/// `Authorization`, carry over; tracking headers are dropped for untrusted
/// targets.
pub fn redirect_headers(original: &HeaderMap, target_trusted: bool) -> HeaderMap {
    let mut headers = original.clone();
    if !target_trusted {
        strip_tracking(&mut headers);
    }
    headers
}

/// Method for the next hop and whether the body is resent.
pub fn redirect_method(status: StatusCode, method: &Method) -> (Method, bool) {
    match status {
        StatusCode::SEE_OTHER => (Method::GET, false),
        StatusCode::MOVED_PERMANENTLY | StatusCode::FOUND if *method != Method::GET => {
            (Method::GET, false)
        }
        _ => (method.clone(), true),
    }
}

/// Statuses the executor follows.
pub fn is_followed_redirect(status: StatusCode) -> bool {
    matches!(
        status,
        StatusCode::MOVED_PERMANENTLY
            | StatusCode::FOUND
            | StatusCode::SEE_OTHER
            | StatusCode::TEMPORARY_REDIRECT
            | StatusCode::PERMANENT_REDIRECT
    )
}
