//! HTTP plumbing: session, request builder and executor

pub mod client;
pub mod executor;
pub mod headers;
pub mod parameters;
pub mod request;
pub mod response;
pub mod retry;

pub use client::{HttpSession, HttpSessionBuilder};
pub use executor::RequestHandle;
pub use parameters::RequestParameter;
pub use request::{ServiceRequest, ServiceRequestBuilder};
pub use response::{HttpResponseInfo, RawBody, ServiceResponse};
pub use retry::RetryState;
