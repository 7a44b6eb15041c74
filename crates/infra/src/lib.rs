//! # Webex Infrastructure
//!
//! Infrastructure implementations of the core ports.
//!
//! This crate contains:
//! - The HTTP session, request builder and executor (retry, redirects,
//!   token refresh, cancellation)
//! - Space, membership, message and device clients
//! - Device registration and its stores
//! - Configuration loading and tracing setup
//! - The AES content cipher and a static-token authenticator
//!
//! ## Architecture
//! - Implements traits defined in `webex-core`
//! - Depends on `webex-common` and `webex-domain`
//! - Contains all "impure" code (network, filesystem, environment)

pub mod auth;
pub mod clients;
pub mod config;
pub mod crypto;
pub mod device;
pub mod errors;
pub mod http;
pub mod observability;
pub mod webex;

// Re-export commonly used items
pub use auth::StaticTokenAuthenticator;
pub use clients::{
    Before, ClientContext, ConversationKey, DeviceClient, MembershipClient, MembershipTarget,
    MessageClient, SpaceClient,
};
pub use crypto::{AesContentCipher, KeyEncoding};
pub use device::{DeviceService, InMemoryDeviceStore, JsonFileDeviceStore};
pub use errors::InfraError;
pub use http::{
    HttpResponseInfo, HttpSession, HttpSessionBuilder, RawBody, RequestHandle, RequestParameter,
    ServiceRequest, ServiceRequestBuilder, ServiceResponse,
};
pub use webex::{Webex, WebexBuilder};
