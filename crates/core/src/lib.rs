//! # Webex Core
//!
//! Pure SDK logic - no infrastructure dependencies.
//!
//! This crate contains:
//! - Port interfaces (authenticator, device store, content cipher)
//! - The registered device context
//! - The service endpoint directory
//! - Identifier to URL resolution
//!
//! ## Architecture Principles
//! - Only depends on `webex-domain`
//! - No HTTP or platform code
//! - All external collaborators via traits

pub mod auth;
pub mod content;
pub mod device;
pub mod endpoints;
pub mod identity;

pub use auth::ports::Authenticator;
pub use content::ports::ContentCipher;
pub use content::{decrypt_activity, decrypt_object, encrypt_object};
pub use device::ports::DeviceStore;
pub use device::Device;
pub use endpoints::{Service, ServiceDirectory};
pub use identity::Identifier;
