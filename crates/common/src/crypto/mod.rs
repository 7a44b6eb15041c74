//! Symmetric content encryption for space-scoped string fields.

pub mod encryption;

pub use encryption::{ContentEncryption, SpaceKey};
