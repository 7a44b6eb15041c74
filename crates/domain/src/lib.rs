//! # Webex Domain
//!
//! Domain types and models for the Webex SDK core.
//!
//! This crate contains:
//! - Resource identifiers and their portable token encoding
//! - Public domain types (Space, Membership, read statuses, device models)
//! - The conversation object model
//! - Domain error types and Result definitions
//! - Configuration structures and constants
//!
//! ## Architecture
//! - No dependencies on other workspace crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
