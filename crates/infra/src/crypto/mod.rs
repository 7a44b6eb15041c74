//! Content cipher adapters

pub mod content;

pub use content::{AesContentCipher, KeyEncoding};
