//! Port interface for content encryption
//!
//! Key exchange with KMS is out of scope; implementations receive the key
//! material (or a handle they know how to resolve) as a string.

use webex_domain::Result;

pub trait ContentCipher: Send + Sync {
    fn encrypt(&self, key: &str, plaintext: &str) -> Result<String>;

    fn decrypt(&self, key: &str, ciphertext: &str) -> Result<String>;
}
