//! AES-256-GCM encryption of short string fields.
//!
//! Message and space fields (display names, comment bodies) are encrypted
//! with a key scoped to the space. The wire format is
//! `base64(nonce || ciphertext)`, with the 12-byte nonce freshly drawn for
//! every call.
//!
//! ## Usage
//!
//! ```rust
//! use webex_common::crypto::{ContentEncryption, SpaceKey};
//!
//! let key = SpaceKey::generate();
//! let sealed = ContentEncryption::encrypt_str(&key, "quarterly planning")?;
//! assert_eq!(ContentEncryption::decrypt_str(&key, &sealed)?, "quarterly planning");
//! # Ok::<(), webex_common::error::CommonError>(())
//! ```

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::{Digest, Sha256};

use crate::error::{CommonError, CommonResult};

const KEY_LEN: usize = 32;
const NONCE_LEN: usize = 12;

/// 256-bit symmetric key for one space.
#[derive(Clone, PartialEq, Eq)]
pub struct SpaceKey([u8; KEY_LEN]);

impl std::fmt::Debug for SpaceKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("SpaceKey").field(&"[REDACTED]").finish()
    }
}

impl SpaceKey {
    /// Key from exactly 32 raw bytes.
    pub fn from_bytes(bytes: &[u8]) -> CommonResult<Self> {
        let key: [u8; KEY_LEN] = bytes
            .try_into()
            .map_err(|_| CommonError::validation("key", "space key must be exactly 32 bytes"))?;
        Ok(Self(key))
    }

    /// Key from a base64 string holding 32 raw bytes.
    pub fn from_base64(encoded: &str) -> CommonResult<Self> {
        let bytes = BASE64
            .decode(encoded.trim())
            .map_err(|e| CommonError::serialization_format("base64", e.to_string()))?;
        Self::from_bytes(&bytes)
    }

    /// Key derived from arbitrary key material (e.g. a JWK secret) with SHA-256.
    pub fn derive(material: &str) -> Self {
        let digest = Sha256::digest(material.as_bytes());
        let mut key = [0u8; KEY_LEN];
        key.copy_from_slice(&digest);
        Self(key)
    }

    pub fn generate() -> Self {
        let mut key = [0u8; KEY_LEN];
        OsRng.fill_bytes(&mut key);
        Self(key)
    }

    pub fn to_base64(&self) -> String {
        BASE64.encode(self.0)
    }

    fn cipher(&self) -> CommonResult<Aes256Gcm> {
        Aes256Gcm::new_from_slice(&self.0)
            .map_err(|e| CommonError::crypto(format!("failed to create cipher: {e}")))
    }
}

/// Stateless string encryption helpers.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContentEncryption;

impl ContentEncryption {
    pub fn encrypt_str(key: &SpaceKey, plaintext: &str) -> CommonResult<String> {
        let mut nonce = [0u8; NONCE_LEN];
        OsRng.fill_bytes(&mut nonce);

        let ciphertext = key
            .cipher()?
            .encrypt(&Nonce::from(nonce), plaintext.as_bytes())
            .map_err(|e| CommonError::crypto(format!("encryption failed: {e}")))?;

        let mut sealed = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        sealed.extend_from_slice(&nonce);
        sealed.extend_from_slice(&ciphertext);
        Ok(BASE64.encode(sealed))
    }

    pub fn decrypt_str(key: &SpaceKey, sealed: &str) -> CommonResult<String> {
        let bytes = BASE64
            .decode(sealed.trim())
            .map_err(|e| CommonError::serialization_format("base64", e.to_string()))?;
        if bytes.len() <= NONCE_LEN {
            return Err(CommonError::crypto("payload shorter than nonce"));
        }

        let (nonce, ciphertext) = bytes.split_at(NONCE_LEN);
        let nonce: [u8; NONCE_LEN] = nonce
            .try_into()
            .map_err(|_| CommonError::crypto("nonce must be exactly 12 bytes"))?;
        let plaintext = key
            .cipher()?
            .decrypt(&Nonce::from(nonce), ciphertext)
            .map_err(|e| CommonError::crypto(format!("decryption failed: {e}")))?;

        String::from_utf8(plaintext)
            .map_err(|e| CommonError::crypto(format!("plaintext is not UTF-8: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_nonce_per_call() {
        let key = SpaceKey::generate();
        let a = ContentEncryption::encrypt_str(&key, "same").unwrap();
        let b = ContentEncryption::encrypt_str(&key, "same").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_wrong_key_fails() {
        let sealed = ContentEncryption::encrypt_str(&SpaceKey::generate(), "secret").unwrap();
        let err = ContentEncryption::decrypt_str(&SpaceKey::generate(), &sealed).unwrap_err();
        assert!(matches!(err, CommonError::Crypto { .. }));
    }

    #[test]
    fn test_short_payload_rejected() {
        let key = SpaceKey::generate();
        let err = ContentEncryption::decrypt_str(&key, &BASE64.encode([0u8; 4])).unwrap_err();
        assert_eq!(err, CommonError::crypto("payload shorter than nonce"));
    }

    #[test]
    fn test_key_validation() {
        assert!(SpaceKey::from_bytes(&[1u8; 16]).is_err());
        assert!(SpaceKey::from_base64("%%%").is_err());

        let key = SpaceKey::generate();
        assert_eq!(SpaceKey::from_base64(&key.to_base64()).unwrap(), key);
    }

    #[test]
    fn test_derive_is_deterministic() {
        assert_eq!(SpaceKey::derive("kms://keys/1"), SpaceKey::derive("kms://keys/1"));
        assert_ne!(SpaceKey::derive("kms://keys/1"), SpaceKey::derive("kms://keys/2"));
    }

    #[test]
    fn test_debug_redacts_key() {
        let rendered = format!("{:?}", SpaceKey::generate());
        assert_eq!(rendered, "SpaceKey(\"[REDACTED]\")");
    }
}
