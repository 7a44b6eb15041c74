//! AES-256-GCM implementation of the [`ContentCipher`] port.

use webex_common::{CommonError, ContentEncryption, ErrorClassification, ErrorSeverity, SpaceKey};
use webex_core::ContentCipher;
use webex_domain::{Result, WebexError};

use crate::errors::InfraError;

/// How the key string handed to the cipher is turned into a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyEncoding {
    /// Base64 of exactly 32 raw bytes.
    #[default]
    Base64,
    /// Arbitrary key material hashed with SHA-256.
    Derived,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AesContentCipher {
    encoding: KeyEncoding,
}

impl AesContentCipher {
    pub const fn new(encoding: KeyEncoding) -> Self {
        Self { encoding }
    }

    fn key(&self, key: &str) -> std::result::Result<SpaceKey, CommonError> {
        match self.encoding {
            KeyEncoding::Base64 => SpaceKey::from_base64(key),
            KeyEncoding::Derived => Ok(SpaceKey::derive(key)),
        }
    }
}

impl ContentCipher for AesContentCipher {
    fn encrypt(&self, key: &str, plaintext: &str) -> Result<String> {
        self.key(key)
            .and_then(|key| ContentEncryption::encrypt_str(&key, plaintext))
            .map_err(into_webex)
    }

    fn decrypt(&self, key: &str, ciphertext: &str) -> Result<String> {
        self.key(key)
            .and_then(|key| ContentEncryption::decrypt_str(&key, ciphertext))
            .map_err(into_webex)
    }
}

fn into_webex(error: CommonError) -> WebexError {
    if error.severity() >= ErrorSeverity::Error {
        tracing::warn!(%error, "content key rejected");
    } else {
        tracing::debug!(%error, "content cipher failed");
    }
    InfraError::from(error).into()
}
