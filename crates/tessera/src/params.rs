//! Parameter sets describing a token scheme.
//!
//! A parameter set is a plain constant. Picking a scheme means passing a
//! different `Params` value to [`crate::Signer::new`].

use crate::cipher::{AeadCipher, XChaCha20Poly1305Cipher};
use crate::error::TokenError;

/// Builds a sealing capability from a key of the scheme's length.
pub type CipherFactory = fn(&[u8]) -> Result<Box<dyn AeadCipher>, TokenError>;

/// Length of the optional big-endian Unix timestamp field.
pub const TIMESTAMP_LEN: usize = 4;

/// Immutable description of a token scheme.
///
/// Wire header layout is `[version][timestamp?][nonce]`, and the exact same
/// bytes are authenticated as associated data.
#[derive(Clone, Copy, Debug)]
pub struct Params {
    /// Diagnostic label.
    pub name: &'static str,
    /// Leading byte identifying the scheme on the wire.
    pub version: u8,
    /// Either 0 (no timestamp, no expiration) or [`TIMESTAMP_LEN`].
    pub timestamp_len: usize,
    /// Nonce length dictated by the primitive.
    pub nonce_len: usize,
    /// Required key length.
    pub key_len: usize,
    /// Sealing capability factory.
    pub cipher: CipherFactory,
}

/// Branca tokens: XChaCha20-Poly1305 with a 32-bit timestamp.
pub const BRANCA: Params = Params {
    name: "branca.xchacha20poly1305",
    version: 0xBA,
    timestamp_len: TIMESTAMP_LEN,
    nonce_len: XChaCha20Poly1305Cipher::NONCE_LEN,
    key_len: XChaCha20Poly1305Cipher::KEY_LEN,
    cipher: XChaCha20Poly1305Cipher::boxed,
};

/// Untimed tokens: XChaCha20-Poly1305 without a timestamp field.
pub const SEALED: Params = Params {
    name: "sealed.xchacha20poly1305",
    version: b'A',
    timestamp_len: 0,
    nonce_len: XChaCha20Poly1305Cipher::NONCE_LEN,
    key_len: XChaCha20Poly1305Cipher::KEY_LEN,
    cipher: XChaCha20Poly1305Cipher::boxed,
};

impl Params {
    /// `1 + timestamp_len + nonce_len`.
    pub const fn header_len(&self) -> usize {
        1 + self.timestamp_len + self.nonce_len
    }

    pub const fn timestamp_offset(&self) -> usize {
        1
    }

    pub const fn nonce_offset(&self) -> usize {
        1 + self.timestamp_len
    }

    pub const fn has_timestamp(&self) -> bool {
        self.timestamp_len > 0
    }

    /// Check the scheme's own invariants.
    pub fn validate(&self) -> Result<(), TokenError> {
        if self.timestamp_len != 0 && self.timestamp_len != TIMESTAMP_LEN {
            return Err(TokenError::InvalidScheme {
                scheme: self.name,
                reason: format!(
                    "timestamp length must be 0 or {TIMESTAMP_LEN}, got {}",
                    self.timestamp_len
                ),
            });
        }
        if self.nonce_len == 0 {
            return Err(TokenError::InvalidScheme {
                scheme: self.name,
                reason: "nonce length must be non-zero".to_string(),
            });
        }
        Ok(())
    }

    /// Build the sealing capability, enforcing the scheme's key length.
    pub fn build_cipher(&self, key: &[u8]) -> Result<Box<dyn AeadCipher>, TokenError> {
        if key.len() != self.key_len {
            return Err(TokenError::InvalidKeyLength {
                expected: self.key_len,
                actual: key.len(),
            });
        }
        (self.cipher)(key)
    }
}
