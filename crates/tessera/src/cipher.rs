//! Sealing primitive used by the signer.
//!
//! The signer treats authenticated encryption as a capability: it hands over
//! a nonce, the plaintext and the associated data, and gets back
//! `ciphertext || tag`. Implementations must be stateless apart from the key
//! so that one instance can serve concurrent callers without locking.

use crate::error::TokenError;
use chacha20poly1305::{
    XChaCha20Poly1305, XNonce,
    aead::{Aead, KeyInit, Payload},
};

/// Authenticated encryption with associated data, bound to a single key.
pub trait AeadCipher: Send + Sync {
    /// Nonce length the primitive requires, in bytes.
    fn nonce_len(&self) -> usize;

    /// Encrypt `plaintext` and authenticate it together with `aad`.
    ///
    /// Returns ciphertext with the authentication tag appended.
    fn seal(&self, nonce: &[u8], plaintext: &[u8], aad: &[u8]) -> Result<Vec<u8>, TokenError>;

    /// Verify and decrypt `sealed` (ciphertext || tag) against `aad`.
    ///
    /// No plaintext is released unless the tag verifies.
    fn open(&self, nonce: &[u8], sealed: &[u8], aad: &[u8]) -> Result<Vec<u8>, TokenError>;
}

/// XChaCha20-Poly1305 (24-byte extended nonce, safe for random nonces).
pub struct XChaCha20Poly1305Cipher {
    cipher: XChaCha20Poly1305,
}

impl XChaCha20Poly1305Cipher {
    /// Key size (256 bits).
    pub const KEY_LEN: usize = 32;

    /// Extended nonce size (192 bits).
    pub const NONCE_LEN: usize = 24;

    /// Poly1305 tag size (128 bits).
    pub const TAG_LEN: usize = 16;

    /// Create a cipher from raw key bytes.
    pub fn new(key: &[u8]) -> Result<Self, TokenError> {
        let cipher = XChaCha20Poly1305::new_from_slice(key)
            .map_err(|e| TokenError::PrimitiveInit(e.to_string()))?;
        Ok(Self { cipher })
    }

    /// Factory shape expected by [`crate::Params::cipher`].
    pub fn boxed(key: &[u8]) -> Result<Box<dyn AeadCipher>, TokenError> {
        Ok(Box::new(Self::new(key)?))
    }

    fn nonce(nonce: &[u8]) -> Result<&XNonce, TokenError> {
        if nonce.len() != Self::NONCE_LEN {
            return Err(TokenError::InvalidNonceLength {
                expected: Self::NONCE_LEN,
                actual: nonce.len(),
            });
        }
        Ok(XNonce::from_slice(nonce))
    }
}

impl AeadCipher for XChaCha20Poly1305Cipher {
    fn nonce_len(&self) -> usize {
        Self::NONCE_LEN
    }

    fn seal(&self, nonce: &[u8], plaintext: &[u8], aad: &[u8]) -> Result<Vec<u8>, TokenError> {
        self.cipher
            .encrypt(
                Self::nonce(nonce)?,
                Payload {
                    msg: plaintext,
                    aad,
                },
            )
            .map_err(|_| TokenError::Seal)
    }

    fn open(&self, nonce: &[u8], sealed: &[u8], aad: &[u8]) -> Result<Vec<u8>, TokenError> {
        self.cipher
            .decrypt(Self::nonce(nonce)?, Payload { msg: sealed, aad })
            .map_err(|_| TokenError::Authentication)
    }
}

impl std::fmt::Debug for XChaCha20Poly1305Cipher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("XChaCha20Poly1305Cipher").finish_non_exhaustive()
    }
}
