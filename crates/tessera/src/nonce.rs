//! Random nonce generation.
//!
//! Reusing a nonce under the same key destroys both confidentiality and
//! authenticity for the XChaCha20-Poly1305 scheme. Production signing always
//! draws from the operating system; fixed nonces are only reachable through
//! [`crate::Signer::sign_at`].

use crate::error::TokenError;
use rand::TryRngCore;
use rand::rngs::OsRng;

/// Source of fixed-length random byte strings.
pub trait NonceSource: Send + Sync {
    /// Fill `buf` entirely with random bytes.
    fn fill(&self, buf: &mut [u8]) -> Result<(), TokenError>;

    /// Return `n` fresh random bytes.
    fn next(&self, n: usize) -> Result<Vec<u8>, TokenError> {
        let mut nonce = vec![0u8; n];
        self.fill(&mut nonce)?;
        Ok(nonce)
    }
}

/// Nonces from the operating system's CSPRNG.
///
/// Failure of the entropy source is reported, never papered over.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsNonceSource;

impl NonceSource for OsNonceSource {
    fn fill(&self, buf: &mut [u8]) -> Result<(), TokenError> {
        OsRng
            .try_fill_bytes(buf)
            .map_err(|e| TokenError::Entropy(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_os_nonce_length() {
        let nonce = OsNonceSource.next(24).unwrap();
        assert_eq!(nonce.len(), 24);
    }

    #[test]
    fn test_os_nonces_differ() {
        let a = OsNonceSource.next(24).unwrap();
        let b = OsNonceSource.next(24).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_zero_length() {
        assert!(OsNonceSource.next(0).unwrap().is_empty());
    }
}
