//! Error types for the token engine.

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Errors that can occur while building a signer or sealing and opening tokens.
#[derive(Debug, Error)]
pub enum TokenError {
    /// Key does not have the length the parameter set requires.
    #[error("invalid key length: expected {expected} bytes, got {actual}")]
    InvalidKeyLength { expected: usize, actual: usize },

    /// Explicit nonce does not have the length the parameter set requires.
    #[error("invalid nonce length: expected {expected} bytes, got {actual}")]
    InvalidNonceLength { expected: usize, actual: usize },

    /// Parameter set is internally inconsistent.
    #[error("invalid scheme {scheme}: {reason}")]
    InvalidScheme { scheme: &'static str, reason: String },

    /// The sealing primitive could not be initialized.
    #[error("failed to initialize cipher: {0}")]
    PrimitiveInit(String),

    /// The entropy source could not produce a nonce.
    #[error("failed to generate nonce: {0}")]
    Entropy(String),

    /// The sealing primitive refused the input.
    #[error("failed to seal token")]
    Seal,

    /// Input is too short to hold a complete header.
    #[error("token too short: {actual} bytes, header needs {expected}")]
    ShortToken { expected: usize, actual: usize },

    /// Tag or ciphertext did not authenticate. Covers corruption, wrong key
    /// and tampering alike.
    #[error("token authentication failed")]
    Authentication,

    /// Token is authentic but older than the signer's TTL.
    ///
    /// The recovered plaintext travels with the error so the caller can
    /// still inspect it. It must not be treated as fresh.
    #[error("token has expired (issued at {issued_at})")]
    Expired {
        issued_at: DateTime<Utc>,
        message: Vec<u8>,
    },

    /// Text form is not valid unpadded URL-safe base64.
    #[error("malformed token encoding: {0}")]
    MalformedEncoding(#[from] base64::DecodeError),

    /// Configuration could not be parsed or resolved.
    #[error("configuration error: {0}")]
    Config(String),

    /// IO error (reading config or key files).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl TokenError {
    /// Plaintext of an expired-but-authentic token, if this is an expiry error.
    pub fn expired_message(&self) -> Option<&[u8]> {
        match self {
            TokenError::Expired { message, .. } => Some(message),
            _ => None,
        }
    }

    /// Move the plaintext out of an expiry error.
    pub fn into_expired_message(self) -> Option<Vec<u8>> {
        match self {
            TokenError::Expired { message, .. } => Some(message),
            _ => None,
        }
    }

    pub fn is_expired(&self) -> bool {
        matches!(self, TokenError::Expired { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expired_carries_message() {
        let err = TokenError::Expired {
            issued_at: DateTime::from_timestamp(0, 0).unwrap(),
            message: b"payload".to_vec(),
        };
        assert!(err.is_expired());
        assert_eq!(err.expired_message(), Some(&b"payload"[..]));
        assert_eq!(err.into_expired_message(), Some(b"payload".to_vec()));
    }

    #[test]
    fn test_other_errors_have_no_message() {
        let err = TokenError::Authentication;
        assert!(!err.is_expired());
        assert!(err.expired_message().is_none());
        assert_eq!(err.to_string(), "token authentication failed");
    }
}
