//! Token sealing and opening.

use crate::cipher::{AeadCipher, XChaCha20Poly1305Cipher};
use crate::error::TokenError;
use crate::nonce::{NonceSource, OsNonceSource};
use crate::params::Params;
use crate::token::{Header, Token};
use chrono::{DateTime, Duration, Utc};

/// Seals and opens tokens under one parameter set and one key.
///
/// A signer holds no per-call state: every `sign`/`verify` assembles its
/// header in a buffer local to that call, so a single instance can be shared
/// across threads (`Arc<Signer>`) without locking. The cipher is required to
/// be stateless apart from its key.
pub struct Signer {
    params: Params,
    cipher: Box<dyn AeadCipher>,
    ttl: Duration,
    nonces: Box<dyn NonceSource>,
}

impl Signer {
    /// Create a signer for `params` using `key`.
    ///
    /// A non-positive `ttl` disables expiration checks.
    pub fn new(params: Params, key: &[u8], ttl: Duration) -> Result<Self, TokenError> {
        params.validate()?;
        let cipher = params.build_cipher(key)?;
        if cipher.nonce_len() != params.nonce_len {
            return Err(TokenError::InvalidScheme {
                scheme: params.name,
                reason: format!(
                    "nonce length {} does not match primitive nonce length {}",
                    params.nonce_len,
                    cipher.nonce_len()
                ),
            });
        }

        tracing::debug!(
            scheme = params.name,
            version = params.version,
            ttl_secs = ttl.num_seconds(),
            "signer created"
        );

        Ok(Self {
            params,
            cipher,
            ttl,
            nonces: Box::new(OsNonceSource),
        })
    }

    /// Replace the nonce source used by [`Signer::sign`].
    pub fn with_nonce_source(mut self, nonces: impl NonceSource + 'static) -> Self {
        self.nonces = Box::new(nonces);
        self
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    fn enforces_expiry(&self) -> bool {
        self.params.has_timestamp() && self.ttl > Duration::zero()
    }

    /// True when `issued_at` and `at` are more than one TTL apart, in either
    /// direction. A token stamped further in the future than the TTL is
    /// rejected like a stale one.
    fn outside_window(&self, issued_at: DateTime<Utc>, at: DateTime<Utc>) -> bool {
        let stale = issued_at
            .checked_add_signed(self.ttl)
            .is_some_and(|deadline| at > deadline);
        let ahead = at
            .checked_add_signed(self.ttl)
            .is_some_and(|deadline| issued_at > deadline);
        stale || ahead
    }

    /// Seal `message` with a fresh random nonce and the current time.
    pub fn sign(&self, message: &[u8]) -> Result<Token, TokenError> {
        let nonce = self.nonces.next(self.params.nonce_len)?;
        self.sign_at(Utc::now(), &nonce, message)
    }

    /// Seal `message` with an explicit instant and nonce.
    ///
    /// Deterministic, for golden vectors and tests. Never call this twice with
    /// the same nonce under the same key: doing so breaks both
    /// confidentiality and authenticity.
    pub fn sign_at(
        &self,
        at: DateTime<Utc>,
        nonce: &[u8],
        message: &[u8],
    ) -> Result<Token, TokenError> {
        if nonce.len() != self.params.nonce_len {
            return Err(TokenError::InvalidNonceLength {
                expected: self.params.nonce_len,
                actual: nonce.len(),
            });
        }

        let header_len = self.params.header_len();
        // 32-bit seconds, truncated the same way on every platform.
        let timestamp = at.timestamp() as u32;

        let mut out =
            Vec::with_capacity(header_len + message.len() + XChaCha20Poly1305Cipher::TAG_LEN);
        Header::write(&self.params, timestamp, nonce, &mut out);
        let sealed = self.cipher.seal(nonce, message, &out[..header_len])?;
        out.extend_from_slice(&sealed);

        tracing::trace!(
            message_len = message.len(),
            token_len = out.len(),
            "token sealed"
        );
        Ok(Token::from_bytes(out))
    }

    /// Open `token` and check freshness against the current time.
    pub fn verify(&self, token: impl AsRef<[u8]>) -> Result<Vec<u8>, TokenError> {
        self.verify_at(Utc::now(), token)
    }

    /// Open `token` and check freshness against `at`.
    ///
    /// An authentic token older than the TTL yields
    /// [`TokenError::Expired`], which still carries the plaintext.
    pub fn verify_at(
        &self,
        at: DateTime<Utc>,
        token: impl AsRef<[u8]>,
    ) -> Result<Vec<u8>, TokenError> {
        let (header, body) = Header::parse(&self.params, token.as_ref())?;

        // A foreign version byte would fail authentication anyway.
        if header.version() != self.params.version {
            return Err(TokenError::Authentication);
        }

        let message = self.cipher.open(header.nonce(), body, header.as_bytes())?;

        let expired = header
            .issued_at()
            .filter(|&issued_at| self.enforces_expiry() && self.outside_window(issued_at, at));
        if let Some(issued_at) = expired {
            return Err(TokenError::Expired { issued_at, message });
        }

        tracing::trace!(message_len = message.len(), "token opened");
        Ok(message)
    }

    /// Decode the text form and verify it.
    pub fn verify_text(&self, text: &str) -> Result<Vec<u8>, TokenError> {
        self.verify(Token::from_text(text)?)
    }
}

impl std::fmt::Debug for Signer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signer")
            .field("scheme", &self.params.name)
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}
