//! # tessera
//!
//! Authenticated, optionally time-bound tokens.
//!
//! A token binds a caller-supplied message to an AEAD tag and, depending on
//! the scheme, to the instant it was issued. Tokens are verified locally
//! with the shared key; no validation service is involved.
//!
//! This crate provides:
//! - Parameter sets describing a scheme ([`BRANCA`], [`SEALED`])
//! - A [`Signer`] that seals and opens tokens, safe to share across threads
//! - The [`Token`] wire value with its unpadded URL-safe base64 text form
//! - Configuration for resolving keys and TTLs from env, files or YAML
//!
//! ## Wire format
//!
//! ```text
//! [version: 1][timestamp: 0 or 4, big-endian][nonce][ciphertext || tag]
//! ```
//!
//! The header (everything before the ciphertext) is also the associated
//! data, so changing the version, the timestamp or the nonce invalidates the
//! tag.
//!
//! ## Example
//!
//! ```rust
//! use chrono::Duration;
//! use tessera::{BRANCA, Signer, Token, TokenError};
//!
//! # fn main() -> Result<(), TokenError> {
//! let signer = Signer::new(BRANCA, b"supersecretkeyyoushouldnotcommit", Duration::minutes(5))?;
//!
//! let token = signer.sign(b"user:42")?;
//! let text = token.to_string();
//!
//! let parsed: Token = text.parse()?;
//! assert_eq!(signer.verify(&parsed)?, b"user:42");
//! # Ok(())
//! # }
//! ```
//!
//! ## Expiration
//!
//! When the scheme carries a timestamp and the TTL is positive, a token
//! older than the TTL fails with [`TokenError::Expired`]. The error still
//! carries the authenticated plaintext for auditing.

pub mod cipher;
pub mod config;
pub mod error;
pub mod nonce;
pub mod params;
pub mod signer;
pub mod token;

pub use cipher::{AeadCipher, XChaCha20Poly1305Cipher};
pub use config::{Scheme, SignerConfig};
pub use error::TokenError;
pub use nonce::{NonceSource, OsNonceSource};
pub use params::{BRANCA, CipherFactory, Params, SEALED};
pub use signer::Signer;
pub use token::{Header, Token};
