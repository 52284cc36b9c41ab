//! Token wire value and its header view.
//!
//! Binary layout, most significant byte first:
//!
//! | Offset           | Field                                   |
//! |------------------|-----------------------------------------|
//! | 0                | version tag (1 byte)                    |
//! | 1                | timestamp, big-endian `u32` (0 or 4)    |
//! | 1 + ts_len       | nonce (`nonce_len` bytes)               |
//! | header_len..     | ciphertext `\|\|` tag                   |
//!
//! The text form is unpadded URL-safe base64 of the binary form.

use crate::error::TokenError;
use crate::params::Params;
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A sealed token: `header || ciphertext || tag`.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct Token(Vec<u8>);

impl Token {
    /// Wrap raw token bytes. No validation happens until verification.
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Encode as unpadded URL-safe base64.
    pub fn to_text(&self) -> String {
        URL_SAFE_NO_PAD.encode(&self.0)
    }

    /// Decode from unpadded URL-safe base64.
    ///
    /// Malformed input is rejected outright; nothing is truncated or padded.
    pub fn from_text(text: impl AsRef<[u8]>) -> Result<Self, TokenError> {
        Ok(Self(URL_SAFE_NO_PAD.decode(text)?))
    }

    /// View the (unauthenticated) header under the given scheme.
    pub fn header<'a>(&'a self, params: &'a Params) -> Result<Header<'a>, TokenError> {
        Header::parse(params, &self.0).map(|(header, _)| header)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Token")
            .field("version", &self.0.first())
            .field("len", &self.0.len())
            .finish_non_exhaustive()
    }
}

impl FromStr for Token {
    type Err = TokenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_text(s)
    }
}

impl AsRef<[u8]> for Token {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<Vec<u8>> for Token {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl From<Token> for Vec<u8> {
    fn from(token: Token) -> Self {
        token.0
    }
}

impl Serialize for Token {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Token {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Token::from_text(&text).map_err(serde::de::Error::custom)
    }
}

/// Borrowed view over a token header.
///
/// Values read here are not authenticated until the token verifies.
#[derive(Clone, Copy, Debug)]
pub struct Header<'a> {
    params: &'a Params,
    bytes: &'a [u8],
}

impl<'a> Header<'a> {
    /// Split raw token bytes into header and sealed body.
    pub fn parse(params: &'a Params, token: &'a [u8]) -> Result<(Self, &'a [u8]), TokenError> {
        params.validate()?;
        let header_len = params.header_len();
        if token.len() < header_len {
            return Err(TokenError::ShortToken {
                expected: header_len,
                actual: token.len(),
            });
        }
        let (bytes, body) = token.split_at(header_len);
        Ok((Self { params, bytes }, body))
    }

    /// Append a header to `out`.
    pub(crate) fn write(params: &Params, timestamp: u32, nonce: &[u8], out: &mut Vec<u8>) {
        out.push(params.version);
        if params.has_timestamp() {
            out.extend_from_slice(&timestamp.to_be_bytes());
        }
        out.extend_from_slice(nonce);
    }

    pub fn params(&self) -> &'a Params {
        self.params
    }

    pub fn version(&self) -> u8 {
        self.bytes[0]
    }

    /// Raw embedded timestamp, if the scheme carries one.
    pub fn timestamp(&self) -> Option<u32> {
        if !self.params.has_timestamp() {
            return None;
        }
        let at = self.params.timestamp_offset();
        let mut raw = [0u8; 4];
        raw.copy_from_slice(&self.bytes[at..at + 4]);
        Some(u32::from_be_bytes(raw))
    }

    /// Embedded timestamp as an instant.
    pub fn issued_at(&self) -> Option<DateTime<Utc>> {
        self.timestamp()
            .and_then(|ts| DateTime::from_timestamp(i64::from(ts), 0))
    }

    pub fn nonce(&self) -> &'a [u8] {
        &self.bytes[self.params.nonce_offset()..]
    }

    /// Exact header bytes, which double as the associated data.
    pub fn as_bytes(&self) -> &'a [u8] {
        self.bytes
    }
}
