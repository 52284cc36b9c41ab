//! Signer configuration.

use crate::error::TokenError;
use crate::params::{BRANCA, Params, SEALED};
use crate::signer::Signer;
use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use zeroize::Zeroizing;

/// Token scheme selectable from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Scheme {
    /// Branca tokens with an embedded timestamp.
    #[default]
    Branca,
    /// Untimed tokens.
    Sealed,
}

impl Scheme {
    pub fn params(self) -> Params {
        match self {
            Scheme::Branca => BRANCA,
            Scheme::Sealed => SEALED,
        }
    }

    /// Guess the scheme from a token's leading version byte.
    pub fn detect(token: &[u8]) -> Option<Self> {
        match token.first() {
            Some(&v) if v == BRANCA.version => Some(Scheme::Branca),
            Some(&v) if v == SEALED.version => Some(Scheme::Sealed),
            _ => None,
        }
    }
}

impl std::str::FromStr for Scheme {
    type Err = TokenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "branca" => Ok(Scheme::Branca),
            "sealed" => Ok(Scheme::Sealed),
            other => Err(TokenError::Config(format!("unknown scheme: {other}"))),
        }
    }
}

/// Configuration for building a [`Signer`].
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SignerConfig {
    /// Token scheme.
    #[serde(default)]
    pub scheme: Scheme,

    /// Environment variable containing the key (hex-encoded).
    #[serde(default)]
    pub key_env: Option<String>,

    /// Path to a file containing the key (hex-encoded).
    #[serde(default)]
    pub key_file: Option<PathBuf>,

    /// Token lifetime (e.g., "30s", "15m", "24h"). Absent means no expiration.
    #[serde(default)]
    pub ttl: Option<String>,
}

impl SignerConfig {
    /// Parse a YAML document.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, TokenError> {
        serde_yaml::from_str(yaml).map_err(|e| TokenError::Config(e.to_string()))
    }

    /// Load a YAML config file.
    pub fn load(path: &Path) -> Result<Self, TokenError> {
        let yaml = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&yaml)
    }

    /// Resolve the key from environment or file.
    pub fn resolve_key(&self) -> Result<Option<Zeroizing<Vec<u8>>>, TokenError> {
        // Try environment variable first
        if let Some(env_var) = &self.key_env {
            if let Ok(key) = std::env::var(env_var) {
                return decode_hex_key(&key).map(Some);
            }
        }

        // Try file path
        if let Some(path) = &self.key_file {
            if path.exists() {
                let key = Zeroizing::new(std::fs::read_to_string(path)?);
                return decode_hex_key(&key).map(Some);
            }
        }

        Ok(None)
    }

    /// Configured TTL, zero when absent.
    pub fn ttl(&self) -> Result<Duration, TokenError> {
        match &self.ttl {
            Some(ttl) => parse_duration(ttl),
            None => Ok(Duration::zero()),
        }
    }

    /// Build a signer from the resolved key.
    pub fn build_signer(&self) -> Result<Signer, TokenError> {
        let key = self
            .resolve_key()?
            .ok_or_else(|| TokenError::Config("no key configured".to_string()))?;
        Signer::new(self.scheme.params(), &key, self.ttl()?)
    }
}

/// Decode a hex-encoded key, ignoring surrounding whitespace.
pub fn decode_hex_key(hex: &str) -> Result<Zeroizing<Vec<u8>>, TokenError> {
    hex::decode(hex.trim())
        .map(Zeroizing::new)
        .map_err(|e| TokenError::Config(format!("invalid hex key: {e}")))
}

/// Parse a duration string like "30s", "15m", "24h", "7d".
///
/// A bare number is taken as seconds.
pub fn parse_duration(s: &str) -> Result<Duration, TokenError> {
    let s = s.trim().to_lowercase();
    let (value, unit): (&str, fn(i64) -> Option<Duration>) =
        if let Some(days) = s.strip_suffix('d') {
            (days, Duration::try_days)
        } else if let Some(hours) = s.strip_suffix('h') {
            (hours, Duration::try_hours)
        } else if let Some(minutes) = s.strip_suffix('m') {
            (minutes, Duration::try_minutes)
        } else if let Some(seconds) = s.strip_suffix('s') {
            (seconds, Duration::try_seconds)
        } else {
            (s.as_str(), Duration::try_seconds)
        };

    let value: i64 = value
        .parse()
        .map_err(|_| TokenError::Config(format!("invalid duration: {s}")))?;
    unit(value).ok_or_else(|| TokenError::Config(format!("duration out of range: {s}")))
}
