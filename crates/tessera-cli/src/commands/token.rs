//! Token commands.
//!
//! `tessera sign` - Seal a message into a token.
//! `tessera verify` - Verify a token and print its message.
//! `tessera inspect` - Show a token's header without verifying it.

use anyhow::{Context, bail};
use chrono::{DateTime, Utc};
use clap::Args;
use serde::Serialize;
use std::fs;
use std::io::{Read, Write};
use std::path::Path;
use std::process::ExitCode;
use tessera::config::decode_hex_key;
use tessera::{Scheme, Signer, SignerConfig, Token, TokenError};

/// Exit status for an authentic token past its TTL.
const EXIT_EXPIRED: u8 = 2;

/// Key and scheme options shared by `sign` and `verify`.
#[derive(Args, Debug, Clone, Default)]
pub struct KeyArgs {
    /// Hex-encoded key, or a path to a file containing one
    #[arg(long, env = "TESSERA_KEY", hide_env_values = true)]
    pub key: Option<String>,

    /// Token scheme (overrides config)
    #[arg(long)]
    pub scheme: Option<Scheme>,

    /// Token lifetime, e.g. "15m" or "24h" (overrides config)
    #[arg(long)]
    pub ttl: Option<String>,
}

/// Outcome of verifying a token.
#[derive(Debug, PartialEq)]
pub enum Verification {
    Fresh(Vec<u8>),
    Expired {
        issued_at: DateTime<Utc>,
        message: Vec<u8>,
    },
}

/// Unverified header contents.
#[derive(Debug, Serialize)]
pub struct InspectReport {
    pub scheme: &'static str,
    pub version: String,
    pub timestamp: Option<u32>,
    pub issued_at: Option<DateTime<Utc>>,
    pub nonce: String,
    pub sealed_len: usize,
}

/// Resolve a key from either a file path or a hex-encoded string.
fn resolve_key_arg(key: &str) -> anyhow::Result<Vec<u8>> {
    let path = Path::new(key);
    if path.exists() {
        let hex = fs::read_to_string(path)
            .with_context(|| format!("Failed to read key file: {}", path.display()))?;
        return Ok(decode_hex_key(&hex)
            .with_context(|| format!("Failed to parse key file: {}", path.display()))?
            .to_vec());
    }

    Ok(decode_hex_key(key)
        .context("Failed to parse key. Expected a hex-encoded key or a path to one")?
        .to_vec())
}

/// Build a signer from the config file, overridden by command-line flags.
pub fn build_signer(config_path: Option<&Path>, args: &KeyArgs) -> anyhow::Result<Signer> {
    let mut config = match config_path {
        Some(path) => SignerConfig::load(path)
            .with_context(|| format!("Failed to load config: {}", path.display()))?,
        None => SignerConfig::default(),
    };
    if let Some(scheme) = args.scheme {
        config.scheme = scheme;
    }
    if let Some(ttl) = &args.ttl {
        config.ttl = Some(ttl.clone());
    }

    let ttl = config.ttl().context("Invalid TTL")?;
    let key = match &args.key {
        Some(key) => resolve_key_arg(key)?,
        None => config
            .resolve_key()
            .context("Failed to resolve key from config")?
            .context("Key not provided. Pass --key, set TESSERA_KEY, or configure key_env/key_file")?
            .to_vec(),
    };

    tracing::debug!(scheme = ?config.scheme, ttl_secs = ttl.num_seconds(), "building signer");
    Signer::new(config.scheme.params(), &key, ttl).context("Failed to create signer")
}

/// Seal a message and return the text token.
pub fn sign(signer: &Signer, message: &[u8]) -> anyhow::Result<String> {
    let token = signer.sign(message).context("Failed to sign message")?;
    Ok(token.to_string())
}

/// Verify a text token.
pub fn verify(signer: &Signer, token: &str) -> anyhow::Result<Verification> {
    let token: Token = token.trim().parse().context("Failed to decode token")?;
    match signer.verify(&token) {
        Ok(message) => Ok(Verification::Fresh(message)),
        Err(TokenError::Expired { issued_at, message }) => {
            Ok(Verification::Expired { issued_at, message })
        }
        Err(e) => Err(e).context("Token verification failed"),
    }
}

/// Read the header of a text token without verifying it.
pub fn inspect(scheme: Option<Scheme>, token: &str) -> anyhow::Result<InspectReport> {
    let token: Token = token.trim().parse().context("Failed to decode token")?;
    let Some(scheme) = scheme.or_else(|| Scheme::detect(token.as_bytes())) else {
        bail!("Unknown token version; pass --scheme to inspect it anyway");
    };
    let params = scheme.params();
    let header = token.header(&params).context("Failed to read token header")?;

    Ok(InspectReport {
        scheme: params.name,
        version: format!("{:#04x}", header.version()),
        timestamp: header.timestamp(),
        issued_at: header.issued_at(),
        nonce: hex::encode(header.nonce()),
        sealed_len: token.len() - params.header_len(),
    })
}

fn read_stdin() -> anyhow::Result<Vec<u8>> {
    let mut input = Vec::new();
    std::io::stdin()
        .read_to_end(&mut input)
        .context("Failed to read stdin")?;
    Ok(input)
}

/// Load a token from a file if the argument is a path.
fn load_token(token: String) -> anyhow::Result<String> {
    if Path::new(&token).exists() {
        return Ok(fs::read_to_string(&token)?.trim().to_string());
    }
    Ok(token)
}

pub fn run_sign(
    config: Option<&Path>,
    args: &KeyArgs,
    message: Option<String>,
) -> anyhow::Result<ExitCode> {
    let signer = build_signer(config, args)?;
    let message = match message {
        Some(m) => m.into_bytes(),
        None => read_stdin()?,
    };

    println!("{}", sign(&signer, &message)?);
    Ok(ExitCode::SUCCESS)
}

pub fn run_verify(
    config: Option<&Path>,
    args: &KeyArgs,
    token: Option<String>,
) -> anyhow::Result<ExitCode> {
    let signer = build_signer(config, args)?;
    let token = match token {
        Some(t) => load_token(t)?,
        None => String::from_utf8(read_stdin()?).context("Token is not valid UTF-8")?,
    };

    let (message, code) = match verify(&signer, &token)? {
        Verification::Fresh(message) => (message, ExitCode::SUCCESS),
        Verification::Expired { issued_at, message } => {
            tracing::warn!(%issued_at, "token is authentic but expired");
            (message, ExitCode::from(EXIT_EXPIRED))
        }
    };

    let mut stdout = std::io::stdout().lock();
    stdout.write_all(&message)?;
    stdout.flush()?;
    Ok(code)
}

pub fn run_inspect(scheme: Option<Scheme>, json: bool, token: String) -> anyhow::Result<ExitCode> {
    let report = inspect(scheme, &load_token(token)?)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(ExitCode::SUCCESS);
    }

    println!("Token Information (unverified):");
    println!("  Scheme:     {}", report.scheme);
    println!("  Version:    {}", report.version);
    match (report.timestamp, report.issued_at) {
        (Some(ts), Some(at)) => println!("  Issued at:  {at} ({ts})"),
        (Some(ts), None) => println!("  Timestamp:  {ts}"),
        _ => println!("  Issued at:  (untimed scheme)"),
    }
    println!("  Nonce:      {}", report.nonce);
    println!("  Sealed len: {} bytes", report.sealed_len);

    Ok(ExitCode::SUCCESS)
}
