//! CLI command implementations for tessera.

pub mod token;
