use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tessera::Scheme;
use tracing_subscriber::EnvFilter;

mod commands;

use commands::token::KeyArgs;

#[derive(Parser, Debug)]
#[command(name = "tessera", version, about = "Sign and verify tessera tokens")]
struct Cli {
    /// YAML config file (scheme, key_env, key_file, ttl)
    #[arg(long, global = true, env = "TESSERA_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Seal a message into a token. Reads stdin when MESSAGE is omitted.
    Sign {
        #[command(flatten)]
        key: KeyArgs,

        /// Message to seal
        message: Option<String>,
    },

    /// Verify a token and print its message. Reads stdin when TOKEN is omitted.
    ///
    /// Exits with status 2 when the token is authentic but expired; the
    /// message is still printed.
    Verify {
        #[command(flatten)]
        key: KeyArgs,

        /// Token in text form
        token: Option<String>,
    },

    /// Show a token's header without verifying it.
    Inspect {
        /// Scheme to parse the header with (detected from the version byte by default)
        #[arg(long)]
        scheme: Option<Scheme>,

        /// Print as JSON
        #[arg(long, default_value_t = false)]
        json: bool,

        /// Token in text form, or a path to a file containing one
        token: String,
    },
}

fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.config.as_deref();

    match cli.cmd {
        Command::Sign { key, message } => commands::token::run_sign(config, &key, message),
        Command::Verify { key, token } => commands::token::run_verify(config, &key, token),
        Command::Inspect {
            scheme,
            json,
            token,
        } => commands::token::run_inspect(scheme, json, token),
    }
}
