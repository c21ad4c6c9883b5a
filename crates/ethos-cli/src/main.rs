//! ethos - principle-based safety gates with Signed Integrity Graph output.
//!
//! CLI for building, signing, and verifying tamper-evident transcript
//! graphs, and for running heuristic risk checks over transcripts and tool
//! payloads.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

mod commands;

/// ethos - principle-based safety gates with Signed Integrity Graph output
#[derive(Parser, Debug)]
#[command(name = "ethos")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the ethos configuration file
    #[arg(short, long, default_value = "ethos.yaml")]
    config: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Initialize ethos config and Ed25519 signing keys
    Init {
        /// Private key destination
        #[arg(long, default_value = "sig.key")]
        key: PathBuf,

        /// Public key destination
        #[arg(long, default_value = "sig.pub")]
        pubkey: PathBuf,
    },

    /// Run checks against a transcript JSONL file
    Check {
        /// Transcript file (JSONL)
        #[arg(long)]
        file: PathBuf,
    },

    /// Evaluate a tool payload against safety checks and return allow/deny
    Gate {
        /// Tool name
        #[arg(long)]
        tool: String,

        /// Payload file (JSON)
        #[arg(long)]
        payload: PathBuf,
    },

    /// Run checks for an agent transcript and emit SIG graph + summary
    Run {
        /// Agent identifier recorded in node metadata
        #[arg(long)]
        agent: String,

        /// Transcript file (JSONL)
        #[arg(long)]
        input: PathBuf,

        /// Output directory
        #[arg(long)]
        out: PathBuf,
    },

    /// Sign the canonical JSON of a SIG graph
    Sign {
        /// Graph file to sign
        #[arg(long = "in")]
        in_file: PathBuf,

        /// Signature document destination
        #[arg(long)]
        out: PathBuf,

        /// Private key file
        #[arg(long, default_value = "sig.key")]
        key: PathBuf,

        /// Overwrite an existing signature file
        #[arg(long)]
        force: bool,
    },

    /// Verify a signature against the canonical JSON of a graph
    Verify {
        /// Signature document
        #[arg(long)]
        sig: PathBuf,

        /// Graph file
        #[arg(long = "in")]
        in_file: PathBuf,

        /// Public key file
        #[arg(long = "pub")]
        pubkey: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = EnvFilter::try_new(&cli.log_level).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    match cli.command {
        Commands::Init { key, pubkey } => {
            commands::init::run(&cli.config, &key, &pubkey)?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Check { file } => {
            commands::check::run(&cli.config, &file)?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Gate { tool, payload } => {
            commands::gate::run(&cli.config, &tool, &payload)?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Run { agent, input, out } => {
            commands::run::run(&cli.config, &agent, &input, &out)?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Sign {
            in_file,
            out,
            key,
            force,
        } => {
            commands::sign::run(&in_file, &key, &out, force)?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Verify {
            sig,
            in_file,
            pubkey,
        } => {
            let verified = commands::verify::run(&sig, &in_file, &pubkey)?;
            Ok(if verified {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
    }
}
