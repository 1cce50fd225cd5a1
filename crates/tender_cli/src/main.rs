//! Tender registry CLI.
//!
//! # Responsibility
//! - Bootstrap a registry from TOML config and replay operation scripts.
//! - Hash proposal documents the same way the registry does.

use clap::{Parser, Subcommand};

mod commands;
mod output;
mod script;

use commands::{hash, run};

#[derive(Parser)]
#[command(name = "tender")]
#[command(about = "Public tender registry: replay operation scripts and hash documents")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a JSON-lines operation script against a fresh registry
    Run {
        /// Operation script (one JSON object per line)
        script: String,
        /// Registry configuration file (TOML)
        #[arg(long)]
        config: String,
        /// Output as JSON lines
        #[arg(long)]
        json: bool,
        /// Stop with a non-zero exit code at the first failed operation
        #[arg(long)]
        strict: bool,
    },
    /// Print the content hash of a proposal document
    Hash {
        /// Document to hash
        file: String,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run {
            script,
            config,
            json,
            strict,
        } => run::run(script, config, json, strict),
        Commands::Hash { file } => hash::run(file),
    };
    // The file logger lives in a static and is never dropped.
    log::logger().flush();

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
