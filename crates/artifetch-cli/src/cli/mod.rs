//! CLI for the artifetch download pipeline.

mod commands;

use anyhow::Result;
use artifetch_core::config;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use commands::{run_check, run_checksum, run_fetch, FetchOptions};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "artifetch")]
#[command(about = "Check, download and verify installer artifacts", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Download every missing or corrupt artifact listed in a manifest.
    Fetch {
        /// JSON manifest: `[{"url": ..., "path": ..., "checksum": ...}]`.
        manifest: PathBuf,

        /// Announce when this URL has been downloaded and verified (repeatable).
        #[arg(long = "callback-on", value_name = "URL")]
        callback_on: Vec<String>,

        /// Print events as JSON lines instead of human-readable text.
        #[arg(long)]
        json: bool,
    },

    /// List manifest entries that are missing or fail verification.
    Check {
        /// JSON manifest.
        manifest: PathBuf,
    },

    /// Compute SHA-256 of a file.
    Checksum {
        /// Path to the file.
        path: PathBuf,
    },
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();

        match cli.command {
            CliCommand::Fetch {
                manifest,
                callback_on,
                json,
            } => {
                let cfg = config::load_or_init()?;
                tracing::debug!("loaded config: {:?}", cfg);
                let opts = FetchOptions { callback_on, json };
                run_fetch(&cfg, &manifest, opts).await?;
            }
            CliCommand::Check { manifest } => run_check(&manifest).await?,
            CliCommand::Checksum { path } => run_checksum(&path).await?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
