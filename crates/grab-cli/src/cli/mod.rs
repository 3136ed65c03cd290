//! CLI for the grab downloader.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use grab_core::config;
use std::path::PathBuf;

use commands::{run_config, run_get, run_info};

/// Top-level CLI for the grab downloader.
#[derive(Debug, Parser)]
#[command(name = "grab")]
#[command(about = "grab: download one file over HTTP with live progress", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Download a URL into the downloads directory.
    Get {
        /// Direct HTTP/HTTPS URL to download.
        url: String,

        /// Destination directory (overrides `download_dir` from the config).
        #[arg(long, value_name = "PATH")]
        dir: Option<PathBuf>,

        /// Print the final snapshot as JSON on stdout instead of the path.
        #[arg(long)]
        json: bool,
    },

    /// Show content type and size without downloading.
    Info {
        /// Direct HTTP/HTTPS URL to probe.
        url: String,

        /// Print the result as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Show the config file location and effective values.
    Config,
}

impl CliCommand {
    /// Parses arguments and dispatches. `Ok(false)` means the command ran but
    /// the download did not succeed.
    pub async fn run_from_args() -> Result<bool> {
        let cli = Cli::parse();
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Get { url, dir, json } => run_get(&cfg, &url, dir, json).await,
            CliCommand::Info { url, json } => {
                run_info(&url, json).await?;
                Ok(true)
            }
            CliCommand::Config => {
                run_config(&cfg)?;
                Ok(true)
            }
        }
    }
}

#[cfg(test)]
mod tests;
