//! Pixbatch CLI - Batch image resizer with per-item failure isolation.
//!
//! Pixbatch resizes a batch of JPEG, PNG, GIF and WebP files under one
//! policy (scale factor, fit to width or fit to height), re-encodes each in
//! its own format and writes them with deterministic names. A corrupt or
//! slow file is reported and skipped; the rest of the batch still runs.
//!
//! # Usage
//!
//! ```bash
//! # Halve every image in a directory
//! pixbatch resize ./photos --scale 0.5
//!
//! # Fit to 1280px wide, write a JSON report
//! pixbatch resize a.jpg b.png --width 1280 --output ./web --report report.json
//!
//! # Check what the files really are
//! pixbatch inspect ./uploads
//!
//! # View configuration
//! pixbatch config show
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod cli;
mod logging;

/// Pixbatch - Batch image resizer.
#[derive(Parser, Debug)]
#[command(name = "pixbatch")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    json_logs: bool,

    /// Use this config file instead of the default location
    #[arg(long, global = true, env = "PIXBATCH_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Resize images and write them with deterministic names
    Resize(cli::resize::ResizeArgs),

    /// Report each file's real format from its header
    Inspect(cli::inspect::InspectArgs),

    /// View and manage configuration
    Config(cli::config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logging isn't initialized yet, so use eprintln for config warnings.
    let config = match &cli.config {
        Some(path) => pixbatch_core::Config::load_from(path)?,
        None => match pixbatch_core::Config::load() {
            Ok(config) => config,
            Err(e) => {
                eprintln!(
                    "Warning: Failed to load config: {e}\n  \
                     Using default configuration. Check your config file with `pixbatch config path`."
                );
                pixbatch_core::Config::default()
            }
        },
    };
    logging::init_from_config(&config, cli.verbose, cli.json_logs);

    tracing::debug!("Pixbatch v{}", pixbatch_core::VERSION);

    match cli.command {
        Commands::Resize(args) => cli::resize::execute(args, config).await,
        Commands::Inspect(args) => cli::inspect::execute(args, &config),
        Commands::Config(args) => cli::config::execute(args, cli.config.as_deref(), &config),
    }
}
