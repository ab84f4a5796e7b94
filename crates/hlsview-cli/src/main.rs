//! hlsview CLI - Headless driver for the player controller
//!
//! Features:
//! - Preset stream listing
//! - Stream URL checks
//! - Scripted or interactive player sessions against a terminal engine
//! - Theme CSS export

use clap::{Parser, Subcommand};
use hlsview_core::{PlayerConfig, Theme};
use std::path::PathBuf;

mod commands;
mod output;
mod script;
mod terminal;

use output::OutputFormat;

/// hlsview CLI - HLS player controller toolkit
#[derive(Parser)]
#[command(name = "hlsview")]
#[command(version)]
#[command(about = "Drive the hlsview playback controller from the terminal", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Emit logs as JSON
    #[arg(long)]
    log_json: bool,

    /// Output format (text, json)
    #[arg(short, long, default_value = "text")]
    format: String,

    /// Player configuration file (JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the example streams
    Presets,

    /// Check whether a stream URL is accepted
    Check {
        /// Stream URL or path
        url: String,
    },

    /// Run a player session
    Session {
        /// Source to mount with (defaults to the configured URL)
        #[arg(short, long)]
        url: Option<String>,

        /// Read directives from a file instead of stdin
        #[arg(short, long)]
        script: Option<PathBuf>,

        /// Start with playback intent off
        #[arg(long)]
        no_autoplay: bool,
    },

    /// Print theme CSS variables
    Theme {
        /// Theme to print (defaults to the configured theme)
        theme: Option<Theme>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let level = if cli.verbose { "debug" } else { "warn" };
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(level)
        .with_writer(std::io::stderr);
    if cli.log_json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    hlsview_core::init();

    let mut config = match &cli.config {
        Some(path) => PlayerConfig::from_file(path)?,
        None => PlayerConfig::default(),
    };
    let format = OutputFormat::from(cli.format.as_str());

    match cli.command {
        Commands::Presets => {
            commands::presets(format)?;
        }
        Commands::Check { url } => {
            commands::check(&url, format)?;
        }
        Commands::Session { url, script, no_autoplay } => {
            if no_autoplay {
                config.auto_play = false;
            }
            commands::session(config, url, script, format).await?;
        }
        Commands::Theme { theme } => {
            commands::theme(theme.unwrap_or(config.theme), format)?;
        }
    }

    Ok(())
}
