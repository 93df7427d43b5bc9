use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tally_core::AppConfig;

mod commands;

#[derive(Parser)]
#[command(name = "tally")]
#[command(author, version, about = "Animated count-up stats page for the terminal")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Path to the configuration file (defaults to ~/.config/tally/config.toml)
    #[arg(short = 'c', long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the stats page
    Run,
    /// Write the default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// List configured stats with their final values
    List {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print every value a single count-up commits
    Trace {
        /// Target value
        #[arg(short = 'v', long)]
        value: u64,
        /// Duration in milliseconds (defaults to the configured duration)
        #[arg(short = 'd', long, allow_negative_numbers = true)]
        duration: Option<i64>,
        /// Simulated frame interval in milliseconds
        #[arg(short = 's', long, default_value_t = 16)]
        step: u64,
        /// Text placed before the value
        #[arg(long, default_value = "")]
        prefix: String,
        /// Text placed after the value
        #[arg(long, default_value = "")]
        suffix: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Init runs before loading so a broken config file can be replaced
    if let Some(Commands::Init { force }) = cli.command {
        commands::init::run(cli.config.as_deref(), force)?;
        return Ok(());
    }

    // Load configuration
    let config = match &cli.config {
        Some(path) => AppConfig::load_from(path)?,
        None => AppConfig::load()?,
    };

    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| config.general.log_level.clone()),
        ))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    tracing::debug!(stats = config.stats.len(), "Loaded configuration");

    match cli.command {
        Some(Commands::Run) | None => commands::run::run(config),
        Some(Commands::Init { .. }) => Ok(()),
        Some(Commands::List { json }) => commands::list::run(&config, json),
        Some(Commands::Trace {
            value,
            duration,
            step,
            prefix,
            suffix,
        }) => commands::trace::run(
            &config,
            commands::trace::TraceOptions {
                value,
                duration_ms: duration,
                step_ms: step,
                prefix,
                suffix,
            },
        ),
    }
}
