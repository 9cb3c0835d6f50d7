mod app;
mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "recap",
    version,
    about = "Transcribe meeting recordings and write structured minutes"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Transcribe and summarize one or more recordings
    Process {
        /// Audio files to process
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
    /// Print the active configuration
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Process { paths } => commands::process::run(paths).await,
        Command::Config => commands::config::run(),
    }
}
